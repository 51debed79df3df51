//! Connect command

use anyhow::Result;
use clap::{ArgGroup, Args};

use crate::auth::ConnectTarget;
use crate::cli::context::AppContext;
use crate::ops::ensure_connected;

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["tenant", "subscription"])))]
pub struct ConnectCommands {
    /// Tenant id (GUID) to connect to
    #[arg(long)]
    pub tenant: Option<String>,

    /// Subscription id to connect to
    #[arg(long)]
    pub subscription: Option<String>,
}

impl ConnectCommands {
    pub fn target(&self) -> Result<ConnectTarget> {
        match (&self.tenant, &self.subscription) {
            (Some(tenant), None) => Ok(ConnectTarget::Tenant(tenant.clone())),
            (None, Some(subscription)) => Ok(ConnectTarget::Subscription(subscription.clone())),
            _ => anyhow::bail!("Pass exactly one of --tenant or --subscription"),
        }
    }
}

pub async fn handle_connect_command(ctx: &AppContext, args: ConnectCommands) -> Result<()> {
    let target = args.target()?;
    let sign_in = ctx.sign_in();

    let session = ensure_connected(&ctx.store, &sign_in, &target).await?;

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}
