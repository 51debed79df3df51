//! Access token command

use anyhow::Result;
use clap::Args;

use crate::cli::context::AppContext;
use crate::cli::ui::with_spinner;
use crate::ops::fetch_access_token;

#[derive(Args)]
pub struct TokenCommands {
    /// Resource audience (defaults to the management API)
    #[arg(long)]
    pub resource: Option<String>,

    /// Subscription of a saved session (defaults to the current session)
    #[arg(long)]
    pub subscription: Option<String>,
}

pub async fn handle_token_command(ctx: &AppContext, args: TokenCommands) -> Result<()> {
    let session = match args.subscription.as_deref() {
        Some(id) => Some(ctx.session(Some(id)).await?),
        None => None,
    };
    let audience = args
        .resource
        .unwrap_or_else(|| ctx.config.management_audience.clone());

    let token = with_spinner(
        format!("Requesting token for {}", audience),
        fetch_access_token(
            ctx.tokens.as_ref(),
            &ctx.store,
            session.as_ref(),
            Some(&audience),
        ),
    )
    .await?;

    println!("{}", token);
    Ok(())
}
