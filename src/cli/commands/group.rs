//! Resource group commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::ui::with_spinner;
use crate::ops::ensure_resource_group;

#[derive(Args)]
pub struct GroupCommands {
    #[command(subcommand)]
    pub command: GroupSubcommands,
}

#[derive(Subcommand)]
pub enum GroupSubcommands {
    /// Create a resource group unless it already exists
    Ensure {
        /// Resource group name
        #[arg(long)]
        name: String,
        /// Azure region for a new group (defaults to `default_location` from config)
        #[arg(long)]
        location: Option<String>,
        /// Subscription of a saved session (defaults to the current session)
        #[arg(long)]
        subscription: Option<String>,
    },
}

pub async fn handle_group_command(ctx: &AppContext, args: GroupCommands) -> Result<()> {
    match args.command {
        GroupSubcommands::Ensure {
            name,
            location,
            subscription,
        } => {
            let location = location
                .or_else(|| ctx.config.default_location.clone())
                .ok_or_else(|| {
                    anyhow::anyhow!("No location given; pass --location or set default_location in config")
                })?;

            let session = ctx.session(subscription.as_deref()).await?;
            let arm = ctx.arm();
            let outcome = with_spinner(
                format!("Ensuring resource group {}", name),
                ensure_resource_group(&arm, &session, &name, &location),
            )
            .await?;

            println!("{}", serde_json::to_string_pretty(outcome.resource_group())?);
        }
    }

    Ok(())
}
