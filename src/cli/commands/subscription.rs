//! Subscription checks

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::ops::validate_subscription;

#[derive(Args)]
pub struct SubscriptionCommands {
    #[command(subcommand)]
    pub command: SubscriptionSubcommands,
}

#[derive(Subcommand)]
pub enum SubscriptionSubcommands {
    /// Compare the session's subscription name with an expected name
    Validate {
        /// Expected subscription display name
        #[arg(long)]
        expected: String,
        /// Subscription of a saved session (defaults to the current session)
        #[arg(long)]
        subscription: Option<String>,
    },
}

pub async fn handle_subscription_command(ctx: &AppContext, args: SubscriptionCommands) -> Result<()> {
    match args.command {
        SubscriptionSubcommands::Validate {
            expected,
            subscription,
        } => {
            let session = ctx.session(subscription.as_deref()).await?;
            println!("{}", validate_subscription(&session, &expected));
        }
    }

    Ok(())
}
