//! Saved session management

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

use crate::auth::{AccountKind, SessionStore};
use crate::cli::context::AppContext;

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Show the current session
    Status,
    /// Forget the current session
    Logout {
        /// Forget every saved session
        #[arg(long)]
        all: bool,
    },
}

pub async fn handle_auth_command(ctx: &AppContext, args: AuthCommands) -> Result<()> {
    match args.command {
        AuthSubcommands::Status => status(ctx).await,
        AuthSubcommands::Logout { all } => {
            let removed = ctx.store.remove(all).await?;
            println!("Removed {} saved session(s)", removed);
            Ok(())
        }
    }
}

async fn status(ctx: &AppContext) -> Result<()> {
    println!();
    println!("  {}", "Azure session status".bright_blue().bold());
    println!("  {}", "════════════════════".bright_blue());
    println!();

    let Some(session) = ctx.store.current().await? else {
        println!("  {}", "Not connected".bright_yellow().bold());
        println!("  {}", "Sign in with one of:".dimmed());
        println!("    {}", "azure-ops connect --tenant <id>".cyan());
        println!("    {}", "azure-ops connect --subscription <id>".cyan());
        return Ok(());
    };

    let kind = match session.account.kind {
        AccountKind::User => "User",
        AccountKind::ServicePrincipal => "Service principal",
    };

    println!("  {}: {}", "Account".dimmed(), session.account.id.bright_green().bold());
    println!("  {}: {}", "Type".dimmed(), kind.bright_blue());
    println!("  {}: {}", "Tenant".dimmed(), session.tenant_id.white());
    println!(
        "  {}: {} ({})",
        "Subscription".dimmed(),
        session.subscription_name.bright_yellow(),
        session.subscription_id.white()
    );
    println!("  {}: {}", "Session file".dimmed(), format!("{:?}", ctx.store.path()).cyan());
    println!();

    Ok(())
}
