//! Server inventory command

use anyhow::Result;
use clap::Args;
use futures::StreamExt;
use log::info;
use std::path::PathBuf;

use crate::cli::context::AppContext;
use crate::ops::load_server_credentials;

#[derive(Args)]
pub struct ServersCommands {
    /// Server inventory JSON file (defaults to `servers_file` from config)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Key Vault holding the passwords (defaults to `default_vault` from config)
    #[arg(long)]
    pub vault: Option<String>,

    /// Only load the server with this name
    #[arg(long)]
    pub server: Option<String>,

    /// Print passwords instead of masking them
    #[arg(long)]
    pub show_secrets: bool,

    /// Subscription of a saved session (defaults to the current session)
    #[arg(long)]
    pub subscription: Option<String>,
}

/// Prints one JSON object per server as soon as its secret has been looked up
pub async fn handle_servers_command(ctx: &AppContext, args: ServersCommands) -> Result<()> {
    let file = args
        .file
        .or_else(|| ctx.config.servers_file.clone())
        .ok_or_else(|| anyhow::anyhow!("No server file given; pass --file or set servers_file in config"))?;
    let vault = args
        .vault
        .or_else(|| ctx.config.default_vault.clone())
        .ok_or_else(|| anyhow::anyhow!("No vault given; pass --vault or set default_vault in config"))?;

    let session = ctx.session(args.subscription.as_deref()).await?;
    let key_vault = ctx.key_vault(&session)?;

    let mut records = load_server_credentials(&key_vault, &file, &vault, args.server.as_deref())?;

    let mut count = 0usize;
    while let Some(record) = records.next().await {
        let shown = if args.show_secrets {
            record
        } else {
            record.redacted()
        };
        println!("{}", serde_json::to_string(&shown)?);
        count += 1;
    }

    info!("Loaded {} server records from {:?}", count, file);
    Ok(())
}
