//! Inspect and initialize `config.toml`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the effective configuration as TOML
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_config_command(config_path: Option<&Path>, args: ConfigCommands) -> Result<()> {
    let path = resolve_path(config_path)?;

    match args.command {
        ConfigSubcommands::Show => {
            let config = Config::load_from(&path)?;
            eprintln!("# {}", path.display());
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?
            );
            Ok(())
        }
        ConfigSubcommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite it.",
                    path.display()
                );
            }
            info!("Writing default config to {:?}", path);
            Config::default().save_to(&path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::get_config_path(),
    }
}
