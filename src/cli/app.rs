use super::commands::{
    AuthCommands, ConfigCommands, ConnectCommands, DeploymentCommands, GroupCommands, ServersCommands,
    SubscriptionCommands, TokenCommands,
};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "azure-ops")]
#[command(about = "Automation helpers for Azure resource groups, sign-in, tokens and Key Vault credentials")]
#[command(version)]
pub struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Config file (defaults to config.toml in the config directory)
    #[arg(long, global = true, env = "AZURE_OPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resource group management
    Group(GroupCommands),
    /// Deployment name generation
    Deployment(DeploymentCommands),
    /// Subscription checks
    Subscription(SubscriptionCommands),
    /// Print an access token for a resource audience
    Token(TokenCommands),
    /// Make sure a session exists for a tenant or subscription
    Connect(ConnectCommands),
    /// Load the server inventory with passwords from Key Vault
    Servers(ServersCommands),
    /// Saved session management
    Auth(AuthCommands),
    /// Show or initialize the config file
    Config(ConfigCommands),
}
