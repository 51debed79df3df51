use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use azure_ops::cli::commands::{
    handle_auth_command, handle_config_command, handle_connect_command, handle_deployment_command, handle_group_command,
    handle_servers_command, handle_subscription_command, handle_token_command,
};
use azure_ops::cli::{AppContext, Cli, Commands};

fn init_logging(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    // Diagnostics never go to stdout; stdout carries command output only
    match &cli.log_file {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("Starting azure-ops");

    // Deployment names and config commands need no session
    let context = || AppContext::load(cli.config.as_deref());

    match cli.command {
        Commands::Deployment(args) => handle_deployment_command(args).await?,
        Commands::Config(args) => handle_config_command(cli.config.as_deref(), args).await?,
        Commands::Group(args) => handle_group_command(&context()?, args).await?,
        Commands::Subscription(args) => handle_subscription_command(&context()?, args).await?,
        Commands::Token(args) => handle_token_command(&context()?, args).await?,
        Commands::Connect(args) => handle_connect_command(&context()?, args).await?,
        Commands::Servers(args) => handle_servers_command(&context()?, args).await?,
        Commands::Auth(args) => handle_auth_command(&context()?, args).await?,
    }

    Ok(())
}
