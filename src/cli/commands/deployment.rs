//! Deployment name generation

use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};

use crate::ops::{DeploymentBase, deployment_name};

#[derive(Args)]
pub struct DeploymentCommands {
    #[command(subcommand)]
    pub command: DeploymentSubcommands,
}

#[derive(Subcommand)]
pub enum DeploymentSubcommands {
    /// Print `<base>_<yyyyMMdd-HHmm>` using the current UTC time
    #[command(group(ArgGroup::new("base").required(true).args(["resource_group", "name"])))]
    Name {
        /// Use a resource group name as the base
        #[arg(long)]
        resource_group: Option<String>,
        /// Use an explicit deployment base name
        #[arg(long)]
        name: Option<String>,
    },
}

pub async fn handle_deployment_command(args: DeploymentCommands) -> Result<()> {
    match args.command {
        DeploymentSubcommands::Name {
            resource_group,
            name,
        } => {
            let base = match (resource_group, name) {
                (Some(group), None) => DeploymentBase::ResourceGroup(group),
                (None, Some(name)) => DeploymentBase::Name(name),
                _ => anyhow::bail!("Pass exactly one of --resource-group or --name"),
            };

            println!("{}", deployment_name(&base));
        }
    }

    Ok(())
}
