pub mod auth;
pub mod config;
pub mod connect;
pub mod deployment;
pub mod group;
pub mod servers;
pub mod subscription;
pub mod token;

pub use auth::{AuthCommands, handle_auth_command};
pub use config::{ConfigCommands, handle_config_command};
pub use connect::{ConnectCommands, handle_connect_command};
pub use deployment::{DeploymentCommands, handle_deployment_command};
pub use group::{GroupCommands, handle_group_command};
pub use servers::{ServersCommands, handle_servers_command};
pub use subscription::{SubscriptionCommands, handle_subscription_command};
pub use token::{TokenCommands, handle_token_command};
