//! The automation helpers. Each function is an independent entry point.

pub mod connect;
pub mod deployment;
pub mod resource_group;
pub mod servers;
pub mod subscription;
pub mod token;

pub use connect::ensure_connected;
pub use deployment::{DeploymentBase, build_deployment_name, deployment_name};
pub use resource_group::{EnsureOutcome, ensure_resource_group};
pub use servers::{Credential, ServerRecord, load_server_credentials, read_server_records};
pub use subscription::validate_subscription;
pub use token::fetch_access_token;
