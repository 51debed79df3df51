use chrono::{DateTime, Utc};

/// Timestamp suffix: `yyyyMMdd-HHmm` in UTC
const DEPLOYMENT_SUFFIX_FORMAT: &str = "%Y%m%d-%H%M";

/// The base a deployment name is built from. Exactly one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentBase {
    ResourceGroup(String),
    Name(String),
}

impl DeploymentBase {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentBase::ResourceGroup(base) | DeploymentBase::Name(base) => base,
        }
    }
}

/// `{base}_{yyyyMMdd-HHmm}` for the given instant.
/// Only unique to the minute; two calls in the same minute collide.
pub fn build_deployment_name(base: &DeploymentBase, now: DateTime<Utc>) -> String {
    format!("{}_{}", base.as_str(), now.format(DEPLOYMENT_SUFFIX_FORMAT))
}

/// `build_deployment_name` at the current wall-clock time
pub fn deployment_name(base: &DeploymentBase) -> String {
    build_deployment_name(base, Utc::now())
}
