use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{ResourceGroup, ResourceGroupApi};
use crate::auth::Session;

/// Resource Manager naming rules for resource groups
static RESOURCE_GROUP_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-\w\.\(\)]{1,90}$").expect("valid resource group regex"));

/// Which branch `ensure_resource_group` took
#[derive(Debug, Clone, PartialEq)]
pub enum EnsureOutcome {
    Created(ResourceGroup),
    AlreadyExists(ResourceGroup),
}

impl EnsureOutcome {
    pub fn resource_group(&self) -> &ResourceGroup {
        match self {
            EnsureOutcome::Created(group) | EnsureOutcome::AlreadyExists(group) => group,
        }
    }

    pub fn into_resource_group(self) -> ResourceGroup {
        match self {
            EnsureOutcome::Created(group) | EnsureOutcome::AlreadyExists(group) => group,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, EnsureOutcome::Created(_))
    }
}

pub fn validate_resource_group_name(name: &str) -> Result<()> {
    if !RESOURCE_GROUP_NAME.is_match(name) || name.ends_with('.') {
        anyhow::bail!(
            "Invalid resource group name '{}': use 1-90 letters, digits, '_', '-', '.', '(' or ')', not ending in '.'",
            name
        );
    }
    Ok(())
}

/// Look up `name`; create it at `location` only when it does not exist yet.
/// An existing group is returned as-is with a warning. Creation errors are
/// returned to the caller.
pub async fn ensure_resource_group(
    api: &dyn ResourceGroupApi,
    session: &Session,
    name: &str,
    location: &str,
) -> Result<EnsureOutcome> {
    validate_resource_group_name(name)?;

    let existing = api
        .get_resource_group(session, name)
        .await
        .with_context(|| format!("Failed to look up resource group '{}'", name))?;

    if let Some(group) = existing {
        warn!(
            "Resource group '{}' already exists in {} (subscription '{}')",
            group.name, group.location, session.subscription_name
        );
        return Ok(EnsureOutcome::AlreadyExists(group));
    }

    let group = api
        .create_resource_group(session, name, location)
        .await
        .with_context(|| format!("Failed to create resource group '{}' in {}", name, location))?;

    info!("Created resource group '{}' in {}", group.name, group.location);
    Ok(EnsureOutcome::Created(group))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_group_names() {
        let longest = "x".repeat(90);
        let too_long = "x".repeat(91);

        for ok in ["prod-rg", "rg_01", "a", "app.(eu)", longest.as_str()] {
            assert!(validate_resource_group_name(ok).is_ok(), "{ok} should be valid");
        }
        for bad in ["", "ends.", "has space", "slash/rg", too_long.as_str()] {
            assert!(validate_resource_group_name(bad).is_err(), "{bad} should be invalid");
        }
    }
}
