use anyhow::{Context, Result};
use azure_core::credentials::{Secret, TokenCredential};
use azure_identity::ClientSecretCredential;
use log::info;
use std::sync::Arc;

/// Service principal credentials, read from the environment and never persisted
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: Secret,
}

impl ServicePrincipal {
    /// Read `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`.
    /// `Ok(None)` when none of them are set.
    pub fn from_env() -> Result<Option<ServicePrincipal>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<ServicePrincipal>> {
        let tenant_id = lookup("AZURE_TENANT_ID").filter(|v| !v.is_empty());
        let client_id = lookup("AZURE_CLIENT_ID").filter(|v| !v.is_empty());
        let client_secret = lookup("AZURE_CLIENT_SECRET").filter(|v| !v.is_empty());

        match (tenant_id, client_id, client_secret) {
            (None, None, None) => Ok(None),
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                info!("Using service principal {} from environment", client_id);
                Ok(Some(ServicePrincipal {
                    tenant_id,
                    client_id,
                    client_secret: Secret::new(client_secret),
                }))
            }
            (tenant_id, client_id, client_secret) => {
                let missing: Vec<&str> = [
                    ("AZURE_TENANT_ID", tenant_id.is_none()),
                    ("AZURE_CLIENT_ID", client_id.is_none()),
                    ("AZURE_CLIENT_SECRET", client_secret.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                anyhow::bail!(
                    "Incomplete service principal configuration, missing: {}",
                    missing.join(", ")
                )
            }
        }
    }

    /// Client secret credential for this principal's home tenant
    pub fn credential(&self) -> Result<Arc<dyn TokenCredential>> {
        let credential: Arc<dyn TokenCredential> = ClientSecretCredential::new(
            &self.tenant_id,
            self.client_id.clone(),
            self.client_secret.clone(),
            None,
        )
        .with_context(|| {
            format!(
                "Failed to create credential for service principal {}",
                self.client_id
            )
        })?;
        Ok(credential)
    }
}
