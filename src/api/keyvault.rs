//! Key Vault secret reads

use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_core::http::StatusCode;
use azure_security_keyvault_secrets::SecretClient;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::OpsError;

const SERVICE: &str = "Key Vault";

/// A store of named secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Current value of `secret_name` in `vault_name`
    async fn get_secret(&self, vault_name: &str, secret_name: &str) -> Result<String>;
}

/// Key Vault reads through `SecretClient`, one client per vault, all signed
/// with the same credential
pub struct KeyVaultClient {
    credential: Arc<dyn TokenCredential>,
    vault_dns_suffix: String,
    clients: Mutex<HashMap<String, Arc<SecretClient>>>,
}

impl KeyVaultClient {
    pub fn new(credential: Arc<dyn TokenCredential>, vault_dns_suffix: impl Into<String>) -> Self {
        Self {
            credential,
            vault_dns_suffix: vault_dns_suffix.into(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    async fn client(&self, vault_name: &str) -> Result<Arc<SecretClient>> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(vault_name) {
            return Ok(client.clone());
        }

        let url = vault_url(vault_name, &self.vault_dns_suffix);
        debug!("Creating secret client for {}", url);
        let client = Arc::new(
            SecretClient::new(&url, self.credential.clone(), None)
                .with_context(|| format!("Failed to create secret client for {}", url))?,
        );
        clients.insert(vault_name.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl SecretStore for KeyVaultClient {
    async fn get_secret(&self, vault_name: &str, secret_name: &str) -> Result<String> {
        let client = self.client(vault_name).await?;

        let secret = match client.get_secret(secret_name, None).await {
            Ok(response) => response.into_model().with_context(|| {
                format!("Failed to decode secret '{}' from vault '{}'", secret_name, vault_name)
            })?,
            Err(err) if err.http_status() == Some(StatusCode::NotFound) => {
                return Err(secret_not_found(vault_name, secret_name).into());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context(format!(
                    "Failed to read secret '{}' from vault '{}'",
                    secret_name, vault_name
                )));
            }
        };

        secret
            .value
            .ok_or_else(|| secret_not_found(vault_name, secret_name).into())
    }
}

/// Data plane URL of a vault, e.g. `https://ops-kv.vault.azure.net`
pub fn vault_url(vault_name: &str, dns_suffix: &str) -> String {
    format!("https://{}.{}", vault_name, dns_suffix.trim_start_matches('.'))
}

fn secret_not_found(vault_name: &str, secret_name: &str) -> OpsError {
    OpsError::Api {
        service: SERVICE,
        status: 404,
        code: "SecretNotFound".to_string(),
        message: format!("Secret '{}' not found in vault '{}'", secret_name, vault_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_url() {
        assert_eq!(vault_url("ops-kv", "vault.azure.net"), "https://ops-kv.vault.azure.net");
        assert_eq!(vault_url("ops-kv", ".vault.azure.cn"), "https://ops-kv.vault.azure.cn");
    }

    #[test]
    fn test_secret_not_found_is_a_404() {
        let err = secret_not_found("ops-kv", "web01-admin");
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Key Vault request failed (404): SecretNotFound: Secret 'web01-admin' not found in vault 'ops-kv'"
        );
    }
}
