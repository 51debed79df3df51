//! Services shared by the command handlers

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ArmClient, AzureClient, KeyVaultClient};
use crate::auth::token::credential_for;
use crate::auth::{
    ConnectTarget, FileSessionStore, IdentitySignIn, IdentityTokenProvider, Session, SessionStore,
};
use crate::config::Config;

pub struct AppContext {
    pub config: Config,
    pub client: AzureClient,
    pub store: FileSessionStore,
    pub tokens: Arc<IdentityTokenProvider>,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let client = AzureClient::new(Duration::from_secs(config.request_timeout_secs))?;
        let store = FileSessionStore::new(Config::sessions_path()?);
        let tokens = Arc::new(IdentityTokenProvider::new());

        Ok(Self {
            config,
            client,
            store,
            tokens,
        })
    }

    /// The saved session for `subscription`, or the current one
    pub async fn session(&self, subscription: Option<&str>) -> Result<Session> {
        let session = match subscription {
            Some(id) => {
                self.store
                    .find(&ConnectTarget::Subscription(id.to_string()))
                    .await?
            }
            None => self.store.current().await?,
        };

        session.ok_or_else(|| {
            anyhow::anyhow!(
                "Not connected{}. Run 'azure-ops connect --tenant <id>' or 'azure-ops connect --subscription <id>' first.",
                subscription.map(|s| format!(" to subscription '{}'", s)).unwrap_or_default()
            )
        })
    }

    pub fn arm(&self) -> ArmClient {
        ArmClient::new(
            self.client.clone(),
            self.tokens.clone(),
            self.config.management_endpoint.clone(),
            self.config.management_audience.clone(),
        )
    }

    /// Key Vault reads signed as the account behind `session`
    pub fn key_vault(&self, session: &Session) -> Result<KeyVaultClient> {
        Ok(KeyVaultClient::new(
            credential_for(session)?,
            self.config.vault_dns_suffix.clone(),
        ))
    }

    pub fn sign_in(&self) -> IdentitySignIn {
        IdentitySignIn::new(self.client.clone(), self.config.clone())
    }
}
