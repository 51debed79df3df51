use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::{AzureCliCredential, AzureCliCredentialOptions};
use log::{debug, info};
use std::sync::Arc;
use std::time::SystemTime;

use super::credentials::ServicePrincipal;
use super::session::{AccountKind, Session};
use crate::api::models::TokenInfo;

/// Exchanges a session for a bearer token scoped to one resource audience
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self, session: &Session, audience: &str) -> Result<TokenInfo>;
}

/// Token provider backed by `azure_identity` credentials: the Azure CLI's
/// sign-in for users, a client secret credential for service principals
#[derive(Debug, Default)]
pub struct IdentityTokenProvider;

impl IdentityTokenProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenProvider for IdentityTokenProvider {
    async fn get_token(&self, session: &Session, audience: &str) -> Result<TokenInfo> {
        debug!(
            "Requesting token for {} as {} in tenant {}",
            audience, session.account.id, session.tenant_id
        );
        let credential = credential_for(session)?;
        request_token(credential.as_ref(), audience).await
    }
}

/// The credential that signs requests for `session`
pub fn credential_for(session: &Session) -> Result<Arc<dyn TokenCredential>> {
    match session.account.kind {
        AccountKind::User => cli_credential(Some(&session.tenant_id)),
        AccountKind::ServicePrincipal => {
            let sp = ServicePrincipal::from_env()?.ok_or_else(|| {
                anyhow::anyhow!(
                    "Session for service principal {} needs AZURE_CLIENT_SECRET in the environment",
                    session.account.id
                )
            })?;
            if !sp.client_id.eq_ignore_ascii_case(&session.account.id) {
                anyhow::bail!(
                    "AZURE_CLIENT_ID '{}' does not match session account '{}'",
                    sp.client_id,
                    session.account.id
                );
            }
            sp.credential()
        }
    }
}

/// Credential that reuses the Azure CLI's signed-in account
pub fn cli_credential(tenant: Option<&str>) -> Result<Arc<dyn TokenCredential>> {
    let options = AzureCliCredentialOptions {
        tenant_id: tenant.map(str::to_string),
        ..Default::default()
    };
    let credential: Arc<dyn TokenCredential> =
        AzureCliCredential::new(Some(options)).context("Failed to create Azure CLI credential")?;
    Ok(credential)
}

/// `.default` scope for a v1 resource audience
/// (`https://management.core.windows.net/` -> `https://management.core.windows.net/.default`)
pub fn scope_for(audience: &str) -> String {
    format!("{}/.default", audience.trim_end_matches('/'))
}

/// Ask `credential` for a token scoped to `audience`
pub async fn request_token(credential: &dyn TokenCredential, audience: &str) -> Result<TokenInfo> {
    let scope = scope_for(audience);
    let token = credential
        .get_token(&[scope.as_str()], None)
        .await
        .with_context(|| format!("Failed to get token for {}", audience))?;

    info!("Token obtained for {}", audience);
    Ok(TokenInfo {
        access_token: token.token.secret().to_string(),
        expires_at: SystemTime::from(token.expires_on),
    })
}
