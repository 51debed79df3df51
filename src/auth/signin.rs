//! Interactive and service principal sign-in

use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use colored::*;
use log::{debug, info, warn};
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

use super::credentials::ServicePrincipal;
use super::session::{Account, AccountKind, ConnectTarget, Session};
use super::token::{cli_credential, request_token};
use crate::api::client::AzureClient;
use crate::api::models::Subscription;
use crate::api::resources::list_subscriptions;
use crate::config::Config;

#[cfg(windows)]
const AZ: &str = "az.cmd";
#[cfg(not(windows))]
const AZ: &str = "az";

/// Produces a fresh session for a tenant or subscription
#[async_trait]
pub trait SignIn: Send + Sync {
    async fn sign_in(&self, target: &ConnectTarget) -> Result<Session>;
}

/// One entry of the subscription list `az login` prints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliAccount {
    tenant_id: String,
    #[serde(default)]
    is_default: bool,
    user: CliUser,
}

#[derive(Debug, Deserialize)]
struct CliUser {
    name: String,
}

/// Who `az login` signed in, and the tenant it defaulted to
#[derive(Debug, PartialEq)]
pub struct CliLogin {
    pub user: String,
    pub tenant_id: Option<String>,
}

/// Read the JSON `az login` writes to stdout
pub fn parse_login_output(stdout: &str) -> Result<CliLogin> {
    let accounts: Vec<CliAccount> =
        serde_json::from_str(stdout).context("Failed to parse az login output")?;

    let default = accounts
        .iter()
        .find(|a| a.is_default)
        .or_else(|| accounts.first())
        .ok_or_else(|| anyhow::anyhow!("az login returned no accounts"))?;

    Ok(CliLogin {
        user: default.user.name.clone(),
        tenant_id: Some(default.tenant_id.clone()).filter(|t| !t.is_empty()),
    })
}

/// Sign-in through `azure_identity`: a client secret credential when a
/// service principal is configured in the environment, an interactive
/// `az login` otherwise
pub struct IdentitySignIn {
    client: AzureClient,
    config: Config,
}

impl IdentitySignIn {
    pub fn new(client: AzureClient, config: Config) -> Self {
        Self { client, config }
    }

    async fn az_login(&self, tenant: Option<&str>) -> Result<CliLogin> {
        let mut command = Command::new(AZ);
        command.args(["login", "--output", "json"]);
        if let Some(tenant) = tenant {
            command.args(["--tenant", tenant]);
        }

        eprintln!("{}", "Signing in with the Azure CLI...".bright_yellow());
        let output = command
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped())
            .output()
            .await
            .context("Failed to run az login; is the Azure CLI installed?")?;

        if !output.status.success() {
            anyhow::bail!("az login failed ({})", output.status);
        }

        parse_login_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl SignIn for IdentitySignIn {
    async fn sign_in(&self, target: &ConnectTarget) -> Result<Session> {
        let (credential, account, token_tenant): (Arc<dyn TokenCredential>, Account, Option<String>) =
            match ServicePrincipal::from_env()? {
                Some(sp) => {
                    info!("Signing in as service principal {}", sp.client_id);
                    let account = Account {
                        id: sp.client_id.clone(),
                        kind: AccountKind::ServicePrincipal,
                    };
                    (sp.credential()?, account, Some(sp.tenant_id))
                }
                None => {
                    info!("Starting interactive sign-in for {}", target);
                    let login = self.az_login(target.tenant()).await?;
                    let account = Account {
                        id: login.user,
                        kind: AccountKind::User,
                    };
                    (cli_credential(target.tenant())?, account, login.tenant_id)
                }
            };

        let token = request_token(credential.as_ref(), &self.config.management_audience).await?;
        let subscriptions =
            list_subscriptions(&self.client, &self.config.management_endpoint, &token.access_token)
                .await?;
        debug!("Account can see {} subscriptions", subscriptions.len());

        let subscription = choose_subscription(&subscriptions, target, token_tenant.as_deref())
            .ok_or_else(|| anyhow::anyhow!("No subscriptions found for {}", account.id))?;

        Ok(Session {
            account,
            tenant_id: subscription.tenant_id.clone(),
            subscription_id: subscription.subscription_id.clone(),
            subscription_name: subscription.display_name.clone(),
        })
    }
}

/// Pick the subscription a new session binds to: the requested one when
/// visible, otherwise the first in the requested (or signed-in) tenant,
/// otherwise the first one at all.
pub fn choose_subscription<'a>(
    subscriptions: &'a [Subscription],
    target: &ConnectTarget,
    token_tenant: Option<&str>,
) -> Option<&'a Subscription> {
    let wanted_tenant = match target {
        ConnectTarget::Tenant(id) => Some(id.as_str()),
        ConnectTarget::Subscription(id) => {
            if let Some(found) = subscriptions
                .iter()
                .find(|s| s.subscription_id.eq_ignore_ascii_case(id))
            {
                return Some(found);
            }
            warn!("Subscription '{}' is not visible to the signed-in account", id);
            token_tenant
        }
    };

    wanted_tenant
        .and_then(|tenant| {
            subscriptions
                .iter()
                .find(|s| s.tenant_id.eq_ignore_ascii_case(tenant))
        })
        .or_else(|| subscriptions.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: &str, tenant: &str) -> Subscription {
        Subscription {
            subscription_id: id.to_string(),
            display_name: format!("{id}-name"),
            tenant_id: tenant.to_string(),
            state: Some("Enabled".to_string()),
        }
    }

    #[test]
    fn test_choose_requested_subscription() {
        let subs = vec![sub("a", "t-1"), sub("b", "t-2")];
        let chosen = choose_subscription(&subs, &ConnectTarget::Subscription("B".into()), None);
        assert_eq!(chosen.unwrap().subscription_id, "b");
    }

    #[test]
    fn test_choose_first_in_tenant() {
        let subs = vec![sub("a", "t-1"), sub("b", "t-2"), sub("c", "t-2")];
        let chosen = choose_subscription(&subs, &ConnectTarget::Tenant("t-2".into()), None);
        assert_eq!(chosen.unwrap().subscription_id, "b");
    }

    #[test]
    fn test_missing_subscription_falls_back_to_token_tenant() {
        let subs = vec![sub("a", "t-1"), sub("b", "t-2")];
        let chosen =
            choose_subscription(&subs, &ConnectTarget::Subscription("zzz".into()), Some("t-2"));
        assert_eq!(chosen.unwrap().subscription_id, "b");
    }

    #[test]
    fn test_no_subscriptions() {
        assert!(choose_subscription(&[], &ConnectTarget::Tenant("t-1".into()), None).is_none());
    }

    #[test]
    fn test_login_output_uses_default_entry() {
        let login = parse_login_output(
            r#"[
                {"id":"sub-a","isDefault":false,"name":"Dev","tenantId":"t-1","user":{"name":"alice@contoso.com","type":"user"}},
                {"id":"sub-b","isDefault":true,"name":"Prod","tenantId":"t-2","user":{"name":"alice@contoso.com","type":"user"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            login,
            CliLogin {
                user: "alice@contoso.com".into(),
                tenant_id: Some("t-2".into()),
            }
        );
    }

    #[test]
    fn test_login_output_without_accounts() {
        let err = parse_login_output("[]").unwrap_err();
        assert!(err.to_string().contains("no accounts"));
        assert!(parse_login_output("Please sign in").is_err());
    }
}
