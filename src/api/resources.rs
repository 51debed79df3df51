//! Azure Resource Manager: subscriptions and resource groups

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::json;
use std::sync::Arc;

use super::client::AzureClient;
use super::constants;
use super::models::{ResourceGroup, Subscription, SubscriptionList};
use crate::auth::{Session, TokenProvider};

const SERVICE: &str = "Resource Manager";

/// Resource group reads and writes within a session's subscription
#[async_trait]
pub trait ResourceGroupApi: Send + Sync {
    /// `Ok(None)` when the group does not exist
    async fn get_resource_group(&self, session: &Session, name: &str) -> Result<Option<ResourceGroup>>;

    async fn create_resource_group(
        &self,
        session: &Session,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup>;
}

/// Resource Manager client that fetches a management token per call
pub struct ArmClient {
    client: AzureClient,
    tokens: Arc<dyn TokenProvider>,
    endpoint: String,
    audience: String,
}

impl ArmClient {
    pub fn new(
        client: AzureClient,
        tokens: Arc<dyn TokenProvider>,
        endpoint: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            endpoint: endpoint.into(),
            audience: audience.into(),
        }
    }

    async fn token(&self, session: &Session) -> Result<String> {
        Ok(self.tokens.get_token(session, &self.audience).await?.access_token)
    }
}

#[async_trait]
impl ResourceGroupApi for ArmClient {
    async fn get_resource_group(&self, session: &Session, name: &str) -> Result<Option<ResourceGroup>> {
        let token = self.token(session).await?;
        let url = constants::resource_group_endpoint(&self.endpoint, &session.subscription_id, name);
        self.client.get_optional(SERVICE, &url, &token).await
    }

    async fn create_resource_group(
        &self,
        session: &Session,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup> {
        let token = self.token(session).await?;
        let url = constants::resource_group_endpoint(&self.endpoint, &session.subscription_id, name);
        debug!("Creating resource group {} in {}", name, location);
        self.client
            .put(SERVICE, &url, &token, &json!({ "location": location }))
            .await
    }
}

/// All subscriptions visible to a management token, following `nextLink`
pub async fn list_subscriptions(
    client: &AzureClient,
    endpoint: &str,
    token: &str,
) -> Result<Vec<Subscription>> {
    let mut subscriptions = Vec::new();
    let mut next = Some(constants::subscriptions_endpoint(endpoint));

    while let Some(url) = next {
        let page: SubscriptionList = client.get(SERVICE, &url, token).await?;
        subscriptions.extend(page.value);
        next = page.next_link;
    }

    Ok(subscriptions)
}
