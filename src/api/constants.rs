//! Endpoints, API versions and audiences for the Azure services we call

pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Resource audience for Azure Resource Manager tokens
pub const MANAGEMENT_AUDIENCE: &str = "https://management.core.windows.net/";

/// Resource audience for Key Vault data plane tokens
pub const VAULT_AUDIENCE: &str = "https://vault.azure.net";

pub const VAULT_DNS_SUFFIX: &str = "vault.azure.net";

/// API versions per service
pub mod versions {
    pub const RESOURCE_GROUPS: &str = "2021-04-01";
    pub const SUBSCRIPTIONS: &str = "2022-12-01";
}

/// Standard headers for Azure REST requests
pub mod headers {
    pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

pub fn user_agent() -> String {
    format!("azure-ops/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a resource group endpoint URL
pub fn resource_group_endpoint(base_url: &str, subscription_id: &str, name: &str) -> String {
    format!(
        "{}/subscriptions/{}/resourcegroups/{}?api-version={}",
        base_url.trim_end_matches('/'),
        subscription_id,
        urlencoding::encode(name),
        versions::RESOURCE_GROUPS
    )
}

/// Build the subscription list endpoint URL
pub fn subscriptions_endpoint(base_url: &str) -> String {
    format!(
        "{}/subscriptions?api-version={}",
        base_url.trim_end_matches('/'),
        versions::SUBSCRIPTIONS
    )
}
