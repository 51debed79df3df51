use anyhow::{Context, Result};
use log::debug;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::constants::{self, headers};
use super::models::ErrorEnvelope;
use crate::error::OpsError;

/// Thin HTTP client for the Resource Manager calls
#[derive(Clone)]
pub struct AzureClient {
    http_client: reqwest::Client,
}

impl AzureClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::user_agent())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http_client })
    }

    /// GET a JSON resource. `Ok(None)` when the service answers 404.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
    ) -> Result<Option<T>> {
        let response = self.send(Method::GET, url, token, None::<&()>).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} returned 404 for {}", service, url);
            return Ok(None);
        }

        Ok(Some(Self::parse(service, response).await?))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
    ) -> Result<T> {
        let response = self.send(Method::GET, url, token, None::<&()>).await?;
        Self::parse(service, response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        token: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::PUT, url, token, Some(body)).await?;
        Self::parse(service, response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .bearer_auth(token)
            .header(headers::CLIENT_REQUEST_ID, &request_id);

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, headers::CONTENT_TYPE_JSON)
                .json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;

        debug!("{} {} -> {} (request id {})", method, url, response.status(), request_id);
        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to decode {} response", service));
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(service, status.as_u16(), &body).into())
    }
}

/// Build an `OpsError::Api` from a non-success body, using the ARM error envelope when present
pub fn api_error(service: &'static str, status: u16, body: &str) -> OpsError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return OpsError::Api {
            service,
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        };
    }

    OpsError::Api {
        service,
        status,
        code: "Unknown".to_string(),
        message: body.trim().to_string(),
    }
}
