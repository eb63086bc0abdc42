//! SAM Entities API client
//!
//! Uses the sensitive-API process: the API key travels in the `X-api-key`
//! header, never in the URL, and search filters go in the query string.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::config::Config;
use crate::error::SamToolError;
use crate::models::RegistryResponse;
use crate::query_builder::SamQuery;
use crate::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

pub const REGISTRY_UNAVAILABLE_MESSAGE: &str = "SAM Entities API services cannot be accessed \
right now. Please try again later. This occurs when the SAM Entities API returns an error, \
is down for maintenance, or cannot be reached.";

/// The external entity registry searched by the tool
#[async_trait::async_trait]
pub trait EntityRegistry: Send + Sync {
    async fn search(&self, query: &SamQuery) -> Result<RegistryResponse>;
}

/// Reusable SAM client (connection-pooled)
pub struct SamClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SamClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.sam_api_key.clone(),
            endpoint: config.sam_api_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl EntityRegistry for SamClient {
    async fn search(&self, query: &SamQuery) -> Result<RegistryResponse> {
        let api_key = query.api_key().unwrap_or(&self.api_key);
        let params = query.to_query_pairs();

        info!(
            category = ?query.classified.category,
            params = ?params.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            "Calling SAM Entities API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("SAM Entities API request failed: {}", e);
                SamToolError::Registry(REGISTRY_UNAVAILABLE_MESSAGE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "SAM Entities API error response: {}", error_text);
            return Err(SamToolError::Registry(REGISTRY_UNAVAILABLE_MESSAGE.to_string()));
        }

        let body: RegistryResponse = response.json().await.map_err(|e| {
            error!("Failed to parse SAM Entities API response: {}", e);
            SamToolError::Registry(REGISTRY_UNAVAILABLE_MESSAGE.to_string())
        })?;

        info!(
            total_records = body.total_records,
            returned = body.entity_data.len(),
            "SAM Entities API response received"
        );

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_response_defaults() {
        let body: RegistryResponse = serde_json::from_str(r#"{"totalRecords": 3}"#).unwrap();
        assert_eq!(body.total_records, 3);
        assert!(body.entity_data.is_empty());
    }

    #[test]
    fn test_client_builds_from_config() {
        let client = SamClient::new(&Config::with_api_key("key")).unwrap();
        assert_eq!(client.endpoint, crate::config::DEFAULT_SAM_API_URL);
        assert_eq!(client.api_key, "key");
    }
}
