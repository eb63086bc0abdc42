//! Runtime configuration
//!
//! Read from the environment (and a `.env` file, if present) once at start-up.

use crate::error::SamToolError;
use crate::Result;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

pub const DEFAULT_SAM_API_URL: &str = "https://api.sam.gov/entity-information/v3/entities";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PORT: u16 = 8080;

/// Links shown on generated compliance summaries.
pub const EXTERNAL_LINKS: &[(&str, &str)] = &[
    ("SAM.GOV", "https://sam.gov"),
    ("SAM_ENTITIES_API_DOCS", "https://open.gsa.gov/api/entity-api/"),
    ("NF1883", "https://forms.neacc.nasa.gov/documents/11002/305376/NF1883.pdf"),
];

#[derive(Debug, Clone)]
pub struct Config {
    pub sam_api_key: String,
    pub sam_api_url: String,
    pub request_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let sam_api_key = env::var("SAM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SamToolError::Config("SAM_API_KEY has not been set".to_string()))?;

        let sam_api_url = env::var("SAM_API_URL").unwrap_or_else(|_| DEFAULT_SAM_API_URL.to_string());

        let timeout_secs = match env::var("SAM_API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                SamToolError::Config(format!("SAM_API_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let port = match env::var("PORT").or_else(|_| env::var("API_PORT")) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| SamToolError::Config(format!("PORT '{}': {}", raw, e)))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            sam_api_key,
            sam_api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }

    /// Configuration for tests and local tooling; no environment access.
    pub fn with_api_key(sam_api_key: impl Into<String>) -> Self {
        Self {
            sam_api_key: sam_api_key.into(),
            sam_api_url: DEFAULT_SAM_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }

    pub fn external_links() -> BTreeMap<String, String> {
        EXTERNAL_LINKS
            .iter()
            .map(|(name, url)| (name.to_string(), url.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::with_api_key("key");
        assert_eq!(config.sam_api_url, DEFAULT_SAM_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_external_links() {
        let links = Config::external_links();
        assert_eq!(links.len(), 3);
        assert_eq!(links.get("SAM.GOV").map(String::as_str), Some("https://sam.gov"));
    }
}
