//! Error types for the SAM search tool

use thiserror::Error;

/// Result type alias for search and compliance operations
pub type Result<T> = std::result::Result<T, SamToolError>;

#[derive(Error, Debug)]
pub enum SamToolError {

    // =============================
    // Compliance Rule Errors
    // =============================

    #[error("{provision_id} not in {legal_ids:?}")]
    InvalidProvisionId {
        provision_id: String,
        legal_ids: Vec<&'static str>,
    },

    #[error("{provision_id}: answer '{answer}' is neither 'Yes' nor 'No'")]
    InvalidProvisionAnswer {
        provision_id: String,
        answer: String,
    },

    // =============================
    // Search Input Errors
    // =============================

    #[error("Malformed host input: {0}")]
    MalformedHostInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // =============================
    // Plumbing Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Registry(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
