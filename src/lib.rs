//! SAM Section 889 Compliance Tool
//!
//! Searches the SAM.gov Entities API from a single free-text input and
//! decorates every returned entity with its Section 889 status:
//! - Classifies the input (UEI, CAGE, NCAGE, website, business name)
//! - Builds the SAM Entities API parameters
//! - Evaluates FAR 52.204-26 representations, exclusions and registration
//! - Derives whether the entity is selectable
//!
//! FLOW:
//! INPUT → CLASSIFY → QUERY → SAM SEARCH → ADAPT → EVALUATE → DECORATE

pub mod adapter;
pub mod api;
pub mod classifier;
pub mod compliance;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod query_builder;
pub mod sam;
pub mod service;

pub use error::{Result, SamToolError};

// Re-export common types
pub use adapter::EntityAdapter;
pub use classifier::{ClassifiedQuery, SearchCategory, SearchClassifier};
pub use compliance::{EightEightNine, Exclusions, RegistrationStatus};
pub use query_builder::{QueryBuilder, SamQuery, SearchRequest};
pub use service::SearchService;
