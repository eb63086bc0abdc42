//! Wire models shared by the service and the HTTP layer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

//
// ================= SAM Entities API =================
//

/// Response body of the SAM Entities API. Each entity is kept as raw JSON so
/// sections the tool doesn't interpret pass through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryResponse {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub entity_data: Vec<Value>,
}

//
// ================= samToolsData =================
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarText {
    #[serde(rename = "52.204-26.c.1")]
    pub c1: Option<String>,
    #[serde(rename = "52.204-26.c.2")]
    pub c2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EightEightNineSummary {
    pub is_compliant: bool,
    pub status_text: String,
    pub elaborated_status_text: String,
    pub far_provision_date: Option<String>,
    pub far_text: FarText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionsSummary {
    pub has_exclusions: bool,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub is_active: bool,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfLinks {
    #[serde(rename = "entityPDF")]
    pub entity_pdf: String,
}

/// Decoration added to every entity under the `samToolsData` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub is_selectable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_links: Option<PdfLinks>,
    pub eight_eight_nine: EightEightNineSummary,
    pub exclusions: ExclusionsSummary,
    pub registration: RegistrationSummary,
}

//
// ================= Tool responses =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub entity_data: Vec<Value>,
    pub total_records: u64,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![message.into()],
        }
    }
}

/// Everything the compliance summary renderer needs for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummaryDocument {
    pub success: bool,
    pub date_generated: String,
    pub filename: String,
    pub entity_data: Value,
    pub external_links: BTreeMap<String, String>,
}
