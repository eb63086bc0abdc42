//! Search service - the Sam Tool request flow
//!
//! PARAMETERS → CLASSIFY → SAM SEARCH → DECORATE → PROJECT SECTIONS

use crate::adapter::EntityAdapter;
use crate::config::Config;
use crate::error::SamToolError;
use crate::models::{EntitySummaryDocument, PdfLinks, SearchResponse};
use crate::query_builder::{QueryBuilder, SearchRequest, SAM_TOOLS_SECTION};
use crate::sam::EntityRegistry;
use crate::Result;
use chrono::Local;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const SUMMARY_PATH: &str = "/api/file-download/summary";

pub struct SearchService {
    registry: Arc<dyn EntityRegistry>,
}

fn entity_uei(entity: &Value) -> Option<&str> {
    entity
        .get("entityRegistration")?
        .get("ueiSAM")?
        .as_str()
}

fn pdf_link(host_url: &str, uei: &str) -> String {
    format!(
        "{}{}?ueiSAM={}&entityEFTIndicator=",
        host_url.trim_end_matches('/'),
        SUMMARY_PATH,
        uei
    )
}

/// Keep only the requested sections plus `samToolsData`.
fn project_sections(entity: &Value, sections: &BTreeSet<String>, sam_tools_data: Value) -> Value {
    let mut projected = Map::new();

    for section in sections {
        if let Some(value) = entity.get(section) {
            projected.insert(section.clone(), value.clone());
        }
    }
    projected.insert(SAM_TOOLS_SECTION.to_string(), sam_tools_data);

    Value::Object(projected)
}

/// "Record of Section 889 Compliance - {name}.pdf", without '.' and ',' in the name.
pub fn summary_filename(legal_business_name: &str) -> String {
    let cleaned: String = legal_business_name
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();
    format!("Record of Section 889 Compliance - {}.pdf", cleaned)
}

impl SearchService {
    pub fn new(registry: Arc<dyn EntityRegistry>) -> Self {
        Self { registry }
    }

    /// Search SAM and decorate every returned entity with `samToolsData`.
    pub async fn search(&self, request: SearchRequest, host_url: &str) -> Result<SearchResponse> {
        let query = QueryBuilder::build(request);
        info!(category = ?query.classified.category, "Searching SAM entities");

        let response = self.registry.search(&query).await?;

        let mut entities = Vec::with_capacity(response.entity_data.len());
        for entity in &response.entity_data {
            let mut summary = EntityAdapter::summarize(entity);
            summary.pdf_links = entity_uei(entity).map(|uei| PdfLinks {
                entity_pdf: pdf_link(host_url, uei),
            });

            debug!(
                uei = entity_uei(entity).unwrap_or("-"),
                selectable = summary.is_selectable,
                status = %summary.eight_eight_nine.status_text,
                "Entity decorated"
            );

            let sam_tools_data = serde_json::to_value(&summary)?;
            entities.push(project_sections(entity, &query.include_sections, sam_tools_data));
        }

        Ok(SearchResponse {
            entity_data: entities,
            total_records: response.total_records,
            success: true,
        })
    }

    /// Data for the compliance summary of exactly one entity.
    pub async fn summary(
        &self,
        request: SearchRequest,
        host_url: &str,
    ) -> Result<EntitySummaryDocument> {
        let response = self.search(request, host_url).await?;

        let [entity] = <[Value; 1]>::try_from(response.entity_data).map_err(|entities| {
            SamToolError::BadRequest(format!(
                "summary requires exactly one entity, found {}",
                entities.len()
            ))
        })?;

        let legal_business_name = entity
            .get("entityRegistration")
            .and_then(|r| r.get("legalBusinessName"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(EntitySummaryDocument {
            success: true,
            date_generated: Local::now().format("%B %-d, %Y").to_string(),
            filename: summary_filename(legal_business_name),
            external_links: Config::external_links(),
            entity_data: entity,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::RegistryResponse;
    use crate::query_builder::SamQuery;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory registry returning canned entities and recording queries
    pub(crate) struct StubRegistry {
        pub entities: Vec<Value>,
        pub fail: bool,
        pub seen: Mutex<Vec<SamQuery>>,
    }

    impl StubRegistry {
        pub(crate) fn with_entities(entities: Vec<Value>) -> Self {
            Self {
                entities,
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                entities: vec![],
                fail: true,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl EntityRegistry for StubRegistry {
        async fn search(&self, query: &SamQuery) -> Result<RegistryResponse> {
            self.seen.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(SamToolError::Registry(
                    crate::sam::REGISTRY_UNAVAILABLE_MESSAGE.to_string(),
                ));
            }
            Ok(RegistryResponse {
                total_records: self.entities.len() as u64,
                entity_data: self.entities.clone(),
            })
        }
    }

    pub(crate) fn grainger() -> Value {
        json!({
            "entityRegistration": {
                "ueiSAM": "DBQGN324ULK3",
                "legalBusinessName": "W.W. GRAINGER, INC.",
                "exclusionStatusFlag": "N",
                "registrationStatus": "Active"
            },
            "coreData": { "physicalAddress": { "city": "Lake Forest" } },
            "repsAndCerts": {
                "certifications": {
                    "fARResponses": [{
                        "provisionId": "FAR 52.204-26",
                        "listOfAnswers": [
                            { "section": "52.204-26.c.1", "answerText": "No" },
                            { "section": "52.204-26.c.2", "answerText": "No" }
                        ]
                    }]
                }
            },
            "pointsOfContact": { "governmentBusinessPOC": {} }
        })
    }

    fn request(search: &str) -> SearchRequest {
        SearchRequest::from_query_pairs([
            ("samToolsSearch", search),
            ("includeSections", "samToolsData,entityRegistration,coreData"),
            ("registrationStatus", "A"),
        ])
    }

    #[tokio::test]
    async fn test_search_decorates_entities() {
        let registry = Arc::new(StubRegistry::with_entities(vec![grainger()]));
        let service = SearchService::new(registry.clone());

        let response = service
            .search(request("grainger"), "http://localhost:8080/")
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.total_records, 1);

        let entity = &response.entity_data[0];
        let tools = &entity["samToolsData"];
        assert_eq!(tools["isSelectable"], true);
        assert_eq!(tools["eightEightNine"]["statusText"], "COMPLIANT");
        assert_eq!(
            tools["pdfLinks"]["entityPDF"],
            "http://localhost:8080/api/file-download/summary?ueiSAM=DBQGN324ULK3&entityEFTIndicator="
        );

        // includeSections plus the required ones, nothing else
        assert!(entity.get("repsAndCerts").is_some());
        assert!(entity.get("coreData").is_some());
        assert!(entity.get("pointsOfContact").is_none());

        let seen = registry.seen.lock().unwrap();
        assert_eq!(
            seen[0].classified.fragment.get("q").map(String::as_str),
            Some("(legalBusinessName:grainger* OR dbaName:grainger*)")
        );
    }

    #[tokio::test]
    async fn test_search_tolerates_sparse_entities() {
        let registry = Arc::new(StubRegistry::with_entities(vec![json!({})]));
        let service = SearchService::new(registry);

        let response = service.search(request("acme"), "http://h").await.unwrap();
        let tools = &response.entity_data[0]["samToolsData"];
        assert_eq!(tools["isSelectable"], false);
        assert_eq!(tools["eightEightNine"]["statusText"], "NO REPS & CERTS");
        assert!(tools.get("pdfLinks").is_none());
    }

    #[test]
    fn test_registry_failure_propagates() {
        let service = SearchService::new(Arc::new(StubRegistry::failing()));
        let result = tokio_test::block_on(service.search(request("acme"), "http://h"));
        assert!(matches!(result, Err(SamToolError::Registry(_))));
    }

    #[tokio::test]
    async fn test_summary_requires_exactly_one_entity() {
        let service = SearchService::new(Arc::new(StubRegistry::with_entities(vec![
            grainger(),
            grainger(),
        ])));
        let result = service.summary(request("grainger"), "http://h").await;
        assert!(matches!(result, Err(SamToolError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_summary_document() {
        let service = SearchService::new(Arc::new(StubRegistry::with_entities(vec![grainger()])));
        let document = service
            .summary(request("DBQGN324ULK3"), "http://h")
            .await
            .unwrap();

        assert_eq!(
            document.filename,
            "Record of Section 889 Compliance - WW GRAINGER INC.pdf"
        );
        assert_eq!(document.entity_data["samToolsData"]["registration"]["isActive"], true);
        assert!(!document.date_generated.is_empty());
        assert!(document.external_links.contains_key("NF1883"));
    }
}
