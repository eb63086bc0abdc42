//! Converts Sam Tool request parameters into SAM Entities API parameters.

use crate::classifier::{ClassifiedQuery, SearchClassifier};
use std::collections::{BTreeMap, BTreeSet};

pub const SEARCH_PARAM: &str = "samToolsSearch";
pub const INCLUDE_SECTIONS_PARAM: &str = "includeSections";
pub const API_KEY_PARAM: &str = "api_key";

/// Internal section added by this tool; never forwarded to SAM.
pub const SAM_TOOLS_SECTION: &str = "samToolsData";

pub const REQUIRED_SECTIONS: &[&str] = &["entityRegistration", "coreData", "repsAndCerts"];

/// Requested sections as they arrive: `[a,b,c]` / `a,b,c`, or already a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeSections {
    Delimited(String),
    Set(BTreeSet<String>),
}

impl IncludeSections {
    pub fn to_set(&self) -> BTreeSet<String> {
        match self {
            IncludeSections::Delimited(raw) => raw
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            IncludeSections::Set(sections) => sections.clone(),
        }
    }
}

/// Inbound Sam Tool search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub search: Option<String>,
    pub include_sections: Option<IncludeSections>,
    /// Passthrough SAM filters, first value wins
    pub filters: BTreeMap<String, String>,
}

impl SearchRequest {
    /// Build from raw query-string pairs. Repeated `includeSections` values are
    /// merged; other repeated keys keep their first value.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = SearchRequest::default();
        let mut sections: Option<BTreeSet<String>> = None;

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();

            match key.as_str() {
                SEARCH_PARAM => {
                    request.search.get_or_insert(value);
                }
                INCLUDE_SECTIONS_PARAM => {
                    sections
                        .get_or_insert_with(BTreeSet::new)
                        .extend(IncludeSections::Delimited(value).to_set());
                }
                _ => {
                    request.filters.entry(key).or_insert(value);
                }
            }
        }

        request.include_sections = sections.map(IncludeSections::Set);
        request
    }
}

/// Outbound SAM Entities API parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamQuery {
    pub include_sections: BTreeSet<String>,
    pub classified: ClassifiedQuery,
    pub filters: BTreeMap<String, String>,
}

impl SamQuery {
    /// Caller-supplied API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.filters.get(API_KEY_PARAM).map(String::as_str)
    }

    /// URL parameters in a stable order. The API key is never included; it
    /// travels as a header.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(key, _)| key.as_str() != API_KEY_PARAM)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        pairs.push((
            INCLUDE_SECTIONS_PARAM.to_string(),
            self.include_sections
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ));

        pairs.extend(
            self.classified
                .fragment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        pairs
    }
}

pub struct QueryBuilder;

impl QueryBuilder {
    /// Force the sections this tool needs, drop the internal marker, and
    /// replace the free-text search with its classified fragment.
    pub fn adapt_sections(requested: Option<&IncludeSections>) -> BTreeSet<String> {
        let mut sections = requested.map(IncludeSections::to_set).unwrap_or_default();
        sections.extend(REQUIRED_SECTIONS.iter().map(|s| s.to_string()));
        sections.remove(SAM_TOOLS_SECTION);
        sections
    }

    pub fn build(request: SearchRequest) -> SamQuery {
        let include_sections = Self::adapt_sections(request.include_sections.as_ref());
        let classified = SearchClassifier::classify(request.search.as_deref());

        let mut filters = request.filters;
        filters.remove(SEARCH_PARAM);
        filters.remove(INCLUDE_SECTIONS_PARAM);
        for field in classified.fragment.keys() {
            filters.remove(field);
        }

        SamQuery {
            include_sections,
            classified,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SearchCategory;

    fn required() -> BTreeSet<String> {
        REQUIRED_SECTIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_parameters() {
        let query = QueryBuilder::build(SearchRequest::default());
        assert_eq!(query.include_sections, required());
        assert!(query.filters.is_empty());
        assert_eq!(query.classified.category, SearchCategory::Empty);
    }

    #[test]
    fn test_samtools_section_is_removed() {
        let request = SearchRequest::from_query_pairs([(
            "includeSections",
            "samToolsData,entityRegistration,coreData",
        )]);
        assert_eq!(QueryBuilder::build(request).include_sections, required());
    }

    #[test]
    fn test_section_forms_are_equivalent() {
        let delimited = IncludeSections::Delimited("[samToolsData,entityRegistration,coreData]".into());
        let set = IncludeSections::Set(
            ["samToolsData", "entityRegistration", "coreData"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(
            QueryBuilder::adapt_sections(Some(&delimited)),
            QueryBuilder::adapt_sections(Some(&set))
        );
    }

    #[test]
    fn test_repeated_sections_are_merged() {
        let request = SearchRequest::from_query_pairs([
            ("includeSections", "samToolsData"),
            ("includeSections", "entityRegistration"),
            ("includeSections", "pointsOfContact"),
        ]);
        let sections = QueryBuilder::build(request).include_sections;
        assert!(sections.contains("pointsOfContact"));
        assert!(!sections.contains(SAM_TOOLS_SECTION));
        assert_eq!(sections.len(), 4);
    }

    #[test]
    fn test_search_param_is_consumed() {
        let request = SearchRequest::from_query_pairs([("samToolsSearch", "mcmaster carr")]);
        let pairs = QueryBuilder::build(request).to_query_pairs();
        assert!(pairs.iter().all(|(k, _)| k != SEARCH_PARAM));
    }

    #[test]
    fn test_typical_call() {
        let request = SearchRequest::from_query_pairs([
            ("samToolsSearch", "mcmaster"),
            ("includeSections", "samToolsData,entityRegistration,coreData"),
            ("registrationStatus", "A"),
            ("purposeOfRegistrationCode", "Z2~Z5"),
            ("entityEFTIndicator", ""),
        ]);
        let query = QueryBuilder::build(request);

        assert_eq!(query.include_sections, required());
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("entityEFTIndicator".to_string(), "".to_string()),
                ("purposeOfRegistrationCode".to_string(), "Z2~Z5".to_string()),
                ("registrationStatus".to_string(), "A".to_string()),
                (
                    "includeSections".to_string(),
                    "coreData,entityRegistration,repsAndCerts".to_string()
                ),
                (
                    "q".to_string(),
                    "(legalBusinessName:mcmaster* OR dbaName:mcmaster*)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_fragment_overrides_passthrough_field() {
        let request = SearchRequest::from_query_pairs([
            ("samToolsSearch", "K3B5JE3ZS915"),
            ("ueiSAM", "SOMETHINGELSE"),
        ]);
        let pairs = QueryBuilder::build(request).to_query_pairs();
        let uei: Vec<_> = pairs.iter().filter(|(k, _)| k == "ueiSAM").collect();
        assert_eq!(uei.len(), 1);
        assert_eq!(uei[0].1, "K3B5JE3ZS915");
    }

    #[test]
    fn test_api_key_is_not_a_url_parameter() {
        let request = SearchRequest::from_query_pairs([("api_key", "secret"), ("samToolsSearch", "acme")]);
        let query = QueryBuilder::build(request);
        assert_eq!(query.api_key(), Some("secret"));
        assert!(query.to_query_pairs().iter().all(|(k, _)| k != API_KEY_PARAM));
    }
}
