//! Search Input Classifier
//!
//! Classifies a single free-text search into the SAM Entities API query it
//! should become:
//! - Unique Entity ID (`ueiSAM`)
//! - US CAGE code (`cageCode`)
//! - Potential NCAGE code (business name OR cageCode, since ordinary
//!   five-letter words share the shape)
//! - Website (`q` wildcard search over all fields)
//! - Business name (legalBusinessName OR dbaName)
//!
//! Rules are evaluated in order, first match wins.

use crate::error::SamToolError;
use crate::normalizer::{collapse_whitespace, normalize_business_name, strip_forbidden_chars};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::Ipv6Addr;
use tracing::debug;

pub const UEI_FIELD: &str = "ueiSAM";
pub const CAGE_CODE_FIELD: &str = "cageCode";
pub const QUERY_FIELD: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchCategory {
    UniqueEntityId,
    RegionalEquipmentCode,
    InternationalEquipmentCode,
    Website,
    BusinessName,
    Empty,
}

/// Result of classifying one search string. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedQuery {
    pub category: SearchCategory,
    pub fragment: BTreeMap<String, String>,
}

impl ClassifiedQuery {
    fn empty() -> Self {
        Self {
            category: SearchCategory::Empty,
            fragment: BTreeMap::new(),
        }
    }

    fn single(category: SearchCategory, field: &str, value: String) -> Self {
        let mut fragment = BTreeMap::new();
        fragment.insert(field.to_string(), value);
        Self { category, fragment }
    }
}

lazy_static! {
    /// Twelve positions, no leading zero, no I/O, numeric checksum last
    static ref UEI_PATTERN: Regex =
        Regex::new(r"(?i)^[A-HJ-NP-Z1-9][A-HJ-NP-Z0-9]{10}[0-9]$").unwrap();

    /// Five positions, numeric first and last, no I/O
    static ref US_CAGE_PATTERN: Regex =
        Regex::new(r"(?i)^[0-9][A-HJ-NP-Z0-9]{3}[0-9]$").unwrap();

    /// Bracketed IPvFuture literal, e.g. `[v1.fe]`
    static ref IP_FUTURE_PATTERN: Regex =
        Regex::new(r"^v[a-fA-F0-9]+\..+$").unwrap();
}

//
// ================= NCAGE country table =================
//

/// Allowed characters at one end of an NCAGE code.
#[derive(Debug, Clone, Copy)]
enum CodeEnd {
    Digit,
    Letters(&'static str),
    DigitOr(&'static str),
}

impl CodeEnd {
    fn matches(&self, c: char) -> bool {
        let c = c.to_ascii_uppercase();
        match self {
            CodeEnd::Digit => c.is_ascii_digit(),
            CodeEnd::Letters(letters) => letters.contains(c),
            CodeEnd::DigitOr(letters) => c.is_ascii_digit() || letters.contains(c),
        }
    }
}

use CodeEnd::{Digit, DigitOr, Letters};

/// (first, last, issuing country). First and last characters identify the
/// country; Tier 1 NATO countries also use S***# codes in SAM.
const NCAGE_TABLE: &[(CodeEnd, CodeEnd, &str)] = &[
    (Letters("I"), Digit, "NATO & International Org."),
    (Letters("S"), Digit, "Non-NATO Nations"),
    (Letters("A"), Letters("H"), "Albania"),
    (Letters("B"), Digit, "Belgium"),
    (Digit, Letters("U"), "Bulgaria"),
    (DigitOr("L"), Digit, "Canada"),
    (Letters("A"), Letters("B"), "Croatia"),
    (Digit, Letters("G"), "Czech Republic"),
    (Letters("R"), Digit, "Denmark"),
    (Digit, Letters("J"), "Estonia"),
    (Letters("FM"), Digit, "France"),
    (Letters("CD"), Digit, "Germany"),
    (Letters("G"), Digit, "Greece"),
    (Digit, Letters("V"), "Hungary"),
    (Letters("S"), Digit, "Iceland"),
    (Letters("A"), Digit, "Italy"),
    (Letters("A"), Letters("D"), "Latvia"),
    (Digit, Letters("R"), "Lithuania"),
    (Letters("B"), Digit, "Luxembourg"),
    (Letters("A"), Letters("W"), "Montenegro"),
    (Letters("H"), Digit, "Netherlands"),
    (Letters("A"), Letters("C"), "North Macedonia"),
    (Letters("N"), Digit, "Norway"),
    (Digit, Letters("H"), "Poland"),
    (Letters("P"), Digit, "Portugal"),
    (Digit, Letters("L"), "Romania"),
    (Digit, Letters("M"), "Slovakia"),
    (Digit, Letters("Q"), "Slovenia"),
    (Digit, Letters("B"), "Spain"),
    (Letters("T"), Digit, "Turkey"),
    (Letters("UK"), Digit, "United Kingdom"),
    (Digit, Digit, "United States"),
    (Letters("W"), Digit, "Argentina"),
    (Letters("Z"), Digit, "Australia"),
    (Digit, Letters("N"), "Austria"),
    (Digit, Letters("K"), "Brazil"),
    (Letters("A"), Letters("Z"), "Colombia"),
    (Letters("A"), Letters("G"), "Finland"),
    (Digit, Letters("Y"), "India"),
    (Digit, Letters("Z"), "Indonesia"),
    (Digit, Letters("A"), "Israel"),
    (Letters("J"), Digit, "Japan"),
    (Letters("A"), Letters("X"), "Jordan"),
    (Digit, Letters("F"), "Korea, Republic of"),
    (Letters("Y"), Digit, "Malaysia"),
    (Letters("A"), Letters("M"), "Morocco"),
    (Letters("E"), Digit, "New Zealand"),
    (Letters("A"), Letters("S"), "Serbia"),
    (Letters("Q"), Digit, "Singapore"),
    (Letters("A"), Letters("N"), "Sweden"),
    (Letters("A"), Letters("J"), "Ukraine"),
    (Digit, Letters("W"), "United Arab Emirates"),
];

/// Middle positions of any CAGE/NCAGE code: alphanumeric without I or O.
fn is_code_body_char(c: char) -> bool {
    let c = c.to_ascii_uppercase();
    (c.is_ascii_digit() || c.is_ascii_uppercase()) && c != 'I' && c != 'O'
}

const TOP_LEVEL_DOMAINS: &[&str] = &["com", "org", "net", "int", "edu", "gov", "mil", "us"];

const HTTP_PREFIXES: &[&str] = &["http://", "https://"];

//
// ================= Rules =================
//

struct ClassificationRule {
    category: SearchCategory,
    matches: fn(&str) -> bool,
    build: fn(&str) -> ClassifiedQuery,
}

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: SearchCategory::UniqueEntityId,
        matches: is_unique_entity_id,
        build: build_unique_entity_id,
    },
    ClassificationRule {
        category: SearchCategory::RegionalEquipmentCode,
        matches: is_us_cage_code,
        build: build_us_cage_code,
    },
    ClassificationRule {
        category: SearchCategory::InternationalEquipmentCode,
        matches: is_potential_ncage_code,
        build: build_potential_ncage_code,
    },
    ClassificationRule {
        category: SearchCategory::Website,
        matches: is_potential_website,
        build: build_website,
    },
];

/// Search classifier
pub struct SearchClassifier;

impl SearchClassifier {
    /// Classify a raw search string. `None`, empty and whitespace-only input
    /// produce an empty fragment; anything no rule claims is a business name.
    pub fn classify(search_input: Option<&str>) -> ClassifiedQuery {
        let Some(search_input) = search_input else {
            return ClassifiedQuery::empty();
        };

        let search_input = collapse_whitespace(search_input);
        if search_input.is_empty() {
            return ClassifiedQuery::empty();
        }

        RULES
            .iter()
            .find(|rule| (rule.matches)(&search_input))
            .map(|rule| {
                debug!(category = ?rule.category, "Search input classified");
                (rule.build)(&search_input)
            })
            .unwrap_or_else(|| build_business_name(&search_input))
    }
}

pub fn is_unique_entity_id(input: &str) -> bool {
    UEI_PATTERN.is_match(input)
}

pub fn is_us_cage_code(input: &str) -> bool {
    US_CAGE_PATTERN.is_match(input)
}

pub fn is_potential_ncage_code(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() != 5 || !chars[1..4].iter().all(|c| is_code_body_char(*c)) {
        return false;
    }

    NCAGE_TABLE
        .iter()
        .any(|(first, last, _)| first.matches(chars[0]) && last.matches(chars[4]))
}

pub fn is_potential_website(input: &str) -> bool {
    if !input.contains('.') {
        return false;
    }

    if HTTP_PREFIXES.iter().any(|prefix| input.starts_with(prefix)) {
        return true;
    }

    let host = match website_host(input) {
        Ok(host) => host,
        Err(e) => {
            debug!("Not a website: {}", e);
            return false;
        }
    };

    // Case and port are kept: "APPLE.COM" and "acme.com:8080" are not websites
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 1 {
        return false;
    }

    labels
        .last()
        .map(|tld| TOP_LEVEL_DOMAINS.contains(tld))
        .unwrap_or(false)
}

/// Network location of `input` read as the authority of an http URL: the raw
/// text before the first '/', '?' or '#'. Userinfo, port and case are kept.
fn website_host(input: &str) -> Result<&str> {
    let netloc = input.split(&['/', '?', '#'][..]).next().unwrap_or(input);

    match (netloc.find('['), netloc.find(']')) {
        (None, None) => Ok(netloc),
        (Some(open), Some(close)) if open < close => {
            let literal = &netloc[open + 1..close];
            if literal.parse::<Ipv6Addr>().is_ok() || IP_FUTURE_PATTERN.is_match(literal) {
                Ok(netloc)
            } else {
                Err(SamToolError::MalformedHostInput(format!(
                    "{}: invalid bracketed host",
                    input
                )))
            }
        }
        _ => Err(SamToolError::MalformedHostInput(format!(
            "{}: unbalanced brackets",
            input
        ))),
    }
}

fn build_unique_entity_id(input: &str) -> ClassifiedQuery {
    ClassifiedQuery::single(SearchCategory::UniqueEntityId, UEI_FIELD, input.to_string())
}

fn build_us_cage_code(input: &str) -> ClassifiedQuery {
    ClassifiedQuery::single(
        SearchCategory::RegionalEquipmentCode,
        CAGE_CODE_FIELD,
        input.to_string(),
    )
}

fn build_potential_ncage_code(input: &str) -> ClassifiedQuery {
    let business_name = normalize_business_name(input);
    ClassifiedQuery::single(
        SearchCategory::InternationalEquipmentCode,
        QUERY_FIELD,
        format!(
            "(legalBusinessName:{} OR dbaName:{} OR cageCode:{})",
            business_name, business_name, input
        ),
    )
}

fn build_website(input: &str) -> ClassifiedQuery {
    let stripped = HTTP_PREFIXES
        .iter()
        .fold(input.to_string(), |acc, prefix| acc.replace(prefix, ""));

    let website = match website_host(&stripped) {
        Ok(host) => strip_forbidden_chars(host),
        Err(e) => {
            debug!("Using raw website input: {}", e);
            stripped.clone()
        }
    };

    ClassifiedQuery::single(SearchCategory::Website, QUERY_FIELD, format!("(*{}*)", website))
}

fn build_business_name(input: &str) -> ClassifiedQuery {
    let business_name = normalize_business_name(input);
    ClassifiedQuery::single(
        SearchCategory::BusinessName,
        QUERY_FIELD,
        format!(
            "(legalBusinessName:{} OR dbaName:{})",
            business_name, business_name
        ),
    )
}
