//! Adapters from SAM Entities API records to compliance objects
//!
//! Every lookup is defensive: a missing or oddly shaped field yields the
//! default object, and one broken section never affects the others.

use crate::compliance::{
    is_entity_selectable, EightEightNine, Exclusions, ProvisionSection, RegistrationStatus,
};
use crate::models::{
    EightEightNineSummary, EntitySummary, ExclusionsSummary, FarText, RegistrationSummary,
};
use serde_json::Value;
use tracing::warn;

pub const FAR_52_204_26_PROVISION_ID: &str = "FAR 52.204-26";

/// Read a scalar as text. Null, arrays and objects count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn find_by<'a>(items: &'a Value, key: &str, wanted: &str) -> Option<&'a Value> {
    items
        .as_array()?
        .iter()
        .find(|item| item.get(key).and_then(Value::as_str) == Some(wanted))
}

fn registration_field(entity: &Value, field: &str) -> Option<String> {
    entity
        .get("entityRegistration")
        .and_then(|registration| registration.get(field))
        .and_then(scalar_text)
}

pub struct EntityAdapter;

impl EntityAdapter {
    /// `repsAndCerts.certifications.fARResponses`, if present.
    fn far_responses(entity: &Value) -> Option<&Value> {
        entity
            .get("repsAndCerts")?
            .get("certifications")?
            .get("fARResponses")
    }

    fn far_answer<'a>(far_52_204_26: &'a Value, section: ProvisionSection) -> Option<&'a str> {
        let answers = far_52_204_26.get("listOfAnswers")?;
        find_by(answers, "section", section.id())?
            .get("answerText")?
            .as_str()
    }

    pub fn adapt_889_compliance(entity: &Value) -> EightEightNine {
        let mut compliance = EightEightNine::new();

        let Some(far_52_204_26) = Self::far_responses(entity)
            .and_then(|responses| find_by(responses, "provisionId", FAR_52_204_26_PROVISION_ID))
        else {
            return compliance;
        };

        for section in ProvisionSection::ALL {
            let Some(answer) = Self::far_answer(far_52_204_26, section) else {
                continue;
            };
            if let Err(e) = compliance.set_far(section.id(), answer) {
                warn!(section = section.id(), "Ignoring FAR answer: {}", e);
            }
        }

        compliance
    }

    pub fn adapt_exclusions(entity: &Value) -> Exclusions {
        Exclusions::new(registration_field(entity, "exclusionStatusFlag"))
    }

    pub fn adapt_registration_status(entity: &Value) -> RegistrationStatus {
        registration_field(entity, "registrationStatus")
            .map(RegistrationStatus::new)
            .unwrap_or_default()
    }

    /// Decoration for one entity, without links (those depend on the host).
    pub fn summarize(entity: &Value) -> EntitySummary {
        let eight_eight_nine = Self::adapt_889_compliance(entity);
        let exclusions = Self::adapt_exclusions(entity);
        let registration = Self::adapt_registration_status(entity);

        EntitySummary {
            is_selectable: is_entity_selectable(
                eight_eight_nine.is_compliant(),
                exclusions.has_exclusions(),
                registration.is_active(),
            ),
            pdf_links: None,
            eight_eight_nine: EightEightNineSummary {
                is_compliant: eight_eight_nine.is_compliant(),
                status_text: eight_eight_nine.status_text().to_string(),
                elaborated_status_text: eight_eight_nine.elaborated_status_text(),
                far_provision_date: eight_eight_nine.far_provision_date().map(str::to_string),
                far_text: FarText {
                    c1: eight_eight_nine
                        .far_text(ProvisionSection::C1)
                        .map(str::to_string),
                    c2: eight_eight_nine
                        .far_text(ProvisionSection::C2)
                        .map(str::to_string),
                },
            },
            exclusions: ExclusionsSummary {
                has_exclusions: exclusions.has_exclusions(),
                status_text: exclusions.status_text().to_string(),
            },
            registration: RegistrationSummary {
                is_active: registration.is_active(),
                status_text: registration.status_text().to_string(),
            },
        }
    }
}
