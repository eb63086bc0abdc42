//! Section 889 compliance rules
//!
//! FAR 52.204-26 representations accumulated per entity, plus the exclusion
//! and registration flags that decide whether an entity is selectable.
//! All derived values are recomputed from stored answers on every read.

pub mod exclusions;
pub mod registration;

pub use exclusions::Exclusions;
pub use registration::RegistrationStatus;

use crate::error::SamToolError;
use crate::Result;
use serde::Serialize;
use std::fmt;

pub const FAR_52_204_26_C1: &str = "52.204-26.c.1";
pub const FAR_52_204_26_C2: &str = "52.204-26.c.2";

const C1_TEMPLATE: &str = "(1) The Offeror represents that it {answer} \
provide covered telecommunications equipment or services as \
a part of its offered products or services to the Government \
in the performance of any contract, subcontract, or other \
contractual instrument.";

const C2_TEMPLATE: &str = "(2) After conducting a reasonable inquiry for \
purposes of this representation, the offeror represents that \
it {answer} use covered telecommunications equipment or \
services, or any equipment, system, or service that uses \
covered telecommunications equipment or services.";

const ANSWER_PLACEHOLDER: &str = "{answer}";

//
// ================= Provision sections =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionSection {
    C1,
    C2,
}

impl ProvisionSection {
    pub const ALL: [ProvisionSection; 2] = [ProvisionSection::C1, ProvisionSection::C2];

    pub fn id(&self) -> &'static str {
        match self {
            ProvisionSection::C1 => FAR_52_204_26_C1,
            ProvisionSection::C2 => FAR_52_204_26_C2,
        }
    }

    fn template(&self) -> &'static str {
        match self {
            ProvisionSection::C1 => C1_TEMPLATE,
            ProvisionSection::C2 => C2_TEMPLATE,
        }
    }

    pub fn from_id(provision_id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.id() == provision_id)
            .ok_or_else(|| SamToolError::InvalidProvisionId {
                provision_id: provision_id.to_string(),
                legal_ids: Self::ALL.iter().map(|s| s.id()).collect(),
            })
    }
}

/// What the entity represented for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Representation {
    #[serde(rename = "DOES")]
    Does,
    #[serde(rename = "DOES NOT")]
    DoesNot,
}

impl Representation {
    /// "Yes"/"No", case-insensitive.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "yes" => Some(Representation::Does),
            "no" => Some(Representation::DoesNot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Does => "DOES",
            Representation::DoesNot => "DOES NOT",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAnswer {
    pub representation: Representation,
    pub text: String,
}

//
// ================= EightEightNine =================
//

/// Vendor Section 889 compliance for FAR 52.204-26.
///
/// Holds exactly one slot per legal section; a slot can be overwritten but
/// never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EightEightNine {
    c1: Option<SectionAnswer>,
    c2: Option<SectionAnswer>,
}

impl EightEightNine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer ("Yes"/"No") for `provision_id`.
    pub fn set_far(&mut self, provision_id: &str, provision_answer: &str) -> Result<()> {
        let section = ProvisionSection::from_id(provision_id)?;

        let representation = Representation::from_answer(provision_answer).ok_or_else(|| {
            SamToolError::InvalidProvisionAnswer {
                provision_id: provision_id.to_string(),
                answer: provision_answer.to_string(),
            }
        })?;

        let answer = SectionAnswer {
            representation,
            text: section
                .template()
                .replace(ANSWER_PLACEHOLDER, representation.as_str()),
        };

        match section {
            ProvisionSection::C1 => self.c1 = Some(answer),
            ProvisionSection::C2 => self.c2 = Some(answer),
        }

        Ok(())
    }

    pub fn section(&self, section: ProvisionSection) -> Option<&SectionAnswer> {
        match section {
            ProvisionSection::C1 => self.c1.as_ref(),
            ProvisionSection::C2 => self.c2.as_ref(),
        }
    }

    pub fn representation(&self, section: ProvisionSection) -> Option<Representation> {
        self.section(section).map(|a| a.representation)
    }

    /// Full FAR text with the entity's answer filled in, `None` if unanswered.
    pub fn far_text(&self, section: ProvisionSection) -> Option<&str> {
        self.section(section).map(|a| a.text.as_str())
    }

    pub fn has_far_response(&self) -> bool {
        self.c1.is_some() || self.c2.is_some()
    }

    pub fn is_compliant(&self) -> bool {
        self.representation(ProvisionSection::C1) == Some(Representation::DoesNot)
            && self.representation(ProvisionSection::C2) == Some(Representation::DoesNot)
    }

    pub fn status_text(&self) -> &'static str {
        use Representation::Does;

        let c1 = self.representation(ProvisionSection::C1);
        let c2 = self.representation(ProvisionSection::C2);

        if self.is_compliant() {
            return "COMPLIANT";
        }
        if !self.has_far_response() {
            return "NO REPS & CERTS";
        }
        if c2.is_none() {
            return "OUTDATED FAR (No part (C)(2))";
        }
        match (c1, c2) {
            (Some(Does), Some(Does)) => "PROVIDES AND USES COVERED TELECOMMUNICATIONS",
            (Some(Does), _) => "PROVIDES COVERED TELECOMMUNICATIONS",
            (_, Some(Does)) => "USES COVERED TELECOMMUNICATIONS",
            // c2 answered without c1; the regulation never produces this
            _ => "UNSPECIFIED",
        }
    }

    pub fn elaborated_status_text(&self) -> String {
        if self.is_compliant() {
            self.status_text().to_string()
        } else {
            format!("NONCOMPLIANT - {}", self.status_text())
        }
    }

    /// DEC 2019 introduced (c)(1) only; OCT 2020 added (c)(2).
    pub fn far_provision_date(&self) -> Option<&'static str> {
        match (self.c1.is_some(), self.c2.is_some()) {
            (true, false) => Some("DEC 2019"),
            (true, true) => Some("OCT 2020"),
            _ => None,
        }
    }
}

/// Compliant, without exclusions, and actively registered.
pub fn is_entity_selectable(is_compliant: bool, has_exclusions: bool, is_active: bool) -> bool {
    is_compliant && !has_exclusions && is_active
}
