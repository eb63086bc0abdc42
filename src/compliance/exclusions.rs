//! Exclusion status of an entity.
//!
//! Fails closed: only an explicit "N" flag means the entity has no exclusions.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    sam_exclusion_status_flag: Option<String>,
}

impl Exclusions {
    pub fn new(flag: Option<String>) -> Self {
        Self {
            sam_exclusion_status_flag: flag,
        }
    }

    fn flag(&self) -> Option<&str> {
        self.sam_exclusion_status_flag.as_deref()
    }

    pub fn has_exclusions(&self) -> bool {
        self.flag() != Some("N")
    }

    /// "No", "Yes", or "Unspecified"
    pub fn status_text(&self) -> &'static str {
        if !self.has_exclusions() {
            return "No";
        }
        match self.flag() {
            Some("Y") => "Yes",
            _ => "Unspecified",
        }
    }
}
