//! SAM registration status of an entity.

const UNSPECIFIED: &str = "Unspecified";
const ACTIVE: &str = "Active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationStatus {
    registration_status: String,
}

impl RegistrationStatus {
    pub fn new(registration_status: impl Into<String>) -> Self {
        Self {
            registration_status: registration_status.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.registration_status == ACTIVE
    }

    /// Status exactly as provided by the SAM Entities API
    pub fn status_text(&self) -> &str {
        &self.registration_status
    }
}

impl Default for RegistrationStatus {
    fn default() -> Self {
        Self::new(UNSPECIFIED)
    }
}
