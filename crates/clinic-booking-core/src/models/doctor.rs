//! Doctor models.

use serde::{Deserialize, Serialize};

/// A practicing doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub doctor_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Required and unique
    pub email: String,
    pub phone_number: Option<String>,
    /// Cleared by the store when the specialization is deleted
    pub specialization_id: Option<i64>,
    pub license_number: Option<String>,
    pub years_of_experience: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Doctor {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub specialization_id: Option<i64>,
    pub license_number: Option<String>,
    pub years_of_experience: i64,
}

impl NewDoctor {
    /// Create a doctor input with required fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: None,
            specialization_id: None,
            license_number: None,
            years_of_experience: 0,
        }
    }

    /// Attach a specialization.
    pub fn with_specialization(mut self, specialization_id: i64) -> Self {
        self.specialization_id = Some(specialization_id);
        self
    }
}
