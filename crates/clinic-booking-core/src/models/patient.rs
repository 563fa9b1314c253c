//! Patient models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// Patient gender as recorded at registration. Serializes to the stored text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// Stored text value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

/// A registered patient.
///
/// At least one of `phone_number` and `email` is always present on a stored
/// row; the store rejects writes that would clear both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identity
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Unique when present
    pub phone_number: Option<String>,
    /// Unique when present
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history_summary: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp, refreshed by the store on every mutation
    pub updated_at: String,
}

impl Patient {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check whether the patient can be contacted at all.
    pub fn has_contact(&self) -> bool {
        self.phone_number.is_some() || self.email.is_some()
    }
}

/// Input for registering a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history_summary: Option<String>,
}

impl NewPatient {
    /// Create a patient input with required fields; contact details still
    /// need to be filled in before insert.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            gender: Gender::default(),
            phone_number: None,
            email: None,
            address: None,
            medical_history_summary: None,
        }
    }

    /// Set the email contact.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone contact.
    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Set the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }
}
