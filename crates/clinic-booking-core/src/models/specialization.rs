//! Specialization models.

use serde::{Deserialize, Serialize};

/// A medical field of practice a doctor may be associated with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specialization {
    pub specialization_id: i64,
    /// Unique, non-blank name (e.g., "Cardiology")
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a specialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSpecialization {
    pub name: String,
    pub description: Option<String>,
}

impl NewSpecialization {
    /// Specialization with no description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
