//! Billable clinical service models.

use serde::{Deserialize, Serialize};

/// A clinical offering with a standard cost and duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub service_id: i64,
    /// Unique service name
    pub name: String,
    pub description: Option<String>,
    /// Standard cost; never negative
    pub base_cost: f64,
    /// Standard duration; always positive
    pub duration_minutes: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub base_cost: f64,
    pub duration_minutes: i64,
}

impl NewService {
    /// Create a service input with required fields.
    pub fn new(name: impl Into<String>, base_cost: f64, duration_minutes: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            base_cost,
            duration_minutes,
        }
    }
}
