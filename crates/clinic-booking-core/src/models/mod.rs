//! Domain models for the clinic booking store.

mod appointment;
mod doctor;
mod patient;
mod service;
mod specialization;

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
pub use service::*;
pub use specialization::*;

use thiserror::Error;

/// Text that does not name a variant of a closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
