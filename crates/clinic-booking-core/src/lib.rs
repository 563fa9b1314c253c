//! Clinic Booking Core Library
//!
//! SQLite-backed store for a clinic booking system: specializations,
//! services, patients, doctors and appointments.
//!
//! # Architecture
//!
//! ```text
//!   Specialization          Service            Patient
//!         │ set null          │ set null          │ cascade
//!         ▼                   │                   │
//!      Doctor ──restrict──────┼──────────┐        │
//!                             ▼          ▼        ▼
//!                     ┌─────────────────────────────────┐
//!                     │           Appointment           │
//!                     │ unique (doctor_id, datetime)    │
//!                     └─────────────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **The schema is the source of truth.** Uniqueness, checks and referential
//! actions live in the DDL; the Rust layer maps rows to types and classifies
//! constraint failures into [`DbError`] variants.
//!
//! # Modules
//!
//! - [`db`]: SQLite schema and per-entity operations
//! - [`models`]: Domain types (Patient, Doctor, Appointment, etc.)
//! - [`config`]: Store configuration

pub mod config;
pub mod db;
pub mod models;

// Re-export commonly used types
pub use config::StoreConfig;
pub use db::{ClinicSnapshot, Database, DbError, DbResult};
pub use models::{
    Appointment, AppointmentStatus, Doctor, Gender, NewAppointment, NewDoctor, NewPatient,
    NewService, NewSpecialization, Patient, Service, Specialization,
};

use std::sync::{Arc, Mutex};

// =========================================================================
// Shared Store Handle
// =========================================================================

/// Thread-safe handle to one open store.
///
/// Clones share the same connection; each call holds the lock for the
/// duration of the closure.
#[derive(Clone)]
pub struct ClinicStore {
    db: Arc<Mutex<Database>>,
}

impl ClinicStore {
    /// Wrap an open database.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open a store according to `config`.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        Ok(Self::new(Database::open_with_config(config)?))
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Run `f` with exclusive access to the database.
    pub fn with_db<T>(&self, f: impl FnOnce(&mut Database) -> DbResult<T>) -> DbResult<T> {
        let mut db = self.db.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut *db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_handle_clones_share_store() {
        let store = ClinicStore::open_in_memory().unwrap();
        let other = store.clone();

        store
            .with_db(|db| db.insert_specialization(&NewSpecialization::new("Cardiology")))
            .unwrap();

        let names = other
            .with_db(|db| db.list_specializations())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Cardiology".to_string()]);
    }

    #[test]
    fn test_poisoned_lock_reported() {
        let store = ClinicStore::open_in_memory().unwrap();
        let poisoner = store.clone();

        let _ = std::thread::spawn(move || {
            let _ = poisoner.with_db(|_| -> DbResult<()> { panic!("boom") });
        })
        .join();

        let result = store.with_db(|db| {
            db.insert_patient(
                &NewPatient::new("Ada", "Lovelace", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
                    .with_email("ada@example.com"),
            )
        });
        assert!(matches!(result, Err(DbError::LockPoisoned)));
    }
}
