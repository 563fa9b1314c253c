//! Whole-store snapshot export.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Database, DbResult};
use crate::models::{Appointment, Doctor, Patient, Service, Specialization};

/// Every row of every table, in creation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicSnapshot {
    pub exported_at: String,
    pub specializations: Vec<Specialization>,
    pub services: Vec<Service>,
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
}

impl ClinicSnapshot {
    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rows across all five tables.
    pub fn total_rows(&self) -> usize {
        self.specializations.len()
            + self.services.len()
            + self.patients.len()
            + self.doctors.len()
            + self.appointments.len()
    }
}

impl Database {
    /// Read all five tables inside one read transaction, so the snapshot is
    /// consistent even with writers on other connections.
    pub fn export_snapshot(&self) -> DbResult<ClinicSnapshot> {
        let tx = self.conn.unchecked_transaction()?;

        let snapshot = ClinicSnapshot {
            exported_at: chrono::Utc::now().to_rfc3339(),
            specializations: self.list_specializations()?,
            services: self.list_services()?,
            patients: self.list_patients()?,
            doctors: self.list_doctors()?,
            appointments: self.list_appointments()?,
        };

        tx.commit()?;
        info!(rows = snapshot.total_rows(), "exported clinic snapshot");
        Ok(snapshot)
    }
}
