//! Appointment models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// Default appointment length in minutes.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 30;

/// Appointment status.
///
/// Starts at `Scheduled`. The store accepts any status change, including
/// moving a completed appointment back to scheduled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    #[serde(rename = "Cancelled_By_Patient")]
    CancelledByPatient,
    #[serde(rename = "Cancelled_By_Clinic")]
    CancelledByClinic,
    #[serde(rename = "No_Show")]
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::CancelledByPatient,
        AppointmentStatus::CancelledByClinic,
        AppointmentStatus::NoShow,
    ];

    /// Stored text value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::CancelledByPatient => "Cancelled_By_Patient",
            AppointmentStatus::CancelledByClinic => "Cancelled_By_Clinic",
            AppointmentStatus::NoShow => "No_Show",
        }
    }

    /// True for either cancellation status.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::CancelledByPatient | AppointmentStatus::CancelledByClinic
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "appointment status",
                value: s.to_string(),
            })
    }
}

/// A scheduled encounter between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// None once the referenced service is deleted ("unspecified service")
    pub service_id: Option<i64>,
    /// Start instant; unique per doctor
    pub appointment_datetime: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub reason_for_visit: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    /// End instant derived from start and duration, or `None` if it falls
    /// outside the representable range.
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        let duration = chrono::Duration::try_minutes(self.duration_minutes)?;
        self.appointment_datetime.checked_add_signed(duration)
    }
}

/// Input for booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub service_id: Option<i64>,
    pub appointment_datetime: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub reason_for_visit: Option<String>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Create a booking with default duration and `Scheduled` status.
    pub fn new(patient_id: i64, doctor_id: i64, appointment_datetime: NaiveDateTime) -> Self {
        Self {
            patient_id,
            doctor_id,
            service_id: None,
            appointment_datetime,
            duration_minutes: DEFAULT_APPOINTMENT_MINUTES,
            status: AppointmentStatus::default(),
            reason_for_visit: None,
            notes: None,
        }
    }

    /// Attach the booked service.
    pub fn with_service(mut self, service_id: i64) -> Self {
        self.service_id = Some(service_id);
        self
    }

    /// Set the reason for the visit.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason_for_visit = Some(reason.into());
        self
    }
}
