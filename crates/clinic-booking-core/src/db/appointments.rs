//! Appointment database operations.

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tracing::debug;

use super::{rejected, Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};

impl ToSql for AppointmentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AppointmentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

const APPOINTMENT_COLUMNS: &str = r#"
    appointment_id, patient_id, doctor_id, service_id, appointment_datetime,
    duration_minutes, status, reason_for_visit, notes, created_at, updated_at
"#;

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        appointment_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        service_id: row.get(3)?,
        appointment_datetime: row.get(4)?,
        duration_minutes: row.get(5)?,
        status: row.get(6)?,
        reason_for_visit: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl Database {
    /// Book an appointment.
    ///
    /// Only an identical (doctor, start instant) pair is rejected; bookings
    /// that merely overlap in time are accepted.
    pub fn insert_appointment(&self, new: &NewAppointment) -> DbResult<Appointment> {
        self.conn
            .execute(
                r#"
                INSERT INTO appointments (
                    patient_id, doctor_id, service_id, appointment_datetime,
                    duration_minutes, status, reason_for_visit, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    new.patient_id,
                    new.doctor_id,
                    new.service_id,
                    new.appointment_datetime,
                    new.duration_minutes,
                    new.status,
                    new.reason_for_visit,
                    new.notes,
                ],
            )
            .map_err(|e| rejected("insert_appointment", e))?;

        let id = self.conn.last_insert_rowid();
        debug!(
            appointment_id = id,
            patient_id = new.patient_id,
            doctor_id = new.doctor_id,
            at = %new.appointment_datetime,
            "booked appointment"
        );
        self.get_appointment(id)?
            .ok_or_else(|| DbError::NotFound(format!("appointment {}", id)))
    }

    /// Update an existing appointment.
    pub fn update_appointment(&self, appointment: &Appointment) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE appointments SET
                    patient_id = ?2,
                    doctor_id = ?3,
                    service_id = ?4,
                    appointment_datetime = ?5,
                    duration_minutes = ?6,
                    status = ?7,
                    reason_for_visit = ?8,
                    notes = ?9
                WHERE appointment_id = ?1
                "#,
                params![
                    appointment.appointment_id,
                    appointment.patient_id,
                    appointment.doctor_id,
                    appointment.service_id,
                    appointment.appointment_datetime,
                    appointment.duration_minutes,
                    appointment.status,
                    appointment.reason_for_visit,
                    appointment.notes,
                ],
            )
            .map_err(|e| rejected("update_appointment", e))?;
        Ok(rows_affected > 0)
    }

    /// Set the status of an appointment. Any status may follow any other.
    pub fn set_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE appointments SET status = ?2 WHERE appointment_id = ?1",
                params![appointment_id, status],
            )
            .map_err(|e| rejected("set_appointment_status", e))?;
        if rows_affected > 0 {
            debug!(appointment_id, status = %status, "appointment status changed");
        }
        Ok(rows_affected > 0)
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, appointment_id: i64) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM appointments WHERE appointment_id = ?",
                    APPOINTMENT_COLUMNS
                ),
                [appointment_id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all appointments in chronological order.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.query_appointments("1 = 1", params![])
    }

    /// A doctor's appointments in chronological order.
    pub fn list_appointments_for_doctor(&self, doctor_id: i64) -> DbResult<Vec<Appointment>> {
        self.query_appointments("doctor_id = ?1", params![doctor_id])
    }

    /// A patient's appointments in chronological order.
    pub fn list_appointments_for_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        self.query_appointments("patient_id = ?1", params![patient_id])
    }

    /// Appointments starting in `[from, to)`.
    pub fn list_appointments_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            "julianday(appointment_datetime) >= julianday(?1) \
             AND julianday(appointment_datetime) < julianday(?2)",
            params![from, to],
        )
    }

    fn query_appointments(
        &self,
        filter: &str,
        args: &[&dyn ToSql],
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM appointments
            WHERE {}
            ORDER BY julianday(appointment_datetime), appointment_id
            "#,
            APPOINTMENT_COLUMNS, filter
        ))?;
        let rows = stmt.query_map(args, appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, appointment_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM appointments WHERE appointment_id = ?",
                [appointment_id],
            )
            .map_err(|e| rejected("delete_appointment", e))?;
        Ok(rows_affected > 0)
    }
}
