//! Patient database operations.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tracing::debug;

use super::{rejected, Database, DbError, DbResult};
use crate::models::{Gender, NewPatient, Patient};

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

const PATIENT_COLUMNS: &str = r#"
    patient_id, first_name, last_name, date_of_birth, gender, phone_number,
    email, address, medical_history_summary, created_at, updated_at
"#;

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        phone_number: row.get(5)?,
        email: row.get(6)?,
        address: row.get(7)?,
        medical_history_summary: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, new: &NewPatient) -> DbResult<Patient> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (
                    first_name, last_name, date_of_birth, gender, phone_number,
                    email, address, medical_history_summary
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    new.first_name,
                    new.last_name,
                    new.date_of_birth,
                    new.gender,
                    new.phone_number,
                    new.email,
                    new.address,
                    new.medical_history_summary,
                ],
            )
            .map_err(|e| rejected("insert_patient", e))?;

        let id = self.conn.last_insert_rowid();
        debug!(patient_id = id, "inserted patient");
        self.get_patient(id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", id)))
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    first_name = ?2,
                    last_name = ?3,
                    date_of_birth = ?4,
                    gender = ?5,
                    phone_number = ?6,
                    email = ?7,
                    address = ?8,
                    medical_history_summary = ?9
                WHERE patient_id = ?1
                "#,
                params![
                    patient.patient_id,
                    patient.first_name,
                    patient.last_name,
                    patient.date_of_birth,
                    patient.gender,
                    patient.phone_number,
                    patient.email,
                    patient.address,
                    patient.medical_history_summary,
                ],
            )
            .map_err(|e| rejected("update_patient", e))?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE patient_id = ?", PATIENT_COLUMNS),
                [patient_id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a patient by email.
    pub fn find_patient_by_email(&self, email: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE email = ?", PATIENT_COLUMNS),
                [email],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by last or first name (prefix match).
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", escape_like(query));
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM patients
            WHERE last_name LIKE ?1 ESCAPE '\' OR first_name LIKE ?1 ESCAPE '\'
            ORDER BY last_name, first_name
            LIMIT ?2
            "#,
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients ORDER BY last_name, first_name",
            PATIENT_COLUMNS
        ))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient together with all of their appointments.
    pub fn delete_patient(&self, patient_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE patient_id = ?", [patient_id])
            .map_err(|e| rejected("delete_patient", e))?;
        if rows_affected > 0 {
            debug!(patient_id, "deleted patient");
        }
        Ok(rows_affected > 0)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
