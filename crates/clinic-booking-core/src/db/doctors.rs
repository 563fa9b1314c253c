//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{rejected, Database, DbError, DbResult};
use crate::models::{Doctor, NewDoctor};

const DOCTOR_COLUMNS: &str = r#"
    doctor_id, first_name, last_name, email, phone_number, specialization_id,
    license_number, years_of_experience, created_at, updated_at
"#;

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        doctor_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        specialization_id: row.get(5)?,
        license_number: row.get(6)?,
        years_of_experience: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl Database {
    /// Insert a new doctor.
    pub fn insert_doctor(&self, new: &NewDoctor) -> DbResult<Doctor> {
        self.conn
            .execute(
                r#"
                INSERT INTO doctors (
                    first_name, last_name, email, phone_number, specialization_id,
                    license_number, years_of_experience
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    new.first_name,
                    new.last_name,
                    new.email,
                    new.phone_number,
                    new.specialization_id,
                    new.license_number,
                    new.years_of_experience,
                ],
            )
            .map_err(|e| rejected("insert_doctor", e))?;

        let id = self.conn.last_insert_rowid();
        debug!(doctor_id = id, specialization_id = ?new.specialization_id, "inserted doctor");
        self.get_doctor(id)?
            .ok_or_else(|| DbError::NotFound(format!("doctor {}", id)))
    }

    /// Update an existing doctor.
    pub fn update_doctor(&self, doctor: &Doctor) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE doctors SET
                    first_name = ?2,
                    last_name = ?3,
                    email = ?4,
                    phone_number = ?5,
                    specialization_id = ?6,
                    license_number = ?7,
                    years_of_experience = ?8
                WHERE doctor_id = ?1
                "#,
                params![
                    doctor.doctor_id,
                    doctor.first_name,
                    doctor.last_name,
                    doctor.email,
                    doctor.phone_number,
                    doctor.specialization_id,
                    doctor.license_number,
                    doctor.years_of_experience,
                ],
            )
            .map_err(|e| rejected("update_doctor", e))?;
        Ok(rows_affected > 0)
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, doctor_id: i64) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM doctors WHERE doctor_id = ?", DOCTOR_COLUMNS),
                [doctor_id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a doctor by email.
    pub fn find_doctor_by_email(&self, email: &str) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM doctors WHERE email = ?", DOCTOR_COLUMNS),
                [email],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all doctors.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM doctors ORDER BY last_name, first_name",
            DOCTOR_COLUMNS
        ))?;
        let rows = stmt.query_map([], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List doctors practicing a specialization.
    pub fn list_doctors_by_specialization(&self, specialization_id: i64) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM doctors
            WHERE specialization_id = ?
            ORDER BY last_name, first_name
            "#,
            DOCTOR_COLUMNS
        ))?;
        let rows = stmt.query_map([specialization_id], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a doctor.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while any appointment,
    /// past or future, still references the doctor.
    pub fn delete_doctor(&self, doctor_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM doctors WHERE doctor_id = ?", [doctor_id])
            .map_err(|e| match rejected("delete_doctor", e) {
                DbError::ForeignKeyViolation(_) => DbError::ForeignKeyViolation(format!(
                    "doctor {} is still referenced by appointments",
                    doctor_id
                )),
                other => other,
            })?;
        if rows_affected > 0 {
            debug!(doctor_id, "deleted doctor");
        }
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSpecialization;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let spec = db
            .insert_specialization(&NewSpecialization::new("Cardiology"))
            .unwrap();

        let mut new = NewDoctor::new("Meredith", "Grey", "grey@clinic.test")
            .with_specialization(spec.specialization_id);
        new.license_number = Some("LIC-001".into());
        new.years_of_experience = 12;
        let doctor = db.insert_doctor(&new).unwrap();

        let retrieved = db.get_doctor(doctor.doctor_id).unwrap().unwrap();
        assert_eq!(retrieved.email, "grey@clinic.test");
        assert_eq!(retrieved.specialization_id, Some(spec.specialization_id));
        assert_eq!(retrieved.license_number, Some("LIC-001".into()));
        assert_eq!(retrieved.years_of_experience, 12);
        assert_eq!(retrieved.full_name(), "Dr. Meredith Grey");
    }

    #[test]
    fn test_specialization_optional() {
        let db = setup_db();
        let doctor = db
            .insert_doctor(&NewDoctor::new("John", "Dorian", "jd@clinic.test"))
            .unwrap();
        assert!(doctor.specialization_id.is_none());
        assert_eq!(doctor.years_of_experience, 0);
    }

    #[test]
    fn test_unknown_specialization_rejected() {
        let db = setup_db();
        let result =
            db.insert_doctor(&NewDoctor::new("John", "Dorian", "jd@clinic.test").with_specialization(42));
        assert!(matches!(result, Err(DbError::ForeignKeyViolation(_))));
    }

    #[test]
    fn test_negative_experience_rejected() {
        let db = setup_db();
        let mut new = NewDoctor::new("Doogie", "Howser", "doogie@clinic.test");
        new.years_of_experience = -1;
        let result = db.insert_doctor(&new);
        assert!(matches!(result, Err(DbError::CheckConstraintViolation(_))));
    }

    #[test]
    fn test_unique_columns() {
        let db = setup_db();
        let mut first = NewDoctor::new("A", "One", "one@clinic.test");
        first.phone_number = Some("555-1000".into());
        first.license_number = Some("LIC-1".into());
        db.insert_doctor(&first).unwrap();

        let dup_email = NewDoctor::new("B", "Two", "one@clinic.test");
        assert!(matches!(
            db.insert_doctor(&dup_email),
            Err(DbError::UniquenessViolation(_))
        ));

        let mut dup_phone = NewDoctor::new("C", "Three", "three@clinic.test");
        dup_phone.phone_number = Some("555-1000".into());
        assert!(matches!(
            db.insert_doctor(&dup_phone),
            Err(DbError::UniquenessViolation(_))
        ));

        let mut dup_license = NewDoctor::new("D", "Four", "four@clinic.test");
        dup_license.license_number = Some("LIC-1".into());
        assert!(matches!(
            db.insert_doctor(&dup_license),
            Err(DbError::UniquenessViolation(_))
        ));

        assert_eq!(db.list_doctors().unwrap().len(), 1);
    }

    #[test]
    fn test_update_and_list_by_specialization() {
        let db = setup_db();
        let spec = db
            .insert_specialization(&NewSpecialization::new("Surgery"))
            .unwrap();
        let mut doctor = db
            .insert_doctor(&NewDoctor::new("Cristina", "Yang", "yang@clinic.test"))
            .unwrap();
        assert!(db
            .list_doctors_by_specialization(spec.specialization_id)
            .unwrap()
            .is_empty());

        doctor.specialization_id = Some(spec.specialization_id);
        doctor.years_of_experience = 8;
        assert!(db.update_doctor(&doctor).unwrap());

        let listed = db
            .list_doctors_by_specialization(spec.specialization_id)
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].years_of_experience, 8);
        assert_eq!(
            db.find_doctor_by_email("yang@clinic.test")
                .unwrap()
                .unwrap()
                .doctor_id,
            doctor.doctor_id
        );
    }

    #[test]
    fn test_delete_without_appointments() {
        let db = setup_db();
        let doctor = db
            .insert_doctor(&NewDoctor::new("Perry", "Cox", "cox@clinic.test"))
            .unwrap();
        assert!(db.delete_doctor(doctor.doctor_id).unwrap());
        assert!(db.get_doctor(doctor.doctor_id).unwrap().is_none());
    }
}
