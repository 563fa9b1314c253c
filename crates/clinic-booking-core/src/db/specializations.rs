//! Specialization database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{rejected, Database, DbError, DbResult};
use crate::models::{NewSpecialization, Specialization};

const SPECIALIZATION_COLUMNS: &str =
    "specialization_id, name, description, created_at, updated_at";

fn specialization_from_row(row: &Row<'_>) -> rusqlite::Result<Specialization> {
    Ok(Specialization {
        specialization_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl Database {
    /// Insert a new specialization.
    pub fn insert_specialization(&self, new: &NewSpecialization) -> DbResult<Specialization> {
        self.conn
            .execute(
                "INSERT INTO specializations (name, description) VALUES (?1, ?2)",
                params![new.name, new.description],
            )
            .map_err(|e| rejected("insert_specialization", e))?;

        let id = self.conn.last_insert_rowid();
        debug!(specialization_id = id, name = %new.name, "inserted specialization");
        self.get_specialization(id)?
            .ok_or_else(|| DbError::NotFound(format!("specialization {}", id)))
    }

    /// Update name and description.
    pub fn update_specialization(&self, specialization: &Specialization) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE specializations SET name = ?2, description = ?3 WHERE specialization_id = ?1",
                params![
                    specialization.specialization_id,
                    specialization.name,
                    specialization.description,
                ],
            )
            .map_err(|e| rejected("update_specialization", e))?;
        Ok(rows_affected > 0)
    }

    /// Get a specialization by ID.
    pub fn get_specialization(&self, specialization_id: i64) -> DbResult<Option<Specialization>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM specializations WHERE specialization_id = ?",
                    SPECIALIZATION_COLUMNS
                ),
                [specialization_id],
                specialization_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a specialization by its unique name.
    pub fn find_specialization_by_name(&self, name: &str) -> DbResult<Option<Specialization>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM specializations WHERE name = ?",
                    SPECIALIZATION_COLUMNS
                ),
                [name],
                specialization_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all specializations by name.
    pub fn list_specializations(&self) -> DbResult<Vec<Specialization>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM specializations ORDER BY name",
            SPECIALIZATION_COLUMNS
        ))?;
        let rows = stmt.query_map([], specialization_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a specialization. Doctors holding it keep their row and lose
    /// the reference.
    pub fn delete_specialization(&self, specialization_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM specializations WHERE specialization_id = ?",
                [specialization_id],
            )
            .map_err(|e| rejected("delete_specialization", e))?;
        if rows_affected > 0 {
            debug!(specialization_id, "deleted specialization");
        }
        Ok(rows_affected > 0)
    }
}
