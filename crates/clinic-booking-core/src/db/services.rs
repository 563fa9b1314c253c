//! Service database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use super::{rejected, Database, DbError, DbResult};
use crate::models::{NewService, Service};

const SERVICE_COLUMNS: &str =
    "service_id, name, description, base_cost, duration_minutes, created_at, updated_at";

fn service_from_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        service_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        base_cost: row.get(3)?,
        duration_minutes: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// SQLite stores NaN as NULL and lets infinity through `base_cost >= 0`.
fn check_base_cost(op: &'static str, base_cost: f64) -> DbResult<()> {
    if base_cost.is_finite() {
        return Ok(());
    }
    let err =
        DbError::CheckConstraintViolation(format!("base_cost must be finite, got {}", base_cost));
    warn!(op, error = %err, "write rejected by constraint");
    Err(err)
}

impl Database {
    /// Insert a new service.
    pub fn insert_service(&self, new: &NewService) -> DbResult<Service> {
        check_base_cost("insert_service", new.base_cost)?;
        self.conn
            .execute(
                r#"
                INSERT INTO services (name, description, base_cost, duration_minutes)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![new.name, new.description, new.base_cost, new.duration_minutes],
            )
            .map_err(|e| rejected("insert_service", e))?;

        let id = self.conn.last_insert_rowid();
        debug!(service_id = id, name = %new.name, "inserted service");
        self.get_service(id)?
            .ok_or_else(|| DbError::NotFound(format!("service {}", id)))
    }

    /// Update an existing service.
    pub fn update_service(&self, service: &Service) -> DbResult<bool> {
        check_base_cost("update_service", service.base_cost)?;
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE services SET
                    name = ?2,
                    description = ?3,
                    base_cost = ?4,
                    duration_minutes = ?5
                WHERE service_id = ?1
                "#,
                params![
                    service.service_id,
                    service.name,
                    service.description,
                    service.base_cost,
                    service.duration_minutes,
                ],
            )
            .map_err(|e| rejected("update_service", e))?;
        Ok(rows_affected > 0)
    }

    /// Get a service by ID.
    pub fn get_service(&self, service_id: i64) -> DbResult<Option<Service>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM services WHERE service_id = ?", SERVICE_COLUMNS),
                [service_id],
                service_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a service by its unique name.
    pub fn find_service_by_name(&self, name: &str) -> DbResult<Option<Service>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM services WHERE name = ?", SERVICE_COLUMNS),
                [name],
                service_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all services.
    pub fn list_services(&self) -> DbResult<Vec<Service>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM services ORDER BY name", SERVICE_COLUMNS))?;
        let rows = stmt.query_map([], service_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a service. Appointments that used it become "unspecified
    /// service" bookings.
    pub fn delete_service(&self, service_id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM services WHERE service_id = ?", [service_id])
            .map_err(|e| rejected("delete_service", e))?;
        if rows_affected > 0 {
            debug!(service_id, "deleted service");
        }
        Ok(rows_affected > 0)
    }
}
