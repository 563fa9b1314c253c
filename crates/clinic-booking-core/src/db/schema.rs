//! SQLite schema definition.

/// Tables in foreign-key dependency order. Teardown walks this list backwards.
pub const TABLES_IN_CREATION_ORDER: [&str; 5] = [
    "specializations",
    "services",
    "patients",
    "doctors",
    "appointments",
];

/// Complete database schema for the clinic booking store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Specializations
-- ============================================================================

CREATE TABLE IF NOT EXISTS specializations (
    specialization_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    description TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ============================================================================
-- Services
-- ============================================================================

CREATE TABLE IF NOT EXISTS services (
    service_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    description TEXT,
    base_cost REAL NOT NULL CHECK (base_cost >= 0),
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    gender TEXT NOT NULL DEFAULT 'Prefer not to say'
        CHECK (gender IN ('Male', 'Female', 'Other', 'Prefer not to say')),
    phone_number TEXT UNIQUE,
    email TEXT UNIQUE,
    address TEXT,
    medical_history_summary TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    CONSTRAINT chk_patient_contact CHECK (phone_number IS NOT NULL OR email IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(last_name, first_name);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    doctor_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone_number TEXT UNIQUE,
    specialization_id INTEGER
        REFERENCES specializations(specialization_id) ON DELETE SET NULL,
    license_number TEXT UNIQUE,
    years_of_experience INTEGER NOT NULL DEFAULT 0 CHECK (years_of_experience >= 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_doctors_specialization ON doctors(specialization_id);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL
        REFERENCES patients(patient_id) ON DELETE CASCADE,
    doctor_id INTEGER NOT NULL
        REFERENCES doctors(doctor_id) ON DELETE RESTRICT,
    service_id INTEGER
        REFERENCES services(service_id) ON DELETE SET NULL,
    appointment_datetime TEXT NOT NULL
        CHECK (julianday(appointment_datetime) IS NOT NULL),
    duration_minutes INTEGER NOT NULL DEFAULT 30 CHECK (duration_minutes > 0),
    status TEXT NOT NULL DEFAULT 'Scheduled'
        CHECK (status IN ('Scheduled', 'Completed', 'Cancelled_By_Patient',
                          'Cancelled_By_Clinic', 'No_Show')),
    reason_for_visit TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- One booking per doctor per instant, compared on the normalized instant so
-- '2026-01-01 09:00:00' and '2026-01-01T09:00:00' collide.
CREATE UNIQUE INDEX IF NOT EXISTS uq_doctor_slot ON appointments(
    doctor_id,
    strftime('%Y-%m-%d %H:%M:%f', appointment_datetime)
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_service ON appointments(service_id);
CREATE INDEX IF NOT EXISTS idx_appointments_datetime ON appointments(appointment_datetime);

-- ============================================================================
-- updated_at maintenance
-- ============================================================================

-- Only fires when the statement left updated_at alone, so explicit writes stick.
CREATE TRIGGER IF NOT EXISTS specializations_touch AFTER UPDATE ON specializations
WHEN new.updated_at = old.updated_at
BEGIN
    UPDATE specializations SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE specialization_id = new.specialization_id;
END;

CREATE TRIGGER IF NOT EXISTS services_touch AFTER UPDATE ON services
WHEN new.updated_at = old.updated_at
BEGIN
    UPDATE services SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE service_id = new.service_id;
END;

CREATE TRIGGER IF NOT EXISTS patients_touch AFTER UPDATE ON patients
WHEN new.updated_at = old.updated_at
BEGIN
    UPDATE patients SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE patient_id = new.patient_id;
END;

-- A set-null from a deleted specialization is not a mutation of the doctor.
CREATE TRIGGER IF NOT EXISTS doctors_touch AFTER UPDATE ON doctors
WHEN new.updated_at = old.updated_at
    AND NOT (
        old.specialization_id IS NOT NULL
        AND new.specialization_id IS NULL
        AND NOT EXISTS (
            SELECT 1 FROM specializations
            WHERE specialization_id = old.specialization_id
        )
    )
BEGIN
    UPDATE doctors SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE doctor_id = new.doctor_id;
END;

-- Same for a set-null from a deleted service.
CREATE TRIGGER IF NOT EXISTS appointments_touch AFTER UPDATE ON appointments
WHEN new.updated_at = old.updated_at
    AND NOT (
        old.service_id IS NOT NULL
        AND new.service_id IS NULL
        AND NOT EXISTS (
            SELECT 1 FROM services WHERE service_id = old.service_id
        )
    )
BEGIN
    UPDATE appointments SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE appointment_id = new.appointment_id;
END;
"#;

/// Drops every table in reverse dependency order.
pub const TEARDOWN: &str = r#"
DROP TABLE IF EXISTS appointments;
DROP TABLE IF EXISTS doctors;
DROP TABLE IF EXISTS patients;
DROP TABLE IF EXISTS services;
DROP TABLE IF EXISTS specializations;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = setup_conn();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_teardown_drops_all_tables() {
        let conn = setup_conn();
        conn.execute_batch(TEARDOWN).unwrap();

        for table in TABLES_IN_CREATION_ORDER {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 0, "{} should be dropped", table);
        }
    }

    #[test]
    fn test_defaults_applied() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO patients (first_name, last_name, date_of_birth, email) VALUES ('Ada', 'Lovelace', '1990-12-10', 'ada@example.com')",
            [],
        )
        .unwrap();
        let gender: String = conn
            .query_row("SELECT gender FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(gender, "Prefer not to say");

        conn.execute(
            "INSERT INTO doctors (first_name, last_name, email) VALUES ('Gregory', 'House', 'house@example.com')",
            [],
        )
        .unwrap();
        let years: i64 = conn
            .query_row("SELECT years_of_experience FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(years, 0);

        conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_datetime) VALUES (1, 1, '2026-10-19 09:00:00')",
            [],
        )
        .unwrap();
        let (duration, status): (i64, String) = conn
            .query_row(
                "SELECT duration_minutes, status FROM appointments",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(duration, 30);
        assert_eq!(status, "Scheduled");
    }

    #[test]
    fn test_enumerated_columns_reject_unknown_values() {
        let conn = setup_conn();

        let result = conn.execute(
            "INSERT INTO patients (first_name, last_name, date_of_birth, gender, email) VALUES ('A', 'B', '2000-01-01', 'Unknown', 'a@b.c')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_specialization_name_not_blank() {
        let conn = setup_conn();

        let result = conn.execute("INSERT INTO specializations (name) VALUES ('   ')", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_doctor_slot_compares_normalized_instant() {
        let conn = setup_conn();
        conn.execute_batch(
            r#"
            INSERT INTO patients (first_name, last_name, date_of_birth, email)
                VALUES ('Ada', 'Lovelace', '1990-12-10', 'ada@example.com');
            INSERT INTO doctors (first_name, last_name, email)
                VALUES ('Gregory', 'House', 'house@example.com');
            INSERT INTO appointments (patient_id, doctor_id, appointment_datetime)
                VALUES (1, 1, '2026-01-01 09:00:00');
            "#,
        )
        .unwrap();

        for same_instant in ["2026-01-01T09:00:00", "2026-01-01 09:00:00.000", "2026-01-01 09:00"] {
            let result = conn.execute(
                "INSERT INTO appointments (patient_id, doctor_id, appointment_datetime) VALUES (1, 1, ?)",
                [same_instant],
            );
            assert!(result.is_err(), "{} should collide", same_instant);
        }

        conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_datetime) VALUES (1, 1, '2026-01-01T09:00:01')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_unparseable_datetime_rejected() {
        let conn = setup_conn();
        conn.execute_batch(
            r#"
            INSERT INTO patients (first_name, last_name, date_of_birth, email)
                VALUES ('Ada', 'Lovelace', '1990-12-10', 'ada@example.com');
            INSERT INTO doctors (first_name, last_name, email)
                VALUES ('Gregory', 'House', 'house@example.com');
            "#,
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_datetime) VALUES (1, 1, 'next tuesday')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_touch_trigger_refreshes_updated_at() {
        let conn = setup_conn();
        conn.execute("INSERT INTO specializations (name) VALUES ('Cardiology')", [])
            .unwrap();
        conn.execute(
            "UPDATE specializations SET updated_at = '2000-01-01T00:00:00.000Z'",
            [],
        )
        .unwrap();

        let pinned: String = conn
            .query_row("SELECT updated_at FROM specializations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(pinned, "2000-01-01T00:00:00.000Z");

        conn.execute(
            "UPDATE specializations SET description = 'Heart'",
            [],
        )
        .unwrap();
        let refreshed: String = conn
            .query_row("SELECT updated_at FROM specializations", [], |row| row.get(0))
            .unwrap();
        assert_ne!(refreshed, "2000-01-01T00:00:00.000Z");
    }
}
