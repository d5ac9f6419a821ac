//! Ordered removal of dependent treatments.
//!
//! Treatments are the one shared leaf of the delete cascades: they hang off
//! appointments and are referenced by invoice lines. A treatment still billed
//! on a surviving invoice blocks the whole cascade.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{ClinicError, ClinicResult};

/// Which treatments a cascade step removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreatmentScope {
    Treatment(i64),
    Appointment(i64),
    Pet(i64),
    Veterinarian(i64),
    Client(i64),
}

impl TreatmentScope {
    /// `WHERE` predicate over `treatments`, bound to `?1`.
    fn predicate(self) -> (&'static str, i64) {
        match self {
            Self::Treatment(id) => ("id = ?1", id),
            Self::Appointment(id) => ("appointment_id = ?1", id),
            Self::Pet(id) => (
                "appointment_id IN (SELECT id FROM appointments WHERE pet_id = ?1)",
                id,
            ),
            Self::Veterinarian(id) => (
                "appointment_id IN (SELECT id FROM appointments WHERE veterinarian_id = ?1)",
                id,
            ),
            Self::Client(id) => (
                "appointment_id IN (
                    SELECT a.id FROM appointments a
                    JOIN pets p ON p.id = a.pet_id
                    WHERE p.client_id = ?1
                )",
                id,
            ),
        }
    }
}

/// Fail if any treatment in scope is referenced by an invoice line.
pub(crate) fn ensure_unbilled(conn: &Connection, scope: TreatmentScope) -> ClinicResult<()> {
    let (predicate, id) = scope.predicate();
    let sql = format!(
        "SELECT treatment_id FROM invoice_lines
         WHERE treatment_id IN (SELECT id FROM treatments WHERE {})
         LIMIT 1",
        predicate
    );

    let billed: Option<i64> = conn
        .query_row(&sql, [id], |row| row.get(0))
        .optional()?;

    match billed {
        Some(treatment_id) => Err(ClinicError::validation(format!(
            "Tratamiento facturado: el tratamiento {} figura en una factura",
            treatment_id
        ))),
        None => Ok(()),
    }
}

/// Delete every treatment in scope. Returns the number removed.
pub(crate) fn delete_treatments(conn: &Connection, scope: TreatmentScope) -> ClinicResult<usize> {
    ensure_unbilled(conn, scope)?;

    let (predicate, id) = scope.predicate();
    let removed = conn.execute(&format!("DELETE FROM treatments WHERE {}", predicate), [id])?;
    debug!(?scope, removed, "Removed treatments");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn seed(db: &Database) {
        db.conn()
            .execute_batch(
                r#"
                INSERT INTO clients (id, first_name, last_name, phone, email)
                    VALUES (1, 'Ana', 'Ruiz', '555', 'ana@x.com');
                INSERT INTO pets (id, name, species, breed, age, client_id)
                    VALUES (1, 'Luna', 'felino', 'Siamés', 2, 1);
                INSERT INTO veterinarians (id, first_name, last_name, license_number)
                    VALUES (1, 'Laura', 'Gómez', 'MP-1');
                INSERT INTO appointments (id, scheduled_at, pet_id, veterinarian_id)
                    VALUES (1, '2024-05-01T10:00:00', 1, 1);
                INSERT INTO treatments (id, description, cost, appointment_id)
                    VALUES (1, 'Vacuna', 10.0, 1), (2, 'Control', 5.0, 1);
                "#,
            )
            .unwrap();
    }

    #[test]
    fn test_scopes_select_expected_rows() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        assert_eq!(delete_treatments(db.conn(), TreatmentScope::Treatment(2)).unwrap(), 1);
        assert_eq!(delete_treatments(db.conn(), TreatmentScope::Client(1)).unwrap(), 1);
        assert_eq!(delete_treatments(db.conn(), TreatmentScope::Pet(1)).unwrap(), 0);
    }

    #[test]
    fn test_billed_treatment_blocks_delete() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        db.conn()
            .execute_batch(
                r#"
                INSERT INTO invoices (id, client_id, issued_at, total)
                    VALUES (1, 1, '2024-05-01T00:00:00', 11.6);
                INSERT INTO invoice_lines (invoice_id, treatment_id, quantity, subtotal)
                    VALUES (1, 1, 1, 11.6);
                "#,
            )
            .unwrap();

        let err = delete_treatments(db.conn(), TreatmentScope::Veterinarian(1)).unwrap_err();
        assert!(matches!(err, ClinicError::Validation(ref m) if m.starts_with("Tratamiento facturado")));

        let remaining: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM treatments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 2);
    }
}
