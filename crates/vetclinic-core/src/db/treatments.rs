//! Treatment database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::appointments::require_appointment;
use super::cascade::{delete_treatments, TreatmentScope};
use super::invoices::lines_of_treatment;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{NewTreatment, Treatment, TreatmentDetail, TreatmentPatch};

const TREATMENT_COLUMNS: &str = "id, description, cost, appointment_id";

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        id: row.get(0)?,
        description: row.get(1)?,
        cost: row.get(2)?,
        appointment_id: row.get(3)?,
    })
}

pub(crate) fn require_treatment(conn: &Connection, id: i64) -> ClinicResult<Treatment> {
    conn.query_row(
        &format!("SELECT {} FROM treatments WHERE id = ?", TREATMENT_COLUMNS),
        [id],
        treatment_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Treatment::NOT_FOUND))
}

pub(crate) fn treatments_of_appointment(
    conn: &Connection,
    appointment_id: i64,
) -> ClinicResult<Vec<Treatment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM treatments WHERE appointment_id = ? ORDER BY id",
        TREATMENT_COLUMNS
    ))?;
    let rows = stmt.query_map([appointment_id], treatment_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn treatment_detail(conn: &Connection, treatment: Treatment) -> ClinicResult<TreatmentDetail> {
    Ok(TreatmentDetail {
        appointment: require_appointment(conn, treatment.appointment_id)?,
        invoice_lines: lines_of_treatment(conn, treatment.id)?,
        treatment,
    })
}

impl Database {
    /// List all treatments with their appointment and invoice lines.
    pub fn list_treatments(&self) -> ClinicResult<Vec<TreatmentDetail>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM treatments ORDER BY id", TREATMENT_COLUMNS))?;
        let treatments = stmt
            .query_map([], treatment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        treatments
            .into_iter()
            .map(|t| treatment_detail(&self.conn, t))
            .collect()
    }

    pub fn get_treatment(&self, id: i64) -> ClinicResult<TreatmentDetail> {
        let treatment = require_treatment(&self.conn, id)?;
        treatment_detail(&self.conn, treatment)
    }

    /// Record a treatment against an existing appointment.
    pub fn create_treatment(&self, new: &NewTreatment) -> ClinicResult<TreatmentDetail> {
        require_appointment(&self.conn, new.appointment_id)?;

        self.conn.execute(
            "INSERT INTO treatments (description, cost, appointment_id) VALUES (?1, ?2, ?3)",
            params![new.description, new.cost, new.appointment_id],
        )?;
        self.get_treatment(self.conn.last_insert_rowid())
    }

    /// Patch a treatment. Existing invoice lines keep their subtotal.
    pub fn update_treatment(&self, id: i64, patch: TreatmentPatch) -> ClinicResult<TreatmentDetail> {
        let mut treatment = require_treatment(&self.conn, id)?;
        if let Some(appointment_id) = patch.appointment_id {
            require_appointment(&self.conn, appointment_id)?;
        }
        treatment.apply(patch);

        self.conn.execute(
            r#"
            UPDATE treatments SET
                description = ?2,
                cost = ?3,
                appointment_id = ?4
            WHERE id = ?1
            "#,
            params![
                treatment.id,
                treatment.description,
                treatment.cost,
                treatment.appointment_id
            ],
        )?;
        treatment_detail(&self.conn, treatment)
    }

    /// Delete a treatment. Fails while an invoice line still bills it.
    pub fn delete_treatment(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_treatment(&tx, id)?;
        delete_treatments(&tx, TreatmentScope::Treatment(id))?;
        tx.commit()?;

        debug!(id, "Deleted treatment");
        Ok(())
    }
}
