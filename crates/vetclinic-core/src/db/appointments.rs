//! Appointment database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::cascade::{delete_treatments, TreatmentScope};
use super::pets::require_pet;
use super::treatments::treatments_of_appointment;
use super::veterinarians::require_veterinarian;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Appointment, AppointmentDetail, AppointmentPatch, NewAppointment};

const APPOINTMENT_COLUMNS: &str = "id, scheduled_at, reason, pet_id, veterinarian_id";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        scheduled_at: row.get(1)?,
        reason: row.get(2)?,
        pet_id: row.get(3)?,
        veterinarian_id: row.get(4)?,
    })
}

pub(crate) fn require_appointment(conn: &Connection, id: i64) -> ClinicResult<Appointment> {
    conn.query_row(
        &format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS),
        [id],
        appointment_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Appointment::NOT_FOUND))
}

fn appointments_where(conn: &Connection, column: &str, id: i64) -> ClinicResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM appointments WHERE {} = ? ORDER BY scheduled_at, id",
        APPOINTMENT_COLUMNS, column
    ))?;
    let rows = stmt.query_map([id], appointment_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(crate) fn appointments_of_pet(conn: &Connection, pet_id: i64) -> ClinicResult<Vec<Appointment>> {
    appointments_where(conn, "pet_id", pet_id)
}

pub(crate) fn appointments_of_veterinarian(
    conn: &Connection,
    veterinarian_id: i64,
) -> ClinicResult<Vec<Appointment>> {
    appointments_where(conn, "veterinarian_id", veterinarian_id)
}

fn appointment_detail(conn: &Connection, appointment: Appointment) -> ClinicResult<AppointmentDetail> {
    Ok(AppointmentDetail {
        pet: require_pet(conn, appointment.pet_id)?,
        veterinarian: require_veterinarian(conn, appointment.veterinarian_id)?,
        treatments: treatments_of_appointment(conn, appointment.id)?,
        appointment,
    })
}

impl Database {
    /// List all appointments with pet, veterinarian and treatments.
    pub fn list_appointments(&self) -> ClinicResult<Vec<AppointmentDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments ORDER BY id",
            APPOINTMENT_COLUMNS
        ))?;
        let appointments = stmt
            .query_map([], appointment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        appointments
            .into_iter()
            .map(|a| appointment_detail(&self.conn, a))
            .collect()
    }

    pub fn get_appointment(&self, id: i64) -> ClinicResult<AppointmentDetail> {
        let appointment = require_appointment(&self.conn, id)?;
        appointment_detail(&self.conn, appointment)
    }

    /// Book an appointment. Pet and veterinarian must exist.
    pub fn create_appointment(&self, new: &NewAppointment) -> ClinicResult<AppointmentDetail> {
        require_pet(&self.conn, new.pet_id)?;
        require_veterinarian(&self.conn, new.veterinarian_id)?;

        self.conn.execute(
            r#"
            INSERT INTO appointments (scheduled_at, reason, pet_id, veterinarian_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![new.scheduled_at, new.reason, new.pet_id, new.veterinarian_id],
        )?;
        self.get_appointment(self.conn.last_insert_rowid())
    }

    pub fn update_appointment(&self, id: i64, patch: AppointmentPatch) -> ClinicResult<AppointmentDetail> {
        let mut appointment = require_appointment(&self.conn, id)?;
        if let Some(pet_id) = patch.pet_id {
            require_pet(&self.conn, pet_id)?;
        }
        if let Some(veterinarian_id) = patch.veterinarian_id {
            require_veterinarian(&self.conn, veterinarian_id)?;
        }
        appointment.apply(patch);

        self.conn.execute(
            r#"
            UPDATE appointments SET
                scheduled_at = ?2,
                reason = ?3,
                pet_id = ?4,
                veterinarian_id = ?5
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.scheduled_at,
                appointment.reason,
                appointment.pet_id,
                appointment.veterinarian_id,
            ],
        )?;
        appointment_detail(&self.conn, appointment)
    }

    /// Delete an appointment and its treatments.
    pub fn delete_appointment(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_appointment(&tx, id)?;

        let treatments = delete_treatments(&tx, TreatmentScope::Appointment(id))?;
        tx.execute("DELETE FROM appointments WHERE id = ?", [id])?;

        tx.commit()?;
        debug!(id, treatments, "Deleted appointment");
        Ok(())
    }
}
