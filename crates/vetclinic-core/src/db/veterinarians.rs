//! Veterinarian and specialty database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::appointments::appointments_of_veterinarian;
use super::cascade::{delete_treatments, TreatmentScope};
use super::pets::require_pet;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    NewVeterinarian, Specialty, Veterinarian, VeterinarianAppointment, VeterinarianDetail,
    VeterinarianPatch,
};

const VETERINARIAN_COLUMNS: &str = "id, first_name, last_name, license_number, phone, email";

fn veterinarian_from_row(row: &Row<'_>) -> rusqlite::Result<Veterinarian> {
    Ok(Veterinarian {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        license_number: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
    })
}

fn specialty_from_row(row: &Row<'_>) -> rusqlite::Result<Specialty> {
    Ok(Specialty {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn require_veterinarian(conn: &Connection, id: i64) -> ClinicResult<Veterinarian> {
    conn.query_row(
        &format!("SELECT {} FROM veterinarians WHERE id = ?", VETERINARIAN_COLUMNS),
        [id],
        veterinarian_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Veterinarian::NOT_FOUND))
}

fn specialties_of(conn: &Connection, veterinarian_id: i64) -> ClinicResult<Vec<Specialty>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT s.id, s.name
        FROM specialties s
        JOIN veterinarian_specialties vs ON vs.specialty_id = s.id
        WHERE vs.veterinarian_id = ?
        ORDER BY s.name
        "#,
    )?;
    let rows = stmt.query_map([veterinarian_id], specialty_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Replace the specialty set of a veterinarian. Every id must exist.
fn link_specialties(conn: &Connection, veterinarian_id: i64, specialty_ids: &[i64]) -> ClinicResult<()> {
    for specialty_id in specialty_ids {
        let exists = conn
            .query_row("SELECT 1 FROM specialties WHERE id = ?", [specialty_id], |_| Ok(()))
            .optional()?;
        if exists.is_none() {
            return Err(ClinicError::not_found(Specialty::NOT_FOUND));
        }
    }

    conn.execute(
        "DELETE FROM veterinarian_specialties WHERE veterinarian_id = ?",
        [veterinarian_id],
    )?;
    for specialty_id in specialty_ids {
        conn.execute(
            "INSERT INTO veterinarian_specialties (veterinarian_id, specialty_id) VALUES (?1, ?2)",
            params![veterinarian_id, specialty_id],
        )?;
    }
    Ok(())
}

/// Attach specialties and appointments. With `with_pets` each appointment
/// also carries its pet.
fn veterinarian_detail(
    conn: &Connection,
    veterinarian: Veterinarian,
    with_pets: bool,
) -> ClinicResult<VeterinarianDetail> {
    let appointments = appointments_of_veterinarian(conn, veterinarian.id)?
        .into_iter()
        .map(|appointment| -> ClinicResult<VeterinarianAppointment> {
            let pet = if with_pets {
                Some(require_pet(conn, appointment.pet_id)?)
            } else {
                None
            };
            Ok(VeterinarianAppointment { appointment, pet })
        })
        .collect::<ClinicResult<Vec<_>>>()?;

    Ok(VeterinarianDetail {
        specialties: specialties_of(conn, veterinarian.id)?,
        appointments,
        veterinarian,
    })
}

impl Database {
    /// List all specialties by name.
    pub fn list_specialties(&self) -> ClinicResult<Vec<Specialty>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM specialties ORDER BY name")?;
        let rows = stmt.query_map([], specialty_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert any missing specialties. Returns how many were new.
    pub fn seed_specialties(&self, names: &[String]) -> ClinicResult<usize> {
        let mut inserted = 0;
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            inserted += self
                .conn
                .execute("INSERT OR IGNORE INTO specialties (name) VALUES (?)", [name])?;
        }
        if inserted > 0 {
            info!(inserted, "Seeded specialties");
        }
        Ok(inserted)
    }

    /// List all veterinarians by first name, with specialties and appointments.
    pub fn list_veterinarians(&self) -> ClinicResult<Vec<VeterinarianDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM veterinarians ORDER BY first_name, id",
            VETERINARIAN_COLUMNS
        ))?;
        let veterinarians = stmt
            .query_map([], veterinarian_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        veterinarians
            .into_iter()
            .map(|v| veterinarian_detail(&self.conn, v, false))
            .collect()
    }

    pub fn get_veterinarian(&self, id: i64) -> ClinicResult<VeterinarianDetail> {
        let veterinarian = require_veterinarian(&self.conn, id)?;
        veterinarian_detail(&self.conn, veterinarian, true)
    }

    /// Insert a veterinarian and its specialty links in one transaction.
    pub fn create_veterinarian(&mut self, new: &NewVeterinarian) -> ClinicResult<VeterinarianDetail> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO veterinarians (first_name, last_name, license_number, phone, email)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                new.first_name,
                new.last_name,
                new.license_number,
                new.phone,
                new.email
            ],
        )?;
        let id = tx.last_insert_rowid();
        link_specialties(&tx, id, &new.specialty_ids)?;
        tx.commit()?;

        self.get_veterinarian(id)
    }

    pub fn update_veterinarian(
        &mut self,
        id: i64,
        patch: VeterinarianPatch,
    ) -> ClinicResult<VeterinarianDetail> {
        let tx = self.conn.transaction()?;
        let mut veterinarian = require_veterinarian(&tx, id)?;
        veterinarian.apply(&patch);

        tx.execute(
            r#"
            UPDATE veterinarians SET
                first_name = ?2,
                last_name = ?3,
                license_number = ?4,
                phone = ?5,
                email = ?6
            WHERE id = ?1
            "#,
            params![
                veterinarian.id,
                veterinarian.first_name,
                veterinarian.last_name,
                veterinarian.license_number,
                veterinarian.phone,
                veterinarian.email,
            ],
        )?;
        if let Some(specialty_ids) = &patch.specialty_ids {
            link_specialties(&tx, id, specialty_ids)?;
        }
        tx.commit()?;

        self.get_veterinarian(id)
    }

    /// Delete a veterinarian with its appointments, their treatments and its
    /// specialty links.
    pub fn delete_veterinarian(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_veterinarian(&tx, id)?;

        delete_treatments(&tx, TreatmentScope::Veterinarian(id))?;
        let appointments = tx.execute("DELETE FROM appointments WHERE veterinarian_id = ?", [id])?;
        tx.execute(
            "DELETE FROM veterinarian_specialties WHERE veterinarian_id = ?",
            [id],
        )?;
        tx.execute("DELETE FROM veterinarians WHERE id = ?", [id])?;

        tx.commit()?;
        debug!(id, appointments, "Deleted veterinarian");
        Ok(())
    }
}
