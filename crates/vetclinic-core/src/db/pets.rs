//! Pet database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::appointments::appointments_of_pet;
use super::cascade::{delete_treatments, TreatmentScope};
use super::clients::require_client;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{NewPet, Pet, PetDetail, PetPatch};

const PET_COLUMNS: &str = "id, name, species, breed, age, client_id";

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        breed: row.get(3)?,
        age: row.get(4)?,
        client_id: row.get(5)?,
    })
}

pub(crate) fn require_pet(conn: &Connection, id: i64) -> ClinicResult<Pet> {
    conn.query_row(
        &format!("SELECT {} FROM pets WHERE id = ?", PET_COLUMNS),
        [id],
        pet_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Pet::NOT_FOUND))
}

pub(crate) fn pets_of_client(conn: &Connection, client_id: i64) -> ClinicResult<Vec<Pet>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM pets WHERE client_id = ? ORDER BY id",
        PET_COLUMNS
    ))?;
    let rows = stmt.query_map([client_id], pet_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn pet_detail(conn: &Connection, pet: Pet) -> ClinicResult<PetDetail> {
    Ok(PetDetail {
        client: require_client(conn, pet.client_id)?,
        appointments: appointments_of_pet(conn, pet.id)?,
        pet,
    })
}

impl Database {
    /// List all pets with owner and appointments.
    pub fn list_pets(&self) -> ClinicResult<Vec<PetDetail>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM pets ORDER BY id", PET_COLUMNS))?;
        let pets = stmt
            .query_map([], pet_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        pets.into_iter().map(|p| pet_detail(&self.conn, p)).collect()
    }

    pub fn get_pet(&self, id: i64) -> ClinicResult<PetDetail> {
        let pet = require_pet(&self.conn, id)?;
        pet_detail(&self.conn, pet)
    }

    /// Insert a new pet. The owning client must exist.
    pub fn create_pet(&self, new: &NewPet) -> ClinicResult<PetDetail> {
        require_client(&self.conn, new.client_id)?;

        self.conn.execute(
            r#"
            INSERT INTO pets (name, species, breed, age, client_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![new.name, new.species, new.breed, new.age, new.client_id],
        )?;
        self.get_pet(self.conn.last_insert_rowid())
    }

    pub fn update_pet(&self, id: i64, patch: PetPatch) -> ClinicResult<PetDetail> {
        let mut pet = require_pet(&self.conn, id)?;
        if let Some(client_id) = patch.client_id {
            require_client(&self.conn, client_id)?;
        }
        pet.apply(patch);

        self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?2,
                species = ?3,
                breed = ?4,
                age = ?5,
                client_id = ?6
            WHERE id = ?1
            "#,
            params![pet.id, pet.name, pet.species, pet.breed, pet.age, pet.client_id],
        )?;
        pet_detail(&self.conn, pet)
    }

    /// Delete a pet with its appointments and their treatments.
    pub fn delete_pet(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_pet(&tx, id)?;

        delete_treatments(&tx, TreatmentScope::Pet(id))?;
        let appointments = tx.execute("DELETE FROM appointments WHERE pet_id = ?", [id])?;
        tx.execute("DELETE FROM pets WHERE id = ?", [id])?;

        tx.commit()?;
        debug!(id, appointments, "Deleted pet");
        Ok(())
    }
}
