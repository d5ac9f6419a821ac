//! Client database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::cascade::{delete_treatments, TreatmentScope};
use super::invoices::invoices_of_client;
use super::pets::pets_of_client;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{Client, ClientDetail, ClientPatch, NewClient};

const CLIENT_COLUMNS: &str = "id, first_name, last_name, address, phone, email";

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
    })
}

/// Load a client, reporting a missing row as `NotFound`.
pub(crate) fn require_client(conn: &Connection, id: i64) -> ClinicResult<Client> {
    conn.query_row(
        &format!("SELECT {} FROM clients WHERE id = ?", CLIENT_COLUMNS),
        [id],
        client_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Client::NOT_FOUND))
}

fn client_detail(conn: &Connection, client: Client) -> ClinicResult<ClientDetail> {
    Ok(ClientDetail {
        pets: pets_of_client(conn, client.id)?,
        invoices: invoices_of_client(conn, client.id)?,
        client,
    })
}

impl Database {
    /// List all clients with their pets and invoices.
    pub fn list_clients(&self) -> ClinicResult<Vec<ClientDetail>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM clients ORDER BY id", CLIENT_COLUMNS))?;
        let clients = stmt
            .query_map([], client_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        clients
            .into_iter()
            .map(|c| client_detail(&self.conn, c))
            .collect()
    }

    pub fn get_client(&self, id: i64) -> ClinicResult<ClientDetail> {
        let client = require_client(&self.conn, id)?;
        client_detail(&self.conn, client)
    }

    /// Insert a new client. A duplicate email is a constraint violation.
    pub fn create_client(&self, new: &NewClient) -> ClinicResult<ClientDetail> {
        self.conn.execute(
            r#"
            INSERT INTO clients (first_name, last_name, address, phone, email)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![new.first_name, new.last_name, new.address, new.phone, new.email],
        )?;
        self.get_client(self.conn.last_insert_rowid())
    }

    pub fn update_client(&self, id: i64, patch: ClientPatch) -> ClinicResult<ClientDetail> {
        let mut client = require_client(&self.conn, id)?;
        client.apply(patch);

        self.conn.execute(
            r#"
            UPDATE clients SET
                first_name = ?2,
                last_name = ?3,
                address = ?4,
                phone = ?5,
                email = ?6
            WHERE id = ?1
            "#,
            params![
                client.id,
                client.first_name,
                client.last_name,
                client.address,
                client.phone,
                client.email,
            ],
        )?;
        client_detail(&self.conn, client)
    }

    /// Delete a client and everything it owns.
    ///
    /// Order: invoice lines, invoices, treatments, appointments, pets, client.
    pub fn delete_client(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_client(&tx, id)?;

        let lines = tx.execute(
            "DELETE FROM invoice_lines WHERE invoice_id IN (SELECT id FROM invoices WHERE client_id = ?)",
            [id],
        )?;
        let invoices = tx.execute("DELETE FROM invoices WHERE client_id = ?", [id])?;
        delete_treatments(&tx, TreatmentScope::Client(id))?;
        let appointments = tx.execute(
            "DELETE FROM appointments WHERE pet_id IN (SELECT id FROM pets WHERE client_id = ?)",
            [id],
        )?;
        let pets = tx.execute("DELETE FROM pets WHERE client_id = ?", [id])?;
        tx.execute("DELETE FROM clients WHERE id = ?", [id])?;

        tx.commit()?;
        debug!(id, lines, invoices, appointments, pets, "Deleted client");
        Ok(())
    }
}
