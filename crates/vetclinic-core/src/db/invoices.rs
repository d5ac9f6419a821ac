//! Invoice database operations.
//!
//! Invoice writes always run in a transaction: the header, its lines and the
//! recomputed total either all land or none do.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::clients::require_client;
use super::treatments::require_treatment;
use super::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    check_declared_total, price_lines, Invoice, InvoiceDetail, InvoiceLine, InvoicePatch,
    NewInvoice, NewInvoiceLine, PricedLine,
};

const INVOICE_COLUMNS: &str = "id, client_id, issued_at, total";
const LINE_COLUMNS: &str = "id, invoice_id, treatment_id, quantity, subtotal";

fn invoice_from_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: row.get(0)?,
        client_id: row.get(1)?,
        issued_at: row.get(2)?,
        total: row.get(3)?,
    })
}

fn line_from_row(row: &Row<'_>) -> rusqlite::Result<InvoiceLine> {
    Ok(InvoiceLine {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        treatment_id: row.get(2)?,
        quantity: row.get(3)?,
        subtotal: row.get(4)?,
    })
}

pub(crate) fn require_invoice(conn: &Connection, id: i64) -> ClinicResult<Invoice> {
    conn.query_row(
        &format!("SELECT {} FROM invoices WHERE id = ?", INVOICE_COLUMNS),
        [id],
        invoice_from_row,
    )
    .optional()?
    .ok_or_else(|| ClinicError::not_found(Invoice::NOT_FOUND))
}

pub(crate) fn invoices_of_client(conn: &Connection, client_id: i64) -> ClinicResult<Vec<Invoice>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM invoices WHERE client_id = ? ORDER BY id",
        INVOICE_COLUMNS
    ))?;
    let rows = stmt.query_map([client_id], invoice_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn lines_where(conn: &Connection, column: &str, id: i64) -> ClinicResult<Vec<InvoiceLine>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM invoice_lines WHERE {} = ? ORDER BY id",
        LINE_COLUMNS, column
    ))?;
    let rows = stmt.query_map([id], line_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(crate) fn lines_of_invoice(conn: &Connection, invoice_id: i64) -> ClinicResult<Vec<InvoiceLine>> {
    lines_where(conn, "invoice_id", invoice_id)
}

pub(crate) fn lines_of_treatment(conn: &Connection, treatment_id: i64) -> ClinicResult<Vec<InvoiceLine>> {
    lines_where(conn, "treatment_id", treatment_id)
}

/// Price lines against the current treatment costs and check any declared
/// total. Returns the priced lines and the invoice total.
fn price_invoice(
    conn: &Connection,
    lines: &[NewInvoiceLine],
    declared_total: Option<f64>,
) -> ClinicResult<(Vec<PricedLine>, f64)> {
    let (priced, total) = price_lines(lines, |treatment_id| {
        Ok(require_treatment(conn, treatment_id)?.cost)
    })?;
    check_declared_total(declared_total, total, priced.len())?;
    Ok((priced, total))
}

fn insert_lines(conn: &Connection, invoice_id: i64, lines: &[PricedLine]) -> ClinicResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO invoice_lines (invoice_id, treatment_id, quantity, subtotal)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )?;
    for line in lines {
        stmt.execute(params![invoice_id, line.treatment_id, line.quantity, line.subtotal])?;
    }
    Ok(())
}

fn invoice_detail(conn: &Connection, invoice: Invoice) -> ClinicResult<InvoiceDetail> {
    Ok(InvoiceDetail {
        client: require_client(conn, invoice.client_id)?,
        lines: lines_of_invoice(conn, invoice.id)?,
        invoice,
    })
}

impl Database {
    /// List all invoices with client and lines.
    pub fn list_invoices(&self) -> ClinicResult<Vec<InvoiceDetail>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM invoices ORDER BY id", INVOICE_COLUMNS))?;
        let invoices = stmt
            .query_map([], invoice_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        invoices
            .into_iter()
            .map(|i| invoice_detail(&self.conn, i))
            .collect()
    }

    pub fn get_invoice(&self, id: i64) -> ClinicResult<InvoiceDetail> {
        let invoice = require_invoice(&self.conn, id)?;
        invoice_detail(&self.conn, invoice)
    }

    /// Read a single invoice line.
    pub fn get_invoice_line(&self, id: i64) -> ClinicResult<InvoiceLine> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM invoice_lines WHERE id = ?", LINE_COLUMNS),
                [id],
                line_from_row,
            )
            .optional()?
            .ok_or_else(|| ClinicError::not_found(InvoiceLine::NOT_FOUND))
    }

    /// Create an invoice with its lines. Subtotals and the total are computed
    /// here from the treatment costs.
    pub fn create_invoice(&mut self, new: &NewInvoice) -> ClinicResult<InvoiceDetail> {
        let tx = self.conn.transaction()?;
        require_client(&tx, new.client_id)?;
        let (priced, total) = price_invoice(&tx, &new.lines, new.declared_total)?;

        tx.execute(
            "INSERT INTO invoices (client_id, issued_at, total) VALUES (?1, ?2, ?3)",
            params![new.client_id, new.issued_at, total],
        )?;
        let id = tx.last_insert_rowid();
        insert_lines(&tx, id, &priced)?;
        tx.commit()?;

        debug!(id, lines = priced.len(), total, "Created invoice");
        self.get_invoice(id)
    }

    /// Patch an invoice. New lines replace all existing ones and reset the
    /// total; otherwise a declared total is checked against the stored one.
    pub fn update_invoice(&mut self, id: i64, patch: InvoicePatch) -> ClinicResult<InvoiceDetail> {
        let tx = self.conn.transaction()?;
        let mut invoice = require_invoice(&tx, id)?;

        if let Some(client_id) = patch.client_id {
            require_client(&tx, client_id)?;
            invoice.client_id = client_id;
        }
        if let Some(issued_at) = patch.issued_at {
            invoice.issued_at = issued_at;
        }

        match &patch.lines {
            Some(lines) => {
                let (priced, total) = price_invoice(&tx, lines, patch.declared_total)?;
                tx.execute("DELETE FROM invoice_lines WHERE invoice_id = ?", [id])?;
                insert_lines(&tx, id, &priced)?;
                invoice.total = total;
            }
            None => {
                let count = lines_of_invoice(&tx, id)?.len();
                check_declared_total(patch.declared_total, invoice.total, count)?;
            }
        }

        tx.execute(
            "UPDATE invoices SET client_id = ?2, issued_at = ?3, total = ?4 WHERE id = ?1",
            params![invoice.id, invoice.client_id, invoice.issued_at, invoice.total],
        )?;
        tx.commit()?;

        self.get_invoice(id)
    }

    /// Delete an invoice and its lines.
    pub fn delete_invoice(&mut self, id: i64) -> ClinicResult<()> {
        let tx = self.conn.transaction()?;
        require_invoice(&tx, id)?;

        let lines = tx.execute("DELETE FROM invoice_lines WHERE invoice_id = ?", [id])?;
        tx.execute("DELETE FROM invoices WHERE id = ?", [id])?;

        tx.commit()?;
        debug!(id, lines, "Deleted invoice");
        Ok(())
    }
}
