//! Invoice models and line pricing.

use serde::{Deserialize, Serialize};

use super::fields::{non_negative_amount, normalize_timestamp, present};
use super::Client;
use crate::error::{ClinicError, ClinicResult};

/// Fixed surcharge applied to every invoice line (16%). The stored line
/// subtotal is the surcharged amount rounded to cents, so it can differ from
/// the exact product by up to half a cent.
pub const SURCHARGE_RATE: f64 = 0.16;

/// Largest per-line rounding gap tolerated between a client-computed amount
/// and the server-computed one.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Round to cents, half away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `cost × quantity × (1 + SURCHARGE_RATE)`, rounded to cents once per line.
///
/// The invoice total sums these rounded subtotals; it is not the rounded sum
/// of the exact products. A cost of 10.01 bills 11.61, not 11.6116.
pub fn line_subtotal(cost: f64, quantity: i64) -> f64 {
    round_cents(cost * quantity as f64 * (1.0 + SURCHARGE_RATE))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: i64,
    #[serde(rename = "clienteId")]
    pub client_id: i64,
    #[serde(rename = "fecha")]
    pub issued_at: String,
    /// Always the sum of the line subtotals
    pub total: f64,
}

impl Invoice {
    pub const NOT_FOUND: &'static str = "Factura no encontrada";
}

/// One billed treatment. The subtotal is fixed when the line is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub id: i64,
    #[serde(rename = "facturaId")]
    pub invoice_id: i64,
    #[serde(rename = "tratamientoId")]
    pub treatment_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    pub subtotal: f64,
}

impl InvoiceLine {
    pub const NOT_FOUND: &'static str = "Detalle de factura no encontrado";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoiceLine {
    pub treatment_id: i64,
    pub quantity: i64,
    /// Subtotal as computed by the caller, checked against ours
    pub declared_subtotal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub client_id: i64,
    pub issued_at: String,
    pub declared_total: Option<f64>,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceLineInput {
    #[serde(rename = "tratamientoId")]
    pub treatment_id: Option<i64>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<i64>,
    pub subtotal: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceInput {
    #[serde(rename = "clienteId")]
    pub client_id: Option<i64>,
    #[serde(rename = "fecha")]
    pub issued_at: Option<String>,
    pub total: Option<f64>,
    #[serde(rename = "detalles")]
    pub lines: Option<Vec<InvoiceLineInput>>,
}

/// Partial update. When `lines` is present every existing line is replaced
/// and the total recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicePatch {
    pub client_id: Option<i64>,
    pub issued_at: Option<String>,
    pub declared_total: Option<f64>,
    pub lines: Option<Vec<NewInvoiceLine>>,
}

impl InvoiceInput {
    pub fn into_new(self) -> ClinicResult<NewInvoice> {
        let (Some(client_id), Some(issued_at), Some(lines)) =
            (self.client_id, present(self.issued_at), self.lines)
        else {
            return Err(ClinicError::validation(
                "Todos los campos son obligatorios y 'detalles' debe ser un array",
            ));
        };

        Ok(NewInvoice {
            client_id,
            issued_at: normalize_timestamp(&issued_at)?,
            declared_total: check_total(self.total)?,
            lines: check_lines(lines)?,
        })
    }

    pub fn into_patch(self) -> ClinicResult<InvoicePatch> {
        let issued_at = match self.issued_at {
            Some(raw) => Some(normalize_timestamp(&raw)?),
            None => None,
        };

        Ok(InvoicePatch {
            client_id: self.client_id,
            issued_at,
            declared_total: check_total(self.total)?,
            lines: self.lines.map(check_lines).transpose()?,
        })
    }
}

fn check_total(total: Option<f64>) -> ClinicResult<Option<f64>> {
    total
        .map(|t| non_negative_amount(t, "El total no puede ser negativo"))
        .transpose()
}

fn check_lines(lines: Vec<InvoiceLineInput>) -> ClinicResult<Vec<NewInvoiceLine>> {
    if lines.is_empty() {
        return Err(ClinicError::validation(
            "La factura debe tener al menos un detalle",
        ));
    }

    lines
        .into_iter()
        .map(|line| {
            let (Some(treatment_id), Some(quantity)) = (line.treatment_id, line.quantity) else {
                return Err(ClinicError::validation(
                    "Cada detalle requiere tratamientoId y cantidad",
                ));
            };
            if quantity < 1 {
                return Err(ClinicError::validation("La cantidad debe ser al menos 1"));
            }
            Ok(NewInvoiceLine {
                treatment_id,
                quantity,
                declared_subtotal: line.subtotal,
            })
        })
        .collect()
}

/// A line priced against its treatment's current cost.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub treatment_id: i64,
    pub quantity: i64,
    pub subtotal: f64,
}

/// Price every line and return them with the invoice total.
///
/// `cost_of` resolves a treatment id to its cost and reports missing
/// treatments. A declared subtotal that disagrees with the computed one is a
/// validation error.
pub fn price_lines<F>(lines: &[NewInvoiceLine], mut cost_of: F) -> ClinicResult<(Vec<PricedLine>, f64)>
where
    F: FnMut(i64) -> ClinicResult<f64>,
{
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = 0.0;

    for line in lines {
        let subtotal = line_subtotal(cost_of(line.treatment_id)?, line.quantity);
        if let Some(declared) = line.declared_subtotal {
            if (declared - subtotal).abs() > AMOUNT_TOLERANCE {
                return Err(ClinicError::validation(format!(
                    "Subtotal incorrecto para el tratamiento {}: esperado {:.2}",
                    line.treatment_id, subtotal
                )));
            }
        }
        total += subtotal;
        priced.push(PricedLine {
            treatment_id: line.treatment_id,
            quantity: line.quantity,
            subtotal,
        });
    }

    Ok((priced, round_cents(total)))
}

/// Reject a client-supplied total that does not match the line sum.
pub fn check_declared_total(declared: Option<f64>, computed: f64, line_count: usize) -> ClinicResult<()> {
    let Some(declared) = declared else {
        return Ok(());
    };
    let tolerance = AMOUNT_TOLERANCE * line_count.max(1) as f64;
    if (declared - computed).abs() > tolerance {
        return Err(ClinicError::validation(format!(
            "El total no coincide con los detalles: esperado {:.2}",
            computed
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    #[serde(rename = "cliente")]
    pub client: Client,
    #[serde(rename = "detalles")]
    pub lines: Vec<InvoiceLine>,
}
