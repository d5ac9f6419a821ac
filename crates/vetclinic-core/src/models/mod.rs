//! Domain models for the clinic.
//!
//! Wire names follow the clinic's JSON contract (`nombre`, `clienteId`, ...);
//! Rust field names are the English equivalents.

mod appointment;
mod client;
mod demo;
mod fields;
mod invoice;
mod pet;
mod treatment;
mod user;
mod veterinarian;

pub use appointment::*;
pub use client::*;
pub use demo::*;
pub use fields::normalize_timestamp;
pub use invoice::*;
pub use pet::*;
pub use treatment::*;
pub use user::*;
pub use veterinarian::*;

/// Message returned when a create payload lacks a required field.
pub const MISSING_FIELDS: &str = "Campos obligatorios faltantes";

/// Message returned when a patch blanks out a required field.
pub const EMPTY_FIELDS: &str = "Los campos obligatorios no pueden estar vacíos";

/// Row counts for the management dashboard.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ClinicSummary {
    #[serde(rename = "clientes")]
    pub clients: i64,
    #[serde(rename = "mascotas")]
    pub pets: i64,
    #[serde(rename = "veterinarios")]
    pub veterinarians: i64,
    #[serde(rename = "citas")]
    pub appointments: i64,
    #[serde(rename = "tratamientos")]
    pub treatments: i64,
    #[serde(rename = "facturas")]
    pub invoices: i64,
    /// Sum of all invoice totals
    #[serde(rename = "totalFacturado")]
    pub billed_total: f64,
}
