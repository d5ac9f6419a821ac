//! Client (pet owner) models.

use serde::{Deserialize, Serialize};

use super::fields::{patch_text, present};
use super::{Invoice, Pet, MISSING_FIELDS};
use crate::error::{ClinicError, ClinicResult};

/// A clinic client. Owns pets and invoices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Unique across clients
    pub email: String,
}

impl Client {
    pub const NOT_FOUND: &'static str = "Cliente no encontrado";

    /// Apply a validated patch in place.
    pub fn apply(&mut self, patch: ClientPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

/// Validated fields for a new client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone: String,
    pub email: String,
}

/// Raw client payload as posted by the forms. Every field is optional so
/// that missing fields surface as a validation error, not a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the address
    pub address: Option<Option<String>>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ClientInput {
    pub fn into_new(self) -> ClinicResult<NewClient> {
        let (Some(first_name), Some(last_name), Some(phone), Some(email)) = (
            present(self.first_name),
            present(self.last_name),
            present(self.phone),
            present(self.email),
        ) else {
            return Err(ClinicError::validation(MISSING_FIELDS));
        };

        Ok(NewClient {
            first_name,
            last_name,
            address: present(self.address),
            phone,
            email: check_email(email)?,
        })
    }

    pub fn into_patch(self) -> ClinicResult<ClientPatch> {
        Ok(ClientPatch {
            first_name: patch_text(self.first_name)?,
            last_name: patch_text(self.last_name)?,
            address: self.address.map(|a| present(Some(a))),
            phone: patch_text(self.phone)?,
            email: patch_text(self.email)?.map(check_email).transpose()?,
        })
    }
}

fn check_email(email: String) -> ClinicResult<String> {
    if email.contains('@') {
        Ok(email)
    } else {
        Err(ClinicError::validation("Email inválido"))
    }
}

/// A client with its pets and invoices attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    #[serde(rename = "mascotas")]
    pub pets: Vec<Pet>,
    #[serde(rename = "facturas")]
    pub invoices: Vec<Invoice>,
}
