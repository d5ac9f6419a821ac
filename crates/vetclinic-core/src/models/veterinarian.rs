//! Veterinarian and specialty models.

use serde::{Deserialize, Serialize};

use super::fields::{patch_text, present};
use super::{Appointment, Pet};
use crate::error::{ClinicError, ClinicResult};

/// A medical specialty. Read-only over HTTP; seeded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specialty {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl Specialty {
    pub const NOT_FOUND: &'static str = "Especialidad no encontrada";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Veterinarian {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// Professional license number, unique across veterinarians
    #[serde(rename = "matricula")]
    pub license_number: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Veterinarian {
    pub const NOT_FOUND: &'static str = "Veterinario no encontrado";

    pub fn apply(&mut self, patch: &VeterinarianPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(license_number) = &patch.license_number {
            self.license_number = license_number.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVeterinarian {
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VeterinarianInput {
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "matricula")]
    pub license_number: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "especialidades")]
    pub specialty_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VeterinarianPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub license_number: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    /// Replaces the whole specialty set when present
    pub specialty_ids: Option<Vec<i64>>,
}

impl VeterinarianInput {
    pub fn into_new(self) -> ClinicResult<NewVeterinarian> {
        let (Some(first_name), Some(last_name), Some(license_number)) = (
            present(self.first_name),
            present(self.last_name),
            present(self.license_number),
        ) else {
            return Err(ClinicError::validation(
                "Nombre, apellido y matrícula son obligatorios",
            ));
        };

        Ok(NewVeterinarian {
            first_name,
            last_name,
            license_number,
            phone: present(self.phone),
            email: present(self.email),
            specialty_ids: dedup_ids(self.specialty_ids.unwrap_or_default()),
        })
    }

    pub fn into_patch(self) -> ClinicResult<VeterinarianPatch> {
        Ok(VeterinarianPatch {
            first_name: patch_text(self.first_name)?,
            last_name: patch_text(self.last_name)?,
            license_number: patch_text(self.license_number)?,
            phone: self.phone.map(|p| present(Some(p))),
            email: self.email.map(|e| present(Some(e))),
            specialty_ids: self.specialty_ids.map(dedup_ids),
        })
    }
}

fn dedup_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// An appointment as listed under a veterinarian; the pet is attached on
/// single-row reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VeterinarianAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(rename = "mascota", skip_serializing_if = "Option::is_none", default)]
    pub pet: Option<Pet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VeterinarianDetail {
    #[serde(flatten)]
    pub veterinarian: Veterinarian,
    #[serde(rename = "especialidades")]
    pub specialties: Vec<Specialty>,
    #[serde(rename = "citas")]
    pub appointments: Vec<VeterinarianAppointment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_is_required() {
        let input = VeterinarianInput {
            first_name: Some("Laura".into()),
            last_name: Some("Gómez".into()),
            ..Default::default()
        };
        assert!(matches!(input.into_new(), Err(ClinicError::Validation(_))));
    }

    #[test]
    fn test_specialty_ids_are_deduplicated() {
        let vet = VeterinarianInput {
            first_name: Some("Laura".into()),
            last_name: Some("Gómez".into()),
            license_number: Some("MP-1001".into()),
            specialty_ids: Some(vec![3, 1, 3]),
            ..Default::default()
        }
        .into_new()
        .unwrap();
        assert_eq!(vet.specialty_ids, vec![1, 3]);
        assert_eq!(vet.phone, None);
    }

    #[test]
    fn test_patch_can_clear_contact_fields() {
        let patch = VeterinarianInput {
            phone: Some("".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.email, None);
        assert_eq!(patch.specialty_ids, None);
    }
}
