//! Appointment models.

use serde::{Deserialize, Serialize};

use super::fields::{normalize_timestamp, present};
use super::{Pet, Treatment, Veterinarian};
use crate::error::{ClinicError, ClinicResult};

/// A visit of one pet to one veterinarian.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    /// Normalized `YYYY-MM-DDTHH:MM:SS`
    #[serde(rename = "fecha")]
    pub scheduled_at: String,
    #[serde(rename = "motivo")]
    pub reason: Option<String>,
    #[serde(rename = "mascotaId")]
    pub pet_id: i64,
    #[serde(rename = "veterinarioId")]
    pub veterinarian_id: i64,
}

impl Appointment {
    pub const NOT_FOUND: &'static str = "Cita no encontrada";

    pub fn apply(&mut self, patch: AppointmentPatch) {
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(pet_id) = patch.pet_id {
            self.pet_id = pet_id;
        }
        if let Some(veterinarian_id) = patch.veterinarian_id {
            self.veterinarian_id = veterinarian_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub scheduled_at: String,
    pub reason: Option<String>,
    pub pet_id: i64,
    pub veterinarian_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentInput {
    #[serde(rename = "fecha")]
    pub scheduled_at: Option<String>,
    #[serde(rename = "motivo")]
    pub reason: Option<String>,
    #[serde(rename = "mascotaId")]
    pub pet_id: Option<i64>,
    #[serde(rename = "veterinarioId")]
    pub veterinarian_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub scheduled_at: Option<String>,
    pub reason: Option<Option<String>>,
    pub pet_id: Option<i64>,
    pub veterinarian_id: Option<i64>,
}

impl AppointmentInput {
    pub fn into_new(self) -> ClinicResult<NewAppointment> {
        let (Some(scheduled_at), Some(pet_id), Some(veterinarian_id)) =
            (present(self.scheduled_at), self.pet_id, self.veterinarian_id)
        else {
            return Err(ClinicError::validation(
                "Faltan campos obligatorios: mascotaId, veterinarioId, fecha",
            ));
        };

        Ok(NewAppointment {
            scheduled_at: normalize_timestamp(&scheduled_at)?,
            reason: present(self.reason),
            pet_id,
            veterinarian_id,
        })
    }

    pub fn into_patch(self) -> ClinicResult<AppointmentPatch> {
        let scheduled_at = match self.scheduled_at {
            Some(raw) => Some(normalize_timestamp(&raw)?),
            None => None,
        };

        Ok(AppointmentPatch {
            scheduled_at,
            reason: self.reason.map(|r| present(Some(r))),
            pet_id: self.pet_id,
            veterinarian_id: self.veterinarian_id,
        })
    }
}

/// An appointment with its pet, veterinarian and treatments attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(rename = "mascota")]
    pub pet: Pet,
    #[serde(rename = "veterinario")]
    pub veterinarian: Veterinarian,
    #[serde(rename = "tratamientos")]
    pub treatments: Vec<Treatment>,
}
