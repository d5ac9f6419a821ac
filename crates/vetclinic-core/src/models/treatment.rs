//! Treatment models.

use serde::{Deserialize, Serialize};

use super::fields::{non_negative_amount, patch_text, present};
use super::{Appointment, InvoiceLine, MISSING_FIELDS};
use crate::error::{ClinicError, ClinicResult};

const NEGATIVE_COST: &str = "El costo no puede ser negativo";

/// A billable procedure performed during an appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "costo")]
    pub cost: f64,
    #[serde(rename = "citaId")]
    pub appointment_id: i64,
}

impl Treatment {
    pub const NOT_FOUND: &'static str = "Tratamiento no encontrado";

    pub fn apply(&mut self, patch: TreatmentPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(appointment_id) = patch.appointment_id {
            self.appointment_id = appointment_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTreatment {
    pub description: String,
    pub cost: f64,
    pub appointment_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreatmentInput {
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "costo")]
    pub cost: Option<f64>,
    #[serde(rename = "citaId")]
    pub appointment_id: Option<i64>,
}

/// Partial update. Changing the cost does not reprice existing invoice lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreatmentPatch {
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub appointment_id: Option<i64>,
}

impl TreatmentInput {
    pub fn into_new(self) -> ClinicResult<NewTreatment> {
        let (Some(description), Some(cost), Some(appointment_id)) =
            (present(self.description), self.cost, self.appointment_id)
        else {
            return Err(ClinicError::validation(MISSING_FIELDS));
        };

        Ok(NewTreatment {
            description,
            cost: non_negative_amount(cost, NEGATIVE_COST)?,
            appointment_id,
        })
    }

    pub fn into_patch(self) -> ClinicResult<TreatmentPatch> {
        Ok(TreatmentPatch {
            description: patch_text(self.description)?,
            cost: self
                .cost
                .map(|c| non_negative_amount(c, NEGATIVE_COST))
                .transpose()?,
            appointment_id: self.appointment_id,
        })
    }
}

/// A treatment with its appointment and the invoice lines billing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentDetail {
    #[serde(flatten)]
    pub treatment: Treatment,
    #[serde(rename = "cita")]
    pub appointment: Appointment,
    #[serde(rename = "detalles")]
    pub invoice_lines: Vec<InvoiceLine>,
}
