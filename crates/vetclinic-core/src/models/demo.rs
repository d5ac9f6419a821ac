//! Standalone demo records with no relations: students and animals.

use serde::{Deserialize, Serialize};

use super::fields::{patch_text, present};
use crate::error::{ClinicError, ClinicResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Student {
    pub const NOT_FOUND: &'static str = "Alumno no encontrado";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl StudentInput {
    pub fn into_new(self) -> ClinicResult<NewStudent> {
        let (Some(name), Some(email)) = (present(self.name), present(self.email)) else {
            return Err(ClinicError::validation("Nombre y email son obligatorios"));
        };
        Ok(NewStudent { name, email })
    }

    pub fn into_patch(self) -> ClinicResult<StudentPatch> {
        Ok(StudentPatch {
            name: patch_text(self.name)?,
            email: patch_text(self.email)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub id: i64,
    /// Unique across animals
    #[serde(rename = "nombre")]
    pub name: String,
}

impl Animal {
    pub const NOT_FOUND: &'static str = "Animal no encontrado";
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimalInput {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
}

impl AnimalInput {
    /// The only field is required on both create and update.
    pub fn into_name(self) -> ClinicResult<String> {
        present(self.name).ok_or_else(|| ClinicError::validation("El nombre es obligatorio"))
    }
}
