//! Pet (patient) models.

use serde::{Deserialize, Serialize};

use super::fields::{patch_text, present};
use super::{Appointment, Client};
use crate::error::{ClinicError, ClinicResult};

/// A patient. Cannot exist without an owning client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Species (e.g., "canino", "felino")
    #[serde(rename = "especie")]
    pub species: String,
    #[serde(rename = "raza")]
    pub breed: String,
    /// Age in years
    #[serde(rename = "edad")]
    pub age: i64,
    #[serde(rename = "clienteId")]
    pub client_id: i64,
}

impl Pet {
    pub const NOT_FOUND: &'static str = "Mascota no encontrada";

    pub fn apply(&mut self, patch: PetPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(species) = patch.species {
            self.species = species;
        }
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: i64,
    pub client_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetInput {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "especie")]
    pub species: Option<String>,
    #[serde(rename = "raza")]
    pub breed: Option<String>,
    #[serde(rename = "edad")]
    pub age: Option<i64>,
    #[serde(rename = "clienteId")]
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i64>,
    /// Re-home the pet; the new owner must exist
    pub client_id: Option<i64>,
}

impl PetInput {
    pub fn into_new(self) -> ClinicResult<NewPet> {
        let (Some(name), Some(species), Some(breed), Some(age), Some(client_id)) = (
            present(self.name),
            present(self.species),
            present(self.breed),
            self.age,
            self.client_id,
        ) else {
            return Err(ClinicError::validation("Todos los campos son obligatorios"));
        };

        Ok(NewPet {
            name,
            species,
            breed,
            age: check_age(age)?,
            client_id,
        })
    }

    pub fn into_patch(self) -> ClinicResult<PetPatch> {
        Ok(PetPatch {
            name: patch_text(self.name)?,
            species: patch_text(self.species)?,
            breed: patch_text(self.breed)?,
            age: self.age.map(check_age).transpose()?,
            client_id: self.client_id,
        })
    }
}

fn check_age(age: i64) -> ClinicResult<i64> {
    if age >= 0 {
        Ok(age)
    } else {
        Err(ClinicError::validation("La edad no puede ser negativa"))
    }
}

/// A pet with its owner and appointments attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetDetail {
    #[serde(flatten)]
    pub pet: Pet,
    #[serde(rename = "cliente")]
    pub client: Client,
    #[serde(rename = "citas")]
    pub appointments: Vec<Appointment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luna() -> PetInput {
        PetInput {
            name: Some("Luna".into()),
            species: Some("felino".into()),
            breed: Some("Siamés".into()),
            age: Some(0),
            client_id: Some(1),
        }
    }

    #[test]
    fn test_zero_age_is_valid() {
        let pet = luna().into_new().unwrap();
        assert_eq!(pet.age, 0);
    }

    #[test]
    fn test_negative_age_rejected() {
        let mut input = luna();
        input.age = Some(-2);
        assert!(matches!(input.into_new(), Err(ClinicError::Validation(_))));
    }

    #[test]
    fn test_missing_owner_rejected() {
        let mut input = luna();
        input.client_id = None;
        assert!(matches!(input.into_new(), Err(ClinicError::Validation(_))));
    }

    #[test]
    fn test_patch_keeps_untouched_fields() {
        let mut pet = Pet {
            id: 3,
            name: "Luna".into(),
            species: "felino".into(),
            breed: "Siamés".into(),
            age: 2,
            client_id: 1,
        };
        pet.apply(
            PetInput {
                age: Some(3),
                ..Default::default()
            }
            .into_patch()
            .unwrap(),
        );
        assert_eq!(pet.age, 3);
        assert_eq!(pet.name, "Luna");
        assert_eq!(pet.client_id, 1);
    }
}
