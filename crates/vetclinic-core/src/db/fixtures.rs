//! Row builders shared by the repository tests.

use super::Database;
use crate::models::{
    AppointmentDetail, ClientDetail, InvoiceDetail, NewAppointment, NewClient, NewInvoice,
    NewInvoiceLine, NewPet, NewTreatment, NewVeterinarian, PetDetail, TreatmentDetail,
    VeterinarianDetail,
};

pub fn new_client(email: &str) -> NewClient {
    NewClient {
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
        address: None,
        phone: "555-0001".into(),
        email: email.into(),
    }
}

pub fn client(db: &Database, email: &str) -> ClientDetail {
    db.create_client(&new_client(email)).unwrap()
}

pub fn new_pet(client_id: i64) -> NewPet {
    NewPet {
        name: "Luna".into(),
        species: "felino".into(),
        breed: "Siamés".into(),
        age: 2,
        client_id,
    }
}

pub fn pet(db: &Database, client_id: i64) -> PetDetail {
    db.create_pet(&new_pet(client_id)).unwrap()
}

pub fn new_veterinarian(license_number: &str) -> NewVeterinarian {
    NewVeterinarian {
        first_name: "Laura".into(),
        last_name: "Gómez".into(),
        license_number: license_number.into(),
        phone: None,
        email: None,
        specialty_ids: vec![],
    }
}

pub fn veterinarian(db: &mut Database, license_number: &str) -> VeterinarianDetail {
    db.create_veterinarian(&new_veterinarian(license_number))
        .unwrap()
}

pub fn new_appointment(pet_id: i64, veterinarian_id: i64) -> NewAppointment {
    NewAppointment {
        scheduled_at: "2024-05-01T10:30:00".into(),
        reason: Some("Vacunación anual".into()),
        pet_id,
        veterinarian_id,
    }
}

pub fn appointment(db: &Database, pet_id: i64, veterinarian_id: i64) -> AppointmentDetail {
    db.create_appointment(&new_appointment(pet_id, veterinarian_id))
        .unwrap()
}

pub fn treatment(db: &Database, appointment_id: i64, cost: f64) -> TreatmentDetail {
    db.create_treatment(&NewTreatment {
        description: "Vacuna".into(),
        cost,
        appointment_id,
    })
    .unwrap()
}

pub fn invoice(db: &mut Database, client_id: i64, treatment_id: i64, quantity: i64) -> InvoiceDetail {
    db.create_invoice(&NewInvoice {
        client_id,
        issued_at: "2024-05-02T00:00:00".into(),
        declared_total: None,
        lines: vec![NewInvoiceLine {
            treatment_id,
            quantity,
            declared_subtotal: None,
        }],
    })
    .unwrap()
}
