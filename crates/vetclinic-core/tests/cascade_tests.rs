//! Delete cascade integration tests.

use serde_json::json;
use vetclinic_core::db::Database;
use vetclinic_core::models::{
    AppointmentInput, ClientInput, InvoiceInput, PetInput, TreatmentInput, VeterinarianInput,
};
use vetclinic_core::ClinicError;

struct Clinic {
    db: Database,
    client: i64,
    pets: Vec<i64>,
    vet: i64,
    appointments: Vec<i64>,
    treatments: Vec<i64>,
}

fn client(db: &Database, email: &str) -> i64 {
    let input: ClientInput = serde_json::from_value(json!({
        "nombre": "Ana",
        "apellido": "Ruiz",
        "telefono": "555-0001",
        "email": email,
    }))
    .unwrap();
    db.create_client(&input.into_new().unwrap()).unwrap().client.id
}

fn pet(db: &Database, client_id: i64, name: &str) -> i64 {
    let input: PetInput = serde_json::from_value(json!({
        "nombre": name,
        "especie": "canino",
        "raza": "Mestizo",
        "edad": 4,
        "clienteId": client_id,
    }))
    .unwrap();
    db.create_pet(&input.into_new().unwrap()).unwrap().pet.id
}

fn appointment(db: &Database, pet_id: i64, vet_id: i64) -> i64 {
    let input: AppointmentInput = serde_json::from_value(json!({
        "fecha": "2024-05-01T10:30",
        "mascotaId": pet_id,
        "veterinarioId": vet_id,
    }))
    .unwrap();
    db.create_appointment(&input.into_new().unwrap())
        .unwrap()
        .appointment
        .id
}

fn treatment(db: &Database, appointment_id: i64) -> i64 {
    let input: TreatmentInput = serde_json::from_value(json!({
        "descripcion": "Desparasitación",
        "costo": 30.0,
        "citaId": appointment_id,
    }))
    .unwrap();
    db.create_treatment(&input.into_new().unwrap())
        .unwrap()
        .treatment
        .id
}

fn invoice(db: &mut Database, client_id: i64, treatment_id: i64) -> i64 {
    let input: InvoiceInput = serde_json::from_value(json!({
        "clienteId": client_id,
        "fecha": "2024-05-02",
        "detalles": [{ "tratamientoId": treatment_id, "cantidad": 1 }],
    }))
    .unwrap();
    db.create_invoice(&input.into_new().unwrap())
        .unwrap()
        .invoice
        .id
}

/// One client with three pets, one appointment and treatment per pet.
fn clinic() -> Clinic {
    let mut db = Database::open_in_memory().unwrap();
    let client = client(&db, "ana@x.com");
    let pets: Vec<i64> = ["Toby", "Kira", "Max"]
        .iter()
        .map(|name| pet(&db, client, name))
        .collect();

    let vet_input: VeterinarianInput = serde_json::from_value(json!({
        "nombre": "Laura",
        "apellido": "Gómez",
        "matricula": "MP-1001",
    }))
    .unwrap();
    let vet = db
        .create_veterinarian(&vet_input.into_new().unwrap())
        .unwrap()
        .veterinarian
        .id;

    let appointments: Vec<i64> = pets.iter().map(|&p| appointment(&db, p, vet)).collect();
    let treatments: Vec<i64> = appointments.iter().map(|&a| treatment(&db, a)).collect();

    Clinic {
        db,
        client,
        pets,
        vet,
        appointments,
        treatments,
    }
}

fn count(db: &Database, sql: &str, id: i64) -> i64 {
    db.conn().query_row(sql, [id], |row| row.get(0)).unwrap()
}

#[test]
fn test_client_delete_leaves_no_pets() {
    let mut c = clinic();
    invoice(&mut c.db, c.client, c.treatments[0]);
    assert_eq!(
        count(&c.db, "SELECT COUNT(*) FROM pets WHERE client_id = ?", c.client),
        3
    );

    c.db.delete_client(c.client).unwrap();

    assert_eq!(
        count(&c.db, "SELECT COUNT(*) FROM pets WHERE client_id = ?", c.client),
        0
    );
    for pet in &c.pets {
        assert!(matches!(c.db.get_pet(*pet), Err(ClinicError::NotFound(_))));
    }
    for appointment in &c.appointments {
        assert!(c.db.get_appointment(*appointment).is_err());
    }
    // The veterinarian is not owned by the client.
    assert!(c.db.get_veterinarian(c.vet).unwrap().appointments.is_empty());
}

#[test]
fn test_client_delete_blocked_by_foreign_invoice() {
    let mut c = clinic();
    let other = client(&c.db, "leo@x.com");
    invoice(&mut c.db, other, c.treatments[1]);

    let err = c.db.delete_client(c.client).unwrap_err();
    assert!(matches!(err, ClinicError::Validation(_)));

    // Nothing was removed.
    let detail = c.db.get_client(c.client).unwrap();
    assert_eq!(detail.pets.len(), 3);
    assert_eq!(c.db.summary().unwrap().treatments, 3);
}

/// A pet billed to its first owner and then moved to a new owner keeps its
/// billed treatment. The new owner cannot be deleted while the first owner's
/// invoice still bills it; deleting the first owner releases it.
#[test]
fn test_rehomed_pet_billed_by_previous_owner() {
    let mut c = clinic();
    invoice(&mut c.db, c.client, c.treatments[0]);

    let new_owner = client(&c.db, "leo@x.com");
    let move_pet: PetInput = serde_json::from_value(json!({ "clienteId": new_owner })).unwrap();
    c.db.update_pet(c.pets[0], move_pet.into_patch().unwrap())
        .unwrap();

    let err = c.db.delete_client(new_owner).unwrap_err();
    assert!(matches!(err, ClinicError::Validation(ref m) if m.starts_with("Tratamiento facturado")));
    assert_eq!(c.db.get_pet(c.pets[0]).unwrap().client.id, new_owner);
    assert_eq!(c.db.get_treatment(c.treatments[0]).unwrap().invoice_lines.len(), 1);

    // The first owner's own invoice goes with it, which releases the treatment.
    c.db.delete_client(c.client).unwrap();
    c.db.delete_client(new_owner).unwrap();
    assert!(matches!(c.db.get_pet(c.pets[0]), Err(ClinicError::NotFound(_))));
    assert_eq!(c.db.summary().unwrap().treatments, 0);
}

#[test]
fn test_veterinarian_delete_cascades_across_clients() {
    let mut c = clinic();
    let other = client(&c.db, "leo@x.com");
    let other_pet = pet(&c.db, other, "Nina");
    appointment(&c.db, other_pet, c.vet);

    c.db.delete_veterinarian(c.vet).unwrap();

    let summary = c.db.summary().unwrap();
    assert_eq!(summary.appointments, 0);
    assert_eq!(summary.treatments, 0);
    assert_eq!(summary.pets, 4);
    assert_eq!(summary.clients, 2);
}

#[test]
fn test_invoice_delete_unblocks_treatment_delete() {
    let mut c = clinic();
    let invoice_id = invoice(&mut c.db, c.client, c.treatments[2]);

    assert!(c.db.delete_appointment(c.appointments[2]).is_err());

    c.db.delete_invoice(invoice_id).unwrap();
    c.db.delete_appointment(c.appointments[2]).unwrap();

    assert!(matches!(
        c.db.get_treatment(c.treatments[2]),
        Err(ClinicError::NotFound(_))
    ));
}

#[test]
fn test_missing_rows_on_delete() {
    let mut c = clinic();
    assert!(matches!(c.db.delete_client(999), Err(ClinicError::NotFound(_))));
    assert!(matches!(c.db.delete_pet(999), Err(ClinicError::NotFound(_))));
    assert!(matches!(c.db.delete_veterinarian(999), Err(ClinicError::NotFound(_))));
    assert!(matches!(c.db.delete_appointment(999), Err(ClinicError::NotFound(_))));
    assert!(matches!(c.db.delete_treatment(999), Err(ClinicError::NotFound(_))));
    assert!(matches!(c.db.delete_invoice(999), Err(ClinicError::NotFound(_))));
}

#[test]
fn test_file_backed_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    {
        let db = Database::open(&path).unwrap();
        client(&db, "ana@x.com");
    }

    let reopened = Database::open(&path).unwrap();
    let clients = reopened.list_clients().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].client.email, "ana@x.com");
}
