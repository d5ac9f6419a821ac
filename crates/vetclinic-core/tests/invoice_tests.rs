//! Invoice pricing and atomicity integration tests.

use proptest::prelude::*;
use serde_json::json;
use vetclinic_core::db::Database;
use vetclinic_core::models::{
    line_subtotal, ClientInput, InvoiceInput, NewAppointment, NewPet, NewTreatment,
    NewVeterinarian,
};
use vetclinic_core::ClinicError;

/// Database with one client and one appointment. Returns the client id and
/// the appointment id.
fn setup() -> (Database, i64, i64) {
    let mut db = Database::open_in_memory().unwrap();
    let client: ClientInput = serde_json::from_value(json!({
        "nombre": "Ana",
        "apellido": "Ruiz",
        "telefono": "555-0001",
        "email": "ana@x.com",
    }))
    .unwrap();
    let client = db.create_client(&client.into_new().unwrap()).unwrap().client.id;
    let pet = db
        .create_pet(&NewPet {
            name: "Toby".into(),
            species: "canino".into(),
            breed: "Beagle".into(),
            age: 3,
            client_id: client,
        })
        .unwrap()
        .pet
        .id;
    let vet = db
        .create_veterinarian(&NewVeterinarian {
            first_name: "Laura".into(),
            last_name: "Gómez".into(),
            license_number: "MP-1001".into(),
            phone: None,
            email: None,
            specialty_ids: vec![],
        })
        .unwrap()
        .veterinarian
        .id;
    let appointment = db
        .create_appointment(&NewAppointment {
            scheduled_at: "2024-05-01T10:30:00".into(),
            reason: None,
            pet_id: pet,
            veterinarian_id: vet,
        })
        .unwrap()
        .appointment
        .id;
    (db, client, appointment)
}

fn treatment(db: &Database, appointment_id: i64, cost: f64) -> i64 {
    db.create_treatment(&NewTreatment {
        description: "Tratamiento".into(),
        cost,
        appointment_id,
    })
    .unwrap()
    .treatment
    .id
}

fn parse(value: serde_json::Value) -> InvoiceInput {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_each_line_gets_surcharged_subtotal() {
    let (mut db, client, appointment) = setup();
    let costs = [100.0, 12.5, 0.0];
    let treatments: Vec<i64> = costs.iter().map(|&c| treatment(&db, appointment, c)).collect();

    let input = parse(json!({
        "clienteId": client,
        "fecha": "2024-05-02T09:00",
        "detalles": [
            { "tratamientoId": treatments[0], "cantidad": 2 },
            { "tratamientoId": treatments[1], "cantidad": 1 },
            { "tratamientoId": treatments[2], "cantidad": 5 },
        ],
    }));
    let invoice = db.create_invoice(&input.into_new().unwrap()).unwrap();

    assert_eq!(invoice.lines.len(), 3);
    assert_eq!(invoice.lines[0].subtotal, 232.0);
    assert_eq!(invoice.lines[1].subtotal, 14.5);
    assert_eq!(invoice.lines[2].subtotal, 0.0);
    assert_eq!(invoice.invoice.total, 246.5);
    assert_eq!(invoice.invoice.issued_at, "2024-05-02T09:00:00");
}

#[test]
fn test_matching_client_amounts_accepted() {
    let (mut db, client, appointment) = setup();
    let t = treatment(&db, appointment, 45.0);

    let input = parse(json!({
        "clienteId": client,
        "fecha": "2024-05-02",
        "total": 52.2,
        "detalles": [{ "tratamientoId": t, "cantidad": 1, "subtotal": 52.2 }],
    }));
    let invoice = db.create_invoice(&input.into_new().unwrap()).unwrap();
    assert_eq!(invoice.invoice.total, 52.2);
}

#[test]
fn test_total_mismatch_rejected_without_writes() {
    let (mut db, client, appointment) = setup();
    let t = treatment(&db, appointment, 45.0);

    let input = parse(json!({
        "clienteId": client,
        "fecha": "2024-05-02",
        "total": 45.0,
        "detalles": [{ "tratamientoId": t, "cantidad": 1 }],
    }));
    let err = db.create_invoice(&input.into_new().unwrap()).unwrap_err();

    assert!(matches!(err, ClinicError::Validation(_)));
    assert!(db.list_invoices().unwrap().is_empty());
}

#[test]
fn test_failing_line_leaves_no_invoice_row() {
    let (mut db, client, appointment) = setup();
    let t = treatment(&db, appointment, 10.0);

    let input = parse(json!({
        "clienteId": client,
        "fecha": "2024-05-02",
        "detalles": [
            { "tratamientoId": t, "cantidad": 1 },
            { "tratamientoId": 4040, "cantidad": 1 },
        ],
    }));
    assert!(matches!(
        db.create_invoice(&input.into_new().unwrap()),
        Err(ClinicError::NotFound(_))
    ));
    assert_eq!(db.summary().unwrap().invoices, 0);
}

#[test]
fn test_detalles_must_be_present_and_non_empty() {
    let missing = parse(json!({ "clienteId": 1, "fecha": "2024-05-02" }));
    assert!(matches!(missing.into_new(), Err(ClinicError::Validation(_))));

    let empty = parse(json!({ "clienteId": 1, "fecha": "2024-05-02", "detalles": [] }));
    assert!(matches!(empty.into_new(), Err(ClinicError::Validation(_))));
}

#[test]
fn test_deleted_invoice_and_lines_not_found() {
    let (mut db, client, appointment) = setup();
    let t = treatment(&db, appointment, 10.0);
    let input = parse(json!({
        "clienteId": client,
        "fecha": "2024-05-02",
        "detalles": [{ "tratamientoId": t, "cantidad": 1 }, { "tratamientoId": t, "cantidad": 2 }],
    }));
    let invoice = db.create_invoice(&input.into_new().unwrap()).unwrap();

    db.delete_invoice(invoice.invoice.id).unwrap();

    assert!(matches!(
        db.get_invoice(invoice.invoice.id),
        Err(ClinicError::NotFound(_))
    ));
    for line in &invoice.lines {
        assert!(matches!(
            db.get_invoice_line(line.id),
            Err(ClinicError::NotFound(_))
        ));
    }
}

#[test]
fn test_billed_total_in_summary() {
    let (mut db, client, appointment) = setup();
    let t = treatment(&db, appointment, 10.0);
    for _ in 0..2 {
        let input = parse(json!({
            "clienteId": client,
            "fecha": "2024-05-02",
            "detalles": [{ "tratamientoId": t, "cantidad": 1 }],
        }));
        db.create_invoice(&input.into_new().unwrap()).unwrap();
    }

    let summary = db.summary().unwrap();
    assert_eq!(summary.invoices, 2);
    assert!((summary.billed_total - 23.2).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_stored_lines_match_pricing(
        lines in proptest::collection::vec((0u32..50_000, 1i64..10), 1..6)
    ) {
        let (mut db, client, appointment) = setup();
        let detalles: Vec<_> = lines
            .iter()
            .map(|&(cents, qty)| {
                let id = treatment(&db, appointment, f64::from(cents) / 100.0);
                json!({ "tratamientoId": id, "cantidad": qty })
            })
            .collect();

        let input = parse(json!({ "clienteId": client, "fecha": "2024-05-02", "detalles": detalles }));
        let invoice = db.create_invoice(&input.into_new().unwrap()).unwrap();

        prop_assert_eq!(invoice.lines.len(), lines.len());
        let mut sum = 0.0;
        for (line, &(cents, qty)) in invoice.lines.iter().zip(&lines) {
            prop_assert_eq!(line.subtotal, line_subtotal(f64::from(cents) / 100.0, qty));
            sum += line.subtotal;
        }
        prop_assert!((invoice.invoice.total - sum).abs() < 0.005);
    }
}
