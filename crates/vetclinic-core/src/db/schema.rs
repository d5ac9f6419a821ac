//! SQLite schema definition.

/// Complete database schema for the clinic.
///
/// Foreign keys are enforced but never cascade; dependent rows are removed by
/// the repository in an explicit order.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Clients and their pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    address TEXT,
    phone TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS pets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    client_id INTEGER NOT NULL REFERENCES clients(id)
);

CREATE INDEX IF NOT EXISTS idx_pets_client ON pets(client_id);

-- ============================================================================
-- Veterinarians and specialties
-- ============================================================================

CREATE TABLE IF NOT EXISTS veterinarians (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    license_number TEXT NOT NULL UNIQUE,
    phone TEXT,
    email TEXT
);

CREATE TABLE IF NOT EXISTS specialties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS veterinarian_specialties (
    veterinarian_id INTEGER NOT NULL REFERENCES veterinarians(id),
    specialty_id INTEGER NOT NULL REFERENCES specialties(id),
    PRIMARY KEY (veterinarian_id, specialty_id)
);

-- ============================================================================
-- Appointments and treatments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scheduled_at TEXT NOT NULL,                  -- YYYY-MM-DDTHH:MM:SS
    reason TEXT,
    pet_id INTEGER NOT NULL REFERENCES pets(id),
    veterinarian_id INTEGER NOT NULL REFERENCES veterinarians(id)
);

CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id);
CREATE INDEX IF NOT EXISTS idx_appointments_vet ON appointments(veterinarian_id);

CREATE TABLE IF NOT EXISTS treatments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    cost REAL NOT NULL CHECK (cost >= 0),
    appointment_id INTEGER NOT NULL REFERENCES appointments(id)
);

CREATE INDEX IF NOT EXISTS idx_treatments_appointment ON treatments(appointment_id);

-- ============================================================================
-- Invoices
-- ============================================================================

CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    issued_at TEXT NOT NULL,
    total REAL NOT NULL CHECK (total >= 0)
);

CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices(client_id);

CREATE TABLE IF NOT EXISTS invoice_lines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id INTEGER NOT NULL REFERENCES invoices(id),
    treatment_id INTEGER NOT NULL REFERENCES treatments(id),
    quantity INTEGER NOT NULL CHECK (quantity >= 1),
    subtotal REAL NOT NULL                       -- fixed at creation
);

CREATE INDEX IF NOT EXISTS idx_invoice_lines_invoice ON invoice_lines(invoice_id);
CREATE INDEX IF NOT EXISTS idx_invoice_lines_treatment ON invoice_lines(treatment_id);

-- ============================================================================
-- Demo records
-- ============================================================================

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS animals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- ============================================================================
-- Staff accounts
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,                 -- Argon2 PHC string
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
