//! Vetclinic Core Library
//!
//! Records for a small veterinary clinic: clients and their pets,
//! veterinarians, appointments, treatments and invoices.
//!
//! # Ownership
//!
//! ```text
//! Client ──┬── Pet ── Appointment ── Treatment
//!          │              │              ▲
//!          │        Veterinarian         │ billed by
//!          │                             │
//!          └── Invoice ── InvoiceLine ───┘
//! ```
//!
//! Deleting a row removes everything it owns, in order, inside one
//! transaction. A treatment still billed on an invoice outside the cascade
//! blocks the delete.
//!
//! # Modules
//!
//! - [`db`]: SQLite schema and repository operations
//! - [`models`]: Domain types and payload validation
//! - [`auth`]: Password hashing and signed session tokens
//! - [`error`]: The [`ClinicError`] taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;

use std::sync::{Arc, Mutex};

// Re-export commonly used types
pub use auth::{Session, TokenSigner};
pub use db::{Database, DbError};
pub use error::{ClinicError, ClinicResult};

/// A database handle shared across threads. SQLite work is serialized on
/// the mutex.
pub type SharedDatabase = Arc<Mutex<Database>>;
