//! Lazily opened, shared database handle.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OnceCell;
use tracing::{error, info};
use vetclinic_core::{ClinicError, ClinicResult, Database, SharedDatabase};

use crate::config::DatabaseConfig;

/// Opens the database on first use and hands out the same handle afterwards.
///
/// Repository calls go through [`Gateway::run`], which takes the lock on the
/// blocking pool so SQLite never stalls the async workers.
pub struct Gateway {
    config: DatabaseConfig,
    seed: Vec<String>,
    cell: OnceCell<SharedDatabase>,
}

impl Gateway {
    pub fn new(config: DatabaseConfig, seed: Vec<String>) -> Self {
        Self {
            config,
            seed,
            cell: OnceCell::new(),
        }
    }

    /// Return the shared handle, opening the database, applying the schema and
    /// seeding specialties on the first call. A failed open is retried on the
    /// next call.
    pub async fn acquire(&self) -> ClinicResult<SharedDatabase> {
        self.cell
            .get_or_try_init(|| async {
                let config = self.config.clone();
                let seed = self.seed.clone();
                match tokio::task::spawn_blocking(move || open(&config, &seed)).await {
                    Ok(opened) => opened,
                    Err(e) => Err(ClinicError::Unavailable(e.to_string())),
                }
            })
            .await
            .cloned()
    }

    /// Run a repository operation against the shared handle.
    ///
    /// A panicking operation poisons the lock; the next caller clears it and
    /// carries on. Any open transaction was rolled back when it unwound.
    pub async fn run<T, F>(&self, f: F) -> ClinicResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> ClinicResult<T> + Send + 'static,
    {
        let handle = self.acquire().await?;
        tokio::task::spawn_blocking(move || {
            let mut db = lock_recovering(&handle);
            f(&mut *db)
        })
        .await
        .map_err(|e| ClinicError::Unavailable(e.to_string()))?
    }
}

fn lock_recovering(handle: &SharedDatabase) -> MutexGuard<'_, Database> {
    handle.lock().unwrap_or_else(|poisoned| {
        error!("Database lock poisoned by a panicked operation; recovering");
        handle.clear_poison();
        poisoned.into_inner()
    })
}

fn open(config: &DatabaseConfig, seed: &[String]) -> ClinicResult<SharedDatabase> {
    let db = if config.is_in_memory() {
        Database::open_in_memory()
    } else {
        Database::open(&config.path)
    }
    .map_err(|e| {
        error!(path = %config.path, error = %e, "Failed to open database");
        ClinicError::Database(e)
    })?;

    db.seed_specialties(seed)?;
    info!(path = %config.path, "Database ready");
    Ok(Arc::new(Mutex::new(db)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> Gateway {
        Gateway::new(
            DatabaseConfig {
                path: ":memory:".into(),
            },
            vec!["Cirugía".into()],
        )
    }

    #[tokio::test]
    async fn test_acquire_returns_same_handle() {
        let gateway = in_memory();
        let first = gateway.acquire().await.unwrap();
        let second = gateway.acquire().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_seeded_on_first_acquire() {
        let gateway = in_memory();
        let specialties = gateway.run(|db| db.list_specialties()).await.unwrap();
        assert_eq!(specialties.len(), 1);
        assert_eq!(specialties[0].name, "Cirugía");
    }

    #[tokio::test]
    async fn test_recovers_after_panicked_operation() {
        let gateway = in_memory();
        let panicked = gateway
            .run(|_db| -> ClinicResult<()> { panic!("repository bug") })
            .await;
        assert!(matches!(panicked, Err(ClinicError::Unavailable(_))));

        let handle = gateway.acquire().await.unwrap();
        assert!(handle.is_poisoned());

        let specialties = gateway.run(|db| db.list_specialties()).await.unwrap();
        assert_eq!(specialties.len(), 1);
        assert!(!handle.is_poisoned());
    }

    #[tokio::test]
    async fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        let gateway = Gateway::new(
            DatabaseConfig {
                path: path.to_string_lossy().into_owned(),
            },
            vec![],
        );

        gateway.acquire().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_internal() {
        let gateway = Gateway::new(
            DatabaseConfig {
                path: "/nonexistent-dir/deeper/clinic.db".into(),
            },
            vec![],
        );
        let err = gateway.acquire().await.unwrap_err();
        assert!(err.is_internal());
    }
}
