use std::sync::Arc;

use vetclinic_core::{ClinicResult, Database, TokenSigner};

use crate::config::{AuthConfig, ClinicConfig};
use crate::gateway::Gateway;

/// Shared router state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub signer: TokenSigner,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            gateway: Arc::new(Gateway::new(
                config.database.clone(),
                config.seed.specialties.clone(),
            )),
            signer: TokenSigner::new(config.auth.secret.as_bytes().to_vec(), config.auth.token_ttl_secs),
            auth: Arc::new(config.auth.clone()),
        }
    }

    /// Run a repository operation on the blocking pool.
    pub async fn db<T, F>(&self, f: F) -> ClinicResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> ClinicResult<T> + Send + 'static,
    {
        self.gateway.run(f).await
    }
}
