use std::sync::Arc;

use escola_infra::config::AppConfig;
use escola_infra::store::{InMemoryStore, PostgresStore, ProfessorStore, StoreError, UserDirectory};

/// Store handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    pub professores: Arc<dyn ProfessorStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppServices {
    pub fn new(professores: Arc<dyn ProfessorStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { professores, users }
    }

    /// Both roles served by one in-memory store (dev/test).
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(store.clone(), store)
    }

    /// Postgres when `DATABASE_URL` is configured, in-memory otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match &config.database {
            Some(db) => {
                let store = Arc::new(PostgresStore::connect(db).await?);
                tracing::info!(max_connections = db.max_connections, "using postgres store");
                Ok(Self::new(store.clone(), store))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
                Ok(Self::in_memory(Arc::new(InMemoryStore::new())))
            }
        }
    }
}
