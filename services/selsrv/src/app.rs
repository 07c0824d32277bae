//! Application state and initialization logic

use std::sync::Arc;
use std::time::Instant;

use common::sqlite::SqliteClient;
use errors::{SwitchgearError, SwitchgearResult};
use switchgear_model::builtin_catalog;
use tracing::{info, warn};

use crate::catalog_store;
use crate::config::SelsrvConfig;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Arc<SelsrvConfig>,
    pub sqlite_client: Arc<SqliteClient>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: SelsrvConfig, sqlite_client: SqliteClient) -> Self {
        Self {
            config: Arc::new(config),
            sqlite_client: Arc::new(sqlite_client),
            started_at: Instant::now(),
        }
    }

    pub fn pool(&self) -> &common::sqlite::SqlitePool {
        self.sqlite_client.pool()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Open the configured database and make sure the catalog is usable
///
/// Creates the schema when missing and seeds the reference catalog into an
/// empty database.
pub async fn create_app_state(config: SelsrvConfig) -> SwitchgearResult<Arc<AppState>> {
    let client = open_database(&config).await?;
    catalog_store::init_schema(client.pool()).await?;

    let summary = catalog_store::catalog_summary(client.pool()).await?;
    if summary.contactors == 0 && summary.starting_methods == 0 {
        warn!("Catalog is empty, seeding reference catalog");
        catalog_store::seed_catalog(client.pool(), builtin_catalog()).await?;
    } else {
        info!(
            "Catalog loaded: {} starting methods, {} contactors, {} overload relays",
            summary.starting_methods, summary.contactors, summary.overload_relays
        );
    }

    Ok(Arc::new(AppState::new(config, client)))
}

/// Connect to the configured SQLite file
pub async fn open_database(config: &SelsrvConfig) -> SwitchgearResult<SqliteClient> {
    SqliteClient::new(&config.database.path, config.database.max_connections)
        .await
        .map_err(|e| {
            SwitchgearError::StartupFailed(format!(
                "Cannot open database {}: {}",
                config.database.path.display(),
                e
            ))
        })
}
