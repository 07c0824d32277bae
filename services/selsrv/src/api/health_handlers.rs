//! Health check handlers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Json};
use common::{ComponentHealth, HealthStatus, SuccessResponse};
use errors::SwitchgearError;
use serde::{Deserialize, Serialize};
use switchgear_model::CatalogSummary;
use tracing::warn;

use crate::app::AppState;
use crate::catalog_store;

/// Health report with catalog row counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(flatten)]
    pub health: HealthStatus,
    /// Absent when the database cannot be read
    pub catalog: Option<CatalogSummary>,
}

/// Service health check
///
/// Always answers 200; a database failure shows up as `"status": "unhealthy"`.
///
/// @route GET /health
/// @route GET /api/switchgear/health
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse<ServiceHealth>>, SwitchgearError> {
    let started = Instant::now();
    let (database, catalog) = match catalog_store::catalog_summary(state.pool()).await {
        Ok(summary) => {
            let details = serde_json::to_value(summary)?;
            let check = ComponentHealth::healthy()
                .with_duration_ms(started.elapsed().as_millis() as u64)
                .with_details(details);
            (check, Some(summary))
        },
        Err(e) => {
            warn!("Health check could not read catalog: {}", e);
            (ComponentHealth::unhealthy("catalog database unavailable"), None)
        },
    };

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), database);

    let health = HealthStatus::new(
        state.config.service.name.clone(),
        env!("CARGO_PKG_VERSION"),
        state.uptime_seconds(),
        checks,
    );

    Ok(Json(SuccessResponse::new(ServiceHealth { health, catalog })))
}
