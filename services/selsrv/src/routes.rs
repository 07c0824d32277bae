//! API routes for the switchgear selection service

use std::sync::Arc;

use axum::{
    extract::OriginalUri,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use errors::SwitchgearError;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api::{admin_handlers, catalog_handlers, health_handlers, recommendation_handlers};
use crate::app::AppState;

/// Create all API routes with state
pub fn create_routes(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health_handlers::health_check))
        .nest("/api/switchgear", switchgear_routes())
        .route(
            "/api/admin/log-level",
            get(admin_handlers::get_log_level).put(admin_handlers::set_log_level),
        )
        .fallback(route_not_found)
        // Apply HTTP request logging middleware
        .layer(axum::middleware::from_fn(common::logging::http_request_logger))
        .layer(cors)
        .with_state(state)
}

fn switchgear_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calculate", post(recommendation_handlers::calculate))
        .route(
            "/starting-methods",
            get(recommendation_handlers::list_starting_methods),
        )
        .route(
            "/starting-methods/{power_hp}",
            get(recommendation_handlers::compatible_starting_methods),
        )
        .route("/contactors", get(catalog_handlers::list_contactors))
        .route(
            "/overload-relays",
            get(catalog_handlers::list_overload_relays),
        )
        .route("/manufacturers", get(catalog_handlers::list_manufacturers))
        .route("/health", get(health_handlers::health_check))
}

/// Unknown paths answer 404 in the error envelope
async fn route_not_found(OriginalUri(uri): OriginalUri) -> SwitchgearError {
    SwitchgearError::not_found(format!("route {}", uri.path()))
}

/// CORS from configured origins; any origin when none are listed
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
