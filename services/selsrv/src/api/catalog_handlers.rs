//! Catalog listing handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use common::SuccessResponse;
use errors::SwitchgearError;
use switchgear_model::{Contactor, Manufacturer, OverloadRelay};

use crate::app::AppState;
use crate::catalog_store::{self, ContactorFilter, RelayFilter};

/// Contactors, smallest rating first
///
/// @route GET /api/switchgear/contactors
/// @input Query - min_current, max_current, voltage, manufacturer (all optional)
pub async fn list_contactors(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ContactorFilter>, QueryRejection>,
) -> Result<Json<SuccessResponse<Vec<Contactor>>>, SwitchgearError> {
    let Query(filter) = filter.map_err(|e| SwitchgearError::BadRequest(e.body_text()))?;
    let contactors = catalog_store::list_contactors(state.pool(), &filter).await?;
    let count = contactors.len();
    Ok(Json(
        SuccessResponse::new(contactors).with_metadata("count", count.into()),
    ))
}

/// Overload relays, lowest range first
///
/// @route GET /api/switchgear/overload-relays
/// @input Query - min_current, max_current, manufacturer (all optional)
pub async fn list_overload_relays(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<RelayFilter>, QueryRejection>,
) -> Result<Json<SuccessResponse<Vec<OverloadRelay>>>, SwitchgearError> {
    let Query(filter) = filter.map_err(|e| SwitchgearError::BadRequest(e.body_text()))?;
    let relays = catalog_store::list_overload_relays(state.pool(), &filter).await?;
    let count = relays.len();
    Ok(Json(
        SuccessResponse::new(relays).with_metadata("count", count.into()),
    ))
}

/// @route GET /api/switchgear/manufacturers
pub async fn list_manufacturers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse<Vec<Manufacturer>>>, SwitchgearError> {
    let manufacturers = catalog_store::list_manufacturers(state.pool()).await?;
    Ok(Json(SuccessResponse::new(manufacturers)))
}
