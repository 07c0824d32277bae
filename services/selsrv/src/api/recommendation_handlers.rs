//! Recommendation and starting-method handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use common::SuccessResponse;
use errors::SwitchgearError;
use switchgear_model::StartingMethod;
use switchgear_select::{compatible_methods, recommend, MotorRequest, Recommendation};
use tracing::{debug, info};

use crate::app::AppState;
use crate::catalog_store;

/// Size switchgear for one motor
///
/// Runs against a snapshot of the catalog taken for this request.
///
/// @route POST /api/switchgear/calculate
/// @input Json<MotorRequest> - motor_power_hp or motor_power_kw, starting_method,
///        optional voltage, frequency, phases, power_factor, efficiency
/// @output Recommendation
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MotorRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<Recommendation>>, SwitchgearError> {
    let Json(request) = body.map_err(|e| SwitchgearError::BadRequest(e.body_text()))?;

    let catalog = catalog_store::load_catalog(state.pool()).await?;
    let recommendation = recommend(&catalog, &request)?;

    info!(
        "Recommendation: {} HP {}, breaker {} A, {} parts, total {}",
        recommendation.motor_specifications.power_hp,
        recommendation.starting_method,
        recommendation.circuit_breaker_rating,
        recommendation.component_list.len(),
        recommendation.total_cost
    );
    Ok(Json(SuccessResponse::new(recommendation)))
}

/// All starting methods in catalog order
///
/// @route GET /api/switchgear/starting-methods
pub async fn list_starting_methods(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse<Vec<StartingMethod>>>, SwitchgearError> {
    let methods = catalog_store::list_starting_methods(state.pool()).await?;
    let count = methods.len();
    Ok(Json(
        SuccessResponse::new(methods).with_metadata("count", count.into()),
    ))
}

/// Starting methods whose power envelope contains `power_hp`
///
/// @route GET /api/switchgear/starting-methods/{power_hp}
pub async fn compatible_starting_methods(
    State(state): State<Arc<AppState>>,
    Path(power_hp): Path<String>,
) -> Result<Json<SuccessResponse<Vec<StartingMethod>>>, SwitchgearError> {
    let power_hp = parse_power(&power_hp)?;
    let methods = catalog_store::list_starting_methods(state.pool()).await?;
    let compatible = compatible_methods(&methods, power_hp);
    debug!("{} methods compatible with {} HP", compatible.len(), power_hp);

    let count = compatible.len();
    Ok(Json(
        SuccessResponse::new(compatible)
            .with_metadata("power_hp", power_hp.into())
            .with_metadata("count", count.into()),
    ))
}

fn parse_power(raw: &str) -> Result<f64, SwitchgearError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err(SwitchgearError::invalid_parameter(
            "power_hp",
            "must be a positive number",
        )),
        Err(e) => Err(SwitchgearError::invalid_parameter("power_hp", e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_parse_power() {
        assert_eq!(parse_power("7.5").unwrap(), 7.5);
        assert_eq!(parse_power("10").unwrap(), 10.0);
        assert!(parse_power("0").is_err());
        assert!(parse_power("-3").is_err());
        assert!(parse_power("inf").is_err());
        assert!(parse_power("ten").is_err());
    }
}
