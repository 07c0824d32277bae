//! Runtime administration handlers

use axum::{extract::rejection::JsonRejection, response::Json};
use common::SuccessResponse;
use errors::SwitchgearError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLevelBody {
    pub level: String,
}

/// Current log filter
///
/// @route GET /api/admin/log-level
pub async fn get_log_level() -> Json<SuccessResponse<LogLevelBody>> {
    Json(SuccessResponse::new(LogLevelBody {
        level: common::logging::get_log_level(),
    }))
}

/// Replace the log filter without restarting
///
/// @route PUT /api/admin/log-level
/// @input Json<LogLevelBody> - `{"level": "debug"}` or a directive list
pub async fn set_log_level(
    body: Result<Json<LogLevelBody>, JsonRejection>,
) -> Result<Json<SuccessResponse<LogLevelBody>>, SwitchgearError> {
    let Json(body) = body.map_err(|e| SwitchgearError::BadRequest(e.body_text()))?;
    let level = body.level.trim();
    if !common::logging::is_valid_filter(level) {
        return Err(SwitchgearError::invalid_parameter(
            "level",
            format!("unparsable log filter '{}'", level),
        ));
    }

    common::logging::set_log_level(level).map_err(SwitchgearError::Internal)?;

    Ok(Json(SuccessResponse::new(LogLevelBody {
        level: common::logging::get_log_level(),
    })))
}
