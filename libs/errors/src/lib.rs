//! Unified error handling for the switchgear selection service
//!
//! `SwitchgearError` wraps the domain errors (catalog, recommendation) and the
//! infrastructure errors (SQLite, configuration, I/O) behind one type with a
//! stable error code, a category, and an HTTP status mapping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use switchgear_model::{CatalogError, StartingMethod};
use switchgear_select::RecommendError;
use thiserror::Error;

/// Message shown for every 5xx response; the cause is only logged
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// ============================================================================
// ErrorInfo - API error response type
// ============================================================================

/// Standard error information for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// HTTP status code
    pub code: u16,
    /// Error message
    pub message: String,
    /// Detailed error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field-specific errors for validation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, Vec<String>>,
    /// Starting methods that do suit the motor (incompatible method requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_methods: Option<Vec<StartingMethod>>,
}

impl ErrorInfo {
    /// Create a new ErrorInfo with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            details: None,
            field_errors: HashMap::new(),
            compatible_methods: None,
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Add details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a field error
    pub fn add_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }

    pub fn with_compatible_methods(mut self, methods: Vec<StartingMethod>) -> Self {
        self.compatible_methods = Some(methods);
        self
    }
}

fn bool_false() -> bool {
    false
}

/// Standard error response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Success indicator (always false for errors)
    #[serde(default = "bool_false")]
    pub success: bool,
    /// Error information
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

// ============================================================================
// SwitchgearError - Main error type
// ============================================================================

/// Main error type for the switchgear selection service
#[derive(Debug, Error)]
pub enum SwitchgearError {
    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ======================================
    // Database & Catalog Errors
    // ======================================
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // ======================================
    // Selection Errors
    // ======================================
    #[error(transparent)]
    Recommendation(#[from] RecommendError),

    // ======================================
    // API & Validation Errors
    // ======================================
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid parameter: {param}: {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ======================================
    // File & I/O Errors
    // ======================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ======================================
    // Service & Runtime Errors
    // ======================================
    #[error("Service startup failed: {0}")]
    StartupFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SwitchgearError
pub type SwitchgearResult<T> = Result<T, SwitchgearError>;

impl SwitchgearError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::BadRequest(_) | Self::Validation(_) | Self::InvalidParameter { .. } => 400,
            Self::Recommendation(
                RecommendError::MissingInput(_)
                | RecommendError::InvalidInput(_)
                | RecommendError::IncompatibleMethod { .. },
            ) => 400,

            // 404 Not Found
            Self::NotFound { .. } => 404,
            Self::Recommendation(RecommendError::NoSuitableParts(_)) => 404,

            // 500 Internal Server Error
            Self::Recommendation(RecommendError::Internal)
            | Self::Configuration(_)
            | Self::InvalidConfig { .. }
            | Self::Database(_)
            | Self::Sqlite(_)
            | Self::Catalog(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Deserialization(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,

            // 503 Service Unavailable
            Self::StartupFailed(_) => 503,
        }
    }

    /// Convert to API ErrorInfo for HTTP responses
    ///
    /// Server-side failures carry only the generic message; the cause stays
    /// in the logs.
    pub fn to_error_info(&self) -> ErrorInfo {
        let code = self.status_code();
        if code >= 500 {
            return ErrorInfo::new(INTERNAL_ERROR_MESSAGE).with_code(code);
        }

        let mut error_info = ErrorInfo::new(self.to_string()).with_code(code);

        // Add details for specific error types
        match self {
            Self::InvalidParameter { param, reason } => {
                error_info = error_info.add_field_error(param, reason);
            },
            Self::Validation(msg) => {
                error_info = error_info.with_details(msg.clone());
            },
            Self::Recommendation(RecommendError::IncompatibleMethod { compatible, .. }) => {
                error_info = error_info.with_compatible_methods(compatible.clone());
            },
            _ => {},
        }

        error_info
    }
}

// Conversion traits for common error types
impl From<serde_json::Error> for SwitchgearError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for SwitchgearError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for SwitchgearError {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self::Validation(format!("Invalid float: {}", err))
    }
}

// ============================================================================
// SwitchgearError implements ServiceErrorTrait
// ============================================================================

impl ServiceErrorTrait for SwitchgearError {
    fn error_code(&self) -> &'static str {
        match self {
            // Configuration
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",

            // Database & Catalog
            Self::Database(_) => "DATABASE_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Catalog(_) => "CATALOG_ERROR",

            // Selection
            Self::Recommendation(e) => match e {
                RecommendError::MissingInput(_) => "MISSING_INPUT",
                RecommendError::IncompatibleMethod { .. } => "INCOMPATIBLE_STARTING_METHOD",
                RecommendError::NoSuitableParts(_) => "NO_SUITABLE_PARTS",
                RecommendError::InvalidInput(_) => "INVALID_INPUT",
                RecommendError::Internal => "INTERNAL_ERROR",
            },

            // API & Validation
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::NotFound { .. } => "NOT_FOUND",

            // File & I/O
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Deserialization(_) => "DESERIALIZATION_ERROR",

            // Service & Runtime
            Self::StartupFailed(_) => "STARTUP_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Other(_) => "OTHER_ERROR",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorCategory::Configuration,

            Self::Database(_) | Self::Sqlite(_) | Self::Catalog(_) => ErrorCategory::Database,

            Self::Recommendation(e) => match e {
                RecommendError::MissingInput(_)
                | RecommendError::InvalidInput(_)
                | RecommendError::IncompatibleMethod { .. } => ErrorCategory::Validation,
                RecommendError::NoSuitableParts(_) => ErrorCategory::NotFound,
                RecommendError::Internal => ErrorCategory::Internal,
            },

            Self::BadRequest(_) | Self::Validation(_) | Self::InvalidParameter { .. } => {
                ErrorCategory::Validation
            },

            Self::NotFound { .. } => ErrorCategory::NotFound,

            Self::Io(_)
            | Self::Serialization(_)
            | Self::Deserialization(_)
            | Self::StartupFailed(_)
            | Self::Internal(_) => ErrorCategory::Internal,

            Self::Other(_) => ErrorCategory::Unknown,
        }
    }
}

// ============================================================================
// Service Error Trait - Architectural layer
// ============================================================================

/// Error category enum - used for classification and log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    // Infrastructure layer
    Configuration,
    Database,

    // Business logic layer
    Validation,
    NotFound,

    // System level
    Internal,
    ResourceBusy,

    // Others
    Unknown,
}

/// Error capability trait
///
/// Gives service error types a common outward-facing interface: a stable
/// machine-readable code, a category, and derived retry and log behavior.
pub trait ServiceErrorTrait: std::error::Error + Send + Sync + 'static {
    /// Get error code (for API, logs)
    fn error_code(&self) -> &'static str;

    /// Get error category
    fn category(&self) -> ErrorCategory;

    /// Whether the error is retryable (default implementation is category-based)
    fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::ResourceBusy)
    }

    /// Get log level
    fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self.category() {
            ErrorCategory::Internal | ErrorCategory::Database | ErrorCategory::Configuration => {
                Level::ERROR
            },
            ErrorCategory::Validation | ErrorCategory::NotFound => Level::INFO,
            _ => Level::WARN,
        }
    }
}

impl SwitchgearError {
    /// Whether the error is retryable
    ///
    /// SQLite lock contention and pool exhaustion clear on their own; every
    /// other failure repeats on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Sqlite(sqlx::Error::PoolTimedOut) => true,
            Self::Sqlite(sqlx::Error::Database(db)) => {
                db.message().contains("database is locked")
            },
            other => ServiceErrorTrait::is_retryable(other),
        }
    }

    /// Log this error at its category's level
    pub fn log(&self) {
        let code = self.error_code();
        match self.log_level() {
            tracing::Level::ERROR => tracing::error!(error_code = code, "{}", self),
            tracing::Level::WARN => tracing::warn!(error_code = code, "{}", self),
            _ => tracing::info!(error_code = code, "{}", self),
        }
    }
}

#[cfg(feature = "axum-support")]
impl axum::response::IntoResponse for SwitchgearError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        self.log();
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(ErrorResponse::new(self.to_error_info()))).into_response()
    }
}

// Tests
#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use switchgear_model::builtin_catalog;

    fn incompatible() -> SwitchgearError {
        let dol = builtin_catalog().starting_method("DOL").unwrap().clone();
        SwitchgearError::Recommendation(RecommendError::IncompatibleMethod {
            method: "Star-Delta".into(),
            power_hp: 1.0,
            compatible: vec![dol],
        })
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(SwitchgearError::BadRequest("test".into()).status_code(), 400);
        assert_eq!(
            SwitchgearError::from(RecommendError::missing_input("no power")).status_code(),
            400
        );
        assert_eq!(
            SwitchgearError::from(RecommendError::invalid_input("pf")).status_code(),
            400
        );
        assert_eq!(incompatible().status_code(), 400);
        assert_eq!(
            SwitchgearError::from(RecommendError::no_suitable_parts("none")).status_code(),
            404
        );
        assert_eq!(SwitchgearError::not_found("x").status_code(), 404);
        assert_eq!(SwitchgearError::from(RecommendError::Internal).status_code(), 500);
        assert_eq!(SwitchgearError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = SwitchgearError::Catalog(CatalogError::unavailable("disk /var/db gone"));
        let info = err.to_error_info();
        assert_eq!(info.code, 500);
        assert_eq!(info.message, INTERNAL_ERROR_MESSAGE);
        assert!(info.details.is_none());

        let info = SwitchgearError::config("secret path").to_error_info();
        assert_eq!(info.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_incompatible_carries_methods() {
        let info = incompatible().to_error_info();
        assert_eq!(info.code, 400);
        assert_eq!(
            info.message,
            "Starting method 'Star-Delta' not suitable for 1 HP motor"
        );
        let methods = info.compatible_methods.unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "DOL");
    }

    #[test]
    fn test_error_info_field_errors() {
        let error = SwitchgearError::invalid_parameter("min_current", "not a number");
        let info = error.to_error_info();
        assert_eq!(info.code, 400);
        assert!(info.field_errors.contains_key("min_current"));
    }

    #[test]
    fn test_error_codes_and_categories() {
        assert_eq!(incompatible().error_code(), "INCOMPATIBLE_STARTING_METHOD");
        assert_eq!(incompatible().category(), ErrorCategory::Validation);
        assert_eq!(
            SwitchgearError::from(RecommendError::no_suitable_parts("x")).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            SwitchgearError::internal("x").log_level(),
            tracing::Level::ERROR
        );
        assert!(!SwitchgearError::internal("x").is_retryable());
        assert!(SwitchgearError::Sqlite(sqlx::Error::PoolTimedOut).is_retryable());
    }

    #[test]
    fn test_error_response_envelope() {
        let body = serde_json::to_value(ErrorResponse::new(incompatible().to_error_info())).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["compatible_methods"][0]["name"], "DOL");
        assert!(body["error"].get("details").is_none());
    }
}
