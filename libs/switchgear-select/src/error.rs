//! Error types for switchgear-select

use std::fmt::Display;

use switchgear_model::StartingMethod;
use thiserror::Error;

/// Recommendation errors
///
/// Overload relay absence is not an error; the recommendation simply
/// carries no relay.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecommendError {
    /// A required request field is absent
    #[error("{0}")]
    MissingInput(String),

    /// The requested starting method does not cover the motor power
    #[error("Starting method '{method}' not suitable for {power_hp} HP motor")]
    IncompatibleMethod {
        method: String,
        power_hp: f64,
        compatible: Vec<StartingMethod>,
    },

    /// The catalog cannot satisfy the computed ratings
    #[error("{0}")]
    NoSuitableParts(String),

    /// A numeric input is outside its physical domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected fault; detail is logged, never displayed
    #[error("Internal error")]
    Internal,
}

impl RecommendError {
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn no_suitable_parts(msg: impl Into<String>) -> Self {
        Self::NoSuitableParts(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Log `detail` and return the detail-free internal error
    pub fn internal(detail: impl Display) -> Self {
        tracing::error!("Recommendation failed: {}", detail);
        Self::Internal
    }

    /// Names of the methods that do cover the motor, for incompatible requests
    pub fn compatible_method_names(&self) -> Vec<&str> {
        match self {
            Self::IncompatibleMethod { compatible, .. } => {
                compatible.iter().map(|m| m.name.as_str()).collect()
            },
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
