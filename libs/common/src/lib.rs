//! Shared building blocks for switchgear services
//!
//! - logging (console/JSON/daily file, runtime level changes, HTTP access log)
//! - API response envelopes and health models
//! - SQLite client
//! - startup helpers and configuration fallbacks

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod api_types;
pub mod config_loader;
pub mod logging;
pub mod serde_helpers;
pub mod service_bootstrap;
pub mod shutdown;

// Re-export commonly used API types
pub use api_types::{
    ComponentHealth, ErrorInfo, ErrorResponse, HealthStatus, ServiceStatus, SuccessResponse,
};

// Re-export common dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;
