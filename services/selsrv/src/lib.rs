//! selsrv - Motor switchgear selection service
//!
//! HTTP front end over the selection engine in `switchgear-select`. The parts
//! catalog lives in SQLite; every calculation runs against a fresh snapshot.

pub mod api;
pub mod app;
pub mod catalog_store;
pub mod config;
pub mod routes;

// Re-export app state and initialization
pub use app::{create_app_state, AppState};
pub use config::SelsrvConfig;

// Re-export route creation
pub use routes::create_routes;
