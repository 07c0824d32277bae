//! HTTP handlers grouped by resource

pub mod admin_handlers;
pub mod catalog_handlers;
pub mod health_handlers;
pub mod recommendation_handlers;
