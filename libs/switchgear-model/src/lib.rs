//! Switchgear Model Library
//!
//! Reference data for motor switchgear selection. This library provides
//! the catalog entities and the repository seam the selection algorithm
//! reads through; it has no database or HTTP dependencies.
//!
//! # Modules
//!
//! - `types`: Catalog entities (manufacturer, starting method, contactor, overload relay)
//! - `catalog`: `PartsRepository` trait and the in-memory `Catalog`
//! - `builtin`: Reference catalog embedded at compile time
//! - `error`: Catalog errors
//!
//! # Example
//!
//! ```
//! use switchgear_model::{builtin_catalog, PartsRepository};
//!
//! let catalog = builtin_catalog();
//! let methods = catalog.starting_methods().unwrap();
//! assert!(methods.iter().any(|m| m.name == "DOL"));
//! ```

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use builtin::builtin_catalog;
pub use catalog::{Catalog, CatalogSummary, PartsRepository};
pub use error::{CatalogError, Result};
pub use types::{Contactor, Manufacturer, OverloadRelay, StartingMethod};
