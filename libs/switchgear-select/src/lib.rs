//! switchgear-select - Motor switchgear selection
//!
//! Turns motor nameplate data and a starting method into a priced set of
//! contactors and an overload relay, reading the parts catalog only through
//! [`switchgear_model::PartsRepository`]. All computation is synchronous and
//! free of shared state.
//!
//! # Pipeline
//!
//! motor spec → full-load current → breaker rating → contactor topology →
//! overload relay → priced recommendation
//!
//! # Example
//!
//! ```rust
//! use switchgear_model::builtin_catalog;
//! use switchgear_select::{recommend, MotorRequest};
//!
//! let request = MotorRequest::from_hp(10.0, "VFD");
//! let rec = recommend(builtin_catalog(), &request).unwrap();
//!
//! assert_eq!(rec.motor_specifications.full_load_current, 14.41);
//! assert_eq!(rec.circuit_breaker_rating, 21.62);
//! ```
//!
//! # Fixed factors
//!
//! | Constant | Value |
//! |----------|-------|
//! | kW per HP | 0.746 |
//! | Breaker rating | FLC × 1.5 |
//! | Star/delta contactors | breaker × 0.58 |
//! | Relay margin band | FLC × 0.8 ..= FLC × 1.2 |

pub mod compatibility;
pub mod contactor;
pub mod electrical;
pub mod error;
pub mod recommend;
pub mod relay;
pub mod topology;

// Re-exports for convenience
pub use compatibility::compatible_methods;
pub use contactor::select_contactor;
pub use electrical::{circuit_breaker_rating, full_load_current, hp_to_kw, kw_to_hp, round_to};
pub use error::{RecommendError, Result};
pub use recommend::{recommend, ComponentLine, MotorRequest, MotorSpecifications, Recommendation};
pub use relay::{select_overload_relay, RelayMatch, RelayMatchQuality};
pub use topology::{
    build_topology, ContactorRole, SizedContactor, StartingMethodKind, Topology, TopologyOutcome,
};
