//! Parts catalog and the repository seam
//!
//! The selection algorithm reads reference data only through
//! [`PartsRepository`]. [`Catalog`] is the in-memory implementation: a
//! point-in-time snapshot loaded wholesale from a store or from the
//! built-in reference data.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::{Contactor, Manufacturer, OverloadRelay, StartingMethod};

/// Read-only access to catalog rows
///
/// Every method returns the full, unfiltered list in catalog order.
/// Filtering, ordering and selection belong to the caller.
pub trait PartsRepository {
    /// All starting methods
    fn starting_methods(&self) -> Result<Vec<StartingMethod>>;

    /// All contactors
    fn contactors(&self) -> Result<Vec<Contactor>>;

    /// All overload relays
    fn overload_relays(&self) -> Result<Vec<OverloadRelay>>;
}

impl<R: PartsRepository + ?Sized> PartsRepository for &R {
    fn starting_methods(&self) -> Result<Vec<StartingMethod>> {
        (**self).starting_methods()
    }

    fn contactors(&self) -> Result<Vec<Contactor>> {
        (**self).contactors()
    }

    fn overload_relays(&self) -> Result<Vec<OverloadRelay>> {
        (**self).overload_relays()
    }
}

/// Row counts per catalog table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub manufacturers: usize,
    pub starting_methods: usize,
    pub contactors: usize,
    pub overload_relays: usize,
}

/// In-memory parts catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub manufacturers: Vec<Manufacturer>,
    #[serde(default)]
    pub starting_methods: Vec<StartingMethod>,
    #[serde(default)]
    pub contactors: Vec<Contactor>,
    #[serde(default)]
    pub overload_relays: Vec<OverloadRelay>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manufacturers(mut self, manufacturers: Vec<Manufacturer>) -> Self {
        self.manufacturers = manufacturers;
        self
    }

    pub fn with_starting_methods(mut self, methods: Vec<StartingMethod>) -> Self {
        self.starting_methods = methods;
        self
    }

    pub fn with_contactors(mut self, contactors: Vec<Contactor>) -> Self {
        self.contactors = contactors;
        self
    }

    pub fn with_overload_relays(mut self, relays: Vec<OverloadRelay>) -> Self {
        self.overload_relays = relays;
        self
    }

    /// Row counts
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            manufacturers: self.manufacturers.len(),
            starting_methods: self.starting_methods.len(),
            contactors: self.contactors.len(),
            overload_relays: self.overload_relays.len(),
        }
    }

    /// Find a starting method by its unique name
    pub fn starting_method(&self, name: &str) -> Option<&StartingMethod> {
        self.starting_methods.iter().find(|m| m.name == name)
    }

    /// Check entity invariants and unique keys
    ///
    /// Violations are reported, never repaired. Contactor frame sizes that no
    /// relay references (and vice versa) are tolerated.
    pub fn validate(&self) -> Result<()> {
        unique_keys("manufacturer", self.manufacturers.iter().map(|m| &m.name))?;
        unique_keys(
            "starting method",
            self.starting_methods.iter().map(|m| &m.name),
        )?;
        unique_keys("contactor", self.contactors.iter().map(|c| &c.model))?;
        unique_keys("overload relay", self.overload_relays.iter().map(|r| &r.model))?;

        for method in &self.starting_methods {
            if !not_above(method.min_power_hp, method.max_power_hp) {
                return Err(CatalogError::invalid_entry(
                    &method.name,
                    format!(
                        "min_power_hp {} exceeds max_power_hp {}",
                        method.min_power_hp, method.max_power_hp
                    ),
                ));
            }
        }

        for contactor in &self.contactors {
            if !not_above(f64::MIN_POSITIVE, contactor.current_rating) {
                return Err(CatalogError::invalid_entry(
                    &contactor.model,
                    format!(
                        "current_rating must be positive, got {}",
                        contactor.current_rating
                    ),
                ));
            }
        }

        for relay in &self.overload_relays {
            if !not_above(relay.current_range_min, relay.current_range_max) {
                return Err(CatalogError::invalid_entry(
                    &relay.model,
                    format!(
                        "current_range_min {} exceeds current_range_max {}",
                        relay.current_range_min, relay.current_range_max
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// `low <= high`, false when either side is NaN
fn not_above(low: f64, high: f64) -> bool {
    matches!(low.partial_cmp(&high), Some(Ordering::Less | Ordering::Equal))
}

fn unique_keys<'a>(kind: &str, keys: impl Iterator<Item = &'a String>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(CatalogError::DuplicateKey(format!("{} '{}'", kind, key)));
        }
    }
    Ok(())
}

impl PartsRepository for Catalog {
    fn starting_methods(&self) -> Result<Vec<StartingMethod>> {
        Ok(self.starting_methods.clone())
    }

    fn contactors(&self) -> Result<Vec<Contactor>> {
        Ok(self.contactors.clone())
    }

    fn overload_relays(&self) -> Result<Vec<OverloadRelay>> {
        Ok(self.overload_relays.clone())
    }
}
