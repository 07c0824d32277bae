//! Contactor topology per starting method
//!
//! Each supported starting method wires a fixed set of contactor roles:
//!
//! | Method | Roles | Sizing |
//! |--------|-------|--------|
//! | DOL | main | breaker rating |
//! | Star-Delta | main, star, delta | breaker rating; star/delta at breaker × 0.58 |
//! | Soft Starter | bypass | breaker rating |
//! | VFD | input | breaker rating |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use switchgear_model::Contactor;

use crate::contactor::select_contactor;

/// Star and delta contactor rating as a fraction of the breaker rating
pub const STAR_DELTA_FACTOR: f64 = 0.58;

/// Starting methods with a defined contactor topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartingMethodKind {
    #[serde(rename = "DOL")]
    Dol,
    #[serde(rename = "Star-Delta")]
    StarDelta,
    #[serde(rename = "Soft Starter")]
    SoftStarter,
    #[serde(rename = "VFD")]
    Vfd,
}

impl StartingMethodKind {
    /// Catalog name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dol => "DOL",
            Self::StarDelta => "Star-Delta",
            Self::SoftStarter => "Soft Starter",
            Self::Vfd => "VFD",
        }
    }
}

impl fmt::Display for StartingMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartingMethodKind {
    type Err = String;

    /// Exact, case-sensitive match on the catalog name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOL" => Ok(Self::Dol),
            "Star-Delta" => Ok(Self::StarDelta),
            "Soft Starter" => Ok(Self::SoftStarter),
            "VFD" => Ok(Self::Vfd),
            other => Err(format!("No topology for starting method '{}'", other)),
        }
    }
}

/// Position of a contactor within a starter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactorRole {
    Main,
    Star,
    Delta,
    Bypass,
    Input,
}

impl ContactorRole {
    /// Label used in component lists
    pub fn label(&self) -> &'static str {
        match self {
            Self::Main => "Main Contactor",
            Self::Star => "Star Contactor",
            Self::Delta => "Delta Contactor",
            Self::Bypass => "Bypass Contactor",
            Self::Input => "Input Contactor",
        }
    }
}

/// Contactor chosen for one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedContactor {
    pub role: ContactorRole,
    /// Minimum current the role was sized for
    pub required_current: f64,
    pub contactor: Contactor,
}

/// Assembled contactor set for a starting method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub method: StartingMethodKind,
    /// One entry per role, in wiring order
    pub contactors: Vec<SizedContactor>,
    pub quantity: u32,
    /// Sum of contactor prices
    pub total_cost: f64,
}

impl Topology {
    /// Contactor that carries the overload relay: main, else bypass, else input
    pub fn primary(&self) -> Option<&SizedContactor> {
        [ContactorRole::Main, ContactorRole::Bypass, ContactorRole::Input]
            .iter()
            .find_map(|role| self.role(*role))
    }

    pub fn role(&self, role: ContactorRole) -> Option<&SizedContactor> {
        self.contactors.iter().find(|c| c.role == role)
    }
}

/// Result of building a topology
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyOutcome {
    Built(Topology),
    /// No catalog contactor satisfies a role
    NoContactor {
        role: ContactorRole,
        required_current: f64,
    },
    /// The method has no defined topology
    UnsupportedMethod(String),
}

/// Roles and their sizing current for a method
fn role_plan(kind: StartingMethodKind, breaker_rating: f64) -> Vec<(ContactorRole, f64)> {
    match kind {
        StartingMethodKind::Dol => vec![(ContactorRole::Main, breaker_rating)],
        StartingMethodKind::StarDelta => {
            let reduced = breaker_rating * STAR_DELTA_FACTOR;
            vec![
                (ContactorRole::Main, breaker_rating),
                (ContactorRole::Star, reduced),
                (ContactorRole::Delta, reduced),
            ]
        },
        StartingMethodKind::SoftStarter => vec![(ContactorRole::Bypass, breaker_rating)],
        StartingMethodKind::Vfd => vec![(ContactorRole::Input, breaker_rating)],
    }
}

/// Select one contactor per role of `method_name`, each meeting `voltage`
pub fn build_topology(
    method_name: &str,
    contactors: &[Contactor],
    breaker_rating: f64,
    voltage: f64,
) -> TopologyOutcome {
    let kind = match method_name.parse::<StartingMethodKind>() {
        Ok(kind) => kind,
        Err(_) => return TopologyOutcome::UnsupportedMethod(method_name.to_string()),
    };

    let mut sized = Vec::new();
    for (role, required_current) in role_plan(kind, breaker_rating) {
        match select_contactor(contactors, required_current, voltage) {
            Some(contactor) => sized.push(SizedContactor {
                role,
                required_current,
                contactor: contactor.clone(),
            }),
            None => {
                return TopologyOutcome::NoContactor {
                    role,
                    required_current,
                }
            },
        }
    }

    let total_cost = sized.iter().map(|s| s.contactor.price).sum();
    TopologyOutcome::Built(Topology {
        method: kind,
        quantity: sized.len() as u32,
        contactors: sized,
        total_cost,
    })
}
