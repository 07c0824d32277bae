//! Starting method compatibility by motor power

use switchgear_model::StartingMethod;

/// Methods whose power envelope contains `power_hp`, in catalog order
///
/// An empty result is valid.
pub fn compatible_methods(methods: &[StartingMethod], power_hp: f64) -> Vec<StartingMethod> {
    methods
        .iter()
        .filter(|m| m.covers(power_hp))
        .cloned()
        .collect()
}
