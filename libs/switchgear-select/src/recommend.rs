//! Recommendation orchestrator
//!
//! Sequences validation, compatibility, electrical sizing, topology and
//! relay matching into one priced recommendation.

use serde::{Deserialize, Serialize};
use switchgear_model::{OverloadRelay, PartsRepository, StartingMethod};
use tracing::debug;

use crate::compatibility::compatible_methods;
use crate::electrical::{circuit_breaker_rating, full_load_current, hp_to_kw, kw_to_hp, round_to};
use crate::error::{RecommendError, Result};
use crate::relay::{select_overload_relay, RelayMatchQuality};
use crate::topology::{build_topology, Topology, TopologyOutcome};

// ============================================================================
// Request
// ============================================================================

fn default_voltage() -> f64 {
    415.0
}

fn default_frequency() -> f64 {
    50.0
}

fn default_phases() -> u32 {
    3
}

fn default_power_factor() -> f64 {
    0.8
}

fn default_efficiency() -> f64 {
    0.9
}

/// Motor nameplate data and the requested starting method
///
/// Power may be given in HP or kW; a value of exactly 0 counts as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorRequest {
    #[serde(default)]
    pub motor_power_hp: Option<f64>,
    #[serde(default)]
    pub motor_power_kw: Option<f64>,
    #[serde(default = "default_voltage")]
    pub voltage: f64,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default = "default_phases")]
    pub phases: u32,
    #[serde(default = "default_power_factor")]
    pub power_factor: f64,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    #[serde(default)]
    pub starting_method: Option<String>,
}

impl Default for MotorRequest {
    fn default() -> Self {
        Self {
            motor_power_hp: None,
            motor_power_kw: None,
            voltage: default_voltage(),
            frequency: default_frequency(),
            phases: default_phases(),
            power_factor: default_power_factor(),
            efficiency: default_efficiency(),
            starting_method: None,
        }
    }
}

impl MotorRequest {
    /// Request for a motor rated in HP
    pub fn from_hp(power_hp: f64, starting_method: impl Into<String>) -> Self {
        Self {
            motor_power_hp: Some(power_hp),
            starting_method: Some(starting_method.into()),
            ..Self::default()
        }
    }

    /// Request for a motor rated in kW
    pub fn from_kw(power_kw: f64, starting_method: impl Into<String>) -> Self {
        Self {
            motor_power_kw: Some(power_kw),
            starting_method: Some(starting_method.into()),
            ..Self::default()
        }
    }

    /// Resolve (hp, kw); a supplied HP wins and kW is then ignored
    fn resolve_power(&self) -> Result<(f64, f64)> {
        if let Some(hp) = supplied_power("motor_power_hp", self.motor_power_hp)? {
            return Ok((hp, hp_to_kw(hp)));
        }
        match supplied_power("motor_power_kw", self.motor_power_kw)? {
            Some(kw) => Ok((kw_to_hp(kw), kw)),
            None => Err(RecommendError::missing_input(
                "Motor power must be specified in HP or kW",
            )),
        }
    }

    fn validate_ratings(&self) -> Result<()> {
        if !self.voltage.is_finite() || self.voltage <= 0.0 {
            return Err(RecommendError::invalid_input("voltage must be positive"));
        }
        if !in_unit_interval(self.power_factor) {
            return Err(RecommendError::invalid_input(
                "power_factor must be in (0, 1]",
            ));
        }
        if !in_unit_interval(self.efficiency) {
            return Err(RecommendError::invalid_input("efficiency must be in (0, 1]"));
        }
        if self.phases != 1 && self.phases != 3 {
            return Err(RecommendError::invalid_input(format!(
                "phases must be 1 or 3, got {}",
                self.phases
            )));
        }
        Ok(())
    }
}

fn supplied_power(field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) if !v.is_finite() || v < 0.0 => Err(RecommendError::invalid_input(format!(
            "{} must be a non-negative number",
            field
        ))),
        Some(v) if v == 0.0 => Ok(None),
        Some(v) => Ok(Some(v)),
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

// ============================================================================
// Recommendation
// ============================================================================

/// Echo of the motor data used for sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSpecifications {
    /// Rounded to 1 decimal
    pub power_hp: f64,
    /// Rounded to 2 decimals
    pub power_kw: f64,
    pub voltage: f64,
    pub frequency: f64,
    pub phases: u32,
    pub full_load_current: f64,
    pub power_factor: f64,
    pub efficiency: f64,
}

/// One priced line of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLine {
    pub component: String,
    pub model: String,
    pub manufacturer: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

impl ComponentLine {
    fn single(component: &str, model: &str, manufacturer: &str, price: f64) -> Self {
        Self {
            component: component.to_string(),
            model: model.to_string(),
            manufacturer: manufacturer.to_string(),
            quantity: 1,
            unit_price: price,
            total_price: price,
        }
    }
}

/// Priced switchgear recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub motor_specifications: MotorSpecifications,
    pub starting_method: String,
    pub circuit_breaker_rating: f64,
    pub contactors: Topology,
    pub overload_relay: Option<OverloadRelay>,
    pub overload_relay_match: Option<RelayMatchQuality>,
    /// Contactors plus relay, rounded to 2 decimals
    pub total_cost: f64,
    pub component_list: Vec<ComponentLine>,
    pub compatible_starting_methods: Vec<StartingMethod>,
}

/// Produce a switchgear recommendation for one motor
///
/// Reads the catalog through `repo` only. A missing overload relay is not an
/// error; the recommendation carries no relay and no relay cost.
pub fn recommend<R: PartsRepository + ?Sized>(
    repo: &R,
    request: &MotorRequest,
) -> Result<Recommendation> {
    let (power_hp, power_kw) = request.resolve_power()?;

    let method = request
        .starting_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| RecommendError::missing_input("Starting method must be specified"))?;

    let methods = repo
        .starting_methods()
        .map_err(RecommendError::internal)?;
    let compatible = compatible_methods(&methods, power_hp);
    if !compatible.iter().any(|m| m.name == method) {
        return Err(RecommendError::IncompatibleMethod {
            method: method.to_string(),
            power_hp: round_to(power_hp, 1),
            compatible,
        });
    }

    request.validate_ratings()?;
    let flc = full_load_current(
        power_kw,
        request.voltage,
        request.power_factor,
        request.efficiency,
        request.phases,
    )?;
    let breaker = circuit_breaker_rating(flc);
    if !flc.is_finite() || !breaker.is_finite() {
        return Err(RecommendError::internal(format!(
            "non-finite rating: flc={} breaker={}",
            flc, breaker
        )));
    }
    debug!(
        method = method,
        power_hp = power_hp,
        flc = flc,
        breaker = breaker,
        "Sizing switchgear"
    );

    let contactors = repo.contactors().map_err(RecommendError::internal)?;
    let topology = match build_topology(method, &contactors, breaker, request.voltage) {
        TopologyOutcome::Built(topology) => topology,
        TopologyOutcome::NoContactor {
            role,
            required_current,
        } => {
            debug!(
                role = role.label(),
                required_current = required_current,
                "No contactor meets the rating"
            );
            return Err(RecommendError::no_suitable_parts(
                "No suitable contactors found for the specified requirements",
            ));
        },
        TopologyOutcome::UnsupportedMethod(name) => {
            return Err(RecommendError::no_suitable_parts(format!(
                "No contactor arrangement defined for starting method '{}'",
                name
            )));
        },
    };

    let relays = repo.overload_relays().map_err(RecommendError::internal)?;
    let frame_size = topology
        .primary()
        .and_then(|p| p.contactor.frame_size.as_deref());
    let relay_match = select_overload_relay(&relays, flc, frame_size);

    let mut component_list: Vec<ComponentLine> = topology
        .contactors
        .iter()
        .map(|s| {
            ComponentLine::single(
                s.role.label(),
                &s.contactor.model,
                &s.contactor.manufacturer,
                s.contactor.price,
            )
        })
        .collect();

    let mut total_cost = topology.total_cost;
    if let Some(m) = &relay_match {
        total_cost += m.relay.price;
        component_list.push(ComponentLine::single(
            "Overload Relay",
            &m.relay.model,
            &m.relay.manufacturer,
            m.relay.price,
        ));
    }
    let total_cost = round_to(total_cost, 2);
    if !total_cost.is_finite() {
        return Err(RecommendError::internal(format!(
            "non-finite total cost for {}",
            method
        )));
    }

    Ok(Recommendation {
        motor_specifications: MotorSpecifications {
            power_hp: round_to(power_hp, 1),
            power_kw: round_to(power_kw, 2),
            voltage: request.voltage,
            frequency: request.frequency,
            phases: request.phases,
            full_load_current: flc,
            power_factor: request.power_factor,
            efficiency: request.efficiency,
        },
        starting_method: method.to_string(),
        circuit_breaker_rating: breaker,
        overload_relay: relay_match.map(|m| m.relay.clone()),
        overload_relay_match: relay_match.map(|m| m.quality),
        contactors: topology,
        total_cost,
        component_list,
        compatible_starting_methods: compatible,
    })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::topology::ContactorRole;
    use switchgear_model::{builtin_catalog, Catalog, CatalogError, Contactor};
    use tracing_test::traced_test;

    struct UnavailableRepository;

    impl PartsRepository for UnavailableRepository {
        fn starting_methods(&self) -> switchgear_model::Result<Vec<StartingMethod>> {
            Err(CatalogError::unavailable("database is locked"))
        }

        fn contactors(&self) -> switchgear_model::Result<Vec<Contactor>> {
            Err(CatalogError::unavailable("database is locked"))
        }

        fn overload_relays(&self) -> switchgear_model::Result<Vec<OverloadRelay>> {
            Err(CatalogError::unavailable("database is locked"))
        }
    }

    /// Reference catalog with the DOL envelope raised to 15 HP
    fn wide_dol_catalog() -> Catalog {
        let mut catalog = builtin_catalog().clone();
        for method in catalog.starting_methods.iter_mut() {
            if method.name == "DOL" {
                method.max_power_hp = 15.0;
            }
        }
        catalog
    }

    #[test]
    fn test_ten_hp_dol_end_to_end() {
        let rec = recommend(&wide_dol_catalog(), &MotorRequest::from_hp(10.0, "DOL")).unwrap();

        let spec = &rec.motor_specifications;
        assert_eq!(spec.power_hp, 10.0);
        assert_eq!(spec.power_kw, 7.46);
        assert_eq!(spec.voltage, 415.0);
        assert_eq!(spec.frequency, 50.0);
        assert_eq!(spec.power_factor, 0.8);
        assert_eq!(spec.efficiency, 0.9);
        assert_eq!(spec.full_load_current, 14.41);
        assert_eq!(rec.circuit_breaker_rating, 21.62);

        let main = rec.contactors.role(ContactorRole::Main).unwrap();
        assert_eq!(main.contactor.model, "LC1D25M7");
        assert!(main.contactor.current_rating >= 21.62);
        assert!(main.contactor.voltage_rating >= 415);

        assert_eq!(rec.overload_relay.as_ref().unwrap().model, "TF42-16");
        assert_eq!(rec.overload_relay_match, Some(RelayMatchQuality::PointOnly));
        assert_eq!(rec.total_cost, 103.0);

        let labels: Vec<&str> = rec.component_list.iter().map(|c| c.component.as_str()).collect();
        assert_eq!(labels, vec!["Main Contactor", "Overload Relay"]);
        assert!(rec
            .compatible_starting_methods
            .iter()
            .any(|m| m.name == "DOL"));
    }

    #[test]
    fn test_ten_hp_dol_outside_reference_envelope() {
        // Reference DOL range stops at 5 HP
        let err = recommend(builtin_catalog(), &MotorRequest::from_hp(10.0, "DOL")).unwrap_err();
        assert_eq!(err.compatible_method_names(), vec!["Soft Starter", "VFD"]);

        // Same sizing through the VFD input contactor
        let rec = recommend(builtin_catalog(), &MotorRequest::from_hp(10.0, "VFD")).unwrap();
        assert_eq!(rec.circuit_breaker_rating, 21.62);
        assert_eq!(rec.contactors.primary().unwrap().contactor.model, "LC1D25M7");
    }

    #[test]
    fn test_star_delta_cost_is_sum_of_parts() {
        let rec = recommend(
            builtin_catalog(),
            &MotorRequest::from_hp(20.0, "Star-Delta"),
        )
        .unwrap();

        assert_eq!(rec.circuit_breaker_rating, 43.25);
        assert_eq!(rec.contactors.quantity, 3);
        let contactor_sum: f64 = rec
            .contactors
            .contactors
            .iter()
            .map(|s| s.contactor.price)
            .sum();
        assert_eq!(rec.contactors.total_cost, contactor_sum);

        let star = rec.contactors.role(ContactorRole::Star).unwrap();
        assert_eq!(star.required_current, rec.circuit_breaker_rating * 0.58);

        let labels: Vec<&str> = rec.component_list.iter().map(|c| c.component.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Main Contactor",
                "Star Contactor",
                "Delta Contactor",
                "Overload Relay"
            ]
        );
        assert_eq!(rec.total_cost, 299.0);
    }

    #[test]
    fn test_incompatible_method_lists_alternatives() {
        let err = recommend(
            builtin_catalog(),
            &MotorRequest::from_hp(1.0, "Star-Delta"),
        )
        .unwrap_err();

        assert!(matches!(err, RecommendError::IncompatibleMethod { .. }));
        assert_eq!(err.compatible_method_names(), vec!["DOL", "VFD"]);
        assert_eq!(
            err.to_string(),
            "Starting method 'Star-Delta' not suitable for 1 HP motor"
        );
    }

    #[test]
    fn test_missing_power_and_method() {
        let no_power = MotorRequest {
            starting_method: Some("DOL".to_string()),
            ..MotorRequest::default()
        };
        assert!(matches!(
            recommend(builtin_catalog(), &no_power),
            Err(RecommendError::MissingInput(_))
        ));

        let zero_power = MotorRequest::from_hp(0.0, "DOL");
        assert!(matches!(
            recommend(builtin_catalog(), &zero_power),
            Err(RecommendError::MissingInput(_))
        ));

        let blank_method = MotorRequest::from_hp(2.0, "  ");
        assert!(matches!(
            recommend(builtin_catalog(), &blank_method),
            Err(RecommendError::MissingInput(_))
        ));
    }

    #[test]
    fn test_hp_takes_precedence_over_kw() {
        let both = MotorRequest {
            motor_power_kw: Some(100.0),
            ..MotorRequest::from_hp(10.0, "VFD")
        };
        let rec = recommend(builtin_catalog(), &both).unwrap();
        assert_eq!(rec.motor_specifications.power_hp, 10.0);
        assert_eq!(rec.motor_specifications.power_kw, 7.46);

        let zero_hp = MotorRequest {
            motor_power_hp: Some(0.0),
            ..MotorRequest::from_kw(7.46, "VFD")
        };
        let rec = recommend(builtin_catalog(), &zero_hp).unwrap();
        assert_eq!(rec.motor_specifications.power_hp, 10.0);
    }

    #[test]
    fn test_kw_ignored_when_hp_given() {
        let request = MotorRequest {
            motor_power_kw: Some(-5.0),
            ..MotorRequest::from_hp(10.0, "VFD")
        };
        let rec = recommend(builtin_catalog(), &request).unwrap();
        assert_eq!(rec.motor_specifications.power_hp, 10.0);
        assert_eq!(rec.motor_specifications.power_kw, 7.46);

        // Without HP the bad kW is read and rejected
        let request = MotorRequest {
            motor_power_hp: None,
            ..request
        };
        assert!(matches!(
            recommend(builtin_catalog(), &request),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_compatibility_checked_before_ratings() {
        let request = MotorRequest {
            voltage: 0.0,
            ..MotorRequest::from_hp(1.0, "Star-Delta")
        };
        let err = recommend(builtin_catalog(), &request).unwrap_err();
        assert!(matches!(err, RecommendError::IncompatibleMethod { .. }));
        assert_eq!(err.compatible_method_names(), vec!["DOL", "VFD"]);

        // A compatible method reaches the rating check
        let request = MotorRequest {
            starting_method: Some("DOL".to_string()),
            ..request
        };
        assert!(matches!(
            recommend(builtin_catalog(), &request),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_numeric_inputs() {
        let cases = [
            MotorRequest::from_hp(-2.0, "DOL"),
            MotorRequest {
                power_factor: 1.2,
                ..MotorRequest::from_hp(2.0, "DOL")
            },
            MotorRequest {
                efficiency: 0.0,
                ..MotorRequest::from_hp(2.0, "DOL")
            },
            MotorRequest {
                voltage: -415.0,
                ..MotorRequest::from_hp(2.0, "DOL")
            },
            MotorRequest {
                phases: 2,
                ..MotorRequest::from_hp(2.0, "DOL")
            },
            MotorRequest::from_kw(f64::INFINITY, "DOL"),
        ];
        for request in cases {
            assert!(
                matches!(
                    recommend(builtin_catalog(), &request),
                    Err(RecommendError::InvalidInput(_))
                ),
                "{:?}",
                request
            );
        }
    }

    #[test]
    fn test_autotransformer_has_no_parts() {
        let err = recommend(
            builtin_catalog(),
            &MotorRequest::from_hp(30.0, "Autotransformer"),
        )
        .unwrap_err();
        assert!(matches!(err, RecommendError::NoSuitableParts(_)));
    }

    #[test]
    fn test_oversized_motor_has_no_contactor() {
        // 150 HP needs a contactor far above the largest catalog rating
        let err = recommend(builtin_catalog(), &MotorRequest::from_hp(150.0, "VFD")).unwrap_err();
        assert_eq!(
            err,
            RecommendError::NoSuitableParts(
                "No suitable contactors found for the specified requirements".to_string()
            )
        );
    }

    #[test]
    fn test_missing_relay_is_not_an_error() {
        let catalog = Catalog::new()
            .with_starting_methods(builtin_catalog().starting_methods.clone())
            .with_contactors(builtin_catalog().contactors.clone());

        let rec = recommend(&catalog, &MotorRequest::from_hp(3.0, "DOL")).unwrap();
        assert!(rec.overload_relay.is_none());
        assert!(rec.overload_relay_match.is_none());
        assert_eq!(rec.total_cost, rec.contactors.total_cost);
        assert_eq!(rec.component_list.len(), 1);
    }

    #[test]
    fn test_single_phase_motor() {
        let request = MotorRequest {
            phases: 1,
            voltage: 230.0,
            ..MotorRequest::from_hp(2.0, "DOL")
        };
        let rec = recommend(builtin_catalog(), &request).unwrap();
        // 1492 W / (230 × 0.8 × 0.9) = 9.01 A
        assert_eq!(rec.motor_specifications.full_load_current, 9.01);
        assert_eq!(rec.motor_specifications.phases, 1);
    }

    #[test]
    fn test_recommendation_is_idempotent() {
        let request = MotorRequest::from_hp(20.0, "Star-Delta");
        let first = serde_json::to_string(&recommend(builtin_catalog(), &request).unwrap()).unwrap();
        let second = serde_json::to_string(&recommend(builtin_catalog(), &request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: MotorRequest =
            serde_json::from_str(r#"{"motor_power_hp": 10, "starting_method": "DOL"}"#).unwrap();
        assert_eq!(request.voltage, 415.0);
        assert_eq!(request.frequency, 50.0);
        assert_eq!(request.phases, 3);
        assert_eq!(request.power_factor, 0.8);
        assert_eq!(request.efficiency, 0.9);
    }

    #[test]
    #[traced_test]
    fn test_repository_failure_is_internal() {
        let err = recommend(&UnavailableRepository, &MotorRequest::from_hp(10.0, "DOL")).unwrap_err();
        assert_eq!(err, RecommendError::Internal);
        assert!(!err.to_string().contains("locked"));
        assert!(logs_contain("database is locked"));
    }
}
