//! Electrical ratings derived from motor nameplate data

use crate::error::{RecommendError, Result};

/// kW per mechanical horsepower
pub const KW_PER_HP: f64 = 0.746;

/// Circuit breaker rating as a multiple of full-load current
pub const BREAKER_FACTOR: f64 = 1.5;

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn hp_to_kw(power_hp: f64) -> f64 {
    power_hp * KW_PER_HP
}

pub fn kw_to_hp(power_kw: f64) -> f64 {
    power_kw / KW_PER_HP
}

/// Full-load current in amperes, rounded to 2 decimals
///
/// Three-phase: `P×1000 / (√3 × V × PF × η)`.
/// Single-phase: `P×1000 / (V × PF × η)`.
pub fn full_load_current(
    power_kw: f64,
    voltage: f64,
    power_factor: f64,
    efficiency: f64,
    phases: u32,
) -> Result<f64> {
    for (name, value) in [
        ("power_kw", power_kw),
        ("voltage", voltage),
        ("power_factor", power_factor),
        ("efficiency", efficiency),
    ] {
        if !value.is_finite() {
            return Err(RecommendError::invalid_input(format!(
                "{} must be a finite number",
                name
            )));
        }
    }
    if voltage <= 0.0 {
        return Err(RecommendError::invalid_input("voltage must be positive"));
    }
    if power_factor <= 0.0 {
        return Err(RecommendError::invalid_input(
            "power_factor must be positive",
        ));
    }
    if efficiency <= 0.0 {
        return Err(RecommendError::invalid_input("efficiency must be positive"));
    }

    let phase_factor = match phases {
        3 => 3_f64.sqrt(),
        1 => 1.0,
        other => {
            return Err(RecommendError::invalid_input(format!(
                "phases must be 1 or 3, got {}",
                other
            )))
        },
    };

    let flc = (power_kw * 1000.0) / (phase_factor * voltage * power_factor * efficiency);
    Ok(round_to(flc, 2))
}

/// Circuit breaker rating: FLC × 1.5, rounded to 2 decimals
pub fn circuit_breaker_rating(full_load_current: f64) -> f64 {
    round_to(full_load_current * BREAKER_FACTOR, 2)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_phase_flc() {
        let flc = full_load_current(hp_to_kw(10.0), 415.0, 0.8, 0.9, 3).unwrap();
        assert_eq!(flc, 14.41);
        assert_eq!(circuit_breaker_rating(flc), 21.62);
    }

    #[test]
    fn test_single_phase_flc() {
        // 2.2 kW at 230 V: 2200 / (230 × 0.8 × 0.9) = 13.285...
        let flc = full_load_current(2.2, 230.0, 0.8, 0.9, 1).unwrap();
        assert_eq!(flc, 13.29);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            full_load_current(7.5, 0.0, 0.8, 0.9, 3),
            Err(RecommendError::InvalidInput(_))
        ));
        assert!(matches!(
            full_load_current(7.5, 415.0, -0.1, 0.9, 3),
            Err(RecommendError::InvalidInput(_))
        ));
        assert!(matches!(
            full_load_current(7.5, 415.0, 0.8, 0.0, 3),
            Err(RecommendError::InvalidInput(_))
        ));
        assert!(matches!(
            full_load_current(7.5, 415.0, 0.8, 0.9, 2),
            Err(RecommendError::InvalidInput(_))
        ));
        assert!(matches!(
            full_load_current(f64::NAN, 415.0, 0.8, 0.9, 3),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(round_to(hp_to_kw(10.0), 2), 7.46);
        assert_eq!(round_to(kw_to_hp(7.46), 1), 10.0);
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }

    #[test]
    fn test_breaker_rating_examples() {
        assert_eq!(circuit_breaker_rating(10.0), 15.0);
        assert_eq!(circuit_breaker_rating(28.83), 43.25);
        assert_eq!(circuit_breaker_rating(0.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_flc_increases_with_power(
            p1 in 0.1f64..1000.0,
            p2 in 0.1f64..1000.0,
            v in 100.0f64..1000.0,
            pf in 0.1f64..=1.0,
            eff in 0.1f64..=1.0,
        ) {
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            let a = full_load_current(lo, v, pf, eff, 3).unwrap();
            let b = full_load_current(hi, v, pf, eff, 3).unwrap();
            prop_assert!(a <= b);
        }

        #[test]
        fn prop_flc_decreases_with_voltage(
            p in 0.1f64..1000.0,
            v1 in 100.0f64..1000.0,
            v2 in 100.0f64..1000.0,
            pf in 0.1f64..=1.0,
            eff in 0.1f64..=1.0,
        ) {
            let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
            let a = full_load_current(p, lo, pf, eff, 3).unwrap();
            let b = full_load_current(p, hi, pf, eff, 3).unwrap();
            prop_assert!(a >= b);
        }

        #[test]
        fn prop_flc_decreases_with_power_factor(
            p in 0.1f64..1000.0,
            v in 100.0f64..1000.0,
            pf1 in 0.1f64..=1.0,
            pf2 in 0.1f64..=1.0,
            eff in 0.1f64..=1.0,
        ) {
            let (lo, hi) = if pf1 <= pf2 { (pf1, pf2) } else { (pf2, pf1) };
            let a = full_load_current(p, v, lo, eff, 3).unwrap();
            let b = full_load_current(p, v, hi, eff, 3).unwrap();
            prop_assert!(a >= b);
        }

        #[test]
        fn prop_flc_decreases_with_efficiency(
            p in 0.1f64..1000.0,
            v in 100.0f64..1000.0,
            pf in 0.1f64..=1.0,
            eff1 in 0.1f64..=1.0,
            eff2 in 0.1f64..=1.0,
        ) {
            let (lo, hi) = if eff1 <= eff2 { (eff1, eff2) } else { (eff2, eff1) };
            let a = full_load_current(p, v, pf, lo, 3).unwrap();
            let b = full_load_current(p, v, pf, hi, 3).unwrap();
            prop_assert!(a >= b);
        }

        #[test]
        fn prop_breaker_is_rounded_one_and_a_half_flc(flc in 0.0f64..5000.0) {
            let breaker = circuit_breaker_rating(flc);
            prop_assert_eq!(breaker, round_to(flc * 1.5, 2));
            prop_assert!((breaker - flc * 1.5).abs() <= 0.005 + 1e-9);
        }
    }
}
