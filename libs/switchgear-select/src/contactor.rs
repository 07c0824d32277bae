//! Contactor selection

use switchgear_model::Contactor;

/// Smallest adequate contactor
///
/// Among contactors rated at least `min_current` amperes and `min_voltage`
/// volts, returns the lowest current rating, then the lowest price. Remaining
/// ties keep catalog order. `None` when nothing qualifies.
pub fn select_contactor(
    contactors: &[Contactor],
    min_current: f64,
    min_voltage: f64,
) -> Option<&Contactor> {
    contactors
        .iter()
        .filter(|c| c.current_rating >= min_current && f64::from(c.voltage_rating) >= min_voltage)
        .min_by(|a, b| {
            a.current_rating
                .total_cmp(&b.current_rating)
                .then(a.price.total_cmp(&b.price))
        })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use switchgear_model::builtin_catalog;

    fn contactor(model: &str, rating: f64, voltage: u32, price: f64) -> Contactor {
        Contactor {
            model: model.to_string(),
            manufacturer: "Test".to_string(),
            current_rating: rating,
            voltage_rating: voltage,
            utilization_category: "AC-3".to_string(),
            poles: 3,
            auxiliary_contacts: None,
            coil_voltage: None,
            frame_size: Some(format!("F{}", rating)),
            price,
            image_url: None,
            datasheet_url: None,
        }
    }

    #[test]
    fn test_smallest_rating_then_price() {
        let parts = vec![
            contactor("big", 40.0, 690, 20.0),
            contactor("exact-dear", 25.0, 690, 70.0),
            contactor("exact-cheap", 25.0, 690, 60.0),
            contactor("small", 18.0, 690, 10.0),
        ];
        let chosen = select_contactor(&parts, 21.62, 415.0).unwrap();
        assert_eq!(chosen.model, "exact-cheap");
    }

    #[test]
    fn test_price_tie_keeps_catalog_order() {
        let parts = vec![
            contactor("first", 25.0, 690, 60.0),
            contactor("second", 25.0, 690, 60.0),
        ];
        assert_eq!(select_contactor(&parts, 20.0, 400.0).unwrap().model, "first");
    }

    #[test]
    fn test_voltage_floor() {
        let parts = vec![
            contactor("low-volt", 25.0, 400, 10.0),
            contactor("high-volt", 32.0, 690, 80.0),
        ];
        assert_eq!(select_contactor(&parts, 20.0, 415.0).unwrap().model, "high-volt");
        assert!(select_contactor(&parts, 20.0, 1000.0).is_none());
    }

    #[test]
    fn test_exact_rating_qualifies() {
        let parts = vec![contactor("nine", 9.0, 690, 45.0)];
        assert!(select_contactor(&parts, 9.0, 690.0).is_some());
        assert!(select_contactor(&parts, 9.01, 690.0).is_none());
    }

    #[test]
    fn test_builtin_selection_never_undersized() {
        let catalog = builtin_catalog();
        for min in [0.5, 9.0, 12.54, 21.62, 43.25, 94.9] {
            let c = select_contactor(&catalog.contactors, min, 415.0).unwrap();
            assert!(c.current_rating >= min);
            let smaller = catalog
                .contactors
                .iter()
                .filter(|o| o.current_rating >= min)
                .any(|o| o.current_rating < c.current_rating);
            assert!(!smaller);
        }
        assert_eq!(
            select_contactor(&catalog.contactors, 21.62, 415.0).unwrap().model,
            "LC1D25M7"
        );
        assert!(select_contactor(&catalog.contactors, 100.0, 415.0).is_none());
    }
}
