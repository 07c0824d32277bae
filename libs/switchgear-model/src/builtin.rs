//! Built-in Reference Catalog
//!
//! Reference parts data embedded at compile time: 8 manufacturers,
//! 5 starting methods, 34 contactors and 34 overload relays. Used to seed
//! a fresh database and as the fallback catalog for offline calculations.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::catalog::Catalog;
use crate::error::Result;

static BUILTIN_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new()
        .with_manufacturers(parse_table(
            "manufacturers",
            include_str!("catalog_data/manufacturers.json"),
        ))
        .with_starting_methods(parse_table(
            "starting_methods",
            include_str!("catalog_data/starting_methods.json"),
        ))
        .with_contactors(parse_table(
            "contactors",
            include_str!("catalog_data/contactors.json"),
        ))
        .with_overload_relays(parse_table(
            "overload_relays",
            include_str!("catalog_data/overload_relays.json"),
        ))
});

fn parse_table<T: DeserializeOwned>(table: &str, json: &str) -> Vec<T> {
    match parse_json(json) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Built-in catalog table {} unreadable: {}", table, e);
            Vec::new()
        },
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}

/// Get the built-in reference catalog
pub fn builtin_catalog() -> &'static Catalog {
    &BUILTIN_CATALOG
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_loaded() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.manufacturers.len(), 8);
        assert_eq!(catalog.starting_methods.len(), 5);
        assert_eq!(catalog.contactors.len(), 34);
        assert_eq!(catalog.overload_relays.len(), 34);
    }

    #[test]
    fn test_method_envelopes() {
        let catalog = builtin_catalog();
        let envelope = |name: &str| {
            let m = catalog.starting_method(name).unwrap();
            (m.min_power_hp, m.max_power_hp)
        };
        assert_eq!(envelope("DOL"), (0.5, 5.0));
        assert_eq!(envelope("Star-Delta"), (15.0, 200.0));
        assert_eq!(envelope("Soft Starter"), (5.0, 500.0));
        assert_eq!(envelope("VFD"), (1.0, 1000.0));
        assert_eq!(envelope("Autotransformer"), (25.0, 300.0));
    }

    #[test]
    fn test_known_parts_present() {
        let catalog = builtin_catalog();
        let lc1d25 = catalog
            .contactors
            .iter()
            .find(|c| c.model == "LC1D25M7")
            .unwrap();
        assert_eq!(lc1d25.current_rating, 25.0);
        assert_eq!(lc1d25.frame_size.as_deref(), Some("D25"));

        let tf42 = catalog
            .overload_relays
            .iter()
            .find(|r| r.model == "TF42-16")
            .unwrap();
        assert_eq!(tf42.current_range_label(), "10-16A");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_json::<crate::Manufacturer>("not json").unwrap_err();
        assert!(matches!(err, crate::CatalogError::Parsing(_)));
    }
}
