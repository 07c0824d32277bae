//! Shared Serde helpers
//!
//! Default-value functions and lenient deserializers for query strings and
//! request bodies, where a blank value should mean "not given".

use serde::{Deserialize, Deserializer};

/// Default value: true
pub fn bool_true() -> bool {
    true
}

/// Deserialize optional f64
///
/// Supports the following input formats:
/// - `null` → `None`
/// - `""` → `None`
/// - `12.5` or `"12.5"` → `Some(12.5)`
///
/// # Example
/// ```ignore
/// #[derive(Deserialize)]
/// struct Filter {
///     #[serde(default, deserialize_with = "deserialize_optional_f64")]
///     min_current: Option<f64>,
/// }
/// ```
pub fn deserialize_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
        Null,
    }

    match Option::<StringOrFloat>::deserialize(deserializer)? {
        None | Some(StringOrFloat::Null) => Ok(None),
        Some(StringOrFloat::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrFloat::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {}", s))),
        Some(StringOrFloat::Float(f)) => Ok(Some(f)),
    }
}

/// Deserialize optional string, treating blank input as absent
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
