//! Configuration loading helper functions
//! Provides utilities for loading configuration with fallback logic

use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

/// Get configuration value with priority: configured > ENV > default
///
/// # Arguments
/// * `configured` - Value from the config file or prefixed environment
/// * `is_default` - Whether `configured` is just the built-in default
/// * `env_var` - Legacy environment variable name to check
/// * `default` - Default value to use as fallback
pub fn get_config_value<T>(configured: Option<T>, is_default: bool, env_var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(val) = configured {
        if !is_default {
            debug!("Using configured value for {}", env_var);
            return val;
        }
    }

    if let Ok(env_str) = std::env::var(env_var) {
        match env_str.trim().parse::<T>() {
            Ok(val) => {
                debug!("Using {} from environment: {}", env_var, env_str);
                return val;
            },
            Err(e) => {
                warn!("Failed to parse {} from environment: {}", env_var, e);
            },
        }
    }

    default
}
