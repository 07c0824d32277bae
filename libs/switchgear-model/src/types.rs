//! Catalog entity types
//!
//! All records are immutable once loaded. Unique keys: manufacturer name,
//! starting method name, contactor model, overload relay model.

use serde::{Deserialize, Serialize};

fn default_utilization_category() -> String {
    "AC-3".to_string()
}

fn default_poles() -> u32 {
    3
}

fn default_trip_class() -> u32 {
    10
}

fn default_reset_type() -> String {
    "Manual".to_string()
}

/// Switchgear manufacturer (descriptive only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Motor starting method with its inclusive power envelope in HP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingMethod {
    /// Unique method name (e.g. "DOL", "Star-Delta")
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub min_power_hp: f64,
    pub max_power_hp: f64,
    /// Fractional reduction of starting current (0.0-1.0)
    #[serde(default)]
    pub starting_current_reduction: f64,
    /// Fractional reduction of starting torque (0.0-1.0)
    #[serde(default)]
    pub starting_torque_reduction: f64,
    /// 1 = simple, 2 = medium, 3 = complex
    #[serde(default = "default_complexity")]
    pub complexity_level: u8,
    /// Relative cost multiplier
    #[serde(default = "default_cost_factor")]
    pub cost_factor: f64,
}

fn default_complexity() -> u8 {
    1
}

fn default_cost_factor() -> f64 {
    1.0
}

impl StartingMethod {
    /// Whether `power_hp` lies inside the method's power envelope (both ends inclusive)
    pub fn covers(&self, power_hp: f64) -> bool {
        self.min_power_hp <= power_hp && power_hp <= self.max_power_hp
    }
}

/// Magnetic contactor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contactor {
    /// Unique model number
    pub model: String,
    pub manufacturer: String,
    /// Rated operational current in amperes
    pub current_rating: f64,
    /// Rated operational voltage in volts
    pub voltage_rating: u32,
    #[serde(default = "default_utilization_category")]
    pub utilization_category: String,
    #[serde(default = "default_poles")]
    pub poles: u32,
    #[serde(default)]
    pub auxiliary_contacts: Option<String>,
    #[serde(default)]
    pub coil_voltage: Option<u32>,
    /// Physical size class, matched against relay frame lists
    #[serde(default)]
    pub frame_size: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasheet_url: Option<String>,
}

/// Thermal overload relay with an adjustable current range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadRelay {
    /// Unique model number
    pub model: String,
    pub manufacturer: String,
    pub current_range_min: f64,
    pub current_range_max: f64,
    #[serde(default = "default_trip_class")]
    pub trip_class: u32,
    #[serde(default = "default_reset_type")]
    pub reset_type: String,
    /// Contactor frame sizes this relay mounts on; empty means any frame
    #[serde(default)]
    pub compatible_contactor_frames: Vec<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasheet_url: Option<String>,
}

impl OverloadRelay {
    /// Whether the adjustable range contains the whole interval [low, high]
    pub fn covers_band(&self, low: f64, high: f64) -> bool {
        self.current_range_min <= low && self.current_range_max >= high
    }

    /// Whether the adjustable range contains a single current
    pub fn covers_point(&self, current: f64) -> bool {
        self.covers_band(current, current)
    }

    /// Frame compatibility; an empty frame list fits every contactor
    pub fn fits_frame(&self, frame_size: Option<&str>) -> bool {
        if self.compatible_contactor_frames.is_empty() {
            return true;
        }
        match frame_size {
            Some(frame) => self.compatible_contactor_frames.iter().any(|f| f == frame),
            None => false,
        }
    }

    /// Range label as shown in catalogs, e.g. `"16-25A"`
    pub fn current_range_label(&self) -> String {
        format!("{}-{}A", self.current_range_min, self.current_range_max)
    }
}
