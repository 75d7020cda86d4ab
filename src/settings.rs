//! Rig configuration
//!
//! Fixed per-session tuning. Nothing here is mutated by gameplay; the only
//! derived value is `max_length`, which may be computed once from play-field
//! geometry when the rig is spawned.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be non-negative and finite (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("min_length {min} must be below max_length {max}")]
    LengthBounds { min: f32, max: f32 },
}

/// Vertical extents used to derive the rope's reach
///
/// Both values are in the same space as the rig's mount point, with y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    /// Height of the rope pivot
    pub mount_y: f32,
    /// Height of the lower boundary of the play field
    pub field_bottom_y: f32,
}

/// Per-session rig tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    // === Rope length ===
    /// Resting rope length
    pub min_length: f32,
    /// Reach used when no play-field geometry is available
    pub max_length: f32,
    /// Extra reach past the play-field bottom when deriving `max_length`
    pub max_length_margin: f32,

    // === Speeds ===
    /// Rope growth while extending (units/s)
    pub extend_speed: f32,
    /// Rope shrink while retracting with nothing held (units/s)
    pub retract_speed: f32,
    /// Swing oscillator frequency (rad/s)
    pub swing_speed: f32,
    /// Maximum swing amplitude (radians)
    pub swing_range: f32,

    // === Catch ===
    /// Overshoot after a catch before the rope reverses
    pub hit_depth: f32,
    /// Radius of the claw's contact sensor
    pub sensor_radius: f32,

    // === Presentation ===
    pub popup_duration_secs: f32,
    pub rope_width: f32,
    /// Rope trimmed off the claw end when the claw sprite draws its own stub
    pub hide_at_claw: f32,
    /// Added to the endpoint heading; 54 puts the resting claw at -36 degrees
    pub claw_angle_offset_deg: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            min_length: 70.0,
            max_length: 500.0,
            max_length_margin: 120.0,

            extend_speed: 100.0,
            retract_speed: 300.0,
            swing_speed: 1.5,
            swing_range: 0.5,

            hit_depth: 20.0,
            sensor_radius: 12.0,

            popup_duration_secs: 0.8,
            rope_width: 2.0,
            hide_at_claw: 0.0,
            claw_angle_offset_deg: 54.0,
        }
    }
}

impl RigConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_length", self.min_length),
            ("max_length", self.max_length),
            ("extend_speed", self.extend_speed),
            ("retract_speed", self.retract_speed),
            ("rope_width", self.rope_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("max_length_margin", self.max_length_margin),
            ("swing_speed", self.swing_speed),
            ("swing_range", self.swing_range),
            ("hit_depth", self.hit_depth),
            ("sensor_radius", self.sensor_radius),
            ("popup_duration_secs", self.popup_duration_secs),
            ("hide_at_claw", self.hide_at_claw),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !self.claw_angle_offset_deg.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "claw_angle_offset_deg",
                value: self.claw_angle_offset_deg,
            });
        }

        if self.min_length >= self.max_length {
            return Err(ConfigError::LengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Reach for a rig mounted above the given play field
    ///
    /// Falls back to the configured `max_length` when geometry is missing or
    /// would not reach past `min_length`.
    pub fn derive_max_length(&self, geometry: Option<FieldGeometry>) -> f32 {
        let Some(geometry) = geometry else {
            log::debug!("No field geometry, keeping max_length {}", self.max_length);
            return self.max_length;
        };

        let derived = geometry.mount_y - geometry.field_bottom_y + self.max_length_margin;
        if !derived.is_finite() || derived <= self.min_length {
            log::warn!(
                "Field geometry gives reach {} not above min_length {}, keeping {}",
                derived,
                self.min_length,
                self.max_length
            );
            return self.max_length;
        }
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RigConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_length, 70.0);
        assert_eq!(config.max_length, 500.0);
        assert_eq!(config.hit_depth, 20.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RigConfig::from_json(r#"{ "extend_speed": 250.0 }"#).unwrap();
        assert_eq!(config.extend_speed, 250.0);
        assert_eq!(config.retract_speed, 300.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = RigConfig::from_json(r#"{ "retract_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "retract_speed",
                ..
            }
        ));

        let err = RigConfig::from_json(r#"{ "min_length": 600.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::LengthBounds { .. }));

        let err = RigConfig::from_json(r#"{ "min_length": 500.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::LengthBounds { .. }));

        let err = RigConfig::from_json(r#"{ "hit_depth": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { .. }));
    }

    #[test]
    fn test_derive_max_length() {
        let config = RigConfig::default();
        let geometry = FieldGeometry {
            mount_y: 250.0,
            field_bottom_y: -300.0,
        };
        assert_eq!(config.derive_max_length(Some(geometry)), 670.0);
    }

    #[test]
    fn test_derive_max_length_falls_back() {
        let config = RigConfig::default();
        assert_eq!(config.derive_max_length(None), 500.0);

        // Field bottom above the mount: reach would be below min_length
        let geometry = FieldGeometry {
            mount_y: 0.0,
            field_bottom_y: 400.0,
        };
        assert_eq!(config.derive_max_length(Some(geometry)), 500.0);
    }

    #[test]
    fn test_derive_max_length_rejects_reach_equal_to_min() {
        let config = RigConfig::default();
        // 0 - 50 + 120 == min_length: the rope could never extend
        let geometry = FieldGeometry {
            mount_y: 0.0,
            field_bottom_y: 50.0,
        };
        assert_eq!(config.derive_max_length(Some(geometry)), 500.0);
    }
}
