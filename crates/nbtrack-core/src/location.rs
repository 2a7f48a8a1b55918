// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Location engine configuration and the location sample sent to the host.
//
// A config is either one of three presets or a fully custom parameter set.
// Decoding a preset ignores every other field in the source, so presets do
// not round-trip: the encoded form carries the preset's own parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::types::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    Active,
    Balanced,
    Passive,
    Custom,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Balanced => "balanced",
            Self::Passive => "passive",
            Self::Custom => "custom",
        }
    }

    /// Preset modes only; `"custom"` and anything else yield `None`.
    pub fn preset_from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "balanced" => Some(Self::Balanced),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredAccuracy {
    High,
    Balanced,
    Low,
}

impl DesiredAccuracy {
    /// Wire name; the balanced level is called `medium` on the host side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Balanced => "medium",
            Self::Low => "low",
        }
    }

    /// Unknown or missing values fall back to `High`.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("medium") => Self::Balanced,
            Some("low") => Self::Low,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct LocationConfig {
    pub tracking_mode: TrackingMode,
    /// Milliseconds between location requests.
    pub interval: i64,
    /// Metres.
    pub smallest_displacement: f64,
    pub desired_accuracy: DesiredAccuracy,
    pub max_wait_time: i64,
    pub fastest_interval: i64,
    pub enable_stationary_check: bool,
}

impl LocationConfig {
    /// The bridge's stand-in parameters for a preset mode.
    ///
    /// The native SDK resolves presets internally and does not expose the
    /// values; these are what the bridge reports (and the stub SDK applies)
    /// for a preset. `Custom` has no preset.
    pub fn preset(mode: TrackingMode) -> Option<Self> {
        let (interval, smallest_displacement, desired_accuracy) = match mode {
            TrackingMode::Active => (5_000, 5.0, DesiredAccuracy::High),
            TrackingMode::Balanced => (10_000, 10.0, DesiredAccuracy::Balanced),
            TrackingMode::Passive => (30_000, 30.0, DesiredAccuracy::Low),
            TrackingMode::Custom => return None,
        };
        Some(Self {
            tracking_mode: mode,
            interval,
            smallest_displacement,
            desired_accuracy,
            max_wait_time: interval * 2,
            fastest_interval: interval / 5,
            enable_stationary_check: mode != TrackingMode::Active,
        })
    }
}

/// The active preset.
impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            tracking_mode: TrackingMode::Active,
            interval: 5_000,
            smallest_displacement: 5.0,
            desired_accuracy: DesiredAccuracy::High,
            max_wait_time: 10_000,
            fastest_interval: 1_000,
            enable_stationary_check: false,
        }
    }
}

fn required_i64(obj: &Map<String, Value>, key: &str) -> Result<i64, String> {
    obj.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("`{key}` must be an integer"))
}

/// Errors surface through serde, which the codec reports as `MalformedConfig`.
impl TryFrom<Value> for LocationConfig {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let obj = value
            .as_object()
            .ok_or("location config must be a JSON object")?;

        if let Some(preset) = obj
            .get("trackingMode")
            .and_then(Value::as_str)
            .and_then(TrackingMode::preset_from_str)
            .and_then(Self::preset)
        {
            return Ok(preset);
        }

        let interval = required_i64(obj, "interval")?;
        let smallest_displacement = obj
            .get("smallestDisplacement")
            .and_then(Value::as_f64)
            .ok_or("`smallestDisplacement` must be a number")?;
        let max_wait_time = required_i64(obj, "maxWaitTime")?;
        let fastest_interval = required_i64(obj, "fastestInterval")?;
        let enable_stationary_check = obj
            .get("enableStationaryCheck")
            .and_then(Value::as_bool)
            .ok_or("`enableStationaryCheck` must be a boolean")?;

        Ok(Self {
            tracking_mode: TrackingMode::Custom,
            interval,
            smallest_displacement,
            desired_accuracy: DesiredAccuracy::from_wire(
                obj.get("desiredAccuracy").and_then(Value::as_str),
            ),
            max_wait_time,
            fastest_interval,
            enable_stationary_check,
        })
    }
}

impl From<LocationConfig> for Value {
    fn from(config: LocationConfig) -> Self {
        json!({
            "trackingMode": config.tracking_mode.as_str(),
            "interval": config.interval,
            "smallestDisplacement": config.smallest_displacement,
            "maxWaitTime": config.max_wait_time,
            "fastestInterval": config.fastest_interval,
            "enableStationaryCheck": config.enable_stationary_check,
            "desiredAccuracy": config.desired_accuracy.as_str(),
        })
    }
}

/// A location fix as the host receives it in `onLocationSuccess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub altitude: f64,
    pub speed: f64,
    /// Always 0; Android does not report speed accuracy.
    pub speed_accuracy: f64,
    pub heading: f64,
    pub provider: String,
    pub timestamp: i64,
}

impl From<&Location> for LocationSample {
    fn from(loc: &Location) -> Self {
        Self {
            latitude: loc.latitude,
            longitude: loc.longitude,
            accuracy: f64::from(loc.accuracy),
            altitude: loc.altitude,
            speed: f64::from(loc.speed),
            speed_accuracy: 0.0,
            heading: f64::from(loc.bearing),
            provider: loc.provider.clone().unwrap_or_else(|| "Unknown".into()),
            timestamp: loc.time.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_wire_names() {
        assert_eq!(DesiredAccuracy::Balanced.as_str(), "medium");
        assert_eq!(DesiredAccuracy::from_wire(Some("medium")), DesiredAccuracy::Balanced);
        assert_eq!(DesiredAccuracy::from_wire(Some("extreme")), DesiredAccuracy::High);
        assert_eq!(DesiredAccuracy::from_wire(None), DesiredAccuracy::High);
    }

    #[test]
    fn custom_is_not_a_preset() {
        assert_eq!(TrackingMode::preset_from_str("custom"), None);
        assert_eq!(TrackingMode::preset_from_str("passive"), Some(TrackingMode::Passive));
        assert_eq!(LocationConfig::preset(TrackingMode::Custom), None);
    }

    #[test]
    fn default_is_the_active_preset() {
        assert_eq!(
            LocationConfig::preset(TrackingMode::Active),
            Some(LocationConfig::default())
        );
        let balanced = LocationConfig::preset(TrackingMode::Balanced).expect("preset");
        assert_eq!(balanced.tracking_mode, TrackingMode::Balanced);
        assert_eq!(balanced.desired_accuracy, DesiredAccuracy::Balanced);
    }

    #[test]
    fn sample_fills_missing_provider_and_time() {
        let loc = Location {
            latitude: 1.29,
            longitude: 103.85,
            accuracy: 4.0,
            altitude: 12.0,
            speed: 2.5,
            bearing: 90.0,
            provider: None,
            time: None,
        };
        let sample = LocationSample::from(&loc);
        assert_eq!(sample.provider, "Unknown");
        assert_eq!(sample.timestamp, 0);
        assert_eq!(sample.speed_accuracy, 0.0);
        assert_eq!(sample.heading, 90.0);
    }
}
