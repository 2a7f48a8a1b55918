// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entity shapes of the asset-tracking SDK as they cross the bridge.
//
// Configuration records use the SDK's camelCase field names. Network
// entities (assets, trips, summaries) use the snake_case names of the
// tracking API responses they are deserialized from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Configuration records
// ---------------------------------------------------------------------------

/// Service-level behaviour of the tracking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultConfig {
    /// Keep the foreground service alive more aggressively.
    pub enhance_service: bool,
    /// Interval in minutes of the background keep-alive worker.
    pub repeat_interval: i64,
    pub worker_enabled: bool,
    pub crash_restart_enabled: bool,
    pub work_on_main_thread: bool,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            enhance_service: false,
            repeat_interval: 15,
            worker_enabled: false,
            crash_restart_enabled: false,
            work_on_main_thread: true,
        }
    }
}

/// Local buffering and upload of tracked locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataTrackingConfig {
    pub base_url: String,
    /// Maximum number of locations kept on the device.
    pub data_storage_size: i32,
    pub data_uploading_batch_size: i32,
    /// Seconds between upload batches.
    pub data_uploading_batch_window: i64,
    pub should_clear_local_data_when_collision: bool,
}

impl Default for DataTrackingConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            data_storage_size: 5000,
            data_uploading_batch_size: 30,
            data_uploading_batch_window: 20,
            should_clear_local_data_when_collision: true,
        }
    }
}

/// The notification shown when the battery drops below `threshold` percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LowBatteryNotificationConfig {
    pub threshold: f64,
    pub channel_id: String,
    pub channel_name: String,
    pub title: String,
    pub content: String,
}

impl Default for LowBatteryNotificationConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            channel_id: "NextBillion.AI.Battery".into(),
            channel_name: "NextBillion.AI.Battery".into(),
            title: "Low battery".into(),
            content: "Battery is low, tracking may be interrupted.".into(),
        }
    }
}

/// Whether mock/virtual locations are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeGpsConfig {
    pub allow_use_virtual_location: bool,
}

// ---------------------------------------------------------------------------
// Asset and trip profiles (requests)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    #[serde(default)]
    pub custom_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStop {
    pub name: String,
    #[serde(default)]
    pub geofence_id: String,
    #[serde(default)]
    pub meta_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripProfile {
    #[serde(default)]
    pub custom_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub meta_data: Value,
    #[serde(default)]
    pub stops: Vec<TripStop>,
}

/// Changes applied to the active trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdateProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub meta_data: Value,
    #[serde(default)]
    pub stops: Vec<TripStop>,
}

// ---------------------------------------------------------------------------
// Network entities (responses)
// ---------------------------------------------------------------------------

/// A point of a tracked route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub state: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta_data: Value,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub latest_location: Option<TrackedLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCreationData {
    pub id: String,
}

/// Reply of the create-asset endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCreationResponse {
    pub status: String,
    pub data: AssetCreationData,
}

impl std::fmt::Display for AssetCreationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssetCreationResponse(status={}, data=AssetCreationData(id={}))",
            self.status, self.data.id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub asset_id: String,
    #[serde(default)]
    pub state: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meta_data: Value,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub stops: Vec<TripStop>,
    #[serde(default)]
    pub route: Vec<TrackedLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: String,
    pub asset_id: String,
    #[serde(default)]
    pub state: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meta_data: Value,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub stops: Vec<TripStop>,
    #[serde(default)]
    pub route: Vec<TrackedLocation>,
    /// Encoded polylines of the driven path.
    #[serde(default)]
    pub geometry: Vec<String>,
    /// Metres.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// Callback payloads
// ---------------------------------------------------------------------------

/// A fix delivered by the platform location engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f32,
    pub altitude: f64,
    pub speed: f32,
    pub bearing: f32,
    pub provider: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub time: Option<i64>,
}

/// Why tracking stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingDisableType {
    /// Stopped by the application.
    Normal,
    /// Another device bound the same asset id.
    AssetIdTaken,
    /// Location permission was revoked while tracking.
    PermissionDenied,
}

impl TrackingDisableType {
    /// The SDK enum name sent to the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::AssetIdTaken => "ASSET_ID_TAKEN",
            Self::PermissionDenied => "PERMISSION_DENIED",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Normal, Self::AssetIdTaken, Self::PermissionDenied]
            .into_iter()
            .find(|reason| reason.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Started,
    Updated,
    Ended,
    Deleted,
}

impl TripStatus {
    /// The SDK enum name sent to the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Updated => "UPDATED",
            Self::Ended => "ENDED",
            Self::Deleted => "DELETED",
        }
    }
}
