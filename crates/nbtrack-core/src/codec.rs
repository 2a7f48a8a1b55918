// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON codec between the host's wire format and the SDK's typed records.
//
// Everything here is pure except icon resolution, which reads the running
// application's resource table through `ResourceTable`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::location::{LocationConfig, LocationSample};
use crate::notification::{NotificationConfig, NotificationPayload};
use crate::types::{Location, TripStatus};

/// Read-only view of the host application's drawable resources.
pub trait ResourceTable: Send + Sync {
    /// Resource id of the drawable called `name`, or 0 if there is none.
    fn drawable_id(&self, name: &str) -> i32;

    /// Entry name of the drawable with id `handle`, if it exists.
    fn drawable_name(&self, handle: i32) -> Option<String>;
}

/// Parse JSON text into a typed record.
///
/// Missing required fields and wrong primitive kinds are reported as
/// `MalformedConfig`, naming the offending field where serde can.
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| BridgeError::MalformedConfig(e.to_string()))
}

/// Serialize a typed record to JSON text.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Preset modes discard the custom fields; see [`LocationConfig`].
pub fn decode_location_config(json: &str) -> Result<LocationConfig> {
    decode(json)
}

pub fn encode_location_config(config: &LocationConfig) -> Result<String> {
    encode(config)
}

// -- Icons --------------------------------------------------------------------

/// Empty names resolve to the null handle without touching the table.
pub fn name_to_handle(resources: &dyn ResourceTable, name: &str) -> i32 {
    if name.is_empty() {
        return 0;
    }
    let handle = resources.drawable_id(name);
    if handle == 0 {
        debug!(name, "drawable not found");
    }
    handle
}

/// The null handle maps to an empty name without touching the table.
pub fn handle_to_name(resources: &dyn ResourceTable, handle: i32) -> String {
    if handle == 0 {
        return String::new();
    }
    resources.drawable_name(handle).unwrap_or_default()
}

// -- Notification -------------------------------------------------------------

pub fn notification_from_payload(
    payload: NotificationPayload,
    resources: &dyn ResourceTable,
) -> NotificationConfig {
    NotificationConfig {
        service_id: payload.service_id,
        channel_id: payload.channel_id,
        channel_name: payload.channel_name,
        title: payload.title,
        content: payload.content,
        small_icon: name_to_handle(resources, &payload.small_icon),
        large_icon: name_to_handle(resources, &payload.large_icon),
        show_low_battery_notification: payload.show_low_battery_notification,
        low_battery_notification: payload.low_battery_notification,
        show_asset_id_taken_notification: payload.show_asset_id_taken_notification,
        content_asset_disable: payload.content_asset_disable,
        asset_id_taken_content: payload.asset_id_taken_content,
    }
}

pub fn notification_to_payload(
    config: NotificationConfig,
    resources: &dyn ResourceTable,
) -> NotificationPayload {
    NotificationPayload {
        service_id: config.service_id,
        channel_id: config.channel_id,
        channel_name: config.channel_name,
        title: config.title,
        content: config.content,
        small_icon: handle_to_name(resources, config.small_icon),
        large_icon: handle_to_name(resources, config.large_icon),
        show_low_battery_notification: config.show_low_battery_notification,
        low_battery_notification: config.low_battery_notification,
        show_asset_id_taken_notification: config.show_asset_id_taken_notification,
        content_asset_disable: config.content_asset_disable,
        asset_id_taken_content: config.asset_id_taken_content,
    }
}

/// Decode host JSON straight into the SDK shape.
pub fn decode_notification_config(
    json: &str,
    resources: &dyn ResourceTable,
) -> Result<NotificationConfig> {
    let payload: NotificationPayload = decode(json)?;
    Ok(notification_from_payload(payload, resources))
}

// -- Callback payloads --------------------------------------------------------

pub fn encode_location_sample(location: &Location) -> Result<String> {
    encode(&LocationSample::from(location))
}

/// Map-style rendering sent with `onTripStatusChanged`, e.g.
/// `{tripId=t-1, status=STARTED}`. Hosts parse this text, not JSON.
pub fn trip_status_rendering(trip_id: &str, status: TripStatus) -> String {
    format!("{{tripId={trip_id}, status={}}}", status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{DesiredAccuracy, TrackingMode};
    use crate::types::{
        AssetProfile, DataTrackingConfig, DefaultConfig, LowBatteryNotificationConfig, TripProfile,
        TripUpdateProfile,
    };
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Two drawables, counting every lookup.
    #[derive(Default)]
    struct Drawables {
        lookups: AtomicUsize,
    }

    impl ResourceTable for Drawables {
        fn drawable_id(&self, name: &str) -> i32 {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match name {
                "ic_tracking" => 0x7f08_0001,
                "ic_logo" => 0x7f08_0002,
                _ => 0,
            }
        }

        fn drawable_name(&self, handle: i32) -> Option<String> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match handle {
                0x7f08_0001 => Some("ic_tracking".into()),
                0x7f08_0002 => Some("ic_logo".into()),
                _ => None,
            }
        }
    }

    fn assert_round_trip<T: DeserializeOwned + Serialize>(input: Value) {
        let decoded: T = decode(&input.to_string()).expect("decode");
        let encoded = encode(&decoded).expect("encode");
        let back: Value = serde_json::from_str(&encoded).expect("reparse");
        assert_eq!(back, input);
    }

    #[test]
    fn flat_records_round_trip() {
        assert_round_trip::<DefaultConfig>(json!({
            "enhanceService": true,
            "repeatInterval": 30,
            "workerEnabled": true,
            "crashRestartEnabled": false,
            "workOnMainThread": false,
        }));
        assert_round_trip::<DataTrackingConfig>(json!({
            "baseUrl": "https://api.nextbillion.io",
            "dataStorageSize": 1000,
            "dataUploadingBatchSize": 50,
            "dataUploadingBatchWindow": 30,
            "shouldClearLocalDataWhenCollision": false,
        }));
        assert_round_trip::<AssetProfile>(json!({
            "customId": "truck-7",
            "name": "Truck 7",
            "description": "refrigerated",
            "attributes": {"depot": "north"},
        }));
        assert_round_trip::<TripProfile>(json!({
            "customId": "",
            "name": "Morning run",
            "description": "",
            "attributes": {},
            "metaData": {"driver": "kim"},
            "stops": [{"name": "Depot", "geofenceId": "g-1", "metaData": null}],
        }));
        assert_round_trip::<TripUpdateProfile>(json!({
            "name": "Morning run (late)",
            "description": "delayed",
            "attributes": {},
            "metaData": null,
            "stops": [],
        }));
    }

    /// Numbers compare by value: float fields re-encode `15` as `15.0`.
    fn numbers_as_f64(value: Value) -> Value {
        match value {
            Value::Number(n) => n.as_f64().map_or(Value::Number(n), |f| json!(f)),
            Value::Array(items) => Value::Array(items.into_iter().map(numbers_as_f64).collect()),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, numbers_as_f64(v)))
                    .collect(),
            ),
            other => other,
        }
    }

    #[test]
    fn notification_records_round_trip() {
        let battery = json!({
            "threshold": 12.5,
            "channelId": "battery",
            "channelName": "Battery",
            "title": "Low battery",
            "content": "Plug in soon",
        });
        assert_round_trip::<LowBatteryNotificationConfig>(battery.clone());
        assert_round_trip::<NotificationPayload>(json!({
            "serviceId": 7,
            "channelId": "tracking",
            "channelName": "Tracking",
            "title": "Tracking active",
            "content": "Your trip is being recorded",
            "smallIcon": "",
            "largeIcon": "",
            "showLowBatteryNotification": false,
            "lowBatteryNotification": battery,
            "showAssetIdTakenNotification": true,
            "contentAssetDisable": "Tracking stopped",
            "assetIdTakenContent": "Asset bound elsewhere",
        }));
    }

    #[test]
    fn integral_threshold_keeps_its_value() {
        let input = json!({
            "threshold": 15,
            "channelId": "battery",
            "channelName": "Battery",
            "title": "",
            "content": "",
        });
        let decoded: LowBatteryNotificationConfig = decode(&input.to_string()).expect("decode");
        assert_eq!(decoded.threshold, 15.0);

        let back: Value =
            serde_json::from_str(&encode(&decoded).expect("encode")).expect("reparse");
        assert_eq!(back["threshold"], json!(15.0));
        assert_eq!(numbers_as_f64(back), numbers_as_f64(input));
    }

    #[test]
    fn custom_location_round_trips() {
        assert_round_trip::<LocationConfig>(json!({
            "trackingMode": "custom",
            "interval": 8000,
            "smallestDisplacement": 12.5,
            "desiredAccuracy": "medium",
            "maxWaitTime": 16000,
            "fastestInterval": 2000,
            "enableStationaryCheck": true,
        }));
    }

    #[test]
    fn active_preset_ignores_custom_fields() {
        let config = decode_location_config(
            r#"{"trackingMode": "active", "interval": 999, "smallestDisplacement": 1.0,
                "desiredAccuracy": "low", "maxWaitTime": 1, "fastestInterval": 1,
                "enableStationaryCheck": true}"#,
        )
        .expect("decode");
        assert_eq!(Some(config), LocationConfig::preset(TrackingMode::Active));
    }

    #[test]
    fn preset_needs_no_other_fields() {
        let config = decode_location_config(r#"{"trackingMode": "passive"}"#).expect("decode");
        assert_eq!(config.tracking_mode, TrackingMode::Passive);
        let json: Value =
            serde_json::from_str(&encode_location_config(&config).expect("encode")).expect("parse");
        assert_eq!(json["trackingMode"], "passive");
        assert_eq!(json["desiredAccuracy"], "low");
    }

    #[test]
    fn custom_location_requires_integers() {
        let err = decode_location_config(
            r#"{"interval": 1000.5, "smallestDisplacement": 1, "maxWaitTime": 1,
                "fastestInterval": 1, "enableStationaryCheck": false}"#,
        )
        .expect_err("fractional interval");
        assert!(matches!(err, BridgeError::MalformedConfig(_)));

        let err = decode_location_config(r#"{"trackingMode": "custom"}"#).expect_err("missing");
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn custom_location_defaults_accuracy() {
        let config = decode_location_config(
            r#"{"interval": 1000, "smallestDisplacement": 3, "maxWaitTime": 2000,
                "fastestInterval": 500, "enableStationaryCheck": false}"#,
        )
        .expect("decode");
        assert_eq!(config.tracking_mode, TrackingMode::Custom);
        assert_eq!(config.desired_accuracy, DesiredAccuracy::High);
        assert_eq!(config.smallest_displacement, 3.0);
    }

    #[test]
    fn missing_profile_name_is_malformed() {
        let err = decode::<AssetProfile>(r#"{"customId": "x"}"#).expect_err("no name");
        assert!(matches!(err, BridgeError::MalformedConfig(ref m) if m.contains("name")));
    }

    #[test]
    fn empty_icon_boundaries_skip_lookup() {
        let table = Drawables::default();
        assert_eq!(name_to_handle(&table, ""), 0);
        assert_eq!(handle_to_name(&table, 0), "");
        assert_eq!(table.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_icons_are_lossy() {
        let table = Drawables::default();
        assert_eq!(name_to_handle(&table, "ic_missing"), 0);
        assert_eq!(handle_to_name(&table, 0x7f08_0099), "");
    }

    #[test]
    fn notification_resolves_icons_both_ways() {
        let table = Drawables::default();
        let config = decode_notification_config(
            r#"{"serviceId": 42, "title": "Tracking", "smallIcon": "ic_tracking",
                "largeIcon": "ic_unknown"}"#,
            &table,
        )
        .expect("decode");
        assert_eq!(config.service_id, 42);
        assert_eq!(config.small_icon, 0x7f08_0001);
        assert_eq!(config.large_icon, 0);

        let payload = notification_to_payload(config, &table);
        assert_eq!(payload.small_icon, "ic_tracking");
        assert_eq!(payload.large_icon, "");
        assert_eq!(payload.title, "Tracking");
    }

    #[test]
    fn location_sample_encoding() {
        let loc = Location {
            latitude: 1.5,
            longitude: 103.75,
            accuracy: 3.5,
            altitude: 10.0,
            speed: 1.25,
            bearing: 180.0,
            provider: Some("fused".into()),
            time: Some(1_700_000_000_000),
        };
        let json: Value =
            serde_json::from_str(&encode_location_sample(&loc).expect("encode")).expect("parse");
        assert_eq!(
            json,
            json!({
                "latitude": 1.5,
                "longitude": 103.75,
                "accuracy": 3.5,
                "altitude": 10.0,
                "speed": 1.25,
                "speedAccuracy": 0.0,
                "heading": 180.0,
                "provider": "fused",
                "timestamp": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn trip_status_is_map_rendering() {
        assert_eq!(
            trip_status_rendering("t-1", TripStatus::Started),
            "{tripId=t-1, status=STARTED}"
        );
    }
}
