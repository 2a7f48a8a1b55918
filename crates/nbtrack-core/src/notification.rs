// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Foreground-service notification configuration.
//
// Two shapes exist: the SDK holds icons as drawable resource ids, the host
// sends and receives them as drawable names. Platform objects the SDK also
// accepts (pending intent, prebuilt notification, channel, bitmaps, remote
// views) belong to the host and never cross the bridge.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::types::LowBatteryNotificationConfig;

pub const DEFAULT_CHANNEL: &str = "NextBillion.AI";

/// Random id in `1..=i32::MAX` for the foreground service.
pub fn random_service_id() -> i32 {
    let bits = (Uuid::new_v4().as_u128() & 0x7fff_ffff) as i32;
    bits.max(1)
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.into()
}

fn default_true() -> bool {
    true
}

// The host sends `null` for any field it leaves unset; each of these maps
// `null` to the same value an absent field gets.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_random_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or_else(random_service_id))
}

fn null_as_default_channel<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_channel))
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Notification config as exchanged with the host (icons by name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(default = "random_service_id", deserialize_with = "null_as_random_id")]
    pub service_id: i32,
    #[serde(default = "default_channel", deserialize_with = "null_as_default_channel")]
    pub channel_id: String,
    #[serde(default = "default_channel", deserialize_with = "null_as_default_channel")]
    pub channel_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub small_icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub large_icon: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub show_low_battery_notification: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub low_battery_notification: LowBatteryNotificationConfig,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub show_asset_id_taken_notification: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_asset_disable: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_id_taken_content: String,
}

/// Notification config as held by the SDK (icons by resource handle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub service_id: i32,
    pub channel_id: String,
    pub channel_name: String,
    pub title: String,
    pub content: String,
    /// Drawable handle; 0 means none.
    pub small_icon: i32,
    pub large_icon: i32,
    pub show_low_battery_notification: bool,
    pub low_battery_notification: LowBatteryNotificationConfig,
    pub show_asset_id_taken_notification: bool,
    pub content_asset_disable: String,
    pub asset_id_taken_content: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            service_id: random_service_id(),
            channel_id: default_channel(),
            channel_name: default_channel(),
            title: String::new(),
            content: String::new(),
            small_icon: 0,
            large_icon: 0,
            show_low_battery_notification: true,
            low_battery_notification: LowBatteryNotificationConfig::default(),
            show_asset_id_taken_notification: true,
            content_asset_disable: String::new(),
            asset_id_taken_content: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_id_is_positive() {
        for _ in 0..64 {
            assert!(random_service_id() >= 1);
        }
    }

    #[test]
    fn minimal_payload_gets_defaults() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"title": "Tracking"}"#).expect("parse");
        assert_eq!(payload.title, "Tracking");
        assert_eq!(payload.channel_id, DEFAULT_CHANNEL);
        assert_eq!(payload.small_icon, "");
        assert!(payload.show_low_battery_notification);
        assert!(payload.service_id >= 1);
    }

    #[test]
    fn null_strings_decode_as_empty() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"title": null, "largeIcon": null}"#).expect("parse");
        assert_eq!(payload.title, "");
        assert_eq!(payload.large_icon, "");
    }

    #[test]
    fn null_fields_take_their_unset_defaults() {
        let payload: NotificationPayload = serde_json::from_str(
            r#"{"serviceId": null, "title": "t", "channelId": null,
                "showLowBatteryNotification": null, "showAssetIdTakenNotification": null,
                "lowBatteryNotification": null}"#,
        )
        .expect("parse");
        assert!(payload.service_id >= 1);
        assert_eq!(payload.title, "t");
        assert_eq!(payload.channel_id, DEFAULT_CHANNEL);
        assert!(payload.show_low_battery_notification);
        assert!(payload.show_asset_id_taken_notification);
        assert_eq!(
            payload.low_battery_notification,
            LowBatteryNotificationConfig::default()
        );
    }

    #[test]
    fn explicit_service_id_is_kept() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"serviceId": 42, "showLowBatteryNotification": false}"#)
                .expect("parse");
        assert_eq!(payload.service_id, 42);
        assert!(!payload.show_low_battery_notification);
    }
}
