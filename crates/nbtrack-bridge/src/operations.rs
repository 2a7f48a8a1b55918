// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The operation table: one handler per method-channel method.
//
// Failure envelopes carry per-operation `data`: some echo the request (trip
// id, profile name), others carry the SDK error code. Hosts depend on the
// exact shape of each, so they are kept as-is rather than unified.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use nbtrack_core::codec;
use nbtrack_core::envelope::Envelope;
use nbtrack_core::error::{AssetException, Result};
use nbtrack_core::{
    AssetProfile, DataTrackingConfig, DefaultConfig, FakeGpsConfig, LocationConfig,
    NotificationPayload, TripProfile, TripUpdateProfile,
};

use crate::dispatcher::{Action, Handler, Request, respond};

pub(crate) const OPERATIONS: &[(&str, Handler)] = &[
    // -- Setup --
    ("initialize", initialize),
    ("setKeyOfHeaderField", set_key_of_header_field),
    ("setupUserId", setup_user_id),
    // -- Configuration --
    ("getDefaultConfig", get_default_config),
    ("setDefaultConfig", set_default_config),
    ("setAndroidNotificationConfig", set_notification_config),
    ("getAndroidNotificationConfig", get_notification_config),
    ("updateLocationConfig", update_location_config),
    ("setLocationConfig", set_location_config),
    ("getLocationConfig", get_location_config),
    ("setDataTrackingConfig", set_data_tracking_config),
    ("getDataTrackingConfig", get_data_tracking_config),
    ("setFakeGpsConfig", set_fake_gps_config),
    ("getFakeGpsConfig", get_fake_gps_config),
    // -- Assets --
    ("getAssetId", get_asset_id),
    ("getAssetDetail", get_asset_detail),
    ("createAsset", create_asset),
    ("bindAsset", bind_asset),
    ("forceBindAsset", force_bind_asset),
    ("updateAsset", update_asset),
    // -- Tracking --
    ("isTracking", is_tracking),
    ("startTracking", start_tracking),
    ("stopTracking", stop_tracking),
    // -- Trips --
    ("startTrip", start_trip),
    ("endTrip", end_trip),
    ("getTrip", get_trip),
    ("updateTrip", update_trip),
    ("getSummary", get_summary),
    ("deleteTrip", delete_trip),
    ("getActiveTripId", get_active_trip_id),
    ("isTripInProgress", is_trip_in_progress),
];

/// Failure envelope for an SDK-reported error.
fn sdk_failure(method: &str, data: impl Into<Value>, err: &AssetException) -> Envelope {
    warn!(method, code = err.error_code, error = %err, "SDK operation failed");
    Envelope::failure(data, err.message_or_empty())
}

/// Structured payload, or a failure envelope echoing `fallback` if the
/// value cannot be represented as JSON.
fn structured<T: Serialize>(value: &T, fallback: impl Into<Value>) -> Envelope {
    match serde_json::to_value(value) {
        Ok(data) => Envelope::ok(data),
        Err(e) => Envelope::failure(fallback, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn initialize(req: &Request) -> Result<Action> {
    let key = req.string_arg()?;
    let sdk = req.sdk();
    let platform = req.config.cross_platform_name();
    Ok(Box::new(move |result| {
        sdk.initialize(&key);
        sdk.set_cross_platform_info(&platform);
        info!(%platform, "SDK initialised");
        result.success(Envelope::ok(""));
    }))
}

fn set_key_of_header_field(req: &Request) -> Result<Action> {
    let key = req.string_arg()?;
    req.sdk().set_key_of_request_header(&key);
    Ok(respond(Envelope::ok("")))
}

fn setup_user_id(req: &Request) -> Result<Action> {
    let user_id = req.string_arg()?;
    req.sdk().set_user_id(&user_id);
    Ok(respond(Envelope::ok("")))
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn get_default_config(req: &Request) -> Result<Action> {
    let config = req.sdk().default_config();
    Ok(respond(structured(&config, "")))
}

/// Replies with the config as decoded, so the host sees applied defaults.
fn set_default_config(req: &Request) -> Result<Action> {
    let config: DefaultConfig = req.decode_arg()?;
    let reply = structured(&config, "");
    req.sdk().set_default_config(config);
    Ok(respond(reply))
}

fn set_notification_config(req: &Request) -> Result<Action> {
    let payload: NotificationPayload = req.decode_arg()?;
    let config = codec::notification_from_payload(payload, req.resources());
    req.sdk().set_notification_config(config);
    Ok(respond(Envelope::ok("")))
}

fn get_notification_config(req: &Request) -> Result<Action> {
    let config = req.sdk().notification_config();
    let payload = codec::notification_to_payload(config, req.resources());
    Ok(respond(structured(&payload, "")))
}

fn update_location_config(req: &Request) -> Result<Action> {
    let config: LocationConfig = req.decode_arg()?;
    req.sdk().update_location_config(config);
    Ok(respond(Envelope::ok("")))
}

fn set_location_config(req: &Request) -> Result<Action> {
    let config: LocationConfig = req.decode_arg()?;
    req.sdk().set_location_config(config);
    Ok(respond(Envelope::ok("")))
}

fn get_location_config(req: &Request) -> Result<Action> {
    let json = codec::encode_location_config(&req.sdk().location_config())?;
    Ok(respond(Envelope::ok(json)))
}

fn set_data_tracking_config(req: &Request) -> Result<Action> {
    let config: DataTrackingConfig = req.decode_arg()?;
    req.sdk().set_data_tracking_config(config);
    Ok(respond(Envelope::ok("")))
}

fn get_data_tracking_config(req: &Request) -> Result<Action> {
    let json = codec::encode(&req.sdk().data_tracking_config())?;
    Ok(respond(Envelope::ok(json)))
}

fn set_fake_gps_config(req: &Request) -> Result<Action> {
    let allow = req.bool_arg()?;
    req.sdk().update_fake_gps_config(FakeGpsConfig {
        allow_use_virtual_location: allow,
    });
    Ok(respond(Envelope::ok("")))
}

fn get_fake_gps_config(req: &Request) -> Result<Action> {
    let config = req.sdk().fake_gps_config();
    Ok(respond(Envelope::ok(config.allow_use_virtual_location)))
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

fn get_asset_id(req: &Request) -> Result<Action> {
    Ok(respond(Envelope::ok(req.sdk().asset_id())))
}

/// Success carries the asset as JSON text; failure carries the numeric
/// error code.
fn get_asset_detail(req: &Request) -> Result<Action> {
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        sdk.asset_info(Box::new(move |outcome| {
            let envelope = match outcome {
                Ok(asset) => match codec::encode(&asset) {
                    Ok(json) => Envelope::ok(json),
                    Err(e) => Envelope::failure("", e.to_string()),
                },
                Err(err) => sdk_failure("getAssetDetail", err.error_code, &err),
            };
            result.success(envelope);
        }));
    }))
}

fn create_asset(req: &Request) -> Result<Action> {
    let profile: AssetProfile = req.decode_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        sdk.create_asset(
            profile,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(resp) => {
                        let rendered = resp.to_string();
                        Envelope::ok_with_msg(resp.data.id, Some(rendered))
                    }
                    Err(err) => sdk_failure("createAsset", err.error_code.to_string(), &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn bind_asset(req: &Request) -> Result<Action> {
    let asset_id = req.string_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let echo = asset_id.clone();
        sdk.bind_asset(
            &asset_id,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(()) => Envelope::ok(echo),
                    Err(err) => sdk_failure("bindAsset", err.error_code.to_string(), &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn force_bind_asset(req: &Request) -> Result<Action> {
    let asset_id = req.string_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        sdk.force_bind_asset(
            &asset_id,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(()) => Envelope::ok(""),
                    Err(err) => sdk_failure("forceBindAsset", err.error_code.to_string(), &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn update_asset(req: &Request) -> Result<Action> {
    let profile: AssetProfile = req.decode_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let name = profile.name.clone();
        sdk.update_asset(
            profile,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(()) => Envelope::ok(""),
                    Err(err) => sdk_failure("updateAsset", name, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

fn is_tracking(req: &Request) -> Result<Action> {
    Ok(respond(Envelope::ok(req.sdk().is_running())))
}

fn start_tracking(req: &Request) -> Result<Action> {
    req.sdk().start_tracking();
    Ok(respond(Envelope::ok("")))
}

fn stop_tracking(req: &Request) -> Result<Action> {
    req.sdk().stop_tracking();
    Ok(respond(Envelope::ok("")))
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

/// Starting a trip also starts tracking if it is not already running.
fn start_trip(req: &Request) -> Result<Action> {
    let profile: TripProfile = req.decode_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let name = profile.name.clone();
        sdk.start_trip(
            profile,
            true,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(trip_id) => Envelope::ok_with_msg(trip_id.clone(), Some(trip_id)),
                    Err(err) => sdk_failure("startTrip", name, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn end_trip(req: &Request) -> Result<Action> {
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        sdk.end_trip(Box::new(move |outcome| {
            let envelope = match outcome {
                Ok(trip_id) => Envelope::ok_with_msg(trip_id, None),
                Err(err) => sdk_failure("endTrip", "", &err),
            };
            result.success(envelope);
        }));
    }))
}

fn get_trip(req: &Request) -> Result<Action> {
    let trip_id = req.string_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let echo = trip_id.clone();
        sdk.trip_info(
            &trip_id,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(trip) => structured(&trip, echo),
                    Err(err) => sdk_failure("getTrip", echo, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn update_trip(req: &Request) -> Result<Action> {
    let profile: TripUpdateProfile = req.decode_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let name = profile.name.clone();
        sdk.update_trip(
            profile,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(reply) => Envelope::ok(reply),
                    Err(err) => sdk_failure("updateTrip", name, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn get_summary(req: &Request) -> Result<Action> {
    let trip_id = req.string_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let echo = trip_id.clone();
        sdk.trip_summary(
            &trip_id,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(summary) => structured(&summary, echo),
                    Err(err) => sdk_failure("getSummary", echo, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn delete_trip(req: &Request) -> Result<Action> {
    let trip_id = req.string_arg()?;
    let sdk = req.sdk();
    Ok(Box::new(move |result| {
        let echo = trip_id.clone();
        sdk.delete_trip(
            &trip_id,
            Box::new(move |outcome| {
                let envelope = match outcome {
                    Ok(reply) => Envelope::ok(reply),
                    Err(err) => sdk_failure("deleteTrip", echo, &err),
                };
                result.success(envelope);
            }),
        );
    }))
}

fn get_active_trip_id(req: &Request) -> Result<Action> {
    let envelope = match req.sdk().active_trip_id() {
        Some(trip_id) => Envelope::ok(trip_id),
        None => Envelope::failure("", "No active trip"),
    };
    Ok(respond(envelope))
}

fn is_trip_in_progress(req: &Request) -> Result<Action> {
    Ok(respond(Envelope::ok(req.sdk().is_trip_in_progress())))
}
