// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Seams between the bridge, the asset-tracking SDK, and the host toolkit.
//
// The SDK is consumed through `AssetTrackingSdk`; the host's method channel
// is represented by `MethodResult` (one per incoming call) and `EventSink`
// (the outbound event stream).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use nbtrack_core::codec::ResourceTable;
use nbtrack_core::envelope::Envelope;
use nbtrack_core::error::AssetException;
use nbtrack_core::{
    Asset, AssetCreationResponse, AssetProfile, DataTrackingConfig, DefaultConfig, FakeGpsConfig,
    Location, LocationConfig, NotificationConfig, TrackingDisableType, Trip, TripProfile,
    TripStatus, TripSummary, TripUpdateProfile,
};

/// Completion for an asynchronous SDK operation. Called exactly once, on
/// whichever thread the SDK completes on.
pub type Completion<T> = Box<dyn FnOnce(Result<T, AssetException>) + Send>;

/// The native asset-tracking SDK.
///
/// Synchronous getters are in-memory state reads; operations that talk to
/// the tracking API take a [`Completion`].
pub trait AssetTrackingSdk: Send + Sync {
    // -- Setup --

    fn initialize(&self, key: &str);

    /// Identify the cross-platform wrapper in the SDK's request headers.
    fn set_cross_platform_info(&self, name: &str);

    fn set_key_of_request_header(&self, key: &str);

    fn set_user_id(&self, user_id: &str);

    // -- Configuration --

    fn default_config(&self) -> DefaultConfig;
    fn set_default_config(&self, config: DefaultConfig);

    fn notification_config(&self) -> NotificationConfig;
    fn set_notification_config(&self, config: NotificationConfig);

    fn location_config(&self) -> LocationConfig;
    fn set_location_config(&self, config: LocationConfig);

    /// Apply a new location config to a running tracking session.
    fn update_location_config(&self, config: LocationConfig);

    fn data_tracking_config(&self) -> DataTrackingConfig;
    fn set_data_tracking_config(&self, config: DataTrackingConfig);

    fn fake_gps_config(&self) -> FakeGpsConfig;
    fn update_fake_gps_config(&self, config: FakeGpsConfig);

    // -- Assets --

    /// Asset id bound to this device, empty if none.
    fn asset_id(&self) -> String;

    fn asset_info(&self, done: Completion<Asset>);

    fn create_asset(&self, profile: AssetProfile, done: Completion<AssetCreationResponse>);

    fn bind_asset(&self, asset_id: &str, done: Completion<()>);

    /// Bind even if another device currently holds the asset.
    fn force_bind_asset(&self, asset_id: &str, done: Completion<()>);

    fn update_asset(&self, profile: AssetProfile, done: Completion<()>);

    // -- Tracking --

    fn is_running(&self) -> bool;
    fn start_tracking(&self);
    fn stop_tracking(&self);

    // -- Trips --

    fn start_trip(&self, profile: TripProfile, start_tracking: bool, done: Completion<String>);
    fn end_trip(&self, done: Completion<String>);
    fn trip_info(&self, trip_id: &str, done: Completion<Trip>);
    fn update_trip(&self, profile: TripUpdateProfile, done: Completion<String>);
    fn trip_summary(&self, trip_id: &str, done: Completion<TripSummary>);
    fn delete_trip(&self, trip_id: &str, done: Completion<String>);
    fn active_trip_id(&self) -> Option<String>;
    fn is_trip_in_progress(&self) -> bool;

    // -- Callbacks --

    fn add_callback(&self, callbacks: Arc<TrackingCallbacks>) -> CallbackId;
    fn remove_callback(&self, id: CallbackId);
}

/// Registration handle returned by [`AssetTrackingSdk::add_callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);

/// Closures the SDK invokes as tracking progresses.
pub struct TrackingCallbacks {
    pub on_location_success: Box<dyn Fn(&Location) + Send + Sync>,
    /// The failure message, if the SDK had one.
    pub on_location_failure: Box<dyn Fn(Option<&str>) + Send + Sync>,
    pub on_tracking_start: Box<dyn Fn(&str) + Send + Sync>,
    pub on_tracking_stop: Box<dyn Fn(&str, TrackingDisableType) + Send + Sync>,
    pub on_trip_status_changed: Box<dyn Fn(&str, TripStatus) + Send + Sync>,
}

/// An incoming call on the method channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: impl Into<Value>) -> Self {
        Self {
            method: method.into(),
            arguments: arguments.into(),
        }
    }
}

/// Reply channel for one incoming call.
///
/// Each method consumes the box, so a call is answered at most once.
pub trait MethodResult: Send {
    /// Reply with a data envelope (which may itself report failure).
    fn success(self: Box<Self>, envelope: Envelope);

    /// Protocol-level failure, e.g. an argument of the wrong type.
    fn error(self: Box<Self>, code: &str, message: &str);

    /// The method name is not recognised.
    fn not_implemented(self: Box<Self>);
}

/// Outbound events to the host application.
pub trait EventSink: Send + Sync {
    /// Send `payload` (envelope JSON text) under the event name `method`.
    fn invoke_method(&self, method: &str, payload: String);
}

/// Everything the dispatcher needs from the running application.
#[derive(Clone)]
pub struct HostContext {
    pub sdk: Arc<dyn AssetTrackingSdk>,
    pub resources: Arc<dyn ResourceTable>,
}

impl HostContext {
    pub fn new(sdk: Arc<dyn AssetTrackingSdk>, resources: Arc<dyn ResourceTable>) -> Self {
        Self { sdk, resources }
    }
}
