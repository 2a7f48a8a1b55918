// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory SDK and resource table for desktop/CI builds and tests.
//
// `StubSdk` keeps configs, assets and trips in a mutex-guarded state and
// completes every asynchronous operation synchronously on the caller's
// thread. Failures can be queued with `fail_next` to exercise error paths.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use nbtrack_core::codec::ResourceTable;
use nbtrack_core::error::AssetException;
use nbtrack_core::{
    Asset, AssetCreationData, AssetCreationResponse, AssetProfile, DataTrackingConfig,
    DefaultConfig, FakeGpsConfig, Location, LocationConfig, NotificationConfig,
    TrackingDisableType, Trip, TripProfile, TripStatus, TripSummary, TripUpdateProfile,
};

use crate::traits::{AssetTrackingSdk, CallbackId, Completion, TrackingCallbacks};

const NOT_FOUND: i32 = 404;
const STUB_DEVICE_ID: &str = "stub-device";

#[derive(Default)]
struct State {
    api_key: Option<String>,
    cross_platform_info: Option<String>,
    header_key: Option<String>,
    user_id: Option<String>,

    default_config: DefaultConfig,
    notification_config: NotificationConfig,
    location_config: LocationConfig,
    data_tracking_config: DataTrackingConfig,
    fake_gps_config: FakeGpsConfig,

    assets: HashMap<String, Asset>,
    bound_asset: Option<String>,
    running: bool,

    trips: HashMap<String, Trip>,
    active_trip: Option<String>,

    callbacks: Vec<(CallbackId, Arc<TrackingCallbacks>)>,
    next_callback: u64,

    pending_failures: VecDeque<AssetException>,
    calls: usize,
}

impl State {
    fn bound_asset_id(&self) -> String {
        self.bound_asset.clone().unwrap_or_default()
    }

    fn listeners(&self) -> Vec<Arc<TrackingCallbacks>> {
        self.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }
}

fn not_found(what: &str) -> AssetException {
    AssetException::new(NOT_FOUND, format!("{what} not found"))
}

/// In-memory stand-in for the native asset-tracking SDK.
#[derive(Default)]
pub struct StubSdk {
    state: Mutex<State>,
}

impl StubSdk {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state for an SDK operation, counting the call.
    fn record(&self, op: &'static str) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.calls += 1;
        trace!(op, "stub SDK call");
        state
    }

    /// Make the next asynchronous operation fail with `err`.
    pub fn fail_next(&self, err: AssetException) {
        self.state().pending_failures.push_back(err);
    }

    /// Number of SDK operations invoked so far.
    pub fn call_count(&self) -> usize {
        self.state().calls
    }

    pub fn api_key(&self) -> Option<String> {
        self.state().api_key.clone()
    }

    pub fn cross_platform_info(&self) -> Option<String> {
        self.state().cross_platform_info.clone()
    }

    pub fn header_key(&self) -> Option<String> {
        self.state().header_key.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state().user_id.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state().callbacks.len()
    }

    // -- Callback drivers --

    /// Deliver a location fix to every registered listener.
    pub fn emit_location(&self, location: &Location) {
        let listeners = self.state().listeners();
        for cb in listeners {
            (cb.on_location_success)(location);
        }
    }

    pub fn emit_location_failure(&self, message: Option<&str>) {
        let listeners = self.state().listeners();
        for cb in listeners {
            (cb.on_location_failure)(message);
        }
    }

    /// Stop tracking for `reason` (e.g. the asset id was taken elsewhere).
    pub fn emit_tracking_stop(&self, reason: TrackingDisableType) {
        let (asset_id, listeners) = {
            let mut state = self.state();
            state.running = false;
            (state.bound_asset_id(), state.listeners())
        };
        for cb in listeners {
            (cb.on_tracking_stop)(&asset_id, reason);
        }
    }

    fn notify_trip(listeners: Vec<Arc<TrackingCallbacks>>, trip_id: &str, status: TripStatus) {
        for cb in listeners {
            (cb.on_trip_status_changed)(trip_id, status);
        }
    }

    fn notify_tracking_start(listeners: &[Arc<TrackingCallbacks>], asset_id: &str) {
        for cb in listeners {
            (cb.on_tracking_start)(asset_id);
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn seconds_between(start: Option<&str>, end: Option<&str>) -> f64 {
    let parse = |s: &str| DateTime::parse_from_rfc3339(s).ok();
    match (start.and_then(parse), end.and_then(parse)) {
        (Some(s), Some(e)) => (e - s).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    }
}

impl AssetTrackingSdk for StubSdk {
    fn initialize(&self, key: &str) {
        self.record("initialize").api_key = Some(key.to_owned());
    }

    fn set_cross_platform_info(&self, name: &str) {
        self.record("set_cross_platform_info").cross_platform_info = Some(name.to_owned());
    }

    fn set_key_of_request_header(&self, key: &str) {
        self.record("set_key_of_request_header").header_key = Some(key.to_owned());
    }

    fn set_user_id(&self, user_id: &str) {
        self.record("set_user_id").user_id = Some(user_id.to_owned());
    }

    fn default_config(&self) -> DefaultConfig {
        self.record("default_config").default_config.clone()
    }

    fn set_default_config(&self, config: DefaultConfig) {
        self.record("set_default_config").default_config = config;
    }

    fn notification_config(&self) -> NotificationConfig {
        self.record("notification_config").notification_config.clone()
    }

    fn set_notification_config(&self, config: NotificationConfig) {
        self.record("set_notification_config").notification_config = config;
    }

    fn location_config(&self) -> LocationConfig {
        self.record("location_config").location_config.clone()
    }

    fn set_location_config(&self, config: LocationConfig) {
        self.record("set_location_config").location_config = config;
    }

    fn update_location_config(&self, config: LocationConfig) {
        self.record("update_location_config").location_config = config;
    }

    fn data_tracking_config(&self) -> DataTrackingConfig {
        self.record("data_tracking_config").data_tracking_config.clone()
    }

    fn set_data_tracking_config(&self, config: DataTrackingConfig) {
        self.record("set_data_tracking_config").data_tracking_config = config;
    }

    fn fake_gps_config(&self) -> FakeGpsConfig {
        self.record("fake_gps_config").fake_gps_config
    }

    fn update_fake_gps_config(&self, config: FakeGpsConfig) {
        self.record("update_fake_gps_config").fake_gps_config = config;
    }

    fn asset_id(&self) -> String {
        self.record("asset_id").bound_asset_id()
    }

    fn asset_info(&self, done: Completion<Asset>) {
        let outcome = {
            let mut state = self.record("asset_info");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => state
                    .bound_asset
                    .as_ref()
                    .and_then(|id| state.assets.get(id))
                    .cloned()
                    .ok_or_else(|| not_found("bound asset")),
            }
        };
        done(outcome);
    }

    fn create_asset(&self, profile: AssetProfile, done: Completion<AssetCreationResponse>) {
        let outcome = {
            let mut state = self.record("create_asset");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => {
                    let id = Uuid::new_v4().to_string();
                    let created = Utc::now().timestamp();
                    state.assets.insert(
                        id.clone(),
                        Asset {
                            id: id.clone(),
                            device_id: STUB_DEVICE_ID.into(),
                            state: "active".into(),
                            name: profile.name,
                            description: profile.description,
                            tags: Vec::new(),
                            meta_data: Value::Null,
                            created_at: created,
                            updated_at: created,
                            attributes: profile.attributes,
                            latest_location: None,
                        },
                    );
                    Ok(AssetCreationResponse {
                        status: "Ok".into(),
                        data: AssetCreationData { id },
                    })
                }
            }
        };
        done(outcome);
    }

    fn bind_asset(&self, asset_id: &str, done: Completion<()>) {
        let outcome = {
            let mut state = self.record("bind_asset");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None if state.assets.contains_key(asset_id) => {
                    state.bound_asset = Some(asset_id.to_owned());
                    Ok(())
                }
                None => Err(not_found("asset")),
            }
        };
        done(outcome);
    }

    fn force_bind_asset(&self, asset_id: &str, done: Completion<()>) {
        let outcome = {
            let mut state = self.record("force_bind_asset");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None if state.assets.contains_key(asset_id) => {
                    state.bound_asset = Some(asset_id.to_owned());
                    Ok(())
                }
                None => Err(not_found("asset")),
            }
        };
        done(outcome);
    }

    fn update_asset(&self, profile: AssetProfile, done: Completion<()>) {
        let outcome = {
            let mut state = self.record("update_asset");
            if let Some(err) = state.pending_failures.pop_front() {
                Err(err)
            } else {
                let asset = match state.bound_asset.clone() {
                    Some(id) => state.assets.get_mut(&id),
                    None => None,
                };
                match asset {
                    Some(asset) => {
                        asset.name = profile.name;
                        asset.description = profile.description;
                        asset.attributes = profile.attributes;
                        asset.updated_at = Utc::now().timestamp();
                        Ok(())
                    }
                    None => Err(not_found("bound asset")),
                }
            }
        };
        done(outcome);
    }

    fn is_running(&self) -> bool {
        self.record("is_running").running
    }

    fn start_tracking(&self) {
        let (asset_id, listeners) = {
            let mut state = self.record("start_tracking");
            state.running = true;
            (state.bound_asset_id(), state.listeners())
        };
        Self::notify_tracking_start(&listeners, &asset_id);
    }

    fn stop_tracking(&self) {
        let (asset_id, listeners) = {
            let mut state = self.record("stop_tracking");
            state.running = false;
            (state.bound_asset_id(), state.listeners())
        };
        for cb in listeners {
            (cb.on_tracking_stop)(&asset_id, TrackingDisableType::Normal);
        }
    }

    fn start_trip(&self, profile: TripProfile, start_tracking: bool, done: Completion<String>) {
        let mut started_tracking = false;
        let (outcome, asset_id, listeners) = {
            let mut state = self.record("start_trip");
            let outcome = match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None if state.active_trip.is_some() => Err(AssetException::new(
                    409,
                    "a trip is already in progress",
                )),
                None => {
                    let id = Uuid::new_v4().to_string();
                    let started = now();
                    let trip = Trip {
                        id: id.clone(),
                        asset_id: state.bound_asset_id(),
                        state: "active".into(),
                        name: profile.name,
                        description: profile.description,
                        meta_data: profile.meta_data,
                        attributes: profile.attributes,
                        started_at: Some(started.clone()),
                        ended_at: None,
                        created_at: Some(started.clone()),
                        updated_at: Some(started),
                        stops: profile.stops,
                        route: Vec::new(),
                    };
                    state.trips.insert(id.clone(), trip);
                    state.active_trip = Some(id.clone());
                    if start_tracking && !state.running {
                        state.running = true;
                        started_tracking = true;
                    }
                    Ok(id)
                }
            };
            (outcome, state.bound_asset_id(), state.listeners())
        };

        if started_tracking {
            Self::notify_tracking_start(&listeners, &asset_id);
        }
        if let Ok(id) = &outcome {
            Self::notify_trip(listeners, id, TripStatus::Started);
        }
        done(outcome);
    }

    fn end_trip(&self, done: Completion<String>) {
        let (outcome, listeners) = {
            let mut state = self.record("end_trip");
            let outcome = match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => match state.active_trip.take() {
                    Some(id) => {
                        let ended = now();
                        if let Some(trip) = state.trips.get_mut(&id) {
                            trip.state = "ended".into();
                            trip.ended_at = Some(ended.clone());
                            trip.updated_at = Some(ended);
                        }
                        Ok(id)
                    }
                    None => Err(not_found("active trip")),
                },
            };
            (outcome, state.listeners())
        };
        if let Ok(id) = &outcome {
            Self::notify_trip(listeners, id, TripStatus::Ended);
        }
        done(outcome);
    }

    fn trip_info(&self, trip_id: &str, done: Completion<Trip>) {
        let outcome = {
            let mut state = self.record("trip_info");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => state.trips.get(trip_id).cloned().ok_or_else(|| not_found("trip")),
            }
        };
        done(outcome);
    }

    fn update_trip(&self, profile: TripUpdateProfile, done: Completion<String>) {
        let (outcome, listeners) = {
            let mut state = self.record("update_trip");
            let outcome = if let Some(err) = state.pending_failures.pop_front() {
                Err(err)
            } else {
                let trip = match state.active_trip.clone() {
                    Some(id) => state.trips.get_mut(&id),
                    None => None,
                };
                match trip {
                    Some(trip) => {
                        trip.name = profile.name;
                        trip.description = profile.description;
                        trip.attributes = profile.attributes;
                        trip.meta_data = profile.meta_data;
                        trip.stops = profile.stops;
                        trip.updated_at = Some(now());
                        Ok(trip.id.clone())
                    }
                    None => Err(not_found("active trip")),
                }
            };
            (outcome, state.listeners())
        };
        if let Ok(id) = &outcome {
            Self::notify_trip(listeners, id, TripStatus::Updated);
        }
        done(outcome);
    }

    fn trip_summary(&self, trip_id: &str, done: Completion<TripSummary>) {
        let outcome = {
            let mut state = self.record("trip_summary");
            match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => state
                    .trips
                    .get(trip_id)
                    .map(|trip| TripSummary {
                        id: trip.id.clone(),
                        asset_id: trip.asset_id.clone(),
                        state: trip.state.clone(),
                        name: trip.name.clone(),
                        description: trip.description.clone(),
                        meta_data: trip.meta_data.clone(),
                        attributes: trip.attributes.clone(),
                        started_at: trip.started_at.clone(),
                        ended_at: trip.ended_at.clone(),
                        stops: trip.stops.clone(),
                        route: trip.route.clone(),
                        geometry: Vec::new(),
                        distance: 0.0,
                        duration: seconds_between(
                            trip.started_at.as_deref(),
                            trip.ended_at.as_deref(),
                        ),
                    })
                    .ok_or_else(|| not_found("trip")),
            }
        };
        done(outcome);
    }

    fn delete_trip(&self, trip_id: &str, done: Completion<String>) {
        let (outcome, listeners) = {
            let mut state = self.record("delete_trip");
            let outcome = match state.pending_failures.pop_front() {
                Some(err) => Err(err),
                None => match state.trips.remove(trip_id) {
                    Some(trip) => {
                        if state.active_trip.as_deref() == Some(trip_id) {
                            state.active_trip = None;
                        }
                        Ok(trip.id)
                    }
                    None => Err(not_found("trip")),
                },
            };
            (outcome, state.listeners())
        };
        if let Ok(id) = &outcome {
            Self::notify_trip(listeners, id, TripStatus::Deleted);
        }
        done(outcome);
    }

    fn active_trip_id(&self) -> Option<String> {
        self.record("active_trip_id").active_trip.clone()
    }

    fn is_trip_in_progress(&self) -> bool {
        self.record("is_trip_in_progress").active_trip.is_some()
    }

    fn add_callback(&self, callbacks: Arc<TrackingCallbacks>) -> CallbackId {
        let mut state = self.record("add_callback");
        state.next_callback += 1;
        let id = CallbackId(state.next_callback);
        state.callbacks.push((id, callbacks));
        id
    }

    fn remove_callback(&self, id: CallbackId) {
        self.record("remove_callback")
            .callbacks
            .retain(|(registered, _)| *registered != id);
    }
}

/// Drawable table backed by a map, for hosts without native resources.
#[derive(Debug, Clone, Default)]
pub struct StubResources {
    drawables: BTreeMap<String, i32>,
}

impl StubResources {
    pub fn with_drawables<'a>(entries: impl IntoIterator<Item = (&'a str, i32)>) -> Self {
        Self {
            drawables: entries
                .into_iter()
                .map(|(name, id)| (name.to_owned(), id))
                .collect(),
        }
    }
}

impl ResourceTable for StubResources {
    fn drawable_id(&self, name: &str) -> i32 {
        self.drawables.get(name).copied().unwrap_or(0)
    }

    fn drawable_name(&self, handle: i32) -> Option<String> {
        self.drawables
            .iter()
            .find(|(_, id)| **id == handle)
            .map(|(name, _)| name.clone())
    }
}
