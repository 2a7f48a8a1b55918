// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event forwarder: re-emits SDK tracking callbacks as named channel events.
//
// Every event is wrapped as `success: true`, including location failures and
// tracking stops; hosts branch on the event name, not on `success`.

use std::sync::Arc;

use tracing::{debug, error};

use nbtrack_core::codec;
use nbtrack_core::envelope::Envelope;
use nbtrack_core::{Location, TrackingDisableType, TripStatus};

use crate::traits::{EventSink, TrackingCallbacks};

pub const ON_LOCATION_SUCCESS: &str = "onLocationSuccess";
pub const ON_LOCATION_FAILURE: &str = "onLocationFailure";
pub const ON_TRACKING_START: &str = "onTrackingStart";
pub const ON_TRACKING_STOP: &str = "onTrackingStop";
pub const ON_TRIP_STATUS_CHANGED: &str = "onTripStatusChanged";

/// Translates SDK callbacks into events on an [`EventSink`].
///
/// One callback produces exactly one event, sent synchronously on the
/// SDK's callback thread. Nothing is buffered.
#[derive(Clone)]
pub struct EventForwarder {
    sink: Arc<dyn EventSink>,
}

impl EventForwarder {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    fn emit(&self, event: &str, envelope: Envelope) {
        match envelope.to_json() {
            Ok(payload) => {
                debug!(event, "forwarding SDK callback");
                self.sink.invoke_method(event, payload);
            }
            Err(e) => error!(event, error = %e, "could not encode event"),
        }
    }

    pub fn on_location_success(&self, location: &Location) {
        match codec::encode_location_sample(location) {
            Ok(sample) => self.emit(ON_LOCATION_SUCCESS, Envelope::ok(sample)),
            Err(e) => error!(error = %e, "could not encode location sample"),
        }
    }

    /// The message is both `data` and `msg`; both are `null` without one.
    pub fn on_location_failure(&self, message: Option<&str>) {
        self.emit(
            ON_LOCATION_FAILURE,
            Envelope::ok_with_msg(message, message.map(str::to_owned)),
        );
    }

    pub fn on_tracking_start(&self, asset_id: &str) {
        self.emit(ON_TRACKING_START, Envelope::ok(asset_id));
    }

    pub fn on_tracking_stop(&self, asset_id: &str, reason: TrackingDisableType) {
        self.emit(
            ON_TRACKING_STOP,
            Envelope::ok_with_msg(asset_id, Some(reason.as_str().to_owned())),
        );
    }

    pub fn on_trip_status_changed(&self, trip_id: &str, status: TripStatus) {
        self.emit(
            ON_TRIP_STATUS_CHANGED,
            Envelope::ok_with_msg(codec::trip_status_rendering(trip_id, status), None),
        );
    }

    /// Closures to register with the SDK.
    pub fn callbacks(&self) -> TrackingCallbacks {
        TrackingCallbacks {
            on_location_success: Box::new({
                let fwd = self.clone();
                move |loc: &Location| fwd.on_location_success(loc)
            }),
            on_location_failure: Box::new({
                let fwd = self.clone();
                move |msg: Option<&str>| fwd.on_location_failure(msg)
            }),
            on_tracking_start: Box::new({
                let fwd = self.clone();
                move |id: &str| fwd.on_tracking_start(id)
            }),
            on_tracking_stop: Box::new({
                let fwd = self.clone();
                move |id: &str, reason| fwd.on_tracking_stop(id, reason)
            }),
            on_trip_status_changed: Box::new({
                let fwd = self.clone();
                move |id: &str, status| fwd.on_trip_status_changed(id, status)
            }),
        }
    }
}
