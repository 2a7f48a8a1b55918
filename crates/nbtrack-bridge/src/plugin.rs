// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plugin lifecycle: binds the dispatcher and event forwarder to a host context.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, instrument};

use nbtrack_core::config::BridgeConfig;

use crate::dispatcher::Dispatcher;
use crate::events::EventForwarder;
use crate::traits::{CallbackId, EventSink, HostContext, MethodCall, MethodResult};

struct Attachment {
    context: HostContext,
    callbacks: CallbackId,
}

/// Entry point the host toolkit talks to.
///
/// Calls that arrive before [`attach`](Self::attach) or after
/// [`detach`](Self::detach) are answered with a "context not attached"
/// failure envelope.
pub struct AssetTrackingPlugin {
    dispatcher: Dispatcher,
    forwarder: EventForwarder,
    attachment: RwLock<Option<Attachment>>,
}

impl AssetTrackingPlugin {
    pub fn new(config: BridgeConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            forwarder: EventForwarder::new(sink),
            attachment: RwLock::new(None),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_attached(&self) -> bool {
        self.attachment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Attach to a running application and start forwarding SDK callbacks.
    pub fn attach(&self, context: HostContext) {
        let callbacks = context.sdk.add_callback(Arc::new(self.forwarder.callbacks()));
        let previous = self
            .attachment
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Attachment { context, callbacks });

        if let Some(old) = previous {
            old.context.sdk.remove_callback(old.callbacks);
            info!("replaced existing host context");
        } else {
            info!(channel = %self.dispatcher.config().channel_name, "attached to host");
        }
    }

    /// Stop forwarding callbacks and drop the context.
    pub fn detach(&self) {
        let previous = self
            .attachment
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(old) = previous {
            old.context.sdk.remove_callback(old.callbacks);
            info!("detached from host");
        }
    }

    /// Dispatch one call against the current context.
    #[instrument(skip_all)]
    pub fn handle(&self, call: MethodCall, result: Box<dyn MethodResult>) {
        let context = self
            .attachment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|a| a.context.clone());
        self.dispatcher.dispatch(context.as_ref(), call, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        ON_LOCATION_SUCCESS, ON_TRACKING_START, ON_TRACKING_STOP, ON_TRIP_STATUS_CHANGED,
    };
    use crate::stub::{StubResources, StubSdk};
    use crate::testing::{RecordingResult, RecordingSink, Reply};
    use crate::traits::AssetTrackingSdk;
    use nbtrack_core::envelope::Envelope;
    use nbtrack_core::{Location, TrackingDisableType};
    use serde_json::{Value, json};

    fn plugin() -> (AssetTrackingPlugin, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (AssetTrackingPlugin::new(BridgeConfig::default(), sink.clone()), sink)
    }

    fn context(sdk: &Arc<StubSdk>) -> HostContext {
        HostContext::new(sdk.clone(), Arc::new(StubResources::default()))
    }

    #[test]
    fn calls_before_attach_are_rejected() {
        let (plugin, _sink) = plugin();
        let (result, replies) = RecordingResult::new();
        plugin.handle(MethodCall::new("isTracking", ()), result);
        assert_eq!(
            replies.take(),
            vec![Reply::Success(Envelope::failure("", "context not attached"))]
        );
    }

    #[test]
    fn attached_plugin_forwards_events() {
        let (plugin, sink) = plugin();
        let sdk = Arc::new(StubSdk::new());
        plugin.attach(context(&sdk));
        assert!(plugin.is_attached());

        let (result, replies) = RecordingResult::new();
        plugin.handle(MethodCall::new("startTrip", r#"{"name": "Route 1"}"#), result);
        assert!(matches!(&replies.take()[..], [Reply::Success(env)] if env.success));

        let names: Vec<String> = sink.take().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![ON_TRACKING_START, ON_TRIP_STATUS_CHANGED]);
    }

    #[test]
    fn reattach_keeps_a_single_registration() {
        let (plugin, sink) = plugin();
        let sdk = Arc::new(StubSdk::new());
        plugin.attach(context(&sdk));
        plugin.attach(context(&sdk));
        assert_eq!(sdk.listener_count(), 1);

        sdk.emit_location_failure(Some("no fix"));
        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn detach_stops_events_and_calls() {
        let (plugin, sink) = plugin();
        let sdk = Arc::new(StubSdk::new());
        plugin.attach(context(&sdk));
        plugin.detach();
        assert!(!plugin.is_attached());
        assert_eq!(sdk.listener_count(), 0);

        sdk.emit_location_failure(Some("no fix"));
        assert!(sink.take().is_empty());

        let (result, replies) = RecordingResult::new();
        plugin.handle(MethodCall::new("startTracking", ()), result);
        assert!(matches!(&replies.take()[..], [Reply::Success(env)] if !env.success));
        assert!(!sdk.is_running());
    }

    #[test]
    fn sdk_callbacks_reach_the_sink() {
        let (plugin, sink) = plugin();
        let sdk = Arc::new(StubSdk::new());
        plugin.attach(context(&sdk));

        let (result, _replies) = RecordingResult::new();
        plugin.handle(MethodCall::new("startTracking", ()), result);
        assert!(sdk.is_running());
        sink.take();

        sdk.emit_location(&Location {
            latitude: 1.3,
            longitude: 103.8,
            accuracy: 5.0,
            altitude: 0.0,
            speed: 0.0,
            bearing: 45.0,
            provider: Some("fused".into()),
            time: Some(1_700_000_000_000),
        });
        sdk.emit_tracking_stop(TrackingDisableType::AssetIdTaken);

        let events = sink.take();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].0, ON_LOCATION_SUCCESS);
        let envelope: Value = serde_json::from_str(&events[0].1).expect("envelope");
        let sample: Value =
            serde_json::from_str(envelope["data"].as_str().expect("sample text")).expect("sample");
        assert_eq!(sample["latitude"], 1.3);
        assert_eq!(sample["provider"], "fused");

        assert_eq!(events[1].0, ON_TRACKING_STOP);
        let envelope: Value = serde_json::from_str(&events[1].1).expect("envelope");
        assert_eq!(
            envelope,
            json!({"success": true, "data": "", "msg": "ASSET_ID_TAKEN"})
        );
        assert!(!sdk.is_running());
    }
}
