// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// nbtrack-harness: drive the bridge from the command line.
//
// Reads one method call per stdin line, e.g.
//   {"method": "startTrip", "arguments": "{\"name\": \"Route 1\"}"}
// and writes every reply and forwarded event to stdout as a JSON line.
// Lines tagged with `control` drive the stub SDK instead:
//   {"control": "failNext", "errorCode": 503, "message": "offline"}
//   {"control": "emitLocation", "latitude": 1.3, "longitude": 103.8}
//   {"control": "emitLocationFailure", "message": "GPS disabled"}
//   {"control": "emitTrackingStop", "reason": "ASSET_ID_TAKEN"}
// Logs go to stderr.

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use nbtrack_bridge::stub::StubSdk;
use nbtrack_bridge::{
    ARGUMENT_ERROR_CODE, AssetTrackingPlugin, EventSink, HostContext, MethodCall, MethodResult,
    platform_resources,
};
use nbtrack_core::config::BridgeConfig;
use nbtrack_core::envelope::Envelope;
use nbtrack_core::error::{AssetException, BridgeError, Result};
use nbtrack_core::{Location, TrackingDisableType};

/// One reply, as printed.
#[derive(Debug, Serialize)]
#[serde(tag = "reply", rename_all = "camelCase")]
enum ReplyLine {
    Success { envelope: Envelope },
    NotImplemented,
    Error { code: String, message: String },
    /// A control line was applied.
    Applied,
}

/// Stub SDK controls for exercising failure paths and callbacks.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "control", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum Control {
    FailNext {
        error_code: i32,
        #[serde(default)]
        message: Option<String>,
    },
    EmitLocation {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        accuracy: f32,
        #[serde(default)]
        altitude: f64,
        #[serde(default)]
        speed: f32,
        #[serde(default)]
        bearing: f32,
        #[serde(default)]
        provider: Option<String>,
        #[serde(default)]
        time: Option<i64>,
    },
    EmitLocationFailure {
        #[serde(default)]
        message: Option<String>,
    },
    EmitTrackingStop {
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputLine {
    Control(Control),
    Call(MethodCall),
}

fn apply(control: Control, sdk: &StubSdk) -> Result<()> {
    match control {
        Control::FailNext {
            error_code,
            message,
        } => sdk.fail_next(AssetException {
            error_code,
            message,
        }),
        Control::EmitLocation {
            latitude,
            longitude,
            accuracy,
            altitude,
            speed,
            bearing,
            provider,
            time,
        } => sdk.emit_location(&Location {
            latitude,
            longitude,
            accuracy,
            altitude,
            speed,
            bearing,
            provider,
            time,
        }),
        Control::EmitLocationFailure { message } => sdk.emit_location_failure(message.as_deref()),
        Control::EmitTrackingStop { reason } => {
            let reason = TrackingDisableType::from_name(&reason).ok_or_else(|| {
                BridgeError::InvalidArgument {
                    method: "emitTrackingStop".into(),
                    expected: "NORMAL, ASSET_ID_TAKEN or PERMISSION_DENIED",
                }
            })?;
            sdk.emit_tracking_stop(reason);
        }
    }
    Ok(())
}

fn handle_line(plugin: &AssetTrackingPlugin, sdk: &StubSdk, line: &str) {
    match serde_json::from_str::<InputLine>(line) {
        Ok(InputLine::Call(call)) => plugin.handle(call, Box::new(StdoutResult)),
        Ok(InputLine::Control(control)) => match apply(control, sdk) {
            Ok(()) => print_line(&ReplyLine::Applied),
            Err(e) => Box::new(StdoutResult).error(ARGUMENT_ERROR_CODE, &e.to_string()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "unreadable input line");
            Box::new(StdoutResult).error(ARGUMENT_ERROR_CODE, &e.to_string());
        }
    }
}

#[derive(Debug, Serialize)]
struct EventLine<'a> {
    event: &'a str,
    payload: Value,
}

fn print_line<T: Serialize>(line: &T) {
    match serde_json::to_string(line) {
        Ok(text) => {
            let mut out = std::io::stdout().lock();
            if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
                tracing::error!(error = %e, "stdout write failed");
            }
        }
        Err(e) => tracing::error!(error = %e, "could not encode output line"),
    }
}

struct StdoutResult;

impl MethodResult for StdoutResult {
    fn success(self: Box<Self>, envelope: Envelope) {
        print_line(&ReplyLine::Success { envelope });
    }

    fn error(self: Box<Self>, code: &str, message: &str) {
        print_line(&ReplyLine::Error {
            code: code.to_owned(),
            message: message.to_owned(),
        });
    }

    fn not_implemented(self: Box<Self>) {
        print_line(&ReplyLine::NotImplemented);
    }
}

struct StdoutSink;

impl EventSink for StdoutSink {
    fn invoke_method(&self, method: &str, payload: String) {
        // Envelopes are JSON text; print them nested rather than quoted.
        let payload = serde_json::from_str(&payload).unwrap_or(Value::String(payload));
        print_line(&EventLine {
            event: method,
            payload,
        });
    }
}

fn load_config() -> Result<BridgeConfig> {
    match std::env::args().nth(1) {
        Some(path) => BridgeConfig::load(path),
        None => Ok(BridgeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!(
        version = %config.plugin_version,
        revision = %config.git_revision,
        "nbtrack harness starting"
    );

    let sdk = Arc::new(StubSdk::new());
    let plugin = AssetTrackingPlugin::new(config, Arc::new(StdoutSink));
    plugin.attach(HostContext::new(sdk.clone(), platform_resources()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        handle_line(&plugin, &sdk, line);
    }

    plugin.detach();
    tracing::info!("input closed, exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbtrack_bridge::AssetTrackingSdk;
    use serde_json::json;

    #[test]
    fn reply_lines_are_tagged() {
        let line = serde_json::to_value(ReplyLine::Success {
            envelope: Envelope::ok("trip-1"),
        })
        .expect("to_value");
        assert_eq!(
            line,
            json!({"reply": "success", "envelope": {"success": true, "data": "trip-1", "msg": ""}})
        );

        let line = serde_json::to_value(ReplyLine::NotImplemented).expect("to_value");
        assert_eq!(line, json!({"reply": "notImplemented"}));

        let line = serde_json::to_value(ReplyLine::Applied).expect("to_value");
        assert_eq!(line, json!({"reply": "applied"}));

        let line = serde_json::to_value(ReplyLine::Error {
            code: "error".into(),
            message: "bad".into(),
        })
        .expect("to_value");
        assert_eq!(line, json!({"reply": "error", "code": "error", "message": "bad"}));
    }

    #[test]
    fn calls_accept_missing_arguments() {
        let line: InputLine = serde_json::from_str(r#"{"method": "isTracking"}"#).expect("parse");
        let InputLine::Call(call) = line else {
            panic!("expected a method call");
        };
        assert_eq!(call, MethodCall::new("isTracking", Value::Null));
    }

    #[test]
    fn control_lines_parse() {
        let line: InputLine =
            serde_json::from_str(r#"{"control": "failNext", "errorCode": 503}"#).expect("parse");
        assert!(matches!(
            line,
            InputLine::Control(Control::FailNext { error_code: 503, message: None })
        ));

        let line: InputLine = serde_json::from_str(
            r#"{"control": "emitLocation", "latitude": 1.0, "longitude": 2.0}"#,
        )
        .expect("parse");
        assert!(matches!(
            line,
            InputLine::Control(Control::EmitLocation { provider: None, time: None, .. })
        ));

        assert!(serde_json::from_str::<InputLine>(r#"{"control": "reboot"}"#).is_err());
    }

    #[test]
    fn fail_next_reaches_the_stub() {
        let sdk = StubSdk::new();
        apply(
            Control::FailNext {
                error_code: 503,
                message: None,
            },
            &sdk,
        )
        .expect("apply");

        let code = Arc::new(std::sync::Mutex::new(None));
        let seen = Arc::clone(&code);
        sdk.end_trip(Box::new(move |res| {
            *seen.lock().expect("lock") = res.err().map(|e| e.error_code);
        }));
        assert_eq!(*code.lock().expect("lock"), Some(503));
    }

    #[test]
    fn unknown_stop_reason_is_rejected() {
        let sdk = StubSdk::new();
        let err = apply(
            Control::EmitTrackingStop {
                reason: "LOW_BATTERY".into(),
            },
            &sdk,
        )
        .expect_err("unknown reason");
        assert!(err.to_string().contains("ASSET_ID_TAKEN"));
    }
}
