// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording doubles for the host side of the method channel.

use std::sync::{Arc, Mutex};

use nbtrack_core::envelope::Envelope;

use crate::traits::{EventSink, MethodResult};

/// What a call was answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Envelope),
    Error { code: String, message: String },
    NotImplemented,
}

/// Shared view of the replies a [`RecordingResult`] received.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Reply>>>);

impl Recorder {
    pub fn take(&self) -> Vec<Reply> {
        std::mem::take(&mut *self.0.lock().expect("recorder lock"))
    }

    fn push(&self, reply: Reply) {
        self.0.lock().expect("recorder lock").push(reply);
    }
}

pub struct RecordingResult(Recorder);

impl RecordingResult {
    pub fn new() -> (Box<dyn MethodResult>, Recorder) {
        let recorder = Recorder::default();
        (Box::new(Self(recorder.clone())), recorder)
    }
}

impl MethodResult for RecordingResult {
    fn success(self: Box<Self>, envelope: Envelope) {
        self.0.push(Reply::Success(envelope));
    }

    fn error(self: Box<Self>, code: &str, message: &str) {
        self.0.push(Reply::Error {
            code: code.to_owned(),
            message: message.to_owned(),
        });
    }

    fn not_implemented(self: Box<Self>) {
        self.0.push(Reply::NotImplemented);
    }
}

/// Event sink that keeps `(event, payload)` pairs in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.events.lock().expect("sink lock"))
    }
}

impl EventSink for RecordingSink {
    fn invoke_method(&self, method: &str, payload: String) {
        self.events
            .lock()
            .expect("sink lock")
            .push((method.to_owned(), payload));
    }
}
