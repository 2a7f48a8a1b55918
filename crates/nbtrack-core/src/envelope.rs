// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The uniform result wrapper used for every reply and every forwarded event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// `{success, data, msg}` as exchanged with the host application.
///
/// `msg` serializes as `null` when absent; a few replies (`endTrip`,
/// `onTripStatusChanged`) send it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
    pub msg: Option<String>,
}

impl Envelope {
    /// Success with an empty message.
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: data.into(),
            msg: Some(String::new()),
        }
    }

    pub fn ok_with_msg(data: impl Into<Value>, msg: Option<String>) -> Self {
        Self {
            success: true,
            data: data.into(),
            msg,
        }
    }

    pub fn failure(data: impl Into<Value>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: data.into(),
            msg: Some(msg.into()),
        }
    }

    /// Serialize to the JSON text the host decodes.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
