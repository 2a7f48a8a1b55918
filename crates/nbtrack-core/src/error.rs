// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the asset-tracking bridge.

use thiserror::Error;

/// Failure reported by the asset-tracking SDK through a completion.
///
/// `error_code` is the SDK's numeric code; `message` is absent for some
/// network failures, in which case envelopes carry an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset tracking SDK error {error_code}: {}", message.as_deref().unwrap_or(""))]
pub struct AssetException {
    pub error_code: i32,
    pub message: Option<String>,
}

impl AssetException {
    pub fn new(error_code: i32, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: Some(message.into()),
        }
    }

    /// The message as it appears in a failure envelope.
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Dispatch --
    #[error("context not attached")]
    ContextUnavailable,

    #[error("invalid argument for {method}: expected {expected}")]
    InvalidArgument {
        method: String,
        expected: &'static str,
    },

    // -- Codec --
    #[error("malformed configuration: {0}")]
    MalformedConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_without_message_renders_empty() {
        let err = AssetException {
            error_code: 404,
            message: None,
        };
        assert_eq!(err.message_or_empty(), "");
        assert_eq!(err.to_string(), "asset tracking SDK error 404: ");
    }

    #[test]
    fn invalid_argument_names_method() {
        let err = BridgeError::InvalidArgument {
            method: "getTrip".into(),
            expected: "string",
        };
        assert_eq!(err.to_string(), "invalid argument for getTrip: expected string");
    }
}
