// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// NB asset tracking: SDK entity types, JSON codec, result envelope and
// error definitions shared by the bridge crates.

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod location;
pub mod notification;
pub mod types;

pub use codec::ResourceTable;
pub use config::BridgeConfig;
pub use envelope::Envelope;
pub use error::{AssetException, BridgeError};
pub use location::{DesiredAccuracy, LocationConfig, LocationSample, TrackingMode};
pub use notification::{NotificationConfig, NotificationPayload};
pub use types::*;
