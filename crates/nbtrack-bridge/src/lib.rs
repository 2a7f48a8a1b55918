// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Bridge between a cross-platform UI toolkit's method channel and the
//! native NB asset-tracking SDK.
//!
//! Incoming calls go through [`AssetTrackingPlugin::handle`], which routes
//! them via the [`Dispatcher`] to an [`AssetTrackingSdk`]. SDK callbacks are
//! re-emitted as channel events by the [`EventForwarder`].

pub mod dispatcher;
pub mod events;
mod operations;
pub mod plugin;
pub mod stub;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use nbtrack_core::codec::ResourceTable;

pub use dispatcher::{ARGUMENT_ERROR_CODE, Dispatcher};
pub use events::EventForwarder;
pub use plugin::AssetTrackingPlugin;
pub use traits::{
    AssetTrackingSdk, CallbackId, Completion, EventSink, HostContext, MethodCall, MethodResult,
    TrackingCallbacks,
};

/// Drawable table for the target operating system.
pub fn platform_resources() -> Arc<dyn ResourceTable> {
    #[cfg(target_os = "android")]
    {
        // Resolved through the hosting Activity's Resources over JNI.
        Arc::new(android::AndroidResources::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        Arc::new(stub::StubResources::default())
    }
}
