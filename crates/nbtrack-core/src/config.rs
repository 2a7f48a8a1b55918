// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Settings for the bridge itself (not the SDK).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the method channel shared with the host application.
    pub channel_name: String,
    /// Toolkit prefix reported to the SDK as cross-platform info.
    pub cross_platform_prefix: String,
    /// Plugin version reported to the SDK.
    pub plugin_version: String,
    /// Short git revision reported to the SDK.
    pub git_revision: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: "nb_asset_tracking_flutter".into(),
            cross_platform_prefix: "Flutter".into(),
            plugin_version: env!("CARGO_PKG_VERSION").into(),
            git_revision: option_env!("GIT_REVISION_SHORT")
                .unwrap_or("unknown")
                .into(),
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Load a config file; fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        info!(path = %path.display(), channel = %config.channel_name, "bridge config loaded");
        Ok(config)
    }

    /// Identifier sent to the SDK on `initialize`, e.g. `Flutter-1.2.0-a1b2c3d`.
    pub fn cross_platform_name(&self) -> String {
        format!(
            "{}-{}-{}",
            self.cross_platform_prefix, self.plugin_version, self.git_revision
        )
    }
}
