// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command dispatcher: routes named method-channel calls to SDK operations.
//
// Each operation is a handler that decodes the call's argument and returns
// an `Action`. Decoding happens before the SDK is touched, so a malformed
// argument fails the call without side effects. The action then performs the
// SDK call and answers the `MethodResult`, immediately or from the SDK's
// completion.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use nbtrack_core::codec::{self, ResourceTable};
use nbtrack_core::config::BridgeConfig;
use nbtrack_core::envelope::Envelope;
use nbtrack_core::error::{BridgeError, Result};

use crate::operations::OPERATIONS;
use crate::traits::{AssetTrackingSdk, HostContext, MethodCall, MethodResult};

/// Deferred SDK invocation that answers the call when run.
pub(crate) type Action = Box<dyn FnOnce(Box<dyn MethodResult>)>;

/// Decodes a request and prepares its action.
pub(crate) type Handler = fn(&Request) -> Result<Action>;

/// Error code sent through `MethodResult::error` for undecodable arguments.
pub const ARGUMENT_ERROR_CODE: &str = "error";

/// A recognised call together with the context it runs against.
pub(crate) struct Request {
    pub method: String,
    pub arguments: Value,
    pub context: HostContext,
    pub config: Arc<BridgeConfig>,
}

impl Request {
    pub fn sdk(&self) -> Arc<dyn AssetTrackingSdk> {
        Arc::clone(&self.context.sdk)
    }

    pub fn resources(&self) -> &dyn ResourceTable {
        self.context.resources.as_ref()
    }

    pub fn string_arg(&self) -> Result<String> {
        self.arguments
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid("string"))
    }

    pub fn bool_arg(&self) -> Result<bool> {
        self.arguments.as_bool().ok_or_else(|| self.invalid("bool"))
    }

    /// The argument is JSON text holding a `T`.
    pub fn decode_arg<T: DeserializeOwned>(&self) -> Result<T> {
        codec::decode(&self.string_arg()?)
    }

    fn invalid(&self, expected: &'static str) -> BridgeError {
        BridgeError::InvalidArgument {
            method: self.method.clone(),
            expected,
        }
    }
}

/// Answer with an envelope that is already known.
pub(crate) fn respond(envelope: Envelope) -> Action {
    Box::new(move |result| result.success(envelope))
}

/// Stateless router from method names to operations.
///
/// The table is built once; `dispatch` may be called concurrently from any
/// thread and imposes no ordering between calls.
pub struct Dispatcher {
    handlers: HashMap<&'static str, Handler>,
    config: Arc<BridgeConfig>,
}

impl Dispatcher {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            handlers: OPERATIONS.iter().copied().collect(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn supports(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Names of all recognised operations.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Handle one call.
    ///
    /// Without a context the call is rejected with a failure envelope. An
    /// empty method name is dropped without a reply. Unknown names get
    /// `not_implemented`.
    #[instrument(skip_all, fields(method = %call.method))]
    pub fn dispatch(
        &self,
        context: Option<&HostContext>,
        call: MethodCall,
        result: Box<dyn MethodResult>,
    ) {
        let Some(context) = context else {
            warn!("no host context attached, rejecting call");
            result.success(Envelope::failure(
                "",
                BridgeError::ContextUnavailable.to_string(),
            ));
            return;
        };

        if call.method.is_empty() {
            debug!("empty method name, dropping call");
            return;
        }

        let Some(handler) = self.handlers.get(call.method.as_str()) else {
            warn!("method not implemented");
            result.not_implemented();
            return;
        };

        debug!("dispatching");
        let request = Request {
            method: call.method,
            arguments: call.arguments,
            context: context.clone(),
            config: Arc::clone(&self.config),
        };

        match handler(&request) {
            Ok(action) => action(result),
            Err(e) => {
                error!(error = %e, "could not decode call argument");
                result.error(ARGUMENT_ERROR_CODE, &e.to_string());
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}
