// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android drawable lookup via JNI.
//
// Notification icons cross the method channel as drawable names; the SDK
// wants integer resource ids. Both directions go through the hosting
// Activity's `android.content.res.Resources`.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JObject, JString, JValue};
use tracing::warn;

use nbtrack_core::codec::ResourceTable;
use nbtrack_core::error::{BridgeError, Result};

const DRAWABLE: &str = "drawable";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Run `f` with an attached [`JNIEnv`] and the hosting Activity.
///
/// The `JavaVM*` and Activity `jobject` come from `ndk_context`, set up by
/// the NDK glue before any native code runs.
fn with_activity<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the process-wide `JavaVM*` registered by the NDK glue.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| jni_err("JavaVM::from_raw", e))?;
    let mut env = vm
        .attach_current_thread_permanently()
        .map_err(|e| jni_err("attach_current_thread", e))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(BridgeError::Bridge(
            "Android context is null, native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this is a valid global reference to the
    // hosting Activity for the life of the process.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };
    f(&mut env, &activity)
}

fn jni_err(context: &str, e: jni::errors::Error) -> BridgeError {
    BridgeError::Bridge(format!("{context}: {e}"))
}

fn resources<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        activity,
        "getResources",
        "()Landroid/content/res/Resources;",
        &[],
    )
    .map_err(|e| jni_err("getResources", e))?
    .l()
    .map_err(|e| jni_err("getResources->l", e))
}

// ---------------------------------------------------------------------------
// Resource table
// ---------------------------------------------------------------------------

/// Drawable table backed by the Activity's `Resources`.
///
/// Zero-sized; every lookup is a fresh JNI round trip.
#[derive(Debug, Default)]
pub struct AndroidResources;

impl AndroidResources {
    pub fn new() -> Self {
        Self
    }

    fn identifier(name: &str) -> Result<i32> {
        with_activity(|env, activity| {
            let res = resources(env, activity)?;
            let package = env
                .call_method(activity, "getPackageName", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("getPackageName", e))?
                .l()
                .map_err(|e| jni_err("getPackageName->l", e))?;
            let j_name = env
                .new_string(name)
                .map_err(|e| jni_err("new_string(name)", e))?;
            let j_type = env
                .new_string(DRAWABLE)
                .map_err(|e| jni_err("new_string(type)", e))?;

            env.call_method(
                &res,
                "getIdentifier",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)I",
                &[
                    JValue::Object(&j_name),
                    JValue::Object(&j_type),
                    JValue::Object(&package),
                ],
            )
            .map_err(|e| jni_err("Resources.getIdentifier", e))?
            .i()
            .map_err(|e| jni_err("getIdentifier->i", e))
        })
    }

    fn entry_name(handle: i32) -> Result<Option<String>> {
        with_activity(|env, activity| {
            let res = resources(env, activity)?;
            let entry = env.call_method(
                &res,
                "getResourceEntryName",
                "(I)Ljava/lang/String;",
                &[JValue::Int(handle)],
            );

            let obj = match entry {
                Ok(value) => value.l().map_err(|e| jni_err("getResourceEntryName->l", e))?,
                // Resources.NotFoundException
                Err(jni::errors::Error::JavaException) => {
                    env.exception_clear()
                        .map_err(|e| jni_err("exception_clear", e))?;
                    return Ok(None);
                }
                Err(e) => return Err(jni_err("Resources.getResourceEntryName", e)),
            };
            if obj.is_null() {
                return Ok(None);
            }

            let j_str = JString::from(obj);
            let name: String = env
                .get_string(&j_str)
                .map_err(|e| jni_err("get_string(entry)", e))?
                .into();
            Ok(Some(name))
        })
    }
}

impl ResourceTable for AndroidResources {
    fn drawable_id(&self, name: &str) -> i32 {
        Self::identifier(name).unwrap_or_else(|e| {
            warn!(name, error = %e, "drawable lookup failed");
            0
        })
    }

    fn drawable_name(&self, handle: i32) -> Option<String> {
        Self::entry_name(handle).unwrap_or_else(|e| {
            warn!(handle, error = %e, "drawable name lookup failed");
            None
        })
    }
}
