//! Typed accessors over the shared settings entries.
//!
//! Settings live in the same store as everything else, as strings.
//! The accessors here own the parsing and the fallback policy so the
//! session layer never sees a malformed value.

use tracing::warn;

use crate::{KeyValueStore, keys};

/// Idle timeout applied when the stored value is absent or unusable.
pub const DEFAULT_SESSION_TIMEOUT_MIN: u64 = 60;

/// Reads the configured idle timeout in minutes.
///
/// A missing, unparsable, zero, or negative entry falls back to
/// [`DEFAULT_SESSION_TIMEOUT_MIN`]. This must never fail: the store is
/// shared and writable by code outside this workspace, so any value at
/// all may be found under the key.
pub fn session_timeout_minutes(store: &dyn KeyValueStore) -> u64 {
    let raw = store.get(keys::SESSION_TIMEOUT);

    match raw.as_deref().map(|v| v.parse::<i64>()) {
        None => DEFAULT_SESSION_TIMEOUT_MIN,
        Some(Ok(minutes)) if minutes > 0 => minutes as u64,
        Some(Ok(minutes)) => {
            warn!(
                minutes,
                default = DEFAULT_SESSION_TIMEOUT_MIN,
                "non-positive session timeout configured, using default"
            );
            DEFAULT_SESSION_TIMEOUT_MIN
        }
        Some(Err(_)) => {
            warn!(
                value = raw.as_deref(),
                default = DEFAULT_SESSION_TIMEOUT_MIN,
                "unparsable session timeout configured, using default"
            );
            DEFAULT_SESSION_TIMEOUT_MIN
        }
    }
}

/// Persists the idle timeout in minutes.
///
/// A zero input is clamped to one minute: a zero timeout would expire
/// every session at the first check, which no caller can want.
pub fn set_session_timeout_minutes(store: &dyn KeyValueStore, minutes: u64) {
    let minutes = minutes.max(1);
    store.set(keys::SESSION_TIMEOUT, &minutes.to_string());
}

// =========================================================================
// Tests
// =========================================================================
