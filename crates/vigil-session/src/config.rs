//! Monitor configuration and the fixed expiry constants.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use vigil_store::{KeyValueStore, keys, settings};

/// Where an expired (or signed-out) session is sent.
pub const LOGIN_PATH: &str = "/login";

/// Title of the forced-expiry notification.
pub const SESSION_EXPIRED_TITLE: &str = "Session expired";

/// Body of the forced-expiry notification.
pub const SESSION_EXPIRED_BODY: &str =
    "Your session has expired due to inactivity. Please sign in again.";

/// The credential entries removed by a forced expiry.
///
/// Deliberately narrower than what sign-out clears: `refreshToken`
/// survives a forced expiry. Any token type added to the console later
/// must be appended here or it will silently outlive an idle session.
pub const EXPIRY_CLEARED_KEYS: [&str; 2] = [keys::AUTH_TOKEN, keys::SESSION_TOKEN];

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Effective configuration of a session monitor.
///
/// Only the idle timeout is configurable, and only through the shared
/// store (the settings panel writes it; monitoring re-reads it on every
/// start). The poll cadence and the expiry choreography are fixed
/// constants, not knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Maximum allowed duration without recorded interaction before the
    /// session is forcibly ended. Always greater than zero.
    pub timeout: Duration,
}

impl MonitorConfig {
    /// Timeout applied when the store holds no usable value.
    pub const DEFAULT_TIMEOUT: Duration =
        Duration::from_secs(settings::DEFAULT_SESSION_TIMEOUT_MIN * 60);

    /// How often elapsed idle time is checked. Not user-configurable.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

    /// Pause between the expiry notification and the login redirect,
    /// long enough for the notification to be seen.
    pub const NAVIGATION_DELAY: Duration = Duration::from_secs(2);

    /// Derives the configuration from the shared store.
    ///
    /// Absent, unparsable, and non-positive `sessionTimeout` entries all
    /// fall back to the default; this never fails and never blocks.
    pub fn from_store(store: &dyn KeyValueStore) -> Self {
        let minutes = settings::session_timeout_minutes(store);
        Self {
            timeout: Duration::from_secs(minutes * 60),
        }
    }

    /// Clamps a hand-built config back into the supported range.
    ///
    /// [`from_store`](Self::from_store) output is already clamped; this
    /// guards configs constructed directly.
    pub fn validated(mut self) -> Self {
        if self.timeout.is_zero() {
            warn!(
                default_min = settings::DEFAULT_SESSION_TIMEOUT_MIN,
                "zero idle timeout configured — clamping to default"
            );
            self.timeout = Self::DEFAULT_TIMEOUT;
        }
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_store::MemoryStore;

    #[test]
    fn test_default_timeout_is_sixty_minutes() {
        assert_eq!(MonitorConfig::default().timeout, Duration::from_secs(3600));
    }

    #[test]
    fn test_from_store_reads_configured_minutes() {
        let store = MemoryStore::new();
        store.set(keys::SESSION_TIMEOUT, "15");

        let config = MonitorConfig::from_store(&store);

        assert_eq!(config.timeout, Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_from_store_empty_store_uses_default() {
        let store = MemoryStore::new();

        let config = MonitorConfig::from_store(&store);

        assert_eq!(config.timeout, MonitorConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_store_garbage_uses_default() {
        let store = MemoryStore::new();
        store.set(keys::SESSION_TIMEOUT, "later");

        let config = MonitorConfig::from_store(&store);

        assert_eq!(config.timeout, MonitorConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_store_negative_uses_default() {
        let store = MemoryStore::new();
        store.set(keys::SESSION_TIMEOUT, "-30");

        let config = MonitorConfig::from_store(&store);

        assert_eq!(config.timeout, MonitorConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_validated_clamps_zero_timeout() {
        let config = MonitorConfig {
            timeout: Duration::ZERO,
        }
        .validated();

        assert_eq!(config.timeout, MonitorConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_expiry_cleared_keys_exclude_refresh_token() {
        // The refresh token survives forced expiry (it is cleared by
        // explicit sign-out only). Guards against someone "fixing" the
        // constant without reading its documentation.
        assert!(!EXPIRY_CLEARED_KEYS.contains(&keys::REFRESH_TOKEN));
        assert!(EXPIRY_CLEARED_KEYS.contains(&keys::AUTH_TOKEN));
        assert!(EXPIRY_CLEARED_KEYS.contains(&keys::SESSION_TOKEN));
    }
}
