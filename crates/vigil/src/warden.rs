//! The `Warden`: Vigil's composition root.
//!
//! The warden ties the layers together: it owns the shared store, builds
//! the session monitor over the host's notifier and navigator, and
//! carries the sign-in/sign-out flow that brackets a monitored session.
//! The host application keeps one warden for the life of the process.

use std::sync::Arc;

use tracing::info;
use vigil_session::{ActivityRecorder, LOGIN_PATH, Navigator, Notifier, SessionMonitor};
use vigil_store::{KeyValueStore, MemoryStore, keys};

use crate::AuthError;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Credential material returned by a successful backend sign-in.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token attached to API requests. Expected to be a JWT:
    /// three dot-separated segments.
    pub access_token: String,

    /// Refresh token, when the backend issues one.
    pub refresh_token: Option<String>,

    /// Backend session token checked by route guards.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Credentials carrying only an access token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            session_token: None,
        }
    }
}

// ---------------------------------------------------------------------------
// WardenBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and assembling a [`Warden`].
///
/// # Example
///
/// ```rust,ignore
/// let warden = Warden::builder()
///     .store(my_store)
///     .build(my_notifier, my_navigator);
/// ```
pub struct WardenBuilder {
    store: Arc<dyn KeyValueStore>,
}

impl WardenBuilder {
    /// Creates a builder backed by a fresh in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Uses a host-provided store instead of the in-memory default.
    pub fn store(mut self, store: impl KeyValueStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Assembles the warden with the host's notification and navigation
    /// capabilities.
    pub fn build(self, notifier: impl Notifier, navigator: impl Navigator) -> Warden {
        let navigator: Arc<dyn Navigator> = Arc::new(navigator);
        let monitor = SessionMonitor::new(
            Arc::clone(&self.store),
            Arc::new(notifier),
            Arc::clone(&navigator),
        );
        Warden {
            store: self.store,
            navigator,
            monitor,
        }
    }
}

impl Default for WardenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Warden
// ---------------------------------------------------------------------------

/// The assembled session stack: store + monitor + auth flow.
pub struct Warden {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    monitor: SessionMonitor,
}

impl Warden {
    /// Creates a new builder.
    pub fn builder() -> WardenBuilder {
        WardenBuilder::new()
    }

    /// Records a successful sign-in: persists the credentials and starts
    /// session monitoring.
    ///
    /// The access token is validated before anything is stored; a
    /// malformed token leaves the store untouched and monitoring off.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// [`AuthError::EmptyToken`] or [`AuthError::MalformedToken`] when
    /// the access token is not a plausible JWT.
    pub fn login(&self, credentials: Credentials) -> Result<(), AuthError> {
        validate_token_format(&credentials.access_token)?;

        self.store.set(keys::AUTH_TOKEN, &credentials.access_token);
        if let Some(refresh) = credentials.refresh_token.as_deref() {
            self.store.set(keys::REFRESH_TOKEN, refresh);
        }
        if let Some(session) = credentials.session_token.as_deref() {
            self.store.set(keys::SESSION_TOKEN, session);
        }

        // The interaction that submitted the sign-in form is itself
        // user activity; without this a restarted session could begin
        // already past its idle budget.
        self.monitor.record_activity();
        self.monitor.start_monitoring();

        info!("signed in, session monitoring active");
        Ok(())
    }

    /// Explicit sign-out: stops monitoring, clears every credential
    /// entry (including the refresh token), and redirects to the login
    /// page immediately.
    pub fn logout(&self) {
        self.monitor.stop_monitoring();

        for key in [keys::AUTH_TOKEN, keys::REFRESH_TOKEN, keys::SESSION_TOKEN] {
            self.store.remove(key);
        }

        info!("signed out");

        // Unlike forced expiry, sign-out redirects without a delay:
        // there is no notification the user needs time to read.
        self.navigator.navigate(LOGIN_PATH);
    }

    /// Whether a credential entry is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.store.get(keys::AUTH_TOKEN).is_some()
            || self.store.get(keys::SESSION_TOKEN).is_some()
    }

    /// The session monitor, for lifecycle calls and introspection.
    pub fn monitor(&self) -> &SessionMonitor {
        &self.monitor
    }

    /// A narrowed activity-recording handle for event sources.
    pub fn recorder(&self) -> ActivityRecorder {
        self.monitor.recorder()
    }

    /// The shared store, for settings access and route guards.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

/// A plausible JWT has exactly three dot-separated segments. Anything
/// else cannot authenticate and is rejected before it is stored.
fn validate_token_format(token: &str) -> Result<(), AuthError> {
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    let segments = token.split('.').count();
    if segments != 3 {
        return Err(AuthError::MalformedToken { segments });
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
