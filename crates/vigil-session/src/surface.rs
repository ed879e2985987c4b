//! User-facing capabilities the monitor is handed by its host.
//!
//! Vigil doesn't render anything itself. When a session expires it has
//! two things to say to the outside world: "tell the user" and "go to
//! the login page". Both are expressed as single-method traits so the
//! host application decides what they mean (a toast and a router in the
//! console, a log line and a process exit in the demo, recording fakes
//! in tests).

/// Displays a dismissible message to the user.
///
/// Fire-and-forget: the monitor never waits for, or reacts to, the
/// user's response.
///
/// # Example
///
/// ```rust
/// use vigil_session::Notifier;
///
/// /// Routes notifications into the structured log.
/// struct LogNotifier;
///
/// impl Notifier for LogNotifier {
///     fn notify(&self, title: &str, body: &str) {
///         tracing::info!(title, body, "notification");
///     }
/// }
/// ```
pub trait Notifier: Send + Sync + 'static {
    /// Shows a message with the given title and body.
    fn notify(&self, title: &str, body: &str);
}

/// Changes the application's current location.
///
/// Used by the monitor's expiry action (after a short delay) and by the
/// sign-out flow (immediately). Fire-and-forget.
pub trait Navigator: Send + Sync + 'static {
    /// Navigates to the given path.
    fn navigate(&self, path: &str);
}
