//! # Vigil
//!
//! Idle-session watchdog for administrative consoles.
//!
//! Vigil watches an authenticated session for prolonged user inactivity
//! and ends it locally: credentials cleared, user notified, login
//! redirect scheduled. The host application supplies storage,
//! notification, and navigation as small capability traits; Vigil
//! supplies the policy and the lifecycle.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vigil::{Credentials, Navigator, Notifier, Warden};
//!
//! struct Toast;
//! impl Notifier for Toast {
//!     fn notify(&self, title: &str, body: &str) {
//!         println!("{title}: {body}");
//!     }
//! }
//!
//! struct Router;
//! impl Navigator for Router {
//!     fn navigate(&self, path: &str) {
//!         println!("-> {path}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vigil::AuthError> {
//!     let warden = Warden::builder().build(Toast, Router);
//!
//!     // Wire interaction events to the idle clock.
//!     let recorder = warden.recorder();
//!
//!     // After the backend accepts a sign-in:
//!     warden.login(Credentials::bearer("header.payload.signature"))?;
//!
//!     // ... on every user interaction:
//!     recorder.record();
//!     Ok(())
//! }
//! ```

mod error;
mod warden;

pub use error::AuthError;
pub use warden::{Credentials, Warden, WardenBuilder};

// Re-export the layer types so embedders need only this crate.
pub use vigil_session::{
    ActivityEvent, ActivityRecorder, EXPIRY_CLEARED_KEYS, LOGIN_PATH, MonitorConfig, MonitorPhase,
    MonitorStats, Navigator, Notifier, SessionMonitor,
};
pub use vigil_store::{KeyValueStore, MemoryStore, keys, settings};
