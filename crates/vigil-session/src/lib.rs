//! Idle-session monitoring for Vigil.
//!
//! This crate watches an authenticated session for prolonged user
//! inactivity and terminates it locally, independent of any server-side
//! expiry:
//!
//! 1. **Activity tracking** — interaction events overwrite a
//!    last-activity timestamp ([`ActivityRecorder`], [`ActivityEvent`])
//! 2. **Periodic checks** — a fixed one-minute poll compares elapsed
//!    idle time against the configured timeout ([`SessionMonitor`])
//! 3. **Expiry** — credentials cleared, user notified, login redirect
//!    scheduled (one-shot, exactly once per monitoring period)
//!
//! # How it fits in the stack
//!
//! ```text
//! Composition root (above)  ← wires store/notifier/navigator, owns the monitor
//!     ↕
//! Session layer (this crate)  ← idle policy, lifecycle, expiry action
//!     ↕
//! Store layer (below)  ← configured timeout, credential entries
//! ```
//!
//! The monitor never touches ambient state: storage, notification, and
//! navigation are injected capabilities ([`vigil_store::KeyValueStore`],
//! [`Notifier`], [`Navigator`]), so the whole crate runs unmodified
//! against in-memory fakes in tests.

mod activity;
mod config;
mod monitor;
mod surface;

pub use activity::{ActivityEvent, ActivityRecorder};
pub use config::{
    EXPIRY_CLEARED_KEYS, LOGIN_PATH, MonitorConfig, SESSION_EXPIRED_BODY, SESSION_EXPIRED_TITLE,
};
pub use monitor::{MonitorPhase, MonitorStats, SessionMonitor};
pub use surface::{Navigator, Notifier};
