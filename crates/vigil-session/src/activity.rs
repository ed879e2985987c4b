//! Activity events and the narrowed recording handle.

use std::sync::Weak;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::monitor::MonitorInner;

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// An interaction signal used as a proxy for "the user is present".
///
/// The monitor does not distinguish kinds — any event resets the idle
/// clock. The enum exists so event sources share a typed vocabulary and
/// so events can cross a JSON bridge from the UI layer; the serialized
/// names match the DOM events the console listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityEvent {
    /// A pointer button was pressed anywhere in the document.
    PointerDown,
    /// A key was pressed.
    KeyPress,
    /// The document was scrolled.
    Scroll,
    /// A touch interaction started.
    TouchStart,
}

// ---------------------------------------------------------------------------
// ActivityRecorder
// ---------------------------------------------------------------------------

/// A narrowed handle for reporting user activity.
///
/// Event sources get this instead of the full [`SessionMonitor`] — they
/// can refresh the idle clock and nothing else. The handle holds a weak
/// reference, so a wired-up event source can never keep a discarded
/// monitor alive; recording against a gone monitor is a silent no-op.
///
/// Cloning is cheap. Recording is a single atomic store, safe to call
/// on every scroll or keypress without queueing anything.
///
/// [`SessionMonitor`]: crate::SessionMonitor
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    pub(crate) inner: Weak<MonitorInner>,
}

impl ActivityRecorder {
    /// Marks "some interaction happened now".
    pub fn record(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.record_activity();
        }
    }

    /// Records a specific event kind.
    ///
    /// Equivalent to [`record`](Self::record); the kind is only traced.
    pub fn observe(&self, event: ActivityEvent) {
        trace!(?event, "interaction observed");
        self.record();
    }

    /// Whether the monitor behind this handle still exists.
    pub fn is_connected(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// =========================================================================
// Tests
// =========================================================================
