//! The session monitor: idle tracking, periodic checks, forced expiry.
//!
//! One monitor watches one authenticated session. It owns three pieces
//! of state:
//!
//! - the last-activity instant (an atomic scalar, overwritten by every
//!   recorded interaction),
//! - the effective idle timeout (re-read from the store on every start),
//! - the lifecycle: which phase the monitor is in, and the poll-loop
//!   handle when one is running.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle ──(start_monitoring)──→ Active ──(timeout exceeded)──→ Expiring
//!    ↑                             │                               │
//!    ├────────(stop_monitoring)────┘                               │
//!    └──────────────────(expiry completes)─────────────────────────┘
//! ```
//!
//! Expiry is a one-shot terminal transition: there is no way back from
//! Expiring to Active, and once it has run the monitor sits inert in
//! Idle until the next sign-in starts monitoring again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace};
use vigil_store::KeyValueStore;
use vigil_timer::{RepeatingTask, TimerConfig};

use crate::activity::{ActivityEvent, ActivityRecorder};
use crate::config::{
    EXPIRY_CLEARED_KEYS, LOGIN_PATH, MonitorConfig, SESSION_EXPIRED_BODY, SESSION_EXPIRED_TITLE,
};
use crate::surface::{Navigator, Notifier};

// ---------------------------------------------------------------------------
// MonitorPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a session monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Not monitoring. Activity is still recorded, but never checked.
    Idle,
    /// Monitoring: the periodic check is live and the session is valid.
    Active,
    /// Expiry in progress. Terminal: never transitions back to Active.
    Expiring,
}

impl MonitorPhase {
    /// Returns `true` while the periodic check is live.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
            Self::Expiring => write!(f, "Expiring"),
        }
    }
}

// ---------------------------------------------------------------------------
// MonitorStats
// ---------------------------------------------------------------------------

/// Counters exposed for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    /// Idle checks evaluated while monitoring was active.
    pub checks: u64,
    /// Forced expirations performed.
    pub expirations: u64,
}

// ---------------------------------------------------------------------------
// SessionMonitor
// ---------------------------------------------------------------------------

/// Phase plus poll-loop handle, guarded together so "at most one poll
/// loop, and only while Active" is a single-lock invariant.
struct Lifecycle {
    phase: MonitorPhase,
    poll: Option<RepeatingTask>,
}

pub(crate) struct MonitorInner {
    /// Instant the monitor was created; timestamps below are offsets
    /// from it. `tokio::time::Instant` honors the paused test clock.
    origin: Instant,
    /// Milliseconds since `origin` of the last recorded interaction.
    last_activity_ms: AtomicU64,
    /// Effective idle timeout in milliseconds. Always > 0.
    timeout_ms: AtomicU64,
    checks: AtomicU64,
    expirations: AtomicU64,
    lifecycle: Mutex<Lifecycle>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

/// Watches one authenticated session for prolonged inactivity.
///
/// Cheap to clone; all clones share the same state. The composition
/// root constructs one at startup and hands out [`ActivityRecorder`]s
/// to event sources; `start_monitoring` is called after each successful
/// sign-in and `stop_monitoring` on explicit sign-out.
#[derive(Clone)]
pub struct SessionMonitor {
    inner: Arc<MonitorInner>,
}

impl SessionMonitor {
    /// Creates a monitor in the Idle phase.
    ///
    /// The idle timeout is derived from the store immediately (and again
    /// on every [`start_monitoring`](Self::start_monitoring), so settings
    /// changes apply to the next session). The last-activity clock
    /// starts at creation time.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let config = MonitorConfig::from_store(store.as_ref()).validated();
        Self {
            inner: Arc::new(MonitorInner {
                origin: Instant::now(),
                last_activity_ms: AtomicU64::new(0),
                timeout_ms: AtomicU64::new(config.timeout.as_millis() as u64),
                checks: AtomicU64::new(0),
                expirations: AtomicU64::new(0),
                lifecycle: Mutex::new(Lifecycle {
                    phase: MonitorPhase::Idle,
                    poll: None,
                }),
                store,
                notifier,
                navigator,
            }),
        }
    }

    /// Marks "some interaction happened now".
    ///
    /// A single atomic overwrite: safe to call on every keypress and
    /// scroll, at any frequency, from any task. Nothing is queued.
    pub fn record_activity(&self) {
        self.inner.record_activity();
    }

    /// Starts (or restarts) the periodic idle check.
    ///
    /// Re-reads the configured timeout from the store, then installs a
    /// fresh poll loop; any previously running loop is cancelled by the
    /// handle swap, so calling this twice leaves exactly one loop with
    /// the latest configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_monitoring(&self) {
        let config = MonitorConfig::from_store(self.inner.store.as_ref());
        self.inner
            .timeout_ms
            .store(config.timeout.as_millis() as u64, Ordering::Relaxed);

        // The poll loop holds a weak reference: a forgotten loop must
        // never keep a discarded monitor alive.
        let weak = Arc::downgrade(&self.inner);
        let poll = vigil_timer::spawn(
            TimerConfig::with_period(MonitorConfig::POLL_INTERVAL),
            move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.check_expiry();
                    }
                }
            },
        );

        let replaced = {
            let mut lifecycle = self.inner.lock_lifecycle();
            lifecycle.phase = MonitorPhase::Active;
            lifecycle.poll.replace(poll)
        };
        if replaced.is_some() {
            debug!("previous poll loop replaced");
        }

        info!(
            timeout_min = config.timeout.as_secs() / 60,
            "session monitoring started"
        );
    }

    /// Stops the periodic idle check.
    ///
    /// Safe to call when none is running (silent no-op). Activity keeps
    /// being recorded either way.
    pub fn stop_monitoring(&self) {
        let stopped = {
            let mut lifecycle = self.inner.lock_lifecycle();
            lifecycle.phase = MonitorPhase::Idle;
            lifecycle.poll.take()
        };
        if stopped.is_some() {
            info!("session monitoring stopped");
        }
    }

    /// Evaluates the idle timeout now, firing expiry if it is exceeded.
    ///
    /// The poll loop calls this every [`MonitorConfig::POLL_INTERVAL`];
    /// it is public so hosts can force an immediate evaluation (e.g.
    /// when a tab regains focus). Returns whether expiry fired. Inert
    /// unless the monitor is Active.
    pub fn check_expiry(&self) -> bool {
        self.inner.check_expiry()
    }

    /// Hands out a narrowed activity-recording handle for event sources.
    pub fn recorder(&self) -> ActivityRecorder {
        ActivityRecorder {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Drains a channel of interaction events into the idle clock.
    ///
    /// The forwarder runs until every sender is dropped or the monitor
    /// itself is gone. Attaching is a once-at-startup affair; attaching
    /// a second source double-counts events, which is harmless since
    /// recording is an idempotent overwrite.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach_events(&self, mut events: mpsc::UnboundedReceiver<ActivityEvent>) {
        let recorder = self.recorder();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                recorder.observe(event);
                if !recorder.is_connected() {
                    break;
                }
            }
            debug!("activity event source closed");
        });
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> MonitorPhase {
        self.inner.lock_lifecycle().phase
    }

    /// Time since the last recorded interaction.
    pub fn idle_for(&self) -> Duration {
        Duration::from_millis(self.inner.idle_ms())
    }

    /// Snapshot of the effective configuration.
    pub fn config(&self) -> MonitorConfig {
        MonitorConfig {
            timeout: Duration::from_millis(self.inner.timeout_ms.load(Ordering::Relaxed)),
        }
    }

    /// Snapshot of the monitoring counters.
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            checks: self.inner.checks.load(Ordering::Relaxed),
            expirations: self.inner.expirations.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SessionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMonitor")
            .field("phase", &self.phase())
            .field("idle_for", &self.idle_for())
            .field("timeout", &self.config().timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MonitorInner
// ---------------------------------------------------------------------------

impl MonitorInner {
    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        // Nothing panics while holding this lock, so it cannot be
        // poisoned in practice.
        self.lifecycle.lock().expect("lifecycle mutex poisoned")
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn idle_ms(&self) -> u64 {
        self.now_ms()
            .saturating_sub(self.last_activity_ms.load(Ordering::Relaxed))
    }

    pub(crate) fn record_activity(&self) {
        self.last_activity_ms.store(self.now_ms(), Ordering::Relaxed);
    }

    pub(crate) fn check_expiry(&self) -> bool {
        if !self.lock_lifecycle().phase.is_active() {
            return false;
        }
        self.checks.fetch_add(1, Ordering::Relaxed);

        let idle_ms = self.idle_ms();
        let timeout_ms = self.timeout_ms.load(Ordering::Relaxed);
        if idle_ms <= timeout_ms {
            trace!(idle_s = idle_ms / 1000, "idle check passed");
            return false;
        }

        self.expire(idle_ms);
        true
    }

    /// The one-shot expiration action.
    ///
    /// Side effects happen in a fixed order: stop the poll loop, clear
    /// credentials, notify, schedule the delayed login redirect. The
    /// phase gate at the top makes the whole sequence fire at most once
    /// per Active period.
    fn expire(&self, idle_ms: u64) {
        let stopped = {
            let mut lifecycle = self.lock_lifecycle();
            if !lifecycle.phase.is_active() {
                return;
            }
            lifecycle.phase = MonitorPhase::Expiring;
            lifecycle.poll.take()
        };
        // Dropping the handle cancels the poll loop. This usually runs
        // ON that loop; cancellation is observed between runs, so the
        // current run completes normally.
        drop(stopped);

        info!(
            idle_min = idle_ms / 60_000,
            "session expired after inactivity"
        );

        for key in EXPIRY_CLEARED_KEYS {
            self.store.remove(key);
        }

        self.notifier
            .notify(SESSION_EXPIRED_TITLE, SESSION_EXPIRED_BODY);

        // Deferred, not blocking: the rest of the program keeps running
        // while the notification is on screen.
        let navigator = Arc::clone(&self.navigator);
        tokio::spawn(async move {
            tokio::time::sleep(MonitorConfig::NAVIGATION_DELAY).await;
            navigator.navigate(LOGIN_PATH);
        });

        self.expirations.fetch_add(1, Ordering::Relaxed);

        let mut lifecycle = self.lock_lifecycle();
        // A sign-in racing the tail of an expiry may already have moved
        // the phase back to Active; leave its state alone.
        if lifecycle.phase == MonitorPhase::Expiring {
            lifecycle.phase = MonitorPhase::Idle;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the monitor's lifecycle plumbing. Timing-heavy
    //! scenarios live in `tests/session_monitor.rs`.

    use super::*;
    use vigil_store::{MemoryStore, keys};

    // -- Fakes ------------------------------------------------------------

    /// Notifier that counts calls.
    #[derive(Default)]
    struct CountingNotifier(AtomicU64);

    impl Notifier for CountingNotifier {
        fn notify(&self, _title: &str, _body: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Navigator that counts calls.
    #[derive(Default)]
    struct CountingNavigator(AtomicU64);

    impl Navigator for CountingNavigator {
        fn navigate(&self, _path: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn monitor_with_store(store: Arc<MemoryStore>) -> SessionMonitor {
        SessionMonitor::new(
            store,
            Arc::new(CountingNotifier::default()),
            Arc::new(CountingNavigator::default()),
        )
    }

    fn monitor() -> SessionMonitor {
        monitor_with_store(Arc::new(MemoryStore::new()))
    }

    // -- Construction -----------------------------------------------------

    #[test]
    fn test_new_monitor_starts_idle() {
        let m = monitor();

        assert_eq!(m.phase(), MonitorPhase::Idle);
        assert_eq!(m.stats(), MonitorStats::default());
        assert_eq!(m.config().timeout, MonitorConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_new_monitor_reads_timeout_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SESSION_TIMEOUT, "5");

        let m = monitor_with_store(store);

        assert_eq!(m.config().timeout, Duration::from_secs(300));
    }

    // -- Lifecycle --------------------------------------------------------

    #[tokio::test]
    async fn test_start_monitoring_becomes_active() {
        let m = monitor();

        m.start_monitoring();

        assert_eq!(m.phase(), MonitorPhase::Active);
    }

    #[tokio::test]
    async fn test_stop_monitoring_returns_to_idle() {
        let m = monitor();
        m.start_monitoring();

        m.stop_monitoring();

        assert_eq!(m.phase(), MonitorPhase::Idle);
    }

    #[test]
    fn test_stop_monitoring_when_idle_is_noop() {
        // No runtime needed: stopping without a live poll loop must not
        // spawn, panic, or change anything.
        let m = monitor();

        m.stop_monitoring();
        m.stop_monitoring();

        assert_eq!(m.phase(), MonitorPhase::Idle);
    }

    #[tokio::test]
    async fn test_start_monitoring_picks_up_reconfigured_timeout() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SESSION_TIMEOUT, "30");
        let m = monitor_with_store(Arc::clone(&store));
        m.start_monitoring();
        assert_eq!(m.config().timeout, Duration::from_secs(30 * 60));

        // The settings panel writes a new value between sessions.
        store.set(keys::SESSION_TIMEOUT, "10");
        m.start_monitoring();

        assert_eq!(m.config().timeout, Duration::from_secs(10 * 60));
        assert_eq!(m.phase(), MonitorPhase::Active);
    }

    // -- Checks outside Active --------------------------------------------

    #[test]
    fn test_check_expiry_when_idle_does_nothing() {
        let m = monitor();

        assert!(!m.check_expiry());
        assert_eq!(m.stats().checks, 0);
    }

    // -- Activity ---------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_record_activity_resets_idle_clock() {
        let m = monitor();

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(m.idle_for(), Duration::from_secs(40));

        m.record_activity();

        assert_eq!(m.idle_for(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_record_activity_keeps_last_timestamp() {
        // N overwrites behave exactly like one: only the latest matters.
        let m = monitor();

        for _ in 0..1000 {
            m.record_activity();
        }
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(m.idle_for(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recorder_updates_monitor() {
        let m = monitor();
        let recorder = m.recorder();

        tokio::time::sleep(Duration::from_secs(15)).await;
        recorder.observe(ActivityEvent::PointerDown);

        assert_eq!(m.idle_for(), Duration::ZERO);
        assert!(recorder.is_connected());
    }

    #[test]
    fn test_recorder_does_not_keep_monitor_alive() {
        let m = monitor();
        let recorder = m.recorder();

        drop(m);

        assert!(!recorder.is_connected());
        recorder.record(); // must be a no-op, not a panic
    }

    // -- Clones share state -----------------------------------------------

    #[tokio::test]
    async fn test_clones_share_lifecycle() {
        let m = monitor();
        let clone = m.clone();

        m.start_monitoring();

        assert_eq!(clone.phase(), MonitorPhase::Active);
        clone.stop_monitoring();
        assert_eq!(m.phase(), MonitorPhase::Idle);
    }
}
