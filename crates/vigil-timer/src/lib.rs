//! Cancellable repeating-task primitive for Vigil.
//!
//! Provides [`spawn`], which runs an async closure once per period on a
//! background task and returns a [`RepeatingTask`] handle. The handle IS
//! the loop: dropping it cancels the task, so "at most one timer alive"
//! becomes an ownership question rather than a flag to keep in sync.
//!
//! # Integration
//!
//! The session layer stores the handle in an `Option`:
//!
//! ```ignore
//! // Starting monitoring replaces (and thereby cancels) any prior loop.
//! lifecycle.poll.replace(vigil_timer::spawn(config, move || check()));
//!
//! // Stopping takes the handle out; dropping it stops the loop.
//! lifecycle.poll.take();
//! ```
//!
//! Cancellation is observed between runs. A run already in progress
//! completes before the loop exits, which makes it safe for the running
//! closure itself to drop the handle (the expiry path does exactly that).

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a run takes longer than the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedTick {
    /// Skip the missed run(s) and resume the cadence from now.
    /// Safest default — a slow run cannot cause a burst of catch-up runs.
    #[default]
    Skip,
    /// Delay subsequent runs, keeping the full period between them.
    Delay,
    /// Run the missed run(s) back-to-back to catch up.
    Burst,
}

impl MissedTick {
    fn behavior(self) -> MissedTickBehavior {
        match self {
            Self::Skip => MissedTickBehavior::Skip,
            Self::Delay => MissedTickBehavior::Delay,
            Self::Burst => MissedTickBehavior::Burst,
        }
    }
}

/// Full configuration for a repeating task.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Time between runs. The first run happens one full period after
    /// spawn; there is no immediate run.
    pub period: Duration,
    /// Overrun handling policy.
    pub missed_tick: MissedTick,
}

impl TimerConfig {
    /// Shortest supported period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Create a config for a specific period with default settings.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            missed_tick: MissedTick::default(),
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`spawn`]. A zero period is a programming
    /// error upstream; clamping to [`Self::MIN_PERIOD`] keeps the
    /// primitive total instead of panicking inside the interval timer.
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_us = self.period.as_micros() as u64,
                "repeating-task period below minimum — clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// RepeatingTask
// ---------------------------------------------------------------------------

/// Ownership handle for one spawned repeating task.
///
/// Dropping the handle cancels the loop; [`cancel`](Self::cancel) is the
/// explicit spelling of the same thing. Because the handle is the only
/// way to keep the loop alive, replacing a stored handle with a new one
/// cancels the predecessor automatically.
pub struct RepeatingTask {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    /// Stops the loop. A run currently in progress completes first.
    pub fn cancel(mut self) {
        self.send_cancel();
    }

    /// Whether the background loop has fully exited.
    ///
    /// Cancellation is asynchronous: this may still be `false`
    /// immediately after [`cancel`](Self::cancel) returns.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    fn send_cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            // The receiver resolves on send AND on sender drop, so the
            // loop observes either form of cancellation.
            let _ = tx.send(());
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.send_cancel();
    }
}

impl std::fmt::Debug for RepeatingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepeatingTask")
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// spawn
// ---------------------------------------------------------------------------

/// Spawns a background task that runs `work` once per configured period.
///
/// The first run happens one full period after spawn. The returned
/// [`RepeatingTask`] must be held for the loop to keep running.
///
/// Must be called from within a tokio runtime.
pub fn spawn<F, Fut>(config: TimerConfig, mut work: F) -> RepeatingTask
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let config = config.validated();
    let period = config.period;
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        // interval_at skips tokio's immediate first tick: the loop's
        // first run lands a full period from now.
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(config.missed_tick.behavior());

        loop {
            tokio::select! {
                _ = &mut cancel_rx => break,
                _ = ticker.tick() => {
                    trace!("repeating task fired");
                    work().await;
                }
            }
        }
        debug!("repeating task stopped");
    });

    debug!(
        period_ms = period.as_millis() as u64,
        policy = ?config.missed_tick,
        "repeating task spawned"
    );

    RepeatingTask {
        cancel: Some(cancel_tx),
        handle,
    }
}

// =========================================================================
// Tests
// =========================================================================
