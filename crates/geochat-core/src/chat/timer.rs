//! Session inactivity timer.
//!
//! A countdown with one-second ticks that fires once after the configured
//! number of minutes. Restarting or cancelling discards the running
//! countdown; an expiry already posted by a discarded countdown is ignored.
//!
//! A duration of zero minutes disables the timeout: `start(0)` resets the
//! tick counter but never fires.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Tick granularity.
pub const TICK: Duration = Duration::from_secs(1);

const SECONDS_PER_MINUTE: u64 = 60;

struct Countdown {
    generation: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Resettable countdown owned by the session controller.
pub struct SessionTimer {
    duration_minutes: u32,
    elapsed: Arc<AtomicU64>,
    generation: u64,
    countdown: Option<Countdown>,
    expired_tx: mpsc::UnboundedSender<u64>,
    expired_rx: mpsc::UnboundedReceiver<u64>,
}

impl SessionTimer {
    pub fn new() -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        Self {
            duration_minutes: 0,
            elapsed: Arc::new(AtomicU64::new(0)),
            generation: 0,
            countdown: None,
            expired_tx,
            expired_rx,
        }
    }

    /// Start counting from zero, replacing any running countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, duration_minutes: u32) {
        self.cancel();
        self.duration_minutes = duration_minutes;
        self.elapsed = Arc::new(AtomicU64::new(0));

        if duration_minutes == 0 {
            debug!("session timeout disabled");
            return;
        }

        self.generation += 1;
        let limit = u64::from(duration_minutes) * SECONDS_PER_MINUTE;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_countdown(
            self.generation,
            limit,
            Arc::clone(&self.elapsed),
            cancel.clone(),
            self.expired_tx.clone(),
        ));

        debug!(
            minutes = duration_minutes,
            generation = self.generation,
            "session timer started"
        );
        self.countdown = Some(Countdown {
            generation: self.generation,
            cancel,
            handle,
        });
    }

    /// Stop the running countdown. No-op when idle.
    pub fn cancel(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel.cancel();
            debug!(generation = countdown.generation, "session timer cancelled");
        }
    }

    /// Whether a countdown is still ticking.
    pub fn is_running(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(|countdown| !countdown.handle.is_finished())
    }

    /// Seconds counted since the last `start`.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    /// Duration passed to the last `start`, in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Resolves when the current countdown reaches its limit.
    ///
    /// Pends forever while no countdown is active. Cancel safe: an expiry is
    /// only consumed in the same poll that observes it.
    pub async fn expired(&mut self) {
        while let Some(generation) = self.expired_rx.recv().await {
            let current = self
                .countdown
                .as_ref()
                .is_some_and(|countdown| countdown.generation == generation);
            if current {
                self.countdown = None;
                debug!(generation, "session timer expired");
                return;
            }
            trace!(generation, "discarding stale timer expiry");
        }
        // The sender lives in `self`, so the channel never closes.
        std::future::pending::<()>().await;
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("duration_minutes", &self.duration_minutes)
            .field("elapsed_ticks", &self.elapsed_ticks())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_countdown(
    generation: u64,
    limit: u64,
    elapsed: Arc<AtomicU64>,
    cancel: CancellationToken,
    expired: mpsc::UnboundedSender<u64>,
) {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            _ = ticker.tick() => {
                let ticks = elapsed.fetch_add(1, Ordering::Relaxed) + 1;
                trace!(generation, ticks, "session tick");
                if ticks >= limit {
                    let _ = expired.send(generation);
                    return;
                }
            }
        }
    }
}
