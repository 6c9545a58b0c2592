use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use log::debug;

/// Time source for the ticker. Swapped for a manual clock in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Cloneable flag that ends the ticker loop at its next poll.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Fires once immediately, then whenever `interval` has passed since the last firing.
///
/// Due checks happen every `poll`; there is no catch-up, a late check fires once.
pub struct Ticker {
    clock: Arc<dyn Clock>,
    interval: Duration,
    poll: Duration,
    next_due: Option<Instant>,
    stop: StopHandle,
}

impl Ticker {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration, poll: Duration) -> Self {
        Self {
            clock,
            interval,
            poll,
            next_due: None,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.next_due {
            None => true,
            Some(due) => now >= due,
        }
    }

    /// Waits until the next tick is due and claims it. Returns `false` once stopped.
    pub async fn wait_for_tick(&mut self) -> bool {
        loop {
            if self.stop.is_stopped() {
                return false;
            }
            let now = self.clock.now();
            if self.is_due(now) {
                self.next_due = Some(now + self.interval);
                debug!("Tick due, next in {:?}", self.interval);
                return true;
            }
            self.clock.sleep(self.poll).await;
        }
    }
}
