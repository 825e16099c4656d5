use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic wall-clock source in milliseconds.
///
/// Every playback instance participating in a shared session reads the same
/// clock domain. The value must never reset or jump backwards while a sync
/// attempt is in flight.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Clock backed by `std::time::Instant`, anchored at construction.
///
/// Copies share the same anchor, so a copy handed to a worker thread stays in
/// the same time domain as the one kept by the caller.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Manually advanced clock for tests and deterministic simulation.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// worker thread and advance the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
