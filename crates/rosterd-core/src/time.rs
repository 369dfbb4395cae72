//! Time abstraction for testable timestamps.
//!
//! Handlers that stamp responses take a [`Clock`] instead of calling
//! `Utc::now()` directly, so tests can pin time to a known value with
//! [`TestClock`].

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Starts at a fixed instant and only moves when [`advance`](Self::advance)
/// is called. Clones share the same offset, so a clock handed to a handler
/// can be advanced from the test body.
#[derive(Debug, Clone)]
pub struct TestClock {
    start: DateTime<Utc>,
    offset_ms: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a clock pinned to 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::with_start_time(DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default())
    }

    /// Creates a clock starting at the given instant.
    pub fn with_start_time(start: DateTime<Utc>) -> Self {
        Self { start, offset_ms: Arc::new(AtomicU64::new(0)) }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Total time advanced since the start instant.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let offset = self.offset_ms.load(Ordering::SeqCst);
        self.start + chrono::Duration::milliseconds(offset as i64)
    }
}
