//! Inter-cycle delay with backoff on repeated fetch failures.

use std::time::Duration;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Tracks consecutive fetch failures and the resulting inter-cycle delay.
///
/// Each failure doubles the delay up to a cap; the cap never drops below
/// the base interval. Submit failures do not feed this tracker — only the
/// weather fetch drives backoff.
#[derive(Debug)]
pub struct FetchBackoff {
    base: Duration,
    max: Duration,
    current: Duration,
    consecutive_failures: u32,
}

impl FetchBackoff {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            max: MAX_BACKOFF.max(base),
            current: base,
            consecutive_failures: 0,
        }
    }

    /// Delay to apply before the next cycle.
    pub fn delay(&self) -> Duration {
        self.current
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.current = self.base;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.current = (self.current * 2).min(self.max);
    }
}
