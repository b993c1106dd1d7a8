//! The poll cycle loop.
//!
//! Per cycle: fetch one weather reading, submit its two gauge samples, then
//! sleep. A failed fetch skips submission for the cycle; a failed
//! submission is logged and the cycle proceeds to its sleep. Neither
//! terminates the loop — only the shutdown signal does.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use vane_core::{MetricsSink, WeatherSource};

use crate::backoff::FetchBackoff;

/// Drives the fetch-submit-sleep cycle until shutdown.
pub struct Poller<W, M> {
    source: W,
    sink: M,
    zip_code: String,
    backoff: FetchBackoff,
    cycles: u64,
}

impl<W: WeatherSource, M: MetricsSink> Poller<W, M> {
    pub fn new(source: W, sink: M, zip_code: impl Into<String>, interval: Duration) -> Self {
        Self {
            source,
            sink,
            zip_code: zip_code.into(),
            backoff: FetchBackoff::new(interval),
            cycles: 0,
        }
    }

    /// Run until the shutdown channel flips (or its sender drops).
    ///
    /// The first cycle runs immediately; shutdown is observed both during
    /// the inter-cycle sleep and before each new cycle starts. Returns the
    /// number of cycles run.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!(zip = %self.zip_code, "poller started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.backoff.delay()) => {}
                // Resolves on signal or on a dropped sender; both stop the loop.
                _ = shutdown.changed() => break,
            }
        }

        info!(cycles = self.cycles, "poller stopped");
        self.cycles
    }

    async fn cycle(&mut self) {
        self.cycles += 1;
        let cycle = self.cycles;

        match self.source.fetch(&self.zip_code).await {
            Ok(reading) => {
                self.backoff.record_success();
                info!(
                    cycle,
                    temperature_f = reading.temperature_f,
                    humidity_pct = reading.humidity_pct,
                    "weather reading received"
                );

                let samples = reading.samples();
                if let Err(e) = self.sink.submit(&samples).await {
                    warn!(cycle, error = %e, "metric submission failed");
                }
            }
            Err(e) => {
                self.backoff.record_failure();
                warn!(
                    cycle,
                    error = %e,
                    consecutive_failures = self.backoff.consecutive_failures(),
                    next_delay_secs = self.backoff.delay().as_secs(),
                    "weather fetch failed, skipping submission"
                );
            }
        }
    }
}
