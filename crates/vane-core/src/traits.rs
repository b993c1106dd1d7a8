//! Client seams the poller is driven through.
//!
//! The real implementations live in `vane-openweather` and `vane-datadog`;
//! tests substitute in-memory mocks. Both traits use explicit
//! `impl Future + Send` returns so the poller can hold them across awaits
//! inside spawned tasks.

use std::future::Future;

use crate::error::{FetchError, SubmitError};
use crate::model::{MetricSample, WeatherReading};

/// A source of current weather readings.
pub trait WeatherSource: Send + Sync {
    /// Fetch the current reading for a US ZIP code.
    fn fetch(
        &self,
        zip: &str,
    ) -> impl Future<Output = Result<WeatherReading, FetchError>> + Send;
}

/// A sink gauge samples are forwarded to.
pub trait MetricsSink: Send + Sync {
    /// Submit samples in slice order. Implementations stop at the first
    /// failure so a batch is never partially interleaved.
    fn submit(
        &self,
        samples: &[MetricSample],
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}
