//! vane-core — shared foundation for the weathervane agent.
//!
//! Defines the domain model (weather readings and gauge samples), the
//! environment-variable configuration contract, the error taxonomy, and the
//! `WeatherSource` / `MetricsSink` traits the poller is driven through.
//!
//! The HTTP clients in `vane-openweather` and `vane-datadog` implement the
//! traits; `vane-poller` consumes them. This crate has no I/O of its own
//! beyond reading the process environment and an optional env file.

pub mod config;
pub mod error;
pub mod model;
pub mod traits;

pub use config::Config;
pub use error::{ConfigError, FetchError, SubmitError};
pub use model::{HUMIDITY_METRIC, MetricSample, TEMPERATURE_METRIC, WeatherReading};
pub use traits::{MetricsSink, WeatherSource};
