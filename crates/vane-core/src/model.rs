//! Domain model — one reading in, two gauge samples out.

/// Metric name for the outside temperature gauge.
pub const TEMPERATURE_METRIC: &str = "environment.temperature.outside";

/// Metric name for the outside humidity gauge.
pub const HUMIDITY_METRIC: &str = "environment.humidity.outside";

/// One weather observation, built per poll cycle and discarded after
/// its samples are submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: f64,
    /// Relative humidity, 0–100.
    pub humidity_pct: u8,
    /// The ZIP code the reading was fetched for.
    pub zip_code: String,
}

/// A point-in-time gauge value. The timestamp is taken at submission.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: &'static str,
    pub value: f64,
}

impl WeatherReading {
    /// The two gauge samples for this reading, temperature first.
    ///
    /// Submission order is part of the contract: a cycle emits either both
    /// samples in this order or none at all.
    pub fn samples(&self) -> [MetricSample; 2] {
        [
            MetricSample {
                name: TEMPERATURE_METRIC,
                value: self.temperature_f,
            },
            MetricSample {
                name: HUMIDITY_METRIC,
                value: f64::from(self.humidity_pct),
            },
        ]
    }
}
