//! Dry-run metrics sink — logs what would have been submitted.

use std::future::Future;

use tracing::info;

use vane_core::{MetricSample, MetricsSink, SubmitError};

/// Accepts every sample without any network call.
pub struct DryRunSink;

impl MetricsSink for DryRunSink {
    fn submit(
        &self,
        samples: &[MetricSample],
    ) -> impl Future<Output = Result<(), SubmitError>> + Send {
        for sample in samples {
            info!(metric = sample.name, value = sample.value, "dry-run: gauge not submitted");
        }
        std::future::ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vane_core::{TEMPERATURE_METRIC, WeatherReading};

    #[tokio::test]
    async fn accepts_all_samples() {
        let reading = WeatherReading {
            temperature_f: 45.2,
            humidity_pct: 65,
            zip_code: "02134".to_string(),
        };
        let samples = reading.samples();
        assert_eq!(samples[0].name, TEMPERATURE_METRIC);
        DryRunSink.submit(&samples).await.unwrap();
    }
}
