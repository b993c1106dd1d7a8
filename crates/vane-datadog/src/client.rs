//! The Datadog HTTP client.
//!
//! Auth travels in the `DD-API-KEY` / `DD-APPLICATION-KEY` headers, never
//! in the URL, so endpoint overrides and error messages stay key-free.
//! A batch stops at the first failed POST: the poller's contract is that a
//! cycle submits either every sample or none after the failure point, and
//! with two samples that means zero-or-two.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use tracing::info;

use vane_core::{MetricSample, MetricsSink, SubmitError};

/// Production Datadog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.datadoghq.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("weathervane/", env!("CARGO_PKG_VERSION"));

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Submits gauge series to Datadog.
pub struct DatadogClient {
    client: HttpClient,
    api_key: String,
    app_key: String,
    base_url: String,
    timeout: Duration,
}

/// Body of `POST /api/v1/series`.
#[derive(Debug, Serialize)]
struct SeriesPayload<'a> {
    series: [Series<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Series<'a> {
    metric: &'a str,
    /// `[[epoch_seconds, value]]` — one point per submission.
    points: [(u64, f64); 1],
    #[serde(rename = "type")]
    kind: &'static str,
}

impl DatadogClient {
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpsConnector::new());
        Self {
            client,
            api_key: api_key.into(),
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Point the client at a different endpoint (tests, EU site).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configured credentials against `/api/v1/validate`.
    ///
    /// Distinguishes an explicit rejection ([`SubmitError::Unauthorized`])
    /// from a transport failure so the caller can treat only the former as
    /// fatal at startup.
    pub async fn validate(&self) -> Result<(), SubmitError> {
        let request = http::Request::builder()
            .method("GET")
            .uri(format!("{}/api/v1/validate", self.base_url))
            .header("user-agent", USER_AGENT)
            .header("DD-API-KEY", &self.api_key)
            .body(Full::new(Bytes::new()))
            .map_err(|e| SubmitError::InvalidUrl(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| SubmitError::Timeout(self.timeout))?
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => Ok(()),
            401 | 403 => Err(SubmitError::Unauthorized(status.as_u16())),
            code => Err(SubmitError::Status {
                status: code,
                metric: "validate".to_string(),
            }),
        }
    }

    async fn submit_gauge(&self, name: &str, value: f64) -> Result<(), SubmitError> {
        let payload = SeriesPayload {
            series: [Series {
                metric: name,
                points: [(epoch_secs(), value)],
                kind: "gauge",
            }],
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| SubmitError::Transport(format!("failed to encode payload: {e}")))?;

        let request = http::Request::builder()
            .method("POST")
            .uri(format!("{}/api/v1/series", self.base_url))
            .header("user-agent", USER_AGENT)
            .header("content-type", "application/json")
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| SubmitError::InvalidUrl(e.to_string()))?;

        let status = tokio::time::timeout(self.timeout, async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            let status = response.status();
            drain(response).await;
            Ok(status)
        })
        .await
        .map_err(|_| SubmitError::Timeout(self.timeout))??;

        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                metric: name.to_string(),
            });
        }

        info!(metric = name, value, "submitted gauge");
        Ok(())
    }
}

impl MetricsSink for DatadogClient {
    fn submit(
        &self,
        samples: &[MetricSample],
    ) -> impl std::future::Future<Output = Result<(), SubmitError>> + Send {
        async move {
            for sample in samples {
                self.submit_gauge(sample.name, sample.value).await?;
            }
            Ok(())
        }
    }
}

/// Drain a response body so the connection can be reused.
async fn drain(response: http::Response<hyper::body::Incoming>) {
    let _ = response.into_body().collect().await;
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
