//! The OpenWeather HTTP client.
//!
//! Requests `units=imperial` so temperatures arrive in Fahrenheit; humidity
//! is a 0–100 integer either way. Any transport error, non-2xx status, or
//! unparseable body maps to a [`FetchError`] — the caller decides whether
//! that skips the cycle. Error messages never include the API key.

use std::time::Duration;

use http_body_util::{BodyExt, Empty};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use tracing::debug;

use vane_core::{FetchError, WeatherReading, WeatherSource};

/// Production OpenWeather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Request timeout, covering connect, request, and body read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("weathervane/", env!("CARGO_PKG_VERSION"));

type HttpClient = Client<HttpsConnector<HttpConnector>, Empty<bytes::Bytes>>;

/// Fetches current conditions for a ZIP code.
pub struct OpenWeatherClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

/// The subset of the OpenWeather response we consume.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainSection,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
    humidity: u8,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpsConnector::new());
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_uri(&self, zip: &str) -> String {
        format!(
            "{}/data/2.5/weather?zip={},us&appid={}&units=imperial",
            self.base_url, zip, self.api_key
        )
    }

    async fn fetch_current(&self, zip: &str) -> Result<WeatherReading, FetchError> {
        let request = http::Request::builder()
            .method("GET")
            .uri(self.request_uri(zip))
            .header("user-agent", USER_AGENT)
            .body(Empty::new())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        debug!(%zip, "requesting current weather");

        let body = tokio::time::timeout(self.timeout, async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| FetchError::Connect(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            collect_body(response)
                .await
                .map_err(|e| FetchError::Body(e.to_string()))
        })
        .await
        .map_err(|_| FetchError::Timeout(self.timeout))??;

        let parsed: WeatherResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(WeatherReading {
            temperature_f: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            zip_code: zip.to_string(),
        })
    }
}

/// Read a response body to completion.
async fn collect_body(
    response: http::Response<hyper::body::Incoming>,
) -> Result<bytes::Bytes, hyper::Error> {
    Ok(response.into_body().collect().await?.to_bytes())
}

impl WeatherSource for OpenWeatherClient {
    fn fetch(
        &self,
        zip: &str,
    ) -> impl std::future::Future<Output = Result<WeatherReading, FetchError>> + Send {
        self.fetch_current(zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Abbreviated real OpenWeather response for ZIP 02134.
    const SAMPLE_BODY: &str = r#"{
        "coord": {"lon": -71.1251, "lat": 42.355},
        "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds"}],
        "main": {"temp": 45.2, "feels_like": 41.3, "pressure": 1016, "humidity": 65},
        "name": "Allston"
    }"#;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve one canned HTTP response on a loopback listener and return the
    /// base URL to reach it.
    async fn serve_once(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[test]
    fn response_parsing_extracts_temp_and_humidity() {
        let parsed: WeatherResponse = serde_json::from_str(SAMPLE_BODY).unwrap();
        assert_eq!(parsed.main.temp, 45.2);
        assert_eq!(parsed.main.humidity, 65);
    }

    #[test]
    fn request_uri_carries_zip_key_and_units() {
        let client = OpenWeatherClient::new("test-key");
        let uri = client.request_uri("02134");
        assert!(uri.starts_with(DEFAULT_BASE_URL));
        assert!(uri.contains("zip=02134,us"));
        assert!(uri.contains("appid=test-key"));
        assert!(uri.contains("units=imperial"));
    }

    #[tokio::test]
    async fn fetch_success_builds_reading() {
        let base = serve_once(http_response("200 OK", SAMPLE_BODY)).await;
        let client = OpenWeatherClient::new("test-key").with_base_url(base);

        let reading = client.fetch("02134").await.unwrap();
        assert_eq!(reading.temperature_f, 45.2);
        assert_eq!(reading.humidity_pct, 65);
        assert_eq!(reading.zip_code, "02134");
    }

    #[tokio::test]
    async fn fetch_non_2xx_is_status_error() {
        let body = r#"{"cod": 401, "message": "Invalid API key"}"#;
        let base = serve_once(http_response("401 Unauthorized", body)).await;
        let client = OpenWeatherClient::new("bad-key").with_base_url(base);

        let err = client.fetch("02134").await.unwrap_err();
        assert!(matches!(err, FetchError::Status(401)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_malformed_body_is_malformed_error() {
        let base = serve_once(http_response("200 OK", r#"{"unexpected": true}"#)).await;
        let client = OpenWeatherClient::new("test-key").with_base_url(base);

        let err = client.fetch("02134").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_refused_connection_is_connect_error() {
        // Port 1 is not listening.
        let client = OpenWeatherClient::new("test-key").with_base_url("http://127.0.0.1:1");

        let err = client.fetch("02134").await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_slow_server_times_out() {
        // Accept the connection but never respond.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = OpenWeatherClient::new("test-key")
            .with_base_url(format!("http://{addr}"))
            .with_timeout(Duration::from_millis(100));

        let err = client.fetch("02134").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_error_does_not_leak_api_key() {
        let client = OpenWeatherClient::new("sekrit-key").with_base_url("http://127.0.0.1:1");
        let err = client.fetch("02134").await.unwrap_err();
        assert!(!err.to_string().contains("sekrit-key"));
    }
}
