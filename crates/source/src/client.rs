//! HTTP client with a single fixed-backoff retry.

use std::thread;
use std::time::Duration;

use crate::error::{Result, SourceError};

// ── Constants ───────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://search.patentsview.org";
const PATENT_ENDPOINT: &str = "api/v1/patent/";
const USER_AGENT: &str = concat!("patfolio/", env!("CARGO_PKG_VERSION"));

/// One try plus one retry.
const MAX_ATTEMPTS: u32 = 2;

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Fixed wait before the retry. Not doubled.
    pub retry_backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            retry_backoff: Duration::from_secs(2),
        }
    }
}

// ── SourceClient ────────────────────────────────────────────────────

/// Blocking PatentsView client.
///
/// Every failure mode (non-2xx status, timeout, connection error) is
/// retried exactly once after `retry_backoff`; a second failure becomes
/// [`SourceError::SourceUnavailable`]. A 2xx body that is not JSON fails
/// immediately with [`SourceError::Parse`].
pub struct SourceClient {
    http: reqwest::blocking::Client,
    endpoint: url::Url,
    api_key: Option<String>,
    retry_backoff: Duration,
}

impl SourceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = url::Url::parse(&config.base_url)
            .map_err(|e| SourceError::Config(format!("invalid base URL {:?}: {}", config.base_url, e)))?;
        let endpoint = ensure_trailing_slash(base)
            .join(PATENT_ENDPOINT)
            .map_err(|e| SourceError::Config(format!("invalid endpoint: {}", e)))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            retry_backoff: config.retry_backoff,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// GET the patent endpoint with the given query parameters.
    pub fn get_patents(&self, params: &[(&str, String)]) -> Result<serde_json::Value> {
        self.request_with_retry(|http| {
            let mut req = http.get(self.endpoint.as_str()).query(params);
            if let Some(ref key) = self.api_key {
                req = req.header("X-Api-Key", key.as_str());
            }
            req
        })
    }

    /// Send a request, retrying once with a fixed delay.
    ///
    /// `build_request` is called once per attempt and must return a fully
    /// configured `RequestBuilder` (URL, auth, headers, query params).
    fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value> {
        let mut attempt = 1;

        loop {
            let failure = match build_request(&self.http).send() {
                Ok(resp) if resp.status().is_success() => return parse_body(resp),
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
                    format!("HTTP {}: {}", status, extract_error(&body, status))
                }
                Err(e) => e.to_string(),
            };

            if attempt >= MAX_ATTEMPTS {
                return Err(SourceError::SourceUnavailable {
                    attempts: attempt,
                    message: failure,
                });
            }

            tracing::warn!(
                attempt,
                max_attempts = MAX_ATTEMPTS,
                wait_ms = self.retry_backoff.as_millis() as u64,
                error = %failure,
                "patent source request failed, retrying"
            );
            thread::sleep(self.retry_backoff);
            attempt += 1;
        }
    }
}

fn parse_body(resp: reqwest::blocking::Response) -> Result<serde_json::Value> {
    let text = resp
        .text()
        .map_err(|e| SourceError::Parse(format!("failed to read response body: {}", e)))?;
    let trimmed = text.trim_start_matches('\u{feff}');
    serde_json::from_str(trimmed).map_err(|e| {
        SourceError::Parse(format!(
            "invalid JSON: {} (body: {})",
            e,
            trimmed.chars().take(200).collect::<String>(),
        ))
    })
}

/// PatentsView reports failures as `{"error": true, "message": "..."}` or
/// `{"detail": "..."}`.
fn extract_error(body: &serde_json::Value, status: u16) -> String {
    body["message"]
        .as_str()
        .or_else(|| body["detail"].as_str())
        .or_else(|| body["error"].as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("status {}", status))
}

fn ensure_trailing_slash(mut url: url::Url) -> url::Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
