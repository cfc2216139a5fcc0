//! Profile patents HTTP client.
//!
//! Blocking reqwest client. Three calls: resolve the member id, list the
//! patents already on the profile, create one patent entry.

use std::time::Duration;

use crate::auth::{load_auth, ProfileCredentials};
use crate::error::{ProfileError, Result};
use crate::payload::PatentPayload;

pub const DEFAULT_API_BASE: &str = "https://api.linkedin.com/v2";
const RESTLI_HEADER: &str = "X-Restli-Protocol-Version";
const RESTLI_VERSION: &str = "2.0.0";

/// A patent already present on the profile. Only the fields used for
/// duplicate detection are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotePatent {
    pub number: Option<String>,
    pub title: Option<String>,
}

impl RemotePatent {
    fn from_element(element: &serde_json::Value) -> Self {
        Self {
            number: text_field(&element["number"]),
            title: text_field(&element["title"]),
        }
    }
}

/// Profile API client (blocking).
#[derive(Clone)]
pub struct ProfileClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl ProfileClient {
    /// Create a client using the saved access token.
    pub fn from_saved_auth(api_base: &str) -> Result<Self> {
        let creds = load_auth().ok_or(ProfileError::NotAuthenticated)?;
        if creds.is_expired(chrono::Utc::now()) {
            tracing::warn!("saved access token has expired");
            return Err(ProfileError::NotAuthenticated);
        }
        Self::new(api_base, &creds)
    }

    pub fn new(api_base: &str, creds: &ProfileCredentials) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("patfolio/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ProfileError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: creds.access_token.clone(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Member id of the authenticated user.
    pub fn profile_id(&self) -> Result<String> {
        let url = format!("{}/people/~", self.api_base);
        let json: serde_json::Value = self
            .get(&url)?
            .json()
            .map_err(|e| ProfileError::Parse(e.to_string()))?;
        text_field(&json["id"]).ok_or_else(|| ProfileError::Parse("missing id in profile response".into()))
    }

    /// Patents already listed on the profile.
    pub fn list_patents(&self, profile_id: &str) -> Result<Vec<RemotePatent>> {
        let url = self.patents_url(profile_id);
        let json: serde_json::Value = self
            .get(&url)?
            .json()
            .map_err(|e| ProfileError::Parse(e.to_string()))?;

        let patents = json["elements"]
            .as_array()
            .map(|elements| elements.iter().map(RemotePatent::from_element).collect())
            .unwrap_or_default();
        Ok(patents)
    }

    pub fn create_patent(&self, profile_id: &str, payload: &PatentPayload) -> Result<()> {
        let url = self.patents_url(profile_id);
        let body = serde_json::to_value(payload).map_err(|e| ProfileError::Parse(e.to_string()))?;
        self.post_json(&url, &body)?;
        Ok(())
    }

    fn patents_url(&self, profile_id: &str) -> String {
        format!("{}/people/{}/patents", self.api_base, profile_id)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .send()
            .map_err(|e| ProfileError::Network(e.to_string()))?;
        check_status(response)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<reqwest::blocking::Response> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(RESTLI_HEADER, RESTLI_VERSION)
            .json(body)
            .send()
            .map_err(|e| ProfileError::Network(e.to_string()))?;
        check_status(response)
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    match status {
        401 => Err(ProfileError::NotAuthenticated),
        400 | 422 => Err(ProfileError::Validation(error_message(&body))),
        _ => Err(ProfileError::Http(status, error_message(&body))),
    }
}

/// Profile API errors look like `{"message": "...", "status": 403}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Plain string, number, or a localized object (`{"localized": {"en_US": "..."}}`).
fn text_field(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Object(map) => map
            .get("localized")
            .and_then(|l| l.as_object())
            .and_then(|l| l.values().find_map(|v| v.as_str()))
            .map(String::from)?,
        _ => return None,
    };
    Some(text).filter(|t| !t.trim().is_empty())
}
