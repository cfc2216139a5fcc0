//! OAuth2 authorization-code helper and token storage.
//!
//! Reads/writes ~/.config/patfolio/profile_auth.json (0600 on Unix).
//! No browser handling: the caller prints the authorization URL and passes
//! the code from the redirect back in.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

pub const AUTHORIZATION_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
pub const TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const SCOPES: &[&str] = &["r_liteprofile", "w_member_social", "profile:edit"];

/// Access token as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCredentials {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl ProfileCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
            scope: None,
        }
    }

    /// A token without a recorded expiry is assumed valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}

// ── OAuth app ───────────────────────────────────────────────────────

/// Registered application used for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    authorization_url: String,
    token_url: String,
}

impl OAuthApp {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            authorization_url: AUTHORIZATION_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.trim().is_empty());
        self
    }

    /// Override both OAuth endpoints (tests point these at a mock server).
    pub fn with_endpoints(mut self, authorization_url: &str, token_url: &str) -> Self {
        self.authorization_url = authorization_url.to_string();
        self.token_url = token_url.to_string();
        self
    }

    /// URL the user opens to grant access.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.authorization_url)
            .map_err(|e| ProfileError::Validation(format!("invalid authorization URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Trade the authorization code from the redirect for an access token.
    pub fn exchange_code(&self, http: &reqwest::blocking::Client, code: &str) -> Result<ProfileCredentials> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ProfileError::Validation("authorization code is empty".into()));
        }
        let secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| ProfileError::Validation("client secret is required to exchange a code".into()))?;

        let resp = http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", secret),
            ])
            .send()
            .map_err(|e| ProfileError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
            let msg = body["error_description"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .unwrap_or("unknown error");
            return Err(ProfileError::Http(status, format!("token exchange failed: {}", msg)));
        }

        let body: serde_json::Value = resp
            .json()
            .map_err(|e| ProfileError::Parse(format!("token response: {}", e)))?;
        let access_token = body["access_token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProfileError::Parse("missing access_token in token response".into()))?;

        tracing::info!("authorization code exchanged for access token");
        Ok(ProfileCredentials {
            access_token: access_token.to_string(),
            expires_at: body["expires_in"].as_i64().map(|secs| Utc::now() + Duration::seconds(secs)),
            scope: body["scope"].as_str().map(String::from),
        })
    }
}

// ── Storage ─────────────────────────────────────────────────────────

/// Returns the path to the profile credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("patfolio").join("profile_auth.json"))
}

/// Load saved credentials. `None` when nothing is saved or the file is invalid.
pub fn load_auth() -> Option<ProfileCredentials> {
    load_auth_from(&auth_file_path()?)
}

pub fn load_auth_from(path: &Path) -> Option<ProfileCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable credentials file");
            None
        }
    }
}

/// Save credentials to the default location and return the path written.
pub fn save_auth(creds: &ProfileCredentials) -> Result<PathBuf> {
    let path = auth_file_path().ok_or_else(|| ProfileError::Io("could not determine config directory".into()))?;
    save_auth_to(&path, creds)?;
    Ok(path)
}

/// Creates the parent directory if needed. Sets 0600 permissions on Unix.
pub fn save_auth_to(path: &Path, creds: &ProfileCredentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ProfileError::Io(format!("failed to create config directory: {}", e)))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| ProfileError::Parse(format!("failed to serialize credentials: {}", e)))?;
    std::fs::write(path, contents).map_err(|e| ProfileError::Io(format!("failed to write auth file: {}", e)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| ProfileError::Io(format!("failed to set file permissions: {}", e)))?;
    }

    Ok(())
}

pub fn delete_auth() -> Result<()> {
    let Some(path) = auth_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| ProfileError::Io(format!("failed to delete auth file: {}", e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn app(server: &MockServer) -> OAuthApp {
        OAuthApp::new("cid", DEFAULT_REDIRECT_URI)
            .with_client_secret(Some("shh".into()))
            .with_endpoints(&server.url("/oauth/v2/authorization"), &server.url("/oauth/v2/accessToken"))
    }

    #[test]
    fn test_authorization_url() {
        let url = OAuthApp::new("my-client", DEFAULT_REDIRECT_URI)
            .authorization_url("xyz")
            .unwrap();
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("www.linkedin.com"));
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("client_id".into(), "my-client".into())));
        assert!(pairs.contains(&("redirect_uri".into(), DEFAULT_REDIRECT_URI.into())));
        assert!(pairs.contains(&("scope".into(), "r_liteprofile w_member_social profile:edit".into())));
        assert!(pairs.contains(&("state".into(), "xyz".into())));
    }

    #[test]
    fn test_exchange_code() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/v2/accessToken")
                .header("content-type", "application/x-www-form-urlencoded");
            then.status(200).json_body(serde_json::json!({
                "access_token": "tok-1",
                "expires_in": 5184000,
                "scope": "r_liteprofile,w_member_social"
            }));
        });

        let http = reqwest::blocking::Client::new();
        let creds = app(&server).exchange_code(&http, " the-code ").unwrap();
        mock.assert();
        assert_eq!(creds.access_token, "tok-1");
        assert!(!creds.is_expired(Utc::now()));
        assert!(creds.scope.is_some());
    }

    #[test]
    fn test_exchange_code_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/v2/accessToken");
            then.status(400).json_body(serde_json::json!({
                "error": "invalid_request",
                "error_description": "authorization code expired"
            }));
        });

        let http = reqwest::blocking::Client::new();
        match app(&server).exchange_code(&http, "old").unwrap_err() {
            ProfileError::Http(400, msg) => assert!(msg.contains("authorization code expired")),
            other => panic!("expected Http(400), got {other:?}"),
        }
    }

    #[test]
    fn test_exchange_requires_secret_and_code() {
        let http = reqwest::blocking::Client::new();
        let no_secret = OAuthApp::new("cid", DEFAULT_REDIRECT_URI);
        assert!(matches!(no_secret.exchange_code(&http, "c"), Err(ProfileError::Validation(_))));
        let with_secret = no_secret.with_client_secret(Some("s".into()));
        assert!(matches!(with_secret.exchange_code(&http, "  "), Err(ProfileError::Validation(_))));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut creds = ProfileCredentials::new("t");
        assert!(!creds.is_expired(now));
        creds.expires_at = Some(now - Duration::seconds(1));
        assert!(creds.is_expired(now));
    }

    #[test]
    fn test_auth_file_path() {
        let path = auth_file_path().unwrap();
        assert!(path.ends_with("patfolio/profile_auth.json"));
    }

    #[test]
    fn test_save_and_load_auth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile_auth.json");

        let creds = ProfileCredentials::new("tok123");
        save_auth_to(&path, &creds).unwrap();
        assert_eq!(load_auth_from(&path), Some(creds));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile_auth.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_auth_from(&path).is_none());
        assert!(load_auth_from(&dir.path().join("missing.json")).is_none());
    }
}
