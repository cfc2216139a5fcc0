// User settings: config.toml in the patfolio config directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use patfolio_recon::{Category, Vocabulary};

/// PatentsView rejects larger pages.
const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid setting: {0}")]
    Invalid(String),
    #[error("invalid category vocabulary: {0}")]
    Vocabulary(String),
}

/// `[source]`: the patent search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub base_url: String,
    pub page_size: u32,
    /// Page-count ceiling per query.
    pub max_pages: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://search.patentsview.org".into(),
            page_size: 100,
            max_pages: 10,
            retry_backoff_ms: 2000,
            timeout_secs: 30,
            api_key_env: "PATENTSVIEW_API_KEY".into(),
        }
    }
}

impl SourceSettings {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[profile]`: the upload target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub api_base: String,
    /// Pause between creation calls.
    pub delay_ms: u64,
    pub client_id: Option<String>,
    pub redirect_uri: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.linkedin.com/v2".into(),
            delay_ms: 1000,
            client_id: None,
            redirect_uri: "http://localhost:8080/callback".into(),
        }
    }
}

impl ProfileSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Whole settings file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub profile: ProfileSettings,
    /// `[[category]]` tables. Empty means the built-in vocabulary.
    #[serde(rename = "category")]
    pub categories: Vec<Category>,
}

impl Settings {
    /// Default settings file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("patfolio").join("config.toml"))
    }

    /// Load settings.
    ///
    /// An explicit path must exist. The default path falls back to built-in
    /// defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings = Self::parse(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: "config".into(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.source;
        if s.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url is empty".into()));
        }
        if s.page_size == 0 || s.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "source.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, s.page_size
            )));
        }
        if s.max_pages == 0 {
            return Err(ConfigError::Invalid("source.max_pages must be at least 1".into()));
        }
        if s.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be at least 1".into()));
        }
        if self.profile.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("profile.api_base is empty".into()));
        }
        Ok(())
    }

    /// Category vocabulary: the `[[category]]` tables when present, else
    /// the built-in one.
    pub fn vocabulary(&self) -> Result<Vocabulary, ConfigError> {
        if self.categories.is_empty() {
            return Ok(Vocabulary::default());
        }
        Vocabulary::new(self.categories.clone()).map_err(|e| ConfigError::Vocabulary(e.to_string()))
    }
}
