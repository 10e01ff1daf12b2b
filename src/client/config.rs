//! Client settings and preferences.
//!
//! Everything the front end used to keep in scattered local-storage keys
//! lives in one [`ClientConfig`], persisted as a JSON file. Keys:
//!
//! | key | default | meaning |
//! |---|---|---|
//! | `api_base_url` | `http://127.0.0.1:3000` | backend root URL |
//! | `request_timeout_secs` | `60` | per-request timeout |
//! | `autosave` | `every_turn` | when history is pushed to the server |
//! | `title_max_chars` | `30` | characters kept in derived titles |
//! | `preferences.background` | `null` | chosen background |
//! | `preferences.consent_accepted` | `false` | consent banner dismissed |
//! | `auth` | `null` | `{ token, display_name }` after sign-in |

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{ClientError, ClientResult};
use crate::conversation::DEFAULT_TITLE_MAX_CHARS;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "PERNAI_API_URL";

/// When the conversation list is pushed to the history service.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosavePolicy {
    /// After every assistant reply, when signed in.
    #[default]
    EveryTurn,
    /// Only when the caller asks for it.
    Manual,
}

/// Opaque credentials handed back by a login flow.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token, stored verbatim.
    pub token: String,
    /// Name shown in the UI.
    pub display_name: String,
}

/// Presentation preferences.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Selected background (preset name or image reference).
    pub background: Option<String>,
    /// Whether the consent notice was accepted.
    pub consent_accepted: bool,
}

/// Top-level client configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root URL.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// History push policy.
    pub autosave: AutosavePolicy,
    /// Characters kept from the first message in a derived title.
    pub title_max_chars: usize,
    /// Presentation preferences.
    pub preferences: Preferences,
    /// Signed-in session, if any.
    pub auth: Option<AuthSession>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 60,
            autosave: AutosavePolicy::EveryTurn,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            preferences: Preferences::default(),
            auth: None,
        }
    }
}

impl ClientConfig {
    /// Set the backend URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the autosave policy.
    #[must_use]
    pub const fn with_autosave(mut self, autosave: AutosavePolicy) -> Self {
        self.autosave = autosave;
        self
    }

    /// Set the signed-in session.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthSession) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Bearer token of the signed-in session.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api_base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "api_base_url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.title_max_chars == 0 {
            return Err(ClientError::InvalidConfig(
                "title_max_chars must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from a JSON file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> ClientResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }
}
