//! Immutable client configuration.

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use url::Url;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.moderately.ai";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MODERATELY_API_KEY";

/// Environment variable holding the team ID.
pub const TEAM_ID_ENV: &str = "MODERATELY_TEAM_ID";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "MODERATELY_BASE_URL";

/// Settings shared by every request a client makes.
///
/// Built once through [`ClientBuilder`](crate::ClientBuilder) and never
/// mutated afterwards; clones of a client share the same instance.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    team_id: String,
    base_url: Url,
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: String,
    auth_header: HeaderValue,
}

impl ClientConfig {
    /// Validate and assemble a configuration.
    pub(crate) fn new(
        api_key: String,
        team_id: String,
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
        user_agent: String,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "api_key is required (set {} or call .api_key())",
                API_KEY_ENV
            )));
        }
        if team_id.trim().is_empty() {
            return Err(Error::Config(format!(
                "team_id is required (set {} or call .team_id())",
                TEAM_ID_ENV
            )));
        }

        // Parse and normalize base URL
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid base URL: {}", base_url)));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        auth_header.set_sensitive(true);

        Ok(Self {
            api_key,
            team_id,
            base_url,
            timeout,
            retry,
            user_agent,
            auth_header,
        })
    }

    /// Load configuration from `MODERATELY_API_KEY`, `MODERATELY_TEAM_ID`
    /// and the optional `MODERATELY_BASE_URL`, with defaults for the rest.
    pub fn from_env() -> Result<Self> {
        crate::ClientBuilder::from_env().build_config()
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The team every list and create request is scoped to.
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub(crate) fn auth_header(&self) -> &HeaderValue {
        &self.auth_header
    }

    /// Build a URL for an API path.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.base_url.join(path).map_err(Error::from)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
