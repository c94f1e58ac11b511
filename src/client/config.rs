//! Client configuration.
//!
//! # Environment Variables
//!
//! - `TASK_API_URL`: API root (default: `http://localhost:4000/api/`)
//! - `TASK_API_TOKEN`: Bearer token attached to every request (optional)

use std::env;

/// Default API root.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api/";

/// Configuration for [`super::ApiClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// Creates a configuration for the given API root.
    ///
    /// The root is normalized to end with exactly one `/`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: format!("{}/", base_url.trim().trim_end_matches('/')),
            token: None,
        }
    }

    /// Sets the default bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads the configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key))
    }

    /// Reads the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let config = non_empty("TASK_API_URL").map_or_else(Self::default, Self::new);

        match non_empty("TASK_API_TOKEN") {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    /// Returns the API root, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default bearer token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Resolves a path relative to the API root.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}
