//! Server configuration.
//!
//! Reads the listen address and runtime sizing from the environment. The
//! lookup is injectable so tests never touch the process environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `4000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Errors produced while reading the server configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerConfigError {
    /// `PORT` is not a valid port number.
    #[error("Invalid PORT: '{0}'. Expected a number between 0 and 65535")]
    InvalidPort(String),

    /// `HOST` and `PORT` do not form a socket address.
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
}

/// Result of parsing `WORKER_THREADS`.
///
/// Invalid values never fail startup; they fall back to the default and
/// carry a warning for the caller to print.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkerThreads {
    /// Requested worker count, `None` for the runtime default.
    pub threads: Option<usize>,
    /// Warning to report, if the raw value was rejected or capped.
    pub warning: Option<String>,
}

impl WorkerThreads {
    /// Parses a raw `WORKER_THREADS` value.
    ///
    /// Values above four times the available parallelism are capped.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::default();
        };

        match trimmed.parse::<usize>() {
            Ok(0) => Self {
                threads: None,
                warning: Some(
                    "WORKER_THREADS=0 is invalid (must be > 0), using default".to_string(),
                ),
            },
            Ok(requested) => {
                let max_threads = std::thread::available_parallelism()
                    .map(|parallelism| parallelism.get().saturating_mul(4))
                    .unwrap_or(64);
                if requested > max_threads {
                    Self {
                        threads: Some(max_threads),
                        warning: Some(format!(
                            "WORKER_THREADS={requested} exceeds recommended limit ({max_threads}), capping to {max_threads}"
                        )),
                    }
                } else {
                    Self {
                        threads: Some(requested),
                        warning: None,
                    }
                }
            }
            Err(error) => Self {
                threads: None,
                warning: Some(format!(
                    "WORKER_THREADS='{trimmed}' is not a valid number ({error}), using default"
                )),
            },
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Tokio worker sizing.
    pub worker_threads: WorkerThreads,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            worker_threads: WorkerThreads::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the server configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ServerConfigError::InvalidPort` if `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Reads the server configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerConfigError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let host = lookup("HOST")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Ok(value) if !value.trim().is_empty() => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ServerConfigError::InvalidPort(value))?,
            _ => DEFAULT_PORT,
        };

        let worker_threads = WorkerThreads::parse(lookup("WORKER_THREADS").ok().as_deref());

        Ok(Self {
            host,
            port,
            worker_threads,
        })
    }

    /// Resolves the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ServerConfigError::InvalidAddress` if the host is not an IP address.
    pub fn socket_address(&self) -> Result<SocketAddr, ServerConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rstest::rstest;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| values.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[rstest]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(
            config.socket_address().unwrap(),
            "0.0.0.0:4000".parse().unwrap()
        );
    }

    #[rstest]
    fn test_host_and_port_overrides() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]))
                .unwrap();

        assert_eq!(
            config.socket_address().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }

    #[rstest]
    #[case("http")]
    #[case("70000")]
    #[case("-1")]
    fn test_invalid_port(#[case] port: &str) {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", port)]));

        let expected = ServerConfigError::InvalidPort(port.to_string());
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    fn test_invalid_host_is_reported_at_bind_time() {
        let config = ServerConfig::from_lookup(lookup_from(&[("HOST", "not a host")])).unwrap();

        assert!(matches!(
            config.socket_address(),
            Err(ServerConfigError::InvalidAddress(_))
        ));
    }

    #[rstest]
    #[case(None, None, false)]
    #[case(Some("   "), None, false)]
    #[case(Some("2"), Some(2), false)]
    #[case(Some("0"), None, true)]
    #[case(Some("many"), None, true)]
    fn test_worker_threads_parse(
        #[case] raw: Option<&str>,
        #[case] expected_threads: Option<usize>,
        #[case] expect_warning: bool,
    ) {
        let parsed = WorkerThreads::parse(raw);

        assert_eq!(parsed.threads, expected_threads);
        assert_eq!(parsed.warning.is_some(), expect_warning);
    }

    #[rstest]
    fn test_worker_threads_capped() {
        let parsed = WorkerThreads::parse(Some("1000000"));

        assert!(parsed.threads.is_some_and(|threads| threads < 1_000_000));
        assert!(parsed.warning.is_some());
    }
}
