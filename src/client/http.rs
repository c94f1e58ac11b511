//! Generic HTTP call.
//!
//! Every request carries credentials: the underlying `reqwest::Client` keeps
//! a cookie store, so cookies set by the server are sent back on later
//! calls. A bearer token is attached only when one is supplied. There are no
//! retries and no client-side timeout.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::config::ClientConfig;
use super::error::{ClientError, ErrorPayload};

/// HTTP client adapter for the Task API.
///
/// Cloning is cheap and clones share the connection pool and cookie store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Creates a client with a persistent cookie store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClientError::transport)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one request against the API root.
    ///
    /// `token` overrides the configured default token for this call.
    ///
    /// # Errors
    ///
    /// - `ClientError::Api` for a non-2xx response, carrying the server's
    ///   error body (or the status text if the body does not parse)
    /// - `ClientError::Transport` if no response was received or a 2xx body
    ///   could not be decoded
    pub async fn call<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.config.url_for(path);
        let result = self.execute(method.clone(), &url, body, token).await;

        if let Err(error) = &result {
            // One log line per failure; callers only surface the message.
            tracing::error!(
                %method,
                url = %url,
                status = error.status().map(|status| status.as_u16()),
                message = error.message(),
                is_network = error.is_network(),
                "API request failed"
            );
        }

        result
    }

    async fn execute<T, B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token.or_else(|| self.config.token()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::transport)?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status,
                payload: ErrorPayload::from_response_body(status, &bytes),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|error| ClientError::transport(format!("Invalid response body: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_client_keeps_config() {
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9/api")).unwrap();

        assert_eq!(client.config().base_url(), "http://127.0.0.1:9/api/");
    }

    #[rstest]
    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9/api")).unwrap();

        let result: Result<serde_json::Value, _> = client
            .call::<_, ()>(Method::GET, "task/get-tasks", None, None)
            .await;

        let error = result.unwrap_err();
        assert!(error.is_network());
        assert!(!error.message().is_empty());
    }
}
