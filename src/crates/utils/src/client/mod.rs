//! HTTP client utilities and helpers.
//!
//! This module provides:
//! - Client configuration builders
//! - A retry policy restricted to safe (read-only) methods
//! - Authentication header helpers
//!
//! Requests with side effects (`POST`, `PATCH`, `PUT`, `DELETE`) are sent
//! exactly once. Repeating them after an ambiguous failure can create a second
//! resource on the remote side, so failures are handed straight back.
//!
//! # Example
//!
//! ```rust,ignore
//! use utils::client::{ClientConfig, HttpClient};
//!
//! let config = ClientConfig::new()
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_retries(2);
//!
//! let client = HttpClient::new(config)?;
//! let response = client.send(client.request(Method::GET, url)).await?;
//! ```

use crate::error::{Result, UtilsError};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Maximum number of retries for failed safe requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between retries.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,

    /// Backoff multiplier for retry delays.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f32,

    /// User agent string.
    pub user_agent: Option<String>,

    /// Default headers to include in all requests.
    #[serde(skip)]
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Create a new client configuration with defaults.
    pub fn new() -> Self {
        Self {
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            user_agent: None,
            default_headers: Vec::new(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a default header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_backoff_multiplier() -> f32 {
    2.0
}

/// Whether a request with this method may be repeated without side effects.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// HTTP client with retry and configuration support.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|e| UtilsError::ClientError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get a reference to the underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request with the default headers applied.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);
        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }
        req
    }

    /// Send a request, retrying safe methods on transient failures.
    ///
    /// The response is returned as-is regardless of status; callers decide
    /// what a non-success status means.
    pub async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let request = req.build()?;
        let retryable = is_safe_method(request.method());

        let mut attempts = 0;
        let mut delay = self.config.retry_delay;

        loop {
            let attempt = match request.try_clone() {
                Some(cloned) => cloned,
                None if attempts == 0 => {
                    return Ok(self.client.execute(request).await?);
                }
                None => {
                    return Err(UtilsError::ClientError(
                        "Failed to clone request for retry".to_string(),
                    ))
                }
            };

            match self.client.execute(attempt).await {
                Ok(response) => {
                    if !retryable
                        || attempts >= self.config.max_retries
                        || !response.status().is_server_error()
                    {
                        return Ok(response);
                    }
                    warn!(
                        status = %response.status(),
                        url = %request.url(),
                        attempt = attempts + 1,
                        "Server error on safe request; retrying"
                    );
                }
                Err(e) => {
                    if !retryable
                        || attempts >= self.config.max_retries
                        || !(e.is_timeout() || e.is_connect())
                    {
                        return Err(UtilsError::HttpError(e));
                    }
                    warn!(
                        error = %e,
                        url = %request.url(),
                        attempt = attempts + 1,
                        "Transport error on safe request; retrying"
                    );
                }
            }

            attempts += 1;
            tokio::time::sleep(delay).await;
            delay = Duration::from_secs_f32(delay.as_secs_f32() * self.config.backoff_multiplier);
        }
    }
}

/// Helper for building authenticated requests.
pub struct AuthHelper;

impl AuthHelper {
    /// Create a bearer token authorization header value.
    pub fn bearer_token(token: &str) -> String {
        format!("Bearer {}", token)
    }
}
