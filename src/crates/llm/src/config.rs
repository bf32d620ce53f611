//! Configuration for remote completion endpoints.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which wire dialect the endpoint speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiDialect {
    /// `POST {base_url}/chat/completions` with bearer auth.
    OpenAi,
    /// `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version=…`
    /// with an `api-key` header. The deployment is the `model` field.
    Azure { api_version: String },
}

/// Configuration for a remote completion provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    ///
    /// Examples:
    /// - OpenAI: "https://api.openai.com/v1"
    /// - Azure OpenAI: "https://contoso.openai.azure.com"
    pub base_url: String,

    /// Model name, or deployment name for Azure.
    pub model: String,

    /// Wire dialect.
    pub dialect: ApiDialect,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Organization ID (OpenAI only).
    pub organization: Option<String>,
}

impl std::fmt::Debug for RemoteLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dialect", &self.dialect)
            .field("timeout", &self.timeout)
            .field("organization", &self.organization)
            .finish()
    }
}

impl RemoteLlmConfig {
    /// Create a configuration for the public OpenAI API dialect.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            dialect: ApiDialect::OpenAi,
            timeout: default_timeout(),
            organization: None,
        }
    }

    /// Create a configuration for an Azure OpenAI deployment.
    pub fn azure(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            dialect: ApiDialect::Azure {
                api_version: api_version.into(),
            },
            ..Self::new(api_key, endpoint, deployment)
        }
    }

    /// Create an OpenAI-dialect configuration with the key read from `env_var`.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = std::env::var(env_var)
            .map_err(|_| LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var)))?;

        Ok(Self::new(api_key, base_url, model))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the organization ID.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &self.dialect {
            ApiDialect::OpenAi => format!("{}/chat/completions", base),
            ApiDialect::Azure { api_version } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                base, self.model, api_version
            ),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}
