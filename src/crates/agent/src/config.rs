//! Agent configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. an optional YAML or JSON file
//! 2. a `.env` file in the working directory or a parent
//! 3. the process environment
//!
//! A value that is empty or only whitespace counts as absent in every layer,
//! so it neither satisfies a required setting nor hides a default.
//!
//! [`AgentSettings`] is the raw, possibly incomplete view; [`AgentConfig`] is
//! what the rest of the agent consumes and only exists once every required
//! value is present.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use utils::{get_env_opt, load_config_file, load_dotenv, missing_vars, UtilsError, ValidateConfig};

pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_OPENAI_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_OPENAI_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_GRAPH_BASE_URL: &str = "GRAPH_BASE_URL";
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const ENV_KEYVAULT_URL: &str = "AZURE_KEYVAULT_URL";

pub const DEFAULT_OPENAI_API_VERSION: &str = "2023-05-15";

/// Raw settings as read from a file or the environment.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub openai_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_deployment: Option<String>,
    pub openai_api_version: Option<String>,
    pub graph_base_url: Option<String>,
    pub authority_host: Option<String>,
    pub keyvault_url: Option<String>,
}

impl AgentSettings {
    /// Read every setting from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(get_env_opt)
    }

    /// Read every setting through `lookup`, which maps a variable name to a
    /// non-empty value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tenant_id: lookup(ENV_TENANT_ID),
            client_id: lookup(ENV_CLIENT_ID),
            client_secret: lookup(ENV_CLIENT_SECRET),
            openai_endpoint: lookup(ENV_OPENAI_ENDPOINT),
            openai_api_key: lookup(ENV_OPENAI_API_KEY),
            openai_deployment: lookup(ENV_OPENAI_DEPLOYMENT),
            openai_api_version: lookup(ENV_OPENAI_API_VERSION),
            graph_base_url: lookup(ENV_GRAPH_BASE_URL),
            authority_host: lookup(ENV_AUTHORITY_HOST),
            keyvault_url: lookup(ENV_KEYVAULT_URL),
        }
    }

    /// Load settings from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Self = load_config_file(path)?;
        Ok(settings.normalized())
    }

    /// Trim every value and drop the ones left empty.
    fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            tenant_id: clean(self.tenant_id),
            client_id: clean(self.client_id),
            client_secret: clean(self.client_secret),
            openai_endpoint: clean(self.openai_endpoint),
            openai_api_key: clean(self.openai_api_key),
            openai_deployment: clean(self.openai_deployment),
            openai_api_version: clean(self.openai_api_version),
            graph_base_url: clean(self.graph_base_url),
            authority_host: clean(self.authority_host),
            keyvault_url: clean(self.keyvault_url),
        }
    }

    /// Fill every value `other` has into `self`, replacing what was there.
    pub fn overlay(self, other: AgentSettings) -> Self {
        Self {
            tenant_id: other.tenant_id.or(self.tenant_id),
            client_id: other.client_id.or(self.client_id),
            client_secret: other.client_secret.or(self.client_secret),
            openai_endpoint: other.openai_endpoint.or(self.openai_endpoint),
            openai_api_key: other.openai_api_key.or(self.openai_api_key),
            openai_deployment: other.openai_deployment.or(self.openai_deployment),
            openai_api_version: other.openai_api_version.or(self.openai_api_version),
            graph_base_url: other.graph_base_url.or(self.graph_base_url),
            authority_host: other.authority_host.or(self.authority_host),
            keyvault_url: other.keyvault_url.or(self.keyvault_url),
        }
    }

    /// Names of required settings that are absent, in a stable order.
    pub fn missing(&self) -> Vec<String> {
        missing_vars(&[
            (ENV_TENANT_ID, self.tenant_id.as_deref()),
            (ENV_CLIENT_ID, self.client_id.as_deref()),
            (ENV_CLIENT_SECRET, self.client_secret.as_deref()),
            (ENV_OPENAI_ENDPOINT, self.openai_endpoint.as_deref()),
            (ENV_OPENAI_API_KEY, self.openai_api_key.as_deref()),
            (ENV_OPENAI_DEPLOYMENT, self.openai_deployment.as_deref()),
        ])
    }

    /// Turn complete settings into an [`AgentConfig`].
    pub fn resolve(self) -> Result<AgentConfig> {
        self.validate()?;

        let required = |value: Option<String>, name: &str| {
            value.ok_or_else(|| UtilsError::MissingVariables(vec![name.to_string()]))
        };

        Ok(AgentConfig {
            tenant_id: required(self.tenant_id, ENV_TENANT_ID)?,
            client_id: required(self.client_id, ENV_CLIENT_ID)?,
            client_secret: required(self.client_secret, ENV_CLIENT_SECRET)?,
            openai_endpoint: required(self.openai_endpoint, ENV_OPENAI_ENDPOINT)?,
            openai_api_key: required(self.openai_api_key, ENV_OPENAI_API_KEY)?,
            openai_deployment: required(self.openai_deployment, ENV_OPENAI_DEPLOYMENT)?,
            openai_api_version: self
                .openai_api_version
                .unwrap_or_else(|| DEFAULT_OPENAI_API_VERSION.to_string()),
            graph_base_url: self
                .graph_base_url
                .unwrap_or_else(|| graph::GRAPH_BASE_URL.to_string()),
            authority_host: self
                .authority_host
                .unwrap_or_else(|| graph::DEFAULT_AUTHORITY_HOST.to_string()),
            keyvault_url: self.keyvault_url,
        })
    }
}

impl ValidateConfig for AgentSettings {
    fn validate(&self) -> utils::Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(UtilsError::MissingVariables(missing))
        }
    }
}

impl std::fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSettings")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("openai_endpoint", &self.openai_endpoint)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_deployment", &self.openai_deployment)
            .field("openai_api_version", &self.openai_api_version)
            .field("graph_base_url", &self.graph_base_url)
            .field("authority_host", &self.authority_host)
            .field("keyvault_url", &self.keyvault_url)
            .finish()
    }
}

/// Complete agent configuration.
#[derive(Clone)]
pub struct AgentConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub openai_endpoint: String,
    pub openai_api_key: String,
    pub openai_deployment: String,
    pub openai_api_version: String,
    pub graph_base_url: String,
    pub authority_host: String,
    /// Accepted for compatibility with existing deployments; not read.
    pub keyvault_url: Option<String>,
}

impl AgentConfig {
    /// Load from the optional file, `.env` and the environment, then validate.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = match file {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                AgentSettings::from_file(path)?
            }
            None => AgentSettings::default(),
        };

        load_dotenv();
        base.overlay(AgentSettings::from_env()).resolve()
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("openai_endpoint", &self.openai_endpoint)
            .field("openai_api_key", &"<redacted>")
            .field("openai_deployment", &self.openai_deployment)
            .field("openai_api_version", &self.openai_api_version)
            .field("graph_base_url", &self.graph_base_url)
            .field("authority_host", &self.authority_host)
            .field("keyvault_url", &self.keyvault_url)
            .finish()
    }
}
