//! Shared helpers for the entra-agent workspace.
//!
//! This crate collects the plumbing every other crate needs but none of them
//! owns: environment and file configuration, an HTTP client wrapper, and the
//! listener settings for the embedded web server.
//!
//! # Modules
//!
//! ## Client (`client`)
//!
//! HTTP client with bearer-auth helpers and a retry policy that only ever
//! repeats idempotent requests:
//!
//! ```rust,ignore
//! use utils::client::{ClientConfig, HttpClient};
//! use std::time::Duration;
//!
//! let config = ClientConfig::new()
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_retries(2)
//!     .with_user_agent("entra-agent");
//!
//! let client = HttpClient::new(config)?;
//! let request = client.request(Method::GET, "https://graph.microsoft.com/v1.0/organization");
//! let response = client.send(request).await?;
//! ```
//!
//! ## Config (`config`)
//!
//! Environment variable and config file loading:
//!
//! ```rust,ignore
//! use utils::config::{get_env_opt, get_env_or, load_dotenv};
//!
//! load_dotenv();
//! let tenant = get_env_opt("AZURE_TENANT_ID");
//! let api_version = get_env_or("AZURE_OPENAI_API_VERSION", "2023-05-15");
//! ```
//!
//! ## Server (`server`)
//!
//! ```rust,ignore
//! use utils::server::ServerConfig;
//!
//! let config = ServerConfig::from_env("")?;
//! let addr = config.socket_addr()?;
//! ```
//!
//! # Features
//!
//! - `server` - Server settings (enabled by default)
//! - `client` - HTTP client (enabled by default)
//! - `config` - Configuration loading (enabled by default)

pub mod error;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "config")]
pub mod config;

// Re-export commonly used types
pub use error::{Result, UtilsError};

#[cfg(feature = "server")]
pub use server::ServerConfig;

#[cfg(feature = "client")]
pub use client::{AuthHelper, ClientConfig, HttpClient};

#[cfg(feature = "config")]
pub use config::{
    get_env_opt, get_env_or, load_config_file, load_dotenv, load_json_config, load_yaml_config,
    missing_vars, ValidateConfig,
};
