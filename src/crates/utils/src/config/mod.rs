//! Configuration management utilities.
//!
//! This module provides:
//! - Environment variable loading, with unset and empty values treated alike
//! - `.env` file loading
//! - Required-variable validation that reports every missing name at once
//! - YAML/JSON config file loading
//!
//! # Example
//!
//! ```rust,ignore
//! use utils::config::{get_env_opt, missing_vars};
//!
//! let tenant = get_env_opt("AZURE_TENANT_ID");
//! let missing = missing_vars(&[("AZURE_TENANT_ID", tenant.as_deref())]);
//! ```

use crate::error::{Result, UtilsError};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Load a `.env` file from the current directory or its parents, if present.
///
/// Variables already set in the process environment win. Returns the path
/// that was loaded.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded environment file");
            Some(path)
        }
        Err(_) => None,
    }
}

/// Get an environment variable, returning `None` when unset or empty.
pub fn get_env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_env_or(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Names of the required settings whose value is absent.
///
/// Order follows the input so error messages are stable.
pub fn missing_vars(required: &[(&str, Option<&str>)]) -> Vec<String> {
    required
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Load configuration from a YAML file.
pub fn load_yaml_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    serde_yaml::from_str(&content).map_err(|e| {
        UtilsError::ConfigError(format!(
            "Failed to parse YAML config from {:?}: {}",
            path.as_ref(),
            e
        ))
    })
}

/// Load configuration from a JSON file.
pub fn load_json_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&content).map_err(|e| {
        UtilsError::ConfigError(format!(
            "Failed to parse JSON config from {:?}: {}",
            path.as_ref(),
            e
        ))
    })
}

/// Load configuration from a file (auto-detect format from extension).
pub fn load_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            UtilsError::ConfigError(format!("Unable to determine file extension for {:?}", path))
        })?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => load_yaml_config(path),
        "json" => load_json_config(path),
        _ => Err(UtilsError::ConfigError(format!(
            "Unsupported config file extension: {}",
            extension
        ))),
    }
}

/// Trait for validating configuration.
pub trait ValidateConfig {
    /// Validate the configuration, returning an error if invalid.
    fn validate(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestConfig {
        tenant_id: String,
        port: u16,
    }

    // ------------------------------------------------------------------------
    // Environment Variable Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_env_or() {
        let value = get_env_or("ENTRA_AGENT_NONEXISTENT_12345", "default");
        assert_eq!(value, "default");
    }

    #[test]
    fn test_get_env_existing() {
        env::set_var("ENTRA_AGENT_TEST_EXISTING", "  value  ");
        assert_eq!(get_env_opt("ENTRA_AGENT_TEST_EXISTING").as_deref(), Some("value"));
        env::remove_var("ENTRA_AGENT_TEST_EXISTING");
    }

    #[test]
    fn test_get_env_empty_counts_as_missing() {
        env::set_var("ENTRA_AGENT_TEST_EMPTY", "");
        assert_eq!(get_env_or("ENTRA_AGENT_TEST_EMPTY", "fallback"), "fallback");
        assert!(get_env_opt("ENTRA_AGENT_TEST_EMPTY").is_none());
        env::remove_var("ENTRA_AGENT_TEST_EMPTY");
    }

    #[test]
    fn test_missing_vars_reports_all_in_order() {
        let missing = missing_vars(&[
            ("A", Some("x")),
            ("B", None),
            ("C", Some("  ")),
            ("D", Some("y")),
        ]);
        assert_eq!(missing, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_missing_vars_none_missing() {
        assert!(missing_vars(&[("A", Some("x"))]).is_empty());
    }

    // ------------------------------------------------------------------------
    // Config File Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_yaml_config_valid() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("agent.yaml");
        fs::write(&config_path, "tenant_id: contoso\nport: 5000\n").unwrap();

        let config: TestConfig = load_config_file(&config_path).unwrap();
        assert_eq!(
            config,
            TestConfig {
                tenant_id: "contoso".to_string(),
                port: 5000
            }
        );
    }

    #[test]
    fn test_load_json_config_valid() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("agent.json");
        fs::write(&config_path, r#"{"tenant_id": "fabrikam", "port": 7071}"#).unwrap();

        let config: TestConfig = load_config_file(&config_path).unwrap();
        assert_eq!(config.tenant_id, "fabrikam");
        assert_eq!(config.port, 7071);
    }

    #[test]
    fn test_load_yaml_config_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.yml");
        fs::write(&config_path, "tenant_id: [unterminated\nport: 1\n").unwrap();

        let result: Result<TestConfig> = load_config_file(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result: Result<TestConfig> = load_config_file("/nonexistent/path/agent.yaml");
        assert!(matches!(result, Err(UtilsError::IoError(_))));
    }

    #[test]
    fn test_load_config_file_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("agent.ini");
        fs::write(&config_path, "tenant_id=contoso").unwrap();

        let result: Result<TestConfig> = load_config_file(&config_path);
        assert!(matches!(result, Err(UtilsError::ConfigError(_))));
    }

    #[test]
    fn test_load_config_file_no_extension() {
        let result: Result<TestConfig> = load_config_file("agentconfig");
        assert!(result.is_err());
    }
}
