//! Configuration loaded from `proofctl.toml`.
//!
//! Every field has a default; the `PROOFCTL_API_URL` environment variable
//! takes precedence over the file, and the `--api-url` flag over both.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::api::{DEFAULT_BASE_URL, RetryPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct ProofctlConfig {
    /// Base URL of the campaign API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Maximum retries for transient request failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for ProofctlConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl ProofctlConfig {
    /// Load from `proofctl.toml` in the current directory, falling back to
    /// defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("proofctl.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ProofctlConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable has precedence over the config file.
        if let Ok(url) = std::env::var("PROOFCTL_API_URL")
            && !url.is_empty()
        {
            config.api_url = url;
        }

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = ProofctlConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay_ms, 1000);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_url = "https://campaigns.example.com"
            max_retries = 5
        "#;
        let config: ProofctlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url, "https://campaigns.example.com");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 1000);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProofctlConfig::load_from(&dir.path().join("proofctl.toml")).unwrap();
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proofctl.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"base_delay_ms = 250"#).unwrap();
        let config = ProofctlConfig::load_from(&path).unwrap();
        assert_eq!(config.base_delay_ms, 250);
        assert_eq!(config.retry_policy().base_delay_ms, 250);
    }
}
