//! Client configuration
//!
//! Loaded hierarchically:
//! 1. Default values (in code)
//! 2. Optional TOML file
//! 3. Environment variables (prefix: BEFIT_CLIENT__)

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::StorageStrategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, without the `/api/v1` prefix
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub strategy: StorageStrategy,
    /// Where the local store persists its document; in memory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            strategy: StorageStrategy::RemoteWithLocalFallback,
            local_store_path: None,
        }
    }
}

impl ClientConfig {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&ClientConfig::default())?);

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(false));
        }

        // e.g., BEFIT_CLIENT__STRATEGY=local-only
        let config = builder
            .add_source(config::Environment::with_prefix("BEFIT_CLIENT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.strategy, StorageStrategy::RemoteWithLocalFallback);
        assert!(config.local_store_path.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"http://10.0.0.5:9000\"").unwrap();
        writeln!(file, "strategy = \"local-only\"").unwrap();

        let config = ClientConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
        assert_eq!(config.strategy, StorageStrategy::LocalOnly);
        assert_eq!(config.timeout_secs, 10);
    }
}
