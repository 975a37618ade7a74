//! CLI configuration.

use anyhow::{Context, Result};
use market_cart::CartConfig;
use market_store::FileStoreConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart configuration.
    #[serde(default)]
    pub cart: CartConfig,

    /// Storage configuration.
    #[serde(default)]
    pub store: FileStoreConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Generate a default market.toml config file.
pub fn generate_default_config() -> String {
    r#"# Marketplace cart configuration

[cart]
storage_key = "@goMarketplace:products"

[store]
# Relative paths resolve against the directory the CLI runs in.
path = ".market/store"

[log]
# Overridden by RUST_LOG.
level = "warn"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.cart.storage_key, market_cart::DEFAULT_STORAGE_KEY);
        assert_eq!(config.store.path, std::path::PathBuf::from(".market/store"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_load_json_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"cart": {{"storage_key": "cart:test"}}}}"#).unwrap();

        let config = CliConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cart.storage_key, "cart:test");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(CliConfig::load("/definitely/not/here/market.toml").is_err());
    }
}
