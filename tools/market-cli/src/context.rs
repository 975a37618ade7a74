//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use market_cart::{CartProvider, CartScope};
use market_store::{FileStore, FileStoreConfig};

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["market.toml", ".market.toml", "market.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Store configuration with the path resolved against the working directory.
    pub fn store_config(&self) -> FileStoreConfig {
        let mut store = self.config.store.clone();
        if store.path.is_relative() {
            store.path = self.cwd.join(&store.path);
        }
        store
    }

    /// Open the store and wrap it in an unmounted provider.
    pub async fn open_provider(&self) -> Result<CartProvider<FileStore>> {
        let store_config = self.store_config();
        let store = FileStore::from_config(&store_config)
            .await
            .with_context(|| format!("Failed to open store at {}", store_config.path.display()))?;
        self.output.debug(&format!("Store: {}", store.root().display()));

        Ok(CartProvider::new(store, self.config.cart.clone()))
    }

    /// Open the store and mount the cart.
    pub async fn mount_cart(&self) -> Result<CartScope<FileStore>> {
        let provider = self.open_provider().await?;
        provider.mount().await.with_context(|| {
            format!(
                "Failed to load cart from {} (key {}); `market reset` clears it",
                provider.store().backend().root().display(),
                self.config.cart.storage_key
            )
        })
    }
}
