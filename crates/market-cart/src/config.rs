//! Cart configuration.

use serde::{Deserialize, Serialize};

/// Storage key the mobile client has always used for the cart snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "@goMarketplace:products";

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl CartConfig {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
