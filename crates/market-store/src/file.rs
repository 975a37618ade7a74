//! Durable file-backed storage backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, StoreError};

/// File store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Directory holding one file per key.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from(".market").join("store")
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

/// Key-value store that keeps each key in its own file under a root directory.
///
/// File names are the URL-safe base64 encoding of the key, so arbitrary keys
/// (`@goMarketplace:products`) map to portable names. Writes land in a temp
/// file first and are renamed into place, so readers never observe a torn value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::Open {
                path: root.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %root.display(), "opened file store");
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Open a store from configuration.
    pub async fn from_config(config: &FileStoreConfig) -> Result<Self, StoreError> {
        Self::open(&config.path).await
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}.tmp",
            URL_SAFE_NO_PAD.encode(key.as_bytes()),
            std::process::id(),
            n
        ))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let tmp = self.tmp_path_for(key);
        if let Err(e) = tokio::fs::write(&tmp, value.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp, self.path_for(key)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key, e));
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
