//! Async string-keyed storage for the marketplace cart.
//!
//! The cart treats persistence as an opaque key-value service. This crate
//! defines that service ([`KeyValueStore`]) and ships two backends:
//!
//! - [`MemoryStore`] - process-local map, for tests and throwaway sessions
//! - [`FileStore`] - durable store with one file per key
//!
//! # Example
//!
//! ```rust,ignore
//! use market_store::{FileStore, KeyValueStore};
//!
//! let store = FileStore::open(".market/store").await?;
//!
//! store.set("@goMarketplace:products", "[]".to_string()).await?;
//! let raw: Option<String> = store.get("@goMarketplace:products").await?;
//! store.remove("@goMarketplace:products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StoreError;
pub use file::{FileStore, FileStoreConfig};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
