//! Persistent shopping-cart state for the marketplace client.
//!
//! The cart is a list of line items keyed by product id. It lives in memory
//! and every change is written through to a [`KeyValueStore`] as a single
//! snapshot, so the cart survives restarts.
//!
//! - **State**: [`CartState`] and its quantity rules (add merges, decrement
//!   drops an entry at zero)
//! - **Store**: [`CartStore`] loads the snapshot once and persists every
//!   mutation
//! - **Scope**: [`CartProvider`] / [`CartScope`] hand the loaded store to
//!   consumers
//!
//! # Example
//!
//! ```rust,ignore
//! use market_cart::prelude::*;
//! use market_store::FileStore;
//!
//! let provider = CartProvider::new(FileStore::open(".market/store").await?, CartConfig::default());
//! let scope = provider.mount().await?;
//! let cart = scope.use_cart()?;
//!
//! cart.add_to_cart(NewLineItem::new("A", "Mug", "https://img/a.png", 10.0)).await?;
//! cart.add_to_cart(NewLineItem::new("B", "Cup", "https://img/b.png", 5.0)).await?;
//! cart.increment(&ProductId::new("A")).await?;
//! cart.decrement(&ProductId::new("B")).await?;
//!
//! // [{ id: "A", quantity: 2 }]
//! println!("{:?}", cart.products());
//! ```
//!
//! [`KeyValueStore`]: market_store::KeyValueStore

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;

pub use cart::{CartProvider, CartScope, CartState, CartStore, LineItem, NewLineItem};
pub use config::{CartConfig, DEFAULT_STORAGE_KEY};
pub use error::{CartError, ItemError, SnapshotError};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartProvider, CartScope, CartState, CartStore, LineItem, NewLineItem};
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, ItemError, SnapshotError};
    pub use crate::ids::ProductId;
}
