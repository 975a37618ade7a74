//! Scoped access to a loaded cart.

use std::sync::Arc;

use market_store::KeyValueStore;

use crate::cart::CartStore;
use crate::config::CartConfig;
use crate::error::CartError;

/// Owns a [`CartStore`] until it is mounted.
///
/// Mounting loads the stored snapshot and hands out a [`CartScope`] that UI
/// code passes down to whatever needs the cart.
///
/// # Example
///
/// ```rust,ignore
/// let provider = CartProvider::new(FileStore::open(".market/store").await?, CartConfig::default());
/// let scope = provider.mount().await?;
///
/// let cart = scope.use_cart()?;
/// cart.add_to_cart(item).await?;
/// ```
pub struct CartProvider<S> {
    store: Arc<CartStore<S>>,
}

impl<S: KeyValueStore> CartProvider<S> {
    /// Create a provider over `backend`.
    pub fn new(backend: S, config: CartConfig) -> Self {
        Self {
            store: Arc::new(CartStore::with_config(backend, config)),
        }
    }

    /// The underlying store, for recovery after a failed mount.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Load the cart and open a scope over it.
    pub async fn mount(&self) -> Result<CartScope<S>, CartError> {
        self.store.load().await?;
        Ok(CartScope {
            store: Some(Arc::clone(&self.store)),
        })
    }
}

/// Handle through which consumers reach the cart.
///
/// A scope obtained from [`CartProvider::mount`] resolves to the loaded
/// store. A [`detached`](Self::detached) scope has no provider above it and
/// every access fails with [`CartError::ContractViolation`].
pub struct CartScope<S> {
    store: Option<Arc<CartStore<S>>>,
}

impl<S> CartScope<S> {
    /// A scope with no provider.
    pub fn detached() -> Self {
        Self { store: None }
    }

    /// Get the cart store.
    pub fn use_cart(&self) -> Result<&CartStore<S>, CartError> {
        self.store.as_deref().ok_or_else(outside_provider)
    }
}

fn outside_provider() -> CartError {
    CartError::ContractViolation("use_cart must be used within a CartProvider".to_string())
}

impl<S> Clone for CartScope<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> Default for CartScope<S> {
    fn default() -> Self {
        Self::detached()
    }
}
