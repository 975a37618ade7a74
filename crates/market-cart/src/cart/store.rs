//! Cart state kept in sync with a key-value store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use market_store::KeyValueStore;

use crate::cart::{CartState, NewLineItem};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;

/// In-memory cart state plus the revision it was committed at.
#[derive(Debug, Default)]
struct Committed {
    cart: CartState,
    revision: u64,
}

/// Single source of truth for cart contents.
///
/// Every mutation applies its change to the in-memory [`CartState`] on first
/// poll, before any storage I/O, then writes the whole cart as one snapshot
/// under [`CartConfig::storage_key`]. Readers see the change while the write
/// is still in flight.
///
/// Snapshot writes are serialized: one write is in flight at a time, and it
/// always writes the latest committed state. A caller whose change was
/// already covered by a finished write returns without writing again. Once
/// all pending mutations settle, storage holds the most recent state.
///
/// # Example
///
/// ```rust,ignore
/// use market_cart::prelude::*;
/// use market_store::MemoryStore;
///
/// let store = CartStore::new(MemoryStore::new());
/// store.load().await?;
///
/// store.add_to_cart(NewLineItem::new("A", "Mug", "https://img/a.png", 10.0)).await?;
/// store.increment(&ProductId::new("A")).await?;
///
/// assert_eq!(store.products().item_count(), 2);
/// ```
pub struct CartStore<S> {
    backend: S,
    config: CartConfig,
    state: Mutex<Committed>,
    /// Revision of the last snapshot that reached the backend.
    persisted: tokio::sync::Mutex<u64>,
    loaded: AtomicBool,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store with the default configuration.
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, CartConfig::default())
    }

    /// Create a store with explicit configuration.
    pub fn with_config(backend: S, config: CartConfig) -> Self {
        Self {
            backend,
            config,
            state: Mutex::new(Committed::default()),
            persisted: tokio::sync::Mutex::new(0),
            loaded: AtomicBool::new(false),
        }
    }

    /// The store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The storage backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether [`load`](Self::load) has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Seed the cart from the stored snapshot.
    ///
    /// A missing snapshot leaves the cart empty and is not an error. A
    /// snapshot that does not parse into valid line items fails with
    /// [`CartError::InitializationParse`] and leaves the cart untouched.
    /// Succeeds at most once per store; a second call is a
    /// [`CartError::ContractViolation`].
    pub async fn load(&self) -> Result<(), CartError> {
        if self.loaded.swap(true, Ordering::AcqRel) {
            return Err(CartError::ContractViolation(
                "cart snapshot already loaded".to_string(),
            ));
        }

        let result = self.read_snapshot().await;
        match result {
            Ok(Some(cart)) => {
                tracing::info!(
                    key = %self.config.storage_key,
                    products = cart.len(),
                    items = cart.item_count(),
                    "loaded cart snapshot"
                );
                self.lock_state().cart = cart;
                Ok(())
            }
            Ok(None) => {
                tracing::debug!(key = %self.config.storage_key, "no stored cart, starting empty");
                Ok(())
            }
            Err(e) => {
                self.loaded.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<Option<CartState>, CartError> {
        let key = &self.config.storage_key;
        let raw = self
            .backend
            .get(key)
            .await
            .map_err(|source| CartError::StorageRead {
                key: key.clone(),
                source,
            })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        CartState::from_snapshot(&raw).map(Some).map_err(|source| {
            tracing::error!(key = %key, error = %source, "malformed cart snapshot");
            CartError::InitializationParse {
                key: key.clone(),
                source,
            }
        })
    }

    /// Add one unit of `item` to the cart.
    ///
    /// An existing entry keeps its title, image and price; only its quantity
    /// grows. A new entry starts at quantity 1. A rejected item or a quantity
    /// overflow leaves the cart unchanged and writes nothing.
    pub async fn add_to_cart(&self, item: NewLineItem) -> Result<(), CartError> {
        item.validate()?;
        let id = item.id.clone();
        let (quantity, revision) = self.commit(|cart| cart.add(item))?;
        tracing::debug!(product_id = %id, quantity, revision, "added to cart");
        self.persist(revision).await
    }

    /// Add one unit to the entry for `id`. Unknown ids leave the cart unchanged.
    pub async fn increment(&self, id: &ProductId) -> Result<(), CartError> {
        let (quantity, revision) = self.commit(|cart| cart.increment(id))?;
        tracing::debug!(product_id = %id, ?quantity, revision, "incremented");
        self.persist(revision).await
    }

    /// Remove one unit from the entry for `id`; the entry is dropped when it
    /// reaches zero. Unknown ids leave the cart unchanged.
    pub async fn decrement(&self, id: &ProductId) -> Result<(), CartError> {
        let (quantity, revision) = self.commit(|cart| Ok(cart.decrement(id)))?;
        tracing::debug!(product_id = %id, ?quantity, revision, "decremented");
        self.persist(revision).await
    }

    /// Current cart contents.
    pub fn products(&self) -> CartState {
        self.lock_state().cart.clone()
    }

    /// Revision of the current in-memory state.
    pub fn revision(&self) -> u64 {
        self.lock_state().revision
    }

    /// Write the current state if storage is behind it.
    ///
    /// Use after a [`CartError::PersistenceWrite`] to retry.
    pub async fn flush(&self) -> Result<(), CartError> {
        let revision = self.revision();
        self.persist(revision).await
    }

    /// Empty the cart and delete the stored snapshot.
    ///
    /// Also the way out of a malformed snapshot: a failed `load` may be
    /// retried after `reset`. A store that already loaded stays loaded.
    pub async fn reset(&self) -> Result<(), CartError> {
        let ((), revision) = self.commit(|cart| {
            *cart = CartState::new();
            Ok(())
        })?;

        let mut persisted = self.persisted.lock().await;
        // A queued persist may already have written this revision as "[]";
        // the key still has to go. Only a newer write supersedes the reset.
        if *persisted > revision {
            return Ok(());
        }

        let key = &self.config.storage_key;
        self.backend
            .remove(key)
            .await
            .map_err(|source| CartError::PersistenceWrite {
                key: key.clone(),
                source,
            })?;
        *persisted = revision;
        tracing::info!(key = %key, "cart reset");
        Ok(())
    }

    /// Apply `f` and bump the revision. On error nothing was changed and the
    /// revision stays put.
    fn commit<R>(
        &self,
        f: impl FnOnce(&mut CartState) -> Result<R, CartError>,
    ) -> Result<(R, u64), CartError> {
        let mut state = self.lock_state();
        let out = f(&mut state.cart)?;
        state.revision += 1;
        Ok((out, state.revision))
    }

    async fn persist(&self, revision: u64) -> Result<(), CartError> {
        let mut persisted = self.persisted.lock().await;
        if *persisted >= revision {
            return Ok(());
        }

        let (snapshot, latest) = {
            let state = self.lock_state();
            (state.cart.to_snapshot(), state.revision)
        };
        let snapshot = snapshot?;
        let key = &self.config.storage_key;

        if let Err(source) = self.backend.set(key, snapshot).await {
            tracing::warn!(key = %key, revision = latest, error = %source, "cart persist failed");
            return Err(CartError::PersistenceWrite {
                key: key.clone(),
                source,
            });
        }

        *persisted = latest;
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, Committed> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.config.storage_key)
            .field("loaded", &self.loaded.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
