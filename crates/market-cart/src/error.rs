//! Cart error types.

use market_store::StoreError;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// A stored snapshot exists but is not a valid list of line items.
    #[error("Malformed cart snapshot under {key}: {source}")]
    InitializationParse {
        key: String,
        #[source]
        source: SnapshotError,
    },

    /// Cart used outside a mounted scope, or loaded twice.
    #[error("Cart contract violation: {0}")]
    ContractViolation(String),

    /// Writing the snapshot failed. In-memory state already holds the change.
    #[error("Failed to persist cart under {key}: {source}")]
    PersistenceWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Reading the snapshot failed.
    #[error("Failed to read cart under {key}: {source}")]
    StorageRead {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Item rejected by field validation.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] ItemError),

    /// Quantity would exceed the representable maximum.
    #[error("Quantity overflow for {0}")]
    Overflow(ProductId),

    /// Encoding the snapshot failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CartError {
    /// Whether the in-memory cart diverges from storage after this error.
    pub fn is_persistence_divergence(&self) -> bool {
        matches!(self, CartError::PersistenceWrite { .. })
    }
}

/// A line item field constraint that does not hold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError {
    /// Product id is empty.
    #[error("product id is empty")]
    EmptyId,

    /// Price is negative, NaN or infinite.
    #[error("item {id} has invalid price {price}")]
    InvalidPrice { id: ProductId, price: f64 },

    /// Quantity is zero.
    #[error("item {0} has quantity 0")]
    ZeroQuantity(ProductId),

    /// Two entries share an id.
    #[error("duplicate item {0}")]
    DuplicateId(ProductId),
}

/// Why a stored snapshot could not be turned into a cart.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Not a JSON array of line item records.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Records parsed but break a line item constraint.
    #[error(transparent)]
    Item(#[from] ItemError),
}
