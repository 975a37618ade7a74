//! Line item types.

use serde::{Deserialize, Serialize};

use crate::error::{CartError, ItemError};
use crate::ids::ProductId;

/// A product entry in the cart.
///
/// Serialized with the key names the mobile client persisted
/// (`image_url`, `price`), so existing snapshots stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier; unique within a cart.
    pub id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Product image.
    pub image_url: String,
    /// Unit price.
    #[serde(rename = "price")]
    pub unit_price: f64,
    /// Quantity, always >= 1 inside a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Check the field constraints a cart entry must satisfy.
    pub(crate) fn check(&self) -> Result<(), ItemError> {
        check_fields(&self.id, self.unit_price)?;
        if self.quantity == 0 {
            return Err(ItemError::ZeroQuantity(self.id.clone()));
        }
        Ok(())
    }
}

/// Input to [`CartStore::add_to_cart`](crate::CartStore::add_to_cart).
///
/// Carries no quantity: the cart decides it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub unit_price: f64,
}

impl NewLineItem {
    /// Create a new item descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            unit_price,
        }
    }

    /// Validate the descriptor.
    pub fn validate(&self) -> Result<(), CartError> {
        Ok(check_fields(&self.id, self.unit_price)?)
    }

    pub(crate) fn into_line_item(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            unit_price: self.unit_price,
            quantity,
        }
    }
}

fn check_fields(id: &ProductId, unit_price: f64) -> Result<(), ItemError> {
    if id.is_empty() {
        return Err(ItemError::EmptyId);
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(ItemError::InvalidPrice {
            id: id.clone(),
            price: unit_price,
        });
    }
    Ok(())
}
