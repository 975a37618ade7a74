//! Cart contents and the quantity rules.

use std::collections::HashSet;

use crate::cart::{LineItem, NewLineItem};
use crate::error::{CartError, ItemError, SnapshotError};
use crate::ids::ProductId;

/// The line items in a cart, in insertion order.
///
/// Ids are unique and every quantity is at least 1. Entries are only
/// changed through [`add`](Self::add), [`increment`](Self::increment) and
/// [`decrement`](Self::decrement), which keep both properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_items(items: Vec<LineItem>) -> Result<Self, ItemError> {
        {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                item.check()?;
                if !seen.insert(item.id.as_str()) {
                    return Err(ItemError::DuplicateId(item.id.clone()));
                }
            }
        }
        Ok(Self { items })
    }

    /// Parse a persisted snapshot (a JSON array of line items), checking ids
    /// and quantities.
    pub fn from_snapshot(raw: &str) -> Result<Self, SnapshotError> {
        let items: Vec<LineItem> = serde_json::from_str(raw)?;
        Ok(Self::from_items(items)?)
    }

    /// Serialize to the persisted snapshot form.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Add one unit of `item`.
    ///
    /// An existing entry with the same id keeps its position and fields and
    /// gains one unit; otherwise the item is appended with quantity 1.
    /// Returns the entry's new quantity, or [`CartError::Overflow`] with the
    /// cart unchanged if the quantity is already at its maximum.
    pub fn add(&mut self, item: NewLineItem) -> Result<u32, CartError> {
        if let Some(existing) = self.find_mut(&item.id) {
            return bump(existing);
        }

        self.items.push(item.into_line_item(1));
        Ok(1)
    }

    /// Add one unit to the entry for `id`.
    ///
    /// Returns the new quantity, or `None` if no entry matches.
    pub fn increment(&mut self, id: &ProductId) -> Result<Option<u32>, CartError> {
        match self.find_mut(id) {
            Some(item) => bump(item).map(Some),
            None => Ok(None),
        }
    }

    /// Remove one unit from the entry for `id`, dropping the entry at zero.
    ///
    /// Returns the new quantity (`Some(0)` when the entry was removed), or
    /// `None` if no entry matches.
    pub fn decrement(&mut self, id: &ProductId) -> Option<u32> {
        let pos = self.items.iter().position(|i| &i.id == id)?;
        if self.items[pos].quantity > 1 {
            self.items[pos].quantity -= 1;
            Some(self.items[pos].quantity)
        } else {
            self.items.remove(pos);
            Some(0)
        }
    }

    /// Get an entry by product id.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Entries as a slice.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }
}

fn bump(item: &mut LineItem) -> Result<u32, CartError> {
    item.quantity = item
        .quantity
        .checked_add(1)
        .ok_or_else(|| CartError::Overflow(item.id.clone()))?;
    Ok(item.quantity)
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
