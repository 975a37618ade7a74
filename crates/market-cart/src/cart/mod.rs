//! Shopping cart module.
//!
//! Contains the line item types, the cart state with its quantity rules, the
//! persistent store, and the scope handle UI code reaches the store through.

mod item;
mod scope;
mod state;
mod store;

pub use item::{LineItem, NewLineItem};
pub use scope::{CartProvider, CartScope};
pub use state::CartState;
pub use store::CartStore;
