//! Inventory domain module.
//!
//! Stock records, their typed patch, and the low-stock rule. Pure domain logic
//! (no IO, no storage).

pub mod item;
pub mod money;

pub use item::{InventoryItem, ItemChanges, ItemPatch};
pub use money::Money;
