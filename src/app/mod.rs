//! App layer - the tree store and its command processing
//!
//! The collection actor owns the tree store, applies commands one at a
//! time and lets the store broadcast change events to subscribers.

pub mod actor;
pub mod commands;
pub mod reorder;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use actor::CollectionActor;
pub use reorder::move_item_in_vec;
pub use state::CollectionState;
