//! Message types for inter-layer communication in the actor-based architecture.
//!
//! Commands flow into the collection actor; change events flow out of the
//! tree store to whoever subscribed (presentation, persistence).

pub mod commands;
pub mod events;

pub use commands::CollectionCommand;
pub use events::ChangeEvent;
