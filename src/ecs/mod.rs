//! Minimal entity/component store
//!
//! Entities are bare ids; each component type lives in its own sparse table,
//! and presence is independent per type.

mod query;
mod spawn;
mod store;
mod table;

/// Opaque entity identity.
pub type Entity = u32;

pub use query::{Fetch, Query, Rows};
pub use spawn::EntitySpec;
pub use store::{Component, ComponentKind, Store, StoreId};
pub use table::Table;
