//! SQLite storage layer for userbase.
//!
//! One table, `users`, holding the rows behind [`userbase_model::User`].
//! Ids are assigned by SQLite (`INTEGER PRIMARY KEY AUTOINCREMENT`) and user
//! names are unique. Every write is a single statement, so each request that
//! touches the store commits atomically.

mod error;
mod user_store;

pub use error::{StoreError, StoreResult};
pub use user_store::UserStore;
