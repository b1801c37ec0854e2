//! User entity model for userbase.
//!
//! Defines the only entity the service persists:
//! - [`User`]: in-memory representation of a row in the `users` table
//! - [`UserId`]: store-assigned integer identifier
//! - [`Gender`]: the closed set of accepted gender values
//!
//! The setters on [`User`] take loosely-typed JSON values and silently ignore
//! anything they cannot accept. Strict rejection of bad input happens one layer
//! up, in the request argument parser of the server crate.

mod gender;
mod ids;
mod user;

pub use gender::Gender;
pub use ids::UserId;
pub use user::User;
