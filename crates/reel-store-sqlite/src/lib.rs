//! SQLite backend for the Reel movie-review store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every rating write runs inside a
//! `BEGIN IMMEDIATE` transaction that also recomputes the movie's aggregate.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
