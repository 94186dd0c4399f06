//! Route handlers, one module per resource.
//!
//! Every handler is generic over the [`reel_core::store::MovieStore`] backing
//! the [`crate::AppState`].

pub mod auth;
pub mod movies;
pub mod reviews;
pub mod users;
pub mod watchlist;

/// `GET /`
pub async fn root() -> &'static str { "API Running" }
