//! JSON REST API for Reel.
//!
//! Exposes an axum [`Router`] backed by any [`MovieStore`]. Every rating
//! change goes through the state's [`RatingAggregator`]; handlers never write
//! review rows directly.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(Arc::new(store), config);
//! axum::serve(listener, reel_api::router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use reel_core::{
  aggregator::{RatingAggregator, RetryPolicy},
  store::MovieStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{auth as auth_h, movies, reviews, users, watchlist};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REEL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:                  String,
  #[serde(default = "defaults::port")]
  pub port:                  u16,
  pub store_path:            PathBuf,
  #[serde(default = "defaults::session_ttl_hours")]
  pub session_ttl_hours:     i64,
  #[serde(default = "defaults::rating_retry_attempts")]
  pub rating_retry_attempts: u32,
  #[serde(default = "defaults::rating_retry_base_ms")]
  pub rating_retry_base_ms:  u64,
}

mod defaults {
  pub fn host() -> String { "127.0.0.1".to_string() }
  pub fn port() -> u16 { 8000 }
  pub fn session_ttl_hours() -> i64 { 24 * 7 }
  pub fn rating_retry_attempts() -> u32 { 3 }
  pub fn rating_retry_base_ms() -> u64 { 25 }
}

impl ServerConfig {
  /// All defaults, storing data at `store_path`.
  pub fn for_store(store_path: PathBuf) -> Self {
    Self {
      host: defaults::host(),
      port: defaults::port(),
      store_path,
      session_ttl_hours: defaults::session_ttl_hours(),
      rating_retry_attempts: defaults::rating_retry_attempts(),
      rating_retry_base_ms: defaults::rating_retry_base_ms(),
    }
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.rating_retry_attempts,
      base_delay:   Duration::from_millis(self.rating_retry_base_ms),
    }
  }

  /// Session lifetime, clamped to between one hour and one year.
  pub fn session_ttl(&self) -> chrono::Duration {
    chrono::Duration::hours(self.session_ttl_hours.clamp(1, 24 * 365))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub aggregator: RatingAggregator<S>,
  pub config:     Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      aggregator: self.aggregator.clone(),
      config:     Arc::clone(&self.config),
    }
  }
}

impl<S: MovieStore> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let aggregator =
      RatingAggregator::new(Arc::clone(&store)).with_retry_policy(config.retry_policy());
    Self { store, aggregator, config: Arc::new(config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: `GET /` plus the JSON API under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MovieStore + 'static,
{
  let api = Router::new()
    // Auth
    .route("/auth/register", post(auth_h::register::<S>))
    .route("/auth/login",    post(auth_h::login::<S>))
    .route("/auth/logout",   post(auth_h::logout::<S>))
    // Movies
    .route("/movies",      get(movies::list::<S>).post(movies::create::<S>))
    .route("/movies/{id}", get(movies::get_one::<S>))
    // Reviews
    .route(
      "/movies/{id}/reviews",
      get(reviews::list_for_movie::<S>)
        .post(reviews::submit::<S>)
        .delete(reviews::withdraw::<S>),
    )
    // Users
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::purge::<S>),
    )
    .route("/users/{id}/reviews", get(reviews::list_for_user::<S>))
    // Watchlist
    .route(
      "/users/{id}/watchlist",
      get(watchlist::list::<S>).post(watchlist::add::<S>),
    )
    .route(
      "/users/{id}/watchlist/{movie_id}",
      axum::routing::patch(watchlist::mark::<S>).delete(watchlist::remove::<S>),
    );

  Router::new()
    .route("/", get(handlers::root))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
