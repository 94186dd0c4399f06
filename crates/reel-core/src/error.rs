//! Error types for `reel-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// Caller input was rejected before anything was written.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("movie not found: {0}")]
  MovieNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("movie {movie_id} is already in the watchlist of {user_id}")]
  AlreadyInWatchlist { user_id: Uuid, movie_id: Uuid },

  /// Transient lock contention; the whole operation may be retried.
  #[error("write conflict: {0}")]
  Conflict(String),

  /// The backing store failed; nothing from the operation was applied.
  #[error("persistence error: {0}")]
  Persistence(String),
}

impl Error {
  /// Whether retrying the same operation may succeed.
  pub fn is_transient(&self) -> bool { matches!(self, Self::Conflict(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
