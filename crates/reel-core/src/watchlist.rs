//! Watchlist entries: movies a user has saved for later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::movie::Movie;

/// One `(user, movie)` watchlist row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
  pub user_id:  Uuid,
  pub movie_id: Uuid,
  pub added_at: DateTime<Utc>,
  pub watched:  bool,
}

/// A watchlist entry joined with the movie it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
  #[serde(flatten)]
  pub entry: WatchlistEntry,
  pub movie: Movie,
}
