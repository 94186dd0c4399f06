//! Reviews: one user's score (and optional text) for one movie.
//!
//! At most one review per `(movie, user)` pair is active. Resubmitting
//! replaces the score in place; withdrawing sets `withdrawn_at` and keeps the
//! row for history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, rating::Score};

/// Longest review text accepted, in characters.
pub const MAX_CONTENT_CHARS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub review_id:    Uuid,
  pub movie_id:     Uuid,
  pub user_id:      Uuid,
  pub score:        Score,
  pub content:      Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   Option<DateTime<Utc>>,
  pub withdrawn_at: Option<DateTime<Utc>>,
}

impl Review {
  pub fn is_active(&self) -> bool { self.withdrawn_at.is_none() }
}

/// A review bundled with its author's username for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoredReview {
  #[serde(flatten)]
  pub review:   Review,
  pub username: String,
}

/// A validated rating submission, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingInput {
  pub movie_id: Uuid,
  pub user_id:  Uuid,
  pub score:    Score,
  pub content:  Option<String>,
}

impl RatingInput {
  /// Validate a raw submission. Nothing is written if this fails.
  pub fn new(
    movie_id: Uuid,
    user_id: Uuid,
    score: i64,
    content: Option<String>,
  ) -> Result<Self> {
    Ok(Self {
      movie_id,
      user_id,
      score: Score::new(score)?,
      content: validate_content(content)?,
    })
  }
}

/// Trim review text; blank text becomes `None`.
pub fn validate_content(content: Option<String>) -> Result<Option<String>> {
  let Some(text) = content else { return Ok(None) };
  let text = text.trim();
  if text.is_empty() {
    return Ok(None);
  }
  if text.chars().count() > MAX_CONTENT_CHARS {
    return Err(Error::Validation(format!(
      "review text exceeds {MAX_CONTENT_CHARS} characters"
    )));
  }
  if text.chars().any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t')) {
    return Err(Error::Validation(
      "review text contains control characters".into(),
    ));
  }
  Ok(Some(text.to_owned()))
}

/// The result of a successful rating write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRating {
  pub review:  Review,
  pub summary: crate::rating::RatingSummary,
  /// `false` when an existing active review was replaced.
  pub created: bool,
}
