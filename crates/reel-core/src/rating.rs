//! Rating arithmetic: scores, the running tally, and the rounded summary
//! stored on a movie.
//!
//! The aggregate is always the arithmetic mean of the currently active scores,
//! rounded half-up to one decimal place. All arithmetic is done on integers
//! (sums of scores and tenths) so the stored value never depends on float
//! accumulation order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Score ───────────────────────────────────────────────────────────────────

/// A single review score on the inclusive 1..=5 star scale.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  /// Validate a raw score.
  pub fn new(raw: i64) -> Result<Self> {
    if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&raw) {
      Ok(Self(raw as u8))
    } else {
      Err(Error::Validation(format!(
        "score must be between {} and {}, got {raw}",
        Self::MIN,
        Self::MAX
      )))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(raw: i64) -> Result<Self> { Self::new(raw) }
}

impl From<Score> for u8 {
  fn from(s: Score) -> Self { s.0 }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The derived rating fields persisted on a movie.
///
/// A movie with no active reviews has `aggregate_rating == 0.0` and
/// `rating_count == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
  pub aggregate_rating: f64,
  pub rating_count:     u32,
}

impl RatingSummary {
  pub const EMPTY: Self = Self { aggregate_rating: 0.0, rating_count: 0 };
}

// ─── Tally ───────────────────────────────────────────────────────────────────

/// Running sum and count of active scores.
///
/// Supports O(1) add / replace / remove; [`RatingTally::summary`] yields the
/// same value as recomputing from the full score set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingTally {
  sum:   u64,
  count: u32,
}

impl RatingTally {
  pub fn from_scores<I>(scores: I) -> Self
  where
    I: IntoIterator<Item = Score>,
  {
    scores.into_iter().fold(Self::default(), |mut t, s| {
      t.add(s);
      t
    })
  }

  pub fn add(&mut self, score: Score) {
    self.sum += u64::from(score.get());
    self.count += 1;
  }

  pub fn replace(&mut self, old: Score, new: Score) {
    self.sum = self.sum.saturating_sub(u64::from(old.get())) + u64::from(new.get());
  }

  /// Remove a previously added score. Removing from an empty tally is a
  /// no-op.
  pub fn remove(&mut self, score: Score) {
    if self.count == 0 {
      return;
    }
    self.sum = self.sum.saturating_sub(u64::from(score.get()));
    self.count -= 1;
  }

  pub fn count(&self) -> u32 { self.count }

  pub fn sum(&self) -> u64 { self.sum }

  /// The mean rounded half-up to tenths, as an integer number of tenths.
  pub fn mean_tenths(&self) -> u64 {
    if self.count == 0 {
      return 0;
    }
    let n = u64::from(self.count);
    // floor(10·sum/n + 1/2) == floor((20·sum + n) / 2n)
    (self.sum * 20 + n) / (n * 2)
  }

  pub fn summary(&self) -> RatingSummary {
    if self.count == 0 {
      return RatingSummary::EMPTY;
    }
    RatingSummary {
      aggregate_rating: self.mean_tenths() as f64 / 10.0,
      rating_count:     self.count,
    }
  }
}

// ─── Distribution ────────────────────────────────────────────────────────────

/// Number of active reviews per star value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatingDistribution {
  /// `counts[0]` is one-star reviews, `counts[4]` five-star reviews.
  pub counts: [u32; 5],
}

impl RatingDistribution {
  pub fn from_scores<I>(scores: I) -> Self
  where
    I: IntoIterator<Item = Score>,
  {
    let mut counts = [0u32; 5];
    for s in scores {
      counts[usize::from(s.get() - Score::MIN)] += 1;
    }
    Self { counts }
  }

  pub fn count_for(&self, score: Score) -> u32 {
    self.counts[usize::from(score.get() - Score::MIN)]
  }

  pub fn total(&self) -> u32 { self.counts.iter().sum() }
}
