//! Movies, the subject that reviews are recorded against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, rating::RatingSummary};

/// Oldest and newest release year accepted on input.
pub const RELEASE_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1870..=2100;

/// A movie with its derived rating fields.
///
/// `aggregate_rating` and `rating_count` are only ever written by the rating
/// aggregator; every other write path leaves them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:         Uuid,
  pub title:            String,
  pub genres:           Vec<String>,
  pub release_year:     Option<i32>,
  pub director:         Option<String>,
  pub cast:             Vec<String>,
  pub synopsis:         Option<String>,
  pub poster_url:       Option<String>,
  pub aggregate_rating: f64,
  pub rating_count:     u32,
  pub created_at:       DateTime<Utc>,
}

impl Movie {
  pub fn rating_summary(&self) -> RatingSummary {
    RatingSummary {
      aggregate_rating: self.aggregate_rating,
      rating_count:     self.rating_count,
    }
  }

  /// Case-insensitive exact genre match.
  pub fn has_genre(&self, genre: &str) -> bool {
    self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
  }
}

/// Input to [`crate::store::MovieStore::add_movie`]. Rating fields always
/// start at the empty state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMovie {
  pub title:        String,
  #[serde(default)]
  pub genres:       Vec<String>,
  pub release_year: Option<i32>,
  pub director:     Option<String>,
  #[serde(default)]
  pub cast:         Vec<String>,
  pub synopsis:     Option<String>,
  pub poster_url:   Option<String>,
}

impl NewMovie {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }

  /// Trim text fields, drop blank entries, and reject unusable input.
  pub fn normalized(mut self) -> Result<Self> {
    self.title = self.title.trim().to_owned();
    if self.title.is_empty() {
      return Err(Error::Validation("title is required".into()));
    }
    if let Some(year) = self.release_year
      && !RELEASE_YEAR_RANGE.contains(&year)
    {
      return Err(Error::Validation(format!(
        "release year {year} is outside {}..={}",
        RELEASE_YEAR_RANGE.start(),
        RELEASE_YEAR_RANGE.end()
      )));
    }
    self.genres = clean_list(self.genres);
    self.cast = clean_list(self.cast);
    self.director = clean_opt(self.director);
    self.synopsis = clean_opt(self.synopsis);
    self.poster_url = clean_opt(self.poster_url);
    Ok(self)
  }
}

pub(crate) fn clean_list(items: Vec<String>) -> Vec<String> {
  items
    .into_iter()
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
    .collect()
}

pub(crate) fn clean_opt(value: Option<String>) -> Option<String> {
  value.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}
