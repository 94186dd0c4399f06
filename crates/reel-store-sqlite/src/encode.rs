//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond precision
//! so that they sort lexicographically. String lists are stored as compact
//! JSON arrays. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use reel_core::{
  movie::Movie,
  rating::Score,
  review::Review,
  user::{Session, User},
  watchlist::WatchlistEntry,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time truncated to the precision stored on disk.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

pub fn decode_score(raw: i64) -> Result<Score> {
  Score::new(raw).map_err(|e| Error::Corrupt(e.to_string()))
}

fn decode_count(raw: i64) -> Result<u32> {
  u32::try_from(raw).map_err(|_| Error::Corrupt(format!("negative rating count {raw}")))
}

// ─── Movies ──────────────────────────────────────────────────────────────────

pub const MOVIE_COLUMNS: &str = "m.movie_id, m.title, m.genres, m.release_year, m.director, \
   m.cast_members, m.synopsis, m.poster_url, m.aggregate_rating, m.rating_count, m.created_at";

/// Raw values read directly from a `movies` row.
pub struct RawMovie {
  pub movie_id:         String,
  pub title:            String,
  pub genres:           String,
  pub release_year:     Option<i32>,
  pub director:         Option<String>,
  pub cast_members:     String,
  pub synopsis:         Option<String>,
  pub poster_url:       Option<String>,
  pub aggregate_rating: f64,
  pub rating_count:     i64,
  pub created_at:       String,
}

impl RawMovie {
  /// Read [`MOVIE_COLUMNS`] starting at column `at`.
  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      movie_id:         row.get(at)?,
      title:            row.get(at + 1)?,
      genres:           row.get(at + 2)?,
      release_year:     row.get(at + 3)?,
      director:         row.get(at + 4)?,
      cast_members:     row.get(at + 5)?,
      synopsis:         row.get(at + 6)?,
      poster_url:       row.get(at + 7)?,
      aggregate_rating: row.get(at + 8)?,
      rating_count:     row.get(at + 9)?,
      created_at:       row.get(at + 10)?,
    })
  }

  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      movie_id:         decode_uuid(&self.movie_id)?,
      title:            self.title,
      genres:           decode_list(&self.genres)?,
      release_year:     self.release_year,
      director:         self.director,
      cast:             decode_list(&self.cast_members)?,
      synopsis:         self.synopsis,
      poster_url:       self.poster_url,
      aggregate_rating: self.aggregate_rating,
      rating_count:     decode_count(self.rating_count)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

pub const REVIEW_COLUMNS: &str = "r.review_id, r.movie_id, r.user_id, r.score, r.content, \
   r.created_at, r.updated_at, r.withdrawn_at";

/// Raw values read directly from a `reviews` row.
pub struct RawReview {
  pub review_id:    String,
  pub movie_id:     String,
  pub user_id:      String,
  pub score:        i64,
  pub content:      Option<String>,
  pub created_at:   String,
  pub updated_at:   Option<String>,
  pub withdrawn_at: Option<String>,
}

impl RawReview {
  pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:    row.get(0)?,
      movie_id:     row.get(1)?,
      user_id:      row.get(2)?,
      score:        row.get(3)?,
      content:      row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
      withdrawn_at: row.get(7)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:    decode_uuid(&self.review_id)?,
      movie_id:     decode_uuid(&self.movie_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      score:        decode_score(self.score)?,
      content:      self.content,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_opt_dt(self.updated_at)?,
      withdrawn_at: decode_opt_dt(self.withdrawn_at)?,
    })
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, username, email, display_name, favorite_genres, \
   avatar_url, bio, joined_at, password_hash";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:         String,
  pub username:        String,
  pub email:           String,
  pub display_name:    Option<String>,
  pub favorite_genres: String,
  pub avatar_url:      Option<String>,
  pub bio:             Option<String>,
  pub joined_at:       String,
  pub password_hash:   String,
}

impl RawUser {
  pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:         row.get(0)?,
      username:        row.get(1)?,
      email:           row.get(2)?,
      display_name:    row.get(3)?,
      favorite_genres: row.get(4)?,
      avatar_url:      row.get(5)?,
      bio:             row.get(6)?,
      joined_at:       row.get(7)?,
      password_hash:   row.get(8)?,
    })
  }

  /// Decode, returning the stored password hash alongside the profile.
  pub fn into_parts(self) -> Result<(User, String)> {
    let user = User {
      user_id:         decode_uuid(&self.user_id)?,
      username:        self.username,
      email:           self.email,
      display_name:    self.display_name,
      favorite_genres: decode_list(&self.favorite_genres)?,
      avatar_url:      self.avatar_url,
      bio:             self.bio,
      joined_at:       decode_dt(&self.joined_at)?,
    };
    Ok((user, self.password_hash))
  }

  pub fn into_user(self) -> Result<User> { Ok(self.into_parts()?.0) }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

pub struct RawSession {
  pub token_hash: String,
  pub user_id:    String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}

// ─── Watchlist ───────────────────────────────────────────────────────────────

pub const WATCHLIST_COLUMNS: &str = "w.user_id, w.movie_id, w.added_at, w.watched";

pub struct RawWatchlistEntry {
  pub user_id:  String,
  pub movie_id: String,
  pub added_at: String,
  pub watched:  bool,
}

impl RawWatchlistEntry {
  pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:  row.get(0)?,
      movie_id: row.get(1)?,
      added_at: row.get(2)?,
      watched:  row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<WatchlistEntry> {
    Ok(WatchlistEntry {
      user_id:  decode_uuid(&self.user_id)?,
      movie_id: decode_uuid(&self.movie_id)?,
      added_at: decode_dt(&self.added_at)?,
      watched:  self.watched,
    })
  }
}
