//! Users, credentials and login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  movie::{clean_list, clean_opt},
};

pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=30;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Public profile of a registered user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub user_id:         Uuid,
  pub username:        String,
  pub email:           String,
  pub display_name:    Option<String>,
  pub favorite_genres: Vec<String>,
  pub avatar_url:      Option<String>,
  pub bio:             Option<String>,
  pub joined_at:       DateTime<Utc>,
}

/// A user together with the stored PHC password hash; returned only by the
/// login lookup.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

/// Input to [`crate::store::MovieStore::add_user`]. The password must already
/// be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:        String,
  pub email:           String,
  pub password_hash:   String,
  pub display_name:    Option<String>,
  pub favorite_genres: Vec<String>,
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
  pub display_name:    Option<String>,
  pub avatar_url:      Option<String>,
  pub bio:             Option<String>,
  pub favorite_genres: Option<Vec<String>>,
}

impl UserUpdate {
  pub fn normalized(self) -> Self {
    Self {
      display_name:    self.display_name.map(|s| s.trim().to_owned()),
      avatar_url:      self.avatar_url.map(|s| s.trim().to_owned()),
      bio:             self.bio.map(|s| s.trim().to_owned()),
      favorite_genres: self.favorite_genres.map(clean_list),
    }
  }
}

/// A bearer-token login session. Only the SHA-256 digest of the token is
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub token_hash: String,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

// ─── Validation ──────────────────────────────────────────────────────────────

pub fn validate_username(raw: &str) -> Result<String> {
  let name = raw.trim();
  if !USERNAME_LEN.contains(&name.chars().count()) {
    return Err(Error::Validation(format!(
      "username must be {} to {} characters",
      USERNAME_LEN.start(),
      USERNAME_LEN.end()
    )));
  }
  if !name
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
  {
    return Err(Error::Validation(
      "username may only contain letters, digits, '_', '.' and '-'".into(),
    ));
  }
  Ok(name.to_owned())
}

/// Trim and lowercase an email address. Only the basic `local@domain` shape
/// is checked.
pub fn normalize_email(raw: &str) -> Result<String> {
  let email = raw.trim().to_lowercase();
  match email.split_once('@') {
    Some((local, domain))
      if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
    {
      Ok(email)
    }
    _ => Err(Error::Validation(format!("invalid email address: {raw:?}"))),
  }
}

pub fn validate_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_CHARS {
    return Err(Error::Validation(format!(
      "password must be at least {MIN_PASSWORD_CHARS} characters"
    )));
  }
  Ok(())
}

pub fn clean_display_name(raw: Option<String>) -> Option<String> { clean_opt(raw) }
