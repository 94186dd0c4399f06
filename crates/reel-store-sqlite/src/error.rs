//! Error type for `reel-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] reel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("corrupt row: {0}")]
  Corrupt(String),
}

impl Error {
  /// SQLite reported `SQLITE_BUSY` / `SQLITE_LOCKED`: another writer holds
  /// the lock.
  pub fn is_busy(&self) -> bool {
    let sqlite = match self {
      Self::Sqlite(e) => e,
      Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => e,
      _ => return false,
    };
    matches!(
      sqlite,
      rusqlite::Error::SqliteFailure(f, _)
        if matches!(f.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
    )
  }
}

impl From<Error> for reel_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(e) => e,
      e if e.is_busy() => reel_core::Error::Conflict(e.to_string()),
      e => reel_core::Error::Persistence(e.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
