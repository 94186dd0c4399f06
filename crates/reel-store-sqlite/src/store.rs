//! [`SqliteStore`], the SQLite implementation of [`MovieStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};
use uuid::Uuid;

use reel_core::{
  Error as CoreError,
  movie::{Movie, NewMovie},
  rating::{RatingDistribution, RatingSummary, RatingTally, Score},
  review::{AppliedRating, AuthoredReview, RatingInput, Review},
  store::MovieStore,
  user::{NewUser, Session, User, UserCredentials, UserUpdate},
  watchlist::{WatchlistEntry, WatchlistItem},
};

use crate::{
  Error, Result,
  encode::{
    MOVIE_COLUMNS, REVIEW_COLUMNS, RawMovie, RawReview, RawSession, RawUser,
    RawWatchlistEntry, USER_COLUMNS, WATCHLIST_COLUMNS, decode_score, decode_uuid, encode_dt,
    encode_list, encode_uuid, now,
  },
  schema::SCHEMA,
};

/// How long a writer waits for another connection's lock before the
/// operation fails with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reel store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls on
/// one `SqliteStore` run sequentially on its connection thread; writers on
/// other connections to the same file are excluded by `BEGIN IMMEDIATE`.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside `BEGIN IMMEDIATE`. The transaction commits only if `f`
  /// returns `Ok`; any error rolls back every write `f` made.
  ///
  /// `f` receives the transaction's timestamp, taken after the write lock is
  /// held.
  async fn write_unit<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection, DateTime<Utc>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx, now())?;
        tx.commit()?;
        Ok(value)
      })
      .await
  }

  /// Run raw SQL against the connection, e.g. to install a failing trigger.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .with_conn(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await
  }
}

// ─── Unit helpers (run on the connection thread) ─────────────────────────────

fn movie_exists(conn: &Connection, movie_id: &str) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM movies WHERE movie_id = ?1",
        params![movie_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn user_is_live(conn: &Connection, user_id: &str) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM users WHERE user_id = ?1 AND deleted_at IS NULL",
        params![user_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn active_scores(conn: &Connection, movie_id: &str) -> Result<Vec<Score>> {
  let mut stmt = conn.prepare(
    "SELECT score FROM reviews WHERE movie_id = ?1 AND withdrawn_at IS NULL",
  )?;
  let raws = stmt
    .query_map(params![movie_id], |r| r.get::<_, i64>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(decode_score).collect()
}

/// Recompute the movie's rating fields from its active reviews and write them
/// back. Must run inside the caller's transaction.
fn recompute_in(conn: &Connection, movie_id: Uuid) -> Result<RatingSummary> {
  let id = encode_uuid(movie_id);
  let summary = RatingTally::from_scores(active_scores(conn, &id)?).summary();
  let updated = conn.execute(
    "UPDATE movies SET aggregate_rating = ?2, rating_count = ?3 WHERE movie_id = ?1",
    params![id, summary.aggregate_rating, summary.rating_count],
  )?;
  if updated == 0 {
    return Err(CoreError::MovieNotFound(movie_id).into());
  }
  Ok(summary)
}

fn load_live_user(conn: &Connection, user_id: &str) -> Result<Option<RawUser>> {
  Ok(
    conn
      .query_row(
        &format!(
          "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1 AND deleted_at IS NULL"
        ),
        params![user_id],
        RawUser::read,
      )
      .optional()?,
  )
}

fn load_entry(
  conn: &Connection,
  user_id: &str,
  movie_id: &str,
) -> Result<Option<WatchlistEntry>> {
  conn
    .query_row(
      &format!(
        "SELECT {WATCHLIST_COLUMNS} FROM watchlist w WHERE w.user_id = ?1 AND w.movie_id = ?2"
      ),
      params![user_id, movie_id],
      RawWatchlistEntry::read,
    )
    .optional()?
    .map(RawWatchlistEntry::into_entry)
    .transpose()
}

fn query_reviews(
  conn: &Connection,
  sql: &str,
  key: &str,
  key2: Option<&str>,
) -> Result<Vec<Review>> {
  let mut stmt = conn.prepare(sql)?;
  let raws = match key2 {
    Some(k2) => stmt.query_map(params![key, k2], RawReview::read)?,
    None => stmt.query_map(params![key], RawReview::read)?,
  }
  .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawReview::into_review).collect()
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = Error;

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn add_movie(&self, input: NewMovie) -> Result<Movie> {
    let input = input.normalized()?;
    let movie = Movie {
      movie_id:         Uuid::new_v4(),
      title:            input.title,
      genres:           input.genres,
      release_year:     input.release_year,
      director:         input.director,
      cast:             input.cast,
      synopsis:         input.synopsis,
      poster_url:       input.poster_url,
      aggregate_rating: RatingSummary::EMPTY.aggregate_rating,
      rating_count:     RatingSummary::EMPTY.rating_count,
      created_at:       now(),
    };

    let id_str     = encode_uuid(movie.movie_id);
    let genres_str = encode_list(&movie.genres)?;
    let cast_str   = encode_list(&movie.cast)?;
    let at_str     = encode_dt(movie.created_at);
    let row        = movie.clone();

    self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO movies (
             movie_id, title, genres, release_year, director,
             cast_members, synopsis, poster_url, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          params![
            id_str,
            row.title,
            genres_str,
            row.release_year,
            row.director,
            cast_str,
            row.synopsis,
            row.poster_url,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(movie_id = %movie.movie_id, title = %movie.title, "movie added");
    Ok(movie)
  }

  async fn get_movie(&self, movie_id: Uuid) -> Result<Option<Movie>> {
    let id_str = encode_uuid(movie_id);
    self
      .with_conn(move |conn| {
        conn
          .query_row(
            &format!("SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.movie_id = ?1"),
            params![id_str],
            |row| RawMovie::read(row, 0),
          )
          .optional()?
          .map(RawMovie::into_movie)
          .transpose()
      })
      .await
  }

  async fn list_movies(&self) -> Result<Vec<Movie>> {
    self
      .with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MOVIE_COLUMNS} FROM movies m ORDER BY m.created_at, m.rowid"
        ))?;
        let raws = stmt
          .query_map([], |row| RawMovie::read(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawMovie::into_movie).collect()
      })
      .await
  }

  // ── Ratings: atomic units ────────────────────────────────────────────────

  async fn upsert_review(&self, input: RatingInput) -> Result<AppliedRating> {
    self
      .write_unit(move |conn, now| {
        let movie_id = encode_uuid(input.movie_id);
        let user_id  = encode_uuid(input.user_id);

        if !movie_exists(conn, &movie_id)? {
          return Err(CoreError::MovieNotFound(input.movie_id).into());
        }
        if !user_is_live(conn, &user_id)? {
          return Err(CoreError::UserNotFound(input.user_id).into());
        }

        let existing: Option<RawReview> = conn
          .query_row(
            &format!(
              "SELECT {REVIEW_COLUMNS} FROM reviews r
               WHERE r.movie_id = ?1 AND r.user_id = ?2 AND r.withdrawn_at IS NULL"
            ),
            params![movie_id, user_id],
            RawReview::read,
          )
          .optional()?;

        let score  = i64::from(input.score.get());
        let at_str = encode_dt(now);

        let (review, created) = match existing {
          Some(raw) => {
            conn.execute(
              "UPDATE reviews SET score = ?2, content = ?3, updated_at = ?4
               WHERE review_id = ?1",
              params![raw.review_id, score, input.content, at_str],
            )?;
            let mut review = raw.into_review()?;
            review.score = input.score;
            review.content = input.content;
            review.updated_at = Some(now);
            (review, false)
          }
          None => {
            let review_id = Uuid::new_v4();
            conn.execute(
              "INSERT INTO reviews (review_id, movie_id, user_id, score, content, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              params![
                encode_uuid(review_id),
                movie_id,
                user_id,
                score,
                input.content,
                at_str,
              ],
            )?;
            let review = Review {
              review_id,
              movie_id: input.movie_id,
              user_id: input.user_id,
              score: input.score,
              content: input.content,
              created_at: now,
              updated_at: None,
              withdrawn_at: None,
            };
            (review, true)
          }
        };

        let summary = recompute_in(conn, input.movie_id)?;
        Ok(AppliedRating { review, summary, created })
      })
      .await
  }

  async fn withdraw_review(&self, movie_id: Uuid, user_id: Uuid) -> Result<RatingSummary> {
    self
      .write_unit(move |conn, now| {
        let movie_str = encode_uuid(movie_id);
        if !movie_exists(conn, &movie_str)? {
          return Err(CoreError::MovieNotFound(movie_id).into());
        }
        let withdrawn = conn.execute(
          "UPDATE reviews SET withdrawn_at = ?3
           WHERE movie_id = ?1 AND user_id = ?2 AND withdrawn_at IS NULL",
          params![movie_str, encode_uuid(user_id), encode_dt(now)],
        )?;
        if withdrawn == 0 {
          tracing::debug!(%movie_id, %user_id, "no active review to withdraw");
        }
        recompute_in(conn, movie_id)
      })
      .await
  }

  async fn recompute_rating(&self, movie_id: Uuid) -> Result<RatingSummary> {
    self.write_unit(move |conn, _| recompute_in(conn, movie_id)).await
  }

  // ── Reviews: reads ───────────────────────────────────────────────────────

  async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>> {
    let id_str = encode_uuid(review_id);
    self
      .with_conn(move |conn| {
        conn
          .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.review_id = ?1"),
            params![id_str],
            RawReview::read,
          )
          .optional()?
          .map(RawReview::into_review)
          .transpose()
      })
      .await
  }

  async fn list_movie_reviews(&self, movie_id: Uuid) -> Result<Vec<AuthoredReview>> {
    let id_str = encode_uuid(movie_id);
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS}, u.username
           FROM reviews r
           JOIN users u ON u.user_id = r.user_id
           WHERE r.movie_id = ?1 AND r.withdrawn_at IS NULL
           ORDER BY r.created_at DESC, r.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(params![id_str], |row| {
            Ok((RawReview::read(row)?, row.get::<_, String>(8)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
          .into_iter()
          .map(|(raw, username)| -> Result<AuthoredReview> {
            Ok(AuthoredReview { review: raw.into_review()?, username })
          })
          .collect()
      })
      .await
  }

  async fn list_user_reviews(&self, user_id: Uuid) -> Result<Vec<Review>> {
    let id_str = encode_uuid(user_id);
    self
      .with_conn(move |conn| {
        query_reviews(
          conn,
          &format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r
             WHERE r.user_id = ?1 AND r.withdrawn_at IS NULL
             ORDER BY r.created_at DESC, r.rowid DESC"
          ),
          &id_str,
          None,
        )
      })
      .await
  }

  async fn review_history(&self, movie_id: Uuid, user_id: Uuid) -> Result<Vec<Review>> {
    let movie_str = encode_uuid(movie_id);
    let user_str  = encode_uuid(user_id);
    self
      .with_conn(move |conn| {
        query_reviews(
          conn,
          &format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r
             WHERE r.movie_id = ?1 AND r.user_id = ?2
             ORDER BY r.created_at, r.rowid"
          ),
          &movie_str,
          Some(&user_str),
        )
      })
      .await
  }

  async fn rating_distribution(&self, movie_id: Uuid) -> Result<RatingDistribution> {
    self
      .with_conn(move |conn| {
        let id = encode_uuid(movie_id);
        if !movie_exists(conn, &id)? {
          return Err(CoreError::MovieNotFound(movie_id).into());
        }
        Ok(RatingDistribution::from_scores(active_scores(conn, &id)?))
      })
      .await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:         Uuid::new_v4(),
      username:        input.username,
      email:           input.email,
      display_name:    input.display_name,
      favorite_genres: input.favorite_genres,
      avatar_url:      None,
      bio:             None,
      joined_at:       now(),
    };

    let row           = user.clone();
    let genres_str    = encode_list(&user.favorite_genres)?;
    let password_hash = input.password_hash;

    self
      .write_unit(move |conn, _| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND deleted_at IS NULL",
            params![row.email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Err(CoreError::EmailTaken(row.email).into());
        }
        conn.execute(
          "INSERT INTO users (
             user_id, username, email, password_hash,
             display_name, favorite_genres, joined_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            encode_uuid(row.user_id),
            row.username,
            row.email,
            password_hash,
            row.display_name,
            genres_str,
            encode_dt(row.joined_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(user_id = %user.user_id, "user registered");
    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);
    self
      .with_conn(move |conn| {
        load_live_user(conn, &id_str)?.map(RawUser::into_user).transpose()
      })
      .await
  }

  async fn find_credentials(&self, email: String) -> Result<Option<UserCredentials>> {
    self
      .with_conn(move |conn| {
        conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 AND deleted_at IS NULL"
            ),
            params![email],
            RawUser::read,
          )
          .optional()?
          .map(|raw| -> Result<UserCredentials> {
            let (user, password_hash) = raw.into_parts()?;
            Ok(UserCredentials { user, password_hash })
          })
          .transpose()
      })
      .await
  }

  async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> Result<User> {
    let update = update.normalized();
    self
      .write_unit(move |conn, _| {
        let id_str = encode_uuid(user_id);
        let mut user = load_live_user(conn, &id_str)?
          .ok_or(CoreError::UserNotFound(user_id))?
          .into_user()?;

        // An empty string clears an optional field.
        let apply = |field: &mut Option<String>, value: Option<String>| {
          if let Some(v) = value {
            *field = Some(v).filter(|s| !s.is_empty());
          }
        };
        apply(&mut user.display_name, update.display_name);
        apply(&mut user.avatar_url, update.avatar_url);
        apply(&mut user.bio, update.bio);
        if let Some(genres) = update.favorite_genres {
          user.favorite_genres = genres;
        }

        conn.execute(
          "UPDATE users
           SET display_name = ?2, avatar_url = ?3, bio = ?4, favorite_genres = ?5
           WHERE user_id = ?1",
          params![
            id_str,
            user.display_name,
            user.avatar_url,
            user.bio,
            encode_list(&user.favorite_genres)?,
          ],
        )?;
        Ok(user)
      })
      .await
  }

  async fn purge_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .write_unit(move |conn, now| {
        let id_str = encode_uuid(user_id);
        if !user_is_live(conn, &id_str)? {
          return Err(CoreError::UserNotFound(user_id).into());
        }
        let at_str = encode_dt(now);

        let movie_ids: Vec<Uuid> = {
          let mut stmt = conn.prepare(
            "SELECT DISTINCT movie_id FROM reviews
             WHERE user_id = ?1 AND withdrawn_at IS NULL
             ORDER BY movie_id",
          )?;
          let raws = stmt
            .query_map(params![id_str], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          raws.iter().map(|s| decode_uuid(s)).collect::<Result<_>>()?
        };

        conn.execute(
          "UPDATE reviews SET withdrawn_at = ?2 WHERE user_id = ?1 AND withdrawn_at IS NULL",
          params![id_str, at_str],
        )?;
        for movie_id in &movie_ids {
          recompute_in(conn, *movie_id)?;
        }

        conn.execute("DELETE FROM watchlist WHERE user_id = ?1", params![id_str])?;
        conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![id_str])?;
        conn.execute(
          "UPDATE users SET deleted_at = ?2 WHERE user_id = ?1",
          params![id_str, at_str],
        )?;
        Ok(movie_ids)
      })
      .await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session { token_hash, user_id, created_at: now(), expires_at };
    let row = session.clone();
    self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          params![
            row.token_hash,
            encode_uuid(row.user_id),
            encode_dt(row.created_at),
            encode_dt(row.expires_at),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(session)
  }

  async fn find_session(&self, token_hash: String) -> Result<Option<Session>> {
    self
      .with_conn(move |conn| {
        conn
          .query_row(
            "SELECT token_hash, user_id, created_at, expires_at
             FROM sessions WHERE token_hash = ?1",
            params![token_hash],
            |row| {
              Ok(RawSession {
                token_hash: row.get(0)?,
                user_id:    row.get(1)?,
                created_at: row.get(2)?,
                expires_at: row.get(3)?,
              })
            },
          )
          .optional()?
          .map(RawSession::into_session)
          .transpose()
      })
      .await
  }

  async fn delete_session(&self, token_hash: String) -> Result<bool> {
    self
      .with_conn(move |conn| {
        let n = conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          params![token_hash],
        )?;
        Ok(n > 0)
      })
      .await
  }

  // ── Watchlist ─────────────────────────────────────────────────────────────

  async fn add_to_watchlist(&self, user_id: Uuid, movie_id: Uuid) -> Result<WatchlistEntry> {
    self
      .write_unit(move |conn, now| {
        let user_str  = encode_uuid(user_id);
        let movie_str = encode_uuid(movie_id);
        if !user_is_live(conn, &user_str)? {
          return Err(CoreError::UserNotFound(user_id).into());
        }
        if !movie_exists(conn, &movie_str)? {
          return Err(CoreError::MovieNotFound(movie_id).into());
        }
        if load_entry(conn, &user_str, &movie_str)?.is_some() {
          return Err(CoreError::AlreadyInWatchlist { user_id, movie_id }.into());
        }
        conn.execute(
          "INSERT INTO watchlist (user_id, movie_id, added_at) VALUES (?1, ?2, ?3)",
          params![user_str, movie_str, encode_dt(now)],
        )?;
        Ok(WatchlistEntry { user_id, movie_id, added_at: now, watched: false })
      })
      .await
  }

  async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<WatchlistItem>> {
    let id_str = encode_uuid(user_id);
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WATCHLIST_COLUMNS}, {MOVIE_COLUMNS}
           FROM watchlist w
           JOIN movies m ON m.movie_id = w.movie_id
           WHERE w.user_id = ?1
           ORDER BY w.added_at, w.rowid"
        ))?;
        let rows = stmt
          .query_map(params![id_str], |row| {
            Ok((RawWatchlistEntry::read(row)?, RawMovie::read(row, 4)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
          .into_iter()
          .map(|(entry, movie)| -> Result<WatchlistItem> {
            Ok(WatchlistItem { entry: entry.into_entry()?, movie: movie.into_movie()? })
          })
          .collect()
      })
      .await
  }

  async fn set_watched(
    &self,
    user_id: Uuid,
    movie_id: Uuid,
    watched: bool,
  ) -> Result<Option<WatchlistEntry>> {
    self
      .write_unit(move |conn, _| {
        let user_str  = encode_uuid(user_id);
        let movie_str = encode_uuid(movie_id);
        let n = conn.execute(
          "UPDATE watchlist SET watched = ?3 WHERE user_id = ?1 AND movie_id = ?2",
          params![user_str, movie_str, watched],
        )?;
        if n == 0 {
          return Ok(None);
        }
        load_entry(conn, &user_str, &movie_str)
      })
      .await
  }

  async fn remove_from_watchlist(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
    let user_str  = encode_uuid(user_id);
    let movie_str = encode_uuid(movie_id);
    self
      .with_conn(move |conn| {
        let n = conn.execute(
          "DELETE FROM watchlist WHERE user_id = ?1 AND movie_id = ?2",
          params![user_str, movie_str],
        )?;
        Ok(n > 0)
      })
      .await
  }
}
