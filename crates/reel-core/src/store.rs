//! The `MovieStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `reel-store-sqlite`).
//! Higher layers (`reel-api`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  movie::{Movie, NewMovie},
  rating::{RatingDistribution, RatingSummary},
  review::{AppliedRating, AuthoredReview, RatingInput, Review},
  user::{NewUser, Session, User, UserCredentials, UserUpdate},
  watchlist::{WatchlistEntry, WatchlistItem},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Reel storage backend.
///
/// Every method that touches review rows is one atomic unit: the review write
/// and the recomputation of the owning movie's `aggregate_rating` /
/// `rating_count` either both become visible or neither does. Implementations
/// must serialize such units per movie (a transaction with serializable
/// isolation, or an equivalent lock). Transient lock contention is reported as
/// [`crate::Error::Conflict`] after conversion so callers can retry.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Persist a new movie with the empty rating state.
  fn add_movie(
    &self,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Retrieve a movie by UUID. Returns `None` if not found.
  fn get_movie(
    &self,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// All movies in creation order.
  fn list_movies(
    &self,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  // ── Ratings: atomic units ────────────────────────────────────────────

  /// Replace the active review for `(input.movie_id, input.user_id)` in place,
  /// or create one, then recompute the movie's rating fields.
  ///
  /// Fails with `MovieNotFound` / `UserNotFound` without writing anything.
  fn upsert_review(
    &self,
    input: RatingInput,
  ) -> impl Future<Output = Result<AppliedRating, Self::Error>> + Send + '_;

  /// Soft-delete the active review for `(movie_id, user_id)`, if any, then
  /// recompute. Returns the movie's summary afterwards.
  fn withdraw_review(
    &self,
    movie_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<RatingSummary, Self::Error>> + Send + '_;

  /// Recompute and persist the movie's rating fields from its active reviews.
  fn recompute_rating(
    &self,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<RatingSummary, Self::Error>> + Send + '_;

  // ── Reviews: reads ───────────────────────────────────────────────────

  /// Retrieve a review (active or withdrawn) by UUID.
  fn get_review(
    &self,
    review_id: Uuid,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  /// Active reviews for a movie, newest first, with author usernames.
  fn list_movie_reviews(
    &self,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AuthoredReview>, Self::Error>> + Send + '_;

  /// A user's active reviews, newest first.
  fn list_user_reviews(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Every review for `(movie_id, user_id)`, withdrawn ones included, oldest
  /// first.
  fn review_history(
    &self,
    movie_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  fn rating_distribution(
    &self,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<RatingDistribution, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Fails with `EmailTaken` if a live account already uses the email.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a live (not purged) user.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a live user by normalized email, with the stored password hash.
  fn find_credentials(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    user_id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Purge an account in one atomic unit: withdraw every active review of
  /// the user and recompute each affected movie, drop the watchlist and
  /// sessions, and mark the user deleted. Returns the affected movie IDs.
  fn purge_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  fn find_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Returns `true` if a session was removed.
  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Watchlist ─────────────────────────────────────────────────────────

  /// Fails with `AlreadyInWatchlist` if the pair exists.
  fn add_to_watchlist(
    &self,
    user_id: Uuid,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<WatchlistEntry, Self::Error>> + Send + '_;

  /// The user's watchlist joined with movies, oldest entry first.
  fn list_watchlist(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<WatchlistItem>, Self::Error>> + Send + '_;

  /// Returns `None` if the movie is not on the watchlist.
  fn set_watched(
    &self,
    user_id: Uuid,
    movie_id: Uuid,
    watched: bool,
  ) -> impl Future<Output = Result<Option<WatchlistEntry>, Self::Error>> + Send + '_;

  /// Returns `true` if an entry was removed.
  fn remove_from_watchlist(
    &self,
    user_id: Uuid,
    movie_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
