//! [`RatingAggregator`], the only sanctioned entry point for changing rating
//! data.
//!
//! The aggregator validates submissions before anything is written, delegates
//! each write-plus-recompute unit to the store (which runs it atomically), and
//! retries units that fail with transient lock contention a bounded number of
//! times. No error is swallowed: every failure reaches the caller as a
//! [`crate::Error`].

use std::{future::Future, sync::Arc, time::Duration};

use uuid::Uuid;

use crate::{
  Error, Result,
  rating::RatingSummary,
  review::{AppliedRating, RatingInput},
  store::MovieStore,
};

/// Bounded exponential backoff for [`Error::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, including the first. Zero behaves like one.
  pub max_attempts: u32,
  /// Delay before the second attempt; doubled for each one after.
  pub base_delay:   Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, base_delay: Duration::from_millis(25) }
  }
}

impl RetryPolicy {
  fn delay_after(&self, attempt: u32) -> Duration {
    self.base_delay.saturating_mul(1 << attempt.saturating_sub(1).min(16))
  }
}

/// Maintains every movie's `aggregate_rating` and `rating_count` as the
/// rounded mean and count of its active reviews.
///
/// Cloning is cheap; the store is reference-counted. The aggregator holds no
/// per-movie state; operations on different movies never coordinate.
pub struct RatingAggregator<S> {
  store: Arc<S>,
  retry: RetryPolicy,
}

impl<S> Clone for RatingAggregator<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), retry: self.retry }
  }
}

impl<S: MovieStore> RatingAggregator<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, retry: RetryPolicy::default() }
  }

  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Recompute `movie_id`'s rating fields from its active reviews and persist
  /// them. Fails with [`Error::MovieNotFound`] for an unknown movie.
  pub async fn recompute(&self, movie_id: Uuid) -> Result<RatingSummary> {
    self
      .with_retry("recompute", movie_id, || self.store.recompute_rating(movie_id))
      .await
  }

  /// Record `user_id`'s score for `movie_id`, replacing their active review if
  /// one exists, and recompute the aggregate in the same unit of work.
  pub async fn apply_rating(
    &self,
    movie_id: Uuid,
    user_id: Uuid,
    score: i64,
    content: Option<String>,
  ) -> Result<AppliedRating> {
    let input = RatingInput::new(movie_id, user_id, score, content)?;

    let applied = self
      .with_retry("apply_rating", movie_id, || {
        self.store.upsert_review(input.clone())
      })
      .await?;

    tracing::info!(
      %movie_id,
      %user_id,
      score = %applied.review.score,
      created = applied.created,
      aggregate = applied.summary.aggregate_rating,
      count = applied.summary.rating_count,
      "rating applied"
    );
    Ok(applied)
  }

  /// Withdraw `user_id`'s active review for `movie_id` and recompute.
  /// Withdrawing when no active review exists changes nothing.
  pub async fn withdraw_rating(
    &self,
    movie_id: Uuid,
    user_id: Uuid,
  ) -> Result<RatingSummary> {
    let summary = self
      .with_retry("withdraw_rating", movie_id, || {
        self.store.withdraw_review(movie_id, user_id)
      })
      .await?;

    tracing::info!(
      %movie_id,
      %user_id,
      aggregate = summary.aggregate_rating,
      count = summary.rating_count,
      "rating withdrawn"
    );
    Ok(summary)
  }

  /// Purge an account; every movie the user had rated is recomputed as part
  /// of the same unit. Returns the affected movie IDs.
  pub async fn purge_actor(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    let affected = self
      .with_retry("purge_actor", user_id, || self.store.purge_user(user_id))
      .await?;
    tracing::info!(%user_id, movies = affected.len(), "account purged");
    Ok(affected)
  }

  async fn with_retry<T, F, Fut>(
    &self,
    op: &'static str,
    target: Uuid,
    mut unit: F,
  ) -> Result<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, S::Error>>,
  {
    let max_attempts = self.retry.max_attempts.max(1);
    let mut attempt = 1;
    loop {
      match unit().await.map_err(Into::<Error>::into) {
        Err(e) if e.is_transient() && attempt < max_attempts => {
          let delay = self.retry.delay_after(attempt);
          tracing::warn!(
            op,
            %target,
            attempt,
            ?delay,
            error = %e,
            "write conflict, retrying"
          );
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(e) => {
          if e.is_transient() {
            tracing::error!(op, %target, attempt, error = %e, "giving up after write conflicts");
          }
          return Err(e);
        }
        Ok(v) => return Ok(v),
      }
    }
  }
}
