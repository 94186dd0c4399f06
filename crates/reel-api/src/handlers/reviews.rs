//! Handlers for reviews and ratings.
//!
//! All writes go through [`reel_core::aggregator::RatingAggregator`], which
//! keeps the movie's aggregate in step with its reviews.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use reel_core::{
  rating::RatingSummary,
  review::{AppliedRating, AuthoredReview, Review},
  store::MovieStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, Result},
  extract::{ApiJson, ApiPath},
};

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub score:   i64,
  pub content: Option<String>,
}

/// `POST /movies/{id}/reviews`: 201 for a first review, 200 when the
/// caller's active review was replaced.
pub async fn submit<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(movie_id): ApiPath<Uuid>,
  current: CurrentUser,
  ApiJson(body): ApiJson<ReviewBody>,
) -> Result<(StatusCode, Json<AppliedRating>)> {
  let applied = state
    .aggregator
    .apply_rating(movie_id, current.user_id, body.score, body.content)
    .await?;
  let status = if applied.created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(applied)))
}

/// `DELETE /movies/{id}/reviews`: withdraw the caller's review. Succeeds
/// even if there was nothing to withdraw.
pub async fn withdraw<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(movie_id): ApiPath<Uuid>,
  current: CurrentUser,
) -> Result<Json<RatingSummary>> {
  let summary = state
    .aggregator
    .withdraw_rating(movie_id, current.user_id)
    .await?;
  Ok(Json(summary))
}

/// `GET /movies/{id}/reviews`
pub async fn list_for_movie<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(movie_id): ApiPath<Uuid>,
) -> Result<Json<Vec<AuthoredReview>>> {
  if state
    .store
    .get_movie(movie_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound("movie not found".into()));
  }
  let reviews = state
    .store
    .list_movie_reviews(movie_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(reviews))
}

/// `GET /users/{id}/reviews`
pub async fn list_for_user<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(user_id): ApiPath<Uuid>,
  _current: CurrentUser,
) -> Result<Json<Vec<Review>>> {
  if state
    .store
    .get_user(user_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound("user not found".into()));
  }
  let reviews = state
    .store
    .list_user_reviews(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(reviews))
}
