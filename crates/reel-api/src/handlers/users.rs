//! Handlers for `/users/{id}`.
//!
//! Any signed-in user may read a profile; only the owner may change or purge
//! it.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use reel_core::{
  store::MovieStore,
  user::{User, UserUpdate},
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, Result},
  extract::{ApiJson, ApiPath},
};

/// `GET /users/{id}`
pub async fn get_one<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(id): ApiPath<Uuid>,
  _current: CurrentUser,
) -> Result<Json<User>> {
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
  Ok(Json(user))
}

/// `PUT /users/{id}`: an empty string clears a text field.
pub async fn update<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(id): ApiPath<Uuid>,
  current: CurrentUser,
  ApiJson(body): ApiJson<UserUpdate>,
) -> Result<Json<User>> {
  current.require_self(id)?;
  let user = state
    .store
    .update_user(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `DELETE /users/{id}`: purge the account and every rating it contributed.
pub async fn purge<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(id): ApiPath<Uuid>,
  current: CurrentUser,
) -> Result<StatusCode> {
  current.require_self(id)?;
  state.aggregator.purge_actor(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
