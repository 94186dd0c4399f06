//! Handlers for `/users/{id}/watchlist`. Owner only.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users/{id}/watchlist` | `?genre=&decade=&min_rating=&watched=&sort=&order=` |
//! | `POST`   | `/users/{id}/watchlist` | Body: `{"movie_id":"…"}`; 409 if present |
//! | `PATCH`  | `/users/{id}/watchlist/{movie_id}` | Body: `{"watched":true}` |
//! | `DELETE` | `/users/{id}/watchlist/{movie_id}` | Always 204 |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use reel_core::{
  listing::{SortOrder, WatchlistQuery, WatchlistSort, check_min_rating},
  store::MovieStore,
  watchlist::{WatchlistEntry, WatchlistItem},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, Result},
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub genre:      Option<String>,
  pub decade:     Option<i32>,
  pub min_rating: Option<f64>,
  pub watched:    Option<bool>,
  #[serde(default)]
  pub sort:       WatchlistSort,
  #[serde(default)]
  pub order:      SortOrder,
}

impl ListParams {
  fn into_query(self) -> Result<WatchlistQuery> {
    Ok(WatchlistQuery {
      genre:      self.genre,
      decade:     self.decade,
      min_rating: check_min_rating(self.min_rating)?,
      watched:    self.watched,
      sort:       self.sort,
      order:      self.order,
    })
  }
}

/// `GET /users/{id}/watchlist`
pub async fn list<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(user_id): ApiPath<Uuid>,
  current: CurrentUser,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<WatchlistItem>>> {
  current.require_self(user_id)?;
  let query = params.into_query()?;
  let items = state
    .store
    .list_watchlist(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(query.apply(items)))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddBody {
  pub movie_id: Uuid,
}

/// `POST /users/{id}/watchlist`
pub async fn add<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(user_id): ApiPath<Uuid>,
  current: CurrentUser,
  ApiJson(body): ApiJson<AddBody>,
) -> Result<impl IntoResponse> {
  current.require_self(user_id)?;
  let entry = state
    .store
    .add_to_watchlist(user_id, body.movie_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Mark / remove ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkBody {
  pub watched: bool,
}

/// `PATCH /users/{id}/watchlist/{movie_id}`
pub async fn mark<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath((user_id, movie_id)): ApiPath<(Uuid, Uuid)>,
  current: CurrentUser,
  ApiJson(body): ApiJson<MarkBody>,
) -> Result<Json<WatchlistEntry>> {
  current.require_self(user_id)?;
  let entry = state
    .store
    .set_watched(user_id, movie_id, body.watched)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("movie not in watchlist".into()))?;
  Ok(Json(entry))
}

/// `DELETE /users/{id}/watchlist/{movie_id}`
pub async fn remove<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath((user_id, movie_id)): ApiPath<(Uuid, Uuid)>,
  current: CurrentUser,
) -> Result<StatusCode> {
  current.require_self(user_id)?;
  let removed = state
    .store
    .remove_from_watchlist(user_id, movie_id)
    .await
    .map_err(ApiError::from_store)?;
  if !removed {
    tracing::debug!(%user_id, %movie_id, "watchlist entry already absent");
  }
  Ok(StatusCode::NO_CONTENT)
}
