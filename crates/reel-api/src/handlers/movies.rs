//! Handlers for `/movies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/movies` | `?q=&genre=&year=YYYY[-YYYY]&min_rating=&sort=&page=&per_page=` |
//! | `POST` | `/movies` | Bearer auth; body is a new movie |
//! | `GET`  | `/movies/{id}` | Movie, active reviews, star distribution |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use reel_core::{
  listing::{DEFAULT_PER_PAGE, MovieQuery, MovieSort, Page, YearFilter, check_min_rating},
  movie::{Movie, NewMovie},
  rating::RatingDistribution,
  review::AuthoredReview,
  store::MovieStore,
};
use serde::{Deserialize, Serialize};
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
  pub q:          Option<String>,
  pub genre:      Option<String>,
  /// `YYYY` or `YYYY-YYYY`.
  pub year:       Option<String>,
  pub min_rating: Option<f64>,
  #[serde(default)]
  pub sort:       MovieSort,
  pub page:       Option<usize>,
  pub per_page:   Option<usize>,
}

impl ListParams {
  fn into_query(self) -> Result<MovieQuery> {
    let year = self
      .year
      .as_deref()
      .map(str::trim)
      .filter(|y| !y.is_empty())
      .map(str::parse::<YearFilter>)
      .transpose()?;
    Ok(MovieQuery {
      text: self.q,
      genre: self.genre,
      year,
      min_rating: check_min_rating(self.min_rating)?,
      sort: self.sort,
      page: self.page.unwrap_or(1),
      per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
    })
  }
}

/// `GET /movies`
pub async fn list<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Page<Movie>>> {
  let query = params.into_query()?;
  let movies = state.store.list_movies().await.map_err(ApiError::from_store)?;
  Ok(Json(query.apply(movies)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /movies`
pub async fn create<S: MovieStore>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  ApiJson(body): ApiJson<NewMovie>,
) -> Result<impl IntoResponse> {
  let movie = state.store.add_movie(body).await.map_err(ApiError::from_store)?;
  tracing::info!(movie_id = %movie.movie_id, by = %current.user_id, "movie created");
  Ok((StatusCode::CREATED, Json(movie)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MovieDetail {
  #[serde(flatten)]
  pub movie:        Movie,
  pub reviews:      Vec<AuthoredReview>,
  pub distribution: RatingDistribution,
}

/// `GET /movies/{id}`
pub async fn get_one<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MovieDetail>> {
  let movie = state
    .store
    .get_movie(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("movie not found".into()))?;
  let reviews = state
    .store
    .list_movie_reviews(id)
    .await
    .map_err(ApiError::from_store)?;
  let distribution = state
    .store
    .rating_distribution(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(MovieDetail { movie, reviews, distribution }))
}
