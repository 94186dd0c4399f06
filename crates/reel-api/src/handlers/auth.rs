//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | 201 with a token and the new profile |
//! | `POST` | `/auth/login`    | 401 for unknown email and wrong password alike |
//! | `POST` | `/auth/logout`   | Ends the presented session |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use reel_core::{
  store::MovieStore,
  user::{
    NewUser, User, clean_display_name, normalize_email, validate_password,
    validate_username,
  },
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentUser, IssuedToken, hash_password, start_session, verify_password},
  error::{ApiError, Result},
  extract::ApiJson,
};

/// A session token plus the profile it belongs to.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
  #[serde(flatten)]
  pub token: IssuedToken,
  pub user:  User,
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username:        String,
  pub email:           String,
  pub password:        String,
  pub display_name:    Option<String>,
  #[serde(default)]
  pub favorite_genres: Vec<String>,
}

/// `POST /auth/register`
pub async fn register<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<RegisterBody>,
) -> Result<impl IntoResponse> {
  let username = validate_username(&body.username)?;
  let email = normalize_email(&body.email)?;
  validate_password(&body.password)?;

  let user = state
    .store
    .add_user(NewUser {
      username,
      email,
      password_hash: hash_password(&body.password)?,
      display_name: clean_display_name(body.display_name),
      favorite_genres: body
        .favorite_genres
        .into_iter()
        .map(|g| g.trim().to_owned())
        .filter(|g| !g.is_empty())
        .collect(),
    })
    .await
    .map_err(ApiError::from_store)?;

  let token = start_session(state.store.as_ref(), user.user_id, state.config.session_ttl()).await?;
  tracing::info!(user_id = %user.user_id, "user registered");
  Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

fn bad_credentials() -> ApiError { ApiError::Unauthorized("invalid email or password".into()) }

/// `POST /auth/login`
pub async fn login<S: MovieStore>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<AuthResponse>> {
  let email = normalize_email(&body.email).map_err(|_| bad_credentials())?;
  let creds = state
    .store
    .find_credentials(email)
    .await
    .map_err(ApiError::from_store)?;

  let Some(creds) = creds.filter(|c| verify_password(&body.password, &c.password_hash))
  else {
    tracing::info!("failed login attempt");
    return Err(bad_credentials());
  };

  let token =
    start_session(state.store.as_ref(), creds.user.user_id, state.config.session_ttl()).await?;
  Ok(Json(AuthResponse { token, user: creds.user }))
}

// ─── Logout ───────────────────────────────────────────────────────────────────

/// `POST /auth/logout`
pub async fn logout<S: MovieStore>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
) -> Result<StatusCode> {
  state
    .store
    .delete_session(current.token_hash)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
