//! Passwords, bearer tokens, and the [`CurrentUser`] extractor.
//!
//! Login issues an opaque random token. Only its SHA-256 digest is stored, so
//! a leaked `sessions` table cannot be replayed.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore as _};
use reel_core::store::MovieStore;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, Result},
};

/// Raw token length before encoding.
pub const TOKEN_BYTES: usize = 32;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// `false` for a wrong password and for an unparseable stored hash alike.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex SHA-256 of the token; the only form that reaches the store.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// A freshly issued bearer token, returned to the client exactly once.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

/// Create a session for `user_id` lasting `ttl`.
pub async fn start_session<S: MovieStore>(
  store: &S,
  user_id: Uuid,
  ttl: chrono::Duration,
) -> Result<IssuedToken> {
  let token = generate_token();
  let session = store
    .create_session(user_id, hash_token(&token), Utc::now() + ttl)
    .await
    .map_err(ApiError::from_store)?;
  Ok(IssuedToken { token, expires_at: session.expires_at })
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated caller. Present in a handler means the request carried
/// a live, unexpired session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub user_id:    Uuid,
  pub token_hash: String,
}

impl CurrentUser {
  /// Reject with 403 unless the caller is `user_id`.
  pub fn require_self(&self, user_id: Uuid) -> Result<()> {
    if self.user_id == user_id {
      Ok(())
    } else {
      Err(ApiError::Forbidden)
    }
  }
}

fn invalid_token() -> ApiError { ApiError::Unauthorized("invalid or expired token".into()) }

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: MovieStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token_hash = bearer_token(&parts.headers)
      .map(hash_token)
      .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let session = state
      .store
      .find_session(token_hash.clone())
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(invalid_token)?;

    if session.is_expired(Utc::now()) {
      tracing::debug!(user_id = %session.user_id, "rejected expired session");
      return Err(invalid_token());
    }

    Ok(Self { user_id: session.user_id, token_hash })
  }
}
