//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use reel_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("forbidden")]
  Forbidden,

  #[error("{0}")]
  Conflict(String),

  /// Write contention outlasted the retry budget.
  #[error("{0}")]
  Unavailable(String),

  #[error("internal error: {0}")]
  Internal(String),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
  /// Convert a store backend error by way of the domain error.
  pub fn from_store<E: Into<CoreError>>(e: E) -> Self {
    Self::from(Into::<CoreError>::into(e))
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::Validation(m) => Self::BadRequest(m),
      CoreError::MovieNotFound(_) => Self::NotFound("movie not found".into()),
      CoreError::UserNotFound(_) => Self::NotFound("user not found".into()),
      CoreError::EmailTaken(_) => Self::Conflict("email already registered".into()),
      CoreError::AlreadyInWatchlist { .. } => {
        Self::Conflict("movie already in watchlist".into())
      }
      CoreError::Conflict(m) => Self::Unavailable(m),
      e @ CoreError::Persistence(_) => Self::Internal(e.to_string()),
    }
  }
}

// Extractor rejections keep the JSON error envelope instead of axum's plain
// text bodies.

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unavailable(m) => {
        tracing::warn!(error = %m, "request failed on write contention");
        (StatusCode::SERVICE_UNAVAILABLE, "busy, try again".to_string())
      }
      ApiError::Internal(m) => {
        tracing::error!(error = %m, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn domain_errors_map_to_statuses() {
    let cases = [
      (CoreError::Validation("score".into()), StatusCode::BAD_REQUEST),
      (CoreError::MovieNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
      (CoreError::EmailTaken("a@b.c".into()), StatusCode::CONFLICT),
      (CoreError::Conflict("locked".into()), StatusCode::SERVICE_UNAVAILABLE),
      (CoreError::Persistence("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::Unauthorized("missing token".into()).into_response();
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
  }
}
