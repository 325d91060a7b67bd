//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Guard decisions surface here as the two redirect variants: the response
//! carries a `Location` header and a JSON body, so both browsers and API
//! clients can act on it.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Credentials did not verify.
  #[error("unauthorized")]
  Unauthorized,

  /// No live session for a protected route; redirect to the login view,
  /// preserving the requested location.
  #[error("login required")]
  RedirectToLogin { next: String },

  /// Authenticated, but the role is outside the route's allowed set.
  #[error("forbidden")]
  RedirectToFallback { location: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<praxis_core::Error> for ApiError {
  fn from(e: praxis_core::Error) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, location, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, None, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, None, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, None, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, None, "invalid credentials".to_string())
      }
      ApiError::RedirectToLogin { next } => (
        StatusCode::SEE_OTHER,
        Some(format!("/login?next={next}")),
        "login required".to_string(),
      ),
      ApiError::RedirectToFallback { location } => (
        StatusCode::SEE_OTHER,
        Some(location.clone()),
        "forbidden".to_string(),
      ),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, None, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if let Some(location) = location
      && let Ok(value) = HeaderValue::from_str(&location)
    {
      res.headers_mut().insert(header::LOCATION, value);
    }
    res
  }
}
