//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Errors render through the same envelope as successes, with `success:
//! false`, `data: null`, and the HTTP status as the business code. Store
//! failures surface as a generic "try again" message — the underlying
//! error is logged, not leaked.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No recipient identity on the request — the outer auth layer did not
  /// run or rejected the caller.
  #[error("unauthenticated")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "authentication required".to_owned())
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "server busy, please try again later".to_owned(),
        )
      }
    };

    let body = json!({
      "code":      status.as_u16(),
      "success":   false,
      "message":   message,
      "data":      null,
      "timestamp": Utc::now().to_rfc3339(),
    });

    (status, Json(body)).into_response()
  }
}
