//! The platform-wide response envelope.
//!
//! Every response — success or failure — is wrapped in
//! `{code, success, message, data, timestamp}`, matching the shape the web
//! client expects from the rest of the platform. A cross-cutting boundary
//! adapter, not part of the notification core's contract.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

/// Uniform response wrapper.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  /// Business status code; mirrors the HTTP status.
  pub code:      u16,
  pub success:   bool,
  pub message:   String,
  pub data:      Option<T>,
  /// RFC 3339 instant the response was produced.
  pub timestamp: String,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      code:      200,
      success:   true,
      message:   "Request successful".to_owned(),
      data:      Some(data),
      timestamp: Utc::now().to_rfc3339(),
    }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}
