//! Trusted-identity extractor and the header middleware that feeds it.
//!
//! The platform authenticates requests upstream (session/JWT at the
//! gateway); by the time they reach this API the recipient is a settled
//! fact. Handlers extract [`RecipientId`] from a request extension; the
//! server binary installs it from the `x-user-id` header the gateway sets.

use axum::{
  extract::{FromRequestParts, Request},
  http::request::Parts,
  middleware::Next,
  response::Response,
};
use tattle_core::notification::UserId;

use crate::error::ApiError;

/// The already-authenticated user on whose behalf a request runs.
///
/// Present in a handler's signature means the request carried an identity;
/// no further authorization happens here beyond the store's ownership
/// scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipientId(pub UserId);

impl<S> FromRequestParts<S> for RecipientId
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<RecipientId>()
      .copied()
      .ok_or(ApiError::Unauthorized)
  }
}

/// Middleware: lift the gateway's `x-user-id` header into a [`RecipientId`]
/// extension. Requests without the header pass through and fail later at
/// extraction with 401.
pub async fn trusted_header_identity(mut req: Request, next: Next) -> Response {
  let user_id = req
    .headers()
    .get("x-user-id")
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.parse::<UserId>().ok());

  if let Some(id) = user_id {
    req.extensions_mut().insert(RecipientId(id));
  }

  next.run(req).await
}
