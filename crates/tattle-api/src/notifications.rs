//! Handlers for the delivery endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/notifications` | `?page=N[&page_size=M]`, 1-indexed |
//! | `PATCH` | `/notifications/read` | Body: `{"ids":[...]}` |
//! | `PATCH` | `/notifications/read-all` | No body |
//!
//! All three require a [`RecipientId`] on the request and return the
//! platform envelope.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tattle_core::{
  notification::{NotificationId, NotificationPage},
  store::{NotificationStore, PageRequest},
};

use crate::{Envelope, RecipientId, error::ApiError};

/// Upper bound on caller-chosen page sizes.
const MAX_PAGE_SIZE: u32 = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// 1-indexed; defaults to 1, values below 1 are clamped by the store.
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
}

/// `GET /notifications?page=N[&page_size=M]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  RecipientId(user_id): RecipientId,
  Query(params): Query<ListParams>,
) -> Result<Envelope<NotificationPage>, ApiError>
where
  S: NotificationStore,
{
  let defaults = PageRequest::default();
  let page = PageRequest {
    page:      params.page.unwrap_or(defaults.page),
    page_size: params
      .page_size
      .unwrap_or(defaults.page_size)
      .clamp(1, MAX_PAGE_SIZE),
  };

  let result = store
    .list_for_recipient(user_id, page)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Envelope::ok(result))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
  pub ids: Vec<NotificationId>,
}

/// Row-count result of a read-state mutation.
#[derive(Debug, Serialize)]
pub struct Affected {
  pub affected: u64,
}

/// `PATCH /notifications/read` — body: `{"ids":[1,2,3]}`
///
/// An empty id list is accepted and affects zero rows. Non-positive ids
/// are rejected before reaching storage.
pub async fn mark_read<S>(
  State(store): State<Arc<S>>,
  RecipientId(user_id): RecipientId,
  Json(body): Json<MarkReadBody>,
) -> Result<Envelope<Affected>, ApiError>
where
  S: NotificationStore,
{
  if let Some(bad) = body.ids.iter().find(|&&id| id <= 0) {
    return Err(ApiError::BadRequest(format!(
      "invalid notification id: {bad}"
    )));
  }

  let affected = store
    .mark_read(user_id, body.ids)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Envelope::ok(Affected { affected }))
}

/// `PATCH /notifications/read-all`
pub async fn mark_all_read<S>(
  State(store): State<Arc<S>>,
  RecipientId(user_id): RecipientId,
) -> Result<Envelope<Affected>, ApiError>
where
  S: NotificationStore,
{
  let affected = store
    .mark_all_read(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Envelope::ok(Affected { affected }))
}
