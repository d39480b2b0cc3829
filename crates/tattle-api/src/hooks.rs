//! Handler for `POST /hooks/interaction` — the over-HTTP form of the
//! fan-out hook, for write paths living in other processes.
//!
//! The caller's own insert has already committed when this fires, so a
//! failed append returns 500 without undoing anything; the caller decides
//! whether to retry. A skipped fan-out (self-interaction, vanished
//! content) is a success with `notified: false`.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tattle_core::{
  content::ContentLookup, event::InteractionEvent, fanout::Fanout,
  store::NotificationStore,
};

use crate::{Envelope, error::ApiError};

#[derive(Debug, Serialize)]
pub struct HookOutcome {
  /// Whether a notification was appended for this event.
  pub notified: bool,
}

/// `POST /hooks/interaction` — body: a tagged [`InteractionEvent`].
pub async fn interaction<S>(
  State(store): State<Arc<S>>,
  Json(event): Json<InteractionEvent>,
) -> Result<Envelope<HookOutcome>, ApiError>
where
  S: NotificationStore + ContentLookup + Clone + Send + Sync + 'static,
{
  let fanout = Fanout::new((*store).clone(), (*store).clone());

  let appended = fanout
    .on_interaction_created(&event)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Envelope::ok(HookOutcome { notified: appended.is_some() }))
}
