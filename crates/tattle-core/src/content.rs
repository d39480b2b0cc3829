//! Read-only view of the content module, as consumed by the rule engine.
//!
//! Posts are owned by the external content service; the engine only needs
//! enough of them to resolve a notification's recipient and render its body.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::notification::{ContentId, UserId};

/// The slice of a post the rule engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRef {
  pub id:        ContentId,
  pub author_id: UserId,
  pub title:     String,
}

/// Resolver for content metadata, implemented by storage backends.
///
/// Returns `Ok(None)` when the post does not exist — the caller decides
/// whether that is fatal (for the fan-out it is not: the post may have
/// been concurrently deleted).
pub trait ContentLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn content_by_id(
    &self,
    id: ContentId,
  ) -> impl Future<Output = Result<Option<ContentRef>, Self::Error>> + Send + '_;
}
