//! Notification — the persisted output of the fan-out.
//!
//! A notification is append-only apart from its read flag: everything else
//! is fixed at creation time, including the precomposed display `body`
//! (never re-derived at read time).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform user id, assigned by the external account service.
pub type UserId = i64;
/// Post id, assigned by the external content service.
pub type ContentId = i64;
/// Notification id, assigned by the store on append.
pub type NotificationId = i64;

/// What kind of interaction produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  Like,
  Favorite,
  Comment,
  Follow,
}

/// A persisted notification record.
///
/// `is_read` is the only mutable field, and it only ever transitions
/// false → true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub id:                 NotificationId,
  /// Who should see this notification.
  pub recipient_id:       UserId,
  /// Who triggered it.
  pub actor_id:           UserId,
  pub kind:               NotificationKind,
  /// Precomposed display text.
  pub body:               String,
  pub is_read:            bool,
  /// The post that caused this notification; `None` for follows.
  pub related_content_id: Option<ContentId>,
  /// Opaque auxiliary payload (e.g. the originating action or comment id).
  pub extra:              Option<serde_json::Value>,
  pub created_at:         DateTime<Utc>,
}

/// Input to [`NotificationStore::append`](crate::store::NotificationStore).
///
/// `id`, `is_read`, and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
  pub recipient_id:       UserId,
  pub actor_id:           UserId,
  pub kind:               NotificationKind,
  pub body:               String,
  pub related_content_id: Option<ContentId>,
  pub extra:              Option<serde_json::Value>,
}

// ─── Read-side view models ───────────────────────────────────────────────────

/// Public profile fields of the actor, denormalised into list responses.
/// Maintained by the account service; read here via a join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorProfile {
  pub id:       UserId,
  pub username: String,
  pub avatar:   Option<String>,
}

/// A notification bundled with its actor's profile — the list-item shape
/// served by the delivery API. `actor` is `None` if the actor account has
/// since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
  pub notification: Notification,
  pub actor:        Option<ActorProfile>,
}

/// One page of a recipient's notification list, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
  pub items:     Vec<NotificationView>,
  /// Total records for this recipient, across all pages.
  pub total:     u64,
  pub page:      u32,
  /// `ceil(total / page_size)`; 0 when the list is empty.
  pub last_page: u32,
}
