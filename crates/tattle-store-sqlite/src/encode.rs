//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Notification kinds are
//! stored as lowercase text, the `extra` payload as compact JSON.

use chrono::{DateTime, Utc};
use tattle_core::notification::{
  ActorProfile, Notification, NotificationKind, NotificationView,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NotificationKind ────────────────────────────────────────────────────────

pub fn encode_kind(k: NotificationKind) -> &'static str {
  match k {
    NotificationKind::Like => "like",
    NotificationKind::Favorite => "favorite",
    NotificationKind::Comment => "comment",
    NotificationKind::Follow => "follow",
  }
}

pub fn decode_kind(s: &str) -> Result<NotificationKind> {
  match s {
    "like" => Ok(NotificationKind::Like),
    "favorite" => Ok(NotificationKind::Favorite),
    "comment" => Ok(NotificationKind::Comment),
    "follow" => Ok(NotificationKind::Follow),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── Raw row shapes ──────────────────────────────────────────────────────────

/// Column values of a `notifications` row plus the joined actor profile,
/// exactly as read from SQLite. Decoded into domain types off the
/// connection thread.
pub struct RawNotificationRow {
  pub id:                 i64,
  pub recipient_id:       i64,
  pub actor_id:           i64,
  pub kind:               String,
  pub body:               String,
  pub is_read:            bool,
  pub related_content_id: Option<i64>,
  pub extra:              Option<String>,
  pub created_at:         String,
  /// NULL when the actor account was deleted.
  pub actor_username:     Option<String>,
  pub actor_avatar:       Option<String>,
}

impl RawNotificationRow {
  pub fn into_view(self) -> Result<NotificationView> {
    let actor = self.actor_username.map(|username| ActorProfile {
      id: self.actor_id,
      username,
      avatar: self.actor_avatar,
    });

    Ok(NotificationView {
      notification: Notification {
        id:                 self.id,
        recipient_id:       self.recipient_id,
        actor_id:           self.actor_id,
        kind:               decode_kind(&self.kind)?,
        body:               self.body,
        is_read:            self.is_read,
        related_content_id: self.related_content_id,
        extra:              self
          .extra
          .as_deref()
          .map(serde_json::from_str)
          .transpose()?,
        created_at:         decode_dt(&self.created_at)?,
      },
      actor,
    })
  }
}
