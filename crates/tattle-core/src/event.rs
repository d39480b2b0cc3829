//! Interaction events — the input side of the fan-out.
//!
//! Each write path (action, comment, follow) constructs the matching
//! variant after its own insert succeeds and hands it to the fan-out hook.
//! The union is serde-tagged so out-of-process write paths can post it
//! over the hook endpoint.

use serde::{Deserialize, Serialize};

use crate::notification::{ContentId, NotificationKind, UserId};

/// Whether an action record is a like or a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
  Like,
  Favorite,
}

impl From<ActionKind> for NotificationKind {
  fn from(kind: ActionKind) -> Self {
    match kind {
      ActionKind::Like => NotificationKind::Like,
      ActionKind::Favorite => NotificationKind::Favorite,
    }
  }
}

/// A content interaction that may warrant notifying another user.
///
/// Transient — never persisted as its own entity beyond the originating
/// record each variant points back at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
  /// A like or favorite on a post.
  Action {
    actor_id:   UserId,
    content_id: ContentId,
    /// Id of the originating action row; carried into `extra`.
    action_id:  i64,
    kind:       ActionKind,
  },
  /// A comment on a post. `body` is the full comment text, supplied at
  /// event-construction time by the comment write path (not re-fetched).
  Comment {
    actor_id:   UserId,
    content_id: ContentId,
    comment_id: i64,
    body:       String,
  },
  /// One user following another.
  Follow {
    actor_id:    UserId,
    followed_id: UserId,
  },
}

impl InteractionEvent {
  /// The user who performed the interaction.
  pub fn actor_id(&self) -> UserId {
    match self {
      Self::Action { actor_id, .. }
      | Self::Comment { actor_id, .. }
      | Self::Follow { actor_id, .. } => *actor_id,
    }
  }
}
