//! The interaction rule engine.
//!
//! [`evaluate`] is a pure mapping from an interaction event to zero or one
//! [`NewNotification`] — it reads content metadata through the supplied
//! lookup but performs no writes. Persisting the result (or doing nothing)
//! is the caller's job; see [`fanout`](crate::fanout).

use serde_json::json;

use crate::{
  content::{ContentLookup, ContentRef},
  error::EvaluateError,
  event::{ActionKind, InteractionEvent},
  notification::{NewNotification, NotificationKind},
};

/// Comment excerpts embedded in notification bodies are capped at this many
/// code points.
pub const EXCERPT_MAX_CHARS: usize = 20;

const TRUNCATION_MARKER: &str = "...";

/// Decide whether `event` warrants a notification, and build it if so.
///
/// Returns `Ok(None)` for self-interactions (an author liking or
/// commenting on their own post, a user somehow following themselves).
/// A missing post is [`EvaluateError::ContentNotFound`] — callers on the
/// fan-out path treat that as skip-and-log, since the post may have been
/// deleted between the interaction write and this evaluation.
pub async fn evaluate<L>(
  event: &InteractionEvent,
  lookup: &L,
) -> Result<Option<NewNotification>, EvaluateError<L::Error>>
where
  L: ContentLookup,
{
  match event {
    InteractionEvent::Action { actor_id, content_id, action_id, kind } => {
      let content = resolve_content(lookup, *content_id).await?;
      if content.author_id == *actor_id {
        return Ok(None);
      }
      Ok(Some(NewNotification {
        recipient_id:       content.author_id,
        actor_id:           *actor_id,
        kind:               NotificationKind::from(*kind),
        body:               action_body(*kind, &content.title),
        related_content_id: Some(*content_id),
        extra:              Some(json!({ "action_id": action_id })),
      }))
    }

    InteractionEvent::Comment { actor_id, content_id, comment_id, body } => {
      let content = resolve_content(lookup, *content_id).await?;
      if content.author_id == *actor_id {
        return Ok(None);
      }
      Ok(Some(NewNotification {
        recipient_id:       content.author_id,
        actor_id:           *actor_id,
        kind:               NotificationKind::Comment,
        body:               comment_body(&content.title, body),
        related_content_id: Some(*content_id),
        extra:              Some(json!({ "comment_id": comment_id })),
      }))
    }

    InteractionEvent::Follow { actor_id, followed_id } => {
      // Self-follows are rejected upstream; returning None here keeps the
      // invariant even if one slips through.
      if actor_id == followed_id {
        return Ok(None);
      }
      Ok(Some(NewNotification {
        recipient_id:       *followed_id,
        actor_id:           *actor_id,
        kind:               NotificationKind::Follow,
        body:               "started following you".to_owned(),
        related_content_id: None,
        extra:              None,
      }))
    }
  }
}

async fn resolve_content<L>(
  lookup: &L,
  content_id: i64,
) -> Result<ContentRef, EvaluateError<L::Error>>
where
  L: ContentLookup,
{
  lookup
    .content_by_id(content_id)
    .await
    .map_err(EvaluateError::Lookup)?
    .ok_or(EvaluateError::ContentNotFound(content_id))
}

// ─── Body templates ──────────────────────────────────────────────────────────

fn action_body(kind: ActionKind, title: &str) -> String {
  match kind {
    ActionKind::Like => format!("liked your post: {title}"),
    ActionKind::Favorite => format!("favorited your post: {title}"),
  }
}

fn comment_body(title: &str, comment: &str) -> String {
  let excerpt = truncate_excerpt(comment, EXCERPT_MAX_CHARS);
  format!("commented on your post \"{title}\": \"{excerpt}\"")
}

/// Cap `text` at `max_chars` code points, appending a marker when cut.
///
/// The unit is deliberately code points rather than bytes, so multi-byte
/// content never splits mid-character.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
  match text.char_indices().nth(max_chars) {
    Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
    None => text.to_owned(),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  /// In-memory content table for engine tests.
  struct FakeContent(HashMap<i64, ContentRef>);

  impl FakeContent {
    fn with(posts: &[(i64, i64, &str)]) -> Self {
      Self(
        posts
          .iter()
          .map(|&(id, author_id, title)| {
            (id, ContentRef { id, author_id, title: title.to_owned() })
          })
          .collect(),
      )
    }
  }

  impl ContentLookup for FakeContent {
    type Error = std::convert::Infallible;

    async fn content_by_id(
      &self,
      id: i64,
    ) -> Result<Option<ContentRef>, Self::Error> {
      Ok(self.0.get(&id).cloned())
    }
  }

  fn like(actor_id: i64, content_id: i64) -> InteractionEvent {
    InteractionEvent::Action {
      actor_id,
      content_id,
      action_id: 1,
      kind: ActionKind::Like,
    }
  }

  #[tokio::test]
  async fn like_notifies_the_author() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);

    let n = evaluate(&like(9, 42), &content).await.unwrap().unwrap();
    assert_eq!(n.recipient_id, 7);
    assert_eq!(n.actor_id, 9);
    assert_eq!(n.kind, NotificationKind::Like);
    assert_eq!(n.body, "liked your post: Hello");
    assert_eq!(n.related_content_id, Some(42));
    assert_eq!(n.extra, Some(serde_json::json!({ "action_id": 1 })));
  }

  #[tokio::test]
  async fn favorite_uses_its_own_verb() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);
    let event = InteractionEvent::Action {
      actor_id:   9,
      content_id: 42,
      action_id:  2,
      kind:       ActionKind::Favorite,
    };

    let n = evaluate(&event, &content).await.unwrap().unwrap();
    assert_eq!(n.kind, NotificationKind::Favorite);
    assert_eq!(n.body, "favorited your post: Hello");
  }

  #[tokio::test]
  async fn self_like_produces_nothing() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);
    let result = evaluate(&like(7, 42), &content).await.unwrap();
    assert!(result.is_none());
  }

  #[tokio::test]
  async fn like_on_missing_content_is_reference_not_found() {
    let content = FakeContent::with(&[]);
    let err = evaluate(&like(9, 42), &content).await.unwrap_err();
    assert!(matches!(err, EvaluateError::ContentNotFound(42)));
  }

  #[tokio::test]
  async fn comment_embeds_truncated_excerpt() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);
    let event = InteractionEvent::Comment {
      actor_id:   9,
      content_id: 42,
      comment_id: 5,
      body:       "This is a great article and I loved reading it".to_owned(),
    };

    let n = evaluate(&event, &content).await.unwrap().unwrap();
    assert_eq!(n.kind, NotificationKind::Comment);
    assert_eq!(
      n.body,
      "commented on your post \"Hello\": \"This is a great arti...\""
    );
    assert_eq!(n.extra, Some(serde_json::json!({ "comment_id": 5 })));
  }

  #[tokio::test]
  async fn short_comment_is_not_marked_as_truncated() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);
    let event = InteractionEvent::Comment {
      actor_id:   9,
      content_id: 42,
      comment_id: 5,
      body:       "Nice!".to_owned(),
    };

    let n = evaluate(&event, &content).await.unwrap().unwrap();
    assert_eq!(n.body, "commented on your post \"Hello\": \"Nice!\"");
  }

  #[tokio::test]
  async fn self_comment_produces_nothing() {
    let content = FakeContent::with(&[(42, 7, "Hello")]);
    let event = InteractionEvent::Comment {
      actor_id:   7,
      content_id: 42,
      comment_id: 5,
      body:       "first!".to_owned(),
    };
    assert!(evaluate(&event, &content).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn follow_notifies_the_followed_user() {
    let content = FakeContent::with(&[]);
    let event = InteractionEvent::Follow { actor_id: 9, followed_id: 7 };

    let n = evaluate(&event, &content).await.unwrap().unwrap();
    assert_eq!(n.recipient_id, 7);
    assert_eq!(n.actor_id, 9);
    assert_eq!(n.kind, NotificationKind::Follow);
    assert_eq!(n.body, "started following you");
    assert_eq!(n.related_content_id, None);
    assert_eq!(n.extra, None);
  }

  #[tokio::test]
  async fn self_follow_is_defensively_ignored() {
    let content = FakeContent::with(&[]);
    let event = InteractionEvent::Follow { actor_id: 7, followed_id: 7 };
    assert!(evaluate(&event, &content).await.unwrap().is_none());
  }

  #[test]
  fn truncation_counts_code_points_not_bytes() {
    // Exactly 20 CJK chars, 3 bytes each; `longer` below adds a 21st.
    // Byte-based truncation would split one of these mid-character.
    let text = "这篇文章写得非常好我很喜欢反复读了三遍了";
    assert_eq!(text.chars().count(), 20);
    assert_eq!(truncate_excerpt(text, 20), text);

    let longer = format!("{text}呀");
    let cut = truncate_excerpt(&longer, 20);
    assert_eq!(cut, format!("{text}..."));
  }

  #[test]
  fn truncation_at_exact_cap_is_untouched() {
    assert_eq!(truncate_excerpt("12345", 5), "12345");
    assert_eq!(truncate_excerpt("123456", 5), "12345...");
    assert_eq!(truncate_excerpt("", 5), "");
  }
}
