//! The fan-out hook — the single entry point write paths call after their
//! own insert succeeds.
//!
//! Runs the rule engine, then appends the resulting notification (if any).
//! Deliberately not transactional with the triggering interaction: a
//! failed append is surfaced to the caller but the like/comment/follow it
//! came from stays committed. A lost notification degrades UX; it is not a
//! data-integrity violation.

use crate::{
  content::ContentLookup,
  engine,
  error::{EvaluateError, FanoutError},
  event::InteractionEvent,
  notification::Notification,
  store::NotificationStore,
};

/// Couples a content lookup and a notification store into the hook the
/// write paths invoke.
#[derive(Clone)]
pub struct Fanout<L, S> {
  lookup: L,
  store:  S,
}

impl<L, S> Fanout<L, S>
where
  L: ContentLookup,
  S: NotificationStore,
{
  pub fn new(lookup: L, store: S) -> Self {
    Self { lookup, store }
  }

  /// Evaluate `event` and append the resulting notification, if any.
  ///
  /// Invoked once per interaction, synchronously with the triggering
  /// write. Returns `Ok(None)` when the event does not qualify — a
  /// self-interaction, or a reference to content deleted in the meantime
  /// (the latter is logged and skipped, never an error).
  pub async fn on_interaction_created(
    &self,
    event: &InteractionEvent,
  ) -> Result<Option<Notification>, FanoutError<L::Error, S::Error>> {
    let decision = match engine::evaluate(event, &self.lookup).await {
      Ok(d) => d,
      Err(EvaluateError::ContentNotFound(content_id)) => {
        tracing::warn!(
          content_id,
          actor_id = event.actor_id(),
          "skipping fan-out: referenced content no longer exists"
        );
        return Ok(None);
      }
      Err(EvaluateError::Lookup(e)) => return Err(FanoutError::Lookup(e)),
    };

    let Some(new_notification) = decision else {
      return Ok(None);
    };

    let notification = self
      .store
      .append(new_notification)
      .await
      .map_err(FanoutError::Append)?;

    tracing::debug!(
      id = notification.id,
      recipient_id = notification.recipient_id,
      kind = ?notification.kind,
      "notification appended"
    );
    Ok(Some(notification))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use chrono::Utc;

  use super::*;
  use crate::{
    content::ContentRef,
    event::ActionKind,
    notification::{
      NewNotification, NotificationId, NotificationKind, NotificationPage, UserId,
    },
    store::PageRequest,
  };

  struct FakeContent(Vec<ContentRef>);

  impl ContentLookup for FakeContent {
    type Error = std::convert::Infallible;

    async fn content_by_id(
      &self,
      id: i64,
    ) -> Result<Option<ContentRef>, Self::Error> {
      Ok(self.0.iter().find(|c| c.id == id).cloned())
    }
  }

  /// Append-recording store; fails every append when `fail` is set.
  #[derive(Clone, Default)]
  struct RecordingStore {
    appended: Arc<Mutex<Vec<NewNotification>>>,
    fail:     bool,
  }

  #[derive(Debug, thiserror::Error)]
  #[error("storage down")]
  struct StoreDown;

  impl NotificationStore for RecordingStore {
    type Error = StoreDown;

    async fn append(
      &self,
      input: NewNotification,
    ) -> Result<Notification, Self::Error> {
      if self.fail {
        return Err(StoreDown);
      }
      let mut appended = self.appended.lock().unwrap();
      let id = appended.len() as NotificationId + 1;
      appended.push(input.clone());
      Ok(Notification {
        id,
        recipient_id: input.recipient_id,
        actor_id: input.actor_id,
        kind: input.kind,
        body: input.body,
        is_read: false,
        related_content_id: input.related_content_id,
        extra: input.extra,
        created_at: Utc::now(),
      })
    }

    async fn list_for_recipient(
      &self,
      _user_id: UserId,
      _page: PageRequest,
    ) -> Result<NotificationPage, Self::Error> {
      unimplemented!("not exercised by fan-out tests")
    }

    async fn mark_read(
      &self,
      _user_id: UserId,
      _ids: Vec<NotificationId>,
    ) -> Result<u64, Self::Error> {
      unimplemented!("not exercised by fan-out tests")
    }

    async fn mark_all_read(&self, _user_id: UserId) -> Result<u64, Self::Error> {
      unimplemented!("not exercised by fan-out tests")
    }

    async fn prune_older_than(
      &self,
      _days: u32,
      _only_read: bool,
    ) -> Result<u64, Self::Error> {
      unimplemented!("not exercised by fan-out tests")
    }
  }

  fn post_42_by_7() -> FakeContent {
    FakeContent(vec![ContentRef {
      id:        42,
      author_id: 7,
      title:     "Hello".to_owned(),
    }])
  }

  fn like_by_9() -> InteractionEvent {
    InteractionEvent::Action {
      actor_id:   9,
      content_id: 42,
      action_id:  1,
      kind:       ActionKind::Like,
    }
  }

  #[tokio::test]
  async fn qualifying_event_appends_exactly_one() {
    let store = RecordingStore::default();
    let fanout = Fanout::new(post_42_by_7(), store.clone());

    let n = fanout
      .on_interaction_created(&like_by_9())
      .await
      .unwrap()
      .unwrap();

    assert_eq!(n.recipient_id, 7);
    assert_eq!(n.kind, NotificationKind::Like);
    assert!(!n.is_read);
    assert_eq!(store.appended.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn self_interaction_appends_nothing() {
    let store = RecordingStore::default();
    let fanout = Fanout::new(post_42_by_7(), store.clone());

    let event = InteractionEvent::Action {
      actor_id:   7,
      content_id: 42,
      action_id:  1,
      kind:       ActionKind::Like,
    };
    let result = fanout.on_interaction_created(&event).await.unwrap();

    assert!(result.is_none());
    assert!(store.appended.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn missing_content_is_swallowed() {
    let store = RecordingStore::default();
    let fanout = Fanout::new(FakeContent(vec![]), store.clone());

    let result = fanout.on_interaction_created(&like_by_9()).await.unwrap();

    assert!(result.is_none());
    assert!(store.appended.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn append_failure_surfaces_to_the_caller() {
    let store = RecordingStore { fail: true, ..Default::default() };
    let fanout = Fanout::new(post_42_by_7(), store);

    let err = fanout.on_interaction_created(&like_by_9()).await.unwrap_err();
    assert!(matches!(err, FanoutError::Append(_)));
  }

  #[tokio::test]
  async fn follow_skips_the_content_lookup() {
    let store = RecordingStore::default();
    // Empty content table: a follow must still fan out.
    let fanout = Fanout::new(FakeContent(vec![]), store.clone());

    let event = InteractionEvent::Follow { actor_id: 9, followed_id: 7 };
    let n = fanout.on_interaction_created(&event).await.unwrap().unwrap();

    assert_eq!(n.recipient_id, 7);
    assert_eq!(n.kind, NotificationKind::Follow);
  }
}
