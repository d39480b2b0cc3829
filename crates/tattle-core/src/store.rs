//! The `NotificationStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tattle-store-sqlite`).
//! Higher layers (`tattle-api`, the fan-out hook) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::notification::{
  NewNotification, Notification, NotificationId, NotificationPage, UserId,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Offset-pagination parameters for [`NotificationStore::list_for_recipient`].
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
  /// 1-indexed page number. Values below 1 are clamped to 1.
  pub page:      u32,
  pub page_size: u32,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self { page: 1, page_size: 20 }
  }
}

impl PageRequest {
  /// The page number with the lower bound applied.
  pub fn page_clamped(&self) -> u32 { self.page.max(1) }

  /// Row offset of the first item on this page.
  pub fn offset(&self) -> u64 {
    u64::from(self.page_clamped() - 1) * u64::from(self.page_size)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a notification store backend.
///
/// The notification log is append-only apart from the read flag: the only
/// permitted mutation is `is_read` false → true, and the only deletion is
/// the age-based retention sweep.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NotificationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new notification. The store assigns `id` and `created_at`
  /// and initialises `is_read` to false.
  fn append(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// One page of `user_id`'s notifications, `created_at` descending,
  /// with the actor's public profile joined in.
  fn list_for_recipient(
    &self,
    user_id: UserId,
    page: PageRequest,
  ) -> impl Future<Output = Result<NotificationPage, Self::Error>> + Send + '_;

  /// Mark the given notifications read, scoped to rows owned by `user_id`.
  /// Ids belonging to other recipients are silently unaffected. An empty
  /// id set is a no-op, not an error. Returns the number of rows changed.
  fn mark_read(
    &self,
    user_id: UserId,
    ids: Vec<NotificationId>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Mark every unread notification for `user_id` read. Idempotent:
  /// a second call affects zero rows. Returns the number of rows changed.
  fn mark_all_read(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Retention sweep: delete notifications older than `days` days.
  /// With `only_read` (the normal cadence) unread rows are kept
  /// regardless of age. Returns the number of rows removed.
  ///
  /// Maintenance-path only — never called per request. Safe to run
  /// concurrently with appends, since freshly appended rows are always
  /// younger than the cutoff.
  fn prune_older_than(
    &self,
    days: u32,
    only_read: bool,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
