//! Error types for `tattle-core`.

use thiserror::Error;

use crate::notification::ContentId;

/// Failure modes of [`engine::evaluate`](crate::engine::evaluate).
#[derive(Debug, Error)]
pub enum EvaluateError<E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  /// The post referenced by the event no longer exists. Non-fatal for
  /// the fan-out: the caller logs and skips.
  #[error("content {0} not found")]
  ContentNotFound(ContentId),

  /// The content lookup itself failed (storage error).
  #[error("content lookup failed: {0}")]
  Lookup(#[source] E),
}

/// Failure modes of [`Fanout::on_interaction_created`](crate::fanout::Fanout).
///
/// `ContentNotFound` never appears here — the fan-out swallows it.
#[derive(Debug, Error)]
pub enum FanoutError<L, S>
where
  L: std::error::Error + Send + Sync + 'static,
  S: std::error::Error + Send + Sync + 'static,
{
  #[error("content lookup failed: {0}")]
  Lookup(#[source] L),

  /// The notification append failed. The triggering interaction is
  /// already committed and is not rolled back; delivery is best-effort.
  #[error("notification append failed: {0}")]
  Append(#[source] S),
}
