//! JSON REST API for the Tattle notification core.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`NotificationStore`] and [`ContentLookup`]. Auth, TLS, and transport
//! concerns are the caller's responsibility: handlers trust the
//! [`RecipientId`] request extension installed by an outer identity layer.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tattle_api::api_router(store.clone()))
//! ```

pub mod envelope;
pub mod error;
pub mod hooks;
pub mod identity;
pub mod notifications;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use tattle_core::{content::ContentLookup, store::NotificationStore};

pub use envelope::Envelope;
pub use error::ApiError;
pub use identity::RecipientId;


/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: NotificationStore + ContentLookup + Clone + Send + Sync + 'static,
{
  Router::new()
    // Delivery — read side, recipient-scoped
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/read", patch(notifications::mark_read::<S>))
    .route("/notifications/read-all", patch(notifications::mark_all_read::<S>))
    // Fan-out hook for out-of-process write paths
    .route("/hooks/interaction", post(hooks::interaction::<S>))
    .with_state(store)
}
