//! [`SqliteStore`] — the SQLite implementation of [`NotificationStore`]
//! and [`ContentLookup`].

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;

use tattle_core::{
  content::{ContentLookup, ContentRef},
  notification::{
    ActorProfile, NewNotification, Notification, NotificationId,
    NotificationPage, NotificationView, UserId,
  },
  store::{NotificationStore, PageRequest},
};

use crate::{
  Error, Result,
  encode::{RawNotificationRow, encode_dt, encode_kind},
  schema::SCHEMA,
};

const LIST_COLUMNS: &str = "
  n.id, n.recipient_id, n.actor_id, n.kind, n.body, n.is_read,
  n.related_content_id, n.extra, n.created_at,
  u.username AS actor_username,
  u.avatar   AS actor_avatar";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tattle notification store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Externally-owned mirrors ──────────────────────────────────────────

  /// Upsert a user's public profile. Called by the account service (which
  /// owns the `users` table) whenever a profile changes.
  pub async fn put_user(&self, profile: ActorProfile) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, username, avatar) VALUES (?1, ?2, ?3)
           ON CONFLICT (id) DO UPDATE SET username = ?2, avatar = ?3",
          rusqlite::params![profile.id, profile.username, profile.avatar],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Upsert a post's notification-relevant metadata. Called by the content
  /// service, which owns the `posts` table.
  pub async fn put_post(&self, content: ContentRef) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (id, author_id, title) VALUES (?1, ?2, ?3)
           ON CONFLICT (id) DO UPDATE SET author_id = ?2, title = ?3",
          rusqlite::params![content.id, content.author_id, content.title],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete a post. Exposed so the content service's delete path keeps the
  /// mirror in sync (and so tests can model concurrent post deletion).
  pub async fn delete_post(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM posts WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Rewrite a row's `created_at` so retention and ordering tests can age
  /// rows on demand. Test-only: the field is immutable in production.
  pub(crate) async fn set_created_at(
    &self,
    id: i64,
    at: chrono::DateTime<Utc>,
  ) -> Result<()> {
    let at_str = encode_dt(at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE notifications SET created_at = ?1 WHERE id = ?2",
          rusqlite::params![at_str, id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContentLookup impl ──────────────────────────────────────────────────────

impl ContentLookup for SqliteStore {
  type Error = Error;

  async fn content_by_id(&self, id: i64) -> Result<Option<ContentRef>> {
    let content = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, author_id, title FROM posts WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(ContentRef {
                  id:        row.get(0)?,
                  author_id: row.get(1)?,
                  title:     row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(content)
  }
}

// ─── NotificationStore impl ──────────────────────────────────────────────────

impl NotificationStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewNotification) -> Result<Notification> {
    let created_at = Utc::now();

    let kind_str       = encode_kind(input.kind).to_owned();
    let extra_str      = input
      .extra
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;
    let created_at_str = encode_dt(created_at);

    let recipient_id       = input.recipient_id;
    let actor_id           = input.actor_id;
    let body               = input.body.clone();
    let related_content_id = input.related_content_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             recipient_id, actor_id, kind, body,
             related_content_id, extra, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            recipient_id,
            actor_id,
            kind_str,
            body,
            related_content_id,
            extra_str,
            created_at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Notification {
      id,
      recipient_id: input.recipient_id,
      actor_id: input.actor_id,
      kind: input.kind,
      body: input.body,
      is_read: false,
      related_content_id: input.related_content_id,
      extra: input.extra,
      created_at,
    })
  }

  async fn list_for_recipient(
    &self,
    user_id: UserId,
    page: PageRequest,
  ) -> Result<NotificationPage> {
    let page_num  = page.page_clamped();
    let page_size = page.page_size;
    let offset    = page.offset() as i64;

    let (raws, total): (Vec<RawNotificationRow>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM notifications WHERE recipient_id = ?1",
          rusqlite::params![user_id],
          |row| row.get(0),
        )?;

        // Ties on created_at are broken by id so pagination is stable.
        let sql = format!(
          "SELECT {LIST_COLUMNS}
           FROM notifications n
           LEFT JOIN users u ON u.id = n.actor_id
           WHERE n.recipient_id = ?1
           ORDER BY n.created_at DESC, n.id DESC
           LIMIT ?2 OFFSET ?3"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_id, i64::from(page_size), offset],
            |row| {
              Ok(RawNotificationRow {
                id:                 row.get(0)?,
                recipient_id:       row.get(1)?,
                actor_id:           row.get(2)?,
                kind:               row.get(3)?,
                body:               row.get(4)?,
                is_read:            row.get(5)?,
                related_content_id: row.get(6)?,
                extra:              row.get(7)?,
                created_at:         row.get(8)?,
                actor_username:     row.get(9)?,
                actor_avatar:       row.get(10)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let items: Vec<NotificationView> = raws
      .into_iter()
      .map(RawNotificationRow::into_view)
      .collect::<Result<_>>()?;

    let total = total as u64;
    let last_page = if page_size == 0 {
      0
    } else {
      total.div_ceil(u64::from(page_size)) as u32
    };

    Ok(NotificationPage { items, total, page: page_num, last_page })
  }

  async fn mark_read(
    &self,
    user_id: UserId,
    ids: Vec<NotificationId>,
  ) -> Result<u64> {
    if ids.is_empty() {
      return Ok(0);
    }

    let affected = self
      .conn
      .call(move |conn| {
        let placeholders = (2..ids.len() + 2)
          .map(|i| format!("?{i}"))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!(
          "UPDATE notifications SET is_read = 1
           WHERE recipient_id = ?1 AND id IN ({placeholders})"
        );

        // Every parameter is an i64: ?1 is the recipient, the rest the ids.
        let mut params = Vec::with_capacity(ids.len() + 1);
        params.push(user_id);
        params.extend(ids);

        let affected = conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(affected as u64)
      })
      .await?;

    Ok(affected)
  }

  async fn mark_all_read(&self, user_id: UserId) -> Result<u64> {
    let affected = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE notifications SET is_read = 1
           WHERE recipient_id = ?1 AND is_read = 0",
          rusqlite::params![user_id],
        )?;
        Ok(affected as u64)
      })
      .await?;

    Ok(affected)
  }

  async fn prune_older_than(&self, days: u32, only_read: bool) -> Result<u64> {
    let cutoff_str = encode_dt(Utc::now() - Duration::days(i64::from(days)));

    let removed = self
      .conn
      .call(move |conn| {
        let removed = if only_read {
          conn.execute(
            "DELETE FROM notifications WHERE created_at < ?1 AND is_read = 1",
            rusqlite::params![cutoff_str],
          )?
        } else {
          conn.execute(
            "DELETE FROM notifications WHERE created_at < ?1",
            rusqlite::params![cutoff_str],
          )?
        };
        Ok(removed as u64)
      })
      .await?;

    Ok(removed)
  }
}
