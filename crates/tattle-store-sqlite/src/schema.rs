//! SQL schema for the Tattle SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `users` and `posts` are owned by the account and content services, which
/// share this database file; the notification core only reads them (actor
/// profile join, recipient resolution). `notifications` is owned here.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id        INTEGER PRIMARY KEY,
    username  TEXT NOT NULL,
    avatar    TEXT
);

CREATE TABLE IF NOT EXISTS posts (
    id         INTEGER PRIMARY KEY,
    author_id  INTEGER NOT NULL REFERENCES users(id),
    title      TEXT NOT NULL
);

-- Notifications are append-only apart from the read flag.
-- The only UPDATE ever issued sets is_read = 1; the only DELETE is the
-- retention sweep.
CREATE TABLE IF NOT EXISTS notifications (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    recipient_id        INTEGER NOT NULL,
    actor_id            INTEGER NOT NULL,
    kind                TEXT NOT NULL,      -- 'like' | 'favorite' | 'comment' | 'follow'
    body                TEXT NOT NULL,
    is_read             INTEGER NOT NULL DEFAULT 0,
    related_content_id  INTEGER,
    extra               TEXT,               -- compact JSON or NULL
    created_at          TEXT NOT NULL       -- ISO 8601 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS notifications_recipient_idx ON notifications(recipient_id);
CREATE INDEX IF NOT EXISTS notifications_kind_idx      ON notifications(kind);
CREATE INDEX IF NOT EXISTS notifications_created_idx   ON notifications(created_at);

PRAGMA user_version = 1;
";
