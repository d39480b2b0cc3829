//! tattle-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the notification API over HTTP.
//! Identity arrives as the gateway's `x-user-id` header.
//!
//! # Retention maintenance
//!
//! Old read notifications are pruned on an in-process interval
//! (`prune_interval_hours`); operators can also run a one-shot sweep:
//!
//! ```text
//! tattle-server prune [--days 30] [--include-unread]
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::middleware;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tattle_api::identity::trusted_header_identity;
use tattle_core::store::NotificationStore as _;
use tattle_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `TATTLE_*` environment.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:                 String,
  #[serde(default = "default_port")]
  port:                 u16,
  #[serde(default = "default_db_path")]
  db_path:              PathBuf,
  /// Notifications older than this many days are eligible for pruning.
  #[serde(default = "default_retention_days")]
  retention_days:       u32,
  /// Interval between scheduled prune sweeps. 0 disables the schedule.
  #[serde(default = "default_prune_interval_hours")]
  prune_interval_hours: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8064 }
fn default_db_path() -> PathBuf { PathBuf::from("tattle.db") }
fn default_retention_days() -> u32 { 30 }
fn default_prune_interval_hours() -> u64 { 24 }

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Tattle notification server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run one retention sweep and exit.
  Prune {
    /// Age cutoff in days; defaults to the configured retention_days.
    #[arg(long)]
    days: Option<u32>,

    /// Also remove unread notifications (the scheduled sweep never does).
    #[arg(long)]
    include_unread: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TATTLE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let db_path = expand_tilde(&server_cfg.db_path);
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  // Operator mode: one-shot retention sweep.
  if let Some(Command::Prune { days, include_unread }) = cli.command {
    let days = days.unwrap_or(server_cfg.retention_days);
    let removed = store
      .prune_older_than(days, !include_unread)
      .await
      .context("prune failed")?;
    tracing::info!(days, include_unread, removed, "retention sweep complete");
    return Ok(());
  }

  // Scheduled retention sweeps, off the request path.
  if server_cfg.prune_interval_hours > 0 {
    let prune_store = store.clone();
    let retention_days = server_cfg.retention_days;
    let period = Duration::from_secs(server_cfg.prune_interval_hours * 3600);
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(period);
      // The first tick fires immediately; skip it so startup stays quick.
      ticker.tick().await;
      loop {
        ticker.tick().await;
        match prune_store.prune_older_than(retention_days, true).await {
          Ok(removed) => {
            tracing::info!(removed, retention_days, "pruned old read notifications")
          }
          Err(e) => tracing::error!(error = %e, "scheduled prune failed"),
        }
      }
    });
  }

  let app = tattle_api::api_router(Arc::new(store))
    .layer(middleware::from_fn(trusted_header_identity))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
