//! Case binder server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `BINDER_*`
//! environment variables, opens the SQLite store, and serves the HTML pages
//! and JSON API over HTTP.
//!
//! Nested keys use a double underscore, e.g. `BINDER_AI__MODEL=gpt-4o-mini`.
//! The model API key may also come from `OPENAI_API_KEY`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use binder_ai::{Assistant, OpenAiBackend};
use binder_store_sqlite::SqliteStore;
use binder_web::{AppState, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Family law case binder")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// API key for the summarisation model. Overrides `ai.api_key`.
  #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
  openai_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BINDER").separator("__"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if cli.openai_api_key.is_some() {
    server_cfg.ai.api_key = cli.openai_api_key;
  }
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.upload_dir = expand_tilde(&server_cfg.upload_dir);

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  let backend =
    OpenAiBackend::new(&server_cfg.ai).context("failed to build model client")?;
  if !backend.has_api_key() {
    tracing::warn!("no model API key configured; analysis will use fallbacks");
  }
  tracing::info!(ai = ?server_cfg.ai, upload_dir = ?server_cfg.upload_dir, "configuration loaded");

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    store:     Arc::new(store),
    assistant: Arc::new(Assistant::new(backend)),
    config:    Arc::new(server_cfg),
  };
  let app = binder_web::router(state);

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
