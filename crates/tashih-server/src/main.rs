//! tashih-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! three SQLite stores, and serves the review API over HTTP.
//!
//! # Access token hash generation
//!
//! To generate the argon2 PHC string for `access_token_hash` in config.toml:
//!
//! ```sh
//! cargo run -p tashih-server -- --hash-token
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use tashih_api::ApiState;
use tashih_core::Resolver;
use tashih_server::{ServerConfig, auth::Argon2Verifier};
use tashih_store_sqlite::{SqliteArchiveStore, SqliteCanonicalStore, SqlitePendingStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tashih correction review server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for an access token entered on stdin and exit.
  #[arg(long)]
  hash_token: bool,
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

  // Helper mode: hash a token and exit.
  if cli.hash_token {
    let token = read_stdin_line()?;
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(token.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TASHIH"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Each store gets its own connection; they never share a transaction.
  let pending_path = expand_tilde(&server_cfg.pending_path);
  let pending = SqlitePendingStore::open(&pending_path)
    .await
    .with_context(|| format!("failed to open pending store at {pending_path:?}"))?;

  let archive_path = expand_tilde(&server_cfg.archive_path);
  let archive = SqliteArchiveStore::open(&archive_path)
    .await
    .with_context(|| format!("failed to open archive store at {archive_path:?}"))?;

  let canonical_path = expand_tilde(&server_cfg.canonical_path);
  let canonical = SqliteCanonicalStore::open(&canonical_path)
    .await
    .with_context(|| format!("failed to open canonical store at {canonical_path:?}"))?;

  let resolver = Resolver::new(Arc::new(pending), Arc::new(archive), Arc::new(canonical))
    .with_config(server_cfg.resolver_config());

  let state = ApiState {
    resolver:            Arc::new(resolver),
    scan_limit:          server_cfg.scan_limit,
    legacy_status_codes: server_cfg.legacy_status_codes,
  };
  let verifier = Arc::new(Argon2Verifier {
    token_hash: server_cfg.access_token_hash.clone(),
  });

  let app = tashih_server::router(state, verifier);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read one line from stdin, without the trailing newline.
fn read_stdin_line() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Access token: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
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
