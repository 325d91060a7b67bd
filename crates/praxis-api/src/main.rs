//! praxis-api server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite key-value store, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash` in
//! config.toml:
//!
//! ```
//! cargo run -p praxis-api --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::{Duration, Utc};
use clap::Parser;
use praxis_api::{AppState, ServerConfig};
use praxis_core::{
  SessionVault, Stores,
  id::local_id,
  users::{self, Role, UserRecord},
};
use praxis_store_sqlite::SqliteKv;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Praxis content-management server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PRAXIS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the key-value store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let kv = Arc::new(
    SqliteKv::open(&store_path)
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  // Build application state.
  let stores = Arc::new(Stores::new(kv.clone()));
  let sessions = Arc::new(SessionVault::new(
    kv,
    Duration::seconds(server_cfg.session_ttl_secs),
    Duration::seconds(server_cfg.session_refresh_threshold_secs),
  ));

  seed_admin(&stores, &server_cfg)?;

  let state = AppState {
    stores,
    sessions,
    config: Arc::new(server_cfg.clone()),
  };

  let app = praxis_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Register the bootstrap admin from config, unless the email is taken.
fn seed_admin(stores: &Stores<SqliteKv>, config: &ServerConfig) -> anyhow::Result<()> {
  let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash)
  else {
    return Ok(());
  };

  if users::find_by_email(&stores.users, email).is_some() {
    return Ok(());
  }

  let name = config
    .admin_name
    .clone()
    .unwrap_or_else(|| "Administrator".to_string());
  tracing::info!(email, "seeding bootstrap admin");

  stores
    .users
    .save(UserRecord {
      id:            local_id(),
      name,
      email:         email.clone(),
      phone:         String::new(),
      password_hash: hash.clone(),
      role:          Role::Admin,
      registered_at: Utc::now(),
    })
    .context("failed to seed admin user")?;
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
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
