//! `stockroom` — office inventory on the command line.
//!
//! # Usage
//!
//! ```text
//! stockroom category create --name Elektronik --description "Peralatan kantor"
//! stockroom item create -n "Laptop Dell" -c 1 -p 15000000 -d 2024-01-15
//! stockroom item replacement
//! stockroom --json report total
//! ```

mod app;
mod cli;
mod render;
mod settings;

use std::{io, sync::Arc};

use anyhow::{Context, Result};
use app::App;
use chrono::Utc;
use clap::Parser;
use cli::Cli;
use render::Format;
use settings::Settings;
use stockroom_store_sqlite::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let mut settings = Settings::load(&cli.config)?;

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&settings.log_level))
    .context("invalid log_level")?;
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  if let Some(path) = cli.store {
    settings.store_path = path;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("opening store at {}", settings.store_path.display()))?;
  tracing::debug!(path = %settings.store_path.display(), "store ready");

  let format = if cli.json { Format::Json } else { Format::Table };
  let app = App::new(Arc::new(store), format);

  let mut out = io::stdout().lock();
  app.run(cli.command, Utc::now(), &mut out).await
}
