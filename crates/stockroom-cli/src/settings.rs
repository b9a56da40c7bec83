//! Runtime settings: TOML file, then `STOCKROOM_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Shape of the optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path: PathBuf,
  /// `tracing` filter directive used when `RUST_LOG` is unset.
  pub log_level:  String,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> { Self::load_with_env(path, None) }

  /// Like [`Settings::load`], reading `STOCKROOM_*` variables from `env`
  /// instead of the process environment when it is `Some`.
  fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "stockroom.db")?
      .set_default("log_level", "warn")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("STOCKROOM").source(env))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/") {
    if let Ok(home) = std::env::var("HOME") {
      return PathBuf::from(home).join(rest);
    }
  }
  path.to_path_buf()
}
