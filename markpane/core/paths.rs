//! Well-known file locations.

use std::{
  path::PathBuf,
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("MARKPANE_CONFIG_DIR") {
    return PathBuf::from(dir);
  }
  let strategy = choose_base_strategy().expect("Unable to find the config directory!");
  let mut path = strategy.config_dir();
  path.push("markpane");
  path
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("MARKPANE_CACHE_DIR") {
    return PathBuf::from(dir);
  }
  let strategy = choose_base_strategy().expect("Unable to find the cache directory!");
  let mut path = strategy.cache_dir();
  path.push("markpane");
  path
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

/// Where autosaves land when the session has no document path to write to.
pub fn autosave_fallback(filename: &str) -> PathBuf {
  match etcetera::home_dir() {
    Ok(home) => home.join(filename),
    Err(_) => PathBuf::from(filename),
  }
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn default_log_file() -> PathBuf {
  cache_dir().join("markpane.log")
}

fn ensure_parent_dir(path: &std::path::Path) {
  if let Some(parent) = path.parent() {
    if !parent.exists() {
      std::fs::create_dir_all(parent).ok();
    }
  }
}
