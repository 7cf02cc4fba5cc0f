//! Application configuration, loaded from `config.toml` in the config dir.
//!
//! Every field has a default; a missing config file is not an error, a
//! malformed one is fatal at startup.

use std::{
  fs,
  io,
  path::Path,
  time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("could not read config file: {0}")]
  Io(#[from] io::Error),
  #[error("bad config file: {0}")]
  Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct Config {
  pub render:   RenderConfig,
  pub autosave: AutosaveConfig,
  pub export:   ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct RenderConfig {
  /// Quiet period after the last source edit before the preview refreshes.
  pub debounce_ms: u64,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self { debounce_ms: 120 }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct AutosaveConfig {
  pub enable:            bool,
  /// Quiet period after the last source edit before an autosave write.
  pub idle_ms:           u64,
  /// Autosave onto the open document itself when it has a path.
  pub use_document_path: bool,
  /// File name used under the home directory when no document path is set.
  pub fallback_filename: String,
}

impl Default for AutosaveConfig {
  fn default() -> Self {
    Self {
      enable:            true,
      idle_ms:           1000,
      use_document_path: true,
      fallback_filename: "markpane-autosave.md".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct ExportConfig {
  /// Program used for the external-converter export formats.
  pub pandoc: String,
}

impl Default for ExportConfig {
  fn default() -> Self {
    Self {
      pandoc: "pandoc".to_string(),
    }
  }
}

impl Config {
  pub fn load(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
      Ok(text) => Ok(toml::from_str(&text)?),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
      Err(err) => Err(err.into()),
    }
  }

  pub fn render_debounce(&self) -> Duration {
    Duration::from_millis(self.render.debounce_ms)
  }

  pub fn autosave_idle(&self) -> Duration {
    Duration::from_millis(self.autosave.idle_ms)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("config.toml")).unwrap();
    assert!(config.autosave.enable);
    assert_eq!(config.autosave.idle_ms, 1000);
    assert_eq!(config.render.debounce_ms, 120);
    assert_eq!(config.export.pandoc, "pandoc");
  }

  #[test]
  fn parses_partial_overrides() {
    let config: Config = toml::from_str(
      "[autosave]\nenable = false\nidle-ms = 250\n\n[export]\npandoc = \"/opt/pandoc\"\n",
    )
    .unwrap();
    assert!(!config.autosave.enable);
    assert_eq!(config.autosave_idle(), Duration::from_millis(250));
    assert_eq!(config.export.pandoc, "/opt/pandoc");
    // Untouched sections keep their defaults.
    assert_eq!(config.render.debounce_ms, 120);
    assert!(config.autosave.use_document_path);
  }

  #[test]
  fn rejects_unknown_keys() {
    let result: Result<Config, _> = toml::from_str("[render]\ndebouce-ms = 120\n");
    assert!(result.is_err());
  }
}
