use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
};

#[derive(Debug, Parser)]
#[command(
  name = "markpane",
  about = "Split-pane Markdown editor with live preview and autosave",
  version
)]
pub struct Cli {
  /// Markdown file to open
  pub file: Option<PathBuf>,

  /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,

  /// Path to the config file to use
  #[arg(long, value_name = "FILE")]
  pub config_file: Option<PathBuf>,

  /// Path to the log file to write to
  #[arg(long, value_name = "FILE")]
  pub log_file: Option<PathBuf>,
}
