mod application;
mod cli;
mod core;
mod export;
mod handlers;
mod ui;

use anyhow::{
  Context,
  Result,
};
use clap::Parser;
use markpane_render::CmarkRenderer;

use crate::{
  application::Application,
  cli::Cli,
  core::{
    config::Config,
    document::Document,
    paths,
    session::{
      AutosaveSettings,
      Session,
    },
  },
};

fn main() -> Result<()> {
  let cli = Cli::parse();
  paths::initialize_config_file(cli.config_file.clone());
  paths::initialize_log_file(cli.log_file.clone());
  setup_logging(cli.verbosity).context("failed to initialize logging")?;

  let config = Config::load(&paths::config_file())?;

  let document = match &cli.file {
    Some(path) => Document::open(path)
      .with_context(|| format!("could not open {}", path.display()))?,
    None => Document::welcome(),
  };

  let autosave = AutosaveSettings {
    enabled:           config.autosave.enable,
    use_document_path: config.autosave.use_document_path,
    fallback:          paths::autosave_fallback(&config.autosave.fallback_filename),
  };
  let mut session = Session::new(Box::new(CmarkRenderer::default()), document, autosave);
  if let Err(err) = session.render_now() {
    log::warn!("initial render failed: {err}");
  }

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()
    .context("failed to start the async runtime")?;
  let handle = runtime.handle().clone();
  // eframe drives `update` on this thread; the hooks' bounded-wait send
  // fallback needs the runtime's timer context here.
  let _enter = runtime.enter();

  let native_options = eframe::NativeOptions {
    viewport: egui::ViewportBuilder::default()
      .with_inner_size([1300.0, 780.0])
      .with_app_id("markpane"),
    ..Default::default()
  };
  eframe::run_native(
    "markpane",
    native_options,
    Box::new(move |cc| Ok(Box::new(Application::new(cc, session, config, handle)))),
  )
  .map_err(|err| anyhow::anyhow!("failed to start the UI: {err}"))
}

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };
  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        message
      ))
    })
    .level(level)
    .chain(fern::log_file(paths::log_file())?)
    .apply()?;
  Ok(())
}
