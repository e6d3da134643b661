mod api;
mod app;
mod config;
mod constants;
mod guide;
mod input;
mod manage;
mod modal;
mod nav;
mod notify;
mod player;
mod theme;
mod ui;
mod youtube;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Base URL of the channel management API (overrides the prefs file)
  #[arg(long)]
  api_url: Option<String>,

  /// API key sent as X-API-Key (overrides the prefs file)
  #[arg(long)]
  api_key: Option<String>,

  /// Log filter, e.g. 'info' or 'tvguide=debug' (RUST_LOG wins if set)
  #[arg(long, default_value = "info")]
  log_level: String,
}

/// Set up file logging. The TUI owns stdout, so tracing writes to a log file
/// under the platform data dir. The guard must stay alive for the process.
fn init_logging(level: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "tvguide")?;
  let log_dir = proj_dirs.data_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "tvguide.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging(&args.log_level);
  info!(version = env!("CARGO_PKG_VERSION"), "tvguide starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let mut app = App::new(args.api_url, args.api_key);
  app.trigger_guide_refresh();

  loop {
    app.check_pending();
    app.player.check_mpv_status();
    app.notifications.expire();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key).await?;
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.player.stop().await.context("Failed to stop playback on exit")?;
  Ok(())
}
