mod app;
mod components;
mod config;
mod content;
mod error;
mod event;
mod export;
mod fs;
mod handler;
mod theme;
mod tui;
mod ui;
mod viewport;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse a directory tree, select files and export their paths or contents.
#[derive(Parser, Debug)]
#[command(name = "treepick", version, about)]
struct Cli {
    /// Root directory to explore (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Extra config file, applied on top of the global and local ones
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Set up logging. The terminal belongs to the UI, so stderr is only used
/// when `RUST_LOG` asks for it explicitly.
fn init_tracing(log_file: Option<&Path>) -> error::Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|source| error::AppError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treepick=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let path = cli.path.canonicalize().map_err(|e| {
        error::AppError::RootResolution(format!("{}: {e}", cli.path.display()))
    })?;
    if !path.is_dir() {
        return Err(error::AppError::RootResolution(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    let config = AppConfig::load(cli.config.as_deref());
    let mut app = App::new(&path, config)?;
    tracing::info!(root = %path.display(), nodes = app.tree.len(), "starting");

    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
