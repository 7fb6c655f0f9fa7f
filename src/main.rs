mod app;
mod command;
mod components;
mod config;
mod document;
mod error;
mod event;
mod format;
mod handler;
mod logging;
mod search;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, ThemeConfig, ViewConfig};
use crate::document::Document;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// A terminal Notepad.
#[derive(Parser, Debug)]
#[command(name = "notepad", version, about)]
struct Cli {
    /// File to open (created on first save if missing)
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light or custom
    #[arg(long)]
    theme: Option<String>,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Start with word wrap off
    #[arg(long)]
    no_wrap: bool,

    /// Log filter used when RUST_LOG is unset (e.g. debug)
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for notepad.log
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// CLI flags as the highest-priority config layer.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
                ..Default::default()
            },
            view: ViewConfig {
                word_wrap: self.no_wrap.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            log: LogConfig {
                level: self.log_level.clone(),
                dir: self
                    .log_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let _log_guard = logging::init(&config.log_dir(), config.log_level())?;
    install_panic_hook();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        theme = config.theme_scheme(),
        "startup"
    );

    let document = match &cli.path {
        Some(path) => App::load_document(path).map_err(|e| {
            error::AppError::InvalidPath(format!("{}: {e}", path.display()))
        })?,
        None => Document::untitled(),
    };

    let mut app = App::new(&config, document);
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Paste(text) => handler::handle_paste(&mut app, text),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("shutdown");
    Ok(())
}
