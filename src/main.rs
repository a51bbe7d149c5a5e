//! inkyfeed — headlines and quotes on a three-colour e-paper panel.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ FeedSet  ┌────────────┐ RenderJob ┌──────────────┐
//! │ poll refresh │ ───────► │ rotation   │ ────────► │ coordinator  │ ──► panel
//! │   (thread)   │          │ (cursor)   │           │ (busy gate)  │ ──► preview.png
//! └──────────────┘          └────────────┘           └──────────────┘
//!        │ PollMsg                ▲ poll rotation           ▲ manual quote
//!        ▼                        │ (thread)                │
//!   ┌──────────┐  draw()  ┌──────────┐                      │
//!   │  app.rs  │ ───────► │  ui.rs   │    input.rs ─────────┘
//!   └──────────┘          └──────────┘
//! ```
//!
//! * **`source/`** — the feed model, the `DataSource` trait and the RSS
//!   implementation.
//! * **`render/`** — word wrap, composition, palette reduction, the panel
//!   trait and the coordinator that owns the panel.
//! * **`rotation`** — cursor over the flattened article list.
//! * **`poll`** — background threads for feed refresh and rotation.
//! * **`app`** / **`ui`** / **`input`** — the terminal status page.
//! * **`config`** / **`logging`** — TOML config and file logging.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod input;
mod logging;
mod poll;
mod render;
mod rotation;
mod source;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::{App, Handles};
use config::Config;
use render::{Composer, Coordinator, HeadlessPanel, LayoutSettings, RenderJob};
use rotation::Rotation;
use source::{DataSource, RssSource};

#[derive(Parser, Debug)]
#[command(name = "inkyfeed", version, about)]
struct Cli {
    /// Config file (TOML).  Defaults to ./inkyfeed.toml.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the PNG preview of each render.
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Render this text once and exit, without the status page.
    #[arg(long, value_name = "TEXT")]
    once: Option<String>,

    /// Seconds between rotated articles.
    #[arg(long, value_name = "SECS")]
    rotation_interval: Option<u64>,
}

// ---------------------------------------------------------------------------
// Terminal lifetime
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&path)?;

    if let Some(preview) = &cli.preview {
        config.panel.preview_path = preview.clone();
    }
    if let Some(secs) = cli.rotation_interval {
        config.rotation.interval_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn build_coordinator(config: &Config) -> Result<Coordinator> {
    let composer = Composer::new(
        config.panel.width,
        config.panel.height,
        config.font_set()?,
        LayoutSettings::from(&config.layout),
    );
    // Hardware drivers plug in here behind `Panel`.
    let panel = Box::new(HeadlessPanel::new());
    Ok(Coordinator::new(
        composer,
        panel,
        Some(config.panel.preview_path.clone()),
    ))
}

fn build_sources(config: &Config) -> Vec<Box<dyn DataSource>> {
    config
        .feeds
        .sources
        .iter()
        .map(|s| {
            Box::new(RssSource::new(&s.url, &s.label, config.feeds.max_entries))
                as Box<dyn DataSource>
        })
        .collect()
}

fn render_once(coordinator: &Coordinator, text: &str, config: &Config) -> Result<()> {
    let job = RenderJob::manual_quote(text, config.manual.uppercase)
        .context("nothing to render: text is empty")?;
    coordinator.submit(job)?;
    println!("rendered; preview at {}", config.panel.preview_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();

    let config = load_config(&cli)?;
    let coordinator = Arc::new(build_coordinator(&config)?);

    if let Some(text) = &cli.once {
        return render_once(&coordinator, text, &config);
    }

    install_panic_hook();
    info!(
        feeds = config.feeds.sources.len(),
        rotation_secs = config.rotation.interval_secs,
        "starting status page"
    );

    // -- background triggers -------------------------------------------------
    let rotation = Arc::new(Rotation::new());
    let rotation_enabled = Arc::new(AtomicBool::new(config.rotation.enabled));
    let (tx, rx) = poll::channel();

    poll::spawn_refresh(
        build_sources(&config),
        Arc::clone(&rotation),
        config.feeds.refresh_interval(),
        tx.clone(),
    );
    poll::spawn_rotation(
        Arc::clone(&rotation),
        Arc::clone(&coordinator),
        Arc::clone(&rotation_enabled),
        config.rotation.interval(),
        tx.clone(),
    );

    // -- terminal setup (restored by TerminalGuard::drop) --------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(
        Handles {
            coordinator,
            rotation,
            rotation_enabled,
            tx,
        },
        config.manual.uppercase,
    );

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the background threads.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle_msg(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("status page closed");
    Ok(())
}
