use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::event::EventStream;
use daily_journal::app::App;
use daily_journal::clock::SystemClock;
use daily_journal::config::Config;
use daily_journal::logging;
use daily_journal::notifications::Severity;
use daily_journal::theme::detect_system_theme;
use daily_journal::ui::UI;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

const IDLE_WAKE: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(
    name = "daily-journal",
    version,
    about = "A distraction-free daily journal for the terminal"
)]
struct Args {
    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Theme to apply at startup (dark, light or brown)
    #[arg(long)]
    theme: Option<String>,

    /// Log level for the journal log file
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Config errors are reported once logging is up.
    let (config, config_error) = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    logging::init(&config.log_file(), &level)
        .map_err(|e| eyre!("Failed to open log file: {}", e))?;
    if let Some(e) = config_error {
        warn!("Falling back to default configuration: {}", e);
    }
    info!("Starting daily-journal v{}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(&config, Box::new(SystemClock), detect_system_theme());
    if let Some(name) = args.theme.as_deref() {
        if app.themes.set_theme(name, &mut app.state).is_err() {
            app.state.notify(format!("Unknown theme '{}'", name), Severity::Warning);
        }
    }

    let mut ui = UI::new()?;
    let result = run(&mut ui, &mut app).await;
    drop(ui);

    info!("Shutting down");
    result
}

async fn run(ui: &mut UI, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        app.tick();
        ui.display(app)?;
        if app.should_quit() {
            break;
        }

        let deadline = app
            .next_deadline()
            .map(Instant::from_std)
            .unwrap_or_else(|| Instant::now() + IDLE_WAKE);

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = sleep_until(deadline) => {}
        }
    }

    Ok(())
}
