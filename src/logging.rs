use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route tracing output to `log_file`; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(log_file: &Path, level: &str) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    // A second init (tests, re-entry) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();

    Ok(())
}

fn default_directive(level: &str) -> String {
    format!("daily_journal={}", level)
}
