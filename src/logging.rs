//! Subscriber setup: colored console output, a persistent log file and span traces for errors.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::formatter::TickFormatter;

/// Log file written next to the settings file.
pub const LOG_FILE: &str = "christmas-adventures.log";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
///
/// Console and file share the same layout; only the console uses colors.
pub fn init(log_path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let file = Arc::new(file);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().event_format(TickFormatter).with_ansi(true))
        .with(
            fmt::layer()
                .event_format(TickFormatter)
                .with_ansi(false)
                .with_writer(move || FileWriter(file.clone())),
        )
        .with(ErrorLayer::default())
        .try_init()?;

    install_panic_hook();
    Ok(())
}

/// Logs panics (payload, location and a backtrace) before the default hook runs.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        let backtrace = std::backtrace::Backtrace::force_capture();

        error!(%payload, %location, "Panicked\n{backtrace}");
        default_hook(info);
    }));
}

/// Shared handle to the log file, handed out once per event.
struct FileWriter(Arc<File>);

impl std::io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        (&*self.0).flush()
    }
}
