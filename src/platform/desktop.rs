//! Desktop platform implementation.

use std::path::PathBuf;
use std::time::Duration;

/// Sleeps until the next tick. Spins for accuracy only while the window has focus.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

/// Directory the log file is written to: next to the settings file, or the working directory.
pub fn log_dir(settings_path: &std::path::Path) -> PathBuf {
    settings_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
