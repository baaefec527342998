//! Logging initialization for wdash.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `WDASH_LOG` environment variable, falling back to the configured level.
//! The `dashboard-layout` crate logs through `log`; those records reach the
//! same subscriber through its `tracing-log` bridge.
//!
//! # Usage
//!
//! ```bash
//! # Debug level
//! WDASH_LOG=debug wdash layout show
//!
//! # Module-specific filtering
//! WDASH_LOG=widget_dashboard::grid=debug,warn wdash
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogLevel;
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const ENV_VAR: &str = "WDASH_LOG";

/// Filter from `WDASH_LOG`, or `fallback` when unset or invalid.
pub fn filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback.as_str()))
}

/// Logs to stderr. Used by one-shot commands.
pub fn init_stderr(level: LogLevel) {
    // A subscriber may already be installed (tests, repeated init).
    let _ = fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Logs to `path`, appending. Used while the TUI owns the terminal.
pub fn init_file(level: LogLevel, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = fmt()
        .with_env_filter(filter(level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn env_filter_parses_valid_directives() {
        for d in ["info", "debug", "warn", "error", "trace"] {
            assert!(EnvFilter::try_new(d).is_ok(), "failed to parse directive: {d}");
        }
        assert!(EnvFilter::try_new("widget_dashboard::grid=debug,warn").is_ok());
    }

    #[test]
    #[serial]
    fn filter_prefers_env_var() {
        std::env::set_var(ENV_VAR, "trace");
        let from_env = filter(LogLevel::Error).to_string();
        std::env::remove_var(ENV_VAR);
        assert_eq!(from_env, "trace");
        assert_eq!(filter(LogLevel::Warn).to_string(), "warn");
    }

    #[test]
    fn init_file_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("logs/wdash.log");
        init_file(LogLevel::Info, &path).expect("log file");
        assert!(path.exists());
    }
}
