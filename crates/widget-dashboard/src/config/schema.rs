//! Typed view of `config.toml`.
//!
//! Every section is `#[serde(default)]`: a missing key takes its compiled
//! default and unknown keys are ignored. `tick_rate` stays a string until
//! [`TuiConfig::tick_rate`] parses it with `humantime`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::widgets::{WidgetKind, WidgetRegistry};

/// The whole file: `[tui]`, `[dashboard]`, `[storage]`, `[logging]`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terminal UI behavior.
    pub tui: TuiConfig,
    /// First-run dashboard contents.
    pub dashboard: DashboardConfig,
    /// Where dashboard state is saved.
    pub storage: StorageConfig,
    /// Log verbosity and destination.
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks values that parse but cannot be used.
    ///
    /// Returns warnings for problems that are tolerated, such as unknown
    /// widget ids in `dashboard.default_widgets` (those are skipped at
    /// startup).
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` for an unparseable tick rate or a zero
    /// row height or column width.
    pub fn validate(&self, registry: &WidgetRegistry) -> Result<Vec<String>, ConfigError> {
        self.tui.tick_rate()?;
        if self.tui.row_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tui.row_height",
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.tui.column_px == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tui.column_px",
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(self
            .dashboard
            .default_widgets
            .iter()
            .filter(|id| !registry.contains(id))
            .map(|id| format!("dashboard.default_widgets: unknown widget {id:?} will be skipped"))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// Terminal UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Redraw interval as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
    /// Terminal rows per grid row.
    pub row_height: u16,
    /// Pixels assumed per terminal column when picking a breakpoint.
    pub column_px: u32,
    /// Pull cells up to close gaps after a move, resize or removal.
    pub auto_compact: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
            row_height: 3,
            column_px: 10,
            auto_compact: true,
        }
    }
}

impl TuiConfig {
    /// Parsed `tick_rate`.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        let rate = humantime::parse_duration(&self.tick_rate).map_err(|e| {
            ConfigError::InvalidValue {
                field: "tui.tick_rate",
                value: self.tick_rate.clone(),
                message: e.to_string(),
            }
        })?;
        if rate.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "tui.tick_rate",
                value: self.tick_rate.clone(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(rate)
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// First-run dashboard contents.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Widgets shown when nothing has been saved yet, in order.
    pub default_widgets: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_widgets: WidgetKind::DEFAULT_ACTIVE
                .iter()
                .map(|k| k.id().to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Dashboard state location.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for saved state. Empty means the XDG data directory.
    /// Tilde (~) is expanded.
    pub dir: String,
}

impl StorageConfig {
    /// Resolved state directory.
    pub fn resolve_dir(&self) -> PathBuf {
        if self.dir.is_empty() {
            xdg::data_dir()
        } else {
            xdg::expand_tilde(&self.dir)
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration. `WDASH_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging verbosity.
    pub level: LogLevel,
    /// Log file for the TUI. Empty means `wdash.log` in the data directory.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Resolved TUI log file.
    pub fn resolve_file(&self) -> PathBuf {
        if self.file.is_empty() {
            xdg::data_dir().join("wdash.log")
        } else {
            xdg::expand_tilde(&self.file)
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
