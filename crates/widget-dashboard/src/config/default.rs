//! `wdash config init`: the commented template and the code that writes it.

use std::fs;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::xdg;

/// Commented `config.toml`; parses to exactly `Config::default()`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# wdash configuration
#
# Written by `wdash config init`. Every value below is the compiled-in
# default, so deleting a line changes nothing. Check edits with
# `wdash config validate`.
#
# Default location: $XDG_CONFIG_HOME/widget-dashboard/config.toml

# --- [tui] terminal dashboard ---
[tui]

# How often the screen redraws, as a duration ("250ms", "1s", ...).
tick_rate = "250ms"

# Terminal rows per grid row.
# Widget heights are measured in grid rows; a widget 4 rows tall
# occupies 4 * row_height terminal lines.
row_height = 3

# Pixels assumed per terminal column when choosing a breakpoint.
# With the default of 10, a 120-column terminal counts as 1200px (lg).
# Breakpoints: lg >= 1200 (12 cols), md >= 996 (10), sm >= 768 (6),
#              xs >= 480 (4), xxs (2)
column_px = 10

# Pull widgets up to close gaps after moving, resizing or removing one
# in edit mode.
auto_compact = true

# --- [dashboard] first launch ---
[dashboard]

# Widgets shown on first launch, in order.
# Available: "claims", "earnings", "firms", "weather", "calendar",
#            "messages", "compliance", "tasks"
# Once you add or remove a widget the saved arrangement takes over.
default_widgets = ["claims", "earnings", "weather", "tasks"]

# --- [storage] saved arrangement ---
[storage]

# Directory for the saved arrangement.
# Empty string means $XDG_DATA_HOME/widget-dashboard.
# A leading ~ means your home directory.
dir = ""

# --- [logging] ---
[logging]

# One of "error", "warn", "info", "debug", "trace".
# WDASH_LOG (EnvFilter syntax) takes precedence when set.
level = "info"

# Log file used while the dashboard is on screen.
# Empty string means wdash.log inside the data directory.
# Other commands log to stderr.
file = ""
"#;

/// Writes [`DEFAULT_CONFIG_TEMPLATE`] to `path`.
///
/// An existing file is an error unless `force` is set, in which case it is
/// renamed to `config.toml.backup` first.
pub fn create_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(path, &backup_path).map_err(|e| ConfigError::Write {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!(backup = %backup_path.display(), "Moved existing config aside");
    }

    write_default_config(path)?;
    tracing::info!(path = %path.display(), "Wrote default config");
    Ok(())
}

/// Parent dirs are created; the file is owner-only on unix.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Config;
    use crate::widgets::WidgetRegistry;

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn template_validates_without_warnings() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        let warnings = parsed
            .validate(&WidgetRegistry::builtin())
            .expect("template is valid");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn template_lists_every_builtin_widget() {
        for descriptor in WidgetRegistry::builtin().list() {
            let quoted = format!("\"{}\"", descriptor.id);
            assert!(
                DEFAULT_CONFIG_TEMPLATE.contains(&quoted),
                "{} missing from the available list",
                descriptor.id
            );
        }
    }

    #[test]
    fn creates_file_and_parent_dirs() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("nested/widget-dashboard/config.toml");
        create_default_config(&path, false).expect("should succeed");
        let content = fs::read_to_string(&path).expect("should read");
        assert_eq!(content, DEFAULT_CONFIG_TEMPLATE);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path)
                .expect("failed to read metadata")
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn existing_file_without_force_is_rejected() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "# mine").expect("write");
        let err = create_default_config(&path, false).expect_err("should refuse");
        assert!(matches!(err, ConfigError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "# mine");
    }

    #[test]
    fn force_backs_up_existing_file() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "# mine").expect("write");
        create_default_config(&path, true).expect("should overwrite");
        let backup = tmp.path().join("config.toml.backup");
        assert_eq!(fs::read_to_string(backup).expect("backup"), "# mine");
        assert_eq!(
            fs::read_to_string(&path).expect("read"),
            DEFAULT_CONFIG_TEMPLATE
        );
    }
}
