//! Where wdash keeps its files.
//!
//! `XDG_CONFIG_HOME` and `XDG_DATA_HOME` win on every platform. Without
//! them Linux uses `~/.config` and `~/.local/share`, macOS uses
//! `~/Library/Application Support` for both.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "widget-dashboard";

/// `widget-dashboard` under `$var`, or under the platform base directory.
fn app_dir(var: &str, platform_base: fn() -> Option<PathBuf>) -> PathBuf {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(platform_base)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[cfg(target_os = "macos")]
fn platform_config_base() -> Option<PathBuf> {
    dirs::config_dir()
}

#[cfg(not(target_os = "macos"))]
fn platform_config_base() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config"))
}

#[cfg(target_os = "macos")]
fn platform_data_base() -> Option<PathBuf> {
    dirs::data_dir()
}

#[cfg(not(target_os = "macos"))]
fn platform_data_base() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".local/share"))
}

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    app_dir("XDG_CONFIG_HOME", platform_config_base)
}

/// Default `config.toml` location.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory for saved dashboard state and the TUI log.
pub fn data_dir() -> PathBuf {
    app_dir("XDG_DATA_HOME", platform_data_base)
}

/// Replaces a leading `~` or `~/` with the home directory.
///
/// `~user` forms are left alone.
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// `create_dir_all`, then restricts the leaf to the owner (0700 on unix).
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::ffi::OsString;

    /// Sets or clears one env var and puts it back on drop.
    struct EnvVar {
        name: &'static str,
        saved: Option<OsString>,
    }

    impl EnvVar {
        fn set(name: &'static str, value: Option<&str>) -> Self {
            let saved = env::var_os(name);
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
            Self { name, saved }
        }
    }

    impl Drop for EnvVar {
        fn drop(&mut self) {
            match self.saved.take() {
                Some(v) => env::set_var(self.name, v),
                None => env::remove_var(self.name),
            }
        }
    }

    #[test]
    #[serial]
    fn xdg_vars_override_platform_dirs() {
        let _config = EnvVar::set("XDG_CONFIG_HOME", Some("/tmp/cfg"));
        let _data = EnvVar::set("XDG_DATA_HOME", Some("/tmp/share"));
        assert_eq!(
            config_path(),
            PathBuf::from("/tmp/cfg/widget-dashboard/config.toml")
        );
        assert_eq!(data_dir(), PathBuf::from("/tmp/share/widget-dashboard"));
    }

    #[test]
    #[serial]
    fn empty_xdg_var_is_ignored() {
        let _config = EnvVar::set("XDG_CONFIG_HOME", Some(""));
        let base = platform_config_base().expect("home directory");
        assert_eq!(config_dir(), base.join(APP_NAME));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    #[serial]
    fn linux_defaults_follow_home() {
        let _config = EnvVar::set("XDG_CONFIG_HOME", None);
        let _data = EnvVar::set("XDG_DATA_HOME", None);
        let home = dirs::home_dir().expect("home directory");
        assert_eq!(config_dir(), home.join(".config/widget-dashboard"));
        assert_eq!(data_dir(), home.join(".local/share/widget-dashboard"));
    }

    #[test]
    fn tilde_expansion() {
        let home = dirs::home_dir().expect("home directory");
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/state/wdash"), home.join("state/wdash"));
        assert_eq!(expand_tilde("~other/x"), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde("/var/lib/wdash"), PathBuf::from("/var/lib/wdash"));
        assert_eq!(expand_tilde("state"), PathBuf::from("state"));
    }

    #[test]
    fn ensure_dir_is_private_and_idempotent() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let dir = tmp.path().join("data/widget-dashboard");
        ensure_dir(&dir).expect("first call");
        ensure_dir(&dir).expect("second call");
        assert!(dir.is_dir());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dir).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }
}
