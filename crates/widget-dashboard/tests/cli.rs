//! Integration tests for the `wdash` command line.
//!
//! Each test points XDG_CONFIG_HOME and XDG_DATA_HOME at its own temp dir
//! so the real binary reads and writes nothing outside it.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WDASH_BIN: &str = env!("CARGO_BIN_EXE_wdash");

/// Isolated home for one test.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(WDASH_BIN);
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env_remove("WDASH_LOG");
        cmd
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data/widget-dashboard")
    }

    fn config_file(&self) -> PathBuf {
        self.dir.path().join("config/widget-dashboard/config.toml")
    }

    fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("failed to write config");
        path
    }

    /// `layout show --json --breakpoint <bp>` parsed.
    fn cells(&self, bp: &str) -> Vec<Value> {
        let output = self
            .cmd()
            .args(["layout", "show", "--json", "--breakpoint", bp])
            .output()
            .expect("failed to run wdash");
        assert!(output.status.success());
        let value: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
        value.as_array().expect("array of cells").clone()
    }
}

fn cell<'a>(cells: &'a [Value], id: &str) -> Option<&'a Value> {
    cells.iter().find(|c| c["i"] == id)
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).map_or(true, |mut entries| entries.next().is_none())
}

// -- config ---------------------------------------------------------------

#[test]
fn config_path_honours_xdg_config_home() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            sandbox.config_file().to_string_lossy().to_string(),
        ));
}

#[test]
fn config_init_writes_template_once() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));
    assert!(sandbox.config_file().exists());

    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    sandbox
        .cmd()
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(sandbox
        .config_file()
        .with_extension("toml.backup")
        .exists());

    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_warns_about_unknown_default_widgets() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_config(
        "custom.toml",
        "[dashboard]\ndefault_widgets = [\"claims\", \"stocks\"]\n",
    );
    sandbox
        .cmd()
        .args(["--config", path.to_str().expect("utf-8 path")])
        .args(["config", "validate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stocks"))
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_rejects_bad_values() {
    let sandbox = Sandbox::new();
    let path = sandbox.write_config("bad.toml", "[tui]\nrow_height = 0\n");
    sandbox
        .cmd()
        .args(["--config", path.to_str().expect("utf-8 path")])
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tui.row_height"));

    let broken = sandbox.write_config("broken.toml", "[tui\n");
    sandbox
        .cmd()
        .args(["--config", broken.to_str().expect("utf-8 path"), "widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

// -- catalog and layout -----------------------------------------------------

#[test]
fn widgets_marks_default_active_set() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("widgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("* claims"))
        .stdout(predicate::str::contains("* tasks"))
        .stdout(predicate::str::contains("  firms"))
        .stdout(predicate::str::contains("max 6x4"));
}

#[test]
fn reading_defaults_writes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["layout", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lg (12 cols)"))
        .stdout(predicate::str::contains("xxs (2 cols)"))
        .stdout(predicate::str::contains("claims"));
    assert!(is_empty_dir(&sandbox.data_dir()));
}

#[test]
fn layout_show_filters_by_breakpoint() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["layout", "show", "--breakpoint", "sm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sm (6 cols)"))
        .stdout(predicate::str::contains("lg (").not());

    sandbox
        .cmd()
        .args(["layout", "show", "--breakpoint", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid breakpoint"));
}

#[test]
fn add_persists_both_keys() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "firms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added firms"));

    let data = sandbox.data_dir();
    assert!(data.join("dashboard-layouts.json").exists());
    let active: Vec<String> = serde_json::from_str(
        &fs::read_to_string(data.join("dashboard-active-widgets.json")).expect("active widgets"),
    )
    .expect("JSON array");
    assert_eq!(active, ["claims", "earnings", "weather", "tasks", "firms"]);

    let lg = sandbox.cells("lg");
    assert!(cell(&lg, "firms").is_some());

    sandbox
        .cmd()
        .args(["add", "firms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already on the dashboard"));
}

#[test]
fn remove_leaves_other_cells_in_place() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["add", "calendar"]).assert().success();
    let before = sandbox.cells("lg");

    sandbox
        .cmd()
        .args(["remove", "weather"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed weather"));

    let after = sandbox.cells("lg");
    assert!(cell(&after, "weather").is_none());
    assert_eq!(after.len(), before.len() - 1);
    for c in &after {
        let id = c["i"].as_str().expect("id");
        assert_eq!(Some(c), cell(&before, id), "{id} moved");
    }

    sandbox
        .cmd()
        .args(["remove", "weather"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not on the dashboard"));
}

#[test]
fn unknown_widget_is_rejected_without_writing() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "stocks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown widget 'stocks'"));
    assert!(is_empty_dir(&sandbox.data_dir()));
}

#[test]
fn reset_clears_saved_state() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["add", "messages"]).assert().success();
    sandbox
        .cmd()
        .args(["layout", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset to defaults"));

    assert!(!sandbox.data_dir().join("dashboard-layouts.json").exists());
    assert!(!sandbox
        .data_dir()
        .join("dashboard-active-widgets.json")
        .exists());
    sandbox
        .cmd()
        .arg("widgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("  messages"));
}

#[test]
fn ephemeral_changes_are_not_saved() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--ephemeral", "add", "firms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added firms"));
    assert!(is_empty_dir(&sandbox.data_dir()));
}

#[test]
fn storage_dir_from_config_is_used() {
    let sandbox = Sandbox::new();
    let store = sandbox.dir.path().join("elsewhere");
    let path = sandbox.write_config(
        "storage.toml",
        &format!("[storage]\ndir = {:?}\n", store.to_string_lossy()),
    );
    sandbox
        .cmd()
        .args(["--config", path.to_str().expect("utf-8 path")])
        .args(["add", "compliance"])
        .assert()
        .success();
    assert!(store.join("dashboard-layouts.json").exists());
    assert!(is_empty_dir(&sandbox.data_dir()));
}

#[test]
fn corrupt_saved_layout_falls_back_to_generated_cells() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.data_dir()).expect("data dir");
    fs::write(sandbox.data_dir().join("dashboard-layouts.json"), "{not json").expect("write");
    fs::write(
        sandbox.data_dir().join("dashboard-active-widgets.json"),
        r#"["tasks", "stocks", "tasks"]"#,
    )
    .expect("write");

    let lg = sandbox.cells("lg");
    assert_eq!(lg.len(), 1);
    let tasks = cell(&lg, "tasks").expect("tasks placed");
    assert_eq!((tasks["x"].as_u64(), tasks["y"].as_u64()), (Some(0), Some(0)));
}
