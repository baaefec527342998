//! Widget Dashboard - CLI entry point
//!
//! Without a subcommand `wdash` opens the terminal dashboard. The other
//! subcommands inspect and change the saved arrangement from scripts.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dashboard_layout::{BreakpointName, FileStore, LayoutCell, LayoutStore, MemoryStore};
use widget_dashboard::config::{default, loader::ConfigLoader, schema::Config, xdg};
use widget_dashboard::grid::{GridController, Mutation};
use widget_dashboard::logging;
use widget_dashboard::tui::app::App;
use widget_dashboard::widgets::WidgetRegistry;

/// Rearrangeable widget dashboard for the terminal
#[derive(Parser)]
#[command(name = "wdash")]
#[command(version, about = "Rearrangeable widget dashboard for the terminal")]
struct Cli {
    /// Configuration file (defaults to the XDG location)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep changes in memory instead of saving them
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands for the wdash CLI
#[derive(Subcommand)]
enum Commands {
    /// Open the terminal dashboard (default)
    Tui,

    /// List the widget catalog; active widgets are marked with *
    Widgets,

    /// Inspect or reset the saved arrangement
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Add a widget; every breakpoint is repacked
    Add {
        /// Widget id (see `wdash widgets`)
        id: String,
    },

    /// Remove a widget; other widgets keep their places
    Remove {
        /// Widget id
        id: String,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `layout` subcommand.
#[derive(Subcommand)]
enum LayoutAction {
    /// Print cell placements
    Show {
        /// Only this breakpoint (lg, md, sm, xs, xxs)
        #[arg(long)]
        breakpoint: Option<BreakpointName>,
        /// Print JSON in the saved format
        #[arg(long)]
        json: bool,
    },
    /// Forget the saved arrangement and return to the default widgets
    Reset,
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let ephemeral = cli.ephemeral;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Config { action } => run_config_command(action, config_path),
        Commands::Tui => with_config(config_path, |config| run_tui(config, ephemeral)),
        Commands::Widgets => with_grid(config_path, ephemeral, |grid| {
            print_widgets(grid);
            ExitCode::SUCCESS
        }),
        Commands::Layout {
            action: LayoutAction::Show { breakpoint, json },
        } => with_grid(config_path, ephemeral, |grid| {
            show_layout(grid, breakpoint, json)
        }),
        Commands::Layout {
            action: LayoutAction::Reset,
        } => with_grid(config_path, ephemeral, |grid| {
            let outcome = grid.reset();
            report(grid, outcome, "Dashboard reset to defaults")
        }),
        Commands::Add { id } => with_grid(config_path, ephemeral, |grid| run_add(grid, &id)),
        Commands::Remove { id } => {
            with_grid(config_path, ephemeral, |grid| run_remove(grid, &id))
        }
    }
}

/// Loads configuration, printing the error and failing if it cannot be read.
fn with_config(path: Option<&Path>, run: impl FnOnce(Config) -> ExitCode) -> ExitCode {
    match ConfigLoader::load(path) {
        Ok(config) => run(config),
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and the saved dashboard, logging to stderr.
fn with_grid(
    path: Option<&Path>,
    ephemeral: bool,
    run: impl FnOnce(&mut GridController) -> ExitCode,
) -> ExitCode {
    with_config(path, |config| {
        logging::init_stderr(config.logging.level);
        let mut grid = open_grid(&config, ephemeral);
        grid.initialize();
        run(&mut grid)
    })
}

fn open_grid(config: &Config, ephemeral: bool) -> GridController {
    let store = if ephemeral {
        LayoutStore::new(MemoryStore::new())
    } else {
        LayoutStore::new(FileStore::new(config.storage.resolve_dir()))
    };
    GridController::new(WidgetRegistry::builtin(), store)
        .with_default_widgets(config.dashboard.default_widgets.clone())
}

fn run_tui(config: Config, ephemeral: bool) -> ExitCode {
    let registry = WidgetRegistry::builtin();
    let (tick_rate, warnings) = match config
        .validate(&registry)
        .and_then(|warnings| Ok((config.tui.tick_rate()?, warnings)))
    {
        Ok(valid) => valid,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_file = config.logging.resolve_file();
    if let Err(e) = logging::init_file(config.logging.level, &log_file) {
        eprintln!("Warning: cannot log to {}: {e}", log_file.display());
    }
    for warning in warnings {
        tracing::warn!("{warning}");
    }

    let mut grid = open_grid(&config, ephemeral);
    grid.initialize();
    let width = crossterm::terminal::size().map_or(80, |(w, _)| w);
    let mut app = App::new(grid, config.tui, width);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("TUI error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = rt.block_on(app.run(tick_rate)) {
        eprintln!("TUI error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_widgets(grid: &GridController) {
    for descriptor in grid.registry().list() {
        let marker = if grid.is_active(descriptor.id) { '*' } else { ' ' };
        let sizing = descriptor.sizing;
        let mut bounds = format!("min {}x{}", sizing.min.w, sizing.min.h);
        if let Some(max) = sizing.max {
            bounds.push_str(&format!(", max {}x{}", max.w, max.h));
        }
        println!(
            "{marker} {:<12} {:<12} {}x{} ({bounds})",
            descriptor.id, descriptor.title, sizing.default.w, sizing.default.h
        );
    }
}

fn show_layout(grid: &GridController, breakpoint: Option<BreakpointName>, json: bool) -> ExitCode {
    let layouts = grid.layouts();
    if json {
        let encoded = match breakpoint {
            Some(name) => serde_json::to_string_pretty(layouts.cells(name)),
            None => serde_json::to_string_pretty(layouts),
        };
        return match encoded {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: failed to encode layout: {e}");
                ExitCode::FAILURE
            }
        };
    }

    for bp in grid.breakpoints().iter() {
        if breakpoint.is_some_and(|name| name != bp.name) {
            continue;
        }
        println!("{} ({} cols)", bp.name, bp.cols);
        for cell in layouts.cells(bp.name) {
            println!("  {}", format_cell(cell));
        }
    }
    ExitCode::SUCCESS
}

fn format_cell(cell: &LayoutCell) -> String {
    format!(
        "{:<12} x={:<3} y={:<3} w={:<3} h={}",
        cell.widget_id, cell.x, cell.y, cell.w, cell.h
    )
}

fn run_add(grid: &mut GridController, id: &str) -> ExitCode {
    if !grid.registry().contains(id) {
        eprintln!("Error: unknown widget '{id}' (see `wdash widgets`)");
        return ExitCode::FAILURE;
    }
    match grid.add_widget(id) {
        Mutation::NoOp => {
            println!("{id} is already on the dashboard");
            ExitCode::SUCCESS
        }
        outcome => report(grid, outcome, &format!("Added {id}")),
    }
}

fn run_remove(grid: &mut GridController, id: &str) -> ExitCode {
    match grid.remove_widget(id) {
        Mutation::NoOp => {
            println!("{id} is not on the dashboard");
            ExitCode::SUCCESS
        }
        outcome => report(grid, outcome, &format!("Removed {id}")),
    }
}

/// Prints `done` on success, otherwise the notices the controller raised.
fn report(grid: &GridController, outcome: Mutation, done: &str) -> ExitCode {
    match outcome {
        Mutation::Committed | Mutation::NoOp => {
            println!("{done}");
            ExitCode::SUCCESS
        }
        Mutation::CommittedUnsaved | Mutation::Failed => {
            for notice in grid.notices() {
                eprintln!("Error: {}", notice.message);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_config_command(action: ConfigAction, path: Option<&Path>) -> ExitCode {
    let config_path = path.map_or_else(xdg::config_path, Path::to_path_buf);
    let result = match action {
        ConfigAction::Init { force } => {
            default::create_default_config(&config_path, force).map(|()| {
                println!("Created configuration at {}", config_path.display());
            })
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigAction::Validate => ConfigLoader::load(path)
            .and_then(|config| config.validate(&WidgetRegistry::builtin()))
            .map(|warnings| {
                for warning in warnings {
                    eprintln!("Warning: {warning}");
                }
                println!("Configuration is valid");
            }),
    };
    if let Err(e) = result {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["wdash"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["wdash", "add", "firms", "--ephemeral", "--config", "x.toml"])
            .expect("parses");
        assert!(cli.ephemeral);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Some(Commands::Add { ref id }) if id == "firms"));
    }

    #[test]
    fn layout_show_parses_breakpoint() {
        let cli = Cli::try_parse_from(["wdash", "layout", "show", "--breakpoint", "XS", "--json"])
            .expect("parses");
        match cli.command {
            Some(Commands::Layout {
                action: LayoutAction::Show { breakpoint, json },
            }) => {
                assert_eq!(breakpoint, Some(BreakpointName::Xs));
                assert!(json);
            }
            _ => panic!("unexpected command variant"),
        }
        assert!(Cli::try_parse_from(["wdash", "layout", "show", "--breakpoint", "xl"]).is_err());
    }

    #[test]
    fn format_cell_lists_geometry() {
        let cell = LayoutCell {
            widget_id: "tasks".to_string(),
            x: 3,
            y: 4,
            w: 6,
            h: 5,
            min_w: 4,
            min_h: 3,
            max_w: None,
            max_h: None,
        };
        let line = format_cell(&cell);
        assert!(line.starts_with("tasks"));
        assert!(line.contains("x=3") && line.contains("y=4"));
        assert!(line.ends_with("h=5"));
    }
}
