//! Widget Dashboard library
//!
//! A dashboard of independent panels ("widgets") on a responsive grid that
//! the user can rearrange, resize, add to and remove from. The arrangement
//! is saved between runs and one failing widget never takes the others
//! down.
//!
//! Layout math and persistence live in the `dashboard-layout` crate. This
//! crate adds the widget catalog, the controller that owns dashboard state,
//! per-widget fault isolation, configuration, logging and the terminal UI.

/// Configuration loading, defaults and XDG path resolution.
pub mod config;

/// Dashboard state: controller, edit mode and widget hosts.
pub mod grid;

/// Tracing subscriber setup.
pub mod logging;

/// Terminal user interface.
pub mod tui;

/// Widget trait, built-in panels and the registry.
pub mod widgets;
