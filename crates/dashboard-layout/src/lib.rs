//! Responsive grid layout engine for widget dashboards
//!
//! This crate owns the layout half of a dashboard: the cell and breakpoint
//! data model, deterministic greedy-wrap placement, and persistence of the
//! arrangement through a pluggable key-value store.
//!
//! It knows nothing about how widgets render. Sizing rules come in through
//! the [`Catalog`] trait and placements go out as [`LayoutAssignment`]s.
//!
//! # Examples
//!
//! ```
//! use dashboard_layout::{generate, BreakpointName, Breakpoints, Size, SizeConstraints};
//!
//! let sizing = |id: &str| match id {
//!     "a" | "b" => Some(SizeConstraints::new(Size::new(4, 4), Size::new(3, 3))),
//!     "c" => Some(SizeConstraints::new(Size::new(6, 4), Size::new(4, 3))),
//!     _ => None,
//! };
//! let active = vec!["a".to_string(), "b".to_string(), "c".to_string()];
//! let layouts = generate(&active, &Breakpoints::default(), &sizing).unwrap();
//!
//! let c = layouts.cell(BreakpointName::Lg, "c").unwrap();
//! assert_eq!((c.x, c.y, c.w, c.h), (0, 4, 6, 4));
//! ```

#![warn(missing_docs)]

mod engine;
mod error;
mod store;
mod types;

pub use engine::{append, effective_height, effective_width, generate, Catalog};
pub use error::{LayoutError, PersistError, StoreError};
pub use store::{
    FileStore, LayoutStore, MemoryStore, PersistenceProvider, ACTIVE_WIDGETS_KEY, LAYOUTS_KEY,
};
pub use types::{
    Breakpoint, BreakpointName, Breakpoints, LayoutAssignment, LayoutCell, ParseBreakpointError,
    PersistedDashboardState, Size, SizeConstraints,
};
