//! Core data types: sizing constraints, breakpoints, cells and assignments.
//!
//! The JSON shape of [`LayoutCell`] and [`LayoutAssignment`] is the persisted
//! wire format, so field renames here are format changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Width and height in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Columns
    pub w: u16,
    /// Rows
    pub h: u16,
}

impl Size {
    /// Creates a size of `w` columns by `h` rows.
    pub const fn new(w: u16, h: u16) -> Self {
        Self { w, h }
    }
}

/// Sizing rules of one widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraints {
    /// Size used when the widget is first placed
    pub default: Size,
    /// Smallest size the widget can be resized to
    pub min: Size,
    /// Largest size, if bounded
    pub max: Option<Size>,
}

impl SizeConstraints {
    /// Unbounded constraints with the given default and minimum.
    pub const fn new(default: Size, min: Size) -> Self {
        Self {
            default,
            min,
            max: None,
        }
    }

    /// Adds an upper bound.
    pub const fn with_max(mut self, max: Size) -> Self {
        self.max = Some(max);
        self
    }

    /// Returns `true` when `min <= default <= max` holds on both axes and
    /// the minimum is non-zero.
    pub fn is_consistent(&self) -> bool {
        let min_ok = self.min.w >= 1
            && self.min.h >= 1
            && self.min.w <= self.default.w
            && self.min.h <= self.default.h;
        let max_ok = self
            .max
            .map_or(true, |m| self.default.w <= m.w && self.default.h <= m.h);
        min_ok && max_ok
    }
}

/// Named viewport class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointName {
    /// Large desktop
    Lg,
    /// Medium desktop / landscape tablet
    Md,
    /// Tablet
    Sm,
    /// Phone
    Xs,
    /// Narrow phone
    Xxs,
}

impl BreakpointName {
    /// All names, widest first.
    pub const ALL: [BreakpointName; 5] = [
        BreakpointName::Lg,
        BreakpointName::Md,
        BreakpointName::Sm,
        BreakpointName::Xs,
        BreakpointName::Xxs,
    ];

    /// Lowercase name as used in persisted JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            BreakpointName::Lg => "lg",
            BreakpointName::Md => "md",
            BreakpointName::Sm => "sm",
            BreakpointName::Xs => "xs",
            BreakpointName::Xxs => "xxs",
        }
    }
}

impl fmt::Display for BreakpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a [`BreakpointName`] from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBreakpointError(pub String);

impl fmt::Display for ParseBreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid breakpoint: {} (expected lg, md, sm, xs or xxs)",
            self.0
        )
    }
}

impl std::error::Error for ParseBreakpointError {}

impl FromStr for BreakpointName {
    type Err = ParseBreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BreakpointName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBreakpointError(s.to_string()))
    }
}

/// One breakpoint: column count and the minimum viewport width (pixels)
/// at which it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Viewport class
    pub name: BreakpointName,
    /// Grid columns
    pub cols: u16,
    /// Minimum viewport width in pixels
    pub min_width: u32,
}

/// Static breakpoint table, widest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    entries: Vec<Breakpoint>,
}

impl Breakpoints {
    /// Builds a table; entries are sorted widest first.
    pub fn new(mut entries: Vec<Breakpoint>) -> Self {
        entries.sort_by(|a, b| b.min_width.cmp(&a.min_width));
        Self { entries }
    }

    /// Looks up a breakpoint by name.
    pub fn get(&self, name: BreakpointName) -> Option<&Breakpoint> {
        self.entries.iter().find(|bp| bp.name == name)
    }

    /// Iterates widest first.
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    /// Picks the widest breakpoint whose threshold fits `width_px`.
    ///
    /// Falls back to the narrowest entry when nothing fits.
    pub fn for_width(&self, width_px: u32) -> Option<&Breakpoint> {
        self.entries
            .iter()
            .find(|bp| bp.min_width <= width_px)
            .or_else(|| self.entries.last())
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new(vec![
            Breakpoint {
                name: BreakpointName::Lg,
                cols: 12,
                min_width: 1200,
            },
            Breakpoint {
                name: BreakpointName::Md,
                cols: 10,
                min_width: 996,
            },
            Breakpoint {
                name: BreakpointName::Sm,
                cols: 6,
                min_width: 768,
            },
            Breakpoint {
                name: BreakpointName::Xs,
                cols: 4,
                min_width: 480,
            },
            Breakpoint {
                name: BreakpointName::Xxs,
                cols: 2,
                min_width: 0,
            },
        ])
    }
}

/// Placement of one widget in one breakpoint's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCell {
    /// Widget id
    #[serde(rename = "i")]
    pub widget_id: String,
    /// Column of the left edge
    pub x: u16,
    /// Row of the top edge
    pub y: u16,
    /// Width in columns
    pub w: u16,
    /// Height in rows
    pub h: u16,
    /// Minimum width
    pub min_w: u16,
    /// Minimum height
    pub min_h: u16,
    /// Maximum width, if bounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u16>,
    /// Maximum height, if bounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u16>,
}

impl LayoutCell {
    /// Column just past the right edge.
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    /// Row just past the bottom edge.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    /// Returns `true` if the two cells share at least one grid unit.
    pub fn overlaps(&self, other: &LayoutCell) -> bool {
        let cols = self.x < other.right() && other.x < self.right();
        let rows = self.y < other.bottom() && other.y < self.bottom();
        cols && rows
    }

    /// Returns `true` if `w`/`h` sit inside the cell's own min/max bounds.
    pub fn respects_bounds(&self) -> bool {
        self.w >= self.min_w
            && self.h >= self.min_h
            && self.max_w.map_or(true, |m| self.w <= m)
            && self.max_h.map_or(true, |m| self.h <= m)
    }
}

/// Breakpoint name → ordered cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutAssignment {
    grids: BTreeMap<BreakpointName, Vec<LayoutCell>>,
}

impl LayoutAssignment {
    /// Empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells for one breakpoint; empty when the breakpoint has none.
    pub fn cells(&self, name: BreakpointName) -> &[LayoutCell] {
        self.grids.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the cells of one breakpoint.
    pub fn set_cells(&mut self, name: BreakpointName, cells: Vec<LayoutCell>) {
        self.grids.insert(name, cells);
    }

    /// Finds the cell of `widget_id` in one breakpoint.
    pub fn cell(&self, name: BreakpointName, widget_id: &str) -> Option<&LayoutCell> {
        self.cells(name).iter().find(|c| c.widget_id == widget_id)
    }

    /// Drops the widget's cell from every breakpoint, leaving all other
    /// cells where they are. Returns the number of cells removed.
    pub fn remove_widget(&mut self, widget_id: &str) -> usize {
        let mut removed = 0;
        for cells in self.grids.values_mut() {
            let before = cells.len();
            cells.retain(|c| c.widget_id != widget_id);
            removed += before - cells.len();
        }
        removed
    }

    /// Keeps only cells whose id satisfies `keep`.
    pub fn retain_widgets(&mut self, mut keep: impl FnMut(&str) -> bool) {
        for cells in self.grids.values_mut() {
            cells.retain(|c| keep(&c.widget_id));
        }
    }

    /// Breakpoints that have an entry, in name order.
    pub fn breakpoints(&self) -> impl Iterator<Item = BreakpointName> + '_ {
        self.grids.keys().copied()
    }

    /// Returns `true` when no breakpoint holds any cell.
    pub fn is_empty(&self) -> bool {
        self.grids.values().all(Vec::is_empty)
    }
}

/// The durable snapshot: layouts plus the ordered active widget ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedDashboardState {
    /// Per-breakpoint placements
    pub layouts: LayoutAssignment,
    /// Mounted widget ids, in packing order
    pub active_widgets: Vec<String>,
}
