//! Greedy-wrap layout generation.
//!
//! Widgets are placed left to right in active-set order. When the next
//! widget would overflow the column count the cursor wraps to column 0 and
//! moves down by the wrapping widget's own height (not the row maximum).
//! A placement that would still collide with an earlier, taller cell is
//! pushed down below it, so output never overlaps.
//!
//! Generation is pure: identical inputs always yield identical output.

use std::collections::HashSet;

use crate::error::LayoutError;
use crate::types::{
    Breakpoint, BreakpointName, Breakpoints, LayoutAssignment, LayoutCell, SizeConstraints,
};

/// Source of sizing rules for widget ids.
pub trait Catalog {
    /// Sizing rules for `widget_id`, or `None` if the id is unknown.
    fn constraints(&self, widget_id: &str) -> Option<SizeConstraints>;
}

impl<F> Catalog for F
where
    F: Fn(&str) -> Option<SizeConstraints>,
{
    fn constraints(&self, widget_id: &str) -> Option<SizeConstraints> {
        self(widget_id)
    }
}

/// Builds a fresh assignment for every breakpoint.
///
/// # Errors
///
/// * `LayoutError::UnknownWidget` - an id has no catalog entry
/// * `LayoutError::DuplicateWidget` - an id appears twice
/// * `LayoutError::ZeroColumns` - a breakpoint has no columns
pub fn generate<C: Catalog + ?Sized>(
    active: &[String],
    breakpoints: &Breakpoints,
    catalog: &C,
) -> Result<LayoutAssignment, LayoutError> {
    let sized = resolve(active, catalog)?;
    let mut layouts = LayoutAssignment::new();
    for bp in breakpoints.iter() {
        layouts.set_cells(bp.name, pack(&sized, bp, 0, &[])?);
    }
    Ok(layouts)
}

/// Places `missing` ids below the existing cells of one breakpoint.
///
/// Used when a stored assignment lacks cells for some active widgets.
/// Existing cells are returned unchanged, followed by the new ones.
pub fn append<C: Catalog + ?Sized>(
    existing: &[LayoutCell],
    missing: &[String],
    bp: &Breakpoint,
    catalog: &C,
) -> Result<Vec<LayoutCell>, LayoutError> {
    let sized = resolve(missing, catalog)?;
    let floor = existing.iter().map(LayoutCell::bottom).max().unwrap_or(0);
    let mut cells = existing.to_vec();
    cells.extend(pack(&sized, bp, floor, existing)?);
    Ok(cells)
}

/// Width a widget takes on `bp` before it is placed.
pub fn effective_width(bp: &Breakpoint, sizing: &SizeConstraints) -> u16 {
    let cols = bp.cols;
    let base = match bp.name {
        BreakpointName::Xs | BreakpointName::Xxs => cols,
        BreakpointName::Sm => sizing.default.w.min((cols / 2).max(1)),
        BreakpointName::Lg | BreakpointName::Md => sizing.default.w.min(cols),
    };
    let mut w = base.max(sizing.min.w);
    if let Some(max) = sizing.max {
        w = w.min(max.w);
    }
    // Column count wins over a minimum the grid cannot fit.
    w.min(cols).max(1)
}

/// Height a widget takes on `bp` before it is placed.
pub fn effective_height(bp: &Breakpoint, sizing: &SizeConstraints) -> u16 {
    let floor = match bp.name {
        BreakpointName::Xs | BreakpointName::Xxs => 4,
        BreakpointName::Sm => 3,
        BreakpointName::Lg | BreakpointName::Md => 0,
    };
    let mut h = sizing.default.h.max(floor).max(sizing.min.h);
    if let Some(max) = sizing.max {
        h = h.min(max.h);
    }
    h.max(1)
}

fn resolve<'a, C: Catalog + ?Sized>(
    ids: &'a [String],
    catalog: &C,
) -> Result<Vec<(&'a str, SizeConstraints)>, LayoutError> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .map(|id| {
            if !seen.insert(id.as_str()) {
                return Err(LayoutError::DuplicateWidget(id.clone()));
            }
            catalog
                .constraints(id)
                .map(|sizing| (id.as_str(), sizing))
                .ok_or_else(|| LayoutError::UnknownWidget(id.clone()))
        })
        .collect()
}

fn pack(
    sized: &[(&str, SizeConstraints)],
    bp: &Breakpoint,
    start_y: u16,
    obstacles: &[LayoutCell],
) -> Result<Vec<LayoutCell>, LayoutError> {
    if bp.cols == 0 {
        return Err(LayoutError::ZeroColumns(bp.name));
    }
    let mut cursor_x: u16 = 0;
    let mut cursor_y: u16 = start_y;
    let mut placed: Vec<LayoutCell> = Vec::with_capacity(sized.len());

    for (id, sizing) in sized {
        let w = effective_width(bp, sizing);
        let h = effective_height(bp, sizing);
        if cursor_x + w > bp.cols {
            cursor_x = 0;
            cursor_y = cursor_y.saturating_add(h);
        }
        let mut cell = LayoutCell {
            widget_id: (*id).to_string(),
            x: cursor_x,
            y: cursor_y,
            w,
            h,
            min_w: sizing.min.w.min(bp.cols),
            min_h: sizing.min.h,
            max_w: sizing.max.map(|m| m.w),
            max_h: sizing.max.map(|m| m.h),
        };
        while let Some(bottom) = placed
            .iter()
            .chain(obstacles)
            .filter(|other| other.overlaps(&cell))
            .map(LayoutCell::bottom)
            .max()
        {
            cell.y = bottom;
        }
        cursor_x += w;
        placed.push(cell);
    }
    Ok(placed)
}
