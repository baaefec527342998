//! Keyboard-driven interactive grid.
//!
//! Maps layout cells onto terminal rectangles for one breakpoint and turns
//! move/resize requests into complete cell lists. Results never touch the
//! controller directly; the app hands them to
//! [`GridController::on_interactive_layout_change`](crate::grid::GridController::on_interactive_layout_change).
//!
//! After every change no two cells overlap: cells hit by the edited cell are
//! pushed down, and with `auto_compact` every cell is then pulled up as far
//! as it can go.

use dashboard_layout::{Breakpoint, LayoutCell};
use ratatui::layout::Rect;

/// Geometry and collision rules for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveGrid {
    breakpoint: Breakpoint,
    row_height: u16,
    auto_compact: bool,
}

impl InteractiveGrid {
    /// Grid for `breakpoint` with `row_height` terminal lines per grid row.
    pub fn new(breakpoint: Breakpoint, row_height: u16, auto_compact: bool) -> Self {
        Self {
            breakpoint,
            row_height: row_height.max(1),
            auto_compact,
        }
    }

    /// The breakpoint this grid lays out.
    pub fn breakpoint(&self) -> &Breakpoint {
        &self.breakpoint
    }

    /// Screen rectangle of `cell` inside `area`, scrolled by `scroll` lines.
    ///
    /// Columns split `area` proportionally. Returns `None` when the cell is
    /// scrolled out of view or has no width on screen.
    pub fn cell_rect(&self, cell: &LayoutCell, area: Rect, scroll: u16) -> Option<Rect> {
        let cols = u32::from(self.breakpoint.cols.max(1));
        let col_x = |col: u16| -> u16 {
            let col = u32::from(col).min(cols);
            // col <= cols, so the quotient never exceeds area.width.
            (u32::from(area.width) * col / cols) as u16
        };
        let left = col_x(cell.x);
        let right = col_x(cell.right());
        if right <= left {
            return None;
        }

        let top = i64::from(cell.y) * i64::from(self.row_height) - i64::from(scroll);
        let bottom = top + i64::from(cell.h) * i64::from(self.row_height);
        let visible_top = top.max(0);
        let visible_bottom = bottom.min(i64::from(area.height));
        if visible_bottom <= visible_top {
            return None;
        }

        Some(Rect::new(
            area.x + left,
            area.y + visible_top as u16,
            right - left,
            (visible_bottom - visible_top) as u16,
        ))
    }

    /// Terminal lines needed to show every cell.
    pub fn content_height(&self, cells: &[LayoutCell]) -> u16 {
        cells
            .iter()
            .map(LayoutCell::bottom)
            .max()
            .unwrap_or(0)
            .saturating_mul(self.row_height)
    }

    /// Moves `widget_id` by whole grid units, keeping it inside the columns.
    ///
    /// Returns the new cell list, or `None` when nothing would change.
    pub fn move_cell(
        &self,
        cells: &[LayoutCell],
        widget_id: &str,
        dx: i16,
        dy: i16,
    ) -> Option<Vec<LayoutCell>> {
        let cols = self.breakpoint.cols;
        self.edit(cells, widget_id, |cell| {
            let max_x = cols.saturating_sub(cell.w);
            cell.x = shift(cell.x, dx).min(max_x);
            cell.y = shift(cell.y, dy);
        })
    }

    /// Grows or shrinks `widget_id` within its min/max and the columns.
    ///
    /// Returns the new cell list, or `None` when nothing would change.
    pub fn resize_cell(
        &self,
        cells: &[LayoutCell],
        widget_id: &str,
        dw: i16,
        dh: i16,
    ) -> Option<Vec<LayoutCell>> {
        let cols = self.breakpoint.cols;
        self.edit(cells, widget_id, |cell| {
            let min_w = cell.min_w.max(1);
            let max_w = cell
                .max_w
                .unwrap_or(cols)
                .min(cols.saturating_sub(cell.x))
                .max(min_w);
            cell.w = shift(cell.w, dw).clamp(min_w, max_w);

            let min_h = cell.min_h.max(1);
            let max_h = cell.max_h.unwrap_or(u16::MAX).max(min_h);
            cell.h = shift(cell.h, dh).clamp(min_h, max_h);
        })
    }

    /// Pulls every cell up as far as it goes without overlapping.
    ///
    /// Returns `None` when the cells are already compact.
    pub fn compact(&self, cells: &[LayoutCell]) -> Option<Vec<LayoutCell>> {
        let compacted = compact(cells, None);
        (compacted != cells).then_some(compacted)
    }

    fn edit(
        &self,
        cells: &[LayoutCell],
        widget_id: &str,
        change: impl FnOnce(&mut LayoutCell),
    ) -> Option<Vec<LayoutCell>> {
        let index = cells.iter().position(|c| c.widget_id == widget_id)?;
        let mut next = cells.to_vec();
        change(&mut next[index]);
        if next[index] == cells[index] {
            return None;
        }

        let mut next = push_down(&next, index);
        if self.auto_compact {
            next = compact(&next, Some(index));
        }
        (next != cells).then_some(next)
    }
}

fn shift(value: u16, delta: i16) -> u16 {
    (i32::from(value) + i32::from(delta)).clamp(0, i32::from(u16::MAX)) as u16
}

/// Visiting order: the pinned cell first, then top-to-bottom, left-to-right.
fn settle_order(cells: &[LayoutCell], pinned: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cells.len()).filter(|&i| Some(i) != pinned).collect();
    order.sort_by_key(|&i| (cells[i].y, cells[i].x));
    if let Some(p) = pinned {
        order.insert(0, p);
    }
    order
}

/// Lowers `cell` until it clears every settled cell.
fn drop_below(cell: &mut LayoutCell, settled: &[LayoutCell]) {
    while let Some(bottom) = settled
        .iter()
        .filter(|s| s.overlaps(cell))
        .map(LayoutCell::bottom)
        .max()
    {
        cell.y = bottom;
    }
}

/// Keeps `cells[pinned]` where it is and pushes overlapping cells down.
fn push_down(cells: &[LayoutCell], pinned: usize) -> Vec<LayoutCell> {
    let mut next = cells.to_vec();
    let mut settled: Vec<LayoutCell> = Vec::with_capacity(cells.len());
    for i in settle_order(cells, Some(pinned)) {
        if i != pinned {
            drop_below(&mut next[i], &settled);
        }
        settled.push(next[i].clone());
    }
    next
}

/// Vertical compaction. A pinned cell keeps its row; no cell moves down.
fn compact(cells: &[LayoutCell], pinned: Option<usize>) -> Vec<LayoutCell> {
    let mut next = cells.to_vec();
    let mut settled: Vec<LayoutCell> = Vec::with_capacity(cells.len());
    for i in settle_order(cells, pinned) {
        if Some(i) != pinned {
            let original = next[i].y;
            next[i].y = 0;
            drop_below(&mut next[i], &settled);
            next[i].y = next[i].y.min(original);
        }
        settled.push(next[i].clone());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_layout::BreakpointName;

    fn lg() -> Breakpoint {
        Breakpoint {
            name: BreakpointName::Lg,
            cols: 12,
            min_width: 1200,
        }
    }

    fn cell(id: &str, x: u16, y: u16, w: u16, h: u16) -> LayoutCell {
        LayoutCell {
            widget_id: id.to_string(),
            x,
            y,
            w,
            h,
            min_w: 2,
            min_h: 2,
            max_w: None,
            max_h: None,
        }
    }

    fn find<'a>(cells: &'a [LayoutCell], id: &str) -> &'a LayoutCell {
        cells
            .iter()
            .find(|c| c.widget_id == id)
            .expect("cell present")
    }

    fn assert_no_overlaps(cells: &[LayoutCell]) {
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.widget_id, b.widget_id);
            }
        }
    }

    #[test]
    fn cell_rect_splits_columns_proportionally() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let area = Rect::new(0, 2, 120, 40);
        let rect = grid
            .cell_rect(&cell("a", 6, 4, 6, 4), area, 0)
            .expect("visible");
        assert_eq!(rect, Rect::new(60, 14, 60, 12));
    }

    #[test]
    fn cell_rect_clips_scrolled_cells() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let area = Rect::new(0, 0, 120, 10);
        let a = cell("a", 0, 0, 4, 2);

        let clipped = grid.cell_rect(&a, area, 4).expect("partly visible");
        assert_eq!((clipped.y, clipped.height), (0, 2));
        assert_eq!(grid.cell_rect(&a, area, 6), None);

        let below = cell("b", 0, 5, 4, 2);
        assert_eq!(grid.cell_rect(&below, area, 0), None);
    }

    #[test]
    fn content_height_uses_lowest_cell() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let cells = vec![cell("a", 0, 0, 4, 4), cell("b", 4, 2, 4, 5)];
        assert_eq!(grid.content_height(&cells), 21);
        assert_eq!(grid.content_height(&[]), 0);
    }

    #[test]
    fn move_stays_inside_columns() {
        let grid = InteractiveGrid::new(lg(), 3, false);
        let cells = vec![cell("a", 0, 0, 4, 4)];
        assert_eq!(grid.move_cell(&cells, "a", -1, 0), None);
        assert_eq!(grid.move_cell(&cells, "a", 0, -1), None);

        let moved = grid.move_cell(&cells, "a", 20, 0).expect("moved");
        assert_eq!(moved[0].x, 8);
    }

    #[test]
    fn move_pushes_colliding_cells_down() {
        let grid = InteractiveGrid::new(lg(), 3, false);
        let cells = vec![
            cell("a", 0, 0, 4, 4),
            cell("b", 4, 0, 4, 4),
            cell("c", 0, 4, 6, 4),
        ];
        let moved = grid.move_cell(&cells, "a", 1, 0).expect("moved");
        assert_eq!((find(&moved, "a").x, find(&moved, "a").y), (1, 0));
        assert_eq!(find(&moved, "b").y, 4);
        assert_eq!(find(&moved, "c").y, 8);
        assert_no_overlaps(&moved);
    }

    #[test]
    fn compaction_fills_gaps_but_keeps_the_moved_cell() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let cells = vec![cell("a", 0, 0, 4, 4), cell("b", 0, 4, 4, 4)];

        // Moving "a" to the right lets "b" rise into the vacated slot.
        let moved = grid.move_cell(&cells, "a", 4, 0).expect("moved");
        assert_eq!((find(&moved, "a").x, find(&moved, "a").y), (4, 0));
        assert_eq!(find(&moved, "b").y, 0);

        // The moved cell itself holds the row it was sent to.
        let lowered = grid.move_cell(&cells, "b", 0, 2).expect("moved");
        assert_eq!(find(&lowered, "b").y, 6);
    }

    #[test]
    fn unknown_widget_is_ignored() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let cells = vec![cell("a", 0, 0, 4, 4)];
        assert_eq!(grid.move_cell(&cells, "zzz", 1, 0), None);
        assert_eq!(grid.resize_cell(&cells, "zzz", 1, 0), None);
    }

    #[test]
    fn resize_respects_bounds() {
        let grid = InteractiveGrid::new(lg(), 3, false);
        let mut bounded = cell("a", 8, 0, 3, 3);
        bounded.max_h = Some(4);
        let cells = vec![bounded];

        let wider = grid.resize_cell(&cells, "a", 10, 0).expect("resized");
        assert_eq!(wider[0].w, 4, "limited by the right edge");

        let taller = grid.resize_cell(&cells, "a", 0, 10).expect("resized");
        assert_eq!(taller[0].h, 4, "limited by max_h");

        let narrower = grid.resize_cell(&cells, "a", -10, 0).expect("resized");
        assert_eq!(narrower[0].w, 2, "limited by min_w");

        let mut at_min = cells.clone();
        at_min[0].w = 2;
        assert_eq!(grid.resize_cell(&at_min, "a", -1, 0), None);
    }

    #[test]
    fn resize_pushes_neighbours_down() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let cells = vec![cell("a", 0, 0, 4, 4), cell("b", 4, 0, 4, 4)];
        let grown = grid.resize_cell(&cells, "a", 1, 0).expect("resized");
        assert_eq!(find(&grown, "a").w, 5);
        assert_eq!(find(&grown, "b").y, 4);
        assert_no_overlaps(&grown);
    }

    #[test]
    fn compact_never_moves_cells_down() {
        let grid = InteractiveGrid::new(lg(), 3, true);
        let cells = vec![
            cell("a", 0, 2, 4, 4),
            cell("b", 4, 0, 4, 3),
            cell("c", 2, 9, 4, 2),
        ];
        let compacted = grid.compact(&cells).expect("gaps closed");
        assert_eq!(find(&compacted, "a").y, 0);
        assert_eq!(find(&compacted, "b").y, 0);
        assert_eq!(find(&compacted, "c").y, 4);
        for (before, after) in cells.iter().zip(&compacted) {
            assert!(after.y <= before.y);
        }
        assert_no_overlaps(&compacted);
        assert_eq!(grid.compact(&compacted), None);
    }
}
