//! Stateful owner of the dashboard arrangement.
//!
//! [`GridController`] is the only code that mutates the active widget set
//! and the layout assignment. Every mutating operation either commits fully
//! in memory and then attempts persistence, or leaves state untouched and
//! raises a [`Notice`]. A failed write never rolls back the in-memory
//! change; the caller sees [`Mutation::CommittedUnsaved`].

use std::collections::HashSet;
use std::error::Error as StdError;

use dashboard_layout::{
    append, generate, BreakpointName, Breakpoints, LayoutAssignment, LayoutCell, LayoutError,
    LayoutStore, PersistError, PersistedDashboardState,
};
use tracing::{debug, info, warn};

use crate::grid::EditModeController;
use crate::widgets::{WidgetDescriptor, WidgetKind, WidgetRegistry};

/// Outcome of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Mutation {
    /// State changed and was saved.
    Committed,
    /// State changed but saving failed; a notice was raised.
    CommittedUnsaved,
    /// Nothing to do.
    NoOp,
    /// The operation failed; state is unchanged and a notice was raised.
    Failed,
}

impl Mutation {
    /// Whether in-memory state changed.
    pub fn changed(self) -> bool {
        matches!(self, Mutation::Committed | Mutation::CommittedUnsaved)
    }
}

/// What a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The store rejected a write.
    SaveFailed,
    /// Layout generation failed.
    LayoutFailed,
}

/// A dismissible, non-fatal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Handle for [`GridController::dismiss_notice`].
    pub id: u64,
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable text.
    pub message: String,
}

/// Owns the active widget set and layout, drives generation and persistence.
///
/// # Example
///
/// ```
/// use dashboard_layout::{BreakpointName, LayoutStore, MemoryStore};
/// use widget_dashboard::grid::{GridController, Mutation};
/// use widget_dashboard::widgets::WidgetRegistry;
///
/// let mut grid = GridController::new(WidgetRegistry::builtin(), LayoutStore::new(MemoryStore::new()));
/// grid.initialize();
/// assert_eq!(grid.add_widget("firms"), Mutation::Committed);
/// assert!(grid.layouts().cell(BreakpointName::Lg, "firms").is_some());
/// ```
#[derive(Debug)]
pub struct GridController {
    registry: WidgetRegistry,
    store: LayoutStore,
    breakpoints: Breakpoints,
    default_widgets: Vec<String>,
    active: Vec<String>,
    layouts: LayoutAssignment,
    edit_mode: EditModeController,
    loading: bool,
    notices: Vec<Notice>,
    next_notice_id: u64,
}

impl GridController {
    /// Creates an empty controller; call [`initialize`](Self::initialize)
    /// before use.
    pub fn new(registry: WidgetRegistry, store: LayoutStore) -> Self {
        Self {
            registry,
            store,
            breakpoints: Breakpoints::default(),
            default_widgets: WidgetKind::DEFAULT_ACTIVE
                .iter()
                .map(|k| k.id().to_string())
                .collect(),
            active: Vec::new(),
            layouts: LayoutAssignment::new(),
            edit_mode: EditModeController::new(),
            loading: false,
            notices: Vec::new(),
            next_notice_id: 0,
        }
    }

    /// Replaces the breakpoint table.
    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Replaces the widgets seeded when nothing is saved.
    pub fn with_default_widgets(mut self, ids: Vec<String>) -> Self {
        self.default_widgets = ids;
        self
    }

    /// Loads saved state, falling back to the default widgets.
    ///
    /// Unknown and repeated ids are dropped. Saved cells for widgets that
    /// are no longer active are discarded and active widgets without a
    /// cell are placed below the existing ones. Saved cells that break the
    /// descriptor bounds or overlap are repaired with a
    /// [`NoticeKind::LayoutFailed`] notice. Nothing is written.
    pub fn initialize(&mut self) {
        let saved = self.store.load();
        if saved.is_none() {
            info!("No saved dashboard, starting from defaults");
        }
        let PersistedDashboardState {
            layouts,
            active_widgets,
        } = saved.unwrap_or_default();

        let mut active = self.known_unique(active_widgets);
        if active.is_empty() {
            active = self.known_unique(self.default_widgets.clone());
        }
        let layouts = if layouts.is_empty() {
            generate(&active, &self.breakpoints, &self.registry).map(|l| (l, 0))
        } else {
            self.reconcile(&layouts, &active)
        };

        self.active = active;
        self.layouts = match layouts {
            Ok((layouts, 0)) => layouts,
            Ok((layouts, repaired)) => {
                warn!(repaired, "Saved layout had invalid cells");
                self.push_notice(
                    NoticeKind::LayoutFailed,
                    format!("Saved layout repaired: {repaired} cell(s) resized or moved"),
                );
                layouts
            }
            Err(e) => {
                self.report_layout_failure(&e);
                LayoutAssignment::new()
            }
        };
        self.loading = false;
        info!(widgets = self.active.len(), "Dashboard initialized");
    }

    /// Adds a widget and regenerates every breakpoint from scratch.
    ///
    /// Hand-placed positions of other widgets are not preserved.
    pub fn add_widget(&mut self, widget_id: &str) -> Mutation {
        if self.loading {
            debug!(widget_id, "Add already in progress");
            return Mutation::NoOp;
        }
        if self.is_active(widget_id) {
            return Mutation::NoOp;
        }
        if !self.registry.contains(widget_id) {
            debug!(widget_id, "Ignoring unknown widget");
            return Mutation::NoOp;
        }

        self.loading = true;
        let mut active = self.active.clone();
        active.push(widget_id.to_string());
        let outcome = match generate(&active, &self.breakpoints, &self.registry) {
            Ok(layouts) => {
                self.active = active;
                self.layouts = layouts;
                info!(widget_id, "Widget added");
                self.persist()
            }
            Err(e) => {
                self.report_layout_failure(&e);
                Mutation::Failed
            }
        };
        self.loading = false;
        outcome
    }

    /// Removes a widget and its cell from every breakpoint.
    ///
    /// Remaining cells keep their positions.
    pub fn remove_widget(&mut self, widget_id: &str) -> Mutation {
        let Some(pos) = self.active.iter().position(|id| id == widget_id) else {
            return Mutation::NoOp;
        };
        self.active.remove(pos);
        let removed = self.layouts.remove_widget(widget_id);
        info!(widget_id, cells = removed, "Widget removed");
        self.persist()
    }

    /// Accepts placements from the interactive grid for one breakpoint.
    ///
    /// Ignored while edit mode is off. Cells for inactive widgets are
    /// dropped, active widgets missing from `cells` are placed below the
    /// rest, and identical input is a no-op.
    pub fn on_interactive_layout_change(
        &mut self,
        breakpoint: BreakpointName,
        cells: Vec<LayoutCell>,
    ) -> Mutation {
        if !self.edit_mode.is_enabled() {
            debug!(%breakpoint, "Layout change outside edit mode ignored");
            return Mutation::NoOp;
        }
        let Some(bp) = self.breakpoints.get(breakpoint).copied() else {
            debug!(%breakpoint, "Layout change for unconfigured breakpoint ignored");
            return Mutation::NoOp;
        };

        let mut seen = HashSet::new();
        let kept: Vec<LayoutCell> = cells
            .into_iter()
            .filter(|c| self.is_active(&c.widget_id) && seen.insert(c.widget_id.clone()))
            .collect();
        let missing: Vec<String> = self
            .active
            .iter()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        let cells = if missing.is_empty() {
            kept
        } else {
            match append(&kept, &missing, &bp, &self.registry) {
                Ok(cells) => cells,
                Err(e) => {
                    self.report_layout_failure(&e);
                    return Mutation::Failed;
                }
            }
        };

        if self.layouts.cells(breakpoint) == cells.as_slice() {
            return Mutation::NoOp;
        }
        self.layouts.set_cells(breakpoint, cells);
        debug!(%breakpoint, "Interactive layout change applied");
        self.persist()
    }

    /// Flips edit mode and returns the new value. Never persists.
    pub fn toggle_edit_mode(&mut self) -> bool {
        let enabled = self.edit_mode.toggle();
        debug!(enabled, "Edit mode toggled");
        enabled
    }

    /// Sets edit mode. Never persists.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode.set(enabled);
    }

    /// Whether edit mode is on.
    pub fn edit_mode(&self) -> bool {
        self.edit_mode.is_enabled()
    }

    /// Restores the default widgets and clears saved state.
    pub fn reset(&mut self) -> Mutation {
        let active = self.known_unique(self.default_widgets.clone());
        match generate(&active, &self.breakpoints, &self.registry) {
            Ok(layouts) => {
                self.active = active;
                self.layouts = layouts;
            }
            Err(e) => {
                self.report_layout_failure(&e);
                return Mutation::Failed;
            }
        }
        info!("Dashboard reset to defaults");
        match self.store.clear() {
            Ok(()) => Mutation::Committed,
            Err(e) => {
                self.report_save_failure(&e);
                Mutation::CommittedUnsaved
            }
        }
    }

    /// Registered widgets not currently active, in registry order.
    pub fn addable_widgets(&self) -> Vec<&WidgetDescriptor> {
        self.registry
            .list()
            .iter()
            .filter(|d| !self.is_active(d.id))
            .collect()
    }

    /// Active widget ids in packing order.
    pub fn active_widgets(&self) -> &[String] {
        &self.active
    }

    /// Whether `widget_id` is active.
    pub fn is_active(&self, widget_id: &str) -> bool {
        self.active.iter().any(|id| id == widget_id)
    }

    /// Current layout for every breakpoint.
    pub fn layouts(&self) -> &LayoutAssignment {
        &self.layouts
    }

    /// Snapshot of what would be saved.
    pub fn state(&self) -> PersistedDashboardState {
        PersistedDashboardState {
            layouts: self.layouts.clone(),
            active_widgets: self.active.clone(),
        }
    }

    /// The widget catalog.
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// The breakpoint table.
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// The persistence facade.
    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Whether an add is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Pending notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes a notice; returns whether it existed.
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    fn persist(&mut self) -> Mutation {
        match self.store.save(&self.state()) {
            Ok(()) => Mutation::Committed,
            Err(e) => {
                self.report_save_failure(&e);
                Mutation::CommittedUnsaved
            }
        }
    }

    fn known_unique(&self, ids: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| {
                if !self.registry.contains(id) {
                    debug!(widget_id = %id, "Dropping unknown widget");
                    return false;
                }
                seen.insert(id.clone())
            })
            .collect()
    }

    /// Rebuilds saved cells against the registry and the breakpoint table.
    ///
    /// Bounds come from the descriptor, not the saved file. Sizes and
    /// columns are clamped into range; a cell that still overlaps an earlier
    /// one is dropped and placed again below the kept cells. Returns the
    /// layouts and the number of cells that had to be repaired.
    fn reconcile(
        &self,
        saved: &LayoutAssignment,
        active: &[String],
    ) -> Result<(LayoutAssignment, usize), LayoutError> {
        let mut layouts = LayoutAssignment::new();
        let mut repaired = 0;
        for bp in self.breakpoints.iter() {
            let mut placed = HashSet::new();
            let mut kept: Vec<LayoutCell> = Vec::new();
            for cell in saved.cells(bp.name) {
                if !active.contains(&cell.widget_id) || placed.contains(&cell.widget_id) {
                    continue;
                }
                let Some(descriptor) = self.registry.get(&cell.widget_id) else {
                    continue;
                };
                let fitted = fit_saved_cell(cell, descriptor, bp.cols);
                if kept.iter().any(|other| other.overlaps(&fitted)) {
                    debug!(widget_id = %cell.widget_id, breakpoint = %bp.name, "Saved cell overlaps, placing again");
                    repaired += 1;
                    continue;
                }
                if fitted != *cell {
                    debug!(widget_id = %cell.widget_id, breakpoint = %bp.name, "Saved cell out of bounds, clamped");
                    repaired += 1;
                }
                placed.insert(cell.widget_id.clone());
                kept.push(fitted);
            }
            let missing: Vec<String> = active
                .iter()
                .filter(|id| !placed.contains(*id))
                .cloned()
                .collect();
            let cells = if missing.is_empty() {
                kept
            } else {
                append(&kept, &missing, bp, &self.registry)?
            };
            layouts.set_cells(bp.name, cells);
        }
        Ok((layouts, repaired))
    }

    fn report_save_failure(&mut self, e: &PersistError) {
        let message = error_chain(e);
        warn!(error = %message, "Failed to save dashboard");
        self.push_notice(
            NoticeKind::SaveFailed,
            format!("Changes not saved: {message}"),
        );
    }

    fn report_layout_failure(&mut self, e: &LayoutError) {
        warn!(error = %e, "Layout generation failed");
        self.push_notice(NoticeKind::LayoutFailed, format!("Layout unchanged: {e}"));
    }

    fn push_notice(&mut self, kind: NoticeKind, message: String) {
        self.next_notice_id += 1;
        self.notices.push(Notice {
            id: self.next_notice_id,
            kind,
            message,
        });
    }
}

fn error_chain(e: &dyn StdError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// `cell` with its bounds taken from `descriptor` and its size and column
/// clamped to fit a `cols`-wide grid.
fn fit_saved_cell(cell: &LayoutCell, descriptor: &WidgetDescriptor, cols: u16) -> LayoutCell {
    let sizing = &descriptor.sizing;
    let min_w = sizing.min.w.min(cols);
    let max_w = sizing.max.map(|m| m.w);
    let max_h = sizing.max.map(|m| m.h);
    let w = max_w
        .map_or(cell.w.max(min_w), |m| cell.w.max(min_w).min(m))
        .min(cols)
        .max(1);
    let h = max_h
        .map_or(cell.h.max(sizing.min.h), |m| cell.h.max(sizing.min.h).min(m))
        .max(1);
    LayoutCell {
        widget_id: cell.widget_id.clone(),
        x: cell.x.min(cols.saturating_sub(w)),
        y: cell.y,
        w,
        h,
        min_w,
        min_h: sizing.min.h,
        max_w,
        max_h,
    }
}
