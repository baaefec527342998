//! Packing properties
//!
//! Sweeps every breakpoint with a family of active sets built from a mixed
//! catalog and checks the placement invariants on each result.

use dashboard_layout::{
    generate, BreakpointName, Breakpoints, LayoutCell, Size, SizeConstraints,
};

const IDS: [&str; 8] = [
    "claims",
    "earnings",
    "firms",
    "weather",
    "calendar",
    "messages",
    "compliance",
    "tasks",
];

fn sizing(id: &str) -> Option<SizeConstraints> {
    let c = match id {
        "claims" => SizeConstraints::new(Size::new(6, 4), Size::new(4, 3)),
        "earnings" => {
            SizeConstraints::new(Size::new(4, 3), Size::new(3, 2)).with_max(Size::new(6, 4))
        }
        "firms" => SizeConstraints::new(Size::new(4, 4), Size::new(3, 3)),
        "weather" => {
            SizeConstraints::new(Size::new(3, 3), Size::new(2, 2)).with_max(Size::new(4, 4))
        }
        "calendar" => SizeConstraints::new(Size::new(4, 5), Size::new(3, 3)),
        "messages" => SizeConstraints::new(Size::new(4, 4), Size::new(3, 3)),
        "compliance" => SizeConstraints::new(Size::new(4, 2), Size::new(3, 2)),
        "tasks" => SizeConstraints::new(Size::new(6, 5), Size::new(4, 3)),
        _ => return None,
    };
    Some(c)
}

/// Rotations and prefixes of the catalog give varied row mixes.
fn active_sets() -> Vec<Vec<String>> {
    let mut sets = Vec::new();
    for rotate in 0..IDS.len() {
        for len in 1..=IDS.len() {
            let set = IDS
                .iter()
                .cycle()
                .skip(rotate)
                .take(len)
                .map(|s| s.to_string())
                .collect();
            sets.push(set);
        }
    }
    sets
}

fn assert_no_overlap(cells: &[LayoutCell]) {
    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn one_cell_per_widget_in_every_breakpoint() {
    let bps = Breakpoints::default();
    for active in active_sets() {
        let layouts = generate(&active, &bps, &sizing).expect("generate");
        for bp in bps.iter() {
            let cells = layouts.cells(bp.name);
            assert_eq!(cells.len(), active.len(), "{} {active:?}", bp.name);
            for id in &active {
                let count = cells.iter().filter(|c| &c.widget_id == id).count();
                assert_eq!(count, 1, "{id} on {}", bp.name);
            }
        }
    }
}

#[test]
fn cells_never_overlap_and_stay_inside_columns() {
    let bps = Breakpoints::default();
    for active in active_sets() {
        let layouts = generate(&active, &bps, &sizing).expect("generate");
        for bp in bps.iter() {
            let cells = layouts.cells(bp.name);
            assert_no_overlap(cells);
            for cell in cells {
                assert!(cell.right() <= bp.cols, "{cell:?} exceeds {} cols", bp.cols);
            }
        }
    }
}

#[test]
fn cells_respect_descriptor_bounds() {
    let bps = Breakpoints::default();
    for active in active_sets() {
        let layouts = generate(&active, &bps, &sizing).expect("generate");
        for bp in bps.iter() {
            for cell in layouts.cells(bp.name) {
                let c = sizing(&cell.widget_id).expect("known id");
                assert!(cell.w >= c.min.w.min(bp.cols), "{cell:?}");
                assert!(cell.h >= c.min.h, "{cell:?}");
                if let Some(max) = c.max {
                    assert!(cell.w <= max.w && cell.h <= max.h, "{cell:?}");
                }
                assert!(cell.respects_bounds(), "{cell:?}");
            }
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let bps = Breakpoints::default();
    for active in active_sets() {
        let first = generate(&active, &bps, &sizing).expect("generate");
        let second = generate(&active, &bps, &sizing).expect("generate");
        assert_eq!(first, second);
    }
}

#[test]
fn wide_breakpoints_respect_minimums_exactly() {
    let bps = Breakpoints::default();
    let all: Vec<String> = IDS.iter().map(|s| s.to_string()).collect();
    let layouts = generate(&all, &bps, &sizing).expect("generate");
    for name in [BreakpointName::Lg, BreakpointName::Md, BreakpointName::Sm] {
        for cell in layouts.cells(name) {
            let c = sizing(&cell.widget_id).expect("known id");
            assert!(cell.w >= c.min.w, "{name}: {cell:?}");
        }
    }
}
