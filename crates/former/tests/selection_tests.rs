//! Integration tests for selection tracking and focus handling.

mod common;

use std::sync::mpsc;
use std::sync::{Arc, Weak};
use std::time::Duration;

use common::{FocusCell, HitCounter, ResignCounter, grid, static_section};
use former::prelude::*;
use parking_lot::Mutex;

const A: IndexPath = IndexPath::new(0, 0);
const B: IndexPath = IndexPath::new(0, 1);

struct Setup {
    grid: Arc<HeadlessGrid>,
    former: Arc<Former>,
    resigns: ResignCounter,
    hits_a: HitCounter,
    hits_b: HitCounter,
}

fn setup_with_config(config: FormerConfig) -> Setup {
    let resigns = ResignCounter::default();
    let hits_a = HitCounter::default();
    let hits_b = HitCounter::default();

    let grid = grid(480.0);
    let former = Former::with_config(&grid, config);
    former.add_section_former(SectionFormer::new([
        hits_a.on(resigns.row()),
        hits_b.on(resigns.row()),
    ]));
    former.reload_former();

    Setup {
        grid,
        former,
        resigns,
        hits_a,
        hits_b,
    }
}

fn setup() -> Setup {
    setup_with_config(FormerConfig::default())
}

#[test]
fn test_select_a_then_b() {
    let s = setup();

    assert_eq!(s.grid.tap(A), Some(A));
    assert_eq!(s.former.selected_index_path(), Some(A));
    assert_eq!(s.hits_a.count(), 1);
    assert_eq!(s.resigns.count(), 0);

    assert_eq!(s.grid.tap(B), Some(B));
    assert_eq!(s.former.selected_index_path(), Some(B));
    assert_eq!(s.resigns.count(), 1);
    assert_eq!(s.hits_a.count(), 1);
    assert_eq!(s.hits_b.count(), 1);

    // A gave up focus, B still holds it.
    assert_eq!(s.grid.with_cell_at(A, |cell: &mut FocusCell| cell.focused), Some(false));
    assert_eq!(s.grid.with_cell_at(B, |cell: &mut FocusCell| cell.focused), Some(true));
}

#[test]
fn test_reselecting_same_row_resigns_it() {
    let s = setup();
    s.grid.tap(A);
    s.grid.tap(A);

    assert_eq!(s.resigns.count(), 1);
    assert_eq!(s.hits_a.count(), 2);
    assert_eq!(s.former.selected_index_path(), Some(A));
}

#[test]
fn test_scroll_resigns_but_keeps_highlight() {
    let s = setup();
    s.grid.tap(A);

    s.grid.scroll_by(0.0);
    assert_eq!(s.resigns.count(), 1);
    assert_eq!(s.former.selected_index_path(), None);
    assert_eq!(s.grid.highlighted_index_path(), Some(A));

    // Nothing is tracked any more, so this leaves the highlight alone.
    s.former.deselect_selected_cell(true);
    assert_eq!(s.grid.highlighted_index_path(), Some(A));
}

#[test]
fn test_scroll_without_resign_on_scroll() {
    let s = setup_with_config(FormerConfig::new().with_resign_on_scroll(false));
    s.grid.tap(A);

    s.grid.scroll_by(0.0);
    assert_eq!(s.resigns.count(), 0);
    assert_eq!(s.former.selected_index_path(), Some(A));
}

#[test]
fn test_deselect_selected_cell_clears_highlight() {
    let s = setup();
    s.grid.tap(B);

    s.former.deselect_selected_cell(true);
    assert_eq!(s.grid.highlighted_index_path(), None);
    assert_eq!(s.former.selected_index_path(), None);
    assert_eq!(s.resigns.count(), 0);
}

#[test]
fn test_resign_selected_cell_first_responder() {
    let s = setup();
    s.grid.tap(A);

    s.former.resign_selected_cell_first_responder();
    assert_eq!(s.resigns.count(), 1);
    assert_eq!(s.former.selected_index_path(), None);
    assert_eq!(s.grid.highlighted_index_path(), Some(A));

    // Idle when nothing is tracked.
    s.former.resign_selected_cell_first_responder();
    assert_eq!(s.resigns.count(), 1);
}

#[test]
fn test_selection_changed_sequence() {
    let s = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    s.former.selection_changed.connect(move |path| {
        seen_clone.lock().push(*path);
    });

    s.grid.tap(A);
    s.grid.tap(B);
    s.former.deselect_selected_cell(false);

    assert_eq!(*seen.lock(), vec![Some(A), None, Some(B), None]);
}

#[test]
fn test_handler_may_reenter_former() {
    let grid = grid(480.0);
    let former = Former::new(&grid);
    let weak = Arc::downgrade(&former);
    former.add_section_former(SectionFormer::new([RowFormer::of::<common::StaticCell>()
        .on_selected(move |_| {
            if let Some(former) = weak.upgrade() {
                former.deselect_selected_cell(false);
                former.reload_section_former(static_section(2), 0, RowAnimation::None);
            }
        })]));
    former.reload_former();

    assert_eq!(grid.tap(A), Some(A));
    assert_eq!(former.selected_index_path(), None);
    assert_eq!(grid.highlighted_index_path(), None);
    assert_eq!(former.number_of_rows(0), 2);
}

#[test]
fn test_resign_after_recycle_is_harmless() {
    let resigns = ResignCounter::default();
    let grid = grid(100.0);
    let former = Former::with_config(&grid, FormerConfig::new().with_resign_on_scroll(false));
    former.add_section_former(SectionFormer::new((0..20).map(|_| resigns.row())));
    former.reload_former();

    grid.tap(A);
    grid.scroll_to(600.0);
    assert_eq!(former.selected_index_path(), Some(A));
    assert!(grid.cell_key_at(A).is_none());

    // The tracked row's cell was recycled, so there is nothing to resign.
    former.resign_selected_cell_first_responder();
    assert_eq!(resigns.count(), 0);
    assert_eq!(former.selected_index_path(), None);
}

/// Writes a new height back to its row when it loses focus.
struct WriteBackCell {
    former: Arc<Mutex<Weak<Former>>>,
}

impl FormCell for WriteBackCell {
    fn resign_first_responder(&mut self) -> bool {
        if let Some(former) = self.former.lock().upgrade() {
            former.with_row_former_mut(A, |row| row.set_row_height(50.0));
        }
        true
    }
}

#[test]
fn test_resigning_cell_can_write_back_to_its_row() {
    let handle = Arc::new(Mutex::new(Weak::new()));
    let cell_handle = handle.clone();
    let cell_type = CellType::with_factory(move || WriteBackCell {
        former: cell_handle.clone(),
    });

    let grid = grid(480.0);
    let former = Former::new(&grid);
    *handle.lock() = Arc::downgrade(&former);
    former.add_section_former(SectionFormer::new([
        RowFormer::new(cell_type.clone()),
        RowFormer::new(cell_type),
    ]));
    former.reload_former();

    let (done_tx, done_rx) = mpsc::channel();
    let worker = {
        let grid = grid.clone();
        std::thread::spawn(move || {
            grid.tap(A);
            grid.tap(B);
            let _ = done_tx.send(());
        })
    };
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("selecting B must not block while A resigns");
    worker.join().expect("tap thread");

    assert_eq!(former.selected_index_path(), Some(B));
    assert_eq!(former.row_height(A), 50.0);
}
