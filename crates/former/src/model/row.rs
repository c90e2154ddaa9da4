//! Row descriptors.

use std::fmt;
use std::sync::Arc;

use former_core::logging::targets;

use super::display_type::CellType;
use super::index_path::IndexPath;
use crate::cell::FormCell;
use crate::grid::{CellKey, GridWidget};

/// The height of a row unless one is set explicitly.
pub const DEFAULT_ROW_HEIGHT: f32 = 44.0;

/// Callback invoked when the user selects a row.
pub type SelectedHandler = Arc<dyn Fn(IndexPath) + Send + Sync>;

/// Describes one data-entry row.
///
/// A row names the cell type that displays it, its height and an optional
/// selection callback. It does not know its own position: sections own rows
/// by index and the coordinator passes the [`IndexPath`] in at query time.
///
/// # Live cell binding
///
/// Each time the grid materializes this row, the coordinator stores the key
/// of the dequeued cell here. The key is transient: once the grid recycles
/// that cell the key stops resolving, so [`RowFormer::cell`] must never be
/// treated as a long-lived handle.
///
/// # Example
///
/// ```
/// use former::cell::FormCell;
/// use former::model::RowFormer;
///
/// #[derive(Default)]
/// struct TextFieldCell;
/// impl FormCell for TextFieldCell {}
///
/// let row = RowFormer::of::<TextFieldCell>()
///     .with_row_height(60.0)
///     .on_selected(|path| println!("selected {path}"));
/// assert_eq!(row.row_height(), 60.0);
/// ```
pub struct RowFormer {
    cell_type: CellType,
    row_height: f32,
    selected_handler: Option<SelectedHandler>,
    cell: Option<CellKey>,
}

impl RowFormer {
    /// Creates a row displayed by `cell_type`.
    pub fn new(cell_type: CellType) -> Self {
        Self {
            cell_type,
            row_height: DEFAULT_ROW_HEIGHT,
            selected_handler: None,
            cell: None,
        }
    }

    /// Creates a row displayed by a default-constructed `T`.
    pub fn of<T: FormCell + Default>() -> Self {
        Self::new(CellType::of::<T>())
    }

    /// Sets the row height.
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the selection callback.
    pub fn on_selected<F>(mut self, handler: F) -> Self
    where
        F: Fn(IndexPath) + Send + Sync + 'static,
    {
        self.selected_handler = Some(Arc::new(handler));
        self
    }

    /// The cell type displaying this row.
    #[inline]
    pub fn cell_type(&self) -> &CellType {
        &self.cell_type
    }

    /// The row height.
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Changes the row height. Takes effect on the grid's next re-query.
    pub fn set_row_height(&mut self, row_height: f32) {
        self.row_height = row_height;
    }

    /// Returns the selection callback, if any.
    pub fn selected_handler(&self) -> Option<SelectedHandler> {
        self.selected_handler.clone()
    }

    /// Replaces the selection callback.
    pub fn set_selected_handler(&mut self, handler: Option<SelectedHandler>) {
        self.selected_handler = handler;
    }

    /// The key of the cell most recently bound to this row.
    #[inline]
    pub fn cell(&self) -> Option<CellKey> {
        self.cell
    }

    pub(crate) fn bind_cell(&mut self, key: CellKey) {
        self.cell = Some(key);
    }

    pub(crate) fn unbind_cell(&mut self) {
        self.cell = None;
    }

    /// Asks the bound cell to give up input focus.
    ///
    /// Returns `false` when no cell is bound, the bound key has been
    /// recycled, or the cell was not holding focus.
    pub fn resign_cell_first_responder(&self, grid: &dyn GridWidget) -> bool {
        self.cell.is_some_and(|key| resign_cell(grid, key))
    }
}

/// Asks the live cell behind `key` to give up input focus.
///
/// Callers must not hold any descriptor lock: cells commonly write their
/// edited value back to their row when they lose focus.
pub(crate) fn resign_cell(grid: &dyn GridWidget, key: CellKey) -> bool {
    let mut resigned = false;
    let resolved = grid.with_cell(key, &mut |cell: &mut dyn FormCell| {
        resigned = cell.resign_first_responder();
    });
    if !resolved {
        tracing::trace!(target: targets::SELECTION, ?key, "bound cell was recycled, nothing to resign");
    }
    resigned
}

impl fmt::Debug for RowFormer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFormer")
            .field("cell_type", &self.cell_type)
            .field("row_height", &self.row_height)
            .field("has_selected_handler", &self.selected_handler.is_some())
            .field("cell", &self.cell)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct PlainCell;
    impl FormCell for PlainCell {}

    #[test]
    fn test_defaults() {
        let row = RowFormer::of::<PlainCell>();
        assert_eq!(row.row_height(), DEFAULT_ROW_HEIGHT);
        assert!(row.selected_handler().is_none());
        assert!(row.cell().is_none());
    }

    #[test]
    fn test_selected_handler_receives_path() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let row = RowFormer::of::<PlainCell>().on_selected(move |path| {
            assert_eq!(path, IndexPath::new(2, 3));
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        let handler = row.selected_handler().expect("handler");
        handler(IndexPath::new(2, 3));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_row_height() {
        let mut row = RowFormer::of::<PlainCell>();
        row.set_row_height(88.0);
        assert_eq!(row.row_height(), 88.0);
    }
}
