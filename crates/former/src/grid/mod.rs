//! The virtualized grid contract.
//!
//! Former drives an external, virtualized grid widget: a scrollable surface
//! that asks for structure (section/row counts, heights) and content (cells,
//! header/footer views) lazily, and recycles instances that scroll off
//! screen. This module defines the narrow contract between the two sides:
//!
//! - [`GridWidget`]: what the coordinator calls on the grid
//! - [`GridDataSource`]: structural queries and materialization the grid
//!   calls on the coordinator
//! - [`GridDelegate`]: heights and interaction events the grid reports
//!
//! # Live instance keys
//!
//! The grid owns every live cell and view in an arena. Dequeueing returns a
//! [`CellKey`] / [`ViewKey`] into that arena, and a grid must hand out a fresh
//! key on every dequeue, so a key held by a descriptor whose instance has
//! since been recycled no longer resolves through [`GridWidget::with_cell`].
//!
//! # Re-entrancy
//!
//! Grid methods take `&self`. A grid must not hold its own internal locks
//! while calling into its data source or delegate, because materialization
//! calls straight back into the grid to dequeue instances.
//!
//! [`HeadlessGrid`] is a complete implementation without rendering, used by
//! tests and demos.

mod headless;

use std::sync::Weak;

use slotmap::new_key_type;

use crate::cell::{FormCell, FormView};
use crate::error::Result;
use crate::model::{CellType, DisplayTypeId, IndexPath, ViewType};

pub use headless::{HeadlessGrid, HeadlessGridConfig, ReloadRequest};

new_key_type! {
    /// Key of a live cell in a grid's instance arena.
    pub struct CellKey;

    /// Key of a live header/footer view in a grid's instance arena.
    pub struct ViewKey;
}

/// Row separator decoration drawn by the grid itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorStyle {
    /// No separators; cell content draws its own dividers.
    #[default]
    None,
    /// A single hairline between rows.
    SingleLine,
}

/// Animation hint for partial reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAnimation {
    /// No animation.
    #[default]
    None,
    /// Cross-fade old and new content.
    Fade,
    /// Slide in from the right.
    Right,
    /// Slide in from the left.
    Left,
    /// Slide in from the top.
    Top,
    /// Slide in from the bottom.
    Bottom,
    /// Let the grid choose.
    Automatic,
}

/// Errors reported by a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A cell was requested for a display type that was never registered.
    #[error("No cell type registered for reuse identifier '{0}'")]
    UnregisteredCell(DisplayTypeId),

    /// A header/footer was requested for a display type that was never registered.
    #[error("No header/footer type registered for reuse identifier '{0}'")]
    UnregisteredHeaderFooter(DisplayTypeId),
}

/// A virtualized grid widget, as seen by the coordinator.
pub trait GridWidget: Send + Sync {
    /// Registers a cell type with the cell reuse pool. Re-registering is a no-op.
    fn register_reusable_cell(&self, cell_type: &CellType);

    /// Registers a header/footer type with its reuse pool. Re-registering is a no-op.
    fn register_reusable_header_footer(&self, view_type: &ViewType);

    /// Returns a live cell for `index_path`, recycled if one is pooled.
    fn dequeue_reusable_cell(
        &self,
        id: DisplayTypeId,
        index_path: IndexPath,
    ) -> std::result::Result<CellKey, GridError>;

    /// Returns a live header/footer view, recycled if one is pooled.
    fn dequeue_reusable_header_footer(
        &self,
        id: DisplayTypeId,
    ) -> std::result::Result<ViewKey, GridError>;

    /// Runs `f` on the live cell behind `key`.
    ///
    /// Returns `false` without calling `f` if the key no longer resolves.
    fn with_cell(&self, key: CellKey, f: &mut dyn FnMut(&mut dyn FormCell)) -> bool;

    /// Runs `f` on the live header/footer view behind `key`.
    ///
    /// Returns `false` without calling `f` if the key no longer resolves.
    fn with_header_footer(&self, key: ViewKey, f: &mut dyn FnMut(&mut dyn FormView)) -> bool;

    /// Sets the structural query provider. The grid must not keep it alive.
    fn set_data_source(&self, data_source: Weak<dyn GridDataSource>);

    /// Sets the event delegate. The grid must not keep it alive.
    fn set_delegate(&self, delegate: Weak<dyn GridDelegate>);

    /// Sets the built-in row separator decoration.
    fn set_separator_style(&self, style: SeparatorStyle);

    /// Re-queries structure and content of the given sections only.
    fn reload_sections(&self, sections: &[usize], animation: RowAnimation);

    /// Re-queries all structure and content.
    fn reload_data(&self);

    /// Clears the visual selection at `index_path`.
    fn deselect_row(&self, index_path: IndexPath, animated: bool);
}

/// Structural queries and materialization, answered from descriptor state.
pub trait GridDataSource: Send + Sync {
    /// The number of sections.
    fn number_of_sections(&self) -> usize;

    /// The number of rows in `section`.
    fn number_of_rows(&self, section: usize) -> usize;

    /// Materializes the cell for `index_path`.
    fn cell_for_row(&self, grid: &dyn GridWidget, index_path: IndexPath) -> Result<CellKey>;

    /// Materializes the header view of `section`.
    fn view_for_header(&self, grid: &dyn GridWidget, section: usize) -> Result<ViewKey>;

    /// Materializes the footer view of `section`.
    fn view_for_footer(&self, grid: &dyn GridWidget, section: usize) -> Result<ViewKey>;

    /// Whether the row supports inline editing.
    fn can_edit_row(&self, _index_path: IndexPath) -> bool {
        false
    }

    /// Whether the row can be reordered.
    fn can_move_row(&self, _index_path: IndexPath) -> bool {
        false
    }
}

/// Heights and interaction events.
pub trait GridDelegate: Send + Sync {
    /// The height of the row at `index_path`.
    fn row_height(&self, index_path: IndexPath) -> f32;

    /// The header height of `section`.
    fn header_height(&self, section: usize) -> f32;

    /// The footer height of `section`.
    fn footer_height(&self, section: usize) -> f32;

    /// Called before the grid selects a row.
    ///
    /// Returning `None` vetoes the selection; returning a path selects that
    /// path instead.
    fn will_select_row(&self, _grid: &dyn GridWidget, index_path: IndexPath) -> Option<IndexPath> {
        Some(index_path)
    }

    /// Called after the grid has committed the visual selection.
    fn did_select_row(&self, _grid: &dyn GridWidget, _index_path: IndexPath) {}

    /// Called whenever the user scrolls the grid.
    fn did_scroll(&self, _grid: &dyn GridWidget) {}
}
