//! Form descriptors.
//!
//! A form is described declaratively, leaf first:
//!
//! - [`RowFormer`]: one data-entry row (cell type, height, selection callback)
//! - [`ViewFormer`]: a section header or footer (view type, height)
//! - [`SectionFormer`]: ordered rows plus a header and a footer
//!
//! Descriptors are addressed by [`IndexPath`] and name their concrete display
//! implementations through [`CellType`] / [`ViewType`], whose
//! [`DisplayTypeId`] doubles as the grid's reuse identifier.
//!
//! ```text
//! Former ──owns──> [SectionFormer] ──owns──> [RowFormer] ──names──> CellType
//!                        │                        └──bound to──> CellKey (transient)
//!                        └── header / footer: ViewFormer ──names──> ViewType
//! ```

mod display_type;
mod index_path;
mod row;
mod section;
mod view;

pub use display_type::{CellFactory, CellType, DisplayTypeId, ViewFactory, ViewType};
pub use index_path::IndexPath;
pub use row::{DEFAULT_ROW_HEIGHT, RowFormer, SelectedHandler};
pub(crate) use row::resign_cell;
pub use section::SectionFormer;
pub use view::{DEFAULT_VIEW_HEIGHT, ViewFormer};
