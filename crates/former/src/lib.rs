//! Former - declarative form binding for virtualized grid widgets.
//!
//! A form is described as an ordered list of sections, each holding rows and
//! an optional header and footer. A [`Former`] owns that description and
//! serves it to a virtualized grid widget, answering the grid's structural
//! queries, configuring the cells the grid materializes, and keeping track
//! of which row is selected so that input focus moves cleanly between rows.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use former::prelude::*;
//!
//! #[derive(Default)]
//! struct NameCell {
//!     height: f32,
//! }
//!
//! impl FormCell for NameCell {
//!     fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
//!         Some(self)
//!     }
//! }
//!
//! impl ConfigurableCell for NameCell {
//!     fn configure(&mut self, row_former: &RowFormer) {
//!         self.height = row_former.row_height();
//!     }
//! }
//!
//! let grid = Arc::new(HeadlessGrid::default());
//! let former = Former::new(&grid);
//! former.add_section_former(SectionFormer::new([
//!     RowFormer::of::<NameCell>().with_row_height(60.0),
//! ]));
//! former.reload_former();
//!
//! let height = grid.with_cell_at(IndexPath::new(0, 0), |cell: &mut NameCell| cell.height);
//! assert_eq!(height, Some(60.0));
//! ```
//!
//! # Crate Layout
//!
//! - [`model`]: Section, row and header/footer descriptors
//! - [`cell`]: The plugin contract concrete cells and views implement
//! - [`grid`]: The grid contract plus [`HeadlessGrid`](grid::HeadlessGrid)
//! - [`Former`]: The coordinator tying them together

pub mod cell;
mod config;
mod error;
mod former;
pub mod grid;
pub mod model;
pub mod prelude;

pub use config::FormerConfig;
pub use error::{Error, Result};
pub use former::Former;

pub use former_core::{ConnectionId, Signal};
