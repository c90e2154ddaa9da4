//! Prelude module for Former.
//!
//! ```
//! use former::prelude::*;
//! ```

// ============================================================================
// Coordinator
// ============================================================================

pub use crate::{Former, FormerConfig};

// ============================================================================
// Descriptors
// ============================================================================

pub use crate::model::{CellType, IndexPath, RowFormer, SectionFormer, ViewFormer, ViewType};

// ============================================================================
// Cells and Views
// ============================================================================

pub use crate::cell::{ConfigurableCell, ConfigurableView, DefaultHeaderFooterView, FormCell, FormView};

// ============================================================================
// Grid
// ============================================================================

pub use crate::grid::{
    GridDataSource, GridDelegate, GridWidget, HeadlessGrid, HeadlessGridConfig, RowAnimation,
    SeparatorStyle,
};

// ============================================================================
// Signals
// ============================================================================

pub use former_core::{ConnectionId, Signal};
