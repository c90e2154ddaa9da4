//! Error types for Former.

use crate::grid::GridError;

/// Result type alias for Former operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the coordinator.
///
/// Caller contract violations (out-of-range reload indices, mismatched batch
/// lengths) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The grid could not produce a cell or view.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}
