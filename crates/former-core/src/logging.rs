//! Logging facilities for Former.
//!
//! Former uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("former=debug")
//!     .init();
//! ```
//!
//! The constants below name the targets and spans used across the crates so
//! that hosts can filter a single subsystem, e.g. `former::selection=trace`.

/// Span names used throughout Former for tracing.
pub mod span_names {
    /// Section reload span.
    pub const RELOAD: &str = "former::reload";
    /// Grid layout pass span.
    pub const LAYOUT: &str = "former::layout";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Coordinator lifecycle (attach, add, reload).
    pub const FORMER: &str = "former";
    /// Cell and header/footer materialization.
    pub const MATERIALIZE: &str = "former::materialize";
    /// Selection and focus transitions.
    pub const SELECTION: &str = "former::selection";
    /// Grid-side activity (registration, reuse pools, layout).
    pub const GRID: &str = "former::grid";
    /// Signal/slot system.
    pub const SIGNAL: &str = "former_core::signal";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_prefixed() {
        for target in [
            targets::FORMER,
            targets::MATERIALIZE,
            targets::SELECTION,
            targets::GRID,
        ] {
            assert!(target.starts_with("former"));
        }
        assert!(targets::SIGNAL.starts_with("former_core"));
        assert!(span_names::RELOAD.starts_with(targets::FORMER));
        assert!(span_names::LAYOUT.starts_with(targets::FORMER));
    }
}
