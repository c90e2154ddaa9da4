//! Core primitives for Former.
//!
//! This crate provides the small set of building blocks the form binding
//! crate is assembled from:
//!
//! - **Signals**: Type-safe change notification ([`Signal`])
//! - **Logging**: `tracing` target and span names for filtering
//!
//! # Signal Example
//!
//! ```
//! use former_core::Signal;
//!
//! // A signal that reports the new selection row
//! let selection_changed = Signal::<Option<usize>>::new();
//!
//! let conn_id = selection_changed.connect(|row| {
//!     println!("Selection is now {:?}", row);
//! });
//!
//! selection_changed.emit(Some(3));
//! selection_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionId, Signal};
