//! Change notification for Former.
//!
//! A [`Signal`] calls every connected slot when the value it reports
//! changes. The form coordinator publishes its tracked selection this way,
//! so a toolbar or an inspector can follow the focused row without the
//! coordinator knowing about them.
//!
//! # Re-entrancy
//!
//! Slots are invoked after the connection table lock has been released, so a
//! slot may connect, disconnect, or emit on the same signal without
//! deadlocking. Connections added during an emission are not invoked by that
//! emission.
//!
//! # Example
//!
//! ```
//! use former_core::Signal;
//!
//! let focused_row = Signal::<Option<usize>>::new();
//! let conn_id = focused_row.connect(|row| match row {
//!     Some(row) => println!("editing row {row}"),
//!     None => println!("nothing focused"),
//! });
//!
//! focused_row.emit(Some(2));
//! focused_row.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connection so it can be removed with [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// `Args` is passed to every slot by reference.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Creates a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connects `slot`; it runs on every later [`Signal::emit`].
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Removes a connection. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// The number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Invokes every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "former_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<Option<usize>>: Send, Sync);
