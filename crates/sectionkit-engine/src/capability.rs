//! # View-model contract
//!
//! Content objects shown by the list implement [`ItemViewModel`]. Interactive
//! behaviour is opt-in: a view-model answers `Some(self)` from one of the
//! capability accessors to advertise that it is [`Tappable`], [`Deletable`] or
//! [`Mutable`]. The data source checks these at configuration and selection
//! time, so no class hierarchy is involved.
//!
//! `Deletable` and `Mutable` view-models expose a [`CallbackSlot`] that the
//! data source fills in; the view-model fires it without holding any
//! reference to the list.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Handler stored in a [`CallbackSlot`].
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Display height hint for a row or header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RowHeight {
    /// Let the surface size the row from its content
    #[default]
    Automatic,
    /// Fixed height in surface units
    Fixed(f64),
}

/// Content object behind a row or section header.
pub trait ItemViewModel: Send + Sync + 'static {
    /// Reuse class used to materialize a cell for this view-model
    fn reuse_identifier(&self) -> &str;

    /// Registered cell class, if any. `None` means the surface has to find a
    /// resource named after [`reuse_identifier`](Self::reuse_identifier).
    fn cell_class(&self) -> Option<&'static str> {
        None
    }

    fn item_height(&self) -> RowHeight {
        RowHeight::Automatic
    }

    /// Lets cells downcast to the concrete view-model they render.
    fn as_any(&self) -> &dyn Any;

    fn as_tappable(&self) -> Option<&dyn Tappable> {
        None
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        None
    }

    fn as_mutable(&self) -> Option<&dyn Mutable> {
        None
    }
}

/// Reacts to a primary selection of its row or header.
pub trait Tappable {
    fn on_tap(&self);
}

/// Can ask the list to remove its own row.
pub trait Deletable {
    /// Slot the data source wires to a removal of exactly this item
    fn on_delete(&self) -> &CallbackSlot;
}

/// Can ask the list to re-query its content without a structural edit.
pub trait Mutable {
    /// Slot the data source wires to a reapply of the current snapshot
    fn on_change(&self) -> &CallbackSlot;
}

/// Optional, replaceable handler shared between threads.
#[derive(Default)]
pub struct CallbackSlot {
    handler: Mutex<Option<Callback>>,
}

impl CallbackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, handler: Callback) {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
    }

    pub fn clear(&self) {
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_set(&self) -> bool {
        self.handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Run the handler if one is installed. Returns whether it ran.
    ///
    /// The lock is released before the handler runs, so a handler may
    /// replace or clear its own slot.
    pub fn fire(&self) -> bool {
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CallbackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
