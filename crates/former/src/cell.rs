//! Plugin contract for concrete cells and header/footer views.
//!
//! Former never paints anything itself. Concrete display types implement
//! [`FormCell`] or [`FormView`] and are created, recycled and owned by the
//! grid. After dequeueing an instance, the coordinator offers it the
//! descriptor it is now bound to through an optional configuration
//! capability:
//!
//! ```
//! use former::cell::{ConfigurableCell, FormCell};
//! use former::model::RowFormer;
//!
//! #[derive(Default)]
//! struct SwitchCell {
//!     height: f32,
//! }
//!
//! impl FormCell for SwitchCell {
//!     fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
//!         Some(self)
//!     }
//! }
//!
//! impl ConfigurableCell for SwitchCell {
//!     fn configure(&mut self, row_former: &RowFormer) {
//!         self.height = row_former.row_height();
//!     }
//! }
//! ```
//!
//! Types that do not expose the capability are still materialized; they
//! simply receive no content binding.

use std::any::Any;

use crate::model::{RowFormer, ViewFormer};

/// A concrete cell that can display one row.
pub trait FormCell: Any + Send {
    /// Returns the configuration capability, if this cell has one.
    fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
        None
    }

    /// Releases input focus held by this cell.
    ///
    /// Returns `true` if the cell was holding focus and gave it up. Called
    /// with no coordinator lock held, so a cell may write its edited value
    /// back through [`Former::with_row_former_mut`](crate::Former::with_row_former_mut).
    fn resign_first_responder(&mut self) -> bool {
        false
    }

    /// Called by the grid before a recycled instance is handed out again.
    fn prepare_for_reuse(&mut self) {}
}

/// Binds a cell to the row it is displaying.
pub trait ConfigurableCell {
    /// Pushes the row's state into the cell.
    fn configure(&mut self, row_former: &RowFormer);
}

/// A concrete header or footer view.
pub trait FormView: Any + Send {
    /// Returns the configuration capability, if this view has one.
    fn configurable(&mut self) -> Option<&mut dyn ConfigurableView> {
        None
    }

    /// Called by the grid before a recycled instance is handed out again.
    fn prepare_for_reuse(&mut self) {}
}

/// Binds a header/footer view to its descriptor.
pub trait ConfigurableView {
    /// Pushes the descriptor's state into the view.
    fn configure(&mut self, view_former: &ViewFormer);
}

impl dyn FormCell {
    /// Returns a reference to the concrete cell if it is of type `T`.
    pub fn downcast_ref<T: FormCell>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Returns a mutable reference to the concrete cell if it is of type `T`.
    pub fn downcast_mut<T: FormCell>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl dyn FormView {
    /// Returns a reference to the concrete view if it is of type `T`.
    pub fn downcast_ref<T: FormView>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Returns a mutable reference to the concrete view if it is of type `T`.
    pub fn downcast_mut<T: FormView>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

/// The baseline header/footer view.
///
/// Every grid a [`Former`](crate::Former) attaches to has this type
/// registered, and [`ViewFormer::default`] uses it, so sections without
/// explicit headers or footers always materialize. It is a blank spacer and
/// takes no configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultHeaderFooterView;

impl FormView for DefaultHeaderFooterView {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowFormer;

    #[derive(Default)]
    struct LabelCell {
        configured_height: Option<f32>,
    }

    impl FormCell for LabelCell {
        fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
            Some(self)
        }
    }

    impl ConfigurableCell for LabelCell {
        fn configure(&mut self, row_former: &RowFormer) {
            self.configured_height = Some(row_former.row_height());
        }
    }

    #[derive(Default)]
    struct BareCell;
    impl FormCell for BareCell {}

    #[test]
    fn test_configurable_capability() {
        let row = RowFormer::of::<LabelCell>().with_row_height(60.0);
        let mut cell: Box<dyn FormCell> = Box::new(LabelCell::default());

        if let Some(configurable) = cell.configurable() {
            configurable.configure(&row);
        }
        let label = cell.downcast_ref::<LabelCell>().expect("label cell");
        assert_eq!(label.configured_height, Some(60.0));
    }

    #[test]
    fn test_missing_capability_is_none() {
        let mut cell: Box<dyn FormCell> = Box::new(BareCell);
        assert!(cell.configurable().is_none());
        assert!(!cell.resign_first_responder());

        let mut view: Box<dyn FormView> = Box::new(DefaultHeaderFooterView);
        assert!(view.configurable().is_none());
    }
}
