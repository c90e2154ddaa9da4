//! Header/footer descriptors.

use std::fmt;

use super::display_type::ViewType;
use crate::cell::{DefaultHeaderFooterView, FormView};
use crate::grid::ViewKey;

/// The height of a header or footer unless one is set explicitly.
pub const DEFAULT_VIEW_HEIGHT: f32 = 10.0;

/// Describes a section header or footer.
///
/// Like [`RowFormer`](super::RowFormer), a view descriptor records the key of
/// the live view most recently bound to it; the key is transient and stops
/// resolving once the grid recycles the view.
pub struct ViewFormer {
    view_type: ViewType,
    view_height: f32,
    view: Option<ViewKey>,
}

impl Default for ViewFormer {
    /// A blank spacer using [`DefaultHeaderFooterView`].
    fn default() -> Self {
        Self::of::<DefaultHeaderFooterView>()
    }
}

impl ViewFormer {
    /// Creates a descriptor displayed by `view_type`.
    pub fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            view_height: DEFAULT_VIEW_HEIGHT,
            view: None,
        }
    }

    /// Creates a descriptor displayed by a default-constructed `T`.
    pub fn of<T: FormView + Default>() -> Self {
        Self::new(ViewType::of::<T>())
    }

    /// Sets the view height.
    pub fn with_view_height(mut self, view_height: f32) -> Self {
        self.view_height = view_height;
        self
    }

    /// The view type displaying this header/footer.
    #[inline]
    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    /// The view height.
    #[inline]
    pub fn view_height(&self) -> f32 {
        self.view_height
    }

    /// Changes the view height. Takes effect on the grid's next re-query.
    pub fn set_view_height(&mut self, view_height: f32) {
        self.view_height = view_height;
    }

    /// The key of the view most recently bound to this descriptor.
    #[inline]
    pub fn view(&self) -> Option<ViewKey> {
        self.view
    }

    pub(crate) fn bind_view(&mut self, key: ViewKey) {
        self.view = Some(key);
    }

    pub(crate) fn unbind_view(&mut self) {
        self.view = None;
    }
}

impl fmt::Debug for ViewFormer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFormer")
            .field("view_type", &self.view_type)
            .field("view_height", &self.view_height)
            .field("view", &self.view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DisplayTypeId;

    #[test]
    fn test_default_uses_baseline_view() {
        let view = ViewFormer::default();
        assert_eq!(
            view.view_type().id(),
            DisplayTypeId::of::<DefaultHeaderFooterView>()
        );
        assert_eq!(view.view_height(), DEFAULT_VIEW_HEIGHT);
        assert!(view.view().is_none());
    }

    #[test]
    fn test_with_view_height() {
        assert_eq!(ViewFormer::default().with_view_height(30.0).view_height(), 30.0);
    }
}
