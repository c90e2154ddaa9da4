//! Section descriptors.

use std::ops::{Index, IndexMut};

use super::row::RowFormer;
use super::view::ViewFormer;

/// An ordered group of rows with a header and a footer.
///
/// Row order is display order. Counts are always computed from the row
/// sequence itself, never cached.
///
/// # Example
///
/// ```
/// use former::cell::FormCell;
/// use former::model::{RowFormer, SectionFormer, ViewFormer};
///
/// #[derive(Default)]
/// struct LabelCell;
/// impl FormCell for LabelCell {}
///
/// let section = SectionFormer::new([RowFormer::of::<LabelCell>(), RowFormer::of::<LabelCell>()])
///     .with_header(ViewFormer::default().with_view_height(24.0));
/// assert_eq!(section.number_of_row_formers(), 2);
/// assert_eq!(section.header_view_former().view_height(), 24.0);
/// ```
#[derive(Debug, Default)]
pub struct SectionFormer {
    row_formers: Vec<RowFormer>,
    header_view_former: ViewFormer,
    footer_view_former: ViewFormer,
}

impl SectionFormer {
    /// Creates a section containing `row_formers` in order.
    pub fn new(row_formers: impl IntoIterator<Item = RowFormer>) -> Self {
        Self {
            row_formers: row_formers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the header descriptor.
    pub fn with_header(mut self, header: ViewFormer) -> Self {
        self.header_view_former = header;
        self
    }

    /// Sets the footer descriptor.
    pub fn with_footer(mut self, footer: ViewFormer) -> Self {
        self.footer_view_former = footer;
        self
    }

    /// Appends a row.
    pub fn add_row_former(&mut self, row_former: RowFormer) -> &mut Self {
        self.row_formers.push(row_former);
        self
    }

    /// Appends rows in order.
    pub fn add_row_formers(&mut self, row_formers: impl IntoIterator<Item = RowFormer>) -> &mut Self {
        self.row_formers.extend(row_formers);
        self
    }

    /// Inserts a row at `index`, shifting later rows down.
    ///
    /// # Panics
    ///
    /// Panics if `index > number_of_row_formers()`.
    pub fn insert_row_former(&mut self, row_former: RowFormer, index: usize) -> &mut Self {
        assert!(
            index <= self.row_formers.len(),
            "Invalid row index {index}: section has {} rows",
            self.row_formers.len()
        );
        self.row_formers.insert(index, row_former);
        self
    }

    /// The number of rows.
    #[inline]
    pub fn number_of_row_formers(&self) -> usize {
        self.row_formers.len()
    }

    /// Returns `true` if the section has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_formers.is_empty()
    }

    /// The row at `index`, if any.
    pub fn row_former(&self, index: usize) -> Option<&RowFormer> {
        self.row_formers.get(index)
    }

    /// The row at `index`, if any.
    pub fn row_former_mut(&mut self, index: usize) -> Option<&mut RowFormer> {
        self.row_formers.get_mut(index)
    }

    /// All rows in display order.
    pub fn row_formers(&self) -> &[RowFormer] {
        &self.row_formers
    }

    pub(crate) fn row_formers_mut(&mut self) -> &mut [RowFormer] {
        &mut self.row_formers
    }

    /// The header descriptor.
    #[inline]
    pub fn header_view_former(&self) -> &ViewFormer {
        &self.header_view_former
    }

    /// The header descriptor.
    #[inline]
    pub fn header_view_former_mut(&mut self) -> &mut ViewFormer {
        &mut self.header_view_former
    }

    /// The footer descriptor.
    #[inline]
    pub fn footer_view_former(&self) -> &ViewFormer {
        &self.footer_view_former
    }

    /// The footer descriptor.
    #[inline]
    pub fn footer_view_former_mut(&mut self) -> &mut ViewFormer {
        &mut self.footer_view_former
    }
}

impl Index<usize> for SectionFormer {
    type Output = RowFormer;

    fn index(&self, index: usize) -> &RowFormer {
        &self.row_formers[index]
    }
}

impl IndexMut<usize> for SectionFormer {
    fn index_mut(&mut self, index: usize) -> &mut RowFormer {
        &mut self.row_formers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::FormCell;

    #[derive(Default)]
    struct PlainCell;
    impl FormCell for PlainCell {}

    fn row(height: f32) -> RowFormer {
        RowFormer::of::<PlainCell>().with_row_height(height)
    }

    #[test]
    fn test_row_count_tracks_sequence() {
        let mut section = SectionFormer::default();
        assert!(section.is_empty());

        section.add_row_former(row(1.0)).add_row_formers([row(2.0), row(3.0)]);
        assert_eq!(section.number_of_row_formers(), 3);
        assert_eq!(section[2].row_height(), 3.0);
    }

    #[test]
    fn test_insert_row_former() {
        let mut section = SectionFormer::new([row(1.0), row(3.0)]);
        section.insert_row_former(row(2.0), 1);

        let heights: Vec<f32> = section.row_formers().iter().map(RowFormer::row_height).collect();
        assert_eq!(heights, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "Invalid row index")]
    fn test_insert_row_former_out_of_bounds() {
        let mut section = SectionFormer::new([row(1.0)]);
        section.insert_row_former(row(2.0), 2);
    }

    #[test]
    fn test_row_former_lookup() {
        let mut section = SectionFormer::new([row(1.0)]);
        assert!(section.row_former(1).is_none());
        section.row_former_mut(0).expect("row").set_row_height(5.0);
        assert_eq!(section.row_former(0).map(RowFormer::row_height), Some(5.0));
    }
}
