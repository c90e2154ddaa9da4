//! Index paths for addressing rows in a sectioned form.
//!
//! An [`IndexPath`] names a row by its section and its row within that
//! section. Rows never store their own position; the path is supplied by the
//! grid at query time and is only meaningful against the current section
//! layout.

use std::fmt;

/// The position of a row: `(section, row)`.
///
/// Index paths order section-major, so sorting a list of paths yields
/// display order.
///
/// # Example
///
/// ```
/// use former::model::IndexPath;
///
/// let path = IndexPath::new(1, 2);
/// assert_eq!(path.section(), 1);
/// assert_eq!(path.row(), 2);
/// assert!(IndexPath::new(0, 9) < path);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    section: usize,
    row: usize,
}

impl IndexPath {
    /// Creates a new index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Returns the section component.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// Returns the row component.
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.row)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self::new(section, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let path = IndexPath::new(3, 7);
        assert_eq!(path.section(), 3);
        assert_eq!(path.row(), 7);
    }

    #[test]
    fn test_ordering_is_section_major() {
        let mut paths = vec![
            IndexPath::new(1, 0),
            IndexPath::new(0, 5),
            IndexPath::new(0, 1),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![IndexPath::new(0, 1), IndexPath::new(0, 5), IndexPath::new(1, 0)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexPath::from((2, 4)).to_string(), "2:4");
    }
}
