//! Coordinator configuration.

use crate::grid::SeparatorStyle;

/// Configuration applied when a [`Former`](crate::Former) attaches to a grid.
///
/// The defaults give the standard behavior: separators off (cells draw
/// their own dividers) and focus resigned whenever the grid scrolls.
///
/// # Example
///
/// ```
/// use former::FormerConfig;
/// use former::grid::SeparatorStyle;
///
/// let config = FormerConfig::new()
///     .with_separator_style(SeparatorStyle::SingleLine)
///     .with_resign_on_scroll(false);
/// assert_eq!(config.separator_style(), SeparatorStyle::SingleLine);
/// assert!(!config.resign_on_scroll());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormerConfig {
    separator_style: SeparatorStyle,
    resign_on_scroll: bool,
}

impl Default for FormerConfig {
    fn default() -> Self {
        Self {
            separator_style: SeparatorStyle::None,
            resign_on_scroll: true,
        }
    }
}

impl FormerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the separator style applied to the grid on attach.
    pub fn with_separator_style(mut self, style: SeparatorStyle) -> Self {
        self.separator_style = style;
        self
    }

    /// Sets whether scrolling resigns focus and clears the tracked selection.
    pub fn with_resign_on_scroll(mut self, resign: bool) -> Self {
        self.resign_on_scroll = resign;
        self
    }

    /// The separator style applied on attach.
    pub fn separator_style(&self) -> SeparatorStyle {
        self.separator_style
    }

    /// Whether scrolling resigns focus.
    pub fn resign_on_scroll(&self) -> bool {
        self.resign_on_scroll
    }
}
