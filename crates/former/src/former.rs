//! The form coordinator.
//!
//! [`Former`] owns the section descriptors of a form and answers a grid's
//! data-source and delegate callbacks from them. It is shared as
//! `Arc<Former>`; the grid only ever holds it weakly, and it only ever holds
//! the grid weakly.
//!
//! # Selection and focus
//!
//! At most one row is tracked as selected. Before the grid selects a row,
//! the previously tracked row is asked to resign input focus and the
//! tracking moves to the new row. Scrolling resigns focus and clears the
//! tracking but leaves the grid's own highlight alone; clearing that is an
//! explicit [`Former::deselect_selected_cell`].
//!
//! # Locking
//!
//! Descriptor state sits behind `parking_lot` locks. No lock is held while
//! calling out to code that may re-enter the coordinator: grid reload
//! requests, focus resignation, row selection handlers, and
//! `selection_changed` slots. Closures passed to
//! [`Former::with_section_former`] and friends do run under the lock and
//! must not call back into the coordinator.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use former_core::Signal;
use former_core::logging::{span_names, targets};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};

use crate::cell::{DefaultHeaderFooterView, FormCell, FormView};
use crate::config::FormerConfig;
use crate::error::Result;
use crate::grid::{CellKey, GridDataSource, GridDelegate, GridWidget, RowAnimation, ViewKey};
use crate::model::{
    CellType, DisplayTypeId, IndexPath, RowFormer, SectionFormer, ViewFormer, ViewType,
    resign_cell,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderFooter {
    Header,
    Footer,
}

impl HeaderFooter {
    fn of(self, section: &SectionFormer) -> &ViewFormer {
        match self {
            Self::Header => section.header_view_former(),
            Self::Footer => section.footer_view_former(),
        }
    }

    fn of_mut(self, section: &mut SectionFormer) -> &mut ViewFormer {
        match self {
            Self::Header => section.header_view_former_mut(),
            Self::Footer => section.footer_view_former_mut(),
        }
    }
}

/// Binds a list of section descriptors to a virtualized grid.
///
/// # Signals
///
/// - `selection_changed(Option<IndexPath>)`: Emitted whenever the tracked
///   selection changes, including when it is cleared.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use former::cell::FormCell;
/// use former::grid::{HeadlessGrid, HeadlessGridConfig};
/// use former::model::{RowFormer, SectionFormer};
/// use former::Former;
///
/// #[derive(Default)]
/// struct LabelCell;
/// impl FormCell for LabelCell {}
///
/// let grid = Arc::new(HeadlessGrid::new(HeadlessGridConfig::default()));
/// let former = Former::new(&grid);
/// former
///     .add_section_former(SectionFormer::new([RowFormer::of::<LabelCell>()]))
///     .add_section_former(SectionFormer::new([
///         RowFormer::of::<LabelCell>(),
///         RowFormer::of::<LabelCell>().on_selected(|path| println!("tapped {path}")),
///     ]));
/// former.reload_former();
///
/// assert_eq!(former.number_of_section_formers(), 2);
/// assert_eq!(grid.visible_index_paths().len(), 3);
/// ```
pub struct Former {
    grid: RwLock<Option<Weak<dyn GridWidget>>>,
    section_formers: RwLock<Vec<SectionFormer>>,
    selected_index_path: Mutex<Option<IndexPath>>,
    config: FormerConfig,

    /// Emitted whenever the tracked selection changes.
    pub selection_changed: Signal<Option<IndexPath>>,
}

impl Former {
    /// Creates a coordinator attached to `grid` with the default configuration.
    pub fn new<G: GridWidget + 'static>(grid: &Arc<G>) -> Arc<Self> {
        Self::with_config(grid, FormerConfig::default())
    }

    /// Creates a coordinator attached to `grid`.
    pub fn with_config<G: GridWidget + 'static>(grid: &Arc<G>, config: FormerConfig) -> Arc<Self> {
        let former = Self::detached_with_config(config);
        former.attach(grid);
        former
    }

    /// Creates a coordinator that is not attached to any grid.
    ///
    /// Every grid-directed call is a no-op until [`Former::attach`].
    pub fn detached() -> Arc<Self> {
        Self::detached_with_config(FormerConfig::default())
    }

    /// Creates an unattached coordinator with `config`.
    pub fn detached_with_config(config: FormerConfig) -> Arc<Self> {
        Arc::new(Self {
            grid: RwLock::new(None),
            section_formers: RwLock::new(Vec::new()),
            selected_index_path: Mutex::new(None),
            config,
            selection_changed: Signal::new(),
        })
    }

    /// The configuration applied on attach.
    pub fn config(&self) -> &FormerConfig {
        &self.config
    }

    // =========================================================================
    // Grid binding
    // =========================================================================

    /// Attaches to `grid`, replacing any previous grid.
    pub fn attach<G: GridWidget + 'static>(self: &Arc<Self>, grid: &Arc<G>) {
        let grid: Arc<dyn GridWidget> = grid.clone();
        self.attach_dyn(&grid);
    }

    /// Attaches to a type-erased grid, replacing any previous grid.
    ///
    /// Registers the baseline header/footer type, installs this coordinator
    /// as the grid's data source and delegate, and applies the configured
    /// separator style. Live instance keys from a previous grid are dropped
    /// and the tracked selection is cleared.
    pub fn attach_dyn(self: &Arc<Self>, grid: &Arc<dyn GridWidget>) {
        tracing::debug!(
            target: targets::FORMER,
            sections = self.number_of_section_formers(),
            "attaching to grid"
        );
        *self.grid.write() = Some(Arc::downgrade(grid));
        self.unbind_live_instances();
        self.set_selected_index_path(None);

        grid.register_reusable_header_footer(&ViewType::of::<DefaultHeaderFooterView>());
        let weak: Weak<Former> = Arc::downgrade(self);
        let data_source: Weak<dyn GridDataSource> = weak.clone();
        let delegate: Weak<dyn GridDelegate> = weak;
        grid.set_data_source(data_source);
        grid.set_delegate(delegate);
        grid.set_separator_style(self.config.separator_style());

        let types = DisplayTypes::collect(self.section_formers.read().iter());
        types.register(grid.as_ref());
    }

    /// The attached grid, if it is still alive.
    pub fn grid(&self) -> Option<Arc<dyn GridWidget>> {
        self.grid.read().as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if attached to a live grid.
    pub fn is_attached(&self) -> bool {
        self.grid().is_some()
    }

    /// Registers `T` with the attached grid's cell reuse pool.
    ///
    /// Row cell types are registered automatically when sections are added;
    /// this is for types the host will dequeue some other way.
    pub fn register_cell_type<T: FormCell + Default>(&self) {
        self.register_cell(&CellType::of::<T>());
    }

    /// Registers `cell_type` with the attached grid.
    pub fn register_cell(&self, cell_type: &CellType) {
        if let Some(grid) = self.grid() {
            grid.register_reusable_cell(cell_type);
        }
    }

    /// Registers `T` with the attached grid's header/footer reuse pool.
    pub fn register_view_type<T: FormView + Default>(&self) {
        self.register_view(&ViewType::of::<T>());
    }

    /// Registers `view_type` with the attached grid.
    pub fn register_view(&self, view_type: &ViewType) {
        if let Some(grid) = self.grid() {
            grid.register_reusable_header_footer(view_type);
        }
    }

    // =========================================================================
    // Descriptors
    // =========================================================================

    /// The number of sections.
    pub fn number_of_section_formers(&self) -> usize {
        self.section_formers.read().len()
    }

    /// The number of rows in `section`.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn number_of_row_formers(&self, section: usize) -> usize {
        self.section_formers.read()[section].number_of_row_formers()
    }

    /// Runs `f` on the section at `section`, if it exists.
    ///
    /// `f` runs under the descriptor lock and must not call back into this
    /// coordinator.
    pub fn with_section_former<R>(
        &self,
        section: usize,
        f: impl FnOnce(&SectionFormer) -> R,
    ) -> Option<R> {
        self.section_formers.read().get(section).map(f)
    }

    /// Runs `f` on the row at `index_path`, if it exists.
    ///
    /// `f` runs under the descriptor lock and must not call back into this
    /// coordinator.
    pub fn with_row_former<R>(&self, index_path: IndexPath, f: impl FnOnce(&RowFormer) -> R) -> Option<R> {
        let sections = self.section_formers.read();
        sections
            .get(index_path.section())
            .and_then(|section| section.row_former(index_path.row()))
            .map(f)
    }

    /// Runs `f` on the row at `index_path` mutably, if it exists.
    ///
    /// Changes become visible on the grid's next re-query, e.g. after
    /// [`Former::reload_former`].
    pub fn with_row_former_mut<R>(
        &self,
        index_path: IndexPath,
        f: impl FnOnce(&mut RowFormer) -> R,
    ) -> Option<R> {
        let mut sections = self.section_formers.write();
        sections
            .get_mut(index_path.section())
            .and_then(|section| section.row_former_mut(index_path.row()))
            .map(f)
    }

    /// Appends a section. Returns `self` for chaining.
    pub fn add_section_former(&self, section_former: SectionFormer) -> &Self {
        self.add_section_formers([section_former])
    }

    /// Appends sections in order. Returns `self` for chaining.
    pub fn add_section_formers(&self, section_formers: impl IntoIterator<Item = SectionFormer>) -> &Self {
        let section_formers: Vec<SectionFormer> = section_formers.into_iter().collect();
        self.register_display_types(&section_formers);

        let added = section_formers.len();
        let count = {
            let mut sections = self.section_formers.write();
            sections.extend(section_formers);
            sections.len()
        };
        tracing::debug!(target: targets::FORMER, added, count, "added section formers");
        self
    }

    /// Replaces the section at `section` and reloads only that section.
    ///
    /// # Panics
    ///
    /// Panics if `section >= number_of_section_formers()`.
    pub fn reload_section_former(
        &self,
        section_former: SectionFormer,
        section: usize,
        animation: RowAnimation,
    ) {
        self.reload_section_formers(vec![section_former], &[section], animation);
    }

    /// Replaces the section at each index in `sections` with the descriptor
    /// at the same position in `section_formers`, then reloads those
    /// sections.
    ///
    /// Every replacement is applied before the grid is asked to reload, so
    /// its re-query observes the new descriptors only.
    ///
    /// # Panics
    ///
    /// Panics if the two lengths differ or any index is out of range. Nothing
    /// is replaced in that case.
    pub fn reload_section_formers(
        &self,
        section_formers: Vec<SectionFormer>,
        sections: &[usize],
        animation: RowAnimation,
    ) {
        assert_eq!(
            section_formers.len(),
            sections.len(),
            "Number of section formers and number of sections does not correspond"
        );
        let count = self.number_of_section_formers();
        for &section in sections {
            assert!(
                section < count,
                "Invalid section index {section}: former has {count} sections"
            );
        }

        let _span = tracing::debug_span!(target: targets::FORMER, span_names::RELOAD, ?sections).entered();
        self.register_display_types(&section_formers);
        {
            let mut current = self.section_formers.write();
            for (section_former, &section) in section_formers.into_iter().zip(sections) {
                current[section] = section_former;
            }
        }
        tracing::debug!(target: targets::FORMER, ?animation, "replaced section formers");

        if sections.is_empty() {
            return;
        }
        if let Some(grid) = self.grid() {
            grid.reload_sections(sections, animation);
        }
    }

    /// Asks the grid to re-query all structure and content.
    pub fn reload_former(&self) {
        match self.grid() {
            Some(grid) => {
                tracing::debug!(target: targets::FORMER, "reloading former");
                grid.reload_data();
            }
            None => {
                tracing::trace!(target: targets::FORMER, "no grid attached, reload ignored");
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The tracked selection, if any.
    pub fn selected_index_path(&self) -> Option<IndexPath> {
        *self.selected_index_path.lock()
    }

    /// Clears the grid's visual selection at the tracked row and stops
    /// tracking it. Does nothing when no row is tracked.
    pub fn deselect_selected_cell(&self, animated: bool) {
        let Some(index_path) = self.selected_index_path() else {
            return;
        };
        if let Some(grid) = self.grid() {
            grid.deselect_row(index_path, animated);
        }
        self.set_selected_index_path(None);
    }

    /// Asks the tracked row's cell to resign input focus and stops tracking
    /// it. The grid's visual selection is left as is.
    pub fn resign_selected_cell_first_responder(&self) {
        let grid = self.grid();
        self.resign_selected_on(grid.as_deref());
    }

    fn resign_selected_on(&self, grid: Option<&dyn GridWidget>) {
        let Some(index_path) = self.selected_index_path() else {
            return;
        };
        // Cells may write back to their row while resigning: no descriptor lock here.
        let key = self.with_row_former(index_path, RowFormer::cell).flatten();
        let resigned = match (grid, key) {
            (Some(grid), Some(key)) => resign_cell(grid, key),
            _ => false,
        };
        tracing::trace!(target: targets::SELECTION, %index_path, resigned, "resigned selected cell");
        self.set_selected_index_path(None);
    }

    fn set_selected_index_path(&self, index_path: Option<IndexPath>) {
        let previous = std::mem::replace(&mut *self.selected_index_path.lock(), index_path);
        if previous != index_path {
            tracing::trace!(
                target: targets::SELECTION,
                ?previous,
                current = ?index_path,
                "selection changed"
            );
            self.selection_changed.emit(index_path);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn register_display_types(&self, section_formers: &[SectionFormer]) {
        if let Some(grid) = self.grid() {
            DisplayTypes::collect(section_formers.iter()).register(grid.as_ref());
        }
    }

    fn unbind_live_instances(&self) {
        for section in self.section_formers.write().iter_mut() {
            section.header_view_former_mut().unbind_view();
            section.footer_view_former_mut().unbind_view();
            for row_former in section.row_formers_mut() {
                row_former.unbind_cell();
            }
        }
    }

    fn view_for(&self, grid: &dyn GridWidget, section: usize, kind: HeaderFooter) -> Result<ViewKey> {
        let view_type = kind.of(&self.section_formers.read()[section]).view_type().id();
        let key = grid
            .dequeue_reusable_header_footer(view_type)
            .inspect_err(|err| {
                tracing::warn!(target: targets::MATERIALIZE, section, ?kind, %err, "failed to dequeue view");
            })?;

        let mut sections = self.section_formers.write();
        kind.of_mut(&mut sections[section]).bind_view(key);
        let sections = RwLockWriteGuard::downgrade(sections);
        let view_former = kind.of(&sections[section]);

        let mut configured = false;
        grid.with_header_footer(key, &mut |view: &mut dyn FormView| {
            if let Some(configurable) = view.configurable() {
                configurable.configure(view_former);
                configured = true;
            }
        });
        tracing::trace!(target: targets::MATERIALIZE, section, ?kind, ?key, configured, "materialized view");
        Ok(key)
    }
}

impl GridDataSource for Former {
    fn number_of_sections(&self) -> usize {
        self.number_of_section_formers()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.number_of_row_formers(section)
    }

    fn cell_for_row(&self, grid: &dyn GridWidget, index_path: IndexPath) -> Result<CellKey> {
        let (section, row) = (index_path.section(), index_path.row());
        let cell_type = self.section_formers.read()[section][row].cell_type().id();
        let key = grid
            .dequeue_reusable_cell(cell_type, index_path)
            .inspect_err(|err| {
                tracing::warn!(target: targets::MATERIALIZE, %index_path, %err, "failed to dequeue cell");
            })?;

        let mut sections = self.section_formers.write();
        sections[section][row].bind_cell(key);
        let sections = RwLockWriteGuard::downgrade(sections);
        let row_former = &sections[section][row];

        let mut configured = false;
        grid.with_cell(key, &mut |cell: &mut dyn FormCell| {
            if let Some(configurable) = cell.configurable() {
                configurable.configure(row_former);
                configured = true;
            }
        });
        tracing::trace!(target: targets::MATERIALIZE, %index_path, ?key, configured, "materialized cell");
        Ok(key)
    }

    fn view_for_header(&self, grid: &dyn GridWidget, section: usize) -> Result<ViewKey> {
        self.view_for(grid, section, HeaderFooter::Header)
    }

    fn view_for_footer(&self, grid: &dyn GridWidget, section: usize) -> Result<ViewKey> {
        self.view_for(grid, section, HeaderFooter::Footer)
    }

    fn can_edit_row(&self, _index_path: IndexPath) -> bool {
        false
    }

    fn can_move_row(&self, _index_path: IndexPath) -> bool {
        false
    }
}

impl GridDelegate for Former {
    fn row_height(&self, index_path: IndexPath) -> f32 {
        self.section_formers.read()[index_path.section()][index_path.row()].row_height()
    }

    fn header_height(&self, section: usize) -> f32 {
        self.section_formers.read()[section].header_view_former().view_height()
    }

    fn footer_height(&self, section: usize) -> f32 {
        self.section_formers.read()[section].footer_view_former().view_height()
    }

    fn will_select_row(&self, grid: &dyn GridWidget, index_path: IndexPath) -> Option<IndexPath> {
        self.resign_selected_on(Some(grid));
        self.set_selected_index_path(Some(index_path));
        Some(index_path)
    }

    fn did_select_row(&self, _grid: &dyn GridWidget, index_path: IndexPath) {
        let handler = self
            .with_row_former(index_path, RowFormer::selected_handler)
            .flatten();
        if let Some(handler) = handler {
            tracing::trace!(target: targets::SELECTION, %index_path, "invoking selected handler");
            handler(index_path);
        }
    }

    fn did_scroll(&self, grid: &dyn GridWidget) {
        if self.config.resign_on_scroll() {
            self.resign_selected_on(Some(grid));
        }
    }
}

impl fmt::Debug for Former {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Former")
            .field("sections", &self.number_of_section_formers())
            .field("attached", &self.is_attached())
            .field("selected_index_path", &self.selected_index_path())
            .field("config", &self.config)
            .finish()
    }
}

/// Distinct cell and view types used by a set of sections.
#[derive(Default)]
struct DisplayTypes {
    cells: HashMap<DisplayTypeId, CellType>,
    views: HashMap<DisplayTypeId, ViewType>,
}

impl DisplayTypes {
    fn collect<'a>(sections: impl Iterator<Item = &'a SectionFormer>) -> Self {
        let mut types = Self::default();
        for section in sections {
            for view_former in [section.header_view_former(), section.footer_view_former()] {
                let view_type = view_former.view_type();
                types.views.entry(view_type.id()).or_insert_with(|| view_type.clone());
            }
            for row_former in section.row_formers() {
                let cell_type = row_former.cell_type();
                types.cells.entry(cell_type.id()).or_insert_with(|| cell_type.clone());
            }
        }
        types
    }

    fn register(&self, grid: &dyn GridWidget) {
        for cell_type in self.cells.values() {
            grid.register_reusable_cell(cell_type);
        }
        for view_type in self.views.values() {
            grid.register_reusable_header_footer(view_type);
        }
    }
}

static_assertions::assert_impl_all!(Former: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct PlainCell;
    impl FormCell for PlainCell {}

    fn section(rows: usize) -> SectionFormer {
        SectionFormer::new((0..rows).map(|_| RowFormer::of::<PlainCell>()))
    }

    #[test]
    fn test_add_section_formers_preserves_order() {
        let former = Former::detached();
        former
            .add_section_former(section(1))
            .add_section_formers([section(2), section(3)])
            .add_section_former(section(4));

        assert_eq!(former.number_of_section_formers(), 4);
        let sizes: Vec<usize> = (0..4).map(|s| former.number_of_row_formers(s)).collect();
        assert_eq!(sizes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_heights_are_pure_lookups() {
        let former = Former::detached();
        former.add_section_former(
            SectionFormer::new([
                RowFormer::of::<PlainCell>().with_row_height(30.0),
                RowFormer::of::<PlainCell>().with_row_height(70.0),
            ])
            .with_header(ViewFormer::default().with_view_height(22.0))
            .with_footer(ViewFormer::default().with_view_height(0.0)),
        );

        assert_eq!(former.row_height(IndexPath::new(0, 0)), 30.0);
        assert_eq!(former.row_height(IndexPath::new(0, 1)), 70.0);
        assert_eq!(former.header_height(0), 22.0);
        assert_eq!(former.footer_height(0), 0.0);
    }

    #[test]
    fn test_reload_section_former_replaces_in_place() {
        let former = Former::detached();
        former.add_section_formers([section(1), section(2)]);
        assert_eq!(former.number_of_rows(1), 2);

        former.reload_section_former(section(3), 1, RowAnimation::None);
        assert_eq!(former.number_of_sections(), 2);
        assert_eq!(former.number_of_rows(0), 1);
        assert_eq!(former.number_of_rows(1), 3);
    }

    #[test]
    #[should_panic(expected = "Invalid section index")]
    fn test_reload_section_former_at_count_panics() {
        let former = Former::detached();
        former.add_section_formers([section(1), section(2)]);
        former.reload_section_former(section(1), 2, RowAnimation::None);
    }

    #[test]
    #[should_panic(expected = "does not correspond")]
    fn test_reload_section_formers_length_mismatch_panics() {
        let former = Former::detached();
        former.add_section_formers([section(1), section(1), section(1)]);
        former.reload_section_formers(vec![section(2), section(2)], &[0, 1, 2], RowAnimation::Fade);
    }

    #[test]
    fn test_failed_batch_reload_replaces_nothing() {
        let former = Former::detached();
        former.add_section_formers([section(1), section(1)]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            former.reload_section_formers(vec![section(5), section(5)], &[0, 7], RowAnimation::None);
        }));
        assert!(result.is_err());
        assert_eq!(former.number_of_row_formers(0), 1);
    }

    #[test]
    fn test_edit_and_move_are_refused() {
        let former = Former::detached();
        former.add_section_former(section(1));
        assert!(!former.can_edit_row(IndexPath::new(0, 0)));
        assert!(!former.can_move_row(IndexPath::new(0, 0)));
    }

    #[test]
    fn test_detached_grid_calls_are_noops() {
        let former = Former::detached();
        former.add_section_former(section(2));
        assert!(!former.is_attached());

        former.reload_former();
        former.reload_section_former(section(1), 0, RowAnimation::Automatic);
        former.resign_selected_cell_first_responder();
        former.deselect_selected_cell(true);
        assert_eq!(former.selected_index_path(), None);
    }

    #[test]
    fn test_selection_changed_signal() {
        let former = Former::detached();
        former.add_section_former(section(2));
        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = changes.clone();
        former.selection_changed.connect(move |_| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Tracking changes without a grid still notifies.
        former.set_selected_index_path(Some(IndexPath::new(0, 1)));
        former.set_selected_index_path(Some(IndexPath::new(0, 1)));
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        former.resign_selected_cell_first_responder();
        assert_eq!(former.selected_index_path(), None);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_row_former_access() {
        let former = Former::detached();
        former.add_section_former(section(1));

        assert_eq!(
            former.with_row_former(IndexPath::new(0, 0), RowFormer::row_height),
            Some(crate::model::DEFAULT_ROW_HEIGHT)
        );
        assert!(former.with_row_former(IndexPath::new(0, 1), |_| ()).is_none());
        assert!(former.with_section_former(3, |_| ()).is_none());

        former.with_row_former_mut(IndexPath::new(0, 0), |row| row.set_row_height(12.0));
        assert_eq!(former.row_height(IndexPath::new(0, 0)), 12.0);
    }
}
