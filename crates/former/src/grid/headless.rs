//! A virtualized grid without rendering.
//!
//! [`HeadlessGrid`] implements the full [`GridWidget`] contract: reuse pools
//! per display type, a viewport that only materializes what intersects it,
//! recycling of instances that leave the viewport, visual selection and a
//! log of reload requests. Hosts drive it with [`HeadlessGrid::layout`],
//! [`HeadlessGrid::scroll_to`] and [`HeadlessGrid::tap`] the way a real
//! widget would be driven by its event loop.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

use former_core::logging::{span_names, targets};
use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;

use super::{
    CellKey, GridDataSource, GridDelegate, GridError, GridWidget, RowAnimation, SeparatorStyle,
    ViewKey,
};
use crate::cell::{FormCell, FormView};
use crate::model::{CellType, DisplayTypeId, IndexPath, ViewType};

/// Configuration for a [`HeadlessGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessGridConfig {
    viewport_height: f32,
    max_pool_size: usize,
}

impl Default for HeadlessGridConfig {
    fn default() -> Self {
        Self {
            viewport_height: 480.0,
            max_pool_size: 16,
        }
    }
}

impl HeadlessGridConfig {
    /// Sets the visible height of the grid.
    pub fn with_viewport_height(mut self, viewport_height: f32) -> Self {
        self.viewport_height = viewport_height.max(0.0);
        self
    }

    /// Sets how many recycled instances are kept per display type.
    pub fn with_max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    /// The visible height of the grid.
    #[inline]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// How many recycled instances are kept per display type.
    #[inline]
    pub fn max_pool_size(&self) -> usize {
        self.max_pool_size
    }
}

/// A reload the grid was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadRequest {
    /// A partial reload of the listed sections.
    Sections {
        sections: Vec<usize>,
        animation: RowAnimation,
    },
    /// A full reload.
    All,
}

struct CellSlot {
    type_id: DisplayTypeId,
    cell: Box<dyn FormCell>,
}

struct ViewSlot {
    type_id: DisplayTypeId,
    view: Box<dyn FormView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Item {
    Header(usize),
    Row(IndexPath),
    Footer(usize),
}

struct Placed {
    item: Item,
    y: f32,
    height: f32,
}

#[derive(Default)]
struct GridState {
    cell_types: HashMap<DisplayTypeId, CellType>,
    view_types: HashMap<DisplayTypeId, ViewType>,
    cell_pool: HashMap<DisplayTypeId, Vec<Box<dyn FormCell>>>,
    view_pool: HashMap<DisplayTypeId, Vec<Box<dyn FormView>>>,
    cells: SlotMap<CellKey, CellSlot>,
    views: SlotMap<ViewKey, ViewSlot>,
    visible_cells: BTreeMap<IndexPath, CellKey>,
    visible_headers: BTreeMap<usize, ViewKey>,
    visible_footers: BTreeMap<usize, ViewKey>,
    highlighted: Option<IndexPath>,
    separator_style: SeparatorStyle,
    reload_requests: Vec<ReloadRequest>,
    scroll_offset: f32,
    content_height: f32,
    instances_created: usize,
    instances_reused: usize,
}

impl GridState {
    fn recycle_cell(&mut self, key: CellKey, max_pool_size: usize) {
        let Some(CellSlot { type_id, mut cell }) = self.cells.remove(key) else {
            return;
        };
        cell.prepare_for_reuse();
        let pool = self.cell_pool.entry(type_id).or_default();
        if pool.len() < max_pool_size {
            pool.push(cell);
        }
    }

    fn recycle_view(&mut self, key: ViewKey, max_pool_size: usize) {
        let Some(ViewSlot { type_id, mut view }) = self.views.remove(key) else {
            return;
        };
        view.prepare_for_reuse();
        let pool = self.view_pool.entry(type_id).or_default();
        if pool.len() < max_pool_size {
            pool.push(view);
        }
    }

    fn recycle_where(
        &mut self,
        max_pool_size: usize,
        keep_row: impl Fn(&IndexPath) -> bool,
        keep_header: impl Fn(&usize) -> bool,
        keep_footer: impl Fn(&usize) -> bool,
    ) {
        let cells = drain_unwanted(&mut self.visible_cells, keep_row);
        let mut views = drain_unwanted(&mut self.visible_headers, keep_header);
        views.extend(drain_unwanted(&mut self.visible_footers, keep_footer));

        for key in cells {
            self.recycle_cell(key, max_pool_size);
        }
        for key in views {
            self.recycle_view(key, max_pool_size);
        }
    }

    fn is_visible(&self, item: Item) -> bool {
        match item {
            Item::Header(section) => self.visible_headers.contains_key(&section),
            Item::Row(index_path) => self.visible_cells.contains_key(&index_path),
            Item::Footer(section) => self.visible_footers.contains_key(&section),
        }
    }
}

fn drain_unwanted<K: Ord, V: Copy>(map: &mut BTreeMap<K, V>, keep: impl Fn(&K) -> bool) -> Vec<V> {
    let mut removed = Vec::new();
    map.retain(|k, v| {
        let wanted = keep(k);
        if !wanted {
            removed.push(*v);
        }
        wanted
    });
    removed
}

fn clamp_offset(offset: f32, content_height: f32, viewport_height: f32) -> f32 {
    let max_offset = (content_height - viewport_height).max(0.0);
    offset.clamp(0.0, max_offset)
}

fn measure(data_source: &dyn GridDataSource, delegate: &dyn GridDelegate) -> Vec<Placed> {
    let mut placed = Vec::new();
    let mut y = 0.0;
    let mut place = |item: Item, height: f32| {
        let height = height.max(0.0);
        placed.push(Placed { item, y, height });
        y += height;
    };

    for section in 0..data_source.number_of_sections() {
        place(Item::Header(section), delegate.header_height(section));
        for row in 0..data_source.number_of_rows(section) {
            let index_path = IndexPath::new(section, row);
            place(Item::Row(index_path), delegate.row_height(index_path));
        }
        place(Item::Footer(section), delegate.footer_height(section));
    }
    placed
}

/// A virtualized grid that tracks layout and instances but draws nothing.
///
/// The grid holds its data source and delegate weakly and never holds its
/// internal lock while calling into them. Closures passed to
/// [`GridWidget::with_cell`] and [`GridWidget::with_header_footer`] run
/// under that lock and must not call back into the grid.
///
/// # Example
///
/// ```
/// use former::grid::{HeadlessGrid, HeadlessGridConfig};
///
/// let grid = HeadlessGrid::new(HeadlessGridConfig::default().with_viewport_height(200.0));
/// grid.layout();
/// assert!(grid.visible_index_paths().is_empty());
/// ```
pub struct HeadlessGrid {
    config: HeadlessGridConfig,
    state: Mutex<GridState>,
    data_source: RwLock<Option<Weak<dyn GridDataSource>>>,
    delegate: RwLock<Option<Weak<dyn GridDelegate>>>,
}

impl Default for HeadlessGrid {
    fn default() -> Self {
        Self::new(HeadlessGridConfig::default())
    }
}

impl HeadlessGrid {
    /// Creates an empty grid.
    pub fn new(config: HeadlessGridConfig) -> Self {
        Self {
            config,
            state: Mutex::new(GridState::default()),
            data_source: RwLock::new(None),
            delegate: RwLock::new(None),
        }
    }

    /// The grid's configuration.
    pub fn config(&self) -> &HeadlessGridConfig {
        &self.config
    }

    fn data_source(&self) -> Option<Arc<dyn GridDataSource>> {
        self.data_source.read().as_ref().and_then(Weak::upgrade)
    }

    fn delegate(&self) -> Option<Arc<dyn GridDelegate>> {
        self.delegate.read().as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if a live data source is installed.
    pub fn has_data_source(&self) -> bool {
        self.data_source().is_some()
    }

    /// Returns `true` if a live delegate is installed.
    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Measures the content, recycles instances outside the viewport and
    /// materializes the ones that entered it.
    ///
    /// Does nothing until both a data source and a delegate are installed.
    pub fn layout(&self) {
        let _span = tracing::debug_span!(target: targets::GRID, span_names::LAYOUT).entered();
        let (Some(data_source), Some(delegate)) = (self.data_source(), self.delegate()) else {
            tracing::trace!(target: targets::GRID, "no data source or delegate, skipping layout");
            return;
        };

        let placed = measure(data_source.as_ref(), delegate.as_ref());
        let content_height = placed.last().map_or(0.0, |p| p.y + p.height);
        let rows: BTreeSet<IndexPath> = placed
            .iter()
            .filter_map(|p| match p.item {
                Item::Row(index_path) => Some(index_path),
                _ => None,
            })
            .collect();

        let visible: Vec<Item> = {
            let mut state = self.state.lock();
            state.content_height = content_height;
            state.scroll_offset =
                clamp_offset(state.scroll_offset, content_height, self.config.viewport_height);
            if state.highlighted.is_some_and(|path| !rows.contains(&path)) {
                state.highlighted = None;
            }

            let start = state.scroll_offset;
            let end = start + self.config.viewport_height;
            let visible: Vec<Item> = placed
                .iter()
                .filter(|p| p.height > 0.0 && p.y < end && p.y + p.height > start)
                .map(|p| p.item)
                .collect();

            let items: BTreeSet<Item> = visible.iter().copied().collect();
            state.recycle_where(
                self.config.max_pool_size,
                |&path| items.contains(&Item::Row(path)),
                |&section| items.contains(&Item::Header(section)),
                |&section| items.contains(&Item::Footer(section)),
            );
            visible
                .into_iter()
                .filter(|&item| !state.is_visible(item))
                .collect()
        };

        for item in visible {
            self.materialize(data_source.as_ref(), item);
        }
        tracing::debug!(
            target: targets::GRID,
            content_height,
            visible = self.state.lock().visible_cells.len(),
            "layout complete"
        );
    }

    fn materialize(&self, data_source: &dyn GridDataSource, item: Item) {
        match item {
            Item::Row(index_path) => match data_source.cell_for_row(self, index_path) {
                Ok(key) => {
                    self.state.lock().visible_cells.insert(index_path, key);
                }
                Err(err) => {
                    tracing::warn!(target: targets::GRID, %index_path, %err, "failed to materialize cell");
                }
            },
            Item::Header(section) => match data_source.view_for_header(self, section) {
                Ok(key) => {
                    self.state.lock().visible_headers.insert(section, key);
                }
                Err(err) => {
                    tracing::warn!(target: targets::GRID, section, %err, "failed to materialize header");
                }
            },
            Item::Footer(section) => match data_source.view_for_footer(self, section) {
                Ok(key) => {
                    self.state.lock().visible_footers.insert(section, key);
                }
                Err(err) => {
                    tracing::warn!(target: targets::GRID, section, %err, "failed to materialize footer");
                }
            },
        }
    }

    /// Simulates the user tapping the row at `index_path`.
    ///
    /// The delegate may veto or redirect the selection. Returns the row that
    /// ended up highlighted, or `None` if the row does not exist or the
    /// selection was vetoed.
    pub fn tap(&self, index_path: IndexPath) -> Option<IndexPath> {
        let data_source = self.data_source()?;
        let exists = index_path.section() < data_source.number_of_sections()
            && index_path.row() < data_source.number_of_rows(index_path.section());
        if !exists {
            tracing::warn!(target: targets::GRID, %index_path, "tap outside of content");
            return None;
        }

        let delegate = self.delegate();
        let target = match &delegate {
            Some(delegate) => delegate.will_select_row(self, index_path)?,
            None => index_path,
        };
        self.state.lock().highlighted = Some(target);
        tracing::debug!(target: targets::GRID, %target, "row selected");

        if let Some(delegate) = &delegate {
            delegate.did_select_row(self, target);
        }
        Some(target)
    }

    /// Scrolls to `offset`, clamped to the content measured by the last
    /// layout, then lays out again. The delegate is always told.
    pub fn scroll_to(&self, offset: f32) {
        {
            let mut state = self.state.lock();
            state.scroll_offset =
                clamp_offset(offset, state.content_height, self.config.viewport_height);
        }
        if let Some(delegate) = self.delegate() {
            delegate.did_scroll(self);
        }
        self.layout();
    }

    /// Scrolls by `delta` relative to the current offset.
    pub fn scroll_by(&self, delta: f32) {
        let offset = self.scroll_offset() + delta;
        self.scroll_to(offset);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// The visually selected row.
    pub fn highlighted_index_path(&self) -> Option<IndexPath> {
        self.state.lock().highlighted
    }

    /// The built-in separator decoration.
    pub fn separator_style(&self) -> SeparatorStyle {
        self.state.lock().separator_style
    }

    /// Every reload request received, oldest first.
    pub fn reload_requests(&self) -> Vec<ReloadRequest> {
        self.state.lock().reload_requests.clone()
    }

    /// Rows that currently have a live cell, in order.
    pub fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.state.lock().visible_cells.keys().copied().collect()
    }

    /// The key of the live cell displaying `index_path`.
    pub fn cell_key_at(&self, index_path: IndexPath) -> Option<CellKey> {
        self.state.lock().visible_cells.get(&index_path).copied()
    }

    /// The key of the live header view of `section`.
    pub fn header_key(&self, section: usize) -> Option<ViewKey> {
        self.state.lock().visible_headers.get(&section).copied()
    }

    /// The key of the live footer view of `section`.
    pub fn footer_key(&self, section: usize) -> Option<ViewKey> {
        self.state.lock().visible_footers.get(&section).copied()
    }

    /// Runs `f` on the live cell at `index_path` if it is a `T`.
    pub fn with_cell_at<T: FormCell, R>(
        &self,
        index_path: IndexPath,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut state = self.state.lock();
        let key = *state.visible_cells.get(&index_path)?;
        let slot = state.cells.get_mut(key)?;
        slot.cell.as_mut().downcast_mut::<T>().map(f)
    }

    /// Runs `f` on the live header view of `section` if it is a `T`.
    pub fn with_header_at<T: FormView, R>(&self, section: usize, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.state.lock();
        let key = *state.visible_headers.get(&section)?;
        let slot = state.views.get_mut(key)?;
        slot.view.as_mut().downcast_mut::<T>().map(f)
    }

    /// Runs `f` on the live footer view of `section` if it is a `T`.
    pub fn with_footer_at<T: FormView, R>(&self, section: usize, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.state.lock();
        let key = *state.visible_footers.get(&section)?;
        let slot = state.views.get_mut(key)?;
        slot.view.as_mut().downcast_mut::<T>().map(f)
    }

    /// Returns `true` if `id` is registered as a cell type.
    pub fn is_cell_registered(&self, id: DisplayTypeId) -> bool {
        self.state.lock().cell_types.contains_key(&id)
    }

    /// Returns `true` if `id` is registered as a header/footer type.
    pub fn is_header_footer_registered(&self, id: DisplayTypeId) -> bool {
        self.state.lock().view_types.contains_key(&id)
    }

    /// The number of recycled cells of type `id` waiting for reuse.
    pub fn pooled_cell_count(&self, id: DisplayTypeId) -> usize {
        self.state.lock().cell_pool.get(&id).map_or(0, Vec::len)
    }

    /// The number of cells currently in the arena.
    pub fn live_cell_count(&self) -> usize {
        self.state.lock().cells.len()
    }

    /// How many cell and view instances were constructed.
    pub fn instances_created(&self) -> usize {
        self.state.lock().instances_created
    }

    /// How many dequeues were served from a reuse pool.
    pub fn instances_reused(&self) -> usize {
        self.state.lock().instances_reused
    }

    /// The current scroll offset.
    pub fn scroll_offset(&self) -> f32 {
        self.state.lock().scroll_offset
    }

    /// The total content height measured by the last layout.
    pub fn content_height(&self) -> f32 {
        self.state.lock().content_height
    }
}

impl GridWidget for HeadlessGrid {
    fn register_reusable_cell(&self, cell_type: &CellType) {
        let mut state = self.state.lock();
        if !state.cell_types.contains_key(&cell_type.id()) {
            tracing::trace!(target: targets::GRID, id = %cell_type.id(), "registered cell type");
            state.cell_types.insert(cell_type.id(), cell_type.clone());
        }
    }

    fn register_reusable_header_footer(&self, view_type: &ViewType) {
        let mut state = self.state.lock();
        if !state.view_types.contains_key(&view_type.id()) {
            tracing::trace!(target: targets::GRID, id = %view_type.id(), "registered header/footer type");
            state.view_types.insert(view_type.id(), view_type.clone());
        }
    }

    fn dequeue_reusable_cell(
        &self,
        id: DisplayTypeId,
        index_path: IndexPath,
    ) -> std::result::Result<CellKey, GridError> {
        let cell_type = {
            let mut state = self.state.lock();
            if let Some(cell) = state.cell_pool.get_mut(&id).and_then(Vec::pop) {
                state.instances_reused += 1;
                tracing::trace!(target: targets::GRID, %id, %index_path, "reused cell");
                return Ok(state.cells.insert(CellSlot { type_id: id, cell }));
            }
            state
                .cell_types
                .get(&id)
                .cloned()
                .ok_or(GridError::UnregisteredCell(id))?
        };

        let cell = cell_type.instantiate();
        let mut state = self.state.lock();
        state.instances_created += 1;
        tracing::trace!(target: targets::GRID, %id, %index_path, "created cell");
        Ok(state.cells.insert(CellSlot { type_id: id, cell }))
    }

    fn dequeue_reusable_header_footer(&self, id: DisplayTypeId) -> std::result::Result<ViewKey, GridError> {
        let view_type = {
            let mut state = self.state.lock();
            if let Some(view) = state.view_pool.get_mut(&id).and_then(Vec::pop) {
                state.instances_reused += 1;
                return Ok(state.views.insert(ViewSlot { type_id: id, view }));
            }
            state
                .view_types
                .get(&id)
                .cloned()
                .ok_or(GridError::UnregisteredHeaderFooter(id))?
        };

        let view = view_type.instantiate();
        let mut state = self.state.lock();
        state.instances_created += 1;
        Ok(state.views.insert(ViewSlot { type_id: id, view }))
    }

    fn with_cell(&self, key: CellKey, f: &mut dyn FnMut(&mut dyn FormCell)) -> bool {
        let mut state = self.state.lock();
        match state.cells.get_mut(key) {
            Some(slot) => {
                f(slot.cell.as_mut());
                true
            }
            None => false,
        }
    }

    fn with_header_footer(&self, key: ViewKey, f: &mut dyn FnMut(&mut dyn FormView)) -> bool {
        let mut state = self.state.lock();
        match state.views.get_mut(key) {
            Some(slot) => {
                f(slot.view.as_mut());
                true
            }
            None => false,
        }
    }

    fn set_data_source(&self, data_source: Weak<dyn GridDataSource>) {
        *self.data_source.write() = Some(data_source);
    }

    fn set_delegate(&self, delegate: Weak<dyn GridDelegate>) {
        *self.delegate.write() = Some(delegate);
    }

    fn set_separator_style(&self, style: SeparatorStyle) {
        self.state.lock().separator_style = style;
    }

    fn reload_sections(&self, sections: &[usize], animation: RowAnimation) {
        {
            let mut state = self.state.lock();
            state.reload_requests.push(ReloadRequest::Sections {
                sections: sections.to_vec(),
                animation,
            });
            state.recycle_where(
                self.config.max_pool_size,
                |path| !sections.contains(&path.section()),
                |section| !sections.contains(section),
                |section| !sections.contains(section),
            );
        }
        tracing::debug!(target: targets::GRID, ?sections, ?animation, "reloading sections");
        self.layout();
    }

    fn reload_data(&self) {
        {
            let mut state = self.state.lock();
            state.reload_requests.push(ReloadRequest::All);
            state.recycle_where(self.config.max_pool_size, |_| false, |_| false, |_| false);
        }
        tracing::debug!(target: targets::GRID, "reloading all data");
        self.layout();
    }

    fn deselect_row(&self, index_path: IndexPath, animated: bool) {
        let mut state = self.state.lock();
        if state.highlighted == Some(index_path) {
            state.highlighted = None;
            tracing::debug!(target: targets::GRID, %index_path, animated, "row deselected");
        }
    }
}

impl fmt::Debug for HeadlessGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HeadlessGrid")
            .field("config", &self.config)
            .field("visible_cells", &state.visible_cells.len())
            .field("highlighted", &state.highlighted)
            .field("scroll_offset", &state.scroll_offset)
            .field("content_height", &state.content_height)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(HeadlessGrid: Send, Sync);
