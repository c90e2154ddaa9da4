//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use former::prelude::*;

/// A text-entry cell that holds focus once configured.
pub struct FocusCell {
    pub focused: bool,
    pub height: f32,
    pub configure_count: usize,
    resigns: Arc<AtomicUsize>,
}

impl FormCell for FocusCell {
    fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
        Some(self)
    }

    fn resign_first_responder(&mut self) -> bool {
        self.resigns.fetch_add(1, Ordering::SeqCst);
        std::mem::take(&mut self.focused)
    }

    fn prepare_for_reuse(&mut self) {
        self.focused = false;
    }
}

impl ConfigurableCell for FocusCell {
    fn configure(&mut self, row_former: &RowFormer) {
        self.height = row_former.row_height();
        self.focused = true;
        self.configure_count += 1;
    }
}

/// A cell without the configuration capability.
#[derive(Default)]
pub struct StaticCell;

impl FormCell for StaticCell {}

/// Counts resign requests across every [`FocusCell`] it creates.
#[derive(Clone, Default)]
pub struct ResignCounter(Arc<AtomicUsize>);

impl ResignCounter {
    pub fn cell_type(&self) -> CellType {
        let resigns = self.0.clone();
        CellType::with_factory(move || FocusCell {
            focused: false,
            height: 0.0,
            configure_count: 0,
            resigns: resigns.clone(),
        })
    }

    pub fn row(&self) -> RowFormer {
        RowFormer::new(self.cell_type())
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts invocations of a selection handler.
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    pub fn on(&self, row_former: RowFormer) -> RowFormer {
        let hits = self.0.clone();
        row_former.on_selected(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn static_section(rows: usize) -> SectionFormer {
    SectionFormer::new((0..rows).map(|_| RowFormer::of::<StaticCell>()))
}

pub fn grid(viewport_height: f32) -> Arc<HeadlessGrid> {
    Arc::new(HeadlessGrid::new(
        HeadlessGridConfig::default().with_viewport_height(viewport_height),
    ))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
