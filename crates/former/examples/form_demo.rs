//! A sign-up form driven through a headless grid.
//!
//! Run with: RUST_LOG=former=debug cargo run -p former --example form_demo

use std::sync::Arc;

use former::prelude::*;
use tracing_subscriber::EnvFilter;

/// A single-line text input.
#[derive(Default)]
struct TextFieldCell {
    height: f32,
    editing: bool,
}

impl FormCell for TextFieldCell {
    fn configurable(&mut self) -> Option<&mut dyn ConfigurableCell> {
        Some(self)
    }

    fn resign_first_responder(&mut self) -> bool {
        std::mem::take(&mut self.editing)
    }

    fn prepare_for_reuse(&mut self) {
        self.editing = false;
    }
}

impl ConfigurableCell for TextFieldCell {
    fn configure(&mut self, row_former: &RowFormer) {
        self.height = row_former.row_height();
        self.editing = true;
    }
}

/// A tappable label without configuration.
#[derive(Default)]
struct ButtonCell;

impl FormCell for ButtonCell {}

/// A section title.
#[derive(Default)]
struct TitleView {
    height: f32,
}

impl FormView for TitleView {
    fn configurable(&mut self) -> Option<&mut dyn ConfigurableView> {
        Some(self)
    }
}

impl ConfigurableView for TitleView {
    fn configure(&mut self, view_former: &ViewFormer) {
        self.height = view_former.view_height();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let grid = Arc::new(HeadlessGrid::new(
        HeadlessGridConfig::default().with_viewport_height(320.0),
    ));
    let former = Former::new(&grid);

    former.selection_changed.connect(|path| match path {
        Some(path) => println!("tracking {path}"),
        None => println!("tracking nothing"),
    });

    let account = SectionFormer::new([
        RowFormer::of::<TextFieldCell>(),
        RowFormer::of::<TextFieldCell>(),
        RowFormer::of::<TextFieldCell>().with_row_height(56.0),
    ])
    .with_header(ViewFormer::of::<TitleView>().with_view_height(28.0));

    let submit = SectionFormer::new([RowFormer::of::<ButtonCell>().on_selected(|path| {
        println!("submit tapped at {path}");
    })]);

    former.add_section_former(account).add_section_former(submit);
    former.reload_former();
    println!("visible rows: {:?}", grid.visible_index_paths());

    for row in 0..3 {
        let path = IndexPath::new(0, row);
        if let Some(height) = grid.with_cell_at(path, |cell: &mut TextFieldCell| cell.height) {
            println!("{path} configured at height {height}");
        }
    }

    grid.tap(IndexPath::new(0, 0));
    grid.tap(IndexPath::new(0, 1));
    grid.scroll_by(40.0);
    println!("highlighted after scroll: {:?}", grid.highlighted_index_path());

    former.deselect_selected_cell(true);
    grid.tap(IndexPath::new(1, 0));
    former.deselect_selected_cell(true);

    let footer = SectionFormer::new([RowFormer::of::<ButtonCell>().with_row_height(80.0)]);
    former.reload_section_former(footer, 1, RowAnimation::Fade);
    println!(
        "content height {} after {} reloads, {} created, {} reused",
        grid.content_height(),
        grid.reload_requests().len(),
        grid.instances_created(),
        grid.instances_reused(),
    );
}
