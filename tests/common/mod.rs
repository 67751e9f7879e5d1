#![allow(dead_code, clippy::unwrap_used)]

use waymark::geometry::Position;
use waymark::math::ScreenPoint;
use waymark::persistence::MemoryStore;
use waymark::render::{HeadlessRenderer, Projection, Viewport};
use waymark::{EditorConfig, MapEditor};

pub type Editor = MapEditor<HeadlessRenderer, MemoryStore>;

/// Routes engine logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn editor_at(center: Position, zoom: f64) -> Editor {
    init_tracing();
    let renderer = HeadlessRenderer::new(Viewport::new(center, zoom, 800.0, 600.0));
    MapEditor::new(renderer, MemoryStore::new(), EditorConfig::default()).unwrap()
}

/// Screen position of `p` in the editor's current view.
pub fn screen(editor: &Editor, p: Position) -> ScreenPoint {
    editor.renderer().unwrap().project(&p).unwrap()
}

pub fn camera_enabled(editor: &Editor) -> bool {
    editor.renderer().unwrap().camera_enabled()
}

pub fn primitive_count(editor: &Editor) -> usize {
    editor.renderer().unwrap().primitive_count()
}
