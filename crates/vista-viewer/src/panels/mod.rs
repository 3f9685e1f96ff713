//! GUI panels for the editor

mod camera_panel;
mod entity_editor;
mod render_stats;

pub use camera_panel::camera_panel;
pub use entity_editor::{entity_editor, EntityEditorResponse};
pub use render_stats::RenderStats;
