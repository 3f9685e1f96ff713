//! Vista Viewer - Interactive scene editor
//!
//! Opens a window with a free-fly camera, click-to-select picking, an egui
//! entity editor with a transform gizmo, and an "Add model" button that
//! spawns the configured model in front of the camera.

pub mod app;
pub mod gizmo;
pub mod panels;
pub mod state;

pub use app::run;
pub use gizmo::{GizmoDelta, GizmoMode, TransformGizmo};
pub use state::{EditorState, IndicatorHandles};
