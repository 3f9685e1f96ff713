//! Vista Runtime - Per-frame input and timing
//!
//! Window events are buffered into `InputState`; once per frame the
//! `CameraController` turns the buffered state into camera movement, look,
//! and zoom before anything is drawn.

mod camera_controller;
mod clock;
mod input;

pub use camera_controller::CameraController;
pub use clock::FrameClock;
pub use input::{Action, InputState, MOUSE_LEFT, MOUSE_MIDDLE, MOUSE_RIGHT};
