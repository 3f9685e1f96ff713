//! Maps buffered input onto the free-fly camera

use crate::input::{Action, InputState, MOUSE_RIGHT};
use vista_core::{Camera, CameraMovement};

const MOVEMENT_BINDINGS: [(Action, CameraMovement); 6] = [
    (Action::MoveForward, CameraMovement::Forward),
    (Action::MoveBackward, CameraMovement::Backward),
    (Action::MoveLeft, CameraMovement::Left),
    (Action::MoveRight, CameraMovement::Right),
    (Action::MoveUp, CameraMovement::Up),
    (Action::MoveDown, CameraMovement::Down),
];

/// Fly-camera controls: held movement keys, look while a mouse button is
/// held, and scroll to zoom.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Mouse button that enables look mode
    pub look_button: u32,
    /// Clamp pitch to +-89 degrees while looking
    pub constrain_pitch: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            look_button: MOUSE_RIGHT,
            constrain_pitch: true,
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame of input to `camera`
    pub fn update(&self, input: &InputState, camera: &mut Camera, delta_time: f32) {
        for (action, movement) in MOVEMENT_BINDINGS {
            if input.is_action_held(action) {
                camera.apply_movement(movement, delta_time);
            }
        }

        if input.is_mouse_button_down(self.look_button) {
            let (dx, dy) = input.mouse_delta();
            if dx != 0.0 || dy != 0.0 {
                // Screen y grows downward; pitch grows upward
                camera.apply_look(dx as f32, -dy as f32, self.constrain_pitch);
            }
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            camera.apply_zoom(scroll as f32);
        }
    }
}
