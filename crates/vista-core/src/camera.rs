//! Free-fly camera with yaw/pitch look, zoom, and basis-relative movement

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::ray::{unproject_ray, Ray};

/// Near clipping plane distance
pub const NEAR_PLANE: f32 = 0.1;
/// Far clipping plane distance
pub const FAR_PLANE: f32 = 100.0;

const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 180.0;
const PITCH_LIMIT: f32 = 89.0;

/// Direction of a single keyboard-driven camera step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Drawable surface size in physical pixels.
///
/// Owned by the frame loop and updated from the resize callback; the camera
/// only reads it when building a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, falling back to 1.0 for a minimized window
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// A free-fly camera driven by yaw/pitch angles in degrees
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Horizontal look angle in degrees
    pub yaw: f32,
    /// Vertical look angle in degrees
    pub pitch: f32,
    /// Field of view in degrees
    pub fov: f32,
    /// Units per second
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement
    pub look_sensitivity: f32,

    world_up: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            fov: 45.0,
            movement_speed: 10.0,
            look_sensitivity: 0.1,
            world_up,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.recompute_basis();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            Vec3::from_array(config.position),
            Vec3::from_array(config.world_up),
            config.yaw,
            config.pitch,
        );
        camera.fov = config.fov.clamp(MIN_FOV, MAX_FOV);
        camera.movement_speed = config.movement_speed;
        camera.look_sensitivity = config.look_sensitivity;
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Rebuild `front`, `right` and `up` from the current yaw/pitch.
    ///
    /// Must run after every yaw/pitch mutation, including direct writes to
    /// the public angle fields from UI widgets.
    pub fn recompute_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Perspective projection (OpenGL clip space, z in [-1, 1])
    pub fn projection_matrix(&self, viewport: Viewport) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            viewport.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }

    /// Look-at matrix from `position` toward `position + front`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn view_projection_matrix(&self, viewport: Viewport) -> Mat4 {
        self.projection_matrix(viewport) * self.view_matrix()
    }

    pub fn inverse_view_projection_matrix(&self, viewport: Viewport) -> Mat4 {
        self.view_projection_matrix(viewport).inverse()
    }

    /// World-space pick ray through a pixel (origin top-left)
    pub fn screen_ray(&self, screen_x: f32, screen_y: f32, viewport: Viewport) -> Ray {
        unproject_ray(
            screen_x,
            screen_y,
            viewport.width,
            viewport.height,
            self.inverse_view_projection_matrix(viewport),
            self.position,
        )
    }

    /// Move one step of `movement_speed * delta_time` along the camera basis.
    /// Vertical movement follows the roll-free up of the current look direction.
    pub fn apply_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let vertical = self.front.cross(-self.right);
        let step = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => vertical,
            CameraMovement::Down => -vertical,
        };
        self.position += step * velocity;
    }

    /// Turn the camera by a mouse offset in pixels
    pub fn apply_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.look_sensitivity;
        self.pitch += y_offset * self.look_sensitivity;

        if constrain_pitch {
            // Keep away from the poles, where front becomes parallel to world up
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.recompute_basis();
    }

    pub fn apply_zoom(&mut self, scroll_delta: f32) {
        self.fov = (self.fov - scroll_delta).clamp(MIN_FOV, MAX_FOV);
    }
}
