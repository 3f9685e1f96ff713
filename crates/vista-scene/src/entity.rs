//! Entity type and resource handles

use glam::{Mat4, Vec3};
use vista_core::Camera;

/// Index of a model in the renderer's model cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Index of a compiled shader in the shader library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub usize);

/// A drawable object in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// World matrix
    pub transform: Mat4,
    pub mesh: MeshHandle,
    pub shader: ShaderHandle,
}

impl Entity {
    pub fn new(transform: Mat4, mesh: MeshHandle, shader: ShaderHandle) -> Self {
        Self {
            transform,
            mesh,
            shader,
        }
    }

    /// World-space position (translation column)
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Placement for a newly spawned entity: `distance` units along the camera's
/// view direction, unrotated, with uniform `scale`.
pub fn spawn_transform(camera: &Camera, distance: f32, scale: f32) -> Mat4 {
    let position = camera.position + camera.front() * distance;
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
}
