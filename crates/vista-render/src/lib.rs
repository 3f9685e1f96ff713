//! Vista Render - wgpu renderer for the scene editor
//!
//! Loads WGSL shader programs and imported models onto the GPU and records
//! the scene pass: every entity with its own shader, followed by pick
//! indicators drawn over the scene without depth testing.

mod context;
mod gpu_mesh;
mod pipeline;
mod primitives;
mod scene_renderer;
mod shader_library;
mod texture_cache;

pub use context::{RenderContext, RenderError};
pub use gpu_mesh::{GpuMesh, GpuModel, ModelCache};
pub use pipeline::{
    BindLayouts, DepthMode, MaterialUniforms, TransformUniforms, DEPTH_FORMAT,
    OPENGL_TO_WGPU_MATRIX,
};
pub use primitives::{create_sphere_mesh, Mesh, Vertex};
pub use scene_renderer::{DrawItem, SceneRenderer};
pub use shader_library::{resolve_shader_path, validate_wgsl, ShaderLibrary, ShaderProgram};
pub use texture_cache::{GpuTexture, TextureCache};
