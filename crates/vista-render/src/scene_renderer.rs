//! Draws entities and pick indicators into a frame

use crate::gpu_mesh::ModelCache;
use crate::pipeline::{BindLayouts, DepthMode, TransformUniforms, OPENGL_TO_WGPU_MATRIX};
use crate::primitives::create_sphere_mesh;
use crate::shader_library::ShaderLibrary;
use crate::texture_cache::TextureCache;
use glam::Mat4;
use vista_import::ImportResult;
use vista_scene::{MeshHandle, ShaderHandle};
use wgpu::util::DeviceExt;

/// One model drawn with one shader at one transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshHandle,
    pub shader: ShaderHandle,
    pub transform: Mat4,
    pub depth: DepthMode,
}

/// Per-draw transform buffer, reused across frames
struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Owns GPU resources for models, shaders and textures, and records the scene pass
pub struct SceneRenderer {
    layouts: BindLayouts,
    pub shaders: ShaderLibrary,
    pub models: ModelCache,
    pub textures: TextureCache,
    slots: Vec<DrawSlot>,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        shader_dir: impl Into<std::path::PathBuf>,
        clear_color: [f32; 3],
    ) -> Self {
        let clear_color = if color_format.is_srgb() {
            srgb_to_linear(clear_color)
        } else {
            clear_color
        };

        Self {
            layouts: BindLayouts::new(device),
            shaders: ShaderLibrary::new(shader_dir, color_format),
            models: ModelCache::new(),
            textures: TextureCache::new(device, queue),
            slots: Vec::new(),
            clear_color: wgpu::Color {
                r: clear_color[0] as f64,
                g: clear_color[1] as f64,
                b: clear_color[2] as f64,
                a: 1.0,
            },
        }
    }

    pub fn compile_shader(
        &mut self,
        device: &wgpu::Device,
        vertex_path: &str,
        fragment_path: &str,
    ) -> ShaderHandle {
        self.shaders
            .compile_shader(device, &self.layouts, vertex_path, fragment_path)
    }

    pub fn upload_model(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        import: &ImportResult,
    ) -> MeshHandle {
        self.models
            .upload(device, queue, &self.layouts, &mut self.textures, import)
    }

    /// Unit-radius sphere, used when no indicator model is configured
    pub fn upload_sphere(&mut self, device: &wgpu::Device) -> MeshHandle {
        let mesh = create_sphere_mesh(1.0, 24, 16);
        self.models
            .upload_mesh(device, &self.layouts, &self.textures, "sphere", &mesh)
    }

    /// Record the scene pass: clear, then draw `items` in order.
    ///
    /// `view_proj` is the camera's OpenGL-style matrix; the depth remap is
    /// applied here.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        view_proj: Mat4,
        items: &[DrawItem],
    ) {
        let view_proj = OPENGL_TO_WGPU_MATRIX * view_proj;

        self.ensure_slots(device, items.len());
        for (slot, item) in self.slots.iter().zip(items) {
            let uniforms = TransformUniforms::new(view_proj, item.transform);
            queue.write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for (slot, item) in self.slots.iter().zip(items) {
            let (Some(program), Some(model)) =
                (self.shaders.get(item.shader), self.models.get(item.mesh))
            else {
                continue;
            };

            pass.set_pipeline(program.pipeline(item.depth));
            pass.set_bind_group(0, &slot.bind_group, &[]);
            for mesh in &model.meshes {
                pass.set_bind_group(1, &mesh.material_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
    }

    fn ensure_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.slots.len() < count {
            let uniforms = TransformUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Transform Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniforms]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.layouts.transform,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Transform Bind Group"),
            });
            self.slots.push(DrawSlot { buffer, bind_group });
        }
    }
}

/// Convert an sRGB-encoded color to linear for an sRGB render target
fn srgb_to_linear(color: [f32; 3]) -> [f32; 3] {
    color.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}
