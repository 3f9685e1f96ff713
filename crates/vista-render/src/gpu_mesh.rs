//! GPU model cache. Uploads imported models once and hands out `MeshHandle`s

use crate::pipeline::{BindLayouts, MaterialUniforms};
use crate::primitives::Mesh;
use crate::texture_cache::TextureCache;
use vista_import::{ImportResult, ImportedMaterial};
use vista_scene::MeshHandle;
use wgpu::util::DeviceExt;

/// A single GPU-resident mesh with its material bound
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub material_bind_group: wgpu::BindGroup,
    // kept alive for the bind group
    _material_buffer: wgpu::Buffer,
}

/// All meshes of one loaded model; empty when the model failed to load
pub struct GpuModel {
    pub name: String,
    pub meshes: Vec<GpuMesh>,
}

/// Uploaded models, addressed by `MeshHandle`
#[derive(Default)]
pub struct ModelCache {
    models: Vec<GpuModel>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload a model's textures and meshes. An empty import still gets a handle.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &BindLayouts,
        textures: &mut TextureCache,
        import: &ImportResult,
    ) -> MeshHandle {
        let handle = MeshHandle(self.models.len());

        // Texture names are only unique within one import
        let texture_key = |name: &str| format!("{}#{}/{}", handle.0, import.name, name);
        for texture in &import.textures {
            textures.upload(device, queue, &texture_key(&texture.name), texture);
        }

        let default_material = ImportedMaterial {
            name: "default".to_string(),
            ..Default::default()
        };

        let meshes = import
            .meshes
            .iter()
            .filter(|m| !m.indices.is_empty())
            .map(|imported| {
                let material = imported
                    .material_index
                    .and_then(|i| import.materials.get(i))
                    .unwrap_or(&default_material);
                let diffuse_key = material.diffuse_texture.as_deref().map(texture_key);
                let diffuse = textures.get_or_default(diffuse_key.as_deref());
                let mesh = Mesh::from(imported);
                Self::create_gpu_mesh(
                    device,
                    layouts,
                    &format!("{}/{}", import.name, imported.name),
                    &mesh,
                    material.base_color,
                    diffuse,
                )
            })
            .collect();

        self.models.push(GpuModel {
            name: import.name.clone(),
            meshes,
        });
        handle
    }

    /// Upload a generated mesh with a flat color and no texture
    pub fn upload_mesh(
        &mut self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        textures: &TextureCache,
        name: &str,
        mesh: &Mesh,
    ) -> MeshHandle {
        let gpu = Self::create_gpu_mesh(
            device,
            layouts,
            name,
            mesh,
            [1.0, 1.0, 1.0, 1.0],
            &textures.default_white,
        );
        self.models.push(GpuModel {
            name: name.to_string(),
            meshes: vec![gpu],
        });
        MeshHandle(self.models.len() - 1)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&GpuModel> {
        self.models.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn create_gpu_mesh(
        device: &wgpu::Device,
        layouts: &BindLayouts,
        label: &str,
        mesh: &Mesh,
        base_color: [f32; 4],
        diffuse: &crate::texture_cache::GpuTexture,
    ) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material Buffer", label)),
            contents: bytemuck::cast_slice(&[MaterialUniforms { base_color }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
            label: Some(&format!("{} Material Bind Group", label)),
        });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material_bind_group,
            _material_buffer: material_buffer,
        }
    }
}
