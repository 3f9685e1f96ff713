//! GPU texture cache. Uploads imported textures and provides a default fallback

use std::collections::HashMap;
use vista_import::ImportedTexture;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Cache of GPU textures keyed by name, with a 1x1 white default
pub struct TextureCache {
    textures: HashMap<String, GpuTexture>,
    /// Bound for materials without a diffuse texture
    pub default_white: GpuTexture,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            textures: HashMap::new(),
            default_white: Self::create_texture(
                device,
                queue,
                "Default White",
                1,
                1,
                &[255, 255, 255, 255],
            ),
        }
    }

    /// Upload an imported texture under `name`. Already-cached names are skipped.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        imported: &ImportedTexture,
    ) {
        if self.textures.contains_key(name) {
            return;
        }

        let Some(rgba) = ensure_rgba(&imported.data, &imported.format) else {
            log::warn!(
                "Texture '{}' has unsupported format '{}'",
                name,
                imported.format
            );
            return;
        };

        let expected = imported.width as usize * imported.height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            log::warn!(
                "Texture '{}' has {} bytes, expected {} for {}x{}",
                name,
                rgba.len(),
                expected,
                imported.width,
                imported.height
            );
            return;
        }

        let gpu = Self::create_texture(device, queue, name, imported.width, imported.height, &rgba);
        self.textures.insert(name.to_string(), gpu);
    }

    /// Get a texture by name, returning None if not found
    pub fn get(&self, name: &str) -> Option<&GpuTexture> {
        self.textures.get(name)
    }

    /// Named texture, or the white default
    pub fn get_or_default(&self, name: Option<&str>) -> &GpuTexture {
        name.and_then(|n| self.textures.get(n))
            .unwrap_or(&self.default_white)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> GpuTexture {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            ..Default::default()
        });

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }
}

/// Expand 1-, 2- and 3-channel 8-bit data to RGBA8
fn ensure_rgba(data: &[u8], format: &str) -> Option<Vec<u8>> {
    let rgba = match format {
        "rgba8" => data.to_vec(),
        "rgb8" => data
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        "rg8" => data
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[1], 0, 255])
            .collect(),
        "r8" => data.iter().flat_map(|&b| [b, b, b, 255]).collect(),
        _ => return None,
    };
    Some(rgba)
}
