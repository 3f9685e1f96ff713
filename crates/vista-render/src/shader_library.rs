//! Shader programs loaded from WGSL files
//!
//! A program pairs a vertex-stage file (`vs_main`) with a fragment-stage file
//! (`fs_main`). Sources are parsed and validated with naga before anything
//! reaches the GPU; a program that fails at any step is logged and replaced
//! by a magenta fallback, so callers always get a usable handle.

use crate::pipeline::{create_pipeline, BindLayouts, DepthMode};
use std::path::{Path, PathBuf};
use vista_scene::ShaderHandle;

const FALLBACK_SOURCE: &str = include_str!("shaders/fallback.wgsl");

/// A compiled program with its depth-tested and overlay pipelines
pub struct ShaderProgram {
    pub name: String,
    pub pipeline: wgpu::RenderPipeline,
    pub overlay_pipeline: wgpu::RenderPipeline,
    /// False when this program is the fallback standing in for a failed one
    pub is_valid: bool,
}

impl ShaderProgram {
    pub fn pipeline(&self, depth: DepthMode) -> &wgpu::RenderPipeline {
        match depth {
            DepthMode::Tested => &self.pipeline,
            DepthMode::Overlay => &self.overlay_pipeline,
        }
    }
}

/// All shader programs, addressed by `ShaderHandle`
pub struct ShaderLibrary {
    shader_dir: PathBuf,
    color_format: wgpu::TextureFormat,
    programs: Vec<ShaderProgram>,
}

impl ShaderLibrary {
    pub fn new(shader_dir: impl Into<PathBuf>, color_format: wgpu::TextureFormat) -> Self {
        Self {
            shader_dir: shader_dir.into(),
            color_format,
            programs: Vec::new(),
        }
    }

    /// Compile a program from two files under the shader directory.
    ///
    /// Never fails; see the module docs for the fallback behaviour.
    pub fn compile_shader(
        &mut self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        vertex_path: &str,
        fragment_path: &str,
    ) -> ShaderHandle {
        let name = format!("{} + {}", vertex_path, fragment_path);
        let vertex = self.read_stage(vertex_path, "vs_main", naga::ShaderStage::Vertex);
        let fragment = self.read_stage(fragment_path, "fs_main", naga::ShaderStage::Fragment);

        let program = match (vertex, fragment) {
            (Some(vs), Some(fs)) => self
                .build_program(device, layouts, &name, &vs, &fs)
                .unwrap_or_else(|e| {
                    log::error!("Failed to link shader program '{}': {}", name, e);
                    self.fallback_program(device, layouts, &name)
                }),
            _ => self.fallback_program(device, layouts, &name),
        };

        if program.is_valid {
            log::info!("Compiled shader program '{}'", name);
        }

        self.programs.push(program);
        ShaderHandle(self.programs.len() - 1)
    }

    pub fn get(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.programs.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Read and validate one stage; `None` after logging on failure
    fn read_stage(&self, file: &str, entry: &str, stage: naga::ShaderStage) -> Option<String> {
        let path = resolve_shader_path(&self.shader_dir, file);
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Failed to read shader '{}': {}", path.display(), e);
                return None;
            }
        };

        match validate_wgsl(&source, entry, stage) {
            Ok(()) => Some(source),
            Err(e) => {
                log::error!("Shader '{}' failed to compile: {}", path.display(), e);
                None
            }
        }
    }

    fn build_program(
        &self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderProgram, String> {
        // Stage interfaces are only checked against each other at pipeline creation
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex = create_module(device, &format!("{} (vertex)", name), vertex_source);
        let fragment = create_module(device, &format!("{} (fragment)", name), fragment_source);
        let pipeline = create_pipeline(
            device,
            layouts,
            name,
            &vertex,
            &fragment,
            self.color_format,
            DepthMode::Tested,
        );
        let overlay_pipeline = create_pipeline(
            device,
            layouts,
            &format!("{} (overlay)", name),
            &vertex,
            &fragment,
            self.color_format,
            DepthMode::Overlay,
        );

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(error.to_string());
        }

        Ok(ShaderProgram {
            name: name.to_string(),
            pipeline,
            overlay_pipeline,
            is_valid: true,
        })
    }

    fn fallback_program(
        &self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        name: &str,
    ) -> ShaderProgram {
        log::warn!("Using fallback shader for '{}'", name);
        let module = create_module(device, "Fallback Shader", FALLBACK_SOURCE);
        ShaderProgram {
            name: name.to_string(),
            pipeline: create_pipeline(
                device,
                layouts,
                "Fallback Pipeline",
                &module,
                &module,
                self.color_format,
                DepthMode::Tested,
            ),
            overlay_pipeline: create_pipeline(
                device,
                layouts,
                "Fallback Overlay Pipeline",
                &module,
                &module,
                self.color_format,
                DepthMode::Overlay,
            ),
            is_valid: false,
        }
    }
}

fn create_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

/// Resolve a shader file name against the shader directory; absolute paths pass through
pub fn resolve_shader_path(shader_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        shader_dir.join(path)
    }
}

/// Parse and validate WGSL and check it exports `entry` for `stage`
pub fn validate_wgsl(source: &str, entry: &str, stage: naga::ShaderStage) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| format!("{:?}", e.into_inner()))?;

    let has_entry = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == stage);
    if !has_entry {
        return Err(format!("missing {:?} entry point '{}'", stage, entry));
    }

    Ok(())
}
