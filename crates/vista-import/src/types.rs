//! Import result types

use std::path::PathBuf;

/// Result of importing a model file
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// File stem of the source model
    pub name: String,
    pub source_path: Option<PathBuf>,
    pub meshes: Vec<ImportedMesh>,
    /// Decoded textures, each loaded once and referenced by name from materials
    pub textures: Vec<ImportedTexture>,
    pub materials: Vec<ImportedMaterial>,
}

impl ImportResult {
    /// A valid result with nothing to draw
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Box around every mesh; `None` when there is no geometry
    pub fn bounds(&self) -> Option<MeshBounds> {
        self.meshes
            .iter()
            .filter_map(|m| m.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn texture(&self, name: &str) -> Option<&ImportedTexture> {
        self.textures.iter().find(|t| t.name == name)
    }
}

/// Axis-aligned box around a set of vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl MeshBounds {
    /// `None` for an empty position list
    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        let first = *positions.first()?;
        Some(positions.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, &p| acc.union(&Self { min: p, max: p }),
        ))
    }

    pub fn size(&self) -> [f32; 3] {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }

    pub fn union(&self, other: &MeshBounds) -> MeshBounds {
        MeshBounds {
            min: std::array::from_fn(|i| self.min[i].min(other.min[i])),
            max: std::array::from_fn(|i| self.max[i].max(other.max[i])),
        }
    }
}

impl std::fmt::Display for MeshBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.size();
        write!(f, "{:.2} x {:.2} x {:.2}", x, y, z)
    }
}

/// A triangle mesh. `normals` and `uvs` always match `positions` in length.
#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub material_index: Option<usize>,
}

impl ImportedMesh {
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_positions(&self.positions)
    }

    /// Pad missing normals and uvs with zeros
    pub(crate) fn fill_missing_attributes(&mut self) {
        let count = self.positions.len();
        if self.normals.len() != count {
            self.normals.resize(count, [0.0; 3]);
        }
        if self.uvs.len() != count {
            self.uvs.resize(count, [0.0; 2]);
        }
    }
}

/// Surface description; texture fields name entries in `ImportResult::textures`
#[derive(Debug, Clone)]
pub struct ImportedMaterial {
    pub name: String,
    pub base_color: [f32; 4],
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub normal_texture: Option<String>,
}

impl Default for ImportedMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            diffuse_texture: None,
            specular_texture: None,
            normal_texture: None,
        }
    }
}

/// Decoded image pixels
#[derive(Debug, Clone)]
pub struct ImportedTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// One of `r8`, `rg8`, `rgb8`, `rgba8`
    pub format: String,
    pub data: Vec<u8>,
}
