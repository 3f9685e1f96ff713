//! Wavefront OBJ/MTL importer

use crate::types::{ImportResult, ImportedMaterial, ImportedMesh, ImportedTexture};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use vista_core::{Result, VistaError};

/// Import an OBJ file and the textures referenced by its MTL library.
///
/// Faces are triangulated and re-indexed so every vertex has one index.
/// Texture coordinates are flipped to a top-left origin. A texture that
/// fails to decode is logged and left unbound on its material.
pub fn import_obj<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, materials) = tobj::load_obj(path, &options)
        .map_err(|e| VistaError::ImportError(format!("Failed to import OBJ: {}", e)))?;

    let obj_materials = materials.unwrap_or_else(|e| {
        log::warn!("No materials for '{}': {}", path.display(), e);
        Vec::new()
    });

    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let mut textures = TextureSet::new(directory);

    let materials = obj_materials
        .iter()
        .map(|m| ImportedMaterial {
            name: m.name.clone(),
            base_color: m
                .diffuse
                .map(|d| [d[0], d[1], d[2], m.dissolve.unwrap_or(1.0)])
                .unwrap_or([1.0, 1.0, 1.0, 1.0]),
            diffuse_texture: m.diffuse_texture.as_deref().and_then(|t| textures.load(t)),
            specular_texture: m.specular_texture.as_deref().and_then(|t| textures.load(t)),
            normal_texture: m.normal_texture.as_deref().and_then(|t| textures.load(t)),
        })
        .collect();

    let meshes = models
        .into_iter()
        .enumerate()
        .map(|(i, model)| {
            let mesh = model.mesh;
            let name = if model.name.is_empty() {
                format!("mesh_{}", i)
            } else {
                model.name
            };
            let mut imported = ImportedMesh {
                name,
                positions: mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| [p[0], p[1], p[2]])
                    .collect(),
                normals: mesh
                    .normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect(),
                uvs: mesh
                    .texcoords
                    .chunks_exact(2)
                    .map(|t| [t[0], 1.0 - t[1]])
                    .collect(),
                indices: mesh.indices,
                material_index: mesh.material_id,
            };
            imported.fill_missing_attributes();
            imported
        })
        .collect();

    Ok(ImportResult {
        name: file_stem(path),
        source_path: Some(path.to_path_buf()),
        meshes,
        textures: textures.into_textures(),
        materials,
    })
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

/// Decodes each referenced image once, keyed by resolved path
struct TextureSet<'a> {
    directory: &'a Path,
    loaded: HashMap<PathBuf, Option<String>>,
    textures: Vec<ImportedTexture>,
}

impl<'a> TextureSet<'a> {
    fn new(directory: &'a Path) -> Self {
        Self {
            directory,
            loaded: HashMap::new(),
            textures: Vec::new(),
        }
    }

    /// Name of the texture for `reference`, decoding it on first use
    fn load(&mut self, reference: &str) -> Option<String> {
        // MTL files written on Windows use backslashes
        let resolved = self.directory.join(reference.replace('\\', "/"));
        if let Some(name) = self.loaded.get(&resolved) {
            return name.clone();
        }

        let name = match image::open(&resolved) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                let name = resolved.to_string_lossy().to_string();
                self.textures.push(ImportedTexture {
                    name: name.clone(),
                    width,
                    height,
                    format: "rgba8".to_string(),
                    data: rgba.into_raw(),
                });
                Some(name)
            }
            Err(e) => {
                log::error!("Texture failed to load at path '{}': {}", resolved.display(), e);
                None
            }
        };

        self.loaded.insert(resolved, name.clone());
        name
    }

    fn into_textures(self) -> Vec<ImportedTexture> {
        self.textures
    }
}
