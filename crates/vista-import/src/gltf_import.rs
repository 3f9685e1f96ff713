//! glTF/GLB file importer

use crate::obj_import::file_stem;
use crate::types::{ImportResult, ImportedMaterial, ImportedMesh, ImportedTexture};
use std::path::Path;
use vista_core::{Result, VistaError};

/// Import a glTF or GLB file
pub fn import_gltf<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| VistaError::ImportError(format!("Failed to import glTF: {}", e)))?;

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect())
                .unwrap_or_default();

            // Non-indexed primitives draw their vertices in order
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let mut imported = ImportedMesh {
                name: mesh_name.clone(),
                positions,
                normals,
                uvs,
                indices,
                material_index: primitive.material().index(),
            };
            imported.fill_missing_attributes();
            meshes.push(imported);
        }
    }

    let mut textures = Vec::new();
    for texture in document.textures() {
        let source = texture.source().index();
        let Some(image) = images.get(source) else {
            continue;
        };

        let format = match image.format {
            gltf::image::Format::R8 => "r8",
            gltf::image::Format::R8G8 => "rg8",
            gltf::image::Format::R8G8B8 => "rgb8",
            gltf::image::Format::R8G8B8A8 => "rgba8",
            other => {
                log::warn!(
                    "Skipping texture {} in '{}': unsupported format {:?}",
                    texture.index(),
                    path.display(),
                    other
                );
                continue;
            }
        };

        textures.push(ImportedTexture {
            name: texture_name(&texture),
            width: image.width,
            height: image.height,
            format: format.to_string(),
            data: image.pixels.clone(),
        });
    }

    let materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            ImportedMaterial {
                name: material
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or(0))),
                base_color: pbr.base_color_factor(),
                diffuse_texture: pbr.base_color_texture().map(|info| texture_name(&info.texture())),
                specular_texture: None,
                normal_texture: material
                    .normal_texture()
                    .map(|info| texture_name(&info.texture())),
            }
        })
        .collect();

    Ok(ImportResult {
        name: file_stem(path),
        source_path: Some(path.to_path_buf()),
        meshes,
        textures,
        materials,
    })
}

fn texture_name(texture: &gltf::Texture<'_>) -> String {
    texture
        .name()
        .map(String::from)
        .unwrap_or_else(|| format!("texture_{}", texture.index()))
}
