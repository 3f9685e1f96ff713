//! Format dispatch for model loading

use crate::gltf_import::import_gltf;
use crate::obj_import::{file_stem, import_obj};
use crate::types::ImportResult;
use std::path::Path;

/// Load a model by file extension (`.obj`, `.gltf`, `.glb`).
///
/// Never fails: a missing file, unknown extension or import error is logged
/// and an empty result is returned.
pub fn load_model<P: AsRef<Path>>(path: P) -> ImportResult {
    let path = path.as_ref();
    let name = file_stem(path);

    if !path.exists() {
        log::error!("Model file not found: {}", path.display());
        return ImportResult::empty(name);
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let imported = match extension.as_str() {
        "obj" => import_obj(path),
        "gltf" | "glb" => import_gltf(path),
        other => {
            log::error!(
                "Unsupported model format '{}' for {}",
                other,
                path.display()
            );
            return ImportResult::empty(name);
        }
    };

    match imported {
        Ok(result) => {
            match result.bounds() {
                Some(bounds) => log::info!(
                    "Loaded model '{}': {} meshes, {} vertices, {} textures, size {}",
                    result.name,
                    result.meshes.len(),
                    result.vertex_count(),
                    result.textures.len(),
                    bounds
                ),
                None => log::warn!("Model '{}' contains no geometry", result.name),
            }
            result
        }
        Err(e) => {
            log::error!("Failed to load model '{}': {}", path.display(), e);
            ImportResult::empty(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_empty_model() {
        let result = load_model(std::env::temp_dir().join("vista_loader_missing/nanosuit.obj"));
        assert!(result.is_empty());
        assert_eq!(result.name, "nanosuit");
    }

    #[test]
    fn test_unknown_extension_gives_empty_model() {
        let dir = std::env::temp_dir().join("vista_loader_unknown_ext");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.fbx");
        std::fs::write(&path, "not a model").unwrap();

        let result = load_model(&path);
        assert!(result.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_gltf_gives_empty_model() {
        let dir = std::env::temp_dir().join("vista_loader_bad_gltf");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.gltf");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_model(&path);
        assert!(result.is_empty());
        assert_eq!(result.name, "broken");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_obj_dispatch_is_case_insensitive() {
        let dir = std::env::temp_dir().join("vista_loader_upper_obj");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("TRI.OBJ");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let result = load_model(&path);
        assert_eq!(result.meshes.len(), 1);
        assert_eq!(result.meshes[0].indices.len(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }
}
