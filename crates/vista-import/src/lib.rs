//! Vista Import - Model importers
//!
//! Loads Wavefront OBJ (with MTL materials) and glTF/GLB files into a
//! CPU-side `ImportResult`. `load_model` never fails: problems are logged
//! and an empty result is returned so the editor keeps running.

mod gltf_import;
mod loader;
mod obj_import;
mod types;

pub use gltf_import::import_gltf;
pub use loader::load_model;
pub use obj_import::import_obj;
pub use types::{ImportResult, ImportedMaterial, ImportedMesh, ImportedTexture, MeshBounds};
