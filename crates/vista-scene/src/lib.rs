//! Vista Scene - Ordered entity store with a single selection
//!
//! Entities hold a world matrix plus non-owning handles into the renderer's
//! model cache and shader library. They are appended by spawning and live
//! until the process exits.

mod entity;
mod scene;

pub use entity::{spawn_transform, Entity, MeshHandle, ShaderHandle};
pub use scene::Scene;
