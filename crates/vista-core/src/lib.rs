//! Vista Core - Foundational types for the Vista scene editor
//!
//! This crate holds everything that is pure math or plain data:
//! - `Camera` - Free-fly camera model and its derived matrices
//! - `Ray`, `Sphere` - Screen-space ray construction and sphere picking
//! - `Trs` - Matrix decompose/recompose shared by the gizmo and renderer
//! - `ViewerConfig` - TOML-backed viewer settings
//! - Error types and Result alias

mod camera;
mod config;
mod error;
mod ray;
mod transform;

pub use camera::{Camera, CameraMovement, Viewport, FAR_PLANE, NEAR_PLANE};
pub use config::{
    AssetConfig, CameraConfig, EditorConfig, ViewerConfig, WindowConfig, LOCAL_CONFIG_FILE,
};
pub use error::{Result, VistaError};
pub use ray::{
    intersect_ray_sphere, pick_nearest, pick_radius, screen_point_to_ray, unproject_ray, Ray, Sphere,
};
pub use transform::{decompose, recompose, Trs};
