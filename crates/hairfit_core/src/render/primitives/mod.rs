//! Core primitive types for rendering
//!
//! Meshes, their bounds, and the camera that looks at them.

pub mod bounds;
pub mod camera;
pub mod mesh;

// Re-export commonly used types
pub use bounds::{compute_bounds, BoundingBox};
pub use camera::{CameraMovement, FreeFlyCamera};
pub use mesh::{Mesh, MeshAsset, MeshError, Vertex};
