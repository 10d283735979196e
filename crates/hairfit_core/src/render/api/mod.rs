//! Public rendering API
//!
//! The render backend trait and the per-frame data handed to it.

pub mod frame_data;
pub mod render_backend;

// Re-export commonly used types
pub use frame_data::{DrawItem, FrameData, MeshSlot, PointLight};
pub use render_backend::{BackendResult, RenderBackend};
