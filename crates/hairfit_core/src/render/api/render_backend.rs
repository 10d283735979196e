//! Backend abstraction trait for the rendering system
//!
//! A backend keeps GPU-side copies of the two mesh slots and draws them from
//! [`FrameData`]. Uploads happen only when a slot's asset changes.

use crate::render::api::frame_data::{FrameData, MeshSlot};
use crate::render::primitives::MeshAsset;
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Main rendering backend trait
pub trait RenderBackend {
    /// Replace the geometry held for `slot`
    ///
    /// An empty asset clears the slot.
    fn upload_mesh(&mut self, slot: MeshSlot, asset: &MeshAsset) -> BackendResult<()>;

    /// Draw one frame
    fn draw(&mut self, frame: &FrameData) -> BackendResult<()>;
}
