//! # Rendering System
//!
//! Backend-neutral rendering layer for the placement view.
//!
//! ## Architecture
//!
//! - **Primitives**: meshes, bounds and the free-fly camera
//! - **API**: the [`RenderBackend`] trait and the [`FrameData`] it consumes
//! - **Flags**: per-view toggles the input layer flips
//!
//! No GPU backend ships with the library. The application crate plugs one in
//! through [`RenderBackend`].

use bitflags::bitflags;
use thiserror::Error;

pub mod api;

// Core primitives
pub mod primitives;

pub use api::{BackendResult, DrawItem, FrameData, MeshSlot, PointLight, RenderBackend};
pub use primitives::{compute_bounds, BoundingBox, CameraMovement, FreeFlyCamera, Mesh, MeshAsset, Vertex};

bitflags! {
    /// View toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Draw triangle edges instead of filled faces
        const WIREFRAME = 1 << 0;
        /// Draw the head mesh
        const SHOW_HEAD = 1 << 1;
        /// Draw the hair mesh
        const SHOW_HAIR = 1 << 2;
    }
}

impl RenderFlags {
    /// Both meshes visible, filled
    pub const fn initial() -> Self {
        Self::SHOW_HEAD.union(Self::SHOW_HAIR)
    }

    /// Whether a slot should be drawn
    pub const fn shows(self, slot: MeshSlot) -> bool {
        match slot {
            MeshSlot::Head => self.contains(Self::SHOW_HEAD),
            MeshSlot::Hair => self.contains(Self::SHOW_HAIR),
        }
    }

    /// Replace the visibility bits, keeping the wireframe bit
    pub fn set_visibility(&mut self, head: bool, hair: bool) {
        self.set(Self::SHOW_HEAD, head);
        self.set(Self::SHOW_HAIR, hair);
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::initial()
    }
}

/// Rendering errors
///
/// Backends map their API-specific failures onto this so callers never see
/// backend types.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Uploading a mesh or drawing a frame failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}
