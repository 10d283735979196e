//! Frame Rendering Data Structures
//!
//! Everything a backend needs to draw one frame of the placement view. The
//! scene builds this once per frame; the backend never reaches back into the
//! scene.

use crate::foundation::math::{Mat4, Vec3};

/// Which of the two loaded meshes a draw or upload refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshSlot {
    /// Reference head mesh
    Head,
    /// Hair mesh being placed
    Hair,
}

impl MeshSlot {
    /// Human readable slot name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Hair => "hair",
        }
    }
}

/// Single point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position
    pub position: Vec3,
    /// Linear RGB, may exceed 1
    pub color: Vec3,
}

/// One mesh draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Mesh to draw
    pub slot: MeshSlot,
    /// Model matrix
    pub model: Mat4,
    /// Flat surface color
    pub color: Vec3,
}

/// Complete frame rendering data
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    /// World-to-camera transform
    pub view: Mat4,
    /// Camera-to-clip transform
    pub projection: Mat4,
    /// Camera position for specular terms
    pub camera_position: Vec3,
    /// Scene light
    pub light: PointLight,
    /// Visible meshes, head first
    pub items: Vec<DrawItem>,
    /// Draw edges only
    pub wireframe: bool,
}

impl FrameData {
    /// Draw item for a slot, if that slot is visible this frame
    pub fn item(&self, slot: MeshSlot) -> Option<&DrawItem> {
        self.items.iter().find(|item| item.slot == slot)
    }
}
