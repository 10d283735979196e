//! Axis-aligned bounding boxes
//!
//! Bounds are recomputed on demand and only reported to the operator; nothing
//! caches them.

use std::fmt;

use crate::foundation::math::Vec3;
use crate::render::primitives::mesh::MeshAsset;

/// Min/max corners over a set of positions
///
/// An empty box is inverted (`min = +inf`, `max = -inf`) so that
/// `min.x > max.x` signals emptiness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum coordinates
    pub min: Vec3,
    /// Maximum coordinates
    pub max: Vec3,
}

impl BoundingBox {
    /// The inverted, empty box
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Whether no point has been included
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Grow to include a point
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Box center, `None` for an empty box
    pub fn center(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }

    /// Edge lengths, `None` for an empty box
    pub fn size(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| self.max - self.min)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        write!(
            f,
            "min({:.3}, {:.3}, {:.3}), max({:.3}, {:.3}, {:.3})",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// Component-wise extrema over every vertex position of an asset
pub fn compute_bounds(asset: &MeshAsset) -> BoundingBox {
    asset.vertices().fold(BoundingBox::empty(), |mut bounds, vertex| {
        bounds.include(vertex.position_vec());
        bounds
    })
}
