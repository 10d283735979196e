//! Mesh representation for the head and hair slots
//!
//! A [`MeshAsset`] is what one import produces: an ordered list of sub-meshes,
//! each with its own vertex list and a local triangle index space. Consumers
//! treat an asset as read-only; the exporter applies transforms on the output
//! stream and never mutates it in place.
//!
//! # Invariants
//! - every index of a sub-mesh is smaller than that sub-mesh's vertex count
//! - index count is a multiple of 3
//! - normals are unit length, or exactly [`FALLBACK_NORMAL`]
//!
//! [`Mesh::validate`] checks the first two; [`Vertex::with_checked_normal`]
//! establishes the third at construction time.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Normal used when the source normal is absent or degenerate
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Source normals shorter than this are replaced by [`FALLBACK_NORMAL`]
pub const DEGENERATE_NORMAL_LENGTH: f32 = 1e-3;

/// Geometry consistency errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index points past the end of the vertex list
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Vertex count of the sub-mesh
        vertex_count: usize,
    },

    /// Index count does not describe whole triangles
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Vertex data laid out for direct GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Unit normal, or [`FALLBACK_NORMAL`]
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a vertex from raw position and normal
    ///
    /// The normal is stored as given; use [`Vertex::with_checked_normal`] for
    /// untrusted source data.
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Create a vertex, normalizing the normal or substituting the fallback
    ///
    /// Returns the vertex and whether the fallback was used.
    pub fn with_checked_normal(position: [f32; 3], normal: Option<[f32; 3]>) -> (Self, bool) {
        match normal.and_then(checked_normal) {
            Some(unit) => (Self::new(position, unit), false),
            None => (Self::new(position, FALLBACK_NORMAL), true),
        }
    }

    /// Position as a vector
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a vector
    pub fn normal_vec(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// Normalize a raw normal, rejecting degenerate ones
pub fn checked_normal(normal: [f32; 3]) -> Option<[f32; 3]> {
    let vector = Vec3::from(normal);
    let length = vector.norm();
    if !length.is_finite() || length < DEGENERATE_NORMAL_LENGTH {
        return None;
    }
    let unit = vector / length;
    Some([unit.x, unit.y, unit.z])
}

/// One sub-mesh: vertices plus triangle indices in its own local index space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Check index range and triangle completeness
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.indices.len()));
        }
        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&index| index as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count });
        }
        Ok(())
    }

    /// Number of whole triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Vertex buffer contents as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned cube of edge length 1 centered at the origin
    ///
    /// Each face has its own four vertices so normals stay flat.
    /// 24 vertices, 36 indices, counter-clockwise winding seen from outside.
    pub fn unit_cube() -> Self {
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // (normal, u axis, v axis) with u × v = normal
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in FACES {
            let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
            let base = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
            for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
                let corner = n * 0.5 + u * su + v * sv;
                vertices.push(Vertex::new([corner.x, corner.y, corner.z], normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }
}

/// Everything one import produced
///
/// An empty asset (no sub-meshes) is the canonical "import failed" value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAsset {
    meshes: Vec<Mesh>,
}

impl MeshAsset {
    /// Asset with no geometry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an asset from sub-meshes, rejecting inconsistent geometry
    pub fn from_meshes(meshes: Vec<Mesh>) -> Result<Self, MeshError> {
        for mesh in &meshes {
            mesh.validate()?;
        }
        Ok(Self { meshes })
    }

    /// Single sub-mesh asset
    pub fn from_mesh(mesh: Mesh) -> Result<Self, MeshError> {
        Self::from_meshes(vec![mesh])
    }

    /// Sub-meshes in file order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Whether the asset carries no sub-meshes
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total vertices across sub-meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }

    /// Total indices across sub-meshes
    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.indices.len()).sum()
    }

    /// Total triangles across sub-meshes
    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// All vertices, sub-mesh by sub-mesh
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.meshes.iter().flat_map(|mesh| mesh.vertices.iter())
    }
}
