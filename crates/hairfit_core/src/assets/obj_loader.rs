//! OBJ mesh importer
//!
//! Parsing goes through `tobj` with triangulation and single-index
//! re-indexing so every sub-mesh comes out as a flat vertex list plus
//! triangle indices. Texture coordinates and materials are dropped.
//!
//! Import is all-or-nothing: [`MeshImporter::try_import`] either returns a
//! fully validated [`MeshAsset`] or an [`ImportError`], and
//! [`MeshImporter::import`] turns any error into an empty asset after
//! logging it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::foundation::time::Stopwatch;
use crate::render::primitives::mesh::{checked_normal, Mesh, MeshAsset, MeshError, Vertex};

/// Import failures
#[derive(Error, Debug)]
pub enum ImportError {
    /// Source file does not exist
    #[error("mesh file not found: {0}")]
    NotFound(PathBuf),

    /// The OBJ parser rejected the file
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File being imported
        path: PathBuf,
        /// Parser error
        #[source]
        source: tobj::LoadError,
    },

    /// Attribute arrays have impossible lengths
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Parsed geometry breaks index invariants
    #[error("inconsistent geometry: {0}")]
    Geometry(#[from] MeshError),

    /// The file parsed but holds no triangles
    #[error("no geometry found in {0}")]
    NoGeometry(PathBuf),
}

/// Per-import bookkeeping reported through the log
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Sub-meshes kept
    pub meshes: usize,
    /// Vertices across sub-meshes
    pub vertices: usize,
    /// Triangles across sub-meshes
    pub triangles: usize,
    /// Sub-meshes whose normals were generated from faces
    pub generated_normals: usize,
    /// Vertices that received the fallback normal
    pub fallback_normals: usize,
}

/// OBJ importer
pub struct MeshImporter;

impl MeshImporter {
    /// Options handed to the parser
    pub fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// Import a mesh file, returning an empty asset on any failure
    ///
    /// Callers detect failure through [`MeshAsset::is_empty`].
    pub fn import<P: AsRef<Path>>(path: P) -> MeshAsset {
        let path = path.as_ref();
        match Self::try_import(path) {
            Ok((asset, _)) => asset,
            Err(e) => {
                log::error!("Failed to import {}: {}", path.display(), e);
                MeshAsset::empty()
            }
        }
    }

    /// Import a mesh file
    pub fn try_import<P: AsRef<Path>>(path: P) -> Result<(MeshAsset, ImportSummary), ImportError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::NotFound(path.to_path_buf()));
        }

        let stopwatch = Stopwatch::start_new();
        let (models, materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|source| ImportError::Parse { path: path.to_path_buf(), source })?;
        if let Err(e) = materials {
            log::debug!("Ignoring materials of {}: {}", path.display(), e);
        }

        let mut summary = ImportSummary::default();
        let mut meshes = Vec::with_capacity(models.len());
        for model in &models {
            let mesh = convert_mesh(&model.mesh, &mut summary)?;
            if mesh.is_empty() {
                log::debug!("Skipping empty sub-mesh '{}' in {}", model.name, path.display());
                continue;
            }
            meshes.push(mesh);
        }

        if meshes.is_empty() {
            return Err(ImportError::NoGeometry(path.to_path_buf()));
        }

        let asset = MeshAsset::from_meshes(meshes)?;
        summary.meshes = asset.meshes().len();
        summary.vertices = asset.vertex_count();
        summary.triangles = asset.triangle_count();

        if summary.fallback_normals > 0 {
            log::warn!(
                "{}: {} vertices had degenerate normals, substituted (0, 1, 0)",
                path.display(),
                summary.fallback_normals
            );
        }
        log::info!(
            "Imported {} ({} meshes, {} vertices, {} triangles) in {:.1} ms",
            path.display(),
            summary.meshes,
            summary.vertices,
            summary.triangles,
            stopwatch.elapsed_millis()
        );

        Ok((asset, summary))
    }
}

fn convert_mesh(source: &tobj::Mesh, summary: &mut ImportSummary) -> Result<Mesh, ImportError> {
    if source.positions.len() % 3 != 0 {
        return Err(ImportError::InvalidFormat(format!(
            "position array length {} is not a multiple of 3",
            source.positions.len()
        )));
    }

    let positions: Vec<[f32; 3]> = source.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
    let indices = source.indices.clone();

    let normals: Vec<Option<[f32; 3]>> = if source.normals.len() == source.positions.len() {
        source.normals.chunks_exact(3).map(|n| Some([n[0], n[1], n[2]])).collect()
    } else {
        if !source.normals.is_empty() {
            log::debug!(
                "Normal count {} does not match position count {}, regenerating",
                source.normals.len() / 3,
                positions.len()
            );
        }
        summary.generated_normals += 1;
        generate_smooth_normals(&positions, &indices)?
    };

    let vertices = positions
        .iter()
        .zip(normals)
        .map(|(&position, normal)| {
            let (vertex, substituted) = Vertex::with_checked_normal(position, normal);
            if substituted {
                log::trace!("Fallback normal for vertex at {position:?}");
                summary.fallback_normals += 1;
            }
            vertex
        })
        .collect();

    let mesh = Mesh::new(vertices, indices);
    mesh.validate()?;
    Ok(mesh)
}

/// Area-weighted vertex normals, shared across vertices at the same position
///
/// Vertices split by the re-indexing (same position, different texture
/// coordinate) end up with the same normal so seams stay smooth.
fn generate_smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Result<Vec<Option<[f32; 3]>>, ImportError> {
    let mut accumulated: HashMap<[u32; 3], Vec3> = HashMap::new();
    let key = |p: [f32; 3]| p.map(f32::to_bits);

    for triangle in indices.chunks_exact(3) {
        let corners = [triangle[0], triangle[1], triangle[2]].map(|i| positions.get(i as usize).copied());
        let [Some(a), Some(b), Some(c)] = corners else {
            return Err(MeshError::IndexOutOfRange {
                index: triangle.iter().copied().max().unwrap_or_default(),
                vertex_count: positions.len(),
            }
            .into());
        };

        // Cross product length is twice the triangle area
        let (va, vb, vc) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
        let face_normal = (vb - va).cross(&(vc - va));
        for corner in [a, b, c] {
            *accumulated.entry(key(corner)).or_insert_with(Vec3::zeros) += face_normal;
        }
    }

    Ok(positions
        .iter()
        .map(|&position| {
            accumulated
                .get(&key(position))
                .and_then(|sum| checked_normal([sum.x, sum.y, sum.z]))
        })
        .collect())
}
