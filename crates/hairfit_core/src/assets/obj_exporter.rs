//! OBJ baking exporter
//!
//! Applies a model matrix to every vertex and normal of a [`MeshAsset`] and
//! writes the result as a constrained OBJ subset:
//!
//! ```text
//! # comment header
//! v x y z          (3-decimal fixed point)
//! vn x y z
//! f a//a b//b c//c (1-based, position and normal index always equal)
//! ```
//!
//! Sub-meshes are written one after another; face indices carry a running
//! offset so the concatenated file stays consistent.
//!
//! The whole file is rendered into memory first. Only then is it written to a
//! sibling temporary file and renamed over the destination, so a failed bake
//! never truncates or half-writes the file being baked over.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Point3, Vec3};
use crate::foundation::time::Stopwatch;
use crate::render::primitives::mesh::{checked_normal, MeshAsset, FALLBACK_NORMAL};

/// First line of every exported file
pub const HEADER: &str = "# Generated OBJ file";

/// Export failures
#[derive(Error, Debug)]
pub enum ExportError {
    /// Destination could not be staged or replaced
    #[error("cannot write {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Destination exists and is marked read-only
    #[error("destination is read-only: {0}")]
    ReadOnly(PathBuf),

    /// Rendering the text buffer failed
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// What an export wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    /// `v` records
    pub positions: usize,
    /// `vn` records
    pub normals: usize,
    /// `f` records
    pub faces: usize,
    /// File size in bytes
    pub bytes: usize,
}

/// OBJ exporter
pub struct MeshExporter;

impl MeshExporter {
    /// Bake `model_matrix` into `asset` and write it to `destination`
    ///
    /// On error the destination is left exactly as it was.
    pub fn export_transformed(
        asset: &MeshAsset,
        model_matrix: &Mat4,
        destination: impl AsRef<Path>,
    ) -> Result<ExportStats, ExportError> {
        let destination = destination.as_ref();
        let stopwatch = Stopwatch::start_new();

        let (contents, stats) = Self::render(asset, model_matrix)?;
        write_staged(destination, contents.as_bytes())?;

        log::info!(
            "Baked {} vertices / {} faces into {} ({} bytes) in {:.1} ms",
            stats.positions,
            stats.faces,
            destination.display(),
            stats.bytes,
            stopwatch.elapsed_millis()
        );
        Ok(stats)
    }

    /// Render the transformed asset as OBJ text without touching the filesystem
    pub fn render(asset: &MeshAsset, model_matrix: &Mat4) -> Result<(String, ExportStats), ExportError> {
        let normal_matrix = normal_matrix_for(model_matrix);

        // Rough per-record sizes keep reallocation rare on large meshes
        let mut buffer = String::with_capacity(64 + asset.vertex_count() * 64 + asset.triangle_count() * 48);
        let mut stats = ExportStats::default();
        writeln!(buffer, "{HEADER}")?;

        let mut offset: u64 = 1;
        for mesh in asset.meshes() {
            for vertex in &mesh.vertices {
                let position = model_matrix.transform_point(&Point3::from(vertex.position));
                write_record(&mut buffer, "v", &position.coords)?;
            }

            for vertex in &mesh.vertices {
                let transformed = normal_matrix * vertex.normal_vec();
                let normal = checked_normal([transformed.x, transformed.y, transformed.z]).unwrap_or(FALLBACK_NORMAL);
                write_record(&mut buffer, "vn", &Vec3::from(normal))?;
            }

            for triangle in mesh.indices.chunks_exact(3) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|index| u64::from(index) + offset);
                writeln!(buffer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            }

            stats.positions += mesh.vertices.len();
            stats.normals += mesh.vertices.len();
            stats.faces += mesh.triangle_count();
            offset += mesh.vertices.len() as u64;
        }

        stats.bytes = buffer.len();
        Ok((buffer, stats))
    }
}

fn normal_matrix_for(model_matrix: &Mat4) -> Mat3 {
    model_matrix.normal_matrix().unwrap_or_else(|| {
        log::warn!("Model matrix is singular; transforming normals by its linear part");
        model_matrix.linear_part()
    })
}

fn write_record(buffer: &mut String, tag: &str, value: &Vec3) -> std::fmt::Result {
    writeln!(buffer, "{tag} {:.3} {:.3} {:.3}", tidy(value.x), tidy(value.y), tidy(value.z))
}

/// Fold values that print as zero onto +0 so the file never shows `-0.000`
fn tidy(value: f32) -> f32 {
    if value.abs() < 0.0005 { 0.0 } else { value }
}

fn write_staged(destination: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io { path: destination.to_path_buf(), source };

    let existing = fs::metadata(destination).ok();
    if let Some(metadata) = &existing {
        if metadata.permissions().readonly() {
            return Err(ExportError::ReadOnly(destination.to_path_buf()));
        }
    }

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".hairfit-bake")
        .tempfile_in(directory)
        .map_err(io_error)?;
    staged.write_all(contents).map_err(io_error)?;
    staged.as_file().sync_all().map_err(io_error)?;

    if let Some(metadata) = existing {
        fs::set_permissions(staged.path(), metadata.permissions()).map_err(io_error)?;
    }

    staged.persist(destination).map_err(|e| io_error(e.error))?;
    Ok(())
}
