//! Mesh file import and export
//!
//! Only Wavefront OBJ is supported in both directions.

pub mod obj_exporter;
pub mod obj_loader;

pub use obj_exporter::{ExportError, ExportStats, MeshExporter};
pub use obj_loader::{ImportError, ImportSummary, MeshImporter};
