//! One-shot subcommands

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use hairfit_core::prelude::*;

/// Placement to bake
#[derive(Args, Debug, Clone)]
pub struct BakeArgs {
    /// Mesh to transform
    pub mesh: PathBuf,

    /// Destination, defaults to overwriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Translation
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub position: Option<Vec<f32>>,

    /// Rotation around Y in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub yaw: f32,

    /// Rotation around X in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pitch: f32,

    /// Rotation around Z in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub roll: f32,

    /// Uniform scale, never below 0.1
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Confirm overwriting the input mesh
    #[arg(short, long)]
    pub yes: bool,
}

impl BakeArgs {
    /// Transform described by the arguments
    pub fn transform(&self) -> SpatialTransform {
        let mut transform = SpatialTransform::identity();
        if let Some([x, y, z]) = self.position.as_deref().and_then(|p| <[f32; 3]>::try_from(p).ok()) {
            transform.set_position(Vec3::new(x, y, z));
        }
        transform.set_rotation(self.yaw, self.pitch, self.roll);
        transform.set_scale(self.scale);
        transform
    }

    /// Where the baked mesh goes
    pub fn destination(&self) -> &Path {
        self.output.as_deref().unwrap_or(self.mesh.as_path())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// `hairfit inspect`
pub fn inspect(mesh: &Path) -> anyhow::Result<()> {
    let (asset, summary) = MeshImporter::try_import(mesh).with_context(|| format!("importing {}", mesh.display()))?;
    let bounds = compute_bounds(&asset);

    println!("{}", mesh.display());
    println!("  sub-meshes: {}", summary.meshes);
    println!("  vertices:   {}", summary.vertices);
    println!("  triangles:  {}", summary.triangles);
    if summary.generated_normals > 0 {
        println!("  normals generated for {} sub-meshes", summary.generated_normals);
    }
    if summary.fallback_normals > 0 {
        println!("  fallback normals:   {}", summary.fallback_normals);
    }
    println!("  bounds:     {bounds}");
    if let (Some(center), Some(size)) = (bounds.center(), bounds.size()) {
        println!("  center:     ({:.3}, {:.3}, {:.3})", center.x, center.y, center.z);
        println!("  size:       ({:.3}, {:.3}, {:.3})", size.x, size.y, size.z);
    }
    Ok(())
}

/// `hairfit bake`
pub fn bake(args: &BakeArgs) -> anyhow::Result<ExportStats> {
    let destination = args.destination();
    if same_file(&args.mesh, destination) && !args.yes {
        bail!(
            "refusing to overwrite {} without --yes (or pass --output)",
            args.mesh.display()
        );
    }

    let (asset, _) = MeshImporter::try_import(&args.mesh).with_context(|| format!("importing {}", args.mesh.display()))?;
    let transform = args.transform();
    let stats = MeshExporter::export_transformed(&asset, &transform.model_matrix(), destination)
        .with_context(|| format!("baking into {}", destination.display()))?;

    println!("{} faces written to {}", stats.faces, destination.display());
    Ok(stats)
}
