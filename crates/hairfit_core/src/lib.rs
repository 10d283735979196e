//! # hairfit core
//!
//! Placement of a hair mesh on a head mesh, and baking of that placement
//! back into the hair's OBJ file.
//!
//! ## Features
//!
//! - **Mesh import**: OBJ through `tobj`, triangulated, with normals generated
//!   or repaired
//! - **Placement**: translate, rotate (three Euler angles) and uniformly scale
//!   the hair, composed into one model matrix
//! - **Baking**: write the transformed hair back as OBJ without ever leaving a
//!   half-written file behind
//! - **Frame loop**: camera, key bindings and view toggles driving any
//!   [`render::RenderBackend`] through a [`Platform`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hairfit_core::prelude::*;
//!
//! let hair = MeshImporter::import("models/hair_front.obj");
//! let mut transform = SpatialTransform::new();
//! transform.set_position(Vec3::new(0.0, 0.2, 0.0));
//! transform.set_scale(1.1);
//!
//! MeshExporter::export_transformed(&hair, &transform.model_matrix(), "models/hair_baked.obj")?;
//! # Ok::<(), hairfit_core::assets::ExportError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod render;
pub mod input;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, AppEvent};
pub use engine::{Engine, EngineError, Platform};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        AppError, AppEvent,
        Engine, EngineError, Platform,
        assets::{ExportError, ExportStats, ImportError, MeshExporter, MeshImporter},
        core::{ApplicationConfig, Config},
        foundation::{
            math::{Mat4, Vec3},
            time::{Stopwatch, Timer},
        },
        input::{Adjustment, Axis, FrameInput, InputManager, KeyBindings, KeyCode},
        render::{
            compute_bounds, BoundingBox, FrameData, FreeFlyCamera, Mesh, MeshAsset, MeshSlot, RenderBackend,
            RenderError, RenderFlags, Vertex,
        },
        scene::{BakeOutcome, PlacementReport, SceneState, SpatialTransform},
    };
}
