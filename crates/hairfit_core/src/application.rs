//! Application events and errors
//!
//! Events are the only way the input layer, the UI and scripted drivers ask
//! the scene to change in a way that is not a continuous adjustment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{ExportError, ImportError};

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A mesh could not be imported
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// A mesh could not be baked
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Request refused before touching any state
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Replace the hair mesh with the file at this path
    LoadHair(PathBuf),

    /// Replace the head mesh with the file at this path
    LoadHead(PathBuf),

    /// Bake the transform into the hair file, asking first when configured
    RequestBake,

    /// Answer "yes" to a pending bake
    ConfirmBake,

    /// Answer "no" to a pending bake
    CancelBake,

    /// Put the hair back at the origin with the configured reset scale
    ResetTransform,

    /// Direct position edit
    SetPosition([f32; 3]),

    /// Direct scale edit
    SetScale(f32),

    /// Direct rotation edit, degrees
    SetRotation {
        /// Around Y
        yaw: f32,
        /// Around X
        pitch: f32,
        /// Around Z
        roll: f32,
    },

    /// Direct hair color edit
    SetColor([f32; 3]),

    /// Framebuffer was resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// Leave the frame loop
    Quit,
}
