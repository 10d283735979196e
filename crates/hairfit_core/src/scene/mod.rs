//! Scene management
//!
//! The placement session: the hair transform and the state that owns it.
//!
//! ```text
//! Input / UI (borrow per frame)
//!      ↓
//! SceneState (owns meshes, transform, camera)
//!      ↓
//! FrameData → RenderBackend
//! ```

pub mod state;
pub mod transform;

pub use state::{BakeOutcome, PlacementReport, SceneState};
pub use transform::SpatialTransform;
