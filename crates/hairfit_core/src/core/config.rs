//! # Application Configuration
//!
//! All tunables of the placement tool in one place. Every section has
//! defaults matching the stock layout (`models/` in the
//! working directory), so running without a config file is the normal case.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging
//! - **Asset Config**: where the head and hair meshes live
//! - **Camera Config**: free-fly camera start pose and projection
//! - **Placement Config**: reset scale, colors, lighting and bake behavior
//! - **Viewport Config**: framebuffer size used for the projection aspect

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::scene::transform::MIN_SCALE;

/// # Engine Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Asset Configuration
///
/// Paths of the two mesh slots and the directories the tool reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory offered when picking a new hair mesh
    pub models_dir: String,
    /// Bald head mesh loaded at startup
    pub head_model: String,
    /// Hair mesh loaded at startup
    pub hair_model: String,
    /// File extensions accepted when picking a hair mesh
    pub hair_extensions: Vec<String>,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self {
            models_dir: "models".to_string(),
            head_model: "models/bald_head.obj".to_string(),
            hair_model: "models/hair_front.obj".to_string(),
            hair_extensions: vec!["obj".to_string()],
        }
    }

    /// Set both model paths
    pub fn with_models(mut self, head: impl Into<String>, hair: impl Into<String>) -> Self {
        self.head_model = head.into();
        self.hair_model = hair.into();
        self
    }

    /// Whether a path has one of the accepted hair extensions
    pub fn accepts_hair_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.hair_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Camera Configuration
///
/// Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Start position in world space
    pub position: [f32; 3],
    /// Start yaw; -90 looks down -Z
    pub yaw: f32,
    /// Start pitch
    pub pitch: f32,
    /// Units per second for keyboard movement
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Start field of view
    pub fov: f32,
    /// Narrowest zoom
    pub min_fov: f32,
    /// Widest zoom
    pub max_fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.5, 5.0],
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            fov: 60.0,
            min_fov: 30.0,
            max_fov: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// # Placement Configuration
///
/// Controls how the hair slot behaves when reset, reloaded and baked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Scale applied by "reset transform" and after loading a new hair mesh
    pub reset_scale: f32,
    /// Uniform scale applied to the head mesh
    pub head_scale: f32,
    /// Initial hair color
    pub hair_color: [f32; 3],
    /// Head color
    pub head_color: [f32; 3],
    /// Point light position
    pub light_position: [f32; 3],
    /// Point light color
    pub light_color: [f32; 3],
    /// Reset the hair transform whenever a new hair mesh is loaded
    pub reset_on_load: bool,
    /// Require an explicit confirmation before baking over the hair file
    pub confirm_bake: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            reset_scale: 1.0,
            head_scale: 1.0,
            hair_color: [0.5, 0.3, 0.2],
            head_color: [1.0, 0.9, 0.7],
            light_position: [2.0, 2.0, 5.0],
            light_color: [1.5, 1.5, 1.5],
            reset_on_load: true,
            confirm_bake: true,
        }
    }
}

/// # Viewport Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
}

impl ViewportConfig {
    /// Width over height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration the binary loads once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Mesh locations
    pub assets: AssetConfig,
    /// Camera start pose and projection
    pub camera: CameraConfig,
    /// Hair placement behavior
    pub placement: PlacementConfig,
    /// Framebuffer size
    pub viewport: ViewportConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.head_model.is_empty() || self.assets.hair_model.is_empty() {
            return Err(ConfigError::Invalid("model paths cannot be empty".to_string()));
        }

        let camera = &self.camera;
        if camera.near <= 0.0 {
            return Err(ConfigError::Invalid(format!("near plane must be positive, got {}", camera.near)));
        }
        if camera.far <= camera.near {
            return Err(ConfigError::Invalid(format!(
                "far plane ({}) must lie beyond near plane ({})", camera.far, camera.near
            )));
        }
        if camera.min_fov > camera.max_fov {
            return Err(ConfigError::Invalid(format!(
                "min_fov ({}) exceeds max_fov ({})", camera.min_fov, camera.max_fov
            )));
        }

        if self.placement.reset_scale < MIN_SCALE {
            return Err(ConfigError::Invalid(format!(
                "reset_scale must be at least {MIN_SCALE}, got {}", self.placement.reset_scale
            )));
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid("viewport must be non-empty".to_string()));
        }

        Ok(())
    }
}

impl Config for ApplicationConfig {}
