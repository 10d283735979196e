//! # Scene State
//!
//! Everything the placement session knows: the two mesh slots, the hair
//! transform, the camera and the view toggles. The frame loop owns exactly one
//! [`SceneState`]; input and UI code borrow it mutably for the duration of a
//! single frame and never hold on to it.
//!
//! ## Loading
//! A failed load leaves the previous mesh and model path in place. A
//! successful hair load resets the transform to the configured reset scale
//! when `reset_on_load` is set, so a stale placement is never applied to a
//! differently sized mesh.
//!
//! ## Baking
//! The hair mesh is baked over its own model path. With `confirm_bake` set a
//! [`AppEvent::RequestBake`] only raises a pending confirmation. The in-memory
//! mesh and transform are left as they are whether the bake succeeds or not.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::application::{AppError, AppEvent};
use crate::assets::{ExportStats, ImportSummary, MeshExporter, MeshImporter};
use crate::core::config::{ApplicationConfig, ViewportConfig};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{
    compute_bounds, BoundingBox, DrawItem, FrameData, FreeFlyCamera, MeshAsset, MeshSlot, PointLight, RenderFlags,
};
use crate::scene::transform::SpatialTransform;

/// Result of the most recent bake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BakeOutcome {
    /// File written
    Written {
        /// Destination
        path: PathBuf,
        /// What was written
        stats: ExportStats,
    },
    /// Nothing was changed on disk
    Failed {
        /// Destination
        path: PathBuf,
        /// Why
        reason: String,
    },
}

impl BakeOutcome {
    /// Whether the file was written
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

impl fmt::Display for BakeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { path, stats } => {
                write!(f, "baked {} faces into {}", stats.faces, path.display())
            }
            Self::Failed { path, reason } => write!(f, "bake of {} failed: {reason}", path.display()),
        }
    }
}

/// Snapshot of the values shown next to the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    /// Hair position
    pub position: Vec3,
    /// Yaw, pitch and roll in degrees
    pub rotation: Vec3,
    /// Hair scale
    pub scale: f32,
    /// Hair color
    pub color: Vec3,
    /// Hair model path
    pub model_path: String,
    /// Head mesh bounds
    pub head_bounds: BoundingBox,
    /// Hair mesh bounds, untransformed
    pub hair_bounds: BoundingBox,
}

impl fmt::Display for PlacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, r, c) = (self.position, self.rotation, self.color);
        writeln!(f, "model:    {}", self.model_path)?;
        writeln!(f, "position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)?;
        writeln!(f, "rotation: yaw {:.1}, pitch {:.1}, roll {:.1}", r.x, r.y, r.z)?;
        writeln!(f, "scale:    {:.3}", self.scale)?;
        writeln!(f, "color:    ({:.2}, {:.2}, {:.2})", c.x, c.y, c.z)?;
        writeln!(f, "head:     {}", self.head_bounds)?;
        write!(f, "hair:     {}", self.hair_bounds)
    }
}

/// Placement session state
#[derive(Debug, Clone)]
pub struct SceneState {
    config: ApplicationConfig,
    viewport: ViewportConfig,
    head: MeshAsset,
    hair: MeshAsset,
    transform: SpatialTransform,
    camera: FreeFlyCamera,
    flags: RenderFlags,
    mouse_locked: bool,
    bake_pending: bool,
    last_bake: Option<BakeOutcome>,
    open_dialog_requested: bool,
    quit_requested: bool,
    dirty: Vec<MeshSlot>,
}

impl SceneState {
    /// Fresh session with empty slots
    pub fn new(config: ApplicationConfig) -> Self {
        let mut transform = SpatialTransform::new();
        transform.set_color(Vec3::from(config.placement.hair_color));
        transform.set_model_path(config.assets.hair_model.clone());

        Self {
            viewport: config.viewport.clone(),
            camera: FreeFlyCamera::from_config(&config.camera),
            config,
            head: MeshAsset::empty(),
            hair: MeshAsset::empty(),
            transform,
            flags: RenderFlags::initial(),
            mouse_locked: true,
            bake_pending: false,
            last_bake: None,
            open_dialog_requested: false,
            quit_requested: false,
            dirty: Vec::new(),
        }
    }

    /// Session with both slots already filled
    pub fn with_assets(config: ApplicationConfig, head: MeshAsset, hair: MeshAsset) -> Self {
        let mut state = Self::new(config);
        state.head = head;
        state.hair = hair;
        state.dirty = vec![MeshSlot::Head, MeshSlot::Hair];
        state
    }

    /// Import the configured head and hair meshes
    ///
    /// A missing or broken file leaves its slot empty; the session carries on.
    /// A hair mesh that did load gets the same reset as any later hair load.
    pub fn load_startup_assets(&mut self) {
        let head_path = self.config.assets.head_model.clone();
        let hair_path = self.config.assets.hair_model.clone();

        self.head = MeshImporter::import(&head_path);
        self.hair = MeshImporter::import(&hair_path);
        self.transform.set_model_path(hair_path);
        self.dirty = vec![MeshSlot::Head, MeshSlot::Hair];

        if self.hair.is_empty() {
            log::warn!("Hair slot is empty after startup ({})", self.transform.model_path());
        } else if self.config.placement.reset_on_load {
            self.transform.reset(self.config.placement.reset_scale);
        }
        if self.head.is_empty() {
            log::warn!("Head slot is empty after startup ({head_path})");
        }
        log::info!("Head bounds: {}", compute_bounds(&self.head));
        log::info!("Hair bounds: {}", compute_bounds(&self.hair));
    }

    /// Apply one event
    ///
    /// Errors are reported to the caller; state is unchanged when one is
    /// returned.
    pub fn handle_event(&mut self, event: AppEvent) -> Result<(), AppError> {
        log::debug!("Event: {event:?}");
        match event {
            AppEvent::LoadHair(path) => {
                self.load_hair(&path)?;
            }
            AppEvent::LoadHead(path) => {
                self.load_head(&path)?;
            }
            AppEvent::RequestBake => {
                if self.config.placement.confirm_bake {
                    log::info!("Bake over {} awaiting confirmation", self.transform.model_path());
                    self.bake_pending = true;
                } else {
                    self.bake();
                }
            }
            AppEvent::ConfirmBake => {
                if self.bake_pending {
                    self.bake_pending = false;
                    self.bake();
                } else {
                    log::debug!("ConfirmBake without a pending bake ignored");
                }
            }
            AppEvent::CancelBake => self.bake_pending = false,
            AppEvent::ResetTransform => self.transform.reset(self.config.placement.reset_scale),
            AppEvent::SetPosition(position) => self.transform.set_position(Vec3::from(position)),
            AppEvent::SetScale(scale) => self.transform.set_scale(scale),
            AppEvent::SetRotation { yaw, pitch, roll } => self.transform.set_rotation(yaw, pitch, roll),
            AppEvent::SetColor(color) => self.transform.set_color(Vec3::from(color)),
            AppEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    log::debug!("Ignoring resize to {width}x{height}");
                } else {
                    self.viewport = ViewportConfig { width, height };
                }
            }
            AppEvent::Quit => self.quit_requested = true,
        }
        Ok(())
    }

    /// Replace the hair mesh
    pub fn load_hair(&mut self, path: &Path) -> Result<ImportSummary, AppError> {
        if !self.config.assets.accepts_hair_file(path) {
            return Err(AppError::Rejected(format!(
                "{} is not one of {:?}",
                path.display(),
                self.config.assets.hair_extensions
            )));
        }

        let (asset, summary) = MeshImporter::try_import(path)?;
        self.hair = asset;
        self.transform.set_model_path(path.to_string_lossy());
        if self.config.placement.reset_on_load {
            self.transform.reset(self.config.placement.reset_scale);
        }
        self.bake_pending = false;
        self.mark_dirty(MeshSlot::Hair);

        log::info!("Hair bounds: {}", compute_bounds(&self.hair));
        Ok(summary)
    }

    /// Replace the head mesh
    pub fn load_head(&mut self, path: &Path) -> Result<ImportSummary, AppError> {
        let (asset, summary) = MeshImporter::try_import(path)?;
        self.head = asset;
        self.mark_dirty(MeshSlot::Head);

        log::info!("Head bounds: {}", compute_bounds(&self.head));
        Ok(summary)
    }

    /// Bake the hair transform into the hair file right away
    pub fn bake(&mut self) -> &BakeOutcome {
        let path = PathBuf::from(self.transform.model_path());
        let outcome = match self.export_hair(&path) {
            Ok(stats) => BakeOutcome::Written { path, stats },
            Err(e) => {
                log::error!("Bake failed: {e}");
                BakeOutcome::Failed { path, reason: e.to_string() }
            }
        };
        self.last_bake.insert(outcome)
    }

    /// Write the transformed hair mesh to `path`
    ///
    /// An empty hair slot is refused so the file is never replaced by a
    /// header-only mesh.
    pub fn export_hair(&self, path: &Path) -> Result<ExportStats, AppError> {
        if self.hair.is_empty() {
            return Err(AppError::Rejected("no hair mesh loaded".to_string()));
        }
        Ok(MeshExporter::export_transformed(&self.hair, &self.transform.model_matrix(), path)?)
    }

    /// Values for the placement panel
    pub fn placement_report(&self) -> PlacementReport {
        let transform = &self.transform;
        PlacementReport {
            position: transform.position(),
            rotation: Vec3::new(transform.rotation_y(), transform.rotation_x(), transform.rotation_z()),
            scale: transform.scale(),
            color: transform.color(),
            model_path: transform.model_path().to_string(),
            head_bounds: compute_bounds(&self.head),
            hair_bounds: compute_bounds(&self.hair),
        }
    }

    /// Build this frame's render input
    pub fn frame_data(&self, aspect: f32) -> FrameData {
        let placement = &self.config.placement;
        let mut items = Vec::with_capacity(2);

        if self.flags.shows(MeshSlot::Head) && !self.head.is_empty() {
            items.push(DrawItem {
                slot: MeshSlot::Head,
                model: Mat4::new_scaling(placement.head_scale),
                color: Vec3::from(placement.head_color),
            });
        }
        if self.flags.shows(MeshSlot::Hair) && !self.hair.is_empty() {
            items.push(DrawItem {
                slot: MeshSlot::Hair,
                model: self.transform.model_matrix(),
                color: self.transform.color(),
            });
        }

        FrameData {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(aspect),
            camera_position: self.camera.position(),
            light: PointLight {
                position: Vec3::from(placement.light_position),
                color: Vec3::from(placement.light_color),
            },
            items,
            wireframe: self.flags.contains(RenderFlags::WIREFRAME),
        }
    }

    /// Slots whose asset changed since the last call
    pub fn take_dirty_slots(&mut self) -> Vec<MeshSlot> {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self, slot: MeshSlot) {
        if !self.dirty.contains(&slot) {
            self.dirty.push(slot);
        }
    }

    /// Asset held in a slot
    pub const fn asset(&self, slot: MeshSlot) -> &MeshAsset {
        match slot {
            MeshSlot::Head => &self.head,
            MeshSlot::Hair => &self.hair,
        }
    }

    /// Head mesh
    pub const fn head(&self) -> &MeshAsset {
        &self.head
    }

    /// Hair mesh
    pub const fn hair(&self) -> &MeshAsset {
        &self.hair
    }

    /// Hair transform
    pub const fn transform(&self) -> &SpatialTransform {
        &self.transform
    }

    /// Mutable hair transform
    pub fn transform_mut(&mut self) -> &mut SpatialTransform {
        &mut self.transform
    }

    /// Camera
    pub const fn camera(&self) -> &FreeFlyCamera {
        &self.camera
    }

    /// Mutable camera
    pub fn camera_mut(&mut self) -> &mut FreeFlyCamera {
        &mut self.camera
    }

    /// View toggles
    pub const fn flags(&self) -> RenderFlags {
        self.flags
    }

    /// Mutable view toggles
    pub fn flags_mut(&mut self) -> &mut RenderFlags {
        &mut self.flags
    }

    /// Whether mouse movement drives the camera
    pub const fn mouse_locked(&self) -> bool {
        self.mouse_locked
    }

    /// Flip mouse capture
    pub fn toggle_mouse_lock(&mut self) {
        self.mouse_locked = !self.mouse_locked;
        log::debug!("Mouse {}", if self.mouse_locked { "locked" } else { "released" });
    }

    /// Whether a bake is waiting for confirmation
    pub const fn bake_pending(&self) -> bool {
        self.bake_pending
    }

    /// Most recent bake result
    pub const fn last_bake(&self) -> Option<&BakeOutcome> {
        self.last_bake.as_ref()
    }

    /// Ask the platform to show a file picker
    pub fn request_open_dialog(&mut self) {
        self.open_dialog_requested = true;
    }

    /// Consume a pending file picker request
    pub fn take_open_dialog_request(&mut self) -> bool {
        std::mem::take(&mut self.open_dialog_requested)
    }

    /// Whether the session should end
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Current framebuffer size
    pub const fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    /// Configuration the session was started with
    pub const fn config(&self) -> &ApplicationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AssetConfig;
    use crate::render::primitives::Mesh;
    use approx::assert_relative_eq;
    use std::fs;

    fn cube() -> MeshAsset {
        MeshAsset::from_mesh(Mesh::unit_cube()).unwrap()
    }

    fn config_in(dir: &Path) -> ApplicationConfig {
        let mut config = ApplicationConfig::default();
        config.assets = AssetConfig::new().with_models(
            dir.join("head.obj").to_string_lossy(),
            dir.join("hair.obj").to_string_lossy(),
        );
        config
    }

    fn write_triangle(path: &Path) {
        fs::write(path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
    }

    #[test]
    fn test_new_state_uses_config() {
        let state = SceneState::new(ApplicationConfig::default());
        assert_eq!(state.transform().model_path(), "models/hair_front.obj");
        assert_eq!(state.transform().color(), Vec3::new(0.5, 0.3, 0.2));
        assert_eq!(state.flags(), RenderFlags::initial());
        assert!(state.head().is_empty() && state.hair().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_previous_hair() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SceneState::with_assets(config_in(dir.path()), cube(), cube());
        state.take_dirty_slots();
        state.handle_event(AppEvent::SetScale(3.0)).unwrap();

        let result = state.handle_event(AppEvent::LoadHair(dir.path().join("missing.obj")));

        assert!(matches!(result, Err(AppError::Import(_))));
        assert_eq!(state.hair().vertex_count(), 24);
        assert_eq!(state.transform().scale(), 3.0);
        assert!(state.transform().model_path().ends_with("hair.obj"));
        assert!(state.take_dirty_slots().is_empty());
    }

    #[test]
    fn test_wrong_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SceneState::new(config_in(dir.path()));
        let result = state.load_hair(&dir.path().join("hair.ply"));
        assert!(matches!(result, Err(AppError::Rejected(_))));
    }

    #[test]
    fn test_successful_load_resets_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bangs.obj");
        write_triangle(&path);

        let mut state = SceneState::new(config_in(dir.path()));
        state.handle_event(AppEvent::SetPosition([1.0, 2.0, 3.0])).unwrap();
        state.handle_event(AppEvent::SetScale(4.0)).unwrap();
        state.handle_event(AppEvent::LoadHair(path.clone())).unwrap();

        assert_eq!(state.hair().vertex_count(), 3);
        assert_eq!(state.transform().position(), Vec3::zeros());
        assert_eq!(state.transform().scale(), 1.0);
        assert_eq!(state.transform().model_path(), path.to_string_lossy());
        assert_eq!(state.take_dirty_slots(), vec![MeshSlot::Hair]);
    }

    #[test]
    fn test_startup_load_resets_transform() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_triangle(Path::new(&config.assets.head_model));
        write_triangle(Path::new(&config.assets.hair_model));

        let mut state = SceneState::new(config);
        assert_eq!(state.transform().scale(), 0.5);
        state.load_startup_assets();

        assert_eq!(state.transform().scale(), 1.0);
        assert_eq!(state.transform().position(), Vec3::zeros());
        assert_eq!(state.transform().color(), Vec3::new(0.5, 0.3, 0.2));
        assert_eq!(state.take_dirty_slots(), vec![MeshSlot::Head, MeshSlot::Hair]);
    }

    #[test]
    fn test_startup_without_hair_keeps_initial_scale() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SceneState::new(config_in(dir.path()));
        state.load_startup_assets();

        assert!(state.hair().is_empty());
        assert_eq!(state.transform().scale(), 0.5);
    }

    #[test]
    fn test_load_without_reset_keeps_placement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bangs.obj");
        write_triangle(&path);

        let mut config = config_in(dir.path());
        config.placement.reset_on_load = false;
        let mut state = SceneState::new(config);
        state.handle_event(AppEvent::SetScale(4.0)).unwrap();
        state.load_hair(&path).unwrap();

        assert_eq!(state.transform().scale(), 4.0);
    }

    #[test]
    fn test_bake_waits_for_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let hair_path = PathBuf::from(&config.assets.hair_model);
        let mut state = SceneState::with_assets(config, cube(), cube());

        state.handle_event(AppEvent::RequestBake).unwrap();
        assert!(state.bake_pending());
        assert!(!hair_path.exists());

        state.handle_event(AppEvent::CancelBake).unwrap();
        state.handle_event(AppEvent::ConfirmBake).unwrap();
        assert!(!hair_path.exists());

        state.handle_event(AppEvent::RequestBake).unwrap();
        state.handle_event(AppEvent::ConfirmBake).unwrap();
        assert!(!state.bake_pending());
        assert!(state.last_bake().is_some_and(BakeOutcome::succeeded));
        assert!(hair_path.exists());
    }

    #[test]
    fn test_bake_without_confirmation_writes_transformed_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.placement.confirm_bake = false;
        let hair_path = PathBuf::from(&config.assets.hair_model);
        let mut state = SceneState::with_assets(config, cube(), cube());
        state.handle_event(AppEvent::SetPosition([0.0, 10.0, 0.0])).unwrap();

        state.handle_event(AppEvent::RequestBake).unwrap();

        let baked = MeshImporter::import(&hair_path);
        let bounds = compute_bounds(&baked);
        // Default scale is 0.5, so the cube spans 0.5 around y = 10
        assert_relative_eq!(bounds.min.y, 9.75, epsilon = 1e-3);
        assert_relative_eq!(bounds.max.y, 10.25, epsilon = 1e-3);
        // The session keeps showing the same placement
        assert_eq!(state.transform().position(), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(state.hair().vertex_count(), 24);
    }

    #[test]
    fn test_failed_bake_is_reported_and_leaves_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.assets.hair_model = dir.path().join("no_such_dir").join("hair.obj").to_string_lossy().into_owned();
        config.placement.confirm_bake = false;
        let mut state = SceneState::with_assets(config, cube(), cube());
        let before = state.transform().clone();

        let outcome = state.bake().clone();
        let direct = state.export_hair(Path::new(state.transform().model_path()));

        assert!(!outcome.succeeded());
        assert!(matches!(direct, Err(AppError::Export(_))));
        assert_eq!(state.transform(), &before);
        assert_eq!(state.hair().vertex_count(), 24);
    }

    #[test]
    fn test_bake_refused_with_empty_hair() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let hair_path = PathBuf::from(&config.assets.hair_model);
        fs::write(&hair_path, "keep me").unwrap();

        let mut state = SceneState::new(config);
        assert!(!state.bake().succeeded());
        assert!(matches!(state.export_hair(&hair_path), Err(AppError::Rejected(_))));
        assert_eq!(fs::read_to_string(&hair_path).unwrap(), "keep me");
    }

    #[test]
    fn test_frame_data_respects_visibility() {
        let mut state = SceneState::with_assets(ApplicationConfig::default(), cube(), cube());
        let frame = state.frame_data(16.0 / 9.0);
        assert_eq!(frame.items.len(), 2);
        assert_eq!(frame.items[0].slot, MeshSlot::Head);
        assert_eq!(frame.item(MeshSlot::Hair).unwrap().model, state.transform().model_matrix());

        state.flags_mut().set_visibility(false, true);
        state.flags_mut().insert(RenderFlags::WIREFRAME);
        let frame = state.frame_data(1.0);
        assert_eq!(frame.items.len(), 1);
        assert!(frame.item(MeshSlot::Head).is_none());
        assert!(frame.wireframe);
    }

    #[test]
    fn test_frame_data_skips_empty_slots() {
        let state = SceneState::with_assets(ApplicationConfig::default(), MeshAsset::empty(), cube());
        let frame = state.frame_data(1.0);
        assert_eq!(frame.items.len(), 1);
        assert_eq!(frame.items[0].slot, MeshSlot::Hair);
    }

    #[test]
    fn test_placement_report() {
        let mut state = SceneState::with_assets(ApplicationConfig::default(), cube(), MeshAsset::empty());
        state.handle_event(AppEvent::SetRotation { yaw: 15.0, pitch: -5.0, roll: 2.0 }).unwrap();

        let report = state.placement_report();
        assert_eq!(report.rotation, Vec3::new(15.0, -5.0, 2.0));
        assert_eq!(report.head_bounds.max, Vec3::new(0.5, 0.5, 0.5));
        assert!(report.hair_bounds.is_empty());

        let text = report.to_string();
        assert!(text.contains("yaw 15.0, pitch -5.0, roll 2.0"));
        assert!(text.contains("hair:     empty"));
    }

    #[test]
    fn test_reset_and_resize_events() {
        let mut state = SceneState::new(ApplicationConfig::default());
        state.handle_event(AppEvent::SetPosition([4.0, 0.0, 0.0])).unwrap();
        state.handle_event(AppEvent::ResetTransform).unwrap();
        assert_eq!(state.transform().position(), Vec3::zeros());
        assert_eq!(state.transform().scale(), 1.0);

        state.handle_event(AppEvent::Resized { width: 800, height: 400 }).unwrap();
        assert_eq!(state.viewport().aspect_ratio(), 2.0);
        state.handle_event(AppEvent::Resized { width: 0, height: 400 }).unwrap();
        assert_eq!(state.viewport().width, 800);

        state.handle_event(AppEvent::Quit).unwrap();
        assert!(state.quit_requested());
    }
}
