//! Core engine implementation
//!
//! The engine owns the [`SceneState`] and drives one synchronous frame loop:
//!
//! 1. step the timer
//! 2. poll the platform for a [`FrameInput`]
//! 3. let the [`InputManager`] apply it to the scene
//! 4. apply the resulting events
//! 5. re-upload any mesh slot that changed
//! 6. draw and present
//!
//! Import and export run inline on this loop and stall it for their duration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::ApplicationConfig;
use crate::config::ConfigError;
use crate::foundation::time::Timer;
use crate::input::{FrameInput, InputManager};
use crate::render::{RenderBackend, RenderError};
use crate::application::AppEvent;
use crate::scene::SceneState;

/// Window and input source
pub trait Platform {
    /// Collect the input observed since the previous call
    fn poll_frame(&mut self) -> FrameInput;

    /// Whether the user closed the window
    fn should_close(&self) -> bool;

    /// Show the frame that was just drawn
    fn present(&mut self) -> Result<(), EngineError>;

    /// Ask the user for a hair mesh to open, starting in `start_dir`
    ///
    /// Platforms without a file picker return `None`.
    fn pick_file(&mut self, _start_dir: &Path) -> Option<PathBuf> {
        None
    }
}

/// Main engine struct
pub struct Engine {
    state: SceneState,
    input: InputManager,
    timer: Timer,
    running: bool,
}

impl Engine {
    /// Create an engine with empty mesh slots
    pub fn new(config: ApplicationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");
        Ok(Self::with_state(SceneState::new(config), InputManager::default()))
    }

    /// Create an engine around existing state
    pub fn with_state(state: SceneState, input: InputManager) -> Self {
        Self { state, input, timer: Timer::new(), running: true }
    }

    /// Import the configured head and hair meshes
    pub fn load_startup_assets(&mut self) {
        self.state.load_startup_assets();
    }

    /// Run until the scene asks to quit or the platform closes
    ///
    /// Returns the number of frames drawn.
    pub fn run<P, B>(&mut self, platform: &mut P, backend: &mut B) -> Result<u64, EngineError>
    where
        P: Platform + ?Sized,
        B: RenderBackend + ?Sized,
    {
        log::info!("Starting main loop...");
        let mut frames = 0;

        while self.running && !platform.should_close() {
            if self.frame(platform, backend)? {
                frames += 1;
            }
        }

        log::info!("Engine shutdown complete after {frames} frames");
        Ok(frames)
    }

    /// Run a single iteration
    ///
    /// Returns whether a frame was drawn; a frame that ends in a quit request
    /// is not drawn.
    pub fn frame<P, B>(&mut self, platform: &mut P, backend: &mut B) -> Result<bool, EngineError>
    where
        P: Platform + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let input = platform.poll_frame();
        match input.delta_time {
            Some(delta_time) => self.timer.advance(delta_time),
            None => self.timer.update(),
        }
        let delta_time = self.timer.delta_time();

        let events = self.input.process(&input, &mut self.state, delta_time);
        for event in events {
            self.dispatch(event);
        }

        if self.state.take_open_dialog_request() {
            let start_dir = Path::new(&self.state.config().assets.models_dir);
            match platform.pick_file(start_dir) {
                Some(path) => self.dispatch(AppEvent::LoadHair(path)),
                None => log::debug!("No file picked"),
            }
        }

        if self.state.quit_requested() {
            self.running = false;
            return Ok(false);
        }

        for slot in self.state.take_dirty_slots() {
            log::debug!("Uploading {} mesh", slot.name());
            backend.upload_mesh(slot, self.state.asset(slot))?;
        }

        let aspect = self.state.viewport().aspect_ratio();
        backend.draw(&self.state.frame_data(aspect))?;
        platform.present()?;
        Ok(true)
    }

    fn dispatch(&mut self, event: AppEvent) {
        // Scene errors are reported but never end the session
        if let Err(e) = self.state.handle_event(event) {
            log::error!("{e}");
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop would continue
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Scene state
    pub const fn state(&self) -> &SceneState {
        &self.state
    }

    /// Mutable scene state
    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    /// Frame clock
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected at startup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend failed to upload or draw
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Window or presentation failure
    #[error("Platform error: {0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::render::{FrameData, MeshAsset, MeshSlot, Mesh};
    use crate::render::api::BackendResult;
    use std::collections::VecDeque;

    struct ScriptedPlatform {
        frames: VecDeque<FrameInput>,
        presented: usize,
        picked: Option<PathBuf>,
        start_dirs: Vec<PathBuf>,
    }

    impl ScriptedPlatform {
        fn new(frames: Vec<FrameInput>) -> Self {
            Self { frames: frames.into(), presented: 0, picked: None, start_dirs: Vec::new() }
        }
    }

    impl Platform for ScriptedPlatform {
        fn poll_frame(&mut self) -> FrameInput {
            self.frames.pop_front().unwrap_or_default()
        }

        fn should_close(&self) -> bool {
            self.frames.is_empty()
        }

        fn present(&mut self) -> Result<(), EngineError> {
            self.presented += 1;
            Ok(())
        }

        fn pick_file(&mut self, start_dir: &Path) -> Option<PathBuf> {
            self.start_dirs.push(start_dir.to_path_buf());
            self.picked.take()
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        uploads: Vec<(MeshSlot, usize)>,
        frames: Vec<FrameData>,
        fail_draw: bool,
    }

    impl RenderBackend for RecordingBackend {
        fn upload_mesh(&mut self, slot: MeshSlot, asset: &MeshAsset) -> BackendResult<()> {
            self.uploads.push((slot, asset.vertex_count()));
            Ok(())
        }

        fn draw(&mut self, frame: &FrameData) -> BackendResult<()> {
            if self.fail_draw {
                return Err(RenderError::RenderingFailed("device lost".to_string()));
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn step(dt: f32) -> FrameInput {
        FrameInput { delta_time: Some(dt), ..FrameInput::default() }
    }

    fn engine_with_cube() -> Engine {
        let cube = MeshAsset::from_mesh(Mesh::unit_cube()).unwrap();
        let state = SceneState::with_assets(ApplicationConfig::default(), cube.clone(), cube);
        Engine::with_state(state, InputManager::default())
    }

    #[test]
    fn test_run_uploads_once_and_draws_every_frame() {
        let mut engine = engine_with_cube();
        let mut platform = ScriptedPlatform::new(vec![step(0.1), step(0.1), step(0.1)]);
        let mut backend = RecordingBackend::default();

        let frames = engine.run(&mut platform, &mut backend).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(platform.presented, 3);
        assert_eq!(backend.uploads, vec![(MeshSlot::Head, 24), (MeshSlot::Hair, 24)]);
        assert_eq!(backend.frames.len(), 3);
        assert_eq!(engine.timer().frame_count(), 3);
    }

    #[test]
    fn test_held_key_moves_hair_in_drawn_frame() {
        let mut engine = engine_with_cube();
        let mut frame = step(1.0);
        frame.held_keys = vec![KeyCode::I];
        let mut platform = ScriptedPlatform::new(vec![frame]);
        let mut backend = RecordingBackend::default();

        engine.run(&mut platform, &mut backend).unwrap();

        let hair = backend.frames[0].item(MeshSlot::Hair).unwrap();
        assert_eq!(hair.model, engine.state().transform().model_matrix());
        assert!((engine.state().transform().position().y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_quit_stops_before_drawing() {
        let mut engine = engine_with_cube();
        let mut quit = step(0.1);
        quit.held_keys = vec![KeyCode::Escape];
        let mut platform = ScriptedPlatform::new(vec![step(0.1), quit, step(0.1)]);
        let mut backend = RecordingBackend::default();

        let frames = engine.run(&mut platform, &mut backend).unwrap();

        assert_eq!(frames, 1);
        assert!(!engine.is_running());
        assert_eq!(platform.frames.len(), 1);
    }

    #[test]
    fn test_failed_load_does_not_stop_the_loop() {
        let mut engine = engine_with_cube();
        let mut load = step(0.1);
        load.events = vec![AppEvent::LoadHair(PathBuf::from("nowhere/hair.obj"))];
        let mut platform = ScriptedPlatform::new(vec![load, step(0.1)]);
        let mut backend = RecordingBackend::default();

        assert_eq!(engine.run(&mut platform, &mut backend).unwrap(), 2);
        assert_eq!(engine.state().hair().vertex_count(), 24);
        assert_eq!(backend.uploads.len(), 2);
    }

    #[test]
    fn test_picked_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picked.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut engine = engine_with_cube();
        let mut open = step(0.1);
        open.held_keys = vec![KeyCode::O];
        let mut platform = ScriptedPlatform::new(vec![open]);
        platform.picked = Some(path);
        let mut backend = RecordingBackend::default();

        engine.run(&mut platform, &mut backend).unwrap();

        assert_eq!(engine.state().hair().vertex_count(), 3);
        assert_eq!(backend.uploads.last(), Some(&(MeshSlot::Hair, 3)));
        assert_eq!(platform.start_dirs, vec![PathBuf::from("models")]);
    }

    #[test]
    fn test_backend_failure_is_propagated() {
        let mut engine = engine_with_cube();
        let mut platform = ScriptedPlatform::new(vec![step(0.1)]);
        let mut backend = RecordingBackend { fail_draw: true, ..RecordingBackend::default() };

        let result = engine.run(&mut platform, &mut backend);
        assert!(matches!(result, Err(EngineError::Render(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ApplicationConfig::default();
        config.camera.near = 0.0;
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }
}
