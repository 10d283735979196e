//! Scripted sessions
//!
//! A replay script is a RON file listing the input of every frame. It runs
//! through the real [`Engine`] loop with a backend that only logs what it
//! would draw, which makes interactive behavior reproducible without a
//! window.
//!
//! ```ron
//! (
//!     frames: [
//!         (held_keys: [I], delta_time: Some(0.5)),
//!         (events: [SetScale(1.2), RequestBake, ConfirmBake]),
//!     ],
//! )
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hairfit_core::prelude::*;
use hairfit_core::render::BackendResult;
use serde::Deserialize;

/// Step used for frames that do not set `delta_time`
const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// Parsed replay file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Import the configured head and hair before the first frame
    pub load_startup_assets: bool,
    /// Mesh returned when the session asks for a file to open
    pub pick_file: Option<PathBuf>,
    /// Per-frame input
    pub frames: Vec<FrameInput>,
}

impl Default for ReplayScript {
    fn default() -> Self {
        Self { load_startup_assets: true, pick_file: None, frames: Vec::new() }
    }
}

impl ReplayScript {
    /// Read a script from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        ron::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Platform fed from a script
pub struct ScriptedPlatform {
    frames: VecDeque<FrameInput>,
    pick_file: Option<PathBuf>,
    presented: u64,
}

impl ScriptedPlatform {
    /// Platform that plays back `script`
    pub fn new(script: ReplayScript) -> Self {
        Self { frames: script.frames.into(), pick_file: script.pick_file, presented: 0 }
    }
}

impl Platform for ScriptedPlatform {
    fn poll_frame(&mut self) -> FrameInput {
        let mut frame = self.frames.pop_front().unwrap_or_default();
        frame.delta_time.get_or_insert(DEFAULT_STEP);
        frame
    }

    fn should_close(&self) -> bool {
        self.frames.is_empty()
    }

    fn present(&mut self) -> Result<(), EngineError> {
        self.presented += 1;
        log::trace!("present #{}", self.presented);
        Ok(())
    }

    fn pick_file(&mut self, start_dir: &Path) -> Option<PathBuf> {
        log::debug!("file picker opened in {}", start_dir.display());
        self.pick_file.clone()
    }
}

/// Backend that only logs
#[derive(Debug, Default)]
pub struct LoggingBackend {
    draws: u64,
}

impl RenderBackend for LoggingBackend {
    fn upload_mesh(&mut self, slot: MeshSlot, asset: &MeshAsset) -> BackendResult<()> {
        log::info!(
            "upload {}: {} vertices, {} triangles",
            slot.name(),
            asset.vertex_count(),
            asset.triangle_count()
        );
        Ok(())
    }

    fn draw(&mut self, frame: &FrameData) -> BackendResult<()> {
        self.draws += 1;
        log::trace!(
            "draw #{}: {} items{}",
            self.draws,
            frame.items.len(),
            if frame.wireframe { " (wireframe)" } else { "" }
        );
        Ok(())
    }
}

/// `hairfit replay`
pub fn run(config: ApplicationConfig, script_path: &Path) -> anyhow::Result<()> {
    let script = ReplayScript::load(script_path)?;
    let report = replay(config, script)?;
    println!("{report}");
    Ok(())
}

/// Play a script to completion and return the final placement
pub fn replay(config: ApplicationConfig, script: ReplayScript) -> anyhow::Result<String> {
    let mut engine = Engine::new(config)?;
    if script.load_startup_assets {
        engine.load_startup_assets();
    }

    let mut platform = ScriptedPlatform::new(script);
    let mut backend = LoggingBackend::default();
    let frames = engine.run(&mut platform, &mut backend)?;

    let state = engine.state();
    let report = format!("{frames} frames drawn\n{}", state.placement_report());
    Ok(match state.last_bake() {
        Some(outcome) => format!("{report}\nlast bake: {outcome}"),
        None => report,
    })
}
