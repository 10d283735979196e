//! Key-to-action dispatch table
//!
//! Keys never call into the scene directly. Each key maps to an [`Action`],
//! and widget buttons produce the same [`Adjustment`] values keys do, so both
//! paths mutate the transform identically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;
use crate::render::CameraMovement;
use crate::scene::SpatialTransform;

/// World axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Right
    X,
    /// Up
    Y,
    /// Towards the viewer
    Z,
}

/// Continuous change to the hair transform while a key or button is held
///
/// `direction` is normally +1 or -1; the transform's rate and the frame time
/// turn it into an actual delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Adjustment {
    /// Move along an axis
    Position {
        /// Axis to move along
        axis: Axis,
        /// Signed amount
        direction: f32,
    },
    /// Grow or shrink
    Scale(f32),
    /// Rotate around an axis (Y yaw, X pitch, Z roll)
    Rotation {
        /// Axis to rotate around
        axis: Axis,
        /// Signed amount
        direction: f32,
    },
}

impl Adjustment {
    /// Apply for `delta_time` seconds
    pub fn apply(self, transform: &mut SpatialTransform, delta_time: f32) {
        match self {
            Self::Position { axis, direction } => {
                let [dx, dy, dz] = axis_components(axis, direction);
                transform.adjust_position(dx, dy, dz, delta_time);
            }
            Self::Scale(direction) => transform.adjust_scale(direction, delta_time),
            Self::Rotation { axis, direction } => {
                let [pitch, yaw, roll] = axis_components(axis, direction);
                transform.adjust_rotation(yaw, pitch, roll, delta_time);
            }
        }
    }
}

fn axis_components(axis: Axis, amount: f32) -> [f32; 3] {
    match axis {
        Axis::X => [amount, 0.0, 0.0],
        Axis::Y => [0.0, amount, 0.0],
        Axis::Z => [0.0, 0.0, amount],
    }
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Fly the camera (held)
    MoveCamera(CameraMovement),
    /// Adjust the hair (held)
    Adjust(Adjustment),
    /// Flip wireframe rendering
    ToggleWireframe,
    /// Show only the head
    ShowHeadOnly,
    /// Show only the hair
    ShowHairOnly,
    /// Show both meshes
    ShowBoth,
    /// Capture or release the mouse
    ToggleMouseLock,
    /// Ask for a hair file to open
    OpenModel,
    /// Leave the application
    Quit,
}

impl Action {
    /// Discrete actions fire once per press, subject to the toggle cooldown
    pub const fn is_toggle(self) -> bool {
        !matches!(self, Self::MoveCamera(_) | Self::Adjust(_))
    }
}

/// Key dispatch table
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    actions: HashMap<KeyCode, Action>,
}

impl KeyBindings {
    /// Table with no bindings
    pub fn empty() -> Self {
        Self { actions: HashMap::new() }
    }

    /// Bind a key, returning the action it replaced
    pub fn bind(&mut self, key: KeyCode, action: Action) -> Option<Action> {
        self.actions.insert(key, action)
    }

    /// Remove a binding
    pub fn unbind(&mut self, key: KeyCode) -> Option<Action> {
        self.actions.remove(&key)
    }

    /// Action bound to a key
    pub fn action(&self, key: KeyCode) -> Option<Action> {
        self.actions.get(&key).copied()
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Stock layout
///
/// Q and E turn the hair about the vertical axis (yaw), which is what the
/// on-screen labels promise, rather than about X (pitch).
impl Default for KeyBindings {
    fn default() -> Self {
        use Action::{Adjust, MoveCamera};

        let position = |axis, direction| Adjust(Adjustment::Position { axis, direction });
        let rotation = |axis, direction| Adjust(Adjustment::Rotation { axis, direction });

        let mut bindings = Self::empty();
        for (key, action) in [
            (KeyCode::W, MoveCamera(CameraMovement::Forward)),
            (KeyCode::S, MoveCamera(CameraMovement::Backward)),
            (KeyCode::A, MoveCamera(CameraMovement::Left)),
            (KeyCode::D, MoveCamera(CameraMovement::Right)),
            (KeyCode::I, position(Axis::Y, 1.0)),
            (KeyCode::K, position(Axis::Y, -1.0)),
            (KeyCode::J, position(Axis::X, -1.0)),
            (KeyCode::L, position(Axis::X, 1.0)),
            (KeyCode::Q, rotation(Axis::Y, 1.0)),
            (KeyCode::E, rotation(Axis::Y, -1.0)),
            (KeyCode::F, Action::ToggleWireframe),
            (KeyCode::Key1, Action::ShowHeadOnly),
            (KeyCode::Key2, Action::ShowHairOnly),
            (KeyCode::Key3, Action::ShowBoth),
            (KeyCode::Tab, Action::ToggleMouseLock),
            (KeyCode::O, Action::OpenModel),
            (KeyCode::Escape, Action::Quit),
        ] {
            bindings.bind(key, action);
        }
        bindings
    }
}
