//! Input management system
//!
//! Platforms report raw input as a [`FrameInput`] snapshot. The
//! [`InputManager`] turns that snapshot into camera moves, transform
//! adjustments, view toggles and [`AppEvent`]s, borrowing the scene only for
//! the frame being processed.

pub mod bindings;

pub use bindings::{Action, Adjustment, Axis, KeyBindings};

use serde::{Deserialize, Serialize};

use crate::application::AppEvent;
use crate::render::RenderFlags;
use crate::scene::SceneState;

/// Minimum time between two discrete toggles, in seconds
pub const TOGGLE_COOLDOWN: f32 = 0.2;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Top-row 1
    Key1,
    /// Top-row 2
    Key2,
    /// Top-row 3
    Key3,
    /// Tab key
    Tab,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Everything the platform observed during one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Keys held down this frame
    pub held_keys: Vec<KeyCode>,
    /// Cursor movement in pixels, +y pointing down the screen
    pub mouse_delta: (f32, f32),
    /// Vertical scroll in wheel steps
    pub scroll: f32,
    /// Widget buttons held this frame
    pub adjustments: Vec<Adjustment>,
    /// Discrete requests from UI or scripts
    pub events: Vec<AppEvent>,
    /// Fixed frame time overriding the wall clock
    pub delta_time: Option<f32>,
}

/// Input manager
#[derive(Debug, Clone)]
pub struct InputManager {
    bindings: KeyBindings,
    cooldown: f32,
}

impl InputManager {
    /// Create an input manager with the given bindings
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings, cooldown: 0.0 }
    }

    /// Active key bindings
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Apply one frame of input to the scene
    ///
    /// Returns the events the scene still has to handle: those the platform
    /// reported plus any raised by key bindings.
    pub fn process(&mut self, input: &FrameInput, state: &mut SceneState, delta_time: f32) -> Vec<AppEvent> {
        self.cooldown = (self.cooldown - delta_time).max(0.0);
        let mut events = input.events.clone();

        for &key in &input.held_keys {
            let Some(action) = self.bindings.action(key) else {
                continue;
            };
            if !action.is_toggle() {
                Self::hold(action, state, delta_time);
            } else if self.cooldown <= 0.0 {
                self.cooldown = TOGGLE_COOLDOWN;
                Self::trigger(action, state, &mut events);
            }
        }

        for adjustment in &input.adjustments {
            adjustment.apply(state.transform_mut(), delta_time);
        }

        // An unlocked cursor belongs to the UI
        if state.mouse_locked() {
            let (dx, dy) = input.mouse_delta;
            if dx != 0.0 || dy != 0.0 {
                state.camera_mut().process_mouse_movement(dx, -dy, true);
            }
            if input.scroll != 0.0 {
                state.camera_mut().process_mouse_scroll(input.scroll);
            }
        }

        events
    }

    fn hold(action: Action, state: &mut SceneState, delta_time: f32) {
        match action {
            Action::MoveCamera(direction) => state.camera_mut().process_keyboard(direction, delta_time),
            Action::Adjust(adjustment) => adjustment.apply(state.transform_mut(), delta_time),
            _ => {}
        }
    }

    fn trigger(action: Action, state: &mut SceneState, events: &mut Vec<AppEvent>) {
        log::debug!("Toggle: {action:?}");
        match action {
            Action::ToggleWireframe => state.flags_mut().toggle(RenderFlags::WIREFRAME),
            Action::ShowHeadOnly => state.flags_mut().set_visibility(true, false),
            Action::ShowHairOnly => state.flags_mut().set_visibility(false, true),
            Action::ShowBoth => state.flags_mut().set_visibility(true, true),
            Action::ToggleMouseLock => state.toggle_mouse_lock(),
            Action::OpenModel => state.request_open_dialog(),
            Action::Quit => events.push(AppEvent::Quit),
            Action::MoveCamera(_) | Action::Adjust(_) => {}
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ApplicationConfig;
    use crate::foundation::math::Vec3;
    use crate::render::MeshSlot;
    use approx::assert_relative_eq;

    fn held(keys: &[KeyCode]) -> FrameInput {
        FrameInput { held_keys: keys.to_vec(), ..FrameInput::default() }
    }

    #[test]
    fn test_held_keys_adjust_transform_by_frame_time() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();

        input.process(&held(&[KeyCode::I, KeyCode::L]), &mut state, 0.5);
        assert_relative_eq!(state.transform().position(), Vec3::new(0.25, 0.25, 0.0), epsilon = 1e-6);

        input.process(&held(&[KeyCode::Q]), &mut state, 2.0);
        assert_relative_eq!(state.transform().rotation_y(), 10.0, epsilon = 1e-6);

        input.process(&held(&[KeyCode::E]), &mut state, 1.0);
        assert_relative_eq!(state.transform().rotation_y(), 5.0, epsilon = 1e-6);
        assert_eq!(state.transform().rotation_x(), 0.0);
    }

    #[test]
    fn test_widget_adjustments_take_key_path() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();
        let frame = FrameInput {
            adjustments: vec![Adjustment::Position { axis: Axis::Y, direction: 1.0 }],
            ..FrameInput::default()
        };

        input.process(&frame, &mut state, 0.5);
        let from_widget = state.transform().position();

        let mut keyed = SceneState::new(ApplicationConfig::default());
        input.process(&held(&[KeyCode::I]), &mut keyed, 0.5);
        assert_eq!(from_widget, keyed.transform().position());
    }

    #[test]
    fn test_toggle_cooldown() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();
        let f = held(&[KeyCode::F]);

        input.process(&f, &mut state, 0.016);
        assert!(state.flags().contains(RenderFlags::WIREFRAME));

        // Still inside the cooldown window
        input.process(&f, &mut state, 0.1);
        assert!(state.flags().contains(RenderFlags::WIREFRAME));

        input.process(&f, &mut state, 0.15);
        assert!(!state.flags().contains(RenderFlags::WIREFRAME));
    }

    #[test]
    fn test_cooldown_is_shared_between_toggles() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();

        input.process(&held(&[KeyCode::Key1]), &mut state, 0.016);
        input.process(&held(&[KeyCode::Key2]), &mut state, 0.016);
        assert!(state.flags().shows(MeshSlot::Head));
        assert!(!state.flags().shows(MeshSlot::Hair));

        input.process(&held(&[KeyCode::Key2]), &mut state, 0.5);
        assert!(!state.flags().shows(MeshSlot::Head));
        assert!(state.flags().shows(MeshSlot::Hair));
    }

    #[test]
    fn test_mouse_look_only_while_locked() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();
        let look = FrameInput { mouse_delta: (100.0, -50.0), scroll: 5.0, ..FrameInput::default() };

        input.process(&look, &mut state, 0.016);
        assert_relative_eq!(state.camera().yaw(), -80.0, epsilon = 1e-4);
        assert_relative_eq!(state.camera().pitch(), 5.0, epsilon = 1e-4);
        assert_eq!(state.camera().fov(), 55.0);

        input.process(&held(&[KeyCode::Tab]), &mut state, 0.5);
        assert!(!state.mouse_locked());

        input.process(&look, &mut state, 0.5);
        assert_relative_eq!(state.camera().yaw(), -80.0, epsilon = 1e-4);
        assert_eq!(state.camera().fov(), 55.0);
    }

    #[test]
    fn test_escape_raises_quit_and_events_pass_through() {
        let mut state = SceneState::new(ApplicationConfig::default());
        let mut input = InputManager::default();
        let frame = FrameInput {
            held_keys: vec![KeyCode::Escape],
            events: vec![AppEvent::ResetTransform],
            ..FrameInput::default()
        };

        let events = input.process(&frame, &mut state, 0.016);
        assert_eq!(events, vec![AppEvent::ResetTransform, AppEvent::Quit]);
    }

    #[test]
    fn test_open_key_requests_dialog() {
        let mut state = SceneState::new(ApplicationConfig::default());
        InputManager::default().process(&held(&[KeyCode::O]), &mut state, 0.016);
        assert!(state.take_open_dialog_request());
        assert!(!state.take_open_dialog_request());
    }

    #[test]
    fn test_frame_input_from_ron() {
        let frame: FrameInput = ron::from_str("(held_keys: [W, Key3], delta_time: Some(0.25))").unwrap();
        assert_eq!(frame.held_keys, vec![KeyCode::W, KeyCode::Key3]);
        assert_eq!(frame.delta_time, Some(0.25));
        assert!(frame.events.is_empty());
    }
}
