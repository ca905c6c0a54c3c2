//! Keyboard and mouse sampling turned into player actions

use macroquad::prelude::*;
use shared::components::Inputs;
use shared::{Action, EntityId, InputName, PITCH_LIMIT};

/// Radians of turn per pixel of mouse travel.
pub const MOUSE_SENSITIVITY: f32 = 0.003;

/// What one frame of sampling produced.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub actions: Vec<Action>,
    pub toggle_cursor: bool,
    pub quit: bool,
}

/// Samples input devices and emits actions only when something changed.
pub struct InputManager {
    last_inputs: Inputs,
    last_mouse: Option<(f32, f32)>,
    sensitivity: f32,
    cursor_grabbed: bool,

    // Previous frame key states for edge detection
    prev_key_tab: bool,
    prev_key_escape: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            last_inputs: Inputs::default(),
            last_mouse: None,
            sensitivity: MOUSE_SENSITIVITY,
            cursor_grabbed: false,
            prev_key_tab: false,
            prev_key_escape: false,
        }
    }

    /// One `SetPlayerInput` per input that differs from the last frame.
    pub fn input_changes(&mut self, player: &EntityId, current: Inputs) -> Vec<Action> {
        let actions = InputName::ALL
            .iter()
            .filter(|name| current.get(**name) != self.last_inputs.get(**name))
            .map(|name| Action::set_input(player.clone(), *name, current.get(*name)))
            .collect();
        self.last_inputs = current;
        actions
    }

    /// Turns mouse travel into a new aim relative to `current` (yaw, pitch).
    /// Moving right turns right, moving up looks up.
    pub fn look(
        &self,
        player: &EntityId,
        current: (f32, f32),
        delta: (f32, f32),
    ) -> Option<Action> {
        if delta.0 == 0.0 && delta.1 == 0.0 {
            return None;
        }
        let (yaw, pitch) = current;
        Some(Action::SetPlayerAim {
            id: player.clone(),
            yaw: yaw - delta.0 * self.sensitivity,
            pitch: (pitch - delta.1 * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT),
        })
    }

    /// Forgets held inputs, e.g. after the World was rebuilt around us.
    pub fn reset(&mut self) {
        self.last_inputs = Inputs::default();
    }

    pub fn set_cursor_grabbed(&mut self, grabbed: bool) {
        self.cursor_grabbed = grabbed;
        self.last_mouse = None;
        set_cursor_grab(grabbed);
        show_mouse(!grabbed);
    }

    pub fn cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }

    /// Samples devices for this frame. `aim` is the player's current
    /// (yaw, pitch) in the World.
    pub fn update(&mut self, player: &EntityId, aim: (f32, f32)) -> InputFrame {
        let mouse_down = self.cursor_grabbed && is_mouse_button_down(MouseButton::Left);
        let sampled = Inputs {
            forward: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            back: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            jump: is_key_down(KeyCode::Space),
            shoot: mouse_down,
            reload: is_key_down(KeyCode::R),
        };

        let key_tab = is_key_down(KeyCode::Tab);
        let key_escape = is_key_down(KeyCode::Escape);
        let mut frame = InputFrame {
            actions: self.input_changes(player, sampled),
            toggle_cursor: key_tab && !self.prev_key_tab,
            quit: key_escape && !self.prev_key_escape,
        };
        self.prev_key_tab = key_tab;
        self.prev_key_escape = key_escape;

        if !self.cursor_grabbed && is_mouse_button_pressed(MouseButton::Left) {
            self.set_cursor_grabbed(true);
        }

        let mouse = mouse_position();
        if self.cursor_grabbed {
            if let Some(last) = self.last_mouse {
                let delta = (mouse.0 - last.0, mouse.1 - last.1);
                frame.actions.extend(self.look(player, aim, delta));
            }
        }
        self.last_mouse = Some(mouse);

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn me() -> EntityId {
        EntityId::new("local")
    }

    #[test]
    fn test_change_only() {
        let mut input = InputManager::new();
        let held = Inputs {
            forward: true,
            shoot: true,
            ..Inputs::default()
        };

        let first = input.input_changes(&me(), held);
        assert_eq!(
            first,
            vec![
                Action::set_input("local", InputName::Forward, true),
                Action::set_input("local", InputName::Shoot, true),
            ]
        );

        assert!(input.input_changes(&me(), held).is_empty());

        let released = input.input_changes(&me(), Inputs::default());
        assert_eq!(released.len(), 2);
        assert!(released
            .iter()
            .all(|a| matches!(a, Action::SetPlayerInput { value: false, .. })));
    }

    #[test]
    fn test_reset_resends_held_inputs() {
        let mut input = InputManager::new();
        let held = Inputs {
            jump: true,
            ..Inputs::default()
        };
        input.input_changes(&me(), held);
        input.reset();
        assert_eq!(input.input_changes(&me(), held).len(), 1);
    }

    #[test]
    fn test_look_without_motion() {
        let input = InputManager::new();
        assert!(input.look(&me(), (0.5, 0.1), (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_look_direction() {
        let input = InputManager::new();
        let Some(Action::SetPlayerAim { yaw, pitch, .. }) = input.look(&me(), (0.0, 0.0), (10.0, -10.0))
        else {
            panic!("expected an aim action");
        };
        assert_approx_eq!(yaw, -10.0 * MOUSE_SENSITIVITY);
        assert_approx_eq!(pitch, 10.0 * MOUSE_SENSITIVITY);
    }

    #[test]
    fn test_look_clamps_pitch() {
        let input = InputManager::new();
        let Some(Action::SetPlayerAim { pitch, .. }) = input.look(&me(), (0.0, 1.5), (0.0, -10_000.0))
        else {
            panic!("expected an aim action");
        };
        assert_approx_eq!(pitch, PITCH_LIMIT);
    }
}
