use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Held keys and accumulated mouse motion for the window.
///
/// Mouse motion is raw device delta (not cursor position), summed between
/// frames and cleared by the runtime after each `on_frame`.
#[derive(Debug, Default)]
pub struct InputState {
    focused: bool,
    keys_down: HashSet<KeyCode>,
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn key_pressed(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn key_released(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Releases everything on focus loss so no key stays stuck down.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.keys_down.clear();
            self.mouse_delta = (0.0, 0.0);
        }
    }

    /// Motion arriving while unfocused is dropped.
    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        if !self.focused {
            return;
        }
        self.mouse_delta.0 += dx as f32;
        self.mouse_delta.1 += dy as f32;
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Device-space mouse motion since the last frame; +y is down.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub(crate) fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused() -> InputState {
        let mut input = InputState::default();
        input.set_focused(true);
        input
    }

    #[test]
    fn keys_are_held_until_released() {
        let mut input = focused();
        input.key_pressed(KeyCode::KeyW);
        input.key_pressed(KeyCode::KeyW);
        assert!(input.key_down(KeyCode::KeyW));

        input.key_released(KeyCode::KeyW);
        assert!(!input.key_down(KeyCode::KeyW));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut input = focused();
        input.key_pressed(KeyCode::KeyA);
        input.add_mouse_motion(3.0, 1.0);

        input.set_focused(false);
        assert!(!input.key_down(KeyCode::KeyA));
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn mouse_motion_accumulates_until_frame_end() {
        let mut input = focused();
        input.add_mouse_motion(2.0, -1.0);
        input.add_mouse_motion(0.5, 4.0);
        assert_eq!(input.mouse_delta(), (2.5, 3.0));

        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn unfocused_motion_is_dropped() {
        let mut input = InputState::default();
        input.add_mouse_motion(10.0, 10.0);
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }
}
