use std::collections::HashSet;

use super::queue::InputEvent;

/// DOM key codes for the keys the engine maps to actions.
pub mod keys {
    pub const SPACE: u32 = 32;
    pub const ARROW_UP: u32 = 38;
}

/// Held-state view of the input stream: which keys are down and whether a
/// pointer is pressed. Fold each frame's events in with [`ActionState::apply`].
#[derive(Debug, Clone)]
pub struct ActionState {
    held_keys: HashSet<u32>,
    pointer_held: bool,
    release_keys: Vec<u32>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::with_release_keys(&[keys::SPACE, keys::ARROW_UP])
    }

    pub fn with_release_keys(release_keys: &[u32]) -> Self {
        Self {
            held_keys: HashSet::new(),
            pointer_held: false,
            release_keys: release_keys.to_vec(),
        }
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => {
                self.held_keys.insert(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.held_keys.remove(&key_code);
            }
            InputEvent::PointerDown { .. } => self.pointer_held = true,
            InputEvent::PointerUp { .. } => self.pointer_held = false,
            InputEvent::PointerMove { .. } | InputEvent::Custom { .. } => {}
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn key_held(&self, key_code: u32) -> bool {
        self.held_keys.contains(&key_code)
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    /// The binary release action: a release key is held or the pointer is down.
    pub fn release_asserted(&self) -> bool {
        self.pointer_held || self.release_keys.iter().any(|k| self.held_keys.contains(k))
    }

    /// Forget everything held (e.g. when the page loses focus).
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.pointer_held = false;
    }
}

impl Default for ActionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_or_arrow_up_asserts_release() {
        let mut state = ActionState::new();
        assert!(!state.release_asserted());

        state.apply(&InputEvent::KeyDown { key_code: keys::ARROW_UP });
        assert!(state.release_asserted());
        state.apply(&InputEvent::KeyUp { key_code: keys::ARROW_UP });
        assert!(!state.release_asserted());

        state.apply(&InputEvent::KeyDown { key_code: keys::SPACE });
        assert!(state.release_asserted());
    }

    #[test]
    fn other_keys_do_not_release() {
        let mut state = ActionState::new();
        state.apply(&InputEvent::KeyDown { key_code: 65 });
        assert!(state.key_held(65));
        assert!(!state.release_asserted());
    }

    #[test]
    fn pointer_hold_asserts_release() {
        let mut state = ActionState::new();
        state.apply_all(&[
            InputEvent::PointerDown { x: 0.0, y: 0.0 },
            InputEvent::PointerMove { x: 5.0, y: 5.0 },
        ]);
        assert!(state.release_asserted());
        state.apply(&InputEvent::PointerUp { x: 5.0, y: 5.0 });
        assert!(!state.release_asserted());
    }

    #[test]
    fn clear_drops_held_state() {
        let mut state = ActionState::new();
        state.apply(&InputEvent::KeyDown { key_code: keys::SPACE });
        state.apply(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        state.clear();
        assert!(!state.release_asserted());
    }
}
