//! Buffered keyboard and mouse state, consumed once per frame

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use winit::keyboard::KeyCode;

pub const MOUSE_LEFT: u32 = 0;
pub const MOUSE_RIGHT: u32 = 1;
pub const MOUSE_MIDDLE: u32 = 2;

/// Editor commands that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    GizmoTranslate,
    GizmoRotate,
    GizmoScale,
    Exit,
}

impl Action {
    fn default_keys(self) -> Vec<KeyCode> {
        let key = match self {
            Action::MoveForward => KeyCode::KeyW,
            Action::MoveBackward => KeyCode::KeyS,
            Action::MoveLeft => KeyCode::KeyA,
            Action::MoveRight => KeyCode::KeyD,
            Action::MoveUp => KeyCode::KeyQ,
            Action::MoveDown => KeyCode::KeyE,
            Action::GizmoTranslate => KeyCode::Digit1,
            Action::GizmoRotate => KeyCode::Digit2,
            Action::GizmoScale => KeyCode::Digit3,
            Action::Exit => KeyCode::Escape,
        };
        vec![key]
    }

    const ALL: [Action; 10] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::GizmoTranslate,
        Action::GizmoRotate,
        Action::GizmoScale,
        Action::Exit,
    ];
}

/// Held set plus this frame's press/release edges
#[derive(Debug)]
struct Transitions<T> {
    held: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Default for Transitions<T> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> Transitions<T> {
    fn press(&mut self, item: T) {
        if self.held.insert(item) {
            self.pressed.insert(item);
        }
    }

    /// Only a release of something held counts as an edge
    fn release(&mut self, item: T) {
        if self.held.remove(&item) {
            self.released.insert(item);
        }
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

/// Input gathered from window events between two frames
#[derive(Debug)]
pub struct InputState {
    keys: Transitions<KeyCode>,
    buttons: Transitions<u32>,
    /// `None` until the cursor first reports a position
    cursor: Option<(f64, f64)>,
    cursor_delta: (f64, f64),
    /// Vertical wheel movement in lines
    scroll: f64,
    bindings: HashMap<Action, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: Transitions::default(),
            buttons: Transitions::default(),
            cursor: None,
            cursor_delta: (0.0, 0.0),
            scroll: 0.0,
            bindings: Action::ALL
                .iter()
                .map(|&action| (action, action.default_keys()))
                .collect(),
        }
    }

    /// Replace the keys bound to `action`
    pub fn bind(&mut self, action: Action, keys: Vec<KeyCode>) {
        self.bindings.insert(action, keys);
    }

    pub fn process_key_down(&mut self, key: KeyCode) {
        self.keys.press(key);
    }

    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys.release(key);
    }

    pub fn process_mouse_button_down(&mut self, button: u32) {
        self.buttons.press(button);
    }

    pub fn process_mouse_button_up(&mut self, button: u32) {
        self.buttons.release(button);
    }

    /// The first position only seeds the cursor; later ones accumulate a delta
    pub fn process_mouse_move(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor {
            self.cursor_delta.0 += x - last_x;
            self.cursor_delta.1 += y - last_y;
        }
        self.cursor = Some((x, y));
    }

    pub fn process_scroll(&mut self, lines: f64) {
        self.scroll += lines;
    }

    /// Forget held keys and buttons (focus lost)
    pub fn release_all(&mut self) {
        self.keys.held.clear();
        self.buttons.held.clear();
    }

    /// Clear edges and deltas; held state and cursor position persist
    pub fn end_frame(&mut self) {
        self.keys.clear_edges();
        self.buttons.clear_edges();
        self.cursor_delta = (0.0, 0.0);
        self.scroll = 0.0;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.held.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn is_action_held(&self, action: Action) -> bool {
        self.bound_keys(action).any(|k| self.keys.held.contains(k))
    }

    pub fn is_action_triggered(&self, action: Action) -> bool {
        self.bound_keys(action).any(|k| self.keys.pressed.contains(k))
    }

    fn bound_keys(&self, action: Action) -> impl Iterator<Item = &KeyCode> {
        self.bindings.get(&action).into_iter().flatten()
    }

    pub fn mouse_position(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    /// Cursor movement this frame in window pixels, y down
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.cursor_delta
    }

    pub fn scroll_delta(&self) -> f64 {
        self.scroll
    }

    pub fn is_mouse_button_down(&self, button: u32) -> bool {
        self.buttons.held.contains(&button)
    }

    pub fn is_mouse_button_just_pressed(&self, button: u32) -> bool {
        self.buttons.pressed.contains(&button)
    }

    pub fn is_mouse_button_just_released(&self, button: u32) -> bool {
        self.buttons.released.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_edges() {
        let mut input = InputState::new();

        input.process_key_down(KeyCode::KeyW);
        input.process_key_down(KeyCode::KeyW);
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        // Auto-repeat while held is not a new press
        input.process_key_down(KeyCode::KeyW);
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        input.process_key_up(KeyCode::KeyW);
        assert!(!input.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn test_default_bindings() {
        let mut input = InputState::new();
        assert!(!input.is_action_held(Action::MoveUp));

        input.process_key_down(KeyCode::KeyQ);
        assert!(input.is_action_held(Action::MoveUp));
        input.process_key_down(KeyCode::Digit2);
        assert!(input.is_action_triggered(Action::GizmoRotate));

        input.end_frame();
        assert!(!input.is_action_triggered(Action::GizmoRotate));
        assert!(input.is_action_held(Action::MoveUp));
    }

    #[test]
    fn test_rebinding_replaces_keys() {
        let mut input = InputState::new();
        input.bind(Action::MoveForward, vec![KeyCode::ArrowUp]);

        input.process_key_down(KeyCode::KeyW);
        assert!(!input.is_action_held(Action::MoveForward));
        input.process_key_down(KeyCode::ArrowUp);
        assert!(input.is_action_held(Action::MoveForward));

        input.bind(Action::Exit, Vec::new());
        input.process_key_down(KeyCode::Escape);
        assert!(!input.is_action_triggered(Action::Exit));
    }

    #[test]
    fn test_first_mouse_move_seeds_position() {
        let mut input = InputState::new();
        assert_eq!(input.mouse_position(), None);

        input.process_mouse_move(100.0, 200.0);
        assert_eq!(input.mouse_delta(), (0.0, 0.0));

        input.process_mouse_move(110.0, 205.0);
        input.process_mouse_move(112.0, 204.0);
        assert_eq!(input.mouse_delta(), (12.0, 4.0));

        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
        assert_eq!(input.mouse_position(), Some((112.0, 204.0)));
    }

    #[test]
    fn test_mouse_button_edges() {
        let mut input = InputState::new();

        input.process_mouse_button_down(MOUSE_LEFT);
        assert!(input.is_mouse_button_down(MOUSE_LEFT));
        assert!(input.is_mouse_button_just_pressed(MOUSE_LEFT));

        input.process_mouse_button_up(MOUSE_LEFT);
        assert!(!input.is_mouse_button_down(MOUSE_LEFT));
        assert!(input.is_mouse_button_just_released(MOUSE_LEFT));

        input.end_frame();
        assert!(!input.is_mouse_button_just_released(MOUSE_LEFT));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.process_mouse_button_up(MOUSE_RIGHT);
        assert!(!input.is_mouse_button_just_released(MOUSE_RIGHT));
    }

    #[test]
    fn test_release_all_drops_held() {
        let mut input = InputState::new();
        input.process_key_down(KeyCode::KeyD);
        input.process_mouse_button_down(MOUSE_RIGHT);
        input.release_all();
        assert!(!input.is_key_down(KeyCode::KeyD));
        assert!(!input.is_mouse_button_down(MOUSE_RIGHT));

        input.process_mouse_button_up(MOUSE_RIGHT);
        assert!(!input.is_mouse_button_just_released(MOUSE_RIGHT));
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = InputState::new();
        input.process_scroll(1.0);
        input.process_scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.end_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
