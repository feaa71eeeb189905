use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller, InputHandler, Signal};

/// Button that turns a pointer drag into a look rotation
pub const LOOK_BUTTON: Button = Button::MouseRight;

/// Adapter that bridges Winit events to an InputHandler
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Current cursor position (relative to window)
    cursor: Vec2,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and forward it to `handler`
    pub fn process_event(&mut self, event: &WindowEvent, handler: &mut dyn InputHandler) -> Signal {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    return self.handle_key(keycode, event.state, handler);
                }
                Signal::Continue
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state, handler);
                Signal::Continue
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32), handler);
                Signal::Continue
            }
            // Releases happening while unfocused never arrive
            WindowEvent::Focused(false) => {
                self.release_all(handler);
                Signal::Continue
            }
            _ => Signal::Continue,
        }
    }

    pub fn handle_key(
        &mut self,
        keycode: KeyCode,
        state: ElementState,
        handler: &mut dyn InputHandler,
    ) -> Signal {
        let Some(button) = Self::keycode_to_button(keycode) else {
            return Signal::Continue;
        };

        match state {
            ElementState::Pressed => {
                self.press(button);
                handler.on_key_down(button)
            }
            ElementState::Released => {
                self.release(button);
                handler.on_key_up(button);
                Signal::Continue
            }
        }
    }

    pub fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        handler: &mut dyn InputHandler,
    ) {
        let Some(btn) = Self::mouse_button_to_button(button) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                self.press(btn);
                handler.on_pointer_down(self.cursor);
            }
            ElementState::Released => self.release(btn),
        }
    }

    /// Moving the cursor with any mouse button held is a drag
    pub fn handle_cursor(&mut self, position: Vec2, handler: &mut dyn InputHandler) {
        self.cursor = position;

        if self.pressed_vec.iter().any(|b| b.is_mouse()) {
            handler.on_pointer_drag(position, self.is_down(LOOK_BUTTON));
        }
    }

    /// Release every held button, reporting held keys as key-up
    pub fn release_all(&mut self, handler: &mut dyn InputHandler) {
        for button in self.pressed_vec.drain(..) {
            if !button.is_mouse() {
                handler.on_key_up(button);
            }
        }
        self.pressed_keys.clear();
    }

    /// Get current cursor position
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    fn press(&mut self, button: Button) {
        if self.pressed_keys.insert(button) {
            self.pressed_vec.push(button);
        }
    }

    fn release(&mut self, button: Button) {
        if self.pressed_keys.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewTransform;

    // Winit KeyEvent has private platform fields, so these tests drive the
    // handle_* entry points that process_event delegates to.

    #[derive(Default)]
    struct Recorder {
        downs: Vec<Button>,
        ups: Vec<Button>,
        pointer_downs: Vec<Vec2>,
        drags: Vec<(Vec2, bool)>,
    }

    impl InputHandler for Recorder {
        fn on_key_down(&mut self, key: Button) -> Signal {
            self.downs.push(key);
            if key == Button::Escape {
                Signal::Quit
            } else {
                Signal::Continue
            }
        }

        fn on_key_up(&mut self, key: Button) {
            self.ups.push(key);
        }

        fn on_pointer_down(&mut self, position: Vec2) {
            self.pointer_downs.push(position);
        }

        fn on_pointer_drag(&mut self, position: Vec2, look_held: bool) {
            self.drags.push((position, look_held));
        }

        fn on_frame(&mut self, _elapsed_seconds: f64) -> ViewTransform {
            ViewTransform::look_along(glam::Vec3::ZERO, glam::Vec3::NEG_Z)
        }
    }

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::KeyW));
        assert_eq!(controller.get_down_keys().len(), 0);
        assert_eq!(controller.cursor(), Vec2::ZERO);
    }

    #[test]
    fn test_key_press_and_release_forwarded() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_key(KeyCode::KeyW, ElementState::Pressed, &mut rec);
        assert!(controller.is_down(Button::KeyW));

        controller.handle_key(KeyCode::KeyW, ElementState::Released, &mut rec);
        assert!(!controller.is_down(Button::KeyW));

        assert_eq!(rec.downs, vec![Button::KeyW]);
        assert_eq!(rec.ups, vec![Button::KeyW]);
    }

    #[test]
    fn test_repeated_press_tracked_once() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_key(KeyCode::KeyD, ElementState::Pressed, &mut rec);
        controller.handle_key(KeyCode::KeyD, ElementState::Pressed, &mut rec);
        assert_eq!(controller.get_down_keys(), &[Button::KeyD]);
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        let signal = controller.handle_key(KeyCode::KeyQ, ElementState::Pressed, &mut rec);
        assert_eq!(signal, Signal::Continue);
        assert!(rec.downs.is_empty());
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_escape_signal_passed_through() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        let signal = controller.handle_key(KeyCode::Escape, ElementState::Pressed, &mut rec);
        assert_eq!(signal, Signal::Quit);
    }

    #[test]
    fn test_mouse_press_reports_cursor() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_cursor(Vec2::new(10.0, 20.0), &mut rec);
        controller.handle_mouse_button(MouseButton::Left, ElementState::Pressed, &mut rec);

        assert_eq!(rec.pointer_downs, vec![Vec2::new(10.0, 20.0)]);
        assert!(controller.is_down(Button::MouseLeft));
    }

    #[test]
    fn test_hover_is_not_a_drag() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_cursor(Vec2::new(5.0, 5.0), &mut rec);
        assert!(rec.drags.is_empty());
    }

    #[test]
    fn test_drag_reports_look_button() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_mouse_button(MouseButton::Left, ElementState::Pressed, &mut rec);
        controller.handle_cursor(Vec2::new(1.0, 0.0), &mut rec);
        controller.handle_mouse_button(MouseButton::Left, ElementState::Released, &mut rec);

        controller.handle_mouse_button(MouseButton::Right, ElementState::Pressed, &mut rec);
        controller.handle_cursor(Vec2::new(2.0, 0.0), &mut rec);

        assert_eq!(
            rec.drags,
            vec![(Vec2::new(1.0, 0.0), false), (Vec2::new(2.0, 0.0), true)]
        );
    }

    #[test]
    fn test_release_all_reports_held_keys() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_key(KeyCode::KeyW, ElementState::Pressed, &mut rec);
        controller.handle_key(KeyCode::KeyD, ElementState::Pressed, &mut rec);
        controller.handle_mouse_button(MouseButton::Right, ElementState::Pressed, &mut rec);

        controller.release_all(&mut rec);

        assert_eq!(rec.ups, vec![Button::KeyW, Button::KeyD]);
        assert!(controller.get_down_keys().is_empty());
        assert!(!controller.is_down(Button::MouseRight));

        controller.handle_cursor(Vec2::new(4.0, 4.0), &mut rec);
        assert!(rec.drags.is_empty());
    }

    #[test]
    fn test_middle_button_ignored() {
        let mut controller = WinitController::new();
        let mut rec = Recorder::default();

        controller.handle_mouse_button(MouseButton::Middle, ElementState::Pressed, &mut rec);
        controller.handle_cursor(Vec2::new(3.0, 3.0), &mut rec);

        assert!(rec.pointer_downs.is_empty());
        assert!(rec.drags.is_empty());
    }
}
