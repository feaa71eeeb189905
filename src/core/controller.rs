use glam::Vec2;

use crate::camera::ViewTransform;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Escape,
    MouseLeft,
    MouseRight,
}

impl Button {
    /// True for pointer buttons, false for keys
    pub const fn is_mouse(self) -> bool {
        matches!(self, Button::MouseLeft | Button::MouseRight)
    }
}

/// What the host should do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Continue,
    Quit,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

/// Event interface the host application drives every frame.
///
/// Key and pointer events arrive synchronously on the event-loop thread;
/// `on_frame` is called once per rendered frame with the seconds elapsed
/// since startup.
pub trait InputHandler {
    fn on_key_down(&mut self, key: Button) -> Signal;

    fn on_key_up(&mut self, key: Button);

    fn on_pointer_down(&mut self, position: Vec2);

    /// `look_held` is true while the look button is down
    fn on_pointer_drag(&mut self, position: Vec2, look_held: bool);

    fn on_frame(&mut self, elapsed_seconds: f64) -> ViewTransform;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_equality() {
        assert_eq!(Button::KeyW, Button::KeyW);
        assert_ne!(Button::KeyW, Button::KeyA);
        assert_ne!(Button::MouseLeft, Button::MouseRight);
    }

    #[test]
    fn test_button_debug() {
        assert_eq!(format!("{:?}", Button::KeyD), "KeyD");
        assert_eq!(format!("{:?}", Button::MouseRight), "MouseRight");
    }

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = [
            Button::KeyW,
            Button::KeyA,
            Button::KeyS,
            Button::KeyD,
            Button::Escape,
            Button::MouseLeft,
            Button::MouseRight,
        ];

        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn test_is_mouse() {
        assert!(Button::MouseLeft.is_mouse());
        assert!(Button::MouseRight.is_mouse());
        assert!(!Button::KeyW.is_mouse());
        assert!(!Button::Escape.is_mouse());
    }

    #[test]
    fn test_signal_defaults_to_continue() {
        assert_eq!(Signal::default(), Signal::Continue);
    }

    // Test mock controller implementation
    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::KeyW, Button::MouseRight],
        };

        assert!(controller.is_down(Button::KeyW));
        assert!(controller.is_down(Button::MouseRight));
        assert!(!controller.is_down(Button::KeyA));
        assert_eq!(controller.get_down_keys().len(), 2);
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController { pressed: vec![] };

        assert!(!controller.is_down(Button::KeyW));
        assert!(controller.get_down_keys().is_empty());
    }
}
