use glam::{Mat4, Vec2, Vec3};

use crate::core::controller::{Button, InputHandler, Signal};
use crate::types::CameraUniform;

/// Movement speed in world units per second
pub const CAMERA_SPEED: f32 = 5.0;
/// Look rotation in radians per pixel of drag
pub const MOUSE_SENSITIVITY: f32 = 0.005;
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;
pub const WORLD_UP: Vec3 = Vec3::Y;
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 1.6, 5.0);

/// Pitch bound in radians, applied symmetrically
pub fn pitch_limit() -> f32 {
    PITCH_LIMIT_DEGREES.to_radians()
}

/// Unit view direction for the given angles. Yaw 0, pitch 0 looks down -Z.
pub fn forward_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        pitch.cos() * -yaw.sin(),
        pitch.sin(),
        -pitch.cos() * yaw.cos(),
    )
    .normalize()
}

/// Held movement keys
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Set the slot for `key`. Returns false if `key` does not move the camera.
    pub fn set(&mut self, key: Button, held: bool) -> bool {
        let slot = match key {
            Button::KeyW => &mut self.forward,
            Button::KeyS => &mut self.backward,
            Button::KeyA => &mut self.left,
            Button::KeyD => &mut self.right,
            _ => return false,
        };
        *slot = held;
        true
    }

    pub const fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Unit movement direction in the given basis, zero when nothing is held
    /// or opposing keys cancel out
    pub fn direction(&self, forward: Vec3, right: Vec3) -> Vec3 {
        let movement = forward * Self::to_direction(self.forward, self.backward)
            + right * Self::to_direction(self.right, self.left);
        movement.normalize_or_zero()
    }
}

/// Displacement for one frame. Diagonals are normalized so every heading
/// moves at `speed`.
pub fn displacement(keys: MoveKeys, forward: Vec3, right: Vec3, speed: f32, dt: f32) -> Vec3 {
    keys.direction(forward, right) * speed * dt
}

/// Speed and sensitivity tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: CAMERA_SPEED,
            sensitivity: MOUSE_SENSITIVITY,
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    /// Right-handed perspective with a [0, 1] depth range
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Eye, target and up of the current look-at transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl ViewTransform {
    pub fn look_along(eye: Vec3, forward: Vec3) -> Self {
        Self {
            eye,
            target: eye + forward,
            up: WORLD_UP,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }
}

/// Mutable camera state driven by input and frame time
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub keys: MoveKeys,
    pub last_mouse_pos: Vec2,
    pub last_timestamp: f64,
}

impl CameraState {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, timestamp: f64) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-pitch_limit(), pitch_limit()),
            keys: MoveKeys::default(),
            last_mouse_pos: Vec2::ZERO,
            last_timestamp: timestamp,
        }
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_angles(self.yaw, self.pitch)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(WORLD_UP).normalize()
    }

    /// Apply a pointer delta in pixels to yaw and pitch
    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch -= delta.y * sensitivity;

        let limit = pitch_limit();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    /// Advance the clock to `now` and return the elapsed seconds
    pub fn tick(&mut self, now: f64) -> f32 {
        let dt = (now - self.last_timestamp) as f32;
        self.last_timestamp = now;
        dt.max(0.0)
    }
}

/// First-person fly camera: WASD movement, look while the right button drags
#[derive(Debug, Clone)]
pub struct FlyCamera {
    state: CameraState,
    settings: CameraSettings,
    projection: Projection,
    view: ViewTransform,
}

impl FlyCamera {
    /// Camera at the demo start pose, looking down -Z
    pub fn new(settings: CameraSettings, projection: Projection, start_time: f64) -> Self {
        Self::with_state(
            CameraState::new(INITIAL_POSITION, 0.0, 0.0, start_time),
            settings,
            projection,
        )
    }

    pub fn with_state(state: CameraState, settings: CameraSettings, projection: Projection) -> Self {
        let view = ViewTransform::look_along(state.position, state.forward());
        Self {
            state,
            settings,
            projection,
            view,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.state.pitch
    }

    pub fn keys(&self) -> MoveKeys {
        self.state.keys
    }

    pub fn settings(&self) -> CameraSettings {
        self.settings
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn view_transform(&self) -> ViewTransform {
        self.view
    }

    /// Track the window aspect ratio. Zero-sized windows are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.projection.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view.matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    pub fn inverse_view(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    pub fn inverse_projection(&self) -> Mat4 {
        self.projection_matrix().inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self, resolution: [f32; 2], time: f32) -> CameraUniform {
        CameraUniform {
            inv_view: self.inverse_view().to_cols_array_2d(),
            inv_proj: self.inverse_projection().to_cols_array_2d(),
            position: self.view.eye.to_array(),
            time,
            resolution,
            _pad: [0.0; 2],
        }
    }
}

impl InputHandler for FlyCamera {
    fn on_key_down(&mut self, key: Button) -> Signal {
        if key == Button::Escape {
            return Signal::Quit;
        }
        self.state.keys.set(key, true);
        Signal::Continue
    }

    fn on_key_up(&mut self, key: Button) {
        self.state.keys.set(key, false);
    }

    fn on_pointer_down(&mut self, position: Vec2) {
        self.state.last_mouse_pos = position;
    }

    fn on_pointer_drag(&mut self, position: Vec2, look_held: bool) {
        if !look_held {
            return;
        }

        let delta = position - self.state.last_mouse_pos;
        self.state.last_mouse_pos = position;
        self.state.look(delta, self.settings.sensitivity);
    }

    fn on_frame(&mut self, elapsed_seconds: f64) -> ViewTransform {
        let dt = self.state.tick(elapsed_seconds);

        let forward = self.state.forward();
        let right = self.state.right();
        self.state.position += displacement(self.state.keys, forward, right, self.settings.speed, dt);

        self.view = ViewTransform::look_along(self.state.position, forward);
        self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn camera() -> FlyCamera {
        FlyCamera::new(
            CameraSettings::default(),
            Projection::new(90.0, 16.0 / 9.0, 0.1, 100.0),
            0.0,
        )
    }

    #[test]
    fn forward_at_rest_looks_down_negative_z() {
        let forward = forward_from_angles(0.0, 0.0);
        assert!((forward - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn right_is_positive_x_at_rest() {
        let state = CameraState::new(Vec3::ZERO, 0.0, 0.0, 0.0);
        assert!((state.right() - Vec3::X).length() < EPS);
    }

    #[test]
    fn basis_is_unit_length() {
        for &(yaw, pitch) in &[(0.3, 0.2), (-2.0, 1.2), (5.0, -1.5), (0.0, pitch_limit())] {
            let state = CameraState::new(Vec3::ZERO, yaw, pitch, 0.0);
            assert!((state.forward().length() - 1.0).abs() < EPS);
            assert!((state.right().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn move_keys_ignore_non_movement_buttons() {
        let mut keys = MoveKeys::default();
        assert!(!keys.set(Button::Escape, true));
        assert!(!keys.set(Button::MouseRight, true));
        assert!(!keys.any());

        assert!(keys.set(Button::KeyA, true));
        assert!(keys.left);
    }

    #[test]
    fn opposing_keys_cancel() {
        let keys = MoveKeys {
            forward: true,
            backward: true,
            ..Default::default()
        };
        assert_eq!(keys.direction(Vec3::NEG_Z, Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn escape_requests_quit_without_touching_keys() {
        let mut cam = camera();
        assert_eq!(cam.on_key_down(Button::Escape), Signal::Quit);
        assert_eq!(cam.keys(), MoveKeys::default());
        assert_eq!(cam.on_key_down(Button::KeyW), Signal::Continue);
    }

    #[test]
    fn backward_moves_toward_positive_z() {
        let mut cam = camera();
        cam.on_key_down(Button::KeyS);
        cam.on_frame(0.5);
        let expected = INITIAL_POSITION + Vec3::Z * CAMERA_SPEED * 0.5;
        assert!((cam.position() - expected).length() < EPS);
    }

    #[test]
    fn strafe_left_moves_toward_negative_x() {
        let mut cam = camera();
        cam.on_key_down(Button::KeyA);
        cam.on_frame(1.0);
        assert!(cam.position().x < -4.99);
        assert!((cam.position().z - INITIAL_POSITION.z).abs() < EPS);
    }

    #[test]
    fn view_transform_targets_one_unit_ahead() {
        let mut cam = camera();
        let view = cam.on_frame(0.0);
        assert_eq!(view.eye, INITIAL_POSITION);
        assert!((view.target - (INITIAL_POSITION + Vec3::NEG_Z)).length() < EPS);
        assert_eq!(view.up, WORLD_UP);
    }

    #[test]
    fn inverse_view_recovers_eye() {
        let mut cam = camera();
        cam.on_pointer_down(Vec2::ZERO);
        cam.on_pointer_drag(Vec2::new(40.0, -25.0), true);
        cam.on_frame(0.0);

        let eye = cam.inverse_view().transform_point3(Vec3::ZERO);
        assert!((eye - cam.position()).length() < 1e-4);
    }

    #[test]
    fn set_aspect_ignores_zero_size() {
        let mut cam = camera();
        cam.set_aspect(0, 600);
        assert!((cam.projection().aspect - 16.0 / 9.0).abs() < EPS);

        cam.set_aspect(800, 400);
        assert!((cam.projection().aspect - 2.0).abs() < EPS);
    }

    #[test]
    fn clock_running_backwards_does_not_move() {
        let mut cam = camera();
        cam.on_key_down(Button::KeyW);
        cam.on_frame(2.0);
        let before = cam.position();
        cam.on_frame(1.0);
        assert_eq!(cam.position(), before);
    }

    #[test]
    fn uniform_carries_eye_and_time() {
        let cam = camera();
        let uniform = cam.to_uniform([800.0, 600.0], 3.5);
        assert_eq!(uniform.position, INITIAL_POSITION.to_array());
        assert_eq!(uniform.time, 3.5);
        assert_eq!(uniform.resolution, [800.0, 600.0]);
    }
}
