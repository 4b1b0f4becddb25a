use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Mouse and keyboard driven orbit controls
///
/// Button state arrives through window events, motion and wheel deltas through
/// raw device events.
#[derive(Debug)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.1)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_left_pressed: false,
            is_right_pressed: false,
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.is_left_pressed = pressed,
            MouseButton::Right => self.is_right_pressed = pressed,
            _ => (),
        }
    }

    /// Applies raw motion and wheel input; returns true if the camera moved
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.1
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed * 10.0);
                true
            }
            DeviceEvent::MouseMotion { delta } => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                if self.is_panning() {
                    camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
                    true
                } else if self.is_rotating() {
                    camera.add_yaw(-dx * self.rotate_speed);
                    camera.add_pitch(dy * self.rotate_speed);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                repeat: false,
                ..
            } => {
                if self.is_shift_held {
                    debug!("Resetting camera to its initial pose");
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Right drag, or left drag with shift held
    pub fn is_panning(&self) -> bool {
        self.is_right_pressed || (self.is_left_pressed && self.is_shift_held)
    }

    /// Plain left drag
    pub fn is_rotating(&self) -> bool {
        self.is_left_pressed && !self.is_shift_held && !self.is_right_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.2, 0.3, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_motion_without_buttons_is_ignored() {
        let mut controller = CameraController::default();
        let mut camera = camera();
        let eye = camera.eye;

        let moved = controller.process_events(
            &DeviceEvent::MouseMotion { delta: (25.0, 10.0) },
            &mut camera,
        );

        assert!(!moved);
        assert_eq!(camera.eye, eye);
    }

    #[test]
    fn test_left_drag_orbits() {
        let mut controller = CameraController::default();
        let mut camera = camera();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_rotating());

        controller.process_events(&DeviceEvent::MouseMotion { delta: (40.0, 0.0) }, &mut camera);
        assert!(camera.yaw < 0.3);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_right_drag_pans() {
        let mut controller = CameraController::default();
        let mut camera = camera();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(controller.is_panning());

        controller.process_events(&DeviceEvent::MouseMotion { delta: (40.0, 0.0) }, &mut camera);
        assert_ne!(camera.target, Vector3::zero());
        assert_eq!(camera.yaw, 0.3);

        controller.process_mouse_button(MouseButton::Right, ElementState::Released);
        assert!(!controller.is_panning());
    }

    #[test]
    fn test_wheel_zooms() {
        let mut controller = CameraController::default();
        let mut camera = camera();

        controller.process_events(
            &DeviceEvent::MouseWheel {
                delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            },
            &mut camera,
        );
        assert!(camera.distance < 10.0);
    }
}
