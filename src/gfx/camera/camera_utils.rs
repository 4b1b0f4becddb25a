use cgmath::{Matrix4, SquareMatrix, Vector3};
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton};

use crate::config::CameraConfig;

use super::{
    camera_controller::CameraController,
    orbit_camera::{OrbitCamera, OrbitCameraBounds},
};

#[derive(Debug)]
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Builds the orbit camera described by a scene configuration
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let camera = OrbitCamera::from_position(
            Vector3::from(config.position),
            Vector3::from(config.target),
            config.fov,
            aspect,
        )
        .with_clip_planes(config.near, config.far)
        .with_bounds(OrbitCameraBounds {
            min_distance: Some(config.min_distance),
            max_distance: Some(config.max_distance),
            ..Default::default()
        });

        Self::new(camera, CameraController::default())
    }

    /// Returns true if the camera moved
    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.process_events(event, &mut self.camera)
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.controller.process_mouse_button(button, state);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_manager_from_config() {
        let config = CameraConfig {
            min_distance: 2.0,
            max_distance: 20.0,
            ..Default::default()
        };
        let manager = CameraManager::from_config(&config, 2.0);

        assert_eq!(manager.camera.aspect, 2.0);
        assert_eq!(manager.camera.znear, config.near);
        assert_eq!(manager.camera.zfar, config.far);
        assert_eq!(manager.camera.bounds.max_distance, Some(20.0));
        assert_relative_eq!(manager.camera.eye.x, -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_matrix_conversion_is_column_major() {
        let matrix = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let array = convert_matrix4_to_array(matrix);
        assert_eq!(array[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
