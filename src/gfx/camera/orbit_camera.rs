use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Camera orbiting a target point, Y up
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitPose,
}

/// Spherical pose restored by [`OrbitCamera::reset_to_default`]
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitPose {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let home = OrbitPose {
            distance,
            pitch,
            yaw,
            target,
        };
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home,
        };
        camera.update();
        camera
    }

    /// Places the camera at `position` looking at `target`
    ///
    /// Distance, pitch and yaw are derived from the offset so that the
    /// computed eye lands back on `position`. `fov_degrees` is vertical.
    pub fn from_position(
        position: Vector3<f32>,
        target: Vector3<f32>,
        fov_degrees: f32,
        aspect: f32,
    ) -> Self {
        let (distance, pitch, yaw) = spherical_from_offset(position - target);
        let mut camera = Self::new(distance, pitch, yaw, target, aspect);
        camera.fovy = Deg(fov_degrees).into();
        camera
    }

    pub fn with_clip_planes(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn with_bounds(mut self, bounds: OrbitCameraBounds) -> Self {
        self.bounds = bounds;
        self.home.distance = self.clamp_distance(self.home.distance);
        self.set_distance(self.distance);
        self
    }

    /// Returns to the pose the camera was created with
    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;

        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.clamp_distance(distance);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let total_movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.target += total_movement;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        )
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(1.0),
            max_distance: Some(100.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

/// Inverse of [`calculate_cartesian_eye_position`] for an eye offset from the target
fn spherical_from_offset(offset: Vector3<f32>) -> (f32, f32, f32) {
    let distance = offset.magnitude();
    if distance <= f32::EPSILON {
        return (1.0, 0.0, 0.0);
    }
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (distance, pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_position_reproduces_eye() {
        let camera = OrbitCamera::from_position(
            Vector3::new(-5.0, 2.0, 10.0),
            Vector3::zero(),
            60.0,
            16.0 / 9.0,
        );

        assert_relative_eq!(camera.eye.x, -5.0, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.y, 2.0, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.z, 10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.distance, 129.0f32.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(camera.fovy.0, std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
        assert_eq!(camera.up, Vector3::unit_y());
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);

        camera.set_distance(0.01);
        assert_eq!(camera.distance, 1.0);

        camera.set_distance(5000.0);
        assert_eq!(camera.distance, 100.0);
    }

    #[test]
    fn test_pitch_is_clamped_short_of_the_poles() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);

        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut camera =
            OrbitCamera::from_position(Vector3::new(0.0, 5.0, 5.0), Vector3::zero(), 45.0, 1.0);
        let initial_eye = camera.eye;

        camera.add_yaw(1.2);
        camera.pan((3.0, -1.0));
        camera.set_distance(40.0);
        camera.reset_to_default();

        assert_relative_eq!(camera.eye.x, initial_eye.x, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.y, initial_eye.y, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.z, initial_eye.z, epsilon = 1e-4);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.5, Vector3::zero(), 1.0);
        let offset_before = camera.eye - camera.target;

        camera.pan((1.0, 0.5));
        let offset_after = camera.eye - camera.target;

        assert_ne!(camera.target, Vector3::zero());
        assert_relative_eq!(offset_before.x, offset_after.x, epsilon = 1e-4);
        assert_relative_eq!(offset_before.y, offset_after.y, epsilon = 1e-4);
        assert_relative_eq!(offset_before.z, offset_after.z, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_sized_resize_keeps_aspect() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.5);
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 1.5);
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
