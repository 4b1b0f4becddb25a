//! # Object Picking System
//!
//! Click-to-object resolution using mouse ray-casting.
//!
//! ## How it works
//!
//! 1. **Mouse to Ray**: Convert the cursor position to a world-space ray
//! 2. **Ray-Object Intersection**: Move the ray into each object's local space
//!    and test it against the object's local bounding box, so rotated and
//!    scaled boxes are hit exactly where they are drawn
//! 3. **Selection**: Return the closest interactive object that was hit
//!
//! ## Usage
//!
//! ```no_run
//! # use spinning_boxes::gfx::{picking::ObjectPicker, scene::Scene};
//! # fn demo(scene: &Scene) {
//! let picker = ObjectPicker::new();
//! let ray = picker.screen_to_ray((400.0, 300.0), (800.0, 600.0), &scene.camera_manager.camera);
//! if let Some(hit) = picker.pick(&ray, scene) {
//!     println!("clicked {:?}", hit.object_id);
//! }
//! # }
//! ```

use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{object::ObjectId, scene::Scene},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray with a normalized direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Maps the ray through an affine transform
    ///
    /// The direction is not renormalized, so a parameter `t` names the same
    /// point on the ray before and after the transform.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self {
            origin: origin.truncate() / origin.w,
            direction: direction.truncate(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::new(first[0], first[1], first[2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection (slab method)
    ///
    /// Returns the ray parameter of the entry point, or of the exit point when
    /// the origin is inside the box. `None` if the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Id of the picked object in the scene
    pub object_id: ObjectId,
    /// Distance from the ray origin to the intersection point
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Object picker for 3D mouse selection
#[derive(Debug, Default)]
pub struct ObjectPicker;

impl ObjectPicker {
    /// Create a new object picker
    pub fn new() -> Self {
        Self
    }

    /// Convert screen coordinates to a world-space ray
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        // Screen to normalized device coordinates (-1 to 1), Y up
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height;

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix =
            cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let inv_view_proj = (proj_matrix * view_matrix)
            .invert()
            .unwrap_or_else(Matrix4::identity);

        // Near and far plane points in OpenGL clip space
        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Finds the closest interactive object hit by the ray
    ///
    /// Objects that are hidden or not interactive are skipped entirely, so they
    /// never shadow a click meant for an object behind them.
    pub fn pick(&self, ray: &Ray, scene: &Scene) -> Option<PickResult> {
        let mut closest_result: Option<PickResult> = None;

        for object in scene
            .objects
            .iter()
            .filter(|object| object.interactive && object.visible)
        {
            let Some(world_to_local) = object.model_matrix().invert() else {
                continue;
            };

            // Undeformed bounds; the material wobble exists only in the shader
            let local_ray = ray.transform(&world_to_local);
            if let Some(distance) = object.mesh.bounds().intersect_ray(&local_ray) {
                if closest_result
                    .as_ref()
                    .map_or(true, |result| distance < result.distance)
                {
                    closest_result = Some(PickResult {
                        object_id: object.id,
                        distance,
                        intersection_point: ray.point_at(distance),
                    });
                }
            }
        }

        closest_result
    }

    /// Convenience wrapper: cursor position straight to a pick result
    pub fn pick_at(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        scene: &Scene,
    ) -> Option<PickResult> {
        let ray = self.screen_to_ray(screen_pos, screen_size, &scene.camera_manager.camera);
        self.pick(&ray, scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{camera_controller::CameraController, camera_utils::CameraManager},
        geometry::{generate_box, generate_plane},
        scene::object::{Mesh, ObjectBuilder},
    };
    use approx::assert_relative_eq;

    fn test_scene() -> Scene {
        let camera = OrbitCamera::from_position(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::zero(),
            60.0,
            1.0,
        );
        Scene::new(CameraManager::new(camera, CameraController::default()))
    }

    fn add_box(scene: &mut Scene, position: Vector3<f32>, interactive: bool) -> ObjectId {
        scene.add_object(
            ObjectBuilder::new("box", Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)))
                .position(position)
                .interactive(interactive),
        )
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let ray_away = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&ray_away).is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let scene = test_scene();
        let picker = ObjectPicker::new();
        let ray = picker.screen_to_ray((400.0, 400.0), (800.0, 800.0), &scene.camera_manager.camera);

        assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_nearest_interactive_object_wins() {
        let mut scene = test_scene();
        let far = add_box(&mut scene, Vector3::new(0.0, 0.0, -3.0), true);
        let near = add_box(&mut scene, Vector3::new(0.0, 0.0, 2.0), true);

        let hit = ObjectPicker::new()
            .pick_at((400.0, 400.0), (800.0, 800.0), &scene)
            .expect("center click hits a box");

        assert_eq!(hit.object_id, near);
        assert_ne!(hit.object_id, far);
        assert_relative_eq!(hit.intersection_point.z, 2.5, epsilon = 1e-3);
    }

    #[test]
    fn test_non_interactive_objects_do_not_block() {
        let mut scene = test_scene();
        let target = add_box(&mut scene, Vector3::new(0.0, 0.0, -2.0), true);
        add_box(&mut scene, Vector3::new(0.0, 0.0, 3.0), false);

        let hit = ObjectPicker::new().pick_at((400.0, 400.0), (800.0, 800.0), &scene);
        assert_eq!(hit.map(|h| h.object_id), Some(target));
    }

    #[test]
    fn test_scaled_object_grows_its_hit_area() {
        let mut scene = test_scene();
        let id = add_box(&mut scene, Vector3::zero(), true);
        scene.add_object(
            ObjectBuilder::new("ground", Mesh::from_geometry(&generate_plane(10.0, 10.0)))
                .position(Vector3::new(0.0, 0.0, -5.0)),
        );

        // Just outside the unit box's silhouette at the box's front face
        let picker = ObjectPicker::new();
        let camera = &scene.camera_manager.camera;
        let miss = Ray::new(camera.eye, Vector3::new(0.6, 0.0, 2.0) - camera.eye);
        assert!(picker.pick(&miss, &scene).is_none());

        scene
            .object_mut(id)
            .expect("box exists")
            .set_uniform_scale(1.4);
        assert_eq!(picker.pick(&miss, &scene).map(|h| h.object_id), Some(id));
    }
}
