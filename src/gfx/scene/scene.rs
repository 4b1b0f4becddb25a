use cgmath::Vector3;
use log::{debug, info};
use wgpu::Device;

use crate::{
    animation::AnimationRegistry,
    config::{AnimatedMeshConfig, GroundConfig, SceneConfig},
    error::SceneError,
    gfx::{
        camera::camera_utils::CameraManager,
        geometry::{generate_box, generate_plane},
        resources::{
            color::parse_linear,
            global_bindings::LightRig,
            material::{Material, MaterialManager},
        },
    },
};

use super::object::{Mesh, Object, ObjectBuilder, ObjectId};

/// Main scene containing objects, materials, lights and camera
#[derive(Debug)]
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager, // Centralized material storage
    pub lights: LightRig,
    /// Linear RGB clear color
    pub background: [f32; 3],
    next_id: u32,
}

impl Scene {
    /// Creates an empty scene with default white lights and a white background
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            lights: LightRig::default(),
            background: [1.0; 3],
            next_id: 0,
        }
    }

    /// Assembles the scene described by `config`
    ///
    /// Returns the scene together with the registry holding one animation
    /// controller per animated mesh. The camera starts with a square aspect;
    /// the host resizes it to the window.
    pub fn from_config(config: &SceneConfig) -> Result<(Scene, AnimationRegistry), SceneError> {
        let mut scene = Scene::new(CameraManager::from_config(&config.camera, 1.0));

        scene.background =
            parse_linear(&config.background).map_err(SceneError::BackgroundColor)?;
        scene.lights = LightRig::from_config(
            &config.ambient_light,
            &config.directional_light,
            &config.point_lights,
        )
        .map_err(SceneError::LightColor)?;

        if config.ground.enabled {
            scene.add_ground(&config.ground)?;
        }

        let mut registry = AnimationRegistry::new();
        for (index, mesh) in config.meshes.iter().enumerate() {
            let id = scene.add_animated_box(index, mesh)?;
            registry.register(id);
        }

        info!(
            "Scene assembled: {} objects, {} animated, {} point lights",
            scene.objects.len(),
            registry.len(),
            scene.lights.points.len()
        );

        Ok((scene, registry))
    }

    fn add_ground(&mut self, ground: &GroundConfig) -> Result<ObjectId, SceneError> {
        let [width, height] = ground.size;
        validate_size("ground", &ground.size)?;

        self.material_manager
            .add_material(Material::shadow_catcher("ground", ground.opacity));

        Ok(self.add_object(
            ObjectBuilder::new("ground", Mesh::from_geometry(&generate_plane(width, height)))
                .position(Vector3::from(ground.position))
                .rotation(Vector3::from(ground.rotation))
                .material("ground")
                .receive_shadow(true),
        ))
    }

    fn add_animated_box(
        &mut self,
        index: usize,
        mesh: &AnimatedMeshConfig,
    ) -> Result<ObjectId, SceneError> {
        let name = format!("box_{index}");
        let [width, height, depth] = mesh.dimensions();
        validate_size(&name, &[width, height, depth])?;

        let color = parse_linear(&mesh.color).map_err(|source| SceneError::Color {
            mesh: name.clone(),
            source,
        })?;
        self.material_manager.add_material(Material::wobble(
            &name,
            color,
            mesh.speed,
            mesh.wobble_factor,
        ));

        debug!(
            "Adding {name}: {}x{}x{} {} at {:?}",
            width, height, depth, mesh.color, mesh.position
        );

        Ok(self.add_object(
            ObjectBuilder::new(
                name.clone(),
                Mesh::from_geometry(&generate_box(width, height, depth)),
            )
            .position(Vector3::from(mesh.position))
            .material(name)
            .cast_shadow(true)
            .interactive(true),
        ))
    }

    /// Adds an object and returns the id assigned to it
    pub fn add_object(&mut self, builder: ObjectBuilder) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(builder.build(id));
        id
    }

    /// Removes an object; its id is never reused
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Initializes GPU resources for all objects and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue);
    }

    /// Updates all object transforms and syncs to GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.update_transform(queue);
        }
    }

    /// Moves every material clock to `elapsed_secs` since startup
    pub fn advance_materials(&mut self, elapsed_secs: f32) {
        self.material_manager.advance_all(elapsed_secs);
    }

    /// Updates material GPU resources when materials have changed
    pub fn update_materials(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.material_manager
            .update_all_gpu_resources(device, queue);
    }

    /// Gets material for rendering an object
    ///
    /// Falls back to the default material if none is assigned or the
    /// assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn background_color(&self) -> wgpu::Color {
        let [r, g, b] = self.background;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            interactive_count: self.objects.iter().filter(|obj| obj.interactive).count(),
            material_count: self.material_manager.len(),
            total_triangles: self.objects.iter().map(|obj| obj.mesh.index_count() / 3).sum(),
            total_vertices: self.objects.iter().map(|obj| obj.mesh.vertex_count()).sum(),
        }
    }
}

fn validate_size(mesh: &str, size: &[f32]) -> Result<(), SceneError> {
    if size.iter().all(|extent| extent.is_finite() && *extent > 0.0) {
        Ok(())
    } else {
        Err(SceneError::InvalidSize {
            mesh: mesh.to_string(),
            size: size.to_vec(),
        })
    }
}

/// Scene statistics for debugging and logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub interactive_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AnimatedMeshConfig, gfx::resources::color::ColorError};

    #[test]
    fn test_default_config_builds_demo_scene() {
        let (scene, registry) = Scene::from_config(&SceneConfig::default()).expect("valid scene");

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 4);
        assert_eq!(stats.interactive_count, 3);
        assert_eq!(stats.material_count, 4);
        assert_eq!(stats.total_triangles, 2 + 3 * 12);
        assert_eq!(registry.len(), 3);

        let ground = &scene.objects[0];
        assert_eq!(ground.name, "ground");
        assert!(ground.receive_shadow);
        assert!(!ground.cast_shadow);
        assert!(!registry.contains(ground.id));

        for object in &scene.objects[1..] {
            assert!(object.cast_shadow);
            assert!(registry.contains(object.id));
            assert_eq!(object.get_material_id(), Some(object.name.as_str()));
        }
        assert_eq!(scene.background, [1.0; 3]);
    }

    #[test]
    fn test_unknown_color_names_the_mesh() {
        let config = SceneConfig {
            meshes: vec![AnimatedMeshConfig::new([0.0; 3], "blurple", 1.0)],
            ..Default::default()
        };

        match Scene::from_config(&config) {
            Err(SceneError::Color { mesh, source }) => {
                assert_eq!(mesh, "box_0");
                assert_eq!(source, ColorError::UnknownName("blurple".into()));
            }
            other => panic!("expected a color error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_light_and_background_colors_have_own_errors() {
        let mut config = SceneConfig::default();
        config.directional_light.color = "nope".into();
        assert!(matches!(
            Scene::from_config(&config),
            Err(SceneError::LightColor(ColorError::UnknownName(_)))
        ));

        let config = SceneConfig {
            background: "#12".into(),
            ..Default::default()
        };
        let error = Scene::from_config(&config).unwrap_err();
        assert!(matches!(error, SceneError::BackgroundColor(_)));
        assert!(error.to_string().starts_with("invalid background color"));
    }

    #[test]
    fn test_non_positive_size_is_rejected() {
        let config = SceneConfig {
            meshes: vec![AnimatedMeshConfig::new([0.0; 3], "pink", 1.0).with_size([1.0, 0.0, 1.0])],
            ..Default::default()
        };

        assert!(matches!(
            Scene::from_config(&config),
            Err(SceneError::InvalidSize { ref mesh, .. }) if mesh == "box_0"
        ));
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let (mut scene, _) = Scene::from_config(&SceneConfig::default()).expect("valid scene");
        let last = scene.objects.last().map(|object| object.id).expect("has objects");

        assert!(scene.remove_object(last).is_some());
        assert!(scene.object(last).is_none());
        assert!(scene.remove_object(last).is_none());

        let id = scene.add_object(ObjectBuilder::new(
            "extra",
            Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)),
        ));
        assert!(id > last);
    }

    #[test]
    fn test_scene_without_ground() {
        let config = SceneConfig {
            ground: GroundConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let (scene, registry) = Scene::from_config(&config).expect("valid scene");
        assert_eq!(scene.objects.len(), 3);
        assert_eq!(registry.len(), 3);
    }
}
