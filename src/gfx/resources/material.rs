//! Material system for the scene's two surface types
//!
//! Boxes use a diffuse material whose vertices wobble over time; the ground
//! uses a shadow catcher that draws nothing but the shadows falling on it.
//! Materials are stored in MaterialManager and objects reference them by ID.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// How a material shades its surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Lambert diffuse with a time-driven twist about the local Y axis
    Wobble { speed: f32, factor: f32 },
    /// Transparent surface that only darkens where it is shadowed
    ShadowCatcher { opacity: f32 },
}

impl MaterialKind {
    /// Shader-side selector, see `params.w` in the material uniform
    fn shader_index(&self) -> f32 {
        match self {
            MaterialKind::Wobble { .. } => 0.0,
            MaterialKind::ShadowCatcher { .. } => 1.0,
        }
    }
}

/// GPU uniform data for materials
///
/// MUST match the Material struct in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Linear RGBA
    pub base_color: [f32; 4],
    /// x: wobble time, y: wobble factor, z: shadow opacity, w: kind
    pub params: [f32; 4],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        // The wobble runs in the vertex stage, shading in the fragment stage
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Material Bind Group Layout");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// Material definition
///
/// Contains material properties and GPU resources. Materials are stored
/// centrally in MaterialManager and shared between objects.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub kind: MaterialKind,
    /// Animation clock in seconds, already multiplied by the wobble speed
    time: f32,

    // GPU resources - shared by all objects using this material
    material_ubo: Option<MaterialUBO>,
    material_bindings: Option<MaterialBindings>,
}

impl Default for Material {
    fn default() -> Self {
        Self::wobble("default", [0.8, 0.8, 0.8], 0.0, 0.0)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("base_color", &self.base_color)
            .field("kind", &self.kind)
            .field("time", &self.time)
            .field("gpu_ready", &self.material_bindings.is_some())
            .finish()
    }
}

impl Material {
    /// Opaque diffuse material that twists its vertices over time
    ///
    /// `color` is linear RGB.
    pub fn wobble(name: &str, color: [f32; 3], speed: f32, factor: f32) -> Self {
        Self::new(
            name,
            [color[0], color[1], color[2], 1.0],
            MaterialKind::Wobble { speed, factor },
        )
    }

    /// Transparent material that only shows received shadows
    pub fn shadow_catcher(name: &str, opacity: f32) -> Self {
        Self::new(
            name,
            [0.0, 0.0, 0.0, 1.0],
            MaterialKind::ShadowCatcher {
                opacity: opacity.clamp(0.0, 1.0),
            },
        )
    }

    fn new(name: &str, base_color: [f32; 4], kind: MaterialKind) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            kind,
            time: 0.0,
            material_ubo: None,
            material_bindings: None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self.kind, MaterialKind::ShadowCatcher { .. })
    }

    /// Sets the wobble clock from the seconds elapsed since startup
    pub fn advance(&mut self, elapsed_secs: f32) {
        if let MaterialKind::Wobble { speed, .. } = self.kind {
            self.time = elapsed_secs * speed;
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn uniform(&self) -> MaterialUniform {
        let (factor, opacity) = match self.kind {
            MaterialKind::Wobble { factor, .. } => (factor, 1.0),
            MaterialKind::ShadowCatcher { opacity } => (0.0, opacity),
        };

        MaterialUniform {
            base_color: self.base_color,
            params: [self.time, factor, opacity, self.kind.shader_index()],
        }
    }

    /// Updates GPU resources for this material
    ///
    /// Must be called after material properties change to sync with GPU.
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        let uniform_data = self.uniform();
        let ubo = self
            .material_ubo
            .get_or_insert_with(|| MaterialUBO::new(device));

        if self.material_bindings.is_none() {
            let mut bindings = MaterialBindings::new(device);
            bindings.create_bind_group(device, ubo);
            self.material_bindings = Some(bindings);
        }

        ubo.update_content(queue, uniform_data);
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bindings
            .as_ref()
            .and_then(|bindings| bindings.bind_group())
    }
}

/// Manages all materials in the scene
///
/// Objects reference materials by ID rather than storing material data
/// directly, so GPU resources are shared between objects.
#[derive(Debug)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets material for an object with fallback to default
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or(&self.default_material)
    }

    /// Advances every material's animation clock
    pub fn advance_all(&mut self, elapsed_secs: f32) {
        for material in self.materials.values_mut() {
            material.advance(elapsed_secs);
        }
    }

    /// Syncs every material (and the fallback) to the GPU
    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.default_material.update_gpu_resources(device, queue);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }

    pub fn list_materials(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.materials.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wobble_clock_scales_with_speed() {
        let mut material = Material::wobble("box", [1.0, 0.0, 0.0], 6.0, 0.6);
        material.advance(0.5);

        let uniform = material.uniform();
        assert_eq!(uniform.params, [3.0, 0.6, 1.0, 0.0]);
        assert_eq!(uniform.base_color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shadow_catcher_ignores_clock() {
        let mut material = Material::shadow_catcher("ground", 0.3);
        material.advance(10.0);

        assert!(material.is_transparent());
        assert_eq!(material.time(), 0.0);
        assert_eq!(material.uniform().params, [0.0, 0.0, 0.3, 1.0]);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let material = Material::shadow_catcher("ground", 2.0);
        assert_eq!(material.kind, MaterialKind::ShadowCatcher { opacity: 1.0 });
    }

    #[test]
    fn test_manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::wobble("box_0", [0.5, 0.5, 0.5], 2.0, 0.6));

        assert_eq!(manager.get_material_for_object(Some("box_0")).name, "box_0");
        assert_eq!(manager.get_material_for_object(Some("missing")).name, "default");
        assert_eq!(manager.get_material_for_object(None).name, "default");
    }

    #[test]
    fn test_advance_all_reaches_every_material() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::wobble("slow", [1.0; 3], 2.0, 0.6));
        manager.add_material(Material::wobble("fast", [1.0; 3], 6.0, 0.6));
        manager.advance_all(1.5);

        assert_eq!(manager.get_material("slow").map(Material::time), Some(3.0));
        assert_eq!(manager.get_material("fast").map(Material::time), Some(9.0));
        assert_eq!(manager.list_materials(), vec!["fast", "slow"]);
    }
}
