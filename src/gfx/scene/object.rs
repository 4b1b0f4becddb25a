use std::f64::consts::TAU;

use cgmath::{Array, Matrix, Matrix4, SquareMatrix, Vector3, Zero};
use log::trace;
use wgpu::{util::DeviceExt, Device};

use crate::{
    animation::FrameUpdate,
    gfx::{geometry::GeometryData, picking::AABB, resources::material::MaterialId},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::vertex::Vertex3D;

/// Stable handle of an object within its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    bounds: AABB,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();

        Self {
            index_count: indices.len() as u32,
            bounds: geometry.bounds(),
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Bounding box in object space
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    fn init_gpu_resources(&mut self, device: &Device, label: &str) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("bounds", &self.bounds)
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}

/// Per-object uniform data
///
/// MUST match the Object struct in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals
    normal: [[f32; 4]; 4],
    /// x: 1.0 if the object receives shadows
    flags: [f32; 4],
}

type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Layout of the per-object bind group (slot 1 in every pipeline)
pub fn object_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

// GPU resources struct to hold the transform uniform and its bind group
pub struct ObjectGpuResources {
    transform_ubo: ObjectUBO,
    transform_bind_group: wgpu::BindGroup,
}

/// A renderable mesh with its transform, material and interaction flags
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    pub mesh: Mesh,
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub material_id: Option<MaterialId>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Whether clicks can land on this object
    pub interactive: bool,
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Object-to-world matrix: translate, rotate, then scale
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(cgmath::Rad(self.rotation.x))
            * Matrix4::from_angle_y(cgmath::Rad(self.rotation.y))
            * Matrix4::from_angle_z(cgmath::Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Copies one animation step onto the transform
    ///
    /// Rotation goes to the X and Y axes, scale to all three axes.
    pub fn apply_animation(&mut self, update: FrameUpdate) {
        // Angles grow without bound; wrap before narrowing to keep precision
        self.rotation.x = update.rotation_x.rem_euclid(TAU) as f32;
        self.rotation.y = update.rotation_y.rem_euclid(TAU) as f32;
        self.set_uniform_scale(update.scale as f32);
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::from_value(scale);
    }

    pub fn get_material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    pub fn uniform(&self) -> ObjectUniform {
        let model = self.model_matrix();
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        ObjectUniform {
            model: model.into(),
            normal: normal.into(),
            flags: [if self.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    /// Sync the transform to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.transform_ubo.update_content(queue, uniform);
        }
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        trace!(
            "Uploading '{}' {}: {} vertices, {} indices",
            self.name,
            self.id,
            self.mesh.vertex_count(),
            self.mesh.index_count()
        );
        self.mesh.init_gpu_resources(device, &self.name);

        let layout = object_bind_group_layout(device);
        let transform_ubo = ObjectUBO::with_content(device, &self.uniform());
        let transform_bind_group = BindGroupBuilder::new(&layout)
            .resource(transform_ubo.binding_resource())
            .create(device, "Object Bind Group");

        self.gpu_resources = Some(ObjectGpuResources {
            transform_ubo,
            transform_bind_group,
        });
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("material_id", &self.material_id)
            .field("interactive", &self.interactive)
            .finish_non_exhaustive()
    }
}

/// Builder for objects; the scene assigns the id when the object is added
pub struct ObjectBuilder {
    name: String,
    mesh: Mesh,
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    material_id: Option<MaterialId>,
    cast_shadow: bool,
    receive_shadow: bool,
    interactive: bool,
    visible: bool,
}

impl ObjectBuilder {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::from_value(1.0),
            material_id: None,
            cast_shadow: false,
            receive_shadow: false,
            interactive: false,
            visible: true,
        }
    }

    pub fn position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn material(mut self, material_id: impl Into<MaterialId>) -> Self {
        self.material_id = Some(material_id.into());
        self
    }

    pub fn cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    pub fn receive_shadow(mut self, receive_shadow: bool) -> Self {
        self.receive_shadow = receive_shadow;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub(crate) fn build(self, id: ObjectId) -> Object {
        Object {
            id,
            name: self.name,
            mesh: self.mesh,
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            material_id: self.material_id,
            cast_shadow: self.cast_shadow,
            receive_shadow: self.receive_shadow,
            interactive: self.interactive,
            visible: self.visible,
            gpu_resources: None,
        }
    }
}

pub trait DrawObject {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_object(&mut self, object: &Object);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    /// Binds the object's transform to slot 1 and draws its mesh
    fn draw_object(&mut self, object: &Object) {
        let Some(bind_group) = object.get_transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        self.draw_mesh(&object.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform};

    fn unit_box() -> Object {
        ObjectBuilder::new("box", Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)))
            .position(Vector3::new(1.0, 2.0, 3.0))
            .build(ObjectId(0))
    }

    #[test]
    fn test_builder_defaults() {
        let object = unit_box();
        assert!(object.visible);
        assert!(!object.interactive);
        assert!(!object.cast_shadow);
        assert_eq!(object.scale, Vector3::from_value(1.0));
        assert!(object.get_material_id().is_none());
        assert!(!object.mesh.is_uploaded());
    }

    #[test]
    fn test_apply_animation_sets_rotation_and_uniform_scale() {
        let mut object = unit_box();
        object.apply_animation(FrameUpdate {
            rotation_x: 0.25,
            rotation_y: 0.25,
            scale: 1.2,
        });

        assert_relative_eq!(object.rotation.x, 0.25);
        assert_relative_eq!(object.rotation.y, 0.25);
        assert_eq!(object.rotation.z, 0.0);
        assert_relative_eq!(object.scale.x, 1.2);
        assert_relative_eq!(object.scale.z, 1.2);
        assert_eq!(object.position, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_large_angles_wrap() {
        let mut object = unit_box();
        object.apply_animation(FrameUpdate {
            rotation_x: TAU * 1000.0 + 0.5,
            rotation_y: TAU * 1000.0 + 0.5,
            scale: 1.0,
        });
        assert_relative_eq!(object.rotation.x, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_model_matrix_scales_before_translating() {
        let mut object = unit_box();
        object.set_uniform_scale(2.0);

        let corner = object
            .model_matrix()
            .transform_point(Point3::new(0.5, 0.5, 0.5));
        assert_relative_eq!(corner.x, 2.0);
        assert_relative_eq!(corner.y, 3.0);
        assert_relative_eq!(corner.z, 4.0);
    }

    #[test]
    fn test_uniform_carries_shadow_flag() {
        let mut object = unit_box();
        assert_eq!(object.uniform().flags[0], 0.0);
        object.receive_shadow = true;
        assert_eq!(object.uniform().flags[0], 1.0);
    }
}
