//! Global uniform bindings for camera and scene lighting
//!
//! Manages the GPU uniform buffer and bind group for per-frame state shared
//! by every object: camera matrices, the light rig, and the light-space
//! matrix used for shadow mapping.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};
use log::warn;

use crate::{
    config::{AmbientLightConfig, DirectionalLightConfig, PointLightConfig, ShadowConfig},
    gfx::{
        camera::{camera_utils::CameraUniform, orbit_camera::OPENGL_TO_WGPU_MATRIX},
        resources::color::{parse_linear, ColorError},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Point lights beyond this count are ignored by the shader
pub const MAX_POINT_LIGHTS: usize = 4;

/// Depth offset applied when comparing against the shadow map
const SHADOW_BIAS: f32 = 0.002;

/// Global uniform buffer content structure
///
/// MUST match the Globals struct in `scene.wgsl` exactly. Every field is a
/// vec4 or mat4 so no implicit padding is involved.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    /// rgb premultiplied by intensity
    ambient: [f32; 4],
    /// xyz: unit vector pointing towards the light, w: 1.0 if it casts shadows
    directional_direction: [f32; 4],
    directional_color: [f32; 4],
    point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    /// x: point light count, y: shadow texel size, z: shadow bias
    params: [f32; 4],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Orthographic volume rendered into the shadow map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub map_size: u32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl From<&ShadowConfig> for ShadowCamera {
    fn from(config: &ShadowConfig) -> Self {
        Self {
            map_size: config.map_size.max(1),
            left: config.left,
            right: config.right,
            bottom: config.bottom,
            top: config.top,
            near: config.near,
            far: config.far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl DirectionalLight {
    /// Unit vector from the target towards the light
    pub fn direction(&self) -> Vector3<f32> {
        let offset = self.position - self.target;
        if offset.magnitude2() <= f32::EPSILON {
            Vector3::unit_y()
        } else {
            offset.normalize()
        }
    }

    /// Light-space view-projection for the shadow pass
    pub fn view_projection(&self) -> Matrix4<f32> {
        // look_at degenerates when the view direction is parallel to up
        let up = if self.direction().y.abs() > 0.999 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            up,
        );
        let s = &self.shadow;
        let proj = cgmath::ortho(s.left, s.right, s.bottom, s.top, s.near, s.far);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

/// Point light without distance falloff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Every light in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub points: Vec<PointLight>,
}

/// White lights at the default positions, no point lights
impl Default for LightRig {
    fn default() -> Self {
        let directional = DirectionalLightConfig::default();
        Self {
            ambient: AmbientLight {
                color: [1.0; 3],
                intensity: AmbientLightConfig::default().intensity,
            },
            directional: DirectionalLight {
                position: Vector3::from(directional.position),
                target: Vector3::from(directional.target),
                color: [1.0; 3],
                intensity: directional.intensity,
                cast_shadow: directional.cast_shadow,
                shadow: ShadowCamera::from(&directional.shadow),
            },
            points: Vec::new(),
        }
    }
}

impl LightRig {
    /// Resolves color strings and builds the rig from configuration
    pub fn from_config(
        ambient: &AmbientLightConfig,
        directional: &DirectionalLightConfig,
        points: &[PointLightConfig],
    ) -> Result<Self, ColorError> {
        let points = points
            .iter()
            .map(|light| {
                Ok(PointLight {
                    position: Vector3::from(light.position),
                    color: parse_linear(&light.color)?,
                    intensity: light.intensity,
                })
            })
            .collect::<Result<Vec<_>, ColorError>>()?;

        if points.len() > MAX_POINT_LIGHTS {
            warn!(
                "{} point lights configured, only the first {MAX_POINT_LIGHTS} are rendered",
                points.len()
            );
        }

        Ok(Self {
            ambient: AmbientLight {
                color: parse_linear(&ambient.color)?,
                intensity: ambient.intensity,
            },
            directional: DirectionalLight {
                position: Vector3::from(directional.position),
                target: Vector3::from(directional.target),
                color: parse_linear(&directional.color)?,
                intensity: directional.intensity,
                cast_shadow: directional.cast_shadow,
                shadow: ShadowCamera::from(&directional.shadow),
            },
            points,
        })
    }

    /// Packs camera and lights into the layout the shaders expect
    pub fn to_uniform(&self, camera: &CameraUniform) -> GlobalUBOContent {
        let scaled = |rgb: [f32; 3], intensity: f32| {
            [rgb[0] * intensity, rgb[1] * intensity, rgb[2] * intensity, 1.0]
        };

        let mut point_positions = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_colors = [[0.0; 4]; MAX_POINT_LIGHTS];
        let point_count = self.points.len().min(MAX_POINT_LIGHTS);
        for (i, light) in self.points.iter().take(MAX_POINT_LIGHTS).enumerate() {
            point_positions[i] = light.position.extend(1.0).into();
            point_colors[i] = scaled(light.color, light.intensity);
        }

        let directional = &self.directional;
        let direction = directional.direction();

        GlobalUBOContent {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_view_proj: directional.view_projection().into(),
            ambient: scaled(self.ambient.color, self.ambient.intensity),
            directional_direction: [
                direction.x,
                direction.y,
                direction.z,
                if directional.cast_shadow { 1.0 } else { 0.0 },
            ],
            directional_color: scaled(directional.color, directional.intensity),
            point_positions,
            point_colors,
            params: [
                point_count as f32,
                1.0 / directional.shadow.map_size as f32,
                SHADOW_BIAS,
                0.0,
            ],
        }
    }
}

/// Writes this frame's camera and light data into the global uniform buffer
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    lights: &LightRig,
) {
    ubo.update_content(queue, lights.to_uniform(camera));
}

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group()` has been called
    pub fn bind_groups(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}
