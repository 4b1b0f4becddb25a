//! wgpu rendering engine
//!
//! Owns the surface, device and pipelines, and draws a [`Scene`] in two
//! passes: a depth-only pass from the directional light into the shadow map,
//! then the main pass with opaque lit objects followed by transparent shadow
//! catchers.

use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::Device;

use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig},
            material::MaterialBindings,
            texture_resource::TextureResource,
        },
        scene::{
            object::{object_bind_group_layout, DrawObject},
            scene::Scene,
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder},
        binding_types,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_PIPELINE: &str = "Shadow";
const LIT_PIPELINE: &str = "Lit";
const SHADOW_CATCHER_PIPELINE: &str = "ShadowCatcher";

/// Largest shadow map the requested device limits allow
const MAX_SHADOW_MAP_SIZE: u32 = 4096;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    // Shadow mapping resources
    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Initial surface size in pixels
    /// * `vsync` - Synchronize presentation with the display refresh
    /// * `shadow_map_size` - Edge length of the directional shadow map
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
        shadow_map_size: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: MAX_SHADOW_MAP_SIZE,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Shaders output linear color; an sRGB target does the encoding
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        if !format.is_srgb() {
            warn!("No sRGB surface format available, colors will look dark ({format:?})");
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_size = shadow_map_size.clamp(1, MAX_SHADOW_MAP_SIZE);
        if shadow_size != shadow_map_size {
            warn!("Shadow map size {shadow_map_size} clamped to {shadow_size}");
        }
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_size);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Comparison,
            ))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let object_layout = object_bind_group_layout(&device);
        let material_layout = MaterialBindings::new(&device).bind_group_layouts().clone();

        // Wrap device and queue in Arc for pipeline manager
        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow_pass.wgsl"));

        // No culling so thin geometry still occludes from either side
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_vertex_only()
                .with_cull_mode(None)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    object_layout.layout.clone(),
                ]),
        );

        let scene_layouts = vec![
            global_bindings.bind_group_layouts().clone(),
            object_layout.layout.clone(),
            material_layout,
            shadow_layout.layout.clone(),
        ];

        pipeline_manager.register_pipeline(
            LIT_PIPELINE,
            PipelineConfig::default()
                .with_label("LIT")
                .with_shader("scene")
                .with_color_target(format, wgpu::BlendState::REPLACE)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(scene_layouts.clone()),
        );

        pipeline_manager.register_pipeline(
            SHADOW_CATCHER_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW CATCHER")
                .with_shader("scene")
                .with_fragment_entry("fs_shadow_catcher")
                .with_color_target(format, wgpu::BlendState::ALPHA_BLENDING)
                .with_cull_mode(None)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_depth_write(false)
                .with_bind_group_layouts(scene_layouts),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            warn!("{} pipelines failed to build: {errors:?}", errors.len());
        }

        info!(
            "Render engine ready: {}x{} {format:?}, {:?}, shadow map {shadow_size}",
            config.width, config.height, config.present_mode
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            shadow_map,
            shadow_bind_group,
        })
    }

    /// Draws one frame
    ///
    /// Surface errors are returned so the caller can decide whether to
    /// reconfigure, skip the frame, or stop.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let Some(global_bind_group) = self.global_bindings.bind_groups() else {
            warn!("Global bind group missing, skipping frame");
            return Ok(());
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: Shadow depth from the directional light. The map is always
        // cleared so a light without shadows leaves everything lit.
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if scene.lights.directional.cast_shadow {
                if let Some(shadow_pipeline) = self.pipeline_manager.pipeline(SHADOW_PIPELINE) {
                    shadow_pass.set_pipeline(shadow_pipeline);
                    shadow_pass.set_bind_group(0, global_bind_group, &[]);

                    for object in scene
                        .objects
                        .iter()
                        .filter(|object| object.visible && object.cast_shadow)
                    {
                        shadow_pass.draw_object(object);
                    }
                }
            }
        }

        // PASS 2: Opaque objects, then transparent shadow catchers on top
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, global_bind_group, &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            for (pipeline_name, transparent) in
                [(LIT_PIPELINE, false), (SHADOW_CATCHER_PIPELINE, true)]
            {
                let Some(pipeline) = self.pipeline_manager.pipeline(pipeline_name) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);

                for object in scene.objects.iter().filter(|object| object.visible) {
                    let material = scene.get_material_for_object(object);
                    if material.is_transparent() != transparent {
                        continue;
                    }

                    if let Some(material_bind_group) = material.get_bind_group() {
                        render_pass.set_bind_group(2, material_bind_group, &[]);
                        render_pass.draw_object(object);
                    } else {
                        debug!(
                            "Skipping '{}' - material '{}' has no GPU resources",
                            object.name, material.name
                        );
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Uploads this frame's camera and light data
    pub fn update(&mut self, camera_uniform: &CameraUniform, lights: &LightRig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface with its current size after it was lost
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
