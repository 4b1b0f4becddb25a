//! # Graphics Module
//!
//! Everything between the scene description and pixels on screen.
//!
//! - **Camera** ([`camera`]) - orbit camera with mouse and keyboard controls
//! - **Geometry** ([`geometry`]) - procedural box and plane meshes
//! - **Picking** ([`picking`]) - cursor ray casting against scene objects
//! - **Rendering** ([`rendering`]) - shadow map and lit passes on wgpu
//! - **Resources** ([`resources`]) - colors, materials, lights and textures
//! - **Scene** ([`scene`]) - objects and the scene container
//!
//! ```no_run
//! use spinning_boxes::{config::SceneConfig, gfx::scene::Scene};
//!
//! // The render engine is created by the app once a window exists
//! // let engine = RenderEngine::new(window, width, height, vsync, 2048).await?;
//! let (scene, _animations) = Scene::from_config(&SceneConfig::default())?;
//! # Ok::<(), spinning_boxes::error::SceneError>(())
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
