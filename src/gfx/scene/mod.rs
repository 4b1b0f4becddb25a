//! # Scene Management Module
//!
//! Objects, their meshes and transforms, and the scene container that owns
//! them together with the camera, materials and lights.
//!
//! - [`Scene`] - objects, camera, materials, lights and background
//! - [`Object`] - a mesh with a transform, material and interaction flags
//! - [`ObjectBuilder`] - builder used with [`Scene::add_object`]
//! - [`Vertex3D`] - GPU vertex format
//!
//! ```no_run
//! use spinning_boxes::{config::SceneConfig, gfx::scene::Scene};
//!
//! let (scene, animations) = Scene::from_config(&SceneConfig::default())?;
//! assert_eq!(animations.len(), 3);
//! # Ok::<(), spinning_boxes::error::SceneError>(())
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object, ObjectBuilder, ObjectId};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
