//! GPU resource management
//!
//! Colors, materials, global uniforms, and depth textures.

pub mod color;
pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{
    update_global_ubo, GlobalBindings, GlobalUBO, LightRig, MAX_POINT_LIGHTS,
};
pub use material::{Material, MaterialKind, MaterialManager};
pub use texture_resource::TextureResource;
