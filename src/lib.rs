//! Spinning Boxes
//!
//! A small interactive 3D scene built on wgpu and winit: boxes spin
//! continuously and toggle between their normal and an enlarged size when
//! clicked, above a shadow-catching ground plane.

pub mod animation;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use animation::{AnimatedObjectController, AnimationRegistry};
pub use app::SpinningBoxesApp;
pub use config::SceneConfig;
