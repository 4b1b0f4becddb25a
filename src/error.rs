//! Error types
//!
//! Each layer reports its own failures; [`AppError`] collects them for the
//! application entry point.

use crate::{config::ConfigError, gfx::resources::color::ColorError};

/// Failures while turning a [`SceneConfig`](crate::config::SceneConfig) into a scene
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("invalid color for {mesh}: {source}")]
    Color {
        mesh: String,
        #[source]
        source: ColorError,
    },

    #[error("invalid background color: {0}")]
    BackgroundColor(#[source] ColorError),

    #[error("invalid light color: {0}")]
    LightColor(#[source] ColorError),

    #[error("{mesh} has non-positive size {size:?}")]
    InvalidSize { mesh: String, size: Vec<f32> },
}

/// GPU initialization failures
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Top-level application error
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("surface out of memory")]
    OutOfMemory,
}
