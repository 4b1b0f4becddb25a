//! # Animation Module
//!
//! Frame-driven animation of scene objects.
//!
//! - [`AnimatedObjectController`] - spin plus click-to-grow state for one object
//! - [`AnimationRegistry`] - ordered update list and click dispatch table
//!
//! Each frame the host calls [`AnimationRegistry::apply_to_scene`], which ticks
//! every controller once and copies the resulting rotation and scale onto the
//! bound render objects. Clicks are routed with [`AnimationRegistry::activate`].

pub mod controller;
pub mod registry;

pub use controller::{AnimatedObjectController, FrameUpdate, MAX_SCALE, MIN_SCALE};
pub use registry::AnimationRegistry;
