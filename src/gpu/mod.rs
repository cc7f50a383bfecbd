//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, the
//! lighting uniform, the depth target, and shader composition.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Key/fill/rim lighting uniform and bind group.
pub mod lighting;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth attachment management.
pub mod texture;
