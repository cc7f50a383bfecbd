//! Rasterization of engine parts.
//!
//! Part primitives are meshed procedurally and drawn with one instanced
//! pipeline lit by the shared camera and lighting uniforms.

pub mod mesh_gen;
pub mod part_renderer;
pub(crate) mod pipeline_util;

pub use part_renderer::{PartInstance, PartRenderer};
