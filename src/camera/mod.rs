//! Camera system: per-stage choreography, user orbit/zoom, and the GPU
//! view-projection uniform.

/// Stage-pose easing, auto-rotation and bounded user offsets.
pub mod choreographer;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Per-axis easing state machine.
pub mod eased;

pub use choreographer::{CameraChoreographer, CameraPose};
pub use eased::{AxisState, EasedAxis};
