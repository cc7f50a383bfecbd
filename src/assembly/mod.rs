//! Stage-driven assembly simulation.
//!
//! [`AssemblyScene`] ties together the [`StageController`], the
//! [`PartAnimator`], the [`KinematicSimulator`] and the camera, and advances
//! them once per tick. Nothing in here touches the GPU.

/// Per-part transitions between exploded and assembled placements.
pub mod animator;
/// Live transform storage indexed by part id.
pub mod arena;
/// Shaft angles and reciprocating displacement while running.
pub mod kinematics;
/// The tick loop tying every component together.
pub mod scene;
/// Stage bookkeeping and the per-stage pose table.
pub mod stage;

pub use animator::{PartAnimator, PartTransition, TransitionDirection};
pub use arena::PartArena;
pub use kinematics::{
    displacement, phase_offset, KinematicOffset, KinematicSimulator, ShaftState,
    SHAFT_RATIO,
};
pub use scene::{AssemblyScene, TickOutcome};
pub use stage::{AnimationTarget, StageChange, StageController, StageTable};
