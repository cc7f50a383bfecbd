//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is an `AssemblyCommand`. Consumers
//! construct commands and pass them to
//! [`AssemblyEngine::execute`](super::AssemblyEngine::execute).

use glam::Vec2;

use crate::assembly::AssemblyScene;

/// A discrete user-facing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssemblyCommand {
    // ── Stage ───────────────────────────────────────────────────────
    /// Request a stage. Out-of-range values are clamped.
    SetStage(i64),

    /// Step forward one stage from the latest request.
    NextStage,

    /// Step back one stage from the latest request.
    PreviousStage,

    /// Jump to the exploded stage.
    FirstStage,

    /// Jump to the running stage.
    FinalStage,

    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit the camera by `delta` pixels of mouse movement.
    OrbitCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    ZoomCamera {
        /// Scroll amount.
        delta: f32,
    },

    /// Start or end a user drag. Auto-rotation pauses while dragging.
    SetDragging(bool),

    /// Toggle turntable auto-rotation.
    ToggleAutoRotate,

    /// Ease the user orbit and zoom back to the stage pose.
    ResetView,
}

impl AssemblyCommand {
    /// Apply this command to `scene`. Stage commands are queued for the
    /// next tick.
    pub fn apply(self, scene: &mut AssemblyScene) {
        let requested = i64::try_from(scene.requested_stage()).unwrap_or(i64::MAX);
        match self {
            Self::SetStage(stage) => scene.request_stage(stage),
            Self::NextStage => scene.request_stage(requested.saturating_add(1)),
            Self::PreviousStage => scene.request_stage(requested - 1),
            Self::FirstStage => scene.request_stage(0),
            Self::FinalStage => {
                let last = scene.controller().final_stage();
                scene.request_stage(i64::try_from(last).unwrap_or(i64::MAX));
            }
            Self::OrbitCamera { delta } => scene.camera_mut().orbit(delta),
            Self::ZoomCamera { delta } => scene.camera_mut().zoom(delta),
            Self::SetDragging(dragging) => scene.camera_mut().set_dragging(dragging),
            Self::ToggleAutoRotate => scene.camera_mut().toggle_auto_rotate(),
            Self::ResetView => scene.camera_mut().reset_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn scene(stage: usize) -> AssemblyScene {
        AssemblyScene::reference(stage, &Options::default())
    }

    #[test]
    fn stepping_accumulates_between_ticks() {
        let mut s = scene(2);
        AssemblyCommand::NextStage.apply(&mut s);
        AssemblyCommand::NextStage.apply(&mut s);
        assert_eq!(s.current_stage(), 2);
        assert_eq!(s.requested_stage(), 4);
        let outcome = s.tick(1.0 / 60.0);
        assert_eq!(outcome.stage_change.map(|c| c.current), Some(4));
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        let mut s = scene(0);
        AssemblyCommand::PreviousStage.apply(&mut s);
        assert_eq!(s.requested_stage(), 0);
        let last = s.controller().final_stage();
        AssemblyCommand::FinalStage.apply(&mut s);
        AssemblyCommand::NextStage.apply(&mut s);
        assert_eq!(s.requested_stage(), last);
    }

    #[test]
    fn first_and_set_stage_are_absolute() {
        let mut s = scene(5);
        AssemblyCommand::FirstStage.apply(&mut s);
        assert_eq!(s.requested_stage(), 0);
        AssemblyCommand::SetStage(3).apply(&mut s);
        assert_eq!(s.requested_stage(), 3);
        AssemblyCommand::SetStage(-4).apply(&mut s);
        assert_eq!(s.requested_stage(), 0);
    }

    #[test]
    fn camera_commands_reach_the_choreographer() {
        let mut s = scene(0);
        let auto = s.camera().auto_rotate();
        AssemblyCommand::ToggleAutoRotate.apply(&mut s);
        assert_eq!(s.camera().auto_rotate(), !auto);

        let before = s.camera().eye();
        AssemblyCommand::OrbitCamera {
            delta: Vec2::new(30.0, 0.0),
        }
        .apply(&mut s);
        assert!((s.camera().eye() - before).length() > 1e-3);
        assert_eq!(s.camera().base_position(), s.stages().pose(0).position);
    }
}
