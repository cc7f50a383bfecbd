//! Headless assembly scene: stage input in, live transforms and camera out.
//!
//! Everything a frame mutates happens inside [`AssemblyScene::tick`], in a
//! fixed order, against one accumulated simulation clock.

use super::animator::PartAnimator;
use super::kinematics::KinematicSimulator;
use super::stage::{StageChange, StageController, StageTable};
use crate::camera::CameraChoreographer;
use crate::options::Options;
use crate::parts::{catalog, PartId, PartSet, Transform};
use crate::util::frame_timing::clamp_frame_dt;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The stage change applied at the start of the tick, if any.
    pub stage_change: Option<StageChange>,
    /// Whether part transitions or the camera are still easing.
    pub animating: bool,
}

/// Owns every piece of per-frame state for one assembly.
pub struct AssemblyScene {
    parts: PartSet,
    stages: StageTable,
    controller: StageController,
    animator: PartAnimator,
    kinematics: KinematicSimulator,
    camera: CameraChoreographer,
    /// Latest stage requested since the previous tick.
    pending_stage: Option<i64>,
    progress: Option<f32>,
    /// Simulation seconds since mount.
    clock: f32,
    frames: u64,
    mounted: bool,
}

impl AssemblyScene {
    /// Scene resting at `initial_stage` (clamped) with the camera snapped to
    /// that stage's pose.
    #[must_use]
    pub fn new(
        parts: PartSet,
        stages: StageTable,
        initial_stage: usize,
        options: &Options,
    ) -> Self {
        let controller = StageController::new(&parts, initial_stage);
        let stage = controller.current();
        let animator = PartAnimator::new(&parts, stage, &options.animation);
        let mut kinematics = KinematicSimulator::new(&parts, &options.kinematics);
        if controller.is_running() {
            kinematics.start();
        }
        let camera = CameraChoreographer::new(stages.pose(stage), &options.camera);
        log::info!(
            "assembly mounted: {} parts, {} stages, starting at '{}'",
            parts.len(),
            controller.stage_count(),
            stages.name(stage)
        );
        Self {
            parts,
            stages,
            controller,
            animator,
            kinematics,
            camera,
            pending_stage: None,
            progress: None,
            clock: 0.0,
            frames: 0,
            mounted: true,
        }
    }

    /// The reference V8 at `initial_stage`.
    #[must_use]
    pub fn reference(initial_stage: usize, options: &Options) -> Self {
        Self::new(
            PartSet::reference_engine(),
            catalog::reference_stages(),
            initial_stage,
            options,
        )
    }

    /// Queue a stage change for the next tick. Only the latest request
    /// between two ticks is applied.
    pub fn request_stage(&mut self, stage: i64) {
        if self.mounted {
            self.pending_stage = Some(stage);
        }
    }

    /// Apply a stage change now, at the current simulation time.
    pub fn set_stage(&mut self, stage: i64) -> Option<StageChange> {
        if !self.mounted {
            return None;
        }
        self.pending_stage = None;
        self.apply_stage(stage)
    }

    /// Store the advisory inter-stage progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: Option<f32>) {
        self.progress = progress
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(0.0, 1.0));
    }

    fn apply_stage(&mut self, requested: i64) -> Option<StageChange> {
        let change = self.controller.set_stage(&self.parts, requested)?;

        if change.stopped_running {
            // Fold the last kinematic pose into the live transforms so the
            // return to rest starts exactly where the part was drawn.
            for (id, offset) in self.kinematics.stop() {
                if let Some(live) = self.animator.arena().get(id).copied() {
                    self.animator.place(id, offset.apply(&live));
                    self.animator.settle(id, self.clock);
                }
            }
        }
        let moved = self.animator.apply_stage(&self.parts, &self.controller, self.clock);
        if change.started_running {
            self.kinematics.start();
        }
        self.camera.set_target(self.stages.pose(change.current));

        log::debug!(
            "stage {} -> {} '{}': {moved} parts retargeted",
            change.previous,
            change.current,
            self.stages.name(change.current)
        );
        Some(change)
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Order: pending stage, kinematics, part transitions, camera. A
    /// torn-down scene ignores ticks entirely.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if !self.mounted {
            return TickOutcome::default();
        }
        let dt = clamp_frame_dt(dt);
        let stage_change = self
            .pending_stage
            .take()
            .and_then(|stage| self.apply_stage(stage));

        self.clock += dt;
        self.kinematics.step(&self.parts, dt);
        let parts_moving = self.animator.update(self.clock);
        self.camera.update(dt);
        self.frames += 1;

        TickOutcome {
            stage_change,
            animating: parts_moving || self.camera.is_easing(),
        }
    }

    /// Stop everything and refuse further mutation. Returns `false` if the
    /// scene was already torn down.
    pub fn teardown(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.mounted = false;
        self.pending_stage = None;
        self.animator.cancel_all();
        self.camera.cancel();
        let _ = self.kinematics.stop();
        log::info!("assembly torn down after {} frames", self.frames);
        true
    }

    /// Push new options into every component.
    pub fn apply_options(&mut self, options: &Options) {
        self.animator.set_options(&options.animation);
        self.kinematics.set_options(&options.kinematics);
        self.camera.set_options(&options.camera);
    }

    /// Drawn transform of `id`: live transform plus any kinematic offset.
    #[must_use]
    pub fn part_transform(&self, id: PartId) -> Option<Transform> {
        let live = self.animator.arena().get(id)?;
        Some(self.kinematics.offset(id).apply(live))
    }

    /// Drawn transforms of every part in id order.
    pub fn world_transforms(&self) -> impl Iterator<Item = (PartId, Transform)> + '_ {
        self.animator
            .arena()
            .iter()
            .map(|(id, live)| (id, self.kinematics.offset(id).apply(live)))
    }

    /// Static part descriptors.
    #[must_use]
    pub fn parts(&self) -> &PartSet {
        &self.parts
    }

    /// Stage names and camera poses.
    #[must_use]
    pub fn stages(&self) -> &StageTable {
        &self.stages
    }

    /// Stage bookkeeping.
    #[must_use]
    pub fn controller(&self) -> &StageController {
        &self.controller
    }

    /// Current stage.
    #[must_use]
    pub fn current_stage(&self) -> usize {
        self.controller.current()
    }

    /// Stage the scene will be at after the next tick: the pending request
    /// (clamped) if any, otherwise the current stage.
    #[must_use]
    pub fn requested_stage(&self) -> usize {
        self.pending_stage
            .map_or(self.controller.current(), |s| self.controller.clamp(s))
    }

    /// Whether the final stage is current.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Part transition state.
    #[must_use]
    pub fn animator(&self) -> &PartAnimator {
        &self.animator
    }

    /// Shaft and reciprocator state.
    #[must_use]
    pub fn kinematics(&self) -> &KinematicSimulator {
        &self.kinematics
    }

    /// Camera state.
    #[must_use]
    pub fn camera(&self) -> &CameraChoreographer {
        &self.camera
    }

    /// Mutable camera access for user orbit and zoom.
    pub fn camera_mut(&mut self) -> &mut CameraChoreographer {
        &mut self.camera
    }

    /// Advisory progress last supplied by the host.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Simulation seconds since mount.
    #[must_use]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Ticks processed since mount.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Whether the scene still accepts ticks.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::kinematics::SHAFT_RATIO;

    const FRAME: f32 = 1.0 / 60.0;
    const EPS: f32 = 1e-4;

    fn scene(stage: usize) -> AssemblyScene {
        AssemblyScene::reference(stage, &Options::default())
    }

    fn run(scene: &mut AssemblyScene, seconds: f32) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            let _ = scene.tick(FRAME);
        }
    }

    fn live(scene: &AssemblyScene, id: PartId) -> Transform {
        *scene.animator().arena().get(id).unwrap()
    }

    fn assert_rest_pose(scene: &AssemblyScene, stage: usize) {
        for part in scene.parts().iter() {
            let expected = if part.install_stage <= stage {
                part.assembled
            } else {
                part.exploded
            };
            assert!(
                live(scene, part.id).approx_eq(&expected, EPS),
                "{} not at rest for stage {stage}",
                part.name
            );
        }
    }

    #[test]
    fn reference_scenario() {
        let mut s = scene(0);
        assert_rest_pose(&s, 0);
        let installed: Vec<_> = s
            .parts()
            .iter()
            .filter(|p| live(&s, p.id) == p.assembled)
            .map(|p| p.name)
            .collect();
        assert_eq!(installed, ["engine block"]);
        assert_eq!(s.camera().base_position(), s.stages().pose(0).position);

        let change = s.set_stage(7).unwrap();
        assert!(change.started_running);
        run(&mut s, 5.0);
        assert_rest_pose(&s, 7);
        assert!(s.is_running() && s.kinematics().is_running());
        assert_eq!(s.camera().base_position(), s.stages().pose(7).position);
        let before = s.kinematics().shafts();
        let _ = s.tick(FRAME);
        assert!(s.kinematics().shafts().primary_angle != before.primary_angle);

        let change = s.set_stage(3).unwrap();
        assert!(change.stopped_running);
        let frozen = s.kinematics().shafts();
        run(&mut s, 5.0);
        assert_rest_pose(&s, 3);
        assert!(!s.is_running());
        assert_eq!(s.kinematics().shafts(), frozen);
        assert_eq!(s.camera().base_position(), s.stages().pose(3).position);
    }

    #[test]
    fn every_stage_converges_to_its_rest_pose() {
        for stage in 0..8 {
            let mut s = scene(if stage < 4 { 7 } else { 0 });
            let _ = s.set_stage(stage as i64);
            run(&mut s, 5.0);
            assert_rest_pose(&s, stage);
        }
    }

    #[test]
    fn setting_the_same_stage_twice_changes_nothing() {
        for stage in 0..8 {
            let mut s = scene(0);
            let _ = s.set_stage(stage);
            run(&mut s, 0.4);
            let transitions: Vec<_> = s
                .parts()
                .iter()
                .map(|p| s.animator().transition(p.id).copied())
                .collect();
            let snapshot = s.animator().arena().snapshot();
            assert!(s.set_stage(stage).is_none());
            assert_eq!(s.animator().arena().snapshot(), snapshot);
            let after: Vec<_> = s
                .parts()
                .iter()
                .map(|p| s.animator().transition(p.id).copied())
                .collect();
            assert_eq!(transitions, after);
        }
    }

    #[test]
    fn rapid_toggling_never_teleports() {
        let options = Options::default();
        let fastest = options
            .animation
            .assemble_duration
            .min(options.animation.disassemble_duration);
        let mut s = scene(3);
        let limits: Vec<f32> = s
            .parts()
            .iter()
            .map(|p| 2.0 * p.assembled.distance(&p.exploded) / fastest * FRAME + EPS)
            .collect();
        let mut previous: Vec<_> = s.world_transforms().map(|(_, t)| t).collect();
        let mut eye = s.camera().eye();

        for frame in 0..240 {
            if frame % 20 == 0 {
                s.request_stage(if (frame / 20) % 2 == 0 { 4 } else { 3 });
            }
            let _ = s.tick(FRAME);
            for (id, t) in s.world_transforms() {
                let jump = t.distance(&previous[id.index()]);
                assert!(jump <= limits[id.index()], "part {} jumped {jump}", id.0);
                previous[id.index()] = t;
            }
            let next_eye = s.camera().eye();
            assert!(next_eye.distance(eye) < 0.5);
            eye = next_eye;
        }
    }

    #[test]
    fn shaft_ratio_holds_on_every_running_frame() {
        let mut s = scene(7);
        for _ in 0..600 {
            let _ = s.tick(FRAME);
            let shafts = s.kinematics().shafts();
            assert_eq!(shafts.secondary_angle, shafts.primary_angle * SHAFT_RATIO);
        }
    }

    #[test]
    fn stopping_hands_parts_back_without_a_jump() {
        let mut s = scene(6);
        let _ = s.set_stage(7);
        run(&mut s, 4.0);
        let drawn: Vec<_> = s.world_transforms().collect();
        s.request_stage(6);
        let outcome = s.tick(1e-4);
        assert!(outcome.stage_change.is_some_and(|c| c.stopped_running));
        for (id, before) in drawn {
            let after = s.part_transform(id).unwrap();
            assert!(after.distance(&before) < 0.01, "part {} jumped", id.0);
            assert!(after.rotation.angle_between(before.rotation) < 0.01);
        }
        run(&mut s, 3.0);
        assert_rest_pose(&s, 6);
    }

    #[test]
    fn requests_between_ticks_coalesce() {
        let mut s = scene(0);
        s.request_stage(2);
        s.request_stage(5);
        s.request_stage(4);
        let outcome = s.tick(FRAME);
        let change = outcome.stage_change.unwrap();
        assert_eq!((change.previous, change.current), (0, 4));
        assert!(s.tick(FRAME).stage_change.is_none());
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let mut s = scene(2);
        assert_eq!(s.set_stage(-3).map(|c| c.current), Some(0));
        assert_eq!(s.set_stage(100).map(|c| c.current), Some(7));
        assert!(s.is_running());
    }

    #[test]
    fn camera_leaves_the_previous_pose() {
        let mut s = scene(1);
        let old = s.stages().pose(1).position;
        let _ = s.set_stage(2);
        let mut prev = s.camera().base_position().distance(s.stages().pose(2).position);
        for _ in 0..120 {
            let _ = s.tick(FRAME);
            let d = s.camera().base_position().distance(s.stages().pose(2).position);
            assert!(d <= prev + EPS);
            prev = d;
        }
        assert!(s.camera().base_position().distance(old) > 1.0);
    }

    #[test]
    fn teardown_stops_all_mutation() {
        let mut s = scene(5);
        let _ = s.set_stage(7);
        run(&mut s, 0.5);
        assert!(s.teardown());
        assert!(!s.teardown());

        let snapshot = s.animator().arena().snapshot();
        let shafts = s.kinematics().shafts();
        let eye = s.camera().eye();
        let clock = s.clock();
        let frames = s.frame_count();

        s.request_stage(0);
        assert!(s.set_stage(1).is_none());
        for _ in 0..30 {
            assert_eq!(s.tick(FRAME), TickOutcome::default());
        }
        assert_eq!(s.animator().arena().snapshot(), snapshot);
        assert_eq!(s.animator().in_flight(), 0);
        assert_eq!(s.kinematics().shafts(), shafts);
        assert_eq!(s.camera().eye(), eye);
        assert_eq!(s.clock(), clock);
        assert_eq!(s.frame_count(), frames);
        assert_eq!(s.current_stage(), 7);
    }

    #[test]
    fn stalled_frames_are_clamped() {
        let mut s = scene(0);
        let _ = s.set_stage(1);
        let _ = s.tick(30.0);
        assert!((s.clock() - crate::util::frame_timing::MAX_FRAME_DT).abs() < 1e-6);
        assert!(s.animator().in_flight() > 0);
    }

    #[test]
    fn progress_is_clamped_and_advisory() {
        let mut s = scene(3);
        s.set_progress(Some(1.7));
        assert_eq!(s.progress(), Some(1.0));
        s.set_progress(Some(f32::NAN));
        assert_eq!(s.progress(), None);
        s.set_progress(Some(0.25));
        let snapshot = s.animator().arena().snapshot();
        let _ = s.tick(FRAME);
        assert_eq!(s.animator().arena().snapshot(), snapshot);
    }
}
