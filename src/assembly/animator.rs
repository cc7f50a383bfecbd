//! Per-part eased transitions between exploded and assembled placements.
//!
//! Each part owns at most one [`PartTransition`]. A transition is a pure
//! function of simulation time, so sampling it twice at the same instant
//! gives the same transform and retargeting mid-flight starts from exactly
//! what was last drawn.

use super::arena::PartArena;
use super::stage::StageController;
use crate::options::AnimationOptions;
use crate::parts::{PartDescriptor, PartId, PartSet, Transform};
use crate::util::easing::EasingFunction;

/// Tolerance for deciding two targets are the same placement.
const TARGET_EPSILON: f32 = 1e-5;

/// Which way a part is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Moving to the assembled placement. Slower, honours the part delay.
    Assemble,
    /// Moving away from the assembled placement. Faster, no delay.
    Disassemble,
}

/// One in-flight eased move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartTransition {
    /// Live transform when the transition began.
    pub start: Transform,
    /// Where the part will rest.
    pub target: Transform,
    /// Simulation time the transition was issued, in seconds.
    pub start_time: f32,
    /// Seconds from the end of the delay to arrival.
    pub duration: f32,
    /// Seconds to hold at `start` before moving.
    pub delay: f32,
    /// Curve applied to normalized progress.
    pub easing: EasingFunction,
}

impl PartTransition {
    /// Normalized progress in `[0, 1]` at simulation time `now`.
    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        let local = now - self.start_time - self.delay;
        if self.duration <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.duration).clamp(0.0, 1.0)
    }

    /// Transform at simulation time `now`.
    #[must_use]
    pub fn sample(&self, now: f32) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        self.start.lerp(&self.target, self.easing.evaluate(t))
    }

    /// Whether the part has arrived by `now`.
    #[must_use]
    pub fn is_complete(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    /// Simulation time at which the part arrives.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.start_time + self.delay + self.duration.max(0.0)
    }
}

/// Drives every part's live transform toward its stage target.
pub struct PartAnimator {
    arena: PartArena,
    transitions: Vec<Option<PartTransition>>,
    /// Last target issued per part; retargeting to the same value is a no-op.
    issued: Vec<Transform>,
    options: AnimationOptions,
    easing: EasingFunction,
}

impl PartAnimator {
    /// Animator with every part at rest on its target for `stage`.
    #[must_use]
    pub fn new(parts: &PartSet, stage: usize, options: &AnimationOptions) -> Self {
        let arena = PartArena::at_stage(parts, stage);
        let issued = arena.snapshot();
        Self {
            transitions: vec![None; arena.len()],
            arena,
            issued,
            options: options.clone(),
            easing: EasingFunction::CubicInOut,
        }
    }

    /// Replace timing options. In-flight transitions keep their timing.
    pub fn set_options(&mut self, options: &AnimationOptions) {
        self.options = options.clone();
    }

    /// Live transforms.
    #[must_use]
    pub fn arena(&self) -> &PartArena {
        &self.arena
    }

    /// Current transition for `id`, if one is in flight.
    #[must_use]
    pub fn transition(&self, id: PartId) -> Option<&PartTransition> {
        self.transitions.get(id.index()).and_then(Option::as_ref)
    }

    /// Last target issued for `id`.
    #[must_use]
    pub fn issued_target(&self, id: PartId) -> Option<&Transform> {
        self.issued.get(id.index())
    }

    /// Number of transitions in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.transitions.iter().filter(|t| t.is_some()).count()
    }

    /// Issue transitions for every part whose target changed with the
    /// controller's current stage. Returns how many parts were retargeted.
    pub fn apply_stage(
        &mut self,
        parts: &PartSet,
        controller: &StageController,
        now: f32,
    ) -> usize {
        let mut retargeted = 0;
        for target in controller.targets(parts) {
            let Some(part) = parts.get(target.part) else {
                continue;
            };
            let direction = if target.installed {
                TransitionDirection::Assemble
            } else {
                TransitionDirection::Disassemble
            };
            if self.retarget(part, target.transform, direction, now) {
                retargeted += 1;
            }
        }
        retargeted
    }

    /// Start moving `part` toward `target` from wherever it is now.
    ///
    /// Returns `false` without touching anything if `target` is the last
    /// issued target. Any in-flight transition for the part is replaced.
    pub fn retarget(
        &mut self,
        part: &PartDescriptor,
        target: Transform,
        direction: TransitionDirection,
        now: f32,
    ) -> bool {
        let Some(issued) = self.issued.get_mut(part.id.index()) else {
            return false;
        };
        if issued.approx_eq(&target, TARGET_EPSILON) {
            return false;
        }
        *issued = target;

        let (duration, delay) = match direction {
            TransitionDirection::Assemble => (
                self.options.assemble_duration,
                part.transition_delay * self.options.delay_scale,
            ),
            TransitionDirection::Disassemble => {
                (self.options.disassemble_duration, 0.0)
            }
        };
        self.begin(part.id, target, duration, delay.max(0.0), now);
        log::trace!(
            "{} #{} -> {direction:?} over {duration:.2}s (+{delay:.2}s)",
            part.name,
            part.id.0
        );
        true
    }

    /// Ease `id` back to its issued target from its current live transform.
    ///
    /// Used after something outside the animator displaced the part.
    pub fn settle(&mut self, id: PartId, now: f32) {
        let Some(target) = self.issued.get(id.index()).copied() else {
            return;
        };
        let duration = self.options.disassemble_duration;
        self.begin(id, target, duration, 0.0, now);
    }

    /// Overwrite the live transform of `id` without starting a transition.
    pub(crate) fn place(&mut self, id: PartId, transform: Transform) {
        self.arena.set(id, transform);
    }

    fn begin(
        &mut self,
        id: PartId,
        target: Transform,
        duration: f32,
        delay: f32,
        now: f32,
    ) {
        let Some(start) = self.arena.get(id).copied() else {
            return;
        };
        if let Some(slot) = self.transitions.get_mut(id.index()) {
            *slot = Some(PartTransition {
                start,
                target,
                start_time: now,
                duration,
                delay,
                easing: self.easing,
            });
        }
    }

    /// Sample every in-flight transition at `now`, retiring finished ones.
    ///
    /// Returns `true` while any transition is still in flight.
    pub fn update(&mut self, now: f32) -> bool {
        let mut active = false;
        for (index, slot) in self.transitions.iter_mut().enumerate() {
            let Some(transition) = slot else {
                continue;
            };
            let id = PartId(index as u16);
            self.arena.set(id, transition.sample(now));
            if transition.is_complete(now) {
                *slot = None;
            } else {
                active = true;
            }
        }
        active
    }

    /// Drop every in-flight transition, leaving parts where they are.
    pub fn cancel_all(&mut self) {
        for slot in &mut self.transitions {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn setup(stage: usize) -> (PartSet, StageController, PartAnimator) {
        let parts = PartSet::reference_engine();
        let controller = StageController::new(&parts, stage);
        let animator =
            PartAnimator::new(&parts, stage, &AnimationOptions::default());
        (parts, controller, animator)
    }

    fn transition(duration: f32, delay: f32) -> PartTransition {
        PartTransition {
            start: Transform::from_translation(Vec3::ZERO),
            target: Transform::from_translation(Vec3::X * 10.0),
            start_time: 1.0,
            duration,
            delay,
            easing: EasingFunction::CubicInOut,
        }
    }

    #[test]
    fn transition_holds_during_delay() {
        let t = transition(2.0, 0.5);
        assert_eq!(t.sample(1.0), t.start);
        assert_eq!(t.sample(1.4), t.start);
        assert!(t.sample(2.0).translation.x > 0.0);
        assert_eq!(t.sample(3.5), t.target);
        assert!((t.end_time() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_completes_after_delay() {
        let t = transition(0.0, 0.25);
        assert!(!t.is_complete(1.1));
        assert!(t.is_complete(1.25));
    }

    #[test]
    fn forward_stage_retargets_only_newly_installed_parts() {
        let (parts, mut controller, mut animator) = setup(1);
        let _ = controller.set_stage(&parts, 2);
        let count = animator.apply_stage(&parts, &controller, 0.0);
        let expected = parts.iter().filter(|p| p.install_stage == 2).count();
        assert_eq!(count, expected);
        assert_eq!(animator.in_flight(), expected);
    }

    #[test]
    fn reapplying_the_same_stage_is_a_no_op() {
        let (parts, mut controller, mut animator) = setup(0);
        let _ = controller.set_stage(&parts, 4);
        let _ = animator.apply_stage(&parts, &controller, 0.0);
        let before: Vec<_> = parts
            .iter()
            .map(|p| animator.transition(p.id).copied())
            .collect();
        assert_eq!(animator.apply_stage(&parts, &controller, 0.3), 0);
        let after: Vec<_> = parts
            .iter()
            .map(|p| animator.transition(p.id).copied())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn retarget_starts_from_the_live_transform() {
        let (parts, mut controller, mut animator) = setup(0);
        let _ = controller.set_stage(&parts, 1);
        let _ = animator.apply_stage(&parts, &controller, 0.0);
        let crank = PartId(1);
        let _ = animator.update(1.0);
        let mid = *animator.arena().get(crank).unwrap();

        let _ = controller.set_stage(&parts, 0);
        let _ = animator.apply_stage(&parts, &controller, 1.0);
        let reverse = animator.transition(crank).unwrap();
        assert_eq!(reverse.start, mid);
        assert_eq!(reverse.delay, 0.0);
        assert_eq!(
            reverse.duration,
            AnimationOptions::default().disassemble_duration
        );
    }

    #[test]
    fn update_lands_exactly_on_target_and_retires() {
        let (parts, mut controller, mut animator) = setup(0);
        let _ = controller.set_stage(&parts, 7);
        let _ = animator.apply_stage(&parts, &controller, 0.0);
        assert!(animator.update(0.5));
        assert!(!animator.update(60.0));
        assert_eq!(animator.in_flight(), 0);
        for part in parts.iter() {
            assert_eq!(animator.arena().get(part.id), Some(&part.assembled));
        }
    }

    #[test]
    fn settle_returns_a_displaced_part_to_its_target() {
        let (parts, _, mut animator) = setup(7);
        let piston = PartId(2);
        let rest = parts.get(piston).unwrap().assembled;
        let mut displaced = rest;
        displaced.translation += Vec3::Y * 0.2;
        animator.place(piston, displaced);
        animator.settle(piston, 0.0);
        assert_eq!(animator.transition(piston).unwrap().start, displaced);
        let _ = animator.update(10.0);
        assert_eq!(animator.arena().get(piston), Some(&rest));
    }

    #[test]
    fn cancel_all_freezes_parts_in_place() {
        let (parts, mut controller, mut animator) = setup(0);
        let _ = controller.set_stage(&parts, 3);
        let _ = animator.apply_stage(&parts, &controller, 0.0);
        let _ = animator.update(0.8);
        let frozen = animator.arena().snapshot();
        animator.cancel_all();
        assert!(!animator.update(5.0));
        assert_eq!(animator.arena().snapshot(), frozen);
    }
}
