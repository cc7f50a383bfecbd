//! Stage bookkeeping: which parts are installed and where they should rest.

use crate::camera::CameraPose;
use crate::parts::{PartId, PartSet, Transform};

/// Per-stage authored data: a display name and the camera pose that frames
/// the parts installed at that stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTable {
    entries: Vec<(&'static str, CameraPose)>,
}

impl StageTable {
    /// Table from `(name, pose)` pairs in stage order.
    #[must_use]
    pub fn new(entries: Vec<(&'static str, CameraPose)>) -> Self {
        Self { entries }
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Camera pose for `stage`, falling back to the last authored pose.
    #[must_use]
    pub fn pose(&self, stage: usize) -> CameraPose {
        self.entries
            .get(stage)
            .or_else(|| self.entries.last())
            .map_or_else(CameraPose::default, |(_, pose)| *pose)
    }

    /// Display name for `stage`.
    #[must_use]
    pub fn name(&self, stage: usize) -> &'static str {
        self.entries.get(stage).map_or("", |(name, _)| *name)
    }
}

/// Target placement for one part at the current stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTarget {
    /// Part the target applies to.
    pub part: PartId,
    /// Whether the part is installed at the current stage.
    pub installed: bool,
    /// Assembled transform if installed, exploded otherwise.
    pub transform: Transform,
}

/// Description of an applied stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    /// Stage before the change.
    pub previous: usize,
    /// Stage after the change (already clamped).
    pub current: usize,
    /// The change entered the final stage.
    pub started_running: bool,
    /// The change left the final stage.
    pub stopped_running: bool,
}

impl StageChange {
    /// Whether the change moves toward full assembly.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.current > self.previous
    }
}

/// Tracks the current stage and per-part install flags.
///
/// Does not interpolate anything; it only says where parts belong.
#[derive(Debug, Clone)]
pub struct StageController {
    current: usize,
    stage_count: usize,
    installed: Vec<bool>,
}

impl StageController {
    /// Controller positioned at `initial` (clamped).
    #[must_use]
    pub fn new(parts: &PartSet, initial: usize) -> Self {
        let stage_count = parts.stage_count().max(1);
        let current = initial.min(stage_count - 1);
        Self {
            current,
            stage_count,
            installed: parts.iter().map(|p| p.is_installed_at(current)).collect(),
        }
    }

    /// Clamp a requested stage into `[0, stage_count - 1]`.
    #[must_use]
    pub fn clamp(&self, requested: i64) -> usize {
        let last = self.final_stage();
        usize::try_from(requested).map_or(0, |stage| stage.min(last))
    }

    /// Move to `requested` (clamped). Returns `None` when the clamped stage
    /// is already current.
    pub fn set_stage(
        &mut self,
        parts: &PartSet,
        requested: i64,
    ) -> Option<StageChange> {
        let stage = self.clamp(requested);
        if i64::try_from(stage).ok() != Some(requested) {
            log::trace!("stage request {requested} clamped to {stage}");
        }
        if stage == self.current {
            return None;
        }

        let was_running = self.is_running();
        let previous = self.current;
        self.current = stage;
        for (flag, part) in self.installed.iter_mut().zip(parts.iter()) {
            *flag = part.is_installed_at(stage);
        }
        let running = self.is_running();

        Some(StageChange {
            previous,
            current: stage,
            started_running: running && !was_running,
            stopped_running: was_running && !running,
        })
    }

    /// Current stage.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Index of the terminal stage.
    #[must_use]
    pub fn final_stage(&self) -> usize {
        self.stage_count - 1
    }

    /// `true` exactly when the terminal stage is current.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current == self.final_stage()
    }

    /// Whether `id` is installed at the current stage.
    #[must_use]
    pub fn is_installed(&self, id: PartId) -> bool {
        self.installed.get(id.index()).copied().unwrap_or(false)
    }

    /// Animation targets for every part at the current stage.
    pub fn targets<'a>(
        &'a self,
        parts: &'a PartSet,
    ) -> impl Iterator<Item = AnimationTarget> + 'a {
        parts.iter().map(move |part| {
            let installed = self.is_installed(part.id);
            AnimationTarget {
                part: part.id,
                installed,
                transform: if installed {
                    part.assembled
                } else {
                    part.exploded
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(stage: usize) -> (PartSet, StageController) {
        let parts = PartSet::reference_engine();
        let controller = StageController::new(&parts, stage);
        (parts, controller)
    }

    #[test]
    fn out_of_range_requests_are_clamped() {
        let (parts, mut c) = controller(3);
        let change = c.set_stage(&parts, 42).unwrap();
        assert_eq!(change.current, 7);
        let change = c.set_stage(&parts, -5).unwrap();
        assert_eq!(change.current, 0);
    }

    #[test]
    fn same_stage_is_a_no_op() {
        let (parts, mut c) = controller(2);
        assert!(c.set_stage(&parts, 2).is_none());
        assert!(c.set_stage(&parts, 4).is_some());
        assert!(c.set_stage(&parts, 4).is_none());
    }

    #[test]
    fn running_flags_follow_the_final_stage() {
        let (parts, mut c) = controller(6);
        assert!(!c.is_running());
        let change = c.set_stage(&parts, 7).unwrap();
        assert!(change.started_running && !change.stopped_running);
        assert!(c.is_running());
        let change = c.set_stage(&parts, 3).unwrap();
        assert!(change.stopped_running && !change.started_running);
        assert!(!change.is_forward());
    }

    #[test]
    fn install_flags_match_descriptor_stages() {
        let (parts, mut c) = controller(0);
        let _ = c.set_stage(&parts, 3);
        for part in parts.iter() {
            assert_eq!(c.is_installed(part.id), part.install_stage <= 3);
        }
    }

    #[test]
    fn targets_pick_the_right_endpoint() {
        let (parts, c) = controller(2);
        for target in c.targets(&parts) {
            let part = parts.get(target.part).unwrap();
            let expected = if part.install_stage <= 2 {
                part.assembled
            } else {
                part.exploded
            };
            assert_eq!(target.transform, expected);
            assert_eq!(target.installed, part.install_stage <= 2);
        }
    }

    #[test]
    fn initial_stage_is_clamped() {
        let (_, c) = controller(99);
        assert_eq!(c.current(), 7);
        assert!(c.is_running());
    }
}
