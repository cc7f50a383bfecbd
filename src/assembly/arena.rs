use crate::parts::{PartId, PartSet, Transform};

/// Live transform of every part, indexed by [`PartId`].
///
/// Owned by the [`PartAnimator`](super::PartAnimator); everything else reads
/// it. The renderer walks it once per frame.
#[derive(Debug, Clone)]
pub struct PartArena {
    live: Vec<Transform>,
}

impl PartArena {
    /// Arena with every part resting at its target for `stage`.
    #[must_use]
    pub fn at_stage(parts: &PartSet, stage: usize) -> Self {
        Self {
            live: parts.iter().map(|p| p.target_at(stage)).collect(),
        }
    }

    /// Live transform of `id`.
    #[must_use]
    pub fn get(&self, id: PartId) -> Option<&Transform> {
        self.live.get(id.index())
    }

    pub(crate) fn set(&mut self, id: PartId, transform: Transform) {
        if let Some(slot) = self.live.get_mut(id.index()) {
            *slot = transform;
        }
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Iterate `(id, live transform)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PartId, &Transform)> {
        self.live
            .iter()
            .enumerate()
            .map(|(i, t)| (PartId(i as u16), t))
    }

    /// Copy of all live transforms.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Transform> {
        self.live.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_stage_targets() {
        let parts = PartSet::reference_engine();
        let arena = PartArena::at_stage(&parts, 0);
        assert_eq!(arena.len(), parts.len());
        for part in parts.iter() {
            assert_eq!(arena.get(part.id), Some(&part.target_at(0)));
        }
    }

    #[test]
    fn set_ignores_unknown_ids() {
        let parts = PartSet::reference_engine();
        let mut arena = PartArena::at_stage(&parts, 0);
        let before = arena.snapshot();
        arena.set(PartId(u16::MAX), Transform::IDENTITY);
        assert_eq!(arena.snapshot(), before);
    }
}
