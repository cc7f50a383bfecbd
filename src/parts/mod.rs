//! Static part descriptors.
//!
//! A [`PartSet`] is built once at startup and never mutated. Parts are
//! addressed by [`PartId`], which doubles as the index into every per-part
//! array held by the animator, the kinematic simulator, and the renderer.

pub mod catalog;
mod descriptor;
mod transform;

pub use descriptor::{
    Bank, Material, Motion, PartDescriptor, PartId, Primitive, Shaft, Shape,
};
pub use transform::Transform;

use crate::error::VizError;

/// Validated, ordered collection of part descriptors.
#[derive(Debug, Clone)]
pub struct PartSet {
    parts: Vec<PartDescriptor>,
    stage_count: usize,
    /// Number of distinct reciprocating slots per bank.
    bank_slots: [u32; 2],
}

impl PartSet {
    /// Validate and wrap a list of parts.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidPartSet`] if the stage count is zero, a
    /// part's id does not match its position, a part has no primitives, or
    /// an install stage is outside `[0, stage_count)`.
    pub fn new(
        parts: Vec<PartDescriptor>,
        stage_count: usize,
    ) -> Result<Self, VizError> {
        if stage_count == 0 {
            return Err(VizError::InvalidPartSet(
                "stage count must be at least 1".into(),
            ));
        }
        if parts.len() > usize::from(u16::MAX) {
            return Err(VizError::InvalidPartSet(format!(
                "{} parts exceeds the id space",
                parts.len()
            )));
        }
        for (index, part) in parts.iter().enumerate() {
            if part.id.index() != index {
                return Err(VizError::InvalidPartSet(format!(
                    "part '{}' has id {} at position {index}",
                    part.name, part.id.0
                )));
            }
            if part.primitives.is_empty() {
                return Err(VizError::InvalidPartSet(format!(
                    "part '{}' has no primitives",
                    part.name
                )));
            }
            if part.install_stage >= stage_count {
                return Err(VizError::InvalidPartSet(format!(
                    "part '{}' installs at stage {} but only {stage_count} \
                     stages exist",
                    part.name, part.install_stage
                )));
            }
        }
        Ok(Self::from_parts_unchecked(parts, stage_count))
    }

    /// The reference V8 engine with eight stages.
    #[must_use]
    pub fn reference_engine() -> Self {
        Self::from_parts_unchecked(
            catalog::reference_parts(),
            catalog::STAGE_COUNT,
        )
    }

    fn from_parts_unchecked(
        parts: Vec<PartDescriptor>,
        stage_count: usize,
    ) -> Self {
        let mut bank_slots = [0u32; 2];
        for part in &parts {
            if let Motion::Reciprocating { slot, bank, .. } = part.motion {
                let count = &mut bank_slots[bank.index()];
                *count = (*count).max(slot + 1);
            }
        }
        Self {
            parts,
            stage_count,
            bank_slots,
        }
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the set holds no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of stages the set is authored for.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Look up a part by id.
    #[must_use]
    pub fn get(&self, id: PartId) -> Option<&PartDescriptor> {
        self.parts.get(id.index())
    }

    /// Iterate parts in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PartDescriptor> {
        self.parts.iter()
    }

    /// Number of evenly spaced phase slots on `bank`.
    #[must_use]
    pub fn bank_slots(&self, bank: Bank) -> u32 {
        self.bank_slots[bank.index()]
    }

    /// Total primitive count across all parts.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.parts.iter().map(|p| p.primitives.len()).sum()
    }
}
