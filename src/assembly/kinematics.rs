//! Running-state motion: two coupled shafts and phase-spaced reciprocators.
//!
//! Angles are accumulated from tick deltas; nothing here reads a clock.
//! Every moving part derives its offset from the same [`ShaftState`].

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::options::KinematicsOptions;
use crate::parts::{Bank, Motion, PartDescriptor, PartId, PartSet, Shaft, Transform};

/// Secondary shaft turns once per two primary revolutions.
pub const SHAFT_RATIO: f32 = 0.5;

/// Primary angles wrap here so the secondary wraps at a full turn.
const PRIMARY_PERIOD: f32 = TAU / SHAFT_RATIO;

/// Angles of the two coupled shafts, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaftState {
    /// Primary (crank) angle.
    pub primary_angle: f32,
    /// Secondary (cam) angle, always `primary_angle * SHAFT_RATIO`.
    pub secondary_angle: f32,
}

impl ShaftState {
    /// Advance the primary shaft by `delta` radians and re-derive the
    /// secondary.
    pub fn advance(&mut self, delta: f32) {
        self.primary_angle = (self.primary_angle + delta).rem_euclid(PRIMARY_PERIOD);
        self.secondary_angle = self.primary_angle * SHAFT_RATIO;
    }

    /// Angle of `shaft`.
    #[must_use]
    pub fn angle(&self, shaft: Shaft) -> f32 {
        match shaft {
            Shaft::Primary => self.primary_angle,
            Shaft::Secondary => self.secondary_angle,
        }
    }
}

/// Phase of `slot` when `slots` cylinders share one primary revolution.
#[must_use]
pub fn phase_offset(slot: u32, slots: u32) -> f32 {
    if slots == 0 {
        return 0.0;
    }
    (slot % slots) as f32 * TAU / slots as f32
}

/// Instantaneous displacement of a reciprocating part along its axis.
#[must_use]
pub fn displacement(
    primary_angle: f32,
    amplitude: f32,
    phase_offset: f32,
    bank: Bank,
) -> f32 {
    amplitude * (primary_angle + phase_offset + bank.phase_shift()).sin()
}

/// Motion layered on top of a part's live transform while running.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KinematicOffset {
    /// No motion.
    #[default]
    None,
    /// World-space rotation about the part origin.
    Rotation(Quat),
    /// World-space translation.
    Translation(Vec3),
}

impl KinematicOffset {
    /// `base` with this offset applied.
    #[must_use]
    pub fn apply(&self, base: &Transform) -> Transform {
        match *self {
            Self::None => *base,
            Self::Rotation(q) => base.with_rotation((q * base.rotation).normalize()),
            Self::Translation(v) => Transform {
                translation: base.translation + v,
                ..*base
            },
        }
    }

    /// Whether the offset moves anything.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Advances shaft angles and per-part offsets while the assembly runs.
#[derive(Debug, Clone)]
pub struct KinematicSimulator {
    shafts: ShaftState,
    /// Shaft angles when running last started; rotations are relative to it.
    engaged_at: ShaftState,
    /// 0..=1 ramp scaling reciprocating motion after a start.
    engagement: f32,
    running: bool,
    offsets: Vec<KinematicOffset>,
    options: KinematicsOptions,
}

impl KinematicSimulator {
    /// Stopped simulator with zeroed angles.
    #[must_use]
    pub fn new(parts: &PartSet, options: &KinematicsOptions) -> Self {
        Self {
            shafts: ShaftState::default(),
            engaged_at: ShaftState::default(),
            engagement: 0.0,
            running: false,
            offsets: vec![KinematicOffset::None; parts.len()],
            options: options.clone(),
        }
    }

    /// Replace speed options. Takes effect on the next step.
    pub fn set_options(&mut self, options: &KinematicsOptions) {
        self.options = options.clone();
    }

    /// Begin running from the current (possibly frozen) angles.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.engaged_at = self.shafts;
        self.engagement = if self.options.engage_duration > 0.0 {
            0.0
        } else {
            1.0
        };
        log::debug!(
            "kinematics started at primary {:.3} rad",
            self.shafts.primary_angle
        );
    }

    /// Stop running. Angles freeze where they are.
    ///
    /// Returns the last non-trivial offset of every moving part so the
    /// caller can fold them into the live transforms before easing back to
    /// rest.
    pub fn stop(&mut self) -> Vec<(PartId, KinematicOffset)> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        let last = self
            .offsets
            .iter_mut()
            .enumerate()
            .filter(|(_, offset)| !offset.is_none())
            .map(|(index, offset)| {
                (PartId(index as u16), std::mem::take(offset))
            })
            .collect();
        log::debug!(
            "kinematics stopped at primary {:.3} rad",
            self.shafts.primary_angle
        );
        last
    }

    /// Advance by `dt` seconds and recompute offsets. No-op while stopped.
    pub fn step(&mut self, parts: &PartSet, dt: f32) {
        if !self.running {
            return;
        }
        self.shafts.advance(self.options.primary_speed * dt);
        if self.engagement < 1.0 {
            let ramp = self.options.engage_duration.max(f32::EPSILON);
            self.engagement = (self.engagement + dt / ramp).min(1.0);
        }
        for part in parts.iter() {
            let offset = self.offset_for(parts, part);
            if let Some(slot) = self.offsets.get_mut(part.id.index()) {
                *slot = offset;
            }
        }
    }

    fn offset_for(&self, parts: &PartSet, part: &PartDescriptor) -> KinematicOffset {
        match part.motion {
            Motion::Static => KinematicOffset::None,
            Motion::Rotating { shaft, axis } => {
                let turned = self.shafts.angle(shaft) - self.engaged_at.angle(shaft);
                KinematicOffset::Rotation(Quat::from_axis_angle(axis, turned))
            }
            Motion::Reciprocating {
                axis,
                amplitude,
                slot,
                bank,
            } => {
                let phase = phase_offset(slot, parts.bank_slots(bank));
                let travel = displacement(
                    self.shafts.primary_angle,
                    amplitude,
                    phase,
                    bank,
                );
                KinematicOffset::Translation(axis * travel * self.engagement)
            }
        }
    }

    /// Current shaft angles.
    #[must_use]
    pub fn shafts(&self) -> ShaftState {
        self.shafts
    }

    /// Whether the simulator is advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current offset for `id`.
    #[must_use]
    pub fn offset(&self, id: PartId) -> KinematicOffset {
        self.offsets.get(id.index()).copied().unwrap_or_default()
    }
}
