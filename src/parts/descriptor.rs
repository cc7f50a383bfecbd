use std::f32::consts::PI;

use glam::Vec3;

use super::transform::Transform;

/// Stable arena index of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u16);

impl PartId {
    /// Index into per-part arrays.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Geometric primitive shape. Cylinders are aligned with their local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centered on the origin.
    Box {
        /// Full extents along X, Y, Z.
        size: Vec3,
    },
    /// Capped cylinder centered on the origin.
    Cylinder {
        /// Radius.
        radius: f32,
        /// Full height along local Y.
        height: f32,
        /// Radial segment count.
        segments: u32,
    },
    /// UV sphere centered on the origin.
    Sphere {
        /// Radius.
        radius: f32,
        /// Latitude bands.
        rings: u32,
        /// Longitude segments.
        segments: u32,
    },
}

/// Surface material for a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGB base color.
    pub color: [f32; 3],
    /// 0.0 = dielectric, 1.0 = metal.
    pub metalness: f32,
    /// 0.05 = mirror-like, 1.0 = matte.
    pub roughness: f32,
    /// Optional self-illumination added after shading.
    pub emissive: Option<[f32; 3]>,
}

impl Material {
    /// Machined steel.
    pub const STEEL: Self = Self::metal([0.62, 0.64, 0.67], 0.3);
    /// Cast aluminium for blocks and heads.
    pub const ALUMINIUM: Self = Self::metal([0.78, 0.79, 0.8], 0.45);
    /// Dark cast iron.
    pub const CAST_IRON: Self = Self::metal([0.28, 0.29, 0.31], 0.6);
    /// Polished brass for timing gears.
    pub const BRASS: Self = Self::metal([0.8, 0.62, 0.3], 0.25);
    /// Painted valve-cover red.
    pub const PAINTED_RED: Self = Self {
        color: [0.65, 0.06, 0.05],
        metalness: 0.1,
        roughness: 0.35,
        emissive: None,
    };
    /// Heat-glow exhaust finish.
    pub const HOT_EXHAUST: Self = Self {
        color: [0.35, 0.3, 0.28],
        metalness: 0.8,
        roughness: 0.5,
        emissive: Some([0.08, 0.025, 0.0]),
    };

    /// A metal with the given color and roughness.
    #[must_use]
    pub const fn metal(color: [f32; 3], roughness: f32) -> Self {
        Self {
            color,
            metalness: 1.0,
            roughness,
            emissive: None,
        }
    }
}

/// One renderable piece of a part, placed relative to the part origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    /// Shape parameters.
    pub shape: Shape,
    /// Placement relative to the part origin.
    pub offset: Transform,
    /// Surface material.
    pub material: Material,
}

impl Primitive {
    /// Primitive at `offset` with the given shape and material.
    #[must_use]
    pub const fn new(shape: Shape, offset: Transform, material: Material) -> Self {
        Self {
            shape,
            offset,
            material,
        }
    }
}

/// Which of the two coupled shafts a rotating part follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shaft {
    /// Crankshaft.
    Primary,
    /// Camshaft, turning at half the primary rate.
    Secondary,
}

/// Side of the V arrangement a reciprocating part belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    /// Left bank, no phase shift.
    Left,
    /// Right bank, 180° out of phase with the left.
    Right,
}

impl Bank {
    /// Phase shift added to every part on this bank.
    #[must_use]
    pub fn phase_shift(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Right => PI,
        }
    }

    /// Array index for per-bank tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// How a part moves once the assembly is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Never moves while running.
    Static,
    /// Spins about a world-space axis through the part origin.
    Rotating {
        /// Shaft whose angle drives the spin.
        shaft: Shaft,
        /// World-space rotation axis (unit length).
        axis: Vec3,
    },
    /// Slides back and forth along a world-space axis.
    Reciprocating {
        /// World-space stroke axis (unit length).
        axis: Vec3,
        /// Peak displacement from rest.
        amplitude: f32,
        /// Position of this cylinder within its bank, for phase spacing.
        slot: u32,
        /// Bank the part belongs to.
        bank: Bank,
    },
}

/// Immutable description of one rigid part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartDescriptor {
    /// Stable id; equals the part's index in its [`PartSet`](super::PartSet).
    pub id: PartId,
    /// Human-readable name, used in logs.
    pub name: &'static str,
    /// Geometry, in draw order.
    pub primitives: Vec<Primitive>,
    /// First stage at which the part counts as installed.
    pub install_stage: usize,
    /// Placement once installed.
    pub assembled: Transform,
    /// Placement before installation.
    pub exploded: Transform,
    /// Seconds to wait after a stage change before this part starts moving.
    pub transition_delay: f32,
    /// Behaviour once the assembly is running.
    pub motion: Motion,
}

impl PartDescriptor {
    /// Whether the part is installed at `stage`.
    #[inline]
    #[must_use]
    pub fn is_installed_at(&self, stage: usize) -> bool {
        stage >= self.install_stage
    }

    /// The transform this part should rest at for `stage`.
    #[must_use]
    pub fn target_at(&self, stage: usize) -> Transform {
        if self.is_installed_at(stage) {
            self.assembled
        } else {
            self.exploded
        }
    }
}
