//! The reference scenario: a 90° V8 assembled over eight stages.
//!
//! The crankshaft runs along world Z below the origin. Each bank's bore axis
//! is tilted 45° from vertical; cylinders sit at four stations along Z.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Quat, Vec3};

use super::{
    Bank, Material, Motion, PartDescriptor, PartId, Primitive, Shaft, Shape,
    Transform,
};
use crate::assembly::stage::StageTable;
use crate::camera::CameraPose;

/// Number of stages in the reference scenario.
pub const STAGE_COUNT: usize = 8;

/// Crankshaft centre line passes through this point.
const CRANK_CENTER: Vec3 = Vec3::new(0.0, -0.6, 0.0);
/// Cylinder stations along the crank axis.
const STATIONS: [f32; 4] = [-1.35, -0.45, 0.45, 1.35];
/// Half of the piston stroke.
const STROKE_AMPLITUDE: f32 = 0.22;
const BANKS: [Bank; 2] = [Bank::Left, Bank::Right];

/// Stage names and authored camera poses for the reference scenario.
#[must_use]
pub fn reference_stages() -> StageTable {
    StageTable::new(vec![
        ("Engine block", CameraPose::new(5.5, 3.5, 6.5)),
        ("Crankshaft", CameraPose::new(4.0, -1.5, 6.0)),
        ("Pistons and rods", CameraPose::new(6.5, 4.5, 3.0)),
        ("Cylinder heads", CameraPose::new(-6.0, 4.0, 5.0)),
        ("Camshafts", CameraPose::new(5.0, 6.5, 4.0)),
        ("Timing drive", CameraPose::new(2.5, 2.5, 8.0)),
        ("Intake and exhaust", CameraPose::new(-4.5, 7.0, 4.5)),
        ("Running", CameraPose::new(7.0, 4.5, 7.5)),
    ])
}

/// All parts of the reference engine, in id order.
#[must_use]
pub fn reference_parts() -> Vec<PartDescriptor> {
    let mut builder = Builder::default();

    builder.push(engine_block());
    builder.push(crankshaft());
    for bank in BANKS {
        for (slot, z) in STATIONS.iter().enumerate() {
            builder.push(piston(bank, slot as u32, *z));
        }
    }
    for bank in BANKS {
        for (slot, z) in STATIONS.iter().enumerate() {
            builder.push(connecting_rod(bank, slot as u32, *z));
        }
    }
    for bank in BANKS {
        builder.push(cylinder_head(bank));
    }
    for bank in BANKS {
        builder.push(camshaft(bank));
    }
    builder.push(crank_gear());
    for bank in BANKS {
        builder.push(cam_gear(bank));
    }
    builder.push(flywheel());
    builder.push(intake_manifold());
    for bank in BANKS {
        builder.push(exhaust_header(bank));
    }
    for bank in BANKS {
        builder.push(valve_cover(bank));
    }
    builder.push(oil_pan());

    builder.parts
}

/// Assigns sequential ids as parts are pushed.
#[derive(Default)]
struct Builder {
    parts: Vec<PartDescriptor>,
}

impl Builder {
    fn push(&mut self, mut part: PartDescriptor) {
        part.id = PartId(self.parts.len() as u16);
        self.parts.push(part);
    }
}

fn bank_axis(bank: Bank) -> Vec3 {
    bank_rotation(bank) * Vec3::Y
}

fn bank_rotation(bank: Bank) -> Quat {
    match bank {
        Bank::Left => Quat::from_rotation_z(FRAC_PI_4),
        Bank::Right => Quat::from_rotation_z(-FRAC_PI_4),
    }
}

/// Unit vector perpendicular to the bore axis, pointing away from the V.
fn bank_outward(bank: Bank) -> Vec3 {
    bank_rotation(bank) * match bank {
        Bank::Left => Vec3::NEG_X,
        Bank::Right => Vec3::X,
    }
}

fn bank_delay(bank: Bank) -> f32 {
    bank.index() as f32 * 0.15
}

fn boxed(size: Vec3, offset: Vec3, material: Material) -> Primitive {
    Primitive::new(
        Shape::Box { size },
        Transform::from_translation(offset),
        material,
    )
}

fn upright_cylinder(
    radius: f32,
    height: f32,
    offset: Vec3,
    material: Material,
) -> Primitive {
    Primitive::new(
        Shape::Cylinder {
            radius,
            height,
            segments: 24,
        },
        Transform::from_translation(offset),
        material,
    )
}

/// Cylinder whose axis runs along Z (parallel to the crank).
fn axial_cylinder(
    radius: f32,
    height: f32,
    offset: Vec3,
    material: Material,
) -> Primitive {
    Primitive::new(
        Shape::Cylinder {
            radius,
            height,
            segments: 32,
        },
        Transform::from_translation(offset)
            .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        material,
    )
}

fn placed(translation: Vec3, rotation: Quat) -> Transform {
    Transform::from_translation(translation).with_rotation(rotation)
}

fn engine_block() -> PartDescriptor {
    let mut primitives = vec![boxed(
        Vec3::new(2.0, 1.0, 3.8),
        CRANK_CENTER,
        Material::ALUMINIUM,
    )];
    for bank in BANKS {
        let mut deck = boxed(
            Vec3::new(1.1, 1.5, 3.8),
            CRANK_CENTER + bank_axis(bank) * 1.05,
            Material::ALUMINIUM,
        );
        deck.offset.rotation = bank_rotation(bank);
        primitives.push(deck);
    }
    PartDescriptor {
        id: PartId(0),
        name: "engine block",
        primitives,
        install_stage: 0,
        assembled: Transform::IDENTITY,
        exploded: Transform::from_translation(Vec3::new(0.0, -3.0, 0.0)),
        transition_delay: 0.0,
        motion: Motion::Static,
    }
}

fn crankshaft() -> PartDescriptor {
    let mut primitives =
        vec![axial_cylinder(0.12, 4.2, Vec3::ZERO, Material::STEEL)];
    for z in STATIONS {
        primitives.push(boxed(
            Vec3::new(0.5, 0.35, 0.12),
            Vec3::new(0.0, -0.2, z),
            Material::CAST_IRON,
        ));
        primitives.push(axial_cylinder(
            0.08,
            0.3,
            Vec3::new(0.0, 0.2, z),
            Material::STEEL,
        ));
    }
    PartDescriptor {
        id: PartId(0),
        name: "crankshaft",
        primitives,
        install_stage: 1,
        assembled: Transform::from_translation(CRANK_CENTER),
        exploded: Transform::from_translation_euler(
            Vec3::new(0.0, -3.0, 3.5),
            Vec3::new(0.0, 0.6, 0.0),
        ),
        transition_delay: 0.0,
        motion: Motion::Rotating {
            shaft: Shaft::Primary,
            axis: Vec3::Z,
        },
    }
}

fn piston(bank: Bank, slot: u32, z: f32) -> PartDescriptor {
    let axis = bank_axis(bank);
    let rotation = bank_rotation(bank);
    PartDescriptor {
        id: PartId(0),
        name: "piston",
        primitives: vec![
            upright_cylinder(0.32, 0.4, Vec3::ZERO, Material::ALUMINIUM),
            upright_cylinder(
                0.325,
                0.05,
                Vec3::new(0.0, 0.12, 0.0),
                Material::CAST_IRON,
            ),
        ],
        install_stage: 2,
        assembled: placed(CRANK_CENTER + axis * 1.15 + Vec3::Z * z, rotation),
        exploded: placed(
            CRANK_CENTER + axis * 3.6 + Vec3::Z * (z * 1.4),
            rotation,
        ),
        transition_delay: slot as f32 * 0.1 + bank.index() as f32 * 0.05,
        motion: Motion::Reciprocating {
            axis,
            amplitude: STROKE_AMPLITUDE,
            slot,
            bank,
        },
    }
}

fn connecting_rod(bank: Bank, slot: u32, z: f32) -> PartDescriptor {
    let axis = bank_axis(bank);
    let rotation = bank_rotation(bank);
    PartDescriptor {
        id: PartId(0),
        name: "connecting rod",
        primitives: vec![
            boxed(Vec3::new(0.12, 0.9, 0.1), Vec3::ZERO, Material::STEEL),
            axial_cylinder(
                0.12,
                0.14,
                Vec3::new(0.0, -0.45, 0.0),
                Material::STEEL,
            ),
        ],
        install_stage: 2,
        assembled: placed(CRANK_CENTER + axis * 0.65 + Vec3::Z * z, rotation),
        exploded: placed(
            CRANK_CENTER + axis * 2.6 + Vec3::Z * (z * 1.4),
            rotation,
        ),
        transition_delay: 0.2
            + slot as f32 * 0.1
            + bank.index() as f32 * 0.05,
        motion: Motion::Reciprocating {
            axis,
            amplitude: STROKE_AMPLITUDE,
            slot,
            bank,
        },
    }
}

fn cylinder_head(bank: Bank) -> PartDescriptor {
    let axis = bank_axis(bank);
    let mut primitives = vec![boxed(
        Vec3::new(1.1, 0.45, 4.0),
        Vec3::ZERO,
        Material::ALUMINIUM,
    )];
    for z in STATIONS {
        primitives.push(upright_cylinder(
            0.05,
            0.2,
            Vec3::new(0.3, 0.3, z),
            Material::STEEL,
        ));
    }
    PartDescriptor {
        id: PartId(0),
        name: "cylinder head",
        primitives,
        install_stage: 3,
        assembled: placed(CRANK_CENTER + axis * 1.85, bank_rotation(bank)),
        exploded: placed(CRANK_CENTER + axis * 4.2, bank_rotation(bank)),
        transition_delay: bank_delay(bank),
        motion: Motion::Static,
    }
}

fn camshaft(bank: Bank) -> PartDescriptor {
    let axis = bank_axis(bank);
    let mut primitives =
        vec![axial_cylinder(0.07, 4.0, Vec3::ZERO, Material::STEEL)];
    for z in STATIONS {
        primitives.push(boxed(
            Vec3::new(0.18, 0.1, 0.08),
            Vec3::new(0.0, 0.08, z),
            Material::STEEL,
        ));
    }
    let rest = CRANK_CENTER + axis * 2.2;
    PartDescriptor {
        id: PartId(0),
        name: "camshaft",
        primitives,
        install_stage: 4,
        assembled: Transform::from_translation(rest),
        exploded: Transform::from_translation(rest + Vec3::Z * 4.5),
        transition_delay: bank_delay(bank),
        motion: Motion::Rotating {
            shaft: Shaft::Secondary,
            axis: Vec3::Z,
        },
    }
}

fn crank_gear() -> PartDescriptor {
    let rest = CRANK_CENTER + Vec3::Z * 2.05;
    PartDescriptor {
        id: PartId(0),
        name: "crank timing gear",
        primitives: vec![axial_cylinder(0.28, 0.1, Vec3::ZERO, Material::BRASS)],
        install_stage: 5,
        assembled: Transform::from_translation(rest),
        exploded: Transform::from_translation(rest + Vec3::Z * 4.5),
        transition_delay: 0.0,
        motion: Motion::Rotating {
            shaft: Shaft::Primary,
            axis: Vec3::Z,
        },
    }
}

fn cam_gear(bank: Bank) -> PartDescriptor {
    let rest = CRANK_CENTER + bank_axis(bank) * 2.2 + Vec3::Z * 2.05;
    PartDescriptor {
        id: PartId(0),
        name: "cam timing gear",
        // Twice the crank gear's radius: the gear train is the 2:1 ratio.
        primitives: vec![axial_cylinder(0.56, 0.1, Vec3::ZERO, Material::BRASS)],
        install_stage: 5,
        assembled: Transform::from_translation(rest),
        exploded: Transform::from_translation(
            rest + Vec3::Z * 4.5 + bank_axis(bank) * 0.5,
        ),
        transition_delay: 0.15 + bank.index() as f32 * 0.1,
        motion: Motion::Rotating {
            shaft: Shaft::Secondary,
            axis: Vec3::Z,
        },
    }
}

fn flywheel() -> PartDescriptor {
    let rest = CRANK_CENTER - Vec3::Z * 2.05;
    PartDescriptor {
        id: PartId(0),
        name: "flywheel",
        primitives: vec![
            axial_cylinder(0.95, 0.12, Vec3::ZERO, Material::CAST_IRON),
            axial_cylinder(1.0, 0.06, Vec3::ZERO, Material::STEEL),
        ],
        install_stage: 5,
        assembled: Transform::from_translation(rest),
        exploded: Transform::from_translation(rest - Vec3::Z * 3.0),
        transition_delay: 0.35,
        motion: Motion::Rotating {
            shaft: Shaft::Primary,
            axis: Vec3::Z,
        },
    }
}

fn intake_manifold() -> PartDescriptor {
    PartDescriptor {
        id: PartId(0),
        name: "intake manifold",
        primitives: vec![
            boxed(Vec3::new(1.0, 0.4, 3.6), Vec3::ZERO, Material::ALUMINIUM),
            axial_cylinder(
                0.3,
                3.0,
                Vec3::new(0.0, 0.35, 0.0),
                Material::ALUMINIUM,
            ),
        ],
        install_stage: 6,
        assembled: Transform::from_translation(Vec3::new(0.0, 0.9, 0.0)),
        exploded: Transform::from_translation(Vec3::new(0.0, 4.0, 0.0)),
        transition_delay: 0.0,
        motion: Motion::Static,
    }
}

fn exhaust_header(bank: Bank) -> PartDescriptor {
    let rest = CRANK_CENTER + bank_axis(bank) * 1.6 + bank_outward(bank) * 0.9;
    let mut primitives =
        vec![axial_cylinder(0.14, 3.6, Vec3::ZERO, Material::HOT_EXHAUST)];
    for z in STATIONS {
        let mut runner = upright_cylinder(
            0.08,
            0.35,
            Vec3::new(0.0, 0.0, z),
            Material::HOT_EXHAUST,
        );
        runner.offset.rotation = bank_rotation(bank) * Quat::from_rotation_z(
            match bank {
                Bank::Left => -FRAC_PI_2,
                Bank::Right => FRAC_PI_2,
            },
        );
        primitives.push(runner);
    }
    PartDescriptor {
        id: PartId(0),
        name: "exhaust header",
        primitives,
        install_stage: 6,
        assembled: Transform::from_translation(rest),
        exploded: Transform::from_translation(rest + bank_outward(bank) * 2.5),
        transition_delay: 0.2 + bank.index() as f32 * 0.1,
        motion: Motion::Static,
    }
}

fn valve_cover(bank: Bank) -> PartDescriptor {
    let axis = bank_axis(bank);
    PartDescriptor {
        id: PartId(0),
        name: "valve cover",
        primitives: vec![
            boxed(Vec3::new(0.95, 0.22, 3.8), Vec3::ZERO, Material::PAINTED_RED),
            boxed(
                Vec3::new(0.3, 0.06, 3.0),
                Vec3::new(0.0, 0.13, 0.0),
                Material::STEEL,
            ),
        ],
        install_stage: 7,
        assembled: placed(CRANK_CENTER + axis * 2.5, bank_rotation(bank)),
        exploded: placed(CRANK_CENTER + axis * 4.8, bank_rotation(bank)),
        transition_delay: bank_delay(bank),
        motion: Motion::Static,
    }
}

fn oil_pan() -> PartDescriptor {
    PartDescriptor {
        id: PartId(0),
        name: "oil pan",
        primitives: vec![boxed(
            Vec3::new(1.8, 0.5, 3.6),
            Vec3::ZERO,
            Material::CAST_IRON,
        )],
        install_stage: 7,
        assembled: Transform::from_translation(Vec3::new(0.0, -1.35, 0.0)),
        exploded: Transform::from_translation(Vec3::new(0.0, -3.8, 0.0)),
        transition_delay: 0.3,
        motion: Motion::Static,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        for (i, part) in reference_parts().iter().enumerate() {
            assert_eq!(part.id.index(), i);
        }
    }

    #[test]
    fn only_the_block_installs_at_stage_zero() {
        let at_zero: Vec<_> = reference_parts()
            .into_iter()
            .filter(|p| p.install_stage == 0)
            .collect();
        assert_eq!(at_zero.len(), 1);
        assert_eq!(at_zero[0].name, "engine block");
    }

    #[test]
    fn every_stage_installs_something() {
        let parts = reference_parts();
        for stage in 0..STAGE_COUNT {
            assert!(
                parts.iter().any(|p| p.install_stage == stage),
                "stage {stage} installs nothing"
            );
        }
    }

    #[test]
    fn stage_table_covers_every_stage() {
        let stages = reference_stages();
        assert_eq!(stages.len(), STAGE_COUNT);
        for stage in 1..STAGE_COUNT {
            assert_ne!(stages.pose(stage), stages.pose(stage - 1));
        }
    }

    #[test]
    fn bank_axes_form_a_ninety_degree_vee() {
        let left = bank_axis(Bank::Left);
        let right = bank_axis(Bank::Right);
        assert!(left.dot(right).abs() < 1e-6);
        assert!(left.y > 0.0 && right.y > 0.0);
        assert!(left.x < 0.0 && right.x > 0.0);
    }

    #[test]
    fn outward_vectors_point_away_from_the_vee() {
        assert!(bank_outward(Bank::Left).x < 0.0);
        assert!(bank_outward(Bank::Right).x > 0.0);
        assert!(bank_outward(Bank::Left).dot(bank_axis(Bank::Left)).abs() < 1e-6);
    }
}
