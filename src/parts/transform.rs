use glam::{Mat4, Quat, Vec3};

/// Rigid placement of a part (or a primitive within a part).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space (or parent-space) translation.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Translation plus an XYZ Euler rotation in radians.
    #[must_use]
    pub fn from_translation_euler(translation: Vec3, euler: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(
                glam::EulerRot::XYZ,
                euler.x,
                euler.y,
                euler.z,
            ),
            scale: Vec3::ONE,
        }
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Interpolate toward `other`: translation and scale linearly, rotation
    /// along the shortest arc.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t).normalize(),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// Compose `self` (parent) with `child`, yielding the child's placement
    /// in the parent's space.
    #[must_use]
    pub fn mul_transform(&self, child: &Self) -> Self {
        Self {
            translation: self.translation
                + self.rotation * (self.scale * child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// 4x4 matrix for GPU upload.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }

    /// Whether two transforms describe the same placement within `eps`.
    ///
    /// `q` and `-q` are treated as the same rotation.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, eps)
            && self.scale.abs_diff_eq(other.scale, eps)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - eps
    }

    /// Distance between the two translations.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        self.translation.distance(other.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn lerp_endpoints() {
        let a = Transform::from_translation(Vec3::ZERO);
        let b = Transform::from_translation_euler(
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, FRAC_PI_2, 0.0),
        );
        assert!(a.lerp(&b, 0.0).approx_eq(&a, 1e-6));
        assert!(a.lerp(&b, 1.0).approx_eq(&b, 1e-5));
        let mid = a.lerp(&b, 0.5);
        assert!((mid.translation.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn approx_eq_ignores_quaternion_sign() {
        let a = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(0.3));
        let b = Transform::IDENTITY.with_rotation(-a.rotation);
        assert!(a.approx_eq(&b, 1e-6));
    }

    #[test]
    fn mul_transform_applies_parent_rotation() {
        let parent = Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let child = Transform::from_translation(Vec3::X);
        let world = parent.mul_transform(&child);
        assert!(world
            .translation
            .abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn matrix_matches_transform() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = t.to_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }
}
