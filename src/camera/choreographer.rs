//! Stage camera choreography.
//!
//! The stage pose is eased per axis. Auto-rotation and the user's bounded
//! orbit/zoom are layered on top as spherical offsets around the origin,
//! which is always the look-at point.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use super::eased::EasedAxis;
use crate::options::CameraOptions;
use crate::util::easing::EasingFunction;

/// Radians of orbit per pixel of drag at an orbit speed of 1.0.
const ORBIT_RADIANS_PER_PIXEL: f32 = 0.01;
/// Keeps the eye off the poles so `look_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
/// Bounds on the accumulated zoom factor.
const ZOOM_RANGE: (f32, f32) = (0.2, 5.0);

/// Authored camera placement for one stage. Always looks at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,
}

impl CameraPose {
    /// Pose with the eye at `(x, y, z)`.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(6.0, 4.0, 8.0)
    }
}

/// Owns the single live camera pose.
#[derive(Debug, Clone)]
pub struct CameraChoreographer {
    /// Eased stage pose, one axis per world coordinate.
    axes: [EasedAxis; 3],
    target: CameraPose,
    /// Accumulated turntable yaw, radians.
    auto_yaw: f32,
    user_yaw: EasedAxis,
    user_pitch: EasedAxis,
    user_zoom: EasedAxis,
    auto_rotate: bool,
    dragging: bool,
    options: CameraOptions,
}

impl CameraChoreographer {
    /// Camera resting exactly on `pose`. This is the only snap.
    #[must_use]
    pub fn new(pose: CameraPose, options: &CameraOptions) -> Self {
        let axis = |v| EasedAxis::new(v, EasingFunction::QuadraticOut);
        Self {
            axes: [
                axis(pose.position.x),
                axis(pose.position.y),
                axis(pose.position.z),
            ],
            target: pose,
            auto_yaw: 0.0,
            user_yaw: axis(0.0),
            user_pitch: axis(0.0),
            user_zoom: axis(1.0),
            auto_rotate: options.auto_rotate,
            dragging: false,
            options: options.clone(),
        }
    }

    /// Replace options. Auto-rotate follows the option only when it changed.
    pub fn set_options(&mut self, options: &CameraOptions) {
        if options.auto_rotate != self.options.auto_rotate {
            self.auto_rotate = options.auto_rotate;
        }
        self.options = options.clone();
    }

    /// Ease toward a new stage pose from wherever the camera is.
    pub fn set_target(&mut self, pose: CameraPose) {
        self.target = pose;
        let duration = self.options.transition_duration;
        for (axis, to) in self.axes.iter_mut().zip(pose.position.to_array()) {
            axis.ease_to(to, duration);
        }
    }

    /// Advance easing and auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for axis in &mut self.axes {
            axis.update(dt);
        }
        self.user_yaw.update(dt);
        self.user_pitch.update(dt);
        self.user_zoom.update(dt);
        if self.auto_rotate && !self.dragging {
            let step = self.options.auto_rotate_speed.to_radians() * dt;
            self.auto_yaw = (self.auto_yaw + step).rem_euclid(TAU);
        }
    }

    /// Apply a drag of `delta` pixels to the bounded user orbit.
    pub fn orbit(&mut self, delta: Vec2) {
        let scale = self.options.orbit_speed * ORBIT_RADIANS_PER_PIXEL;
        let max_yaw = self.options.max_orbit_yaw.to_radians();
        let max_pitch = self.options.max_orbit_pitch.to_radians();
        let yaw = (self.user_yaw.value() - delta.x * scale).clamp(-max_yaw, max_yaw);
        let pitch =
            (self.user_pitch.value() + delta.y * scale).clamp(-max_pitch, max_pitch);
        self.user_yaw.set(yaw);
        self.user_pitch.set(pitch);
    }

    /// Zoom in (positive) or out (negative).
    pub fn zoom(&mut self, delta: f32) {
        let factor = self.user_zoom.value() * (1.0 - delta * self.options.zoom_speed);
        self.user_zoom.set(factor.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1));
    }

    /// Mark whether the user is dragging. Auto-rotation pauses while true.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Flip turntable rotation on or off.
    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
    }

    /// Whether turntable rotation is on.
    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Ease the user orbit and zoom back to neutral.
    pub fn reset_view(&mut self) {
        let duration = self.options.transition_duration;
        self.user_yaw.ease_to(0.0, duration);
        self.user_pitch.ease_to(0.0, duration);
        self.user_zoom.ease_to(1.0, duration);
    }

    /// Halt every ease where it is.
    pub fn cancel(&mut self) {
        for axis in &mut self.axes {
            axis.cancel();
        }
        self.user_yaw.cancel();
        self.user_pitch.cancel();
        self.user_zoom.cancel();
    }

    /// Whether the stage pose is still easing.
    #[must_use]
    pub fn is_easing(&self) -> bool {
        self.axes.iter().any(EasedAxis::is_easing)
    }

    /// The eased stage pose, before auto-rotation and user offsets.
    #[must_use]
    pub fn base_position(&self) -> Vec3 {
        Vec3::new(
            self.axes[0].value(),
            self.axes[1].value(),
            self.axes[2].value(),
        )
    }

    /// The authored pose the camera is heading for.
    #[must_use]
    pub fn target(&self) -> CameraPose {
        self.target
    }

    /// Final eye position with every offset composed and distance clamped.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let base = self.base_position();
        let radius = base.length();
        if radius <= f32::EPSILON {
            return Vec3::Z * self.options.min_distance;
        }
        let yaw = base.x.atan2(base.z) + self.auto_yaw + self.user_yaw.value();
        let pitch = ((base.y / radius).clamp(-1.0, 1.0).asin()
            + self.user_pitch.value())
        .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let distance = (radius * self.user_zoom.value()).clamp(
            self.options.min_distance,
            self.options.max_distance.max(self.options.min_distance),
        );
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * distance
    }

    /// Perspective camera for the current eye at the given aspect ratio.
    #[must_use]
    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: self.options.fovy,
            znear: self.options.znear,
            zfar: self.options.zfar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_options() -> CameraOptions {
        CameraOptions {
            auto_rotate: false,
            ..CameraOptions::default()
        }
    }

    #[test]
    fn first_mount_snaps_to_the_pose() {
        let pose = CameraPose::new(5.5, 3.5, 6.5);
        let c = CameraChoreographer::new(pose, &still_options());
        assert_eq!(c.base_position(), pose.position);
        assert!((c.eye() - pose.position).length() < 1e-4);
        assert!(!c.is_easing());
    }

    #[test]
    fn eye_approaches_the_new_pose_monotonically() {
        let from = CameraPose::new(5.5, 3.5, 6.5);
        let to = CameraPose::new(-6.0, 4.0, 5.0);
        let mut c = CameraChoreographer::new(from, &still_options());
        c.set_target(to);
        let mut prev = (c.eye() - to.position).length();
        for _ in 0..200 {
            c.update(1.0 / 60.0);
            let dist = (c.eye() - to.position).length();
            assert!(dist <= prev + 1e-4, "{dist} > {prev}");
            prev = dist;
        }
        assert!(prev < 1e-4);
        assert!((c.eye() - from.position).length() > 1.0);
    }

    #[test]
    fn retargeting_never_jumps() {
        let mut c =
            CameraChoreographer::new(CameraPose::new(5.0, 3.0, 6.0), &still_options());
        c.set_target(CameraPose::new(-5.0, 6.0, 2.0));
        c.update(0.3);
        let before = c.eye();
        c.set_target(CameraPose::new(5.0, 3.0, 6.0));
        assert_eq!(c.eye(), before);
    }

    #[test]
    fn auto_rotation_moves_the_eye_but_not_the_base() {
        let pose = CameraPose::new(0.0, 2.0, 8.0);
        let mut c = CameraChoreographer::new(pose, &CameraOptions::default());
        let start = c.eye();
        c.update(10.0);
        assert_eq!(c.base_position(), pose.position);
        assert!((c.eye() - start).length() > 0.05);
        let expected_yaw = 8.0_f32.to_radians();
        let yaw = c.eye().x.atan2(c.eye().z);
        assert!((yaw - expected_yaw).abs() < 1e-3);
    }

    #[test]
    fn dragging_pauses_auto_rotation() {
        let mut c = CameraChoreographer::new(
            CameraPose::new(0.0, 2.0, 8.0),
            &CameraOptions::default(),
        );
        c.set_dragging(true);
        let before = c.eye();
        c.update(5.0);
        assert_eq!(c.eye(), before);
    }

    #[test]
    fn orbit_is_bounded() {
        let opts = still_options();
        let pose = CameraPose::new(0.0, 0.0, 8.0);
        let mut c = CameraChoreographer::new(pose, &opts);
        c.orbit(Vec2::new(-1.0e6, 0.0));
        let yaw = c.eye().x.atan2(c.eye().z);
        assert!((yaw - opts.max_orbit_yaw.to_radians()).abs() < 1e-4);
        c.orbit(Vec2::new(0.0, 1.0e6));
        let pitch = (c.eye().y / c.eye().length()).asin();
        assert!((pitch - opts.max_orbit_pitch.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let opts = still_options();
        let mut c = CameraChoreographer::new(CameraPose::new(0.0, 0.0, 8.0), &opts);
        for _ in 0..100 {
            c.zoom(5.0);
        }
        assert!((c.eye().length() - opts.min_distance).abs() < 1e-4);
        for _ in 0..100 {
            c.zoom(-5.0);
        }
        assert!((c.eye().length() - opts.max_distance).abs() < 1e-4);
    }

    #[test]
    fn reset_view_eases_user_offsets_away() {
        let pose = CameraPose::new(0.0, 0.0, 8.0);
        let mut c = CameraChoreographer::new(pose, &still_options());
        c.orbit(Vec2::new(40.0, 20.0));
        c.zoom(2.0);
        let offset = c.eye();
        c.reset_view();
        assert_eq!(c.eye(), offset);
        c.update(5.0);
        assert!((c.eye() - pose.position).length() < 1e-4);
    }

    #[test]
    fn cancel_stops_mid_transition() {
        let mut c =
            CameraChoreographer::new(CameraPose::new(5.0, 3.0, 6.0), &still_options());
        c.set_target(CameraPose::new(-5.0, 6.0, 2.0));
        c.update(0.2);
        c.cancel();
        let frozen = c.base_position();
        c.update(2.0);
        assert_eq!(c.base_position(), frozen);
        assert!(!c.is_easing());
    }
}
