//! Easing functions for animation interpolation.
//!
//! Part transitions use an ease-in-ease-out curve so installation starts and
//! lands softly; camera moves use a monotone ease-out that never overshoots.

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-in-out (slow start, fast middle, slow end).
    CubicInOut,
}

impl EasingFunction {
    /// Default easing function for part transitions.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicInOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_cubic_in_out_endpoints_and_midpoint() {
        let f = EasingFunction::CubicInOut;
        assert_eq!(f.evaluate(0.0), 0.0);
        assert!((f.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_in_out_is_slow_at_both_ends() {
        let f = EasingFunction::CubicInOut;
        assert!(f.evaluate(0.1) < 0.1);
        assert!(f.evaluate(0.9) > 0.9);
    }

    #[test]
    fn test_curves_are_monotone() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::QuadraticOut,
            EasingFunction::CubicInOut,
        ] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.evaluate(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                assert!(v <= 1.0 + 1e-6);
                prev = v;
            }
        }
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);

        let in_out = EasingFunction::CubicInOut;
        assert_eq!(in_out.evaluate(-0.5), 0.0);
        assert!((in_out.evaluate(1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_quadratic_out() {
        let quad_out = EasingFunction::QuadraticOut;
        assert_eq!(quad_out.evaluate(0.0), 0.0);
        assert_eq!(quad_out.evaluate(0.5), 0.75);
        assert_eq!(quad_out.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_default_is_cubic_in_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicInOut);
    }
}
