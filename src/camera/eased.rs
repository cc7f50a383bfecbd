use crate::util::easing::EasingFunction;

/// State of a single eased scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisState {
    /// Resting at the current value.
    Idle,
    /// Travelling from `from` to `to`.
    Easing {
        /// Value when the ease began.
        from: f32,
        /// Destination value.
        to: f32,
        /// Seconds since the ease began.
        elapsed: f32,
        /// Total seconds the ease takes.
        duration: f32,
    },
}

/// One camera coordinate driven by an `Idle -> Easing -> Idle` state
/// machine.
///
/// Retargeting mid-ease restarts from the current value, so the output is
/// continuous no matter how often the destination changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedAxis {
    value: f32,
    state: AxisState,
    easing: EasingFunction,
}

impl EasedAxis {
    /// Idle axis resting at `value`.
    #[must_use]
    pub fn new(value: f32, easing: EasingFunction) -> Self {
        Self {
            value,
            state: AxisState::Idle,
            easing,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AxisState {
        self.state
    }

    /// Where the axis will come to rest.
    #[must_use]
    pub fn target(&self) -> f32 {
        match self.state {
            AxisState::Idle => self.value,
            AxisState::Easing { to, .. } => to,
        }
    }

    /// Whether an ease is in progress.
    #[must_use]
    pub fn is_easing(&self) -> bool {
        matches!(self.state, AxisState::Easing { .. })
    }

    /// Ease toward `to` over `duration` seconds from the current value.
    ///
    /// Re-issuing the current destination is a no-op. A non-positive
    /// duration snaps.
    pub fn ease_to(&mut self, to: f32, duration: f32) {
        if self.target() == to {
            return;
        }
        if duration <= 0.0 {
            self.set(to);
            return;
        }
        self.state = AxisState::Easing {
            from: self.value,
            to,
            elapsed: 0.0,
            duration,
        };
    }

    /// Jump to `value` and stop easing.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.state = AxisState::Idle;
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let AxisState::Easing {
            from,
            to,
            elapsed,
            duration,
        } = self.state
        else {
            return;
        };
        let elapsed = elapsed + dt.max(0.0);
        let t = elapsed / duration;
        if t >= 1.0 {
            self.set(to);
            return;
        }
        self.value = from + (to - from) * self.easing.evaluate(t);
        self.state = AxisState::Easing {
            from,
            to,
            elapsed,
            duration,
        };
    }

    /// Stop where the axis currently is.
    pub fn cancel(&mut self) {
        self.state = AxisState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> EasedAxis {
        EasedAxis::new(0.0, EasingFunction::QuadraticOut)
    }

    #[test]
    fn reaches_target_exactly_and_goes_idle() {
        let mut a = axis();
        a.ease_to(10.0, 1.5);
        for _ in 0..100 {
            a.update(1.0 / 60.0);
        }
        assert_eq!(a.value(), 10.0);
        assert_eq!(a.state(), AxisState::Idle);
    }

    #[test]
    fn approach_is_monotone() {
        let mut a = axis();
        a.ease_to(-4.0, 1.5);
        let mut prev = (a.value() - a.target()).abs();
        while a.is_easing() {
            a.update(0.013);
            let dist = (a.value() - a.target()).abs();
            assert!(dist <= prev);
            prev = dist;
        }
    }

    #[test]
    fn retarget_continues_from_current_value() {
        let mut a = axis();
        a.ease_to(10.0, 1.0);
        a.update(0.4);
        let mid = a.value();
        a.ease_to(0.0, 1.0);
        match a.state() {
            AxisState::Easing { from, .. } => assert_eq!(from, mid),
            AxisState::Idle => panic!("expected easing"),
        }
        assert_eq!(a.value(), mid);
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut a = axis();
        a.ease_to(5.0, 1.0);
        a.update(0.5);
        let before = a.state();
        a.ease_to(5.0, 1.0);
        assert_eq!(a.state(), before);
    }

    #[test]
    fn cancel_freezes_in_place() {
        let mut a = axis();
        a.ease_to(5.0, 1.0);
        a.update(0.3);
        let v = a.value();
        a.cancel();
        a.update(1.0);
        assert_eq!(a.value(), v);
    }
}
