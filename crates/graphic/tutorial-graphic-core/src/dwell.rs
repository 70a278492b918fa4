//! Dwell-time interlock: holds a step until its marker has idled long enough.

use crate::step::TutorialStep;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DwellInterlock {
    required: f32,
    accumulated: f32,
    armed: bool,
    cleared: bool,
}

impl DwellInterlock {
    /// Arm against `step`; takes a time hold when it declares a positive
    /// minimum time. Any hold this interlock still has must be released first.
    pub fn arm(&mut self, step: &TutorialStep) {
        *self = Self::default();
        if step.min_time_amount > 0.0 {
            self.required = step.min_time_amount;
            self.armed = true;
            step.hold_time();
        }
    }

    /// Give up an outstanding hold without clearing (marker re-targeted).
    pub fn release(&mut self, step: &TutorialStep) {
        if self.armed && !self.cleared {
            step.release_time();
        }
        *self = Self::default();
    }

    pub fn is_cleared(&self) -> bool {
        !self.armed || self.cleared
    }

    /// Accumulate idle time; returns true on the one tick this hold releases.
    pub fn advance(&mut self, dt: f32, step: &TutorialStep) -> bool {
        if !self.armed || self.cleared || dt <= 0.0 {
            return false;
        }
        self.accumulated += dt;
        if self.accumulated >= self.required {
            self.cleared = true;
            step.release_time();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::InteractionType;

    #[test]
    fn zero_min_time_never_blocks() {
        let step = TutorialStep::new("s", InteractionType::Tap);
        let mut d = DwellInterlock::default();
        d.arm(&step);
        assert!(!step.blocked_by_time());
        assert!(d.is_cleared());
        assert!(!d.advance(5.0, &step));
    }

    #[test]
    fn clears_exactly_once() {
        let step = TutorialStep::new("s", InteractionType::Tap).with_min_time(1.0);
        let mut d = DwellInterlock::default();
        d.arm(&step);
        assert!(step.blocked_by_time());
        assert!(!d.advance(0.6, &step));
        assert!(d.advance(0.6, &step));
        assert!(!step.blocked_by_time());
        // Someone else holds the step; the interlock must not release it again.
        step.hold_time();
        assert!(!d.advance(1.0, &step));
        assert!(step.blocked_by_time());
    }

    #[test]
    fn shared_step_stays_blocked_until_every_interlock_clears() {
        let step = TutorialStep::new("s", InteractionType::Tap).with_min_time(1.0);
        let mut fast = DwellInterlock::default();
        let mut slow = DwellInterlock::default();
        fast.arm(&step);
        slow.arm(&step);
        assert!(fast.advance(1.0, &step));
        assert!(step.blocked_by_time());
        assert!(slow.advance(1.0, &step));
        assert!(!step.blocked_by_time());
    }

    #[test]
    fn release_drops_only_an_outstanding_hold() {
        let step = TutorialStep::new("s", InteractionType::Tap).with_min_time(0.5);
        let mut d = DwellInterlock::default();
        d.arm(&step);
        d.release(&step);
        assert!(!step.blocked_by_time());
        d.arm(&step);
        assert!(d.advance(0.5, &step));
        d.release(&step);
        assert_eq!(step.time_holds(), 0);
    }
}
