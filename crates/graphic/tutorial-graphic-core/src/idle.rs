//! Idle animation engine: ambient motion once the appear transition lands.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::interp::{clamp01, ease_toward, lerp_f32};
use crate::node::ColorLayers;
use crate::settings::IdleSettings;
use crate::tolerances::{FADE_IDLE_AMPLITUDE, FADE_IDLE_BASE, FADE_IDLE_RAMP_SECONDS};

/// Offset from the idle-entry position: `dir * range * (sin(t*speed)+1)/2`.
#[inline]
pub fn levitation_offset(idle: &IdleSettings, t: f32) -> Vec3 {
    idle.levitation_direction * idle.levitation_range * ((t * idle.levitation_speed).sin() + 1.0)
        * 0.5
}

/// Pulse target: baseline scale plus `sin(t*speed)*delta` on every axis.
#[inline]
pub fn pulse_target(baseline: Vec3, idle: &IdleSettings, t: f32) -> Vec3 {
    baseline + Vec3::splat((t * idle.pulse_speed).sin() * idle.pulse_delta)
}

/// One pulse step: ease the current scale toward this tick's target.
#[inline]
pub fn pulse_step(current: Vec3, baseline: Vec3, idle: &IdleSettings, t: f32, dt: f32) -> Vec3 {
    ease_toward(current, pulse_target(baseline, idle, t), dt * idle.pulse_speed)
}

/// Alpha multiplier for the breathing fade.
///
/// Starts at exactly 1 on idle entry and blends into
/// `BASE + sin(2*pi*t/fade_duration) * AMPLITUDE` over the ramp window.
pub fn breathing_multiplier(t: f32, fade_duration: f32) -> f32 {
    let steady = if fade_duration > 0.0 {
        FADE_IDLE_BASE + (TAU * t / fade_duration).sin() * FADE_IDLE_AMPLITUDE
    } else {
        1.0
    };
    let ramp = clamp01(t / FADE_IDLE_RAMP_SECONDS);
    lerp_f32(1.0, steady, ramp)
}

/// Visible for `blink_interval`, hidden for `blink_duration` (or `blink_interval` when unset).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BlinkTimer {
    elapsed: f32,
    hidden: bool,
}

impl BlinkTimer {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Advance and return the new visibility when it toggles.
    pub fn advance(&mut self, dt: f32, idle: &IdleSettings) -> Option<bool> {
        if idle.blink_interval <= 0.0 || dt <= 0.0 {
            return None;
        }
        let span = if self.hidden && idle.blink_duration > 0.0 {
            idle.blink_duration
        } else {
            idle.blink_interval
        };
        self.elapsed += dt;
        if self.elapsed >= span {
            self.elapsed -= span;
            // Never carry more than one phase of backlog after a long frame.
            if self.elapsed >= span {
                self.elapsed = 0.0;
            }
            self.hidden = !self.hidden;
            Some(!self.hidden)
        } else {
            None
        }
    }

    /// Cancel a blink in progress; layers must be shown by the caller.
    pub fn force_shown(&mut self) {
        self.hidden = false;
    }
}

/// Apply the breathing fade to every color slot relative to its captured alpha.
pub fn apply_breathing<N: ColorLayers>(node: &mut N, captured: &[glam::Vec4], multiplier: f32) {
    for (i, c) in captured.iter().enumerate() {
        node.set_slot_alpha(i, *c, c.w * multiplier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::IdleAnimation;

    fn idle() -> IdleSettings {
        IdleSettings {
            animation: IdleAnimation::Blink,
            blink_interval: 0.5,
            blink_duration: 0.2,
            ..IdleSettings::default()
        }
    }

    #[test]
    fn levitation_stays_within_range() {
        let s = IdleSettings {
            levitation_range: 2.0,
            levitation_speed: 3.0,
            levitation_direction: Vec3::Y,
            ..IdleSettings::default()
        };
        for i in 0..200 {
            let off = levitation_offset(&s, i as f32 * 0.05);
            assert!(off.y >= -1e-6 && off.y <= 2.0 + 1e-6);
            assert_eq!(off.x, 0.0);
        }
        assert!((levitation_offset(&s, 0.0).y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn breathing_starts_at_one_and_stays_in_band() {
        assert_eq!(breathing_multiplier(0.0, 1.0), 1.0);
        for i in 0..400 {
            let m = breathing_multiplier(i as f32 * 0.01, 1.0);
            let lo = FADE_IDLE_BASE - FADE_IDLE_AMPLITUDE - 1e-5;
            assert!(m >= lo && m <= 1.0 + 1e-5, "m={m}");
        }
    }

    #[test]
    fn blink_alternates_interval_and_duration() {
        let s = idle();
        let mut b = BlinkTimer::default();
        assert_eq!(b.advance(0.4, &s), None);
        assert_eq!(b.advance(0.1, &s), Some(false));
        assert!(b.is_hidden());
        assert_eq!(b.advance(0.1, &s), None);
        assert_eq!(b.advance(0.1, &s), Some(true));
    }

    #[test]
    fn pulse_step_is_bounded_by_target_band() {
        let s = IdleSettings {
            pulse_delta: 0.1,
            pulse_speed: 4.0,
            ..IdleSettings::default()
        };
        let base = Vec3::ONE;
        let mut cur = base;
        let mut t = 0.0;
        for _ in 0..600 {
            t += 1.0 / 60.0;
            cur = pulse_step(cur, base, &s, t, 1.0 / 60.0);
            assert!((cur - base).abs().max_element() <= 0.1 + 1e-5);
        }
    }
}
