//! Per-marker lifecycle bookkeeping shared by both controllers.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::dwell::DwellInterlock;
use crate::idle::BlinkTimer;

/// `Uninitialized → Appearing → Idle → Disappearing → Destroyed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerPhase {
    #[default]
    Uninitialized,
    Appearing,
    Idle,
    Disappearing,
    Destroyed,
}

/// Mutable visual state owned by exactly one controller.
#[derive(Clone, Debug, Default)]
pub struct MarkerVisualState {
    pub phase: MarkerPhase,
    /// Set once the appear transition has reached its target.
    pub ready: bool,
    /// Seconds spent in `Idle` since the last appear completed.
    pub idle_time: f32,
    pub blink: BlinkTimer,
    pub dwell: DwellInterlock,
    pub initial_scale: Vec3,
    /// Captured layer colors followed by the text color, if any.
    pub initial_colors: Vec<Vec4>,
}

impl MarkerVisualState {
    pub(crate) fn begin_appear(&mut self) {
        self.phase = MarkerPhase::Appearing;
        self.ready = false;
        self.idle_time = 0.0;
        self.blink.reset();
    }

    pub(crate) fn enter_idle(&mut self) {
        self.phase = MarkerPhase::Idle;
        self.ready = true;
        self.idle_time = 0.0;
        self.blink.reset();
    }

    pub(crate) fn begin_disappear(&mut self) {
        self.phase = MarkerPhase::Disappearing;
        self.ready = false;
    }
}

/// Sanitize a host delta: NaN, infinite and negative frames advance nothing.
#[inline]
pub(crate) fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
