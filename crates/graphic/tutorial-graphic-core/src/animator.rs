//! Interpolated-property animator shared by the screen and world controllers.
//!
//! A transition is a [`TransitionClock`] plus any number of tracks. Tracks
//! read and write node properties through plain fn accessors, so one
//! implementation drives scale, anchored position and per-layer alpha for
//! both node kinds.

use crate::interp::{clamp01, Interpolate};
use crate::node::ColorLayers;
use crate::tolerances::FORCED_COMPLETION_FACTOR;
use glam::Vec4;

/// Elapsed-time bookkeeping for one appear or disappear transition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitionClock {
    pub elapsed: f32,
    pub duration: f32,
    /// True while disappearing.
    pub reversing: bool,
}

impl TransitionClock {
    /// A NaN, infinite or non-positive duration completes on the first tick.
    pub fn new(duration: f32, reversing: bool) -> Self {
        Self {
            elapsed: 0.0,
            duration: if duration.is_finite() && duration > 0.0 {
                duration
            } else {
                0.0
            },
            reversing,
        }
    }

    /// Negative or NaN deltas are ignored so progress never decreases.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// `clamp01(elapsed / duration)`; a non-positive duration is complete.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            clamp01(self.elapsed / self.duration)
        } else {
            1.0
        }
    }

    #[inline]
    pub fn duration_elapsed(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Liveness guard: past this point the transition completes regardless
    /// of any distance test.
    #[inline]
    pub fn is_forced(&self) -> bool {
        self.elapsed >= self.duration * FORCED_COMPLETION_FACTOR
    }
}

/// Getter/setter pair for one animatable property of node type `N`.
pub struct Accessor<N, T> {
    pub get: fn(&N) -> T,
    pub set: fn(&mut N, T),
}

impl<N, T> Clone for Accessor<N, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<N, T> Copy for Accessor<N, T> {}

impl<N, T> std::fmt::Debug for Accessor<N, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Accessor")
    }
}

/// Linear track from `from` to `to` on a single property.
#[derive(Clone, Debug)]
pub struct PropertyTrack<N, T: Interpolate> {
    accessor: Accessor<N, T>,
    pub from: T,
    pub to: T,
}

impl<N, T: Interpolate> PropertyTrack<N, T> {
    pub fn new(accessor: Accessor<N, T>, from: T, to: T) -> Self {
        Self { accessor, from, to }
    }

    /// Track from the node's current value to `to`.
    pub fn from_current(accessor: Accessor<N, T>, node: &N, to: T) -> Self {
        Self::new(accessor, (accessor.get)(node), to)
    }

    pub fn apply(&self, node: &mut N, t: f32) {
        (self.accessor.set)(node, self.from.lerp_to(self.to, t));
    }

    pub fn distance_to_target(&self, node: &N) -> f32 {
        (self.accessor.get)(node).distance_to(self.to)
    }

    /// Write the exact end value.
    pub fn snap(&self, node: &mut N) {
        (self.accessor.set)(node, self.to);
    }

    pub fn write_start(&self, node: &mut N) {
        (self.accessor.set)(node, self.from);
    }
}

/// Alpha track over every color slot of a node.
///
/// Each slot keeps the RGB captured at initialization; only alpha moves.
/// There is no single distance across independently colored slots, so
/// completion for this track is judged on elapsed time by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlphaTrack {
    rgb: Vec<Vec4>,
    from: Vec<f32>,
    to: Vec<f32>,
}

impl AlphaTrack {
    /// Fade in from transparent to each slot's captured alpha.
    pub fn fade_in(captured: &[Vec4]) -> Self {
        Self {
            rgb: captured.to_vec(),
            from: vec![0.0; captured.len()],
            to: captured.iter().map(|c| c.w).collect(),
        }
    }

    /// Fade out from each slot's current alpha to transparent.
    pub fn fade_out<N: ColorLayers>(captured: &[Vec4], node: &N) -> Self {
        Self {
            rgb: captured.to_vec(),
            from: (0..captured.len()).map(|i| node.slot_alpha(i)).collect(),
            to: vec![0.0; captured.len()],
        }
    }

    pub fn apply<N: ColorLayers>(&self, node: &mut N, t: f32) {
        for (i, rgb) in self.rgb.iter().enumerate() {
            let a = self.from[i].lerp_to(self.to[i], t);
            node.set_slot_alpha(i, *rgb, a);
        }
    }

    pub fn snap<N: ColorLayers>(&self, node: &mut N) {
        self.apply(node, 1.0);
    }

    pub fn write_start<N: ColorLayers>(&self, node: &mut N) {
        self.apply(node, 0.0);
    }
}
