//! Interpolation primitives shared by transitions and idle motion.
//!
//! `Interpolate` is implemented for every property type a marker animates
//! (scalars, positions, scales, colors) so the animator can stay generic.

pub mod functions;

use glam::{Vec2, Vec3, Vec4};

pub use functions::{clamp01, ease_toward, lerp_f32, wrap_degrees};

/// A value that can be blended linearly and measured against a target.
pub trait Interpolate: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
    fn distance_to(self, other: Self) -> f32;
}

impl Interpolate for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        lerp_f32(self, other, t)
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        (other - self).abs()
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }
}

/// RGBA colors are blended component-wise.
impl Interpolate for Vec4 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }
}
