//! Interpolation helpers:
//! - clamp01 / lerp_f32 (scalar blending)
//! - ease_toward (frame-rate scaled exponential approach)
//! - wrap_degrees (angle folding for revolution checks)
//! - look_rotation (orientation from a facing direction and up hint)

use glam::{Mat3, Quat, Vec3};

use super::Interpolate;
use crate::tolerances::DIRECTION_EPSILON_SQ;

/// Clamp into [0, 1]; NaN collapses to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move `current` toward `target` by `clamp01(rate)` of the remaining gap.
///
/// With `rate = dt * speed` this is the usual frame-scaled lerp; the result is
/// always a convex combination of the two inputs.
#[inline]
pub fn ease_toward<T: Interpolate>(current: T, target: T, rate: f32) -> T {
    current.lerp_to(target, clamp01(rate))
}

/// Fold an angle in degrees into [0, 360).
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    let m = deg % 360.0;
    if m < 0.0 {
        m + 360.0
    } else {
        m
    }
}

/// Distance (degrees) from `deg` to the nearest whole revolution.
#[inline]
pub fn distance_to_revolution(deg: f32) -> f32 {
    let w = wrap_degrees(deg);
    w.min(360.0 - w)
}

/// Rotation whose local -Z points along `dir` with local +Y as close to `up`
/// as possible. Degenerate inputs fall back to identity.
pub fn look_rotation(dir: Vec3, up: Vec3) -> Quat {
    if dir.length_squared() < DIRECTION_EPSILON_SQ {
        return Quat::IDENTITY;
    }
    let back = -dir.normalize();
    let right = up.cross(back);
    if right.length_squared() < DIRECTION_EPSILON_SQ {
        return Quat::from_rotation_arc(Vec3::NEG_Z, dir.normalize());
    }
    let right = right.normalize();
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}
