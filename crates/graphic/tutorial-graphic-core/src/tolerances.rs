//! Tuning table for transition completion tests and idle shaping.
//!
//! Every magic number the controllers use lives here so tolerances can be
//! tuned (and asserted on) in one place.

/// Scale distance below which a zoom transition counts as reached (world units).
pub const ZOOM_REACHED_EPSILON: f32 = 0.01;

/// Fraction of `screen_edge_offset` under which a slide counts as reached.
pub const SLIDE_REACHED_FRACTION: f32 = 0.05;

/// Allowed deviation (degrees) from a whole revolution for zoom-and-rotate.
pub const ROTATION_REACHED_EPSILON_DEG: f32 = 0.5;

/// Transitions are force-completed once `elapsed >= duration * FACTOR`.
pub const FORCED_COMPLETION_FACTOR: f32 = 1.5;

/// Idle fade: steady-state alpha multiplier center.
pub const FADE_IDLE_BASE: f32 = 0.75;

/// Idle fade: steady-state alpha multiplier swing around [`FADE_IDLE_BASE`].
pub const FADE_IDLE_AMPLITUDE: f32 = 0.25;

/// Idle fade: seconds over which breathing blends in from a multiplier of 1.
pub const FADE_IDLE_RAMP_SECONDS: f32 = 0.3;

/// Degrees of the facing-convention correction applied after billboarding.
pub const BILLBOARD_FLIP_DEG: f32 = 180.0;

/// Minimum squared length for a direction/axis to be usable.
pub const DIRECTION_EPSILON_SQ: f32 = 1e-8;
