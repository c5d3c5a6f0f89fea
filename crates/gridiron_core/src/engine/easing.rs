//! Interpolation curves
//!
//! The three curves the choreography uses, plus position lerp helpers.
//! Every function clamps its progress input so callers can feed raw phase
//! progress without pre-conditioning.

use crate::models::entity::FieldPos;

/// Identity curve.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Fast start, soft landing. Used for players settling into spots.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Soft start and landing. Used for sustained movement like routes.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv / 2.0
    }
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Linear interpolation between two positions.
#[inline]
pub fn lerp_pos(from: FieldPos, to: FieldPos, t: f32) -> FieldPos {
    let t = t.clamp(0.0, 1.0);
    (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
}

/// Remap `t` from the `[start, end]` window to [0,1], clamped. Progress
/// before the window reads 0, after it reads 1.
#[inline]
pub fn window(t: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if t >= end { 1.0 } else { 0.0 };
    }
    ((t - start) / (end - start)).clamp(0.0, 1.0)
}
