//! Field coordinate system
//!
//! All engine positions are expressed in field percent (0-100) on both
//! axes. On the downfield axis the end zones occupy the outer ~8.33% each
//! and the 100-yard playing field the middle ~83.33%. Yard lines are always
//! possession-relative: the possessing team's own goal line is yard 0.
//!
//! Home possession mirrors the field (home drives toward decreasing
//! percent), so `absolute = 100 - mapped` for home and `mapped` for away.

use crate::models::entity::{FieldPos, Possession};

/// Depth of one end zone in field percent.
pub const END_ZONE_PCT: f32 = 100.0 / 12.0;

/// Downfield extent of the 100-yard playing field in field percent.
pub const PLAYING_PCT: f32 = 100.0 - 2.0 * END_ZONE_PCT;

/// Field percent per yard on the downfield axis.
pub const PCT_PER_YARD: f32 = PLAYING_PCT / 100.0;

/// Field width in yards (53 1/3), used for lateral offsets.
pub const FIELD_WIDTH_YARDS: f32 = 160.0 / 3.0;

/// Field percent per yard on the lateral axis.
pub const LATERAL_PCT_PER_YARD: f32 = 100.0 / FIELD_WIDTH_YARDS;

/// Lateral center line (hash-mark midpoint).
pub const CENTER_LATERAL: f32 = 50.0;

/// Downfield percent covered by `yards` of travel.
#[inline]
pub fn yards(n: f32) -> f32 {
    n * PCT_PER_YARD
}

/// Lateral percent covered by `yards` of sideline-direction travel.
#[inline]
pub fn lateral_yards(n: f32) -> f32 {
    n * LATERAL_PCT_PER_YARD
}

/// Offensive direction sign on the downfield axis: away drives toward
/// increasing percent, home toward decreasing percent.
#[inline]
pub fn offense_dir(possession: Possession) -> f32 {
    match possession {
        Possession::Home => -1.0,
        Possession::Away => 1.0,
    }
}

/// Convert a possession-relative yard line (0-100) to absolute field
/// percent. Input outside 0-100 is clamped first.
pub fn yard_line_to_pct(yard: f32, possession: Possession) -> f32 {
    let mapped = END_ZONE_PCT + yard.clamp(0.0, 100.0) * PCT_PER_YARD;
    match possession {
        Possession::Home => 100.0 - mapped,
        Possession::Away => mapped,
    }
}

/// Inverse of [`yard_line_to_pct`]. Output is clamped to 0-100 so percent
/// values inside an end zone report the nearest goal line.
pub fn pct_to_yard_line(pct: f32, possession: Possession) -> f32 {
    let mapped = match possession {
        Possession::Home => 100.0 - pct,
        Possession::Away => pct,
    };
    ((mapped - END_ZONE_PCT) / PCT_PER_YARD).clamp(0.0, 100.0)
}

/// Downfield percent of the goalpost the possessing team attacks, set at
/// the back line of the opposing end zone.
pub fn goalpost_pct(possession: Possession) -> f32 {
    match possession {
        Possession::Home => 0.0,
        Possession::Away => 100.0,
    }
}

/// Clamp a position to the valid field-percent range.
#[inline]
pub fn clamp_pos(pos: FieldPos) -> FieldPos {
    (pos.0.clamp(0.0, 100.0), pos.1.clamp(0.0, 100.0))
}

/// Euclidean distance in percent units.
#[inline]
pub fn distance(a: FieldPos, b: FieldPos) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}
