//! Formation library
//!
//! Static offensive, defensive and special-teams layouts, expressed as
//! per-slot offsets from the line of scrimmage and the lateral center
//! line. Offsets are in yards: `depth` is measured backward from the line
//! for offense and forward from it for defense, `lateral` is signed
//! sideline distance mirrored by the direction of travel.
//!
//! Slot 0 of every offensive layout is the reference lineman (the
//! snapper). Unknown tags fall back to the designated defaults rather
//! than failing; a live broadcast prefers a sensible picture to an error.
//!
//! Huddle, relaxed-spread and idle arrangements are generated from the
//! current ball position instead of being stored here.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use tracing::warn;

use super::coordinates::{clamp_pos, lateral_yards, yards, CENTER_LATERAL};
use crate::models::entity::{EntityState, FieldPos, Role, SquadSide};

/// Offensive formation used when a tag is missing or unrecognized.
pub const DEFAULT_OFFENSE: &str = "shotgun";

/// Defensive personnel used when a tag is missing or unrecognized.
pub const DEFAULT_DEFENSE: &str = "4-3";

/// One formation slot: role plus yard offsets from (line of scrimmage,
/// lateral center).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub role: Role,
    /// Signed lateral offset in yards; mirrored by direction of travel.
    pub lateral: f32,
    /// Distance from the line of scrimmage in yards, toward the slot
    /// owner's own side.
    pub depth: f32,
}

const fn slot(role: Role, lateral: f32, depth: f32) -> FormationSlot {
    FormationSlot { role, lateral, depth }
}

// ============================================================================
// Offensive layouts
// ============================================================================

const SHOTGUN: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::Quarterback, 0.0, 5.0),
    slot(Role::RunningBack, 2.5, 5.0),
    slot(Role::TightEnd, 3.9, 0.5),
    slot(Role::WideReceiver, -20.0, 0.5),
    slot(Role::WideReceiver, 20.0, 0.5),
    slot(Role::WideReceiver, -13.0, 1.0),
];

const I_FORM: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::Quarterback, 0.0, 1.2),
    slot(Role::Fullback, 0.0, 4.5),
    slot(Role::RunningBack, 0.0, 7.0),
    slot(Role::TightEnd, 3.9, 0.5),
    slot(Role::WideReceiver, -20.0, 0.5),
    slot(Role::WideReceiver, 20.0, 1.0),
];

const SINGLEBACK: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::Quarterback, 0.0, 1.2),
    slot(Role::RunningBack, 0.0, 6.0),
    slot(Role::TightEnd, 3.9, 0.5),
    slot(Role::WideReceiver, -20.0, 0.5),
    slot(Role::WideReceiver, 20.0, 0.5),
    slot(Role::WideReceiver, -12.0, 1.0),
];

const TRIPS: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::Quarterback, 0.0, 5.0),
    slot(Role::RunningBack, -2.5, 5.0),
    slot(Role::WideReceiver, 18.0, 0.5),
    slot(Role::WideReceiver, 13.0, 1.2),
    slot(Role::WideReceiver, 9.0, 0.8),
    slot(Role::WideReceiver, -20.0, 0.5),
];

const GOAL_LINE: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::TightEnd, -3.9, 0.5),
    slot(Role::TightEnd, 3.9, 0.5),
    slot(Role::Quarterback, 0.0, 1.2),
    slot(Role::Fullback, 0.0, 3.5),
    slot(Role::RunningBack, 0.0, 5.5),
    slot(Role::WideReceiver, -15.0, 0.5),
];

const PUNT: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::TightEnd, 3.9, 0.0),
    slot(Role::Fullback, -2.0, 5.5),
    slot(Role::Fullback, 2.0, 5.5),
    slot(Role::Punter, 0.0, 14.0),
    slot(Role::Gunner, -24.0, 0.0),
    slot(Role::Gunner, 24.0, 0.0),
];

const KICKOFF: [FormationSlot; 11] = [
    slot(Role::Kicker, 0.0, 7.0),
    slot(Role::Gunner, -24.0, 1.0),
    slot(Role::Gunner, -19.0, 1.0),
    slot(Role::Gunner, -14.0, 1.0),
    slot(Role::Gunner, -9.0, 1.0),
    slot(Role::Gunner, -4.0, 1.0),
    slot(Role::Gunner, 4.0, 1.0),
    slot(Role::Gunner, 9.0, 1.0),
    slot(Role::Gunner, 14.0, 1.0),
    slot(Role::Gunner, 19.0, 1.0),
    slot(Role::Gunner, 24.0, 1.0),
];

const FIELD_GOAL: [FormationSlot; 11] = [
    slot(Role::Center, 0.0, 0.0),
    slot(Role::Guard, -1.3, 0.0),
    slot(Role::Guard, 1.3, 0.0),
    slot(Role::Tackle, -2.6, 0.0),
    slot(Role::Tackle, 2.6, 0.0),
    slot(Role::TightEnd, -3.9, 0.3),
    slot(Role::TightEnd, 3.9, 0.3),
    slot(Role::Fullback, -5.0, 0.8),
    slot(Role::Fullback, 5.0, 0.8),
    slot(Role::Holder, 0.0, 7.0),
    slot(Role::Kicker, -1.0, 9.5),
];

// ============================================================================
// Defensive layouts
// ============================================================================

const FOUR_THREE: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -3.5, 1.0),
    slot(Role::DefensiveLine, -1.2, 1.0),
    slot(Role::DefensiveLine, 1.2, 1.0),
    slot(Role::DefensiveLine, 3.5, 1.0),
    slot(Role::Linebacker, -4.0, 4.5),
    slot(Role::Linebacker, 0.0, 4.5),
    slot(Role::Linebacker, 4.0, 4.5),
    slot(Role::Cornerback, -20.0, 1.5),
    slot(Role::Cornerback, 20.0, 1.5),
    slot(Role::Safety, -8.0, 12.0),
    slot(Role::Safety, 8.0, 12.0),
];

const THREE_FOUR: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -2.6, 1.0),
    slot(Role::DefensiveLine, 0.0, 1.0),
    slot(Role::DefensiveLine, 2.6, 1.0),
    slot(Role::Linebacker, -5.0, 2.0),
    slot(Role::Linebacker, 5.0, 2.0),
    slot(Role::Linebacker, -2.0, 4.5),
    slot(Role::Linebacker, 2.0, 4.5),
    slot(Role::Cornerback, -20.0, 1.5),
    slot(Role::Cornerback, 20.0, 1.5),
    slot(Role::Safety, -8.0, 12.0),
    slot(Role::Safety, 8.0, 12.0),
];

const NICKEL: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -3.5, 1.0),
    slot(Role::DefensiveLine, -1.2, 1.0),
    slot(Role::DefensiveLine, 1.2, 1.0),
    slot(Role::DefensiveLine, 3.5, 1.0),
    slot(Role::Linebacker, -2.0, 4.5),
    slot(Role::Linebacker, 2.0, 4.5),
    slot(Role::Cornerback, -20.0, 1.5),
    slot(Role::Cornerback, 20.0, 1.5),
    slot(Role::Cornerback, 12.0, 3.0),
    slot(Role::Safety, -8.0, 12.0),
    slot(Role::Safety, 8.0, 12.0),
];

const DIME: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -3.5, 1.0),
    slot(Role::DefensiveLine, -1.2, 1.0),
    slot(Role::DefensiveLine, 1.2, 1.0),
    slot(Role::DefensiveLine, 3.5, 1.0),
    slot(Role::Linebacker, 0.0, 4.5),
    slot(Role::Cornerback, -20.0, 1.5),
    slot(Role::Cornerback, 20.0, 1.5),
    slot(Role::Cornerback, -12.0, 3.0),
    slot(Role::Cornerback, 12.0, 3.0),
    slot(Role::Safety, -8.0, 12.0),
    slot(Role::Safety, 8.0, 12.0),
];

const GOAL_LINE_D: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -5.0, 1.0),
    slot(Role::DefensiveLine, -3.0, 1.0),
    slot(Role::DefensiveLine, -1.0, 1.0),
    slot(Role::DefensiveLine, 1.0, 1.0),
    slot(Role::DefensiveLine, 3.0, 1.0),
    slot(Role::DefensiveLine, 5.0, 1.0),
    slot(Role::Linebacker, -3.0, 3.0),
    slot(Role::Linebacker, 0.0, 3.0),
    slot(Role::Linebacker, 3.0, 3.0),
    slot(Role::Cornerback, -12.0, 2.0),
    slot(Role::Cornerback, 12.0, 2.0),
];

const PUNT_RETURN: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -5.0, 1.0),
    slot(Role::DefensiveLine, -2.5, 1.0),
    slot(Role::DefensiveLine, 0.0, 1.0),
    slot(Role::DefensiveLine, 2.5, 1.0),
    slot(Role::DefensiveLine, 5.0, 1.0),
    slot(Role::Linebacker, -3.0, 4.0),
    slot(Role::Linebacker, 3.0, 4.0),
    slot(Role::Cornerback, -22.0, 1.5),
    slot(Role::Cornerback, 22.0, 1.5),
    slot(Role::Safety, 0.0, 12.0),
    slot(Role::Returner, 0.0, 40.0),
];

const KICKOFF_RETURN: [FormationSlot; 11] = [
    slot(Role::Linebacker, -16.0, 12.0),
    slot(Role::Linebacker, -8.0, 12.0),
    slot(Role::Linebacker, 0.0, 12.0),
    slot(Role::Linebacker, 8.0, 12.0),
    slot(Role::Linebacker, 16.0, 12.0),
    slot(Role::Cornerback, -12.0, 30.0),
    slot(Role::Cornerback, 12.0, 30.0),
    slot(Role::Safety, -5.0, 32.0),
    slot(Role::Safety, 5.0, 32.0),
    slot(Role::Safety, 0.0, 42.0),
    slot(Role::Returner, 0.0, 55.0),
];

const FIELD_GOAL_BLOCK: [FormationSlot; 11] = [
    slot(Role::DefensiveLine, -5.0, 1.0),
    slot(Role::DefensiveLine, -3.0, 1.0),
    slot(Role::DefensiveLine, -1.0, 1.0),
    slot(Role::DefensiveLine, 1.0, 1.0),
    slot(Role::DefensiveLine, 3.0, 1.0),
    slot(Role::DefensiveLine, 5.0, 1.0),
    slot(Role::Linebacker, -3.0, 3.0),
    slot(Role::Linebacker, 3.0, 3.0),
    slot(Role::Cornerback, -8.0, 1.0),
    slot(Role::Cornerback, 8.0, 1.0),
    slot(Role::Safety, 0.0, 10.0),
];

static OFFENSE_LOOKUP: Lazy<HashMap<&'static str, &'static [FormationSlot; 11]>> =
    Lazy::new(|| {
        let mut map: HashMap<&'static str, &'static [FormationSlot; 11]> = HashMap::new();
        map.insert("shotgun", &SHOTGUN);
        map.insert("i-form", &I_FORM);
        map.insert("i-formation", &I_FORM);
        map.insert("singleback", &SINGLEBACK);
        map.insert("trips", &TRIPS);
        map.insert("spread", &TRIPS);
        map.insert("goal-line", &GOAL_LINE);
        map.insert("punt", &PUNT);
        map.insert("kickoff", &KICKOFF);
        map.insert("field-goal", &FIELD_GOAL);
        map.insert("extra-point", &FIELD_GOAL);
        map
    });

static DEFENSE_LOOKUP: Lazy<HashMap<&'static str, &'static [FormationSlot; 11]>> =
    Lazy::new(|| {
        let mut map: HashMap<&'static str, &'static [FormationSlot; 11]> = HashMap::new();
        map.insert("4-3", &FOUR_THREE);
        map.insert("43", &FOUR_THREE);
        map.insert("3-4", &THREE_FOUR);
        map.insert("34", &THREE_FOUR);
        map.insert("nickel", &NICKEL);
        map.insert("dime", &DIME);
        map.insert("goal-line", &GOAL_LINE_D);
        map.insert("punt-return", &PUNT_RETURN);
        map.insert("kickoff-return", &KICKOFF_RETURN);
        map.insert("field-goal-block", &FIELD_GOAL_BLOCK);
        map.insert("fg-block", &FIELD_GOAL_BLOCK);
        map
    });

/// Offensive layout for `tag`, falling back to [`DEFAULT_OFFENSE`].
pub fn offense_slots(tag: &str) -> &'static [FormationSlot; 11] {
    if let Some(slots) = OFFENSE_LOOKUP.get(tag) {
        return slots;
    }
    if !tag.is_empty() {
        warn!(tag, "unknown offensive formation, using default");
    }
    OFFENSE_LOOKUP[DEFAULT_OFFENSE]
}

/// Defensive layout for `tag`, falling back to [`DEFAULT_DEFENSE`].
pub fn defense_slots(tag: &str) -> &'static [FormationSlot; 11] {
    if let Some(slots) = DEFENSE_LOOKUP.get(tag) {
        return slots;
    }
    if !tag.is_empty() {
        warn!(tag, "unknown defensive personnel, using default");
    }
    DEFENSE_LOOKUP[DEFAULT_DEFENSE]
}

/// Convert a layout into absolute entity states.
///
/// Offense offsets are measured backward from the line (they subtract in
/// the direction of travel); defense offsets add forward from it.
pub fn formation_entities(
    slots: &[FormationSlot; 11],
    los_pct: f32,
    dir: f32,
    side: SquadSide,
) -> Vec<EntityState> {
    let depth_sign = match side {
        SquadSide::Offense => -dir,
        SquadSide::Defense => dir,
    };
    let facing = match side {
        SquadSide::Offense => {
            if dir > 0.0 {
                0.0
            } else {
                PI
            }
        }
        SquadSide::Defense => {
            if dir > 0.0 {
                PI
            } else {
                0.0
            }
        }
    };
    slots
        .iter()
        .map(|s| {
            let pos = clamp_pos((
                los_pct + depth_sign * yards(s.depth),
                CENTER_LATERAL + dir * lateral_yards(s.lateral),
            ));
            let mut e = EntityState::new(s.role, pos);
            e.facing = facing;
            e
        })
        .collect()
}

/// Huddle oval for the offense, anchored a few yards behind the ball.
pub fn huddle_oval(ball: FieldPos, dir: f32) -> Vec<FieldPos> {
    let center = (ball.0 - dir * yards(7.0), ball.1);
    (0..11)
        .map(|i| {
            let angle = i as f32 / 11.0 * TAU;
            clamp_pos((
                center.0 + angle.cos() * yards(2.2),
                center.1 + angle.sin() * lateral_yards(3.2),
            ))
        })
        .collect()
}

/// Relaxed defensive spread while the offense huddles: two loose rows on
/// the defensive side of the ball.
pub fn relaxed_spread(ball: FieldPos, dir: f32) -> Vec<FieldPos> {
    (0..11)
        .map(|i| {
            let (row, col) = if i < 6 { (0, i as f32 - 2.5) } else { (1, i as f32 - 8.0) };
            let depth = 5.0 + row as f32 * 5.0;
            clamp_pos((
                ball.0 + dir * yards(depth),
                ball.1 + lateral_yards(col * 4.0),
            ))
        })
        .collect()
}

/// Idle arrangement used when no play is active: a loose line on each
/// team's side of the ball.
pub fn idle_line(ball: FieldPos, dir: f32, side: SquadSide) -> Vec<FieldPos> {
    let side_sign = match side {
        SquadSide::Offense => -dir,
        SquadSide::Defense => dir,
    };
    (0..11)
        .map(|i| {
            let col = i as f32 - 5.0;
            clamp_pos((
                ball.0 + side_sign * yards(6.0 + (i % 2) as f32 * 2.5),
                ball.1 + lateral_yards(col * 3.5),
            ))
        })
        .collect()
}
