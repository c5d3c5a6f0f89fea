//! Ball state and trajectory derivation
//!
//! The ownership tag is the single source of truth for where the ball is:
//! position and height are re-derived from it every frame and never stored
//! independently of it. Arcs use a sine height profile whose peak scales
//! with travel distance (capped), so short tosses and deep kicks read
//! consistently on screen.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::entity::{EntityState, FieldPos, SquadSide};
use crate::engine::easing::lerp_pos;

/// Default arc peak per percent of travel distance for thrown balls.
/// Template-local kick constants live with their templates.
pub const FLIGHT_ARC_SCALE: f32 = 0.18;

/// Arc peak cap in height units, shared by all profiles.
pub const ARC_HEIGHT_CAP: f32 = 14.0;

/// Carry height while a participant holds the ball.
pub const CARRY_HEIGHT: f32 = 1.1;

/// Who or what determines the ball position this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BallOwner {
    /// Carried by one participant; position reads through to the owner.
    Held { side: SquadSide, index: usize },
    /// Thrown between two points; arc height derives from distance.
    Flight { from: FieldPos, to: FieldPos, progress: f32 },
    /// Kicked between two points with an explicit arc peak.
    Kicked { from: FieldPos, to: FieldPos, progress: f32, arc_height: f32 },
    /// Loose on the ground at a fixed spot.
    Ground { at: FieldPos },
}

/// Complete per-frame ball descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: FieldPos,
    pub height: f32,
    /// Rotations per second; spiral for passes, end-over-end for kicks.
    pub spin: f32,
    /// Nose tilt in radians.
    pub tilt: f32,
    pub owner: BallOwner,
}

/// Arc peak for a given travel distance (field percent), capped.
pub fn arc_height_for(distance_pct: f32, scale: f32) -> f32 {
    (distance_pct.abs() * scale).min(ARC_HEIGHT_CAP)
}

/// Sine height profile: zero at both endpoints, `arc` at the midpoint.
pub fn arc_height_at(arc: f32, progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    (arc * (t * PI).sin()).max(0.0)
}

impl BallState {
    /// Derive a full ball state from an ownership tag and the current
    /// entity arrays. Held ownership with an out-of-range index reads
    /// slot 0 rather than failing.
    pub fn from_owner(owner: BallOwner, offense: &[EntityState], defense: &[EntityState]) -> Self {
        let (pos, height) = match owner {
            BallOwner::Held { side, index } => {
                let squad = match side {
                    SquadSide::Offense => offense,
                    SquadSide::Defense => defense,
                };
                let holder = squad.get(index).or_else(|| squad.first());
                match holder {
                    Some(e) => (e.pos, CARRY_HEIGHT),
                    None => ((50.0, 50.0), 0.0),
                }
            }
            BallOwner::Flight { from, to, progress } => {
                let dist = distance(from, to);
                let arc = arc_height_for(dist, FLIGHT_ARC_SCALE);
                (lerp_pos(from, to, progress), arc_height_at(arc, progress))
            }
            BallOwner::Kicked { from, to, progress, arc_height } => {
                (lerp_pos(from, to, progress), arc_height_at(arc_height, progress))
            }
            BallOwner::Ground { at } => (at, 0.0),
        };

        let (spin, tilt) = match owner {
            BallOwner::Flight { from, to, .. } => (9.0, tilt_toward(from, to)),
            BallOwner::Kicked { .. } => (4.0, 0.0),
            BallOwner::Held { .. } => (0.0, 0.2),
            BallOwner::Ground { .. } => (0.0, 0.0),
        };

        Self { pos, height, spin, tilt, owner }
    }

    /// Ball resting on the ground at `at`.
    pub fn resting(at: FieldPos) -> Self {
        Self::from_owner(BallOwner::Ground { at }, &[], &[])
    }
}

fn distance(a: FieldPos, b: FieldPos) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

fn tilt_toward(from: FieldPos, to: FieldPos) -> f32 {
    (to.1 - from.1).atan2(to.0 - from.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::Role;

    #[test]
    fn test_arc_zero_at_endpoints() {
        let arc = arc_height_for(40.0, FLIGHT_ARC_SCALE);
        assert!(arc > 0.0);
        assert!(arc_height_at(arc, 0.0).abs() < 1e-5);
        assert!(arc_height_at(arc, 1.0).abs() < 1e-4);
        assert!(arc_height_at(arc, 0.5) > 0.0);
    }

    #[test]
    fn test_arc_height_capped() {
        assert_eq!(arc_height_for(1000.0, FLIGHT_ARC_SCALE), ARC_HEIGHT_CAP);
    }

    #[test]
    fn test_arc_never_negative() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert!(arc_height_at(6.0, t) >= 0.0);
        }
    }

    #[test]
    fn test_held_reads_owner_position() {
        let offense = vec![
            EntityState::new(Role::Center, (60.0, 50.0)),
            EntityState::new(Role::Quarterback, (55.0, 50.0)),
        ];
        let ball = BallState::from_owner(
            BallOwner::Held { side: SquadSide::Offense, index: 1 },
            &offense,
            &[],
        );
        assert_eq!(ball.pos, (55.0, 50.0));
        assert_eq!(ball.height, CARRY_HEIGHT);
    }

    #[test]
    fn test_held_out_of_range_reads_slot_zero() {
        let offense = vec![EntityState::new(Role::Center, (60.0, 50.0))];
        let ball = BallState::from_owner(
            BallOwner::Held { side: SquadSide::Offense, index: 99 },
            &offense,
            &[],
        );
        assert_eq!(ball.pos, (60.0, 50.0));
    }

    #[test]
    fn test_flight_midpoint_between_endpoints() {
        let ball = BallState::from_owner(
            BallOwner::Flight { from: (40.0, 50.0), to: (60.0, 50.0), progress: 0.5 },
            &[],
            &[],
        );
        assert!((ball.pos.0 - 50.0).abs() < 1e-5);
        assert!(ball.height > 0.0);
        assert!(ball.spin > 0.0);
    }

    #[test]
    fn test_resting_ball_on_ground() {
        let ball = BallState::resting((30.0, 45.0));
        assert_eq!(ball.pos, (30.0, 45.0));
        assert_eq!(ball.height, 0.0);
        assert_eq!(ball.spin, 0.0);
    }
}
