//! Pass-family development: completions, incompletions, sacks, and
//! two-point tries
//!
//! Quarterback drop behind a collapsing-or-holding pocket, a distinct
//! route for the targeted receiver with shallower complementary routes,
//! then either a throw window with flight ball, an incompletion falling
//! dead, or a pocket collapse into a sack.

use super::common::{carrier_path, nearest_to, staggered_pursuit, surge};
use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::ball::{BallOwner, BallState};
use crate::models::entity::{find_role, AnimState, EntityState, FieldPos, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
use crate::models::outcome::PlayType;

/// Ball leaves the quarterback's hand.
const THROW_AT: f32 = 0.35;

/// Ball arrives at the catch spot.
const CATCH_AT: f32 = 0.62;

/// Quarterback drop depth in yards beyond the snapshot position.
const DROP_YARDS: f32 = 3.5;

pub struct PassTemplate;

impl PassTemplate {
    fn is_sack(ctx: &PlayContext) -> bool {
        ctx.outcome.play_type == PlayType::Sack
    }

    fn is_complete(ctx: &PlayContext) -> bool {
        match ctx.outcome.play_type {
            PlayType::PassComplete => true,
            PlayType::TwoPoint => ctx.outcome.scored(),
            _ => false,
        }
    }

    /// Where the ball comes down: short of the destination for
    /// completions (the rest is run after the catch), a dead spot
    /// downfield for incompletions.
    fn catch_spot(ctx: &PlayContext) -> FieldPos {
        let air_yards = if Self::is_complete(ctx) {
            (ctx.outcome.yards_gained as f32 * 0.65).max(3.0)
        } else {
            12.0
        };
        clamp_pos((ctx.los_pct + ctx.dir * yards(air_yards), 46.0))
    }

    fn qb_drop_end(ctx: &PlayContext, offense: &[EntityState]) -> FieldPos {
        let qb = find_role(offense, Role::Quarterback);
        let start = offense.get(qb).map(|e| e.pos).unwrap_or((50.0, 50.0));
        clamp_pos((start.0 - ctx.dir * yards(DROP_YARDS), start.1))
    }
}

impl PlayTemplate for PassTemplate {
    fn name(&self) -> &'static str {
        "pass"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        match ctx.outcome.play_type {
            PlayType::Sack => 2300,
            PlayType::PassIncomplete => 2800,
            _ => 2600 + (ctx.outcome.yards_gained.clamp(0, 45) as u64) * 30,
        }
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let sack = Self::is_sack(ctx);
        let complete = Self::is_complete(ctx);

        let qb = find_role(offense, Role::Quarterback);
        let target = find_role(offense, Role::WideReceiver);
        let catch_spot = Self::catch_spot(ctx);
        let drop_end = Self::qb_drop_end(ctx, offense);

        // On a sack the quarterback keeps retreating to the loss spot.
        let qb_pos = if sack {
            let retreat = window(t, 0.25, 0.85);
            lerp_pos(drop_end, (ctx.destination_pct, drop_end.1), ease_out_cubic(retreat))
        } else {
            let start = offense.get(qb).map(|e| e.pos).unwrap_or(drop_end);
            lerp_pos(start, drop_end, ease_out_cubic(window(t, 0.0, 0.25)))
        };

        let run_after = window(t, CATCH_AT, 0.95);
        let mut wr_seen = 0;
        let mut off: Vec<EntityState> = offense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == qb {
                    let mut q = e.at(qb_pos);
                    q.anim = if sack && t > 0.7 {
                        AnimState::Idle
                    } else if (THROW_AT - 0.05..THROW_AT + 0.1).contains(&t) && !sack {
                        AnimState::Throwing
                    } else if t < 0.25 {
                        AnimState::Running
                    } else {
                        AnimState::Idle
                    };
                    return q;
                }
                match e.role {
                    Role::Center | Role::Guard | Role::Tackle => {
                        // Pocket: a short set-back toward the passer.
                        let pocket =
                            (e.pos.0 - ctx.dir * yards(1.0), e.pos.1);
                        let mut l =
                            e.at(lerp_pos(e.pos, pocket, ease_out_cubic(window(t, 0.0, 0.3))));
                        l.anim = AnimState::Blocking;
                        l
                    }
                    Role::WideReceiver | Role::TightEnd => {
                        let slot = wr_seen;
                        wr_seen += 1;
                        if i == target {
                            // Targeted route: quadratic arc out to the
                            // catch spot, then the run after the catch.
                            let control = (
                                e.pos.0 + ctx.dir * yards(6.0),
                                e.pos.1 + (catch_spot.1 - e.pos.1) * 0.2,
                            );
                            let rt = ease_in_out_quad(window(t, 0.0, CATCH_AT));
                            let a = lerp_pos(e.pos, control, rt);
                            let b = lerp_pos(control, catch_spot, rt);
                            let route_pos = lerp_pos(a, b, rt);
                            let pos = if complete && t > CATCH_AT {
                                carrier_path(catch_spot, (ctx.destination_pct, catch_spot.1), run_after, 1.5)
                            } else {
                                route_pos
                            };
                            let mut r = e.at(pos);
                            r.anim = if (CATCH_AT - 0.06..CATCH_AT + 0.06).contains(&t) {
                                AnimState::Catching
                            } else if t > CATCH_AT && !complete {
                                AnimState::Idle
                            } else {
                                AnimState::Running
                            };
                            r
                        } else {
                            // Complementary shallow route with a drift
                            // toward the middle.
                            let depth = 5.0 + slot as f32 * 2.0;
                            let dest = clamp_pos((
                                e.pos.0 + ctx.dir * yards(depth),
                                e.pos.1 + (50.0 - e.pos.1) * 0.3,
                            ));
                            let mut r =
                                e.at(lerp_pos(e.pos, dest, ease_in_out_quad(window(t, 0.0, 0.8))));
                            r.anim = AnimState::Running;
                            r
                        }
                    }
                    Role::RunningBack | Role::Fullback => {
                        // Check-release: stay in to block.
                        let mut b = surge(e, -ctx.dir, 1.0, window(t, 0.0, 0.3));
                        b.anim = AnimState::Blocking;
                        b
                    }
                    _ => e.clone(),
                }
            })
            .collect();

        // Carrier position after the catch drives pursuit and the camera.
        let live_ball_pos = off.get(target).map(|e| e.pos).unwrap_or(catch_spot);

        let mut def: Vec<EntityState> = if complete && t > CATCH_AT {
            staggered_pursuit(defense, live_ball_pos, window(t, CATCH_AT, 1.0), 1.2)
        } else {
            defense
                .iter()
                .map(|e| match e.role {
                    Role::DefensiveLine => {
                        let rush = lerp_pos(e.pos, qb_pos, ease_out_cubic(t) * 0.85);
                        let mut d = e.at(rush);
                        d.anim = AnimState::Running;
                        d
                    }
                    Role::Cornerback => {
                        // Shadow the nearest receiver a step and a half
                        // deeper.
                        let shadow_idx = nearest_to(
                            &offense
                                .iter()
                                .filter(|o| o.role == Role::WideReceiver)
                                .cloned()
                                .collect::<Vec<_>>(),
                            e.pos,
                        );
                        let shadow = offense
                            .iter()
                            .filter(|o| o.role == Role::WideReceiver)
                            .nth(shadow_idx)
                            .map(|o| o.pos)
                            .unwrap_or(e.pos);
                        let lead = (shadow.0 + ctx.dir * yards(1.5), shadow.1);
                        let mut d = e.at(lerp_pos(e.pos, lead, ease_in_out_quad(t)));
                        d.anim = AnimState::Running;
                        d
                    }
                    Role::Linebacker => surge(e, ctx.dir, 3.0, t),
                    Role::Safety => surge(e, ctx.dir, 5.0, t),
                    _ => e.clone(),
                })
                .collect()
        };

        if sack && t > 0.7 {
            let closest = nearest_to(&def, qb_pos);
            def[closest].anim = AnimState::Tackling;
            def[closest].pos = lerp_pos(def[closest].pos, qb_pos, 0.8);
        }

        let throw_origin = drop_end;
        let owner = if sack || t < THROW_AT {
            BallOwner::Held { side: SquadSide::Offense, index: qb }
        } else if t < CATCH_AT {
            BallOwner::Flight {
                from: throw_origin,
                to: catch_spot,
                progress: window(t, THROW_AT, CATCH_AT),
            }
        } else if complete {
            BallOwner::Held { side: SquadSide::Offense, index: target }
        } else {
            BallOwner::Ground { at: catch_spot }
        };
        let ball = BallState::from_owner(owner, &off, &def);

        // Targeted receiver faces the incoming throw.
        if let Some(r) = off.get_mut(target) {
            if (THROW_AT..CATCH_AT).contains(&t) {
                r.facing = (throw_origin.1 - r.pos.1).atan2(throw_origin.0 - r.pos.0);
            }
        }

        let camera = CameraHint::focused(CameraPreset::FollowBall, ball.pos);
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formation::{defense_slots, formation_entities, offense_slots};
    use crate::models::entity::Possession;
    use crate::models::outcome::PlayOutcome;

    fn ctx_of(play_type: PlayType, yards: i32) -> PlayContext {
        let mut outcome = PlayOutcome::of_type(play_type);
        outcome.yards_gained = yards;
        PlayContext::new(outcome, 40.0, Possession::Away).unwrap()
    }

    fn snapshot(ctx: &PlayContext) -> (Vec<EntityState>, Vec<EntityState>) {
        (
            formation_entities(offense_slots("shotgun"), ctx.los_pct, ctx.dir, SquadSide::Offense),
            formation_entities(defense_slots("nickel"), ctx.los_pct, ctx.dir, SquadSide::Defense),
        )
    }

    #[test]
    fn test_rosters_and_bounds() {
        for play_type in [PlayType::PassComplete, PlayType::PassIncomplete, PlayType::Sack] {
            let ctx = ctx_of(play_type, 15);
            let (off, def) = snapshot(&ctx);
            for i in 0..=20 {
                let frame = PassTemplate.development(i as f32 / 20.0, &ctx, &off, &def);
                assert_eq!(frame.offense.len(), 11, "{play_type:?}");
                assert_eq!(frame.defense.len(), 11, "{play_type:?}");
                for e in frame.offense.iter().chain(frame.defense.iter()) {
                    assert!((0.0..=100.0).contains(&e.pos.0), "{play_type:?}");
                    assert!((0.0..=100.0).contains(&e.pos.1), "{play_type:?}");
                }
            }
        }
    }

    #[test]
    fn test_ball_in_flight_during_throw_window() {
        let ctx = ctx_of(PlayType::PassComplete, 15);
        let (off, def) = snapshot(&ctx);
        let frame = PassTemplate.development(0.5, &ctx, &off, &def);
        assert!(matches!(frame.ball.owner, BallOwner::Flight { .. }));
        assert!(frame.ball.height > 0.0);
    }

    #[test]
    fn test_completion_lands_with_target_receiver() {
        let ctx = ctx_of(PlayType::PassComplete, 15);
        let (off, def) = snapshot(&ctx);
        let frame = PassTemplate.development(0.8, &ctx, &off, &def);
        let target = find_role(&off, Role::WideReceiver);
        assert_eq!(
            frame.ball.owner,
            BallOwner::Held { side: SquadSide::Offense, index: target }
        );
    }

    #[test]
    fn test_incompletion_falls_dead() {
        let ctx = ctx_of(PlayType::PassIncomplete, 0);
        let (off, def) = snapshot(&ctx);
        let frame = PassTemplate.development(0.9, &ctx, &off, &def);
        assert!(matches!(frame.ball.owner, BallOwner::Ground { .. }));
        assert_eq!(frame.ball.height, 0.0);
    }

    #[test]
    fn test_sack_never_throws() {
        let ctx = ctx_of(PlayType::Sack, -7);
        let (off, def) = snapshot(&ctx);
        let qb = find_role(&off, Role::Quarterback);
        for i in 0..=10 {
            let frame = PassTemplate.development(i as f32 / 10.0, &ctx, &off, &def);
            assert_eq!(
                frame.ball.owner,
                BallOwner::Held { side: SquadSide::Offense, index: qb },
                "sack ball stays with the quarterback"
            );
        }
    }

    #[test]
    fn test_sack_drives_quarterback_backward() {
        let ctx = ctx_of(PlayType::Sack, -7);
        let (off, def) = snapshot(&ctx);
        let qb = find_role(&off, Role::Quarterback);
        let frame = PassTemplate.development(1.0, &ctx, &off, &def);
        // Away drives toward increasing percent, so a loss ends below
        // the line of scrimmage.
        assert!(frame.offense[qb].pos.0 < ctx.los_pct);
    }

    #[test]
    fn test_targeted_route_runs_deeper_than_complements() {
        let ctx = ctx_of(PlayType::PassComplete, 20);
        let (off, def) = snapshot(&ctx);
        let frame = PassTemplate.development(CATCH_AT, &ctx, &off, &def);

        let target = find_role(&off, Role::WideReceiver);
        let target_depth = (frame.offense[target].pos.0 - ctx.los_pct) * ctx.dir;
        for (i, e) in frame.offense.iter().enumerate() {
            if e.role == Role::WideReceiver && i != target {
                let depth = (e.pos.0 - ctx.los_pct) * ctx.dir;
                assert!(target_depth > depth - 0.5, "target should run the deepest shape");
            }
        }
    }
}
