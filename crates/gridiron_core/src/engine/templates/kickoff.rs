//! Kickoff development: approach, a deep kicked arc, lane coverage, and
//! the return leg (or a dead-ball catch when nothing comes of it).

use super::common::carrier_path;
use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::ball::{arc_height_for, BallOwner, BallState, FLIGHT_ARC_SCALE};
use crate::models::entity::{find_role, AnimState, EntityState, FieldPos, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};

/// Kicker strikes the ball.
const KICK_AT: f32 = 0.12;

/// Returner fields the kick.
const CATCH_AT: f32 = 0.5;

pub struct KickoffTemplate;

impl KickoffTemplate {
    fn catch_spot(ctx: &PlayContext) -> FieldPos {
        clamp_pos((ctx.kick_catch_pct(), 48.0))
    }

    fn no_return(ctx: &PlayContext) -> bool {
        ctx.outcome.yards_gained <= 0
    }

    /// The return runs back against the kick direction, ending on the
    /// play's final spot.
    fn return_end(ctx: &PlayContext) -> FieldPos {
        (ctx.destination_pct, 50.0)
    }
}

impl PlayTemplate for KickoffTemplate {
    fn name(&self) -> &'static str {
        "kickoff"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        3800 + (ctx.outcome.yards_gained.clamp(0, 60) as u64) * 40
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let tee = (ctx.los_pct, 50.0);
        let catch_spot = Self::catch_spot(ctx);
        let no_return = Self::no_return(ctx);
        let return_end = Self::return_end(ctx);

        let kicker = find_role(offense, Role::Kicker);
        let returner = find_role(defense, Role::Returner);

        let returner_pos = if t < CATCH_AT {
            let start = defense.get(returner).map(|e| e.pos).unwrap_or(catch_spot);
            lerp_pos(start, catch_spot, ease_in_out_quad(window(t, KICK_AT, CATCH_AT)))
        } else if no_return {
            catch_spot
        } else {
            carrier_path(catch_spot, return_end, window(t, CATCH_AT, 0.95), 2.5)
        };

        let off: Vec<EntityState> = offense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == kicker {
                    let approach =
                        lerp_pos(e.pos, tee, ease_out_cubic(window(t, 0.0, KICK_AT + 0.03)));
                    let mut k = e.at(approach);
                    k.anim = if (KICK_AT - 0.03..KICK_AT + 0.08).contains(&t) {
                        AnimState::Kicking
                    } else if t < KICK_AT {
                        AnimState::Running
                    } else {
                        AnimState::Idle
                    };
                    return k;
                }
                // Coverage lanes: hold the line width, sprint downfield,
                // then close on the returner. Lanes release in waves, the
                // outer slots a beat behind the middle. On a dead catch
                // the lanes slow up short of the spot instead of
                // converging.
                let lane_depth = if no_return { 0.62 } else { 0.8 };
                let lane_end = (
                    e.pos.0 + (catch_spot.0 - e.pos.0) * lane_depth,
                    e.pos.1 + (catch_spot.1 - e.pos.1) * 0.25,
                );
                let stagger = (i % 4) as f32 * 0.05;
                let sprint = ease_in_out_quad(window(t, KICK_AT + stagger, CATCH_AT + 0.15));
                let lane_pos = lerp_pos(e.pos, lane_end, sprint);
                let pos = if !no_return && t > CATCH_AT + 0.15 {
                    let close = ease_out_cubic(window(t, CATCH_AT + 0.15, 1.0));
                    lerp_pos(lane_pos, returner_pos, close * 0.85)
                } else {
                    lane_pos
                };
                let mut c = e.at(pos);
                c.anim = if t > KICK_AT { AnimState::Running } else { AnimState::Idle };
                c
            })
            .collect();

        let mut def: Vec<EntityState> = if no_return || t < CATCH_AT {
            defense
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    if i == returner {
                        let mut r = e.at(returner_pos);
                        r.anim = if (CATCH_AT - 0.06..CATCH_AT + 0.06).contains(&t) {
                            AnimState::Catching
                        } else if t < KICK_AT {
                            AnimState::Idle
                        } else {
                            AnimState::Running
                        };
                        return r;
                    }
                    // Wedge drops back toward the returner to form up.
                    let form = lerp_pos(
                        e.pos,
                        (e.pos.0 + (catch_spot.0 - e.pos.0) * 0.3, e.pos.1),
                        ease_in_out_quad(window(t, KICK_AT, CATCH_AT)),
                    );
                    let mut w = e.at(form);
                    w.anim = AnimState::Blocking;
                    w
                })
                .collect()
        } else {
            // Return leg: blockers lead a step ahead of the runner.
            defense
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    if i == returner {
                        let mut r = e.at(returner_pos);
                        r.anim = AnimState::Returning;
                        return r;
                    }
                    let lead = (
                        returner_pos.0 - ctx.dir * yards(3.0 + (i % 4) as f32),
                        returner_pos.1 + ((i as f32) - 5.0) * 3.0,
                    );
                    let mut w = e.at(lerp_pos(
                        e.pos,
                        clamp_pos(lead),
                        ease_in_out_quad(window(t, CATCH_AT, 1.0)),
                    ));
                    w.anim = AnimState::Blocking;
                    w
                })
                .collect()
        };

        if let Some(r) = def.get_mut(returner) {
            r.facing = if t < CATCH_AT {
                (tee.1 - r.pos.1).atan2(tee.0 - r.pos.0)
            } else {
                (return_end.1 - r.pos.1).atan2(return_end.0 - r.pos.0)
            };
        }

        let owner = if t < KICK_AT {
            BallOwner::Ground { at: tee }
        } else if t < CATCH_AT {
            let dist = (catch_spot.0 - tee.0).abs();
            BallOwner::Kicked {
                from: tee,
                to: catch_spot,
                progress: window(t, KICK_AT, CATCH_AT),
                arc_height: arc_height_for(dist, FLIGHT_ARC_SCALE),
            }
        } else {
            BallOwner::Held { side: SquadSide::Defense, index: returner }
        };
        let ball = BallState::from_owner(owner, &off, &def);

        let camera = if t < CATCH_AT {
            CameraHint::focused(CameraPreset::KickArc, ball.pos)
        } else {
            CameraHint::focused(CameraPreset::FollowBall, ball.pos)
        };
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}
