//! Punt development: long snap, shield protection, a high kicked arc
//! with gunners beating the coverage downfield, then the return leg.

use super::common::carrier_path;
use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::ball::{arc_height_for, BallOwner, BallState, FLIGHT_ARC_SCALE};
use crate::models::entity::{find_role, AnimState, EntityState, FieldPos, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};

/// Long snap leaves the center.
const SNAP_AT: f32 = 0.04;

/// Snap reaches the punter.
const SNAP_CAUGHT_AT: f32 = 0.12;

/// Punter strikes the ball.
const PUNT_AT: f32 = 0.2;

/// Returner fields the punt.
const CATCH_AT: f32 = 0.58;

pub struct PuntTemplate;

impl PuntTemplate {
    fn catch_spot(ctx: &PlayContext) -> FieldPos {
        clamp_pos((ctx.kick_catch_pct(), 52.0))
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

impl PlayTemplate for PuntTemplate {
    fn name(&self) -> &'static str {
        "punt"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        4000 + (ctx.outcome.yards_gained.clamp(0, 50) as u64) * 40
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let catch_spot = Self::catch_spot(ctx);
        let no_return = Self::no_return(ctx);
        let return_end = Self::return_end(ctx);

        let snapper = find_role(offense, Role::Center);
        let punter = find_role(offense, Role::Punter);
        let returner = find_role(defense, Role::Returner);

        let snapper_pos = offense.get(snapper).map(|e| e.pos).unwrap_or((ctx.los_pct, 50.0));
        let punter_pos = offense.get(punter).map(|e| e.pos).unwrap_or((ctx.los_pct, 50.0));

        let returner_pos = if t < CATCH_AT {
            let start = defense.get(returner).map(|e| e.pos).unwrap_or(catch_spot);
            lerp_pos(start, catch_spot, ease_in_out_quad(window(t, PUNT_AT, CATCH_AT)))
        } else if no_return {
            catch_spot
        } else {
            carrier_path(catch_spot, return_end, window(t, CATCH_AT, 0.95), 2.0)
        };

        let off: Vec<EntityState> = offense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == punter {
                    let mut p = e.clone();
                    p.anim = if (PUNT_AT - 0.03..PUNT_AT + 0.08).contains(&t) {
                        AnimState::Kicking
                    } else if (SNAP_CAUGHT_AT - 0.04..SNAP_CAUGHT_AT + 0.04).contains(&t) {
                        AnimState::Catching
                    } else {
                        AnimState::Idle
                    };
                    return p;
                }
                match e.role {
                    Role::Gunner => {
                        // Gunners release at the snap and beat everyone
                        // down to the catch spot.
                        let lane = (catch_spot.0, e.pos.1 * 0.7 + catch_spot.1 * 0.3);
                        let mut g = e.at(lerp_pos(
                            e.pos,
                            lane,
                            ease_in_out_quad(window(t, SNAP_AT, CATCH_AT + 0.1)),
                        ));
                        g.anim = if t > SNAP_AT { AnimState::Running } else { AnimState::Idle };
                        g
                    }
                    Role::Fullback => {
                        // Shield holds until the ball is away.
                        let mut s = e.clone();
                        s.anim = AnimState::Blocking;
                        if t > PUNT_AT + 0.1 {
                            let release = ease_in_out_quad(window(t, PUNT_AT + 0.1, 1.0));
                            s.pos =
                                lerp_pos(e.pos, lerp_pos(e.pos, returner_pos, 0.6), release);
                            s.anim = AnimState::Running;
                        }
                        s
                    }
                    _ => {
                        // Line blocks through the kick, then covers.
                        let mut l = e.clone();
                        if t > PUNT_AT + 0.15 {
                            let release = ease_in_out_quad(window(t, PUNT_AT + 0.15, 1.0));
                            l.pos =
                                lerp_pos(e.pos, lerp_pos(e.pos, returner_pos, 0.55), release);
                            l.anim = AnimState::Running;
                        } else {
                            l.anim = AnimState::Blocking;
                        }
                        l
                    }
                }
            })
            .collect();

        let mut def: Vec<EntityState> = defense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == returner {
                    let mut r = e.at(returner_pos);
                    r.anim = if (CATCH_AT - 0.06..CATCH_AT + 0.06).contains(&t) {
                        AnimState::Catching
                    } else if t >= CATCH_AT && !no_return {
                        AnimState::Returning
                    } else if t > PUNT_AT {
                        AnimState::Running
                    } else {
                        AnimState::Idle
                    };
                    return r;
                }
                match e.role {
                    Role::Cornerback => {
                        // Jam the gunners off the line, then peel back.
                        let gunner = offense
                            .iter()
                            .filter(|o| o.role == Role::Gunner)
                            .min_by(|a, b| {
                                let da = (a.pos.1 - e.pos.1).abs();
                                let db = (b.pos.1 - e.pos.1).abs();
                                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                            })
                            .map(|o| o.pos)
                            .unwrap_or(e.pos);
                        let jam = lerp_pos(e.pos, gunner, 0.5);
                        let mut d = e.at(lerp_pos(e.pos, jam, ease_out_cubic(window(t, 0.0, 0.3))));
                        if t > CATCH_AT && !no_return {
                            let peel = ease_in_out_quad(window(t, CATCH_AT, 1.0));
                            d.pos = lerp_pos(d.pos, lerp_pos(d.pos, returner_pos, 0.5), peel);
                        }
                        d.anim = AnimState::Blocking;
                        d
                    }
                    Role::DefensiveLine | Role::Linebacker => {
                        // Rush the shield, then turn and wall off for the
                        // return.
                        let rush = lerp_pos(
                            e.pos,
                            lerp_pos(e.pos, punter_pos, 0.5),
                            ease_out_cubic(window(t, SNAP_AT, PUNT_AT)),
                        );
                        let mut d = e.at(rush);
                        if t > PUNT_AT && !no_return {
                            let wall = (
                                returner_pos.0 - ctx.dir * yards(4.0 + (i % 3) as f32 * 2.0),
                                50.0 + ((i as f32) - 3.0) * 4.0,
                            );
                            let back = ease_in_out_quad(window(t, PUNT_AT, 1.0));
                            d.pos = lerp_pos(d.pos, clamp_pos(wall), back);
                        }
                        d.anim = if t > PUNT_AT { AnimState::Blocking } else { AnimState::Running };
                        d
                    }
                    _ => e.clone(),
                }
            })
            .collect();

        if let Some(r) = def.get_mut(returner) {
            if t >= CATCH_AT && !no_return {
                r.facing = (return_end.1 - r.pos.1).atan2(return_end.0 - r.pos.0);
            }
        }

        let owner = if t < SNAP_AT {
            BallOwner::Held { side: SquadSide::Offense, index: snapper }
        } else if t < SNAP_CAUGHT_AT {
            BallOwner::Flight {
                from: snapper_pos,
                to: punter_pos,
                progress: window(t, SNAP_AT, SNAP_CAUGHT_AT),
            }
        } else if t < PUNT_AT {
            BallOwner::Held { side: SquadSide::Offense, index: punter }
        } else if t < CATCH_AT {
            let dist = (catch_spot.0 - punter_pos.0).abs();
            BallOwner::Kicked {
                from: punter_pos,
                to: catch_spot,
                progress: window(t, PUNT_AT, CATCH_AT),
                arc_height: arc_height_for(dist, FLIGHT_ARC_SCALE * 1.4),
            }
        } else {
            BallOwner::Held { side: SquadSide::Defense, index: returner }
        };
        let ball = BallState::from_owner(owner, &off, &def);

        let camera = if (PUNT_AT..CATCH_AT).contains(&t) {
            CameraHint::focused(CameraPreset::KickArc, ball.pos)
        } else {
            CameraHint::focused(CameraPreset::FollowBall, ball.pos)
        };
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}
