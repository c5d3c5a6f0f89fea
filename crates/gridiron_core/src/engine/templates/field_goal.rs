//! Field-goal and extra-point development: snap, hold, a kicked arc at
//! the upright, and the reaction. A miss still flies the full arc, just
//! wide of the post.

use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, goalpost_pct, lateral_yards, pct_to_yard_line, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::ball::{arc_height_for, BallOwner, BallState, FLIGHT_ARC_SCALE};
use crate::models::entity::{find_role, AnimState, EntityState, FieldPos, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};

/// Snap leaves the center.
const SNAP_AT: f32 = 0.03;

/// Holder receives and places the ball.
const HOLD_AT: f32 = 0.1;

/// Kicker strikes the ball.
const KICK_AT: f32 = 0.18;

/// Ball reaches the upright.
const ARRIVE_AT: f32 = 0.85;

/// Lateral miss distance at the post, in yards.
const MISS_WIDE_YARDS: f32 = 4.0;

pub struct FieldGoalTemplate;

impl FieldGoalTemplate {
    fn made(ctx: &PlayContext) -> bool {
        ctx.outcome.scored()
    }

    fn post_spot(ctx: &PlayContext) -> FieldPos {
        let lateral = if Self::made(ctx) {
            50.0
        } else {
            50.0 + lateral_yards(MISS_WIDE_YARDS)
        };
        (goalpost_pct(ctx.possession), lateral)
    }
}

impl PlayTemplate for FieldGoalTemplate {
    fn name(&self) -> &'static str {
        "field-goal"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        // Longer attempts hang in the air longer.
        let attempt_yards = (100.0 - pct_to_yard_line(ctx.los_pct, ctx.possession)) + 17.0;
        2600 + attempt_yards as u64 * 12
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let made = Self::made(ctx);
        let post = Self::post_spot(ctx);

        let snapper = find_role(offense, Role::Center);
        let holder = find_role(offense, Role::Holder);
        let kicker = find_role(offense, Role::Kicker);

        let snapper_pos = offense.get(snapper).map(|e| e.pos).unwrap_or((ctx.los_pct, 50.0));
        let hold_spot = offense.get(holder).map(|e| e.pos).unwrap_or((ctx.los_pct, 50.0));

        let off: Vec<EntityState> = offense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == kicker {
                    let approach =
                        lerp_pos(e.pos, hold_spot, ease_out_cubic(window(t, HOLD_AT, KICK_AT + 0.04)) * 0.8);
                    let mut k = e.at(approach);
                    k.anim = if (KICK_AT - 0.02..KICK_AT + 0.1).contains(&t) {
                        AnimState::Kicking
                    } else if made && t > ARRIVE_AT {
                        AnimState::Celebrating
                    } else if (HOLD_AT..KICK_AT).contains(&t) {
                        AnimState::Running
                    } else {
                        AnimState::Idle
                    };
                    return k;
                }
                if i == holder {
                    let mut h = e.clone();
                    h.anim = if (HOLD_AT - 0.03..HOLD_AT + 0.05).contains(&t) {
                        AnimState::Catching
                    } else if made && t > ARRIVE_AT {
                        AnimState::Celebrating
                    } else {
                        AnimState::Idle
                    };
                    return h;
                }
                // Protection anchors and absorbs the push.
                let mut l = e.clone();
                let give = ease_out_cubic(window(t, SNAP_AT, KICK_AT + 0.1));
                l.pos = clamp_pos((e.pos.0 - ctx.dir * yards(0.3) * give, e.pos.1));
                l.anim = AnimState::Blocking;
                l
            })
            .collect();

        let def: Vec<EntityState> = defense
            .iter()
            .enumerate()
            .map(|(i, e)| match e.role {
                Role::DefensiveLine => {
                    let push = lerp_pos(
                        e.pos,
                        (e.pos.0 - ctx.dir * yards(1.2), e.pos.1),
                        ease_out_cubic(window(t, SNAP_AT, KICK_AT + 0.1)),
                    );
                    let mut d = e.at(clamp_pos(push));
                    d.anim = AnimState::Blocking;
                    // Interior rushers get their hands up at the strike.
                    if i % 2 == 0 && (KICK_AT..KICK_AT + 0.12).contains(&t) {
                        d.height = 1.0;
                    }
                    d
                }
                Role::Linebacker => {
                    let mut d = e.clone();
                    if (KICK_AT - 0.02..KICK_AT + 0.1).contains(&t) {
                        d.height = 1.4;
                    }
                    d.anim = AnimState::Blocking;
                    d
                }
                _ => e.clone(),
            })
            .collect();

        let owner = if t < SNAP_AT {
            BallOwner::Held { side: SquadSide::Offense, index: snapper }
        } else if t < HOLD_AT {
            BallOwner::Flight {
                from: snapper_pos,
                to: hold_spot,
                progress: window(t, SNAP_AT, HOLD_AT),
            }
        } else if t < KICK_AT {
            BallOwner::Ground { at: hold_spot }
        } else if t < ARRIVE_AT {
            let dist = (post.0 - hold_spot.0).abs();
            BallOwner::Kicked {
                from: hold_spot,
                to: post,
                progress: window(t, KICK_AT, ARRIVE_AT),
                arc_height: arc_height_for(dist, FLIGHT_ARC_SCALE * 1.2),
            }
        } else {
            BallOwner::Ground { at: post }
        };
        let ball = BallState::from_owner(owner, &off, &def);

        let camera = if t >= ARRIVE_AT && made {
            CameraHint::focused(CameraPreset::Celebration, hold_spot)
        } else if t >= KICK_AT {
            CameraHint::focused(CameraPreset::KickArc, ball.pos)
        } else {
            CameraHint::focused(CameraPreset::LineOfScrimmage, (ctx.los_pct, 50.0))
        };
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}
