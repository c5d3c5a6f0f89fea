//! Dead-ball development: kneels, spikes, touchbacks, and the pregame
//! ceremonies. Nothing contested happens; these keep the scene alive
//! between real plays.

use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::ball::{BallOwner, BallState};
use crate::models::entity::{find_role, AnimState, EntityState, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
use crate::models::outcome::PlayType;

pub struct DeadBallTemplate;

impl PlayTemplate for DeadBallTemplate {
    fn name(&self) -> &'static str {
        "dead-ball"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        match ctx.outcome.play_type {
            PlayType::Spike => 1000,
            PlayType::Kneel => 1400,
            PlayType::Touchback => 1600,
            PlayType::Pregame => 2500,
            PlayType::CoinToss => 3000,
            _ => 1400,
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
        match ctx.outcome.play_type {
            PlayType::CoinToss | PlayType::Pregame => {
                let midfield = (50.0, 50.0);
                let walk = ease_in_out_quad(window(t, 0.0, 0.6));
                let gather = |squad: &[EntityState], side: f32| -> Vec<EntityState> {
                    squad
                        .iter()
                        .enumerate()
                        .map(|(i, e)| {
                            // Three captains meet at the logo, the rest
                            // hold their line.
                            if i < 3 {
                                let spot = (
                                    midfield.0 + side * yards(2.0),
                                    midfield.1 + (i as f32 - 1.0) * 3.0,
                                );
                                let mut c = e.at(lerp_pos(e.pos, clamp_pos(spot), walk));
                                c.anim =
                                    if walk > 0.0 && t < 0.6 { AnimState::Running } else { AnimState::Idle };
                                c
                            } else {
                                let mut s = e.clone();
                                s.anim = AnimState::Idle;
                                s
                            }
                        })
                        .collect()
                };
                let off = gather(offense, -ctx.dir);
                let def = gather(defense, ctx.dir);
                let ball = BallState::resting(midfield);
                let camera = CameraHint::focused(CameraPreset::Broadcast, midfield);
                ChoreographyFrame::new(off, def, ball, camera).clamped()
            }
            PlayType::Touchback => {
                // The deep man takes the knee where the ball came down.
                let carrier = find_role(defense, Role::Returner);
                let def: Vec<EntityState> = defense
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        let mut d = e.clone();
                        d.anim = if i == carrier && t > 0.3 { AnimState::Celebrating } else { AnimState::Idle };
                        d
                    })
                    .collect();
                let off: Vec<EntityState> = offense
                    .iter()
                    .map(|e| {
                        let mut o = e.clone();
                        o.anim = AnimState::Idle;
                        o
                    })
                    .collect();
                let ball = BallState::from_owner(
                    BallOwner::Held { side: SquadSide::Defense, index: carrier },
                    &off,
                    &def,
                );
                let camera = CameraHint::focused(CameraPreset::FollowBall, ball.pos);
                ChoreographyFrame::new(off, def, ball, camera).clamped()
            }
            // Kneel and spike: a snap and an immediate end.
            _ => {
                let qb = find_role(offense, Role::Quarterback);
                let spike = ctx.outcome.play_type == PlayType::Spike;
                let qb_start = offense.get(qb).map(|e| e.pos).unwrap_or((ctx.los_pct, 50.0));
                let qb_pos = if spike {
                    qb_start
                } else {
                    lerp_pos(
                        qb_start,
                        clamp_pos((qb_start.0 - ctx.dir * yards(1.5), qb_start.1)),
                        ease_out_cubic(window(t, 0.1, 0.6)),
                    )
                };

                let off: Vec<EntityState> = offense
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        if i == qb {
                            let mut q = e.at(qb_pos);
                            q.anim = if spike && (0.2..0.5).contains(&t) {
                                AnimState::Throwing
                            } else {
                                AnimState::Idle
                            };
                            return q;
                        }
                        let mut l = e.clone();
                        l.anim = if t < 0.6 { AnimState::Blocking } else { AnimState::Idle };
                        l
                    })
                    .collect();
                let def: Vec<EntityState> = defense
                    .iter()
                    .map(|e| {
                        let mut d = e.clone();
                        d.anim = AnimState::Idle;
                        d
                    })
                    .collect();

                let owner = if spike && t >= 0.35 {
                    BallOwner::Ground { at: (qb_pos.0, qb_pos.1 + 1.0) }
                } else {
                    BallOwner::Held { side: SquadSide::Offense, index: qb }
                };
                let ball = BallState::from_owner(owner, &off, &def);
                let camera = CameraHint::focused(CameraPreset::LineOfScrimmage, (ctx.los_pct, 50.0));
                ChoreographyFrame::new(off, def, ball, camera).clamped()
            }
        }
    }
}
