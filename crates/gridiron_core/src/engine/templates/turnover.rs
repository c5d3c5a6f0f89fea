//! Turnover development: the underlying play runs normally up to the
//! crossover instant, then possession flips mid-play. Interceptions pick
//! the ball out of the air; fumbles put it loose on the ground with a
//! deterministic wobble until a defender falls on it. Either way the
//! recovering defender returns the ball against the original direction.

use super::common::{carrier_path, loose_ball_jitter, nearest_to, staggered_pursuit};
use super::{template_for_type, PlayTemplate};
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{clamp_pos, yards};
use crate::engine::easing::{ease_out_cubic, lerp_pos, window};
use crate::models::ball::{BallOwner, BallState};
use crate::models::entity::{AnimState, EntityState, FieldPos, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
use crate::models::outcome::{TurnoverInfo, TurnoverKind};

/// Underlying-play progress the pre-turnover portion is played out to.
/// The interception cuts in earlier (mid-throw), the fumble later (the
/// carrier already running).
const INTERCEPT_CROSSOVER: f32 = 0.35;
const FUMBLE_CROSSOVER: f32 = 0.55;

/// Loose-ball scramble window after a fumble crossover.
const FUMBLE_LOOSE_LEN: f32 = 0.15;

/// Flight window after an interception crossover, the errant throw still
/// in the air while the defender closes under it.
const INTERCEPT_FLIGHT_LEN: f32 = 0.1;

pub struct TurnoverTemplate;

impl TurnoverTemplate {
    fn info(ctx: &PlayContext) -> TurnoverInfo {
        ctx.outcome
            .turnover
            .unwrap_or(TurnoverInfo { kind: TurnoverKind::Fumble, return_yards: 0 })
    }

    fn crossover(kind: TurnoverKind) -> f32 {
        match kind {
            TurnoverKind::Interception => INTERCEPT_CROSSOVER,
            TurnoverKind::Fumble => FUMBLE_CROSSOVER,
        }
    }

    /// Where possession changes hands. The return measures backward from
    /// here, so this sits `return_yards` upfield of the final spot.
    fn flip_spot(ctx: &PlayContext) -> FieldPos {
        clamp_pos((ctx.los_pct + ctx.dir * yards(ctx.outcome.yards_gained as f32), 50.0))
    }
}

impl PlayTemplate for TurnoverTemplate {
    fn name(&self) -> &'static str {
        "turnover"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        let info = Self::info(ctx);
        let base = template_for_type(ctx.outcome.play_type).development_ms(ctx);
        base + 600 + (info.return_yards.clamp(0, 40) as u64) * 45
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let info = Self::info(ctx);
        let crossover = Self::crossover(info.kind);
        let inner = template_for_type(ctx.outcome.play_type);
        let flip_spot = Self::flip_spot(ctx);
        let return_end = ctx.destination_pct;

        // Pre-turnover portion: the underlying play, frozen at its
        // crossover instant once the flip happens.
        let inner_t = (t / crossover).min(1.0) * crossover;
        let base = inner.development(inner_t, ctx, offense, defense);

        if t < crossover {
            return base;
        }

        let recoverer = nearest_to(&base.defense, flip_spot);

        let loose_until = match info.kind {
            TurnoverKind::Interception => crossover + INTERCEPT_FLIGHT_LEN,
            TurnoverKind::Fumble => crossover + FUMBLE_LOOSE_LEN,
        };

        // Recovering defender closes on the spot, then runs the return
        // out against the original offensive direction.
        let run_back = window(t, loose_until, 0.95);
        let recover_pos = if t < loose_until {
            let close = ease_out_cubic(window(t, crossover, loose_until));
            lerp_pos(base.defense[recoverer].pos, flip_spot, close)
        } else if info.return_yards <= 0 {
            flip_spot
        } else {
            carrier_path(flip_spot, (return_end, flip_spot.1), run_back, 2.0)
        };

        let mut def: Vec<EntityState> = base
            .defense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i == recoverer {
                    let mut r = e.at(recover_pos);
                    r.anim = if t < loose_until {
                        AnimState::Running
                    } else if (loose_until..loose_until + 0.08).contains(&t) {
                        AnimState::Catching
                    } else if info.return_yards > 0 {
                        AnimState::Returning
                    } else {
                        AnimState::Idle
                    };
                    return r;
                }
                // Everyone else turns into a blocking convoy around the
                // runner.
                let convoy = (
                    recover_pos.0 - ctx.dir * yards(-2.0 + (i % 5) as f32 * 1.5),
                    recover_pos.1 + ((i as f32) - 5.0) * 3.5,
                );
                let mut b = e.at(lerp_pos(
                    e.pos,
                    clamp_pos(convoy),
                    ease_out_cubic(window(t, crossover, 1.0)) * 0.7,
                ));
                b.anim = AnimState::Blocking;
                b
            })
            .collect();

        // The offense flips to chasing the new ball carrier.
        let off = staggered_pursuit(&base.offense, recover_pos, window(t, crossover + 0.05, 1.0), 1.5);

        let owner = match info.kind {
            TurnoverKind::Interception if t < loose_until => BallOwner::Flight {
                from: base.ball.pos,
                to: flip_spot,
                progress: window(t, crossover, loose_until),
            },
            TurnoverKind::Interception => {
                BallOwner::Held { side: SquadSide::Defense, index: recoverer }
            }
            TurnoverKind::Fumble if t < loose_until => BallOwner::Ground {
                at: loose_ball_jitter(ctx.seed, window(t, crossover, loose_until), flip_spot),
            },
            TurnoverKind::Fumble => {
                BallOwner::Held { side: SquadSide::Defense, index: recoverer }
            }
        };
        let ball = BallState::from_owner(owner, &off, &def);

        if let Some(r) = def.get_mut(recoverer) {
            if t >= loose_until && info.return_yards > 0 {
                r.facing = (flip_spot.1 - r.pos.1).atan2(return_end - r.pos.0);
            }
        }

        let shake = if (crossover..crossover + 0.1).contains(&t) { 0.5 } else { 0.0 };
        let camera = CameraHint::focused(CameraPreset::FollowBall, ball.pos).with_shake(shake);
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::formation::{defense_slots, formation_entities, offense_slots};
    use crate::models::entity::Possession;
    use crate::models::outcome::{PlayOutcome, PlayType};

    fn ctx_of(kind: TurnoverKind, play_type: PlayType, gained: i32, returned: i32) -> PlayContext {
        let mut outcome = PlayOutcome::of_type(play_type);
        outcome.yards_gained = gained;
        outcome.turnover = Some(TurnoverInfo { kind, return_yards: returned });
        PlayContext::new(outcome, 45.0, Possession::Away).unwrap()
    }

    fn snapshot(ctx: &PlayContext) -> (Vec<EntityState>, Vec<EntityState>) {
        (
            formation_entities(offense_slots("shotgun"), ctx.los_pct, ctx.dir, SquadSide::Offense),
            formation_entities(defense_slots("4-3"), ctx.los_pct, ctx.dir, SquadSide::Defense),
        )
    }

    #[test]
    fn test_pre_crossover_matches_underlying_play() {
        let ctx = ctx_of(TurnoverKind::Fumble, PlayType::Run, 6, 4);
        let (off, def) = snapshot(&ctx);
        let a = TurnoverTemplate.development(0.3, &ctx, &off, &def);
        let b = template_for_type(PlayType::Run).development(0.3, &ctx, &off, &def);
        assert_eq!(a.offense, b.offense);
        assert_eq!(a.ball, b.ball);
    }

    #[test]
    fn test_fumble_goes_loose_then_recovered_by_defense() {
        let ctx = ctx_of(TurnoverKind::Fumble, PlayType::Run, 6, 4);
        let (off, def) = snapshot(&ctx);

        let loose = TurnoverTemplate.development(FUMBLE_CROSSOVER + 0.05, &ctx, &off, &def);
        assert!(matches!(loose.ball.owner, BallOwner::Ground { .. }));

        let held = TurnoverTemplate.development(0.9, &ctx, &off, &def);
        assert!(matches!(
            held.ball.owner,
            BallOwner::Held { side: SquadSide::Defense, .. }
        ));
    }

    #[test]
    fn test_loose_ball_wobble_is_deterministic() {
        let ctx = ctx_of(TurnoverKind::Fumble, PlayType::Run, 6, 4);
        let (off, def) = snapshot(&ctx);
        let t = FUMBLE_CROSSOVER + 0.08;
        let a = TurnoverTemplate.development(t, &ctx, &off, &def);
        let b = TurnoverTemplate.development(t, &ctx, &off, &def);
        assert_eq!(a.ball, b.ball);
    }

    #[test]
    fn test_interception_stays_in_flight_across_the_crossover() {
        let ctx = ctx_of(TurnoverKind::Interception, PlayType::PassComplete, 12, 8);
        let (off, def) = snapshot(&ctx);

        let before =
            TurnoverTemplate.development(INTERCEPT_CROSSOVER - 0.01, &ctx, &off, &def);
        let after =
            TurnoverTemplate.development(INTERCEPT_CROSSOVER + 0.01, &ctx, &off, &def);
        assert!(matches!(after.ball.owner, BallOwner::Flight { .. }));
        let dx = after.ball.pos.0 - before.ball.pos.0;
        let dy = after.ball.pos.1 - before.ball.pos.1;
        assert!(
            (dx * dx + dy * dy).sqrt() < 2.5,
            "ball must carry over from the throw, not jump to the pick spot"
        );

        // The defender is under the throw by the time it comes down.
        let landing = INTERCEPT_CROSSOVER + INTERCEPT_FLIGHT_LEN + 0.01;
        let caught = TurnoverTemplate.development(landing, &ctx, &off, &def);
        match caught.ball.owner {
            BallOwner::Held { side, index } => {
                assert_eq!(side, SquadSide::Defense);
                let flip = TurnoverTemplate::flip_spot(&ctx);
                let d = caught.defense[index].pos;
                let dist = ((d.0 - flip.0).powi(2) + (d.1 - flip.1).powi(2)).sqrt();
                assert!(dist < 1.0);
            }
            other => panic!("expected held ball, got {other:?}"),
        }
    }

    #[test]
    fn test_interception_never_touches_the_ground() {
        let ctx = ctx_of(TurnoverKind::Interception, PlayType::PassComplete, 12, 8);
        let (off, def) = snapshot(&ctx);
        for i in 0..=20 {
            let frame = TurnoverTemplate.development(i as f32 / 20.0, &ctx, &off, &def);
            assert!(
                !matches!(frame.ball.owner, BallOwner::Ground { .. }),
                "interception ball must never be a dead ground ball"
            );
        }
    }

    #[test]
    fn test_return_runs_against_offense_direction() {
        let ctx = ctx_of(TurnoverKind::Interception, PlayType::PassComplete, 12, 8);
        let (off, def) = snapshot(&ctx);
        let flip = TurnoverTemplate::flip_spot(&ctx);
        // Away offense drives toward increasing percent, so the return
        // spot ends below the flip spot.
        assert!(ctx.destination_pct < flip.0);

        let done = TurnoverTemplate.development(0.95, &ctx, &off, &def);
        match done.ball.owner {
            BallOwner::Held { side, index } => {
                assert_eq!(side, SquadSide::Defense);
                assert!((done.defense[index].pos.0 - ctx.destination_pct).abs() < 1.5);
            }
            other => panic!("expected held ball, got {other:?}"),
        }
    }

    #[test]
    fn test_offense_chases_after_crossover() {
        let ctx = ctx_of(TurnoverKind::Interception, PlayType::PassComplete, 12, 8);
        let (off, def) = snapshot(&ctx);
        let at_flip = TurnoverTemplate.development(INTERCEPT_CROSSOVER + 0.1, &ctx, &off, &def);
        let late = TurnoverTemplate.development(1.0, &ctx, &off, &def);

        let carrier = match late.ball.owner {
            BallOwner::Held { index, .. } => late.defense[index].pos,
            _ => panic!("expected held ball"),
        };
        let mean = |frame: &ChoreographyFrame, to: FieldPos| -> f32 {
            frame
                .offense
                .iter()
                .map(|e| {
                    let dx = e.pos.0 - to.0;
                    let dy = e.pos.1 - to.1;
                    (dx * dx + dy * dy).sqrt()
                })
                .sum::<f32>()
                / frame.offense.len() as f32
        };
        assert!(mean(&late, carrier) < mean(&at_flip, carrier));
    }

    #[test]
    fn test_bounds_and_rosters() {
        for kind in [TurnoverKind::Interception, TurnoverKind::Fumble] {
            let ctx = ctx_of(kind, PlayType::Run, 5, 10);
            let (off, def) = snapshot(&ctx);
            for i in 0..=20 {
                let frame = TurnoverTemplate.development(i as f32 / 20.0, &ctx, &off, &def);
                assert_eq!(frame.offense.len(), 11);
                assert_eq!(frame.defense.len(), 11);
                for e in frame.offense.iter().chain(frame.defense.iter()) {
                    assert!((0.0..=100.0).contains(&e.pos.0));
                    assert!((0.0..=100.0).contains(&e.pos.1));
                }
            }
        }
    }
}
