//! Run and scramble development
//!
//! Carrier weave toward the destination spot, linemen drive-blocking, and
//! staggered defensive pursuit converging on the carrier. Scrambles keep
//! the quarterback as the carrier; everything else hands off early.

use super::common::{carrier_path, nearest_to, staggered_pursuit, surge};
use super::PlayTemplate;
use crate::engine::context::PlayContext;
use crate::engine::coordinates::{lateral_yards, yards};
use crate::engine::easing::{ease_out_cubic, lerp_pos, window};
use crate::models::ball::{BallOwner, BallState};
use crate::models::entity::{find_role, AnimState, EntityState, Role, SquadSide};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
use crate::models::outcome::PlayType;

/// Handoff completes this far into development.
const HANDOFF_AT: f32 = 0.12;

/// Carrier reaches the destination spot by this progress; the remainder
/// is the tackle/step-out beat.
const CARRY_END: f32 = 0.95;

pub struct RunTemplate;

impl PlayTemplate for RunTemplate {
    fn name(&self) -> &'static str {
        "run"
    }

    fn development_ms(&self, ctx: &PlayContext) -> u64 {
        let yards = ctx.outcome.yards_gained.unsigned_abs().min(40) as u64;
        2200 + yards * 55
    }

    fn development(
        &self,
        t: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame {
        let t = t.clamp(0.0, 1.0);
        let qb = find_role(offense, Role::Quarterback);
        let carrier = if ctx.outcome.play_type == PlayType::Scramble {
            qb
        } else {
            find_role(offense, Role::RunningBack)
        };

        let carrier_start = offense.get(carrier).map(|e| e.pos).unwrap_or((50.0, 50.0));
        let carry_t = window(t, HANDOFF_AT, CARRY_END);
        let carrier_pos = carrier_path(carrier_start, (ctx.destination_pct, 50.0), carry_t, 2.5);

        let mut off: Vec<EntityState> = offense
            .iter()
            .enumerate()
            .map(|(i, e)| match e.role {
                Role::Center | Role::Guard | Role::Tackle => surge(e, ctx.dir, 2.0, t),
                Role::TightEnd | Role::Fullback => surge(e, ctx.dir, 3.0, t),
                Role::WideReceiver => {
                    let mut wr = surge(e, ctx.dir, 8.0, t);
                    wr.anim =
                        if t < 0.4 { AnimState::Running } else { AnimState::Blocking };
                    wr
                }
                _ if i == carrier => e.clone(),
                Role::Quarterback => {
                    // Bootleg drift away from the mesh point after handoff.
                    let drift =
                        (e.pos.0 - ctx.dir * yards(1.0), e.pos.1 - lateral_yards(2.0));
                    let mut q = e.at(lerp_pos(e.pos, drift, ease_out_cubic(window(t, HANDOFF_AT, 0.6))));
                    q.anim = AnimState::Idle;
                    q
                }
                _ => e.clone(),
            })
            .collect();

        if let Some(c) = off.get_mut(carrier) {
            c.pos = carrier_pos;
            let weaving = (carry_t * 3.0 * std::f32::consts::PI).sin().abs() > 0.92;
            c.anim = if carry_t <= 0.0 {
                AnimState::Idle
            } else if weaving && carry_t < 0.9 {
                AnimState::Juking
            } else {
                AnimState::Running
            };
        }

        let mut def = staggered_pursuit(defense, carrier_pos, t, 1.2);
        if t > 0.85 {
            let closest = nearest_to(&def, carrier_pos);
            def[closest].anim = AnimState::Tackling;
        }

        let owner_index = if t < HANDOFF_AT { qb } else { carrier };
        let ball =
            BallState::from_owner(BallOwner::Held { side: SquadSide::Offense, index: owner_index }, &off, &def);

        let camera = CameraHint::focused(CameraPreset::FollowBall, ball.pos);
        ChoreographyFrame::new(off, def, ball, camera).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coordinates::yard_line_to_pct;
    use crate::models::entity::Possession;
    use crate::models::outcome::PlayOutcome;

    fn run_ctx(yards: i32, yard_line: f32, possession: Possession) -> PlayContext {
        let mut outcome = PlayOutcome::of_type(PlayType::Run);
        outcome.yards_gained = yards;
        outcome.formation = "singleback".into();
        PlayContext::new(outcome, yard_line, possession).unwrap()
    }

    fn snapshot(ctx: &PlayContext) -> (Vec<EntityState>, Vec<EntityState>) {
        use crate::engine::formation::{defense_slots, formation_entities, offense_slots};
        (
            formation_entities(offense_slots("singleback"), ctx.los_pct, ctx.dir, SquadSide::Offense),
            formation_entities(defense_slots("4-3"), ctx.los_pct, ctx.dir, SquadSide::Defense),
        )
    }

    #[test]
    fn test_full_rosters_and_bounds_at_every_progress() {
        let ctx = run_ctx(8, 35.0, Possession::Home);
        let (off, def) = snapshot(&ctx);
        for i in 0..=20 {
            let frame = RunTemplate.development(i as f32 / 20.0, &ctx, &off, &def);
            assert_eq!(frame.offense.len(), 11);
            assert_eq!(frame.defense.len(), 11);
            for e in frame.offense.iter().chain(frame.defense.iter()) {
                assert!((0.0..=100.0).contains(&e.pos.0));
                assert!((0.0..=100.0).contains(&e.pos.1));
            }
        }
    }

    #[test]
    fn test_carrier_ends_at_gain_spot() {
        // 8-yard run from the home 35 ends at the home 43.
        let ctx = run_ctx(8, 35.0, Possession::Home);
        let (off, def) = snapshot(&ctx);
        let frame = RunTemplate.development(1.0, &ctx, &off, &def);

        let carrier = find_role(&frame.offense, Role::RunningBack);
        let expected = yard_line_to_pct(43.0, Possession::Home);
        assert!(
            (frame.offense[carrier].pos.0 - expected).abs() < 0.5,
            "carrier at {} expected {expected}",
            frame.offense[carrier].pos.0
        );
    }

    #[test]
    fn test_ball_handoff_transfers_owner() {
        let ctx = run_ctx(8, 35.0, Possession::Home);
        let (off, def) = snapshot(&ctx);

        let before = RunTemplate.development(0.05, &ctx, &off, &def);
        let qb = find_role(&off, Role::Quarterback);
        assert_eq!(
            before.ball.owner,
            BallOwner::Held { side: SquadSide::Offense, index: qb }
        );

        let after = RunTemplate.development(0.5, &ctx, &off, &def);
        let rb = find_role(&off, Role::RunningBack);
        assert_eq!(
            after.ball.owner,
            BallOwner::Held { side: SquadSide::Offense, index: rb }
        );
    }

    #[test]
    fn test_quarterback_bootleg_drifts_in_yard_units() {
        let ctx = run_ctx(8, 35.0, Possession::Home);
        let (off, def) = snapshot(&ctx);
        let qb = find_role(&off, Role::Quarterback);
        let frame = RunTemplate.development(0.7, &ctx, &off, &def);
        let dx = frame.offense[qb].pos.0 - off[qb].pos.0;
        let dy = frame.offense[qb].pos.1 - off[qb].pos.1;
        assert!((dx + ctx.dir * yards(1.0)).abs() < 1e-3);
        assert!((dy + lateral_yards(2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_scramble_keeps_quarterback_as_carrier() {
        let mut outcome = PlayOutcome::of_type(PlayType::Scramble);
        outcome.yards_gained = 6;
        let ctx = PlayContext::new(outcome, 40.0, Possession::Away).unwrap();
        let (off, def) = snapshot(&ctx);

        let frame = RunTemplate.development(0.8, &ctx, &off, &def);
        let qb = find_role(&off, Role::Quarterback);
        assert_eq!(
            frame.ball.owner,
            BallOwner::Held { side: SquadSide::Offense, index: qb }
        );
    }

    #[test]
    fn test_defense_converges_on_carrier() {
        let ctx = run_ctx(10, 30.0, Possession::Away);
        let (off, def) = snapshot(&ctx);

        let frame = RunTemplate.development(1.0, &ctx, &off, &def);
        let carrier_pos = frame.ball.pos;
        let mean_dist: f32 = frame
            .defense
            .iter()
            .map(|e| {
                let dx = e.pos.0 - carrier_pos.0;
                let dy = e.pos.1 - carrier_pos.1;
                (dx * dx + dy * dy).sqrt()
            })
            .sum::<f32>()
            / 11.0;
        assert!(mean_dist < 8.0, "pursuit should close on the carrier, mean {mean_dist}");
    }

    #[test]
    fn test_development_scales_with_gain() {
        let short = run_ctx(2, 50.0, Possession::Home);
        let long = run_ctx(35, 50.0, Possession::Home);
        assert!(RunTemplate.development_ms(&long) > RunTemplate.development_ms(&short));
    }
}
