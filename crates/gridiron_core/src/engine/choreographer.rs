//! Play choreographer
//!
//! Turns one outcome record into a fully seekable animation script, and
//! drives scripts through wall-clock time. A [`PlayScript`] is a pure
//! function of (outcome, spot, possession): any elapsed time maps to
//! exactly one frame, so seeking, replaying and re-rendering are all
//! free. The [`Choreographer`] layers mutable playback state on top for
//! callers that just want to advance a clock.

use tracing::{debug, info};

use super::context::PlayContext;
use super::coordinates::clamp_pos;
use super::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use super::formation::{
    defense_slots, formation_entities, huddle_oval, idle_line, offense_slots, relaxed_spread,
};
use super::templates::{template_for, PlayTemplate};
use super::timing::{PhaseTimingTable, PlayPhase};
use crate::error::Result;
use crate::models::ball::{BallOwner, BallState};
use crate::models::entity::{
    find_role, AnimState, EntityState, FieldPos, Possession, Role, SquadSide,
};
use crate::models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
use crate::models::outcome::PlayOutcome;

/// A compiled play: context, timing, formation snapshot and template,
/// all fixed at creation. Frames are derived on demand.
pub struct PlayScript {
    ctx: PlayContext,
    timing: PhaseTimingTable,
    offense: Vec<EntityState>,
    defense: Vec<EntityState>,
    template: &'static dyn PlayTemplate,
}

impl PlayScript {
    /// Compile an outcome record into a script. `ball_on_yard` is the
    /// possession-relative spot the play starts from.
    pub fn compile(
        outcome: PlayOutcome,
        ball_on_yard: f32,
        possession: Possession,
    ) -> Result<Self> {
        let ctx = PlayContext::new(outcome, ball_on_yard, possession)?;
        let template = template_for(&ctx.outcome);
        let timing =
            PhaseTimingTable::for_play(ctx.outcome.play_type, template.development_ms(&ctx));
        let offense = formation_entities(
            offense_slots(&ctx.outcome.formation),
            ctx.los_pct,
            ctx.dir,
            SquadSide::Offense,
        );
        let defense = formation_entities(
            defense_slots(&ctx.outcome.defense_personnel),
            ctx.los_pct,
            ctx.dir,
            SquadSide::Defense,
        );

        info!(
            play_type = ?ctx.outcome.play_type,
            template = template.name(),
            total_ms = timing.total_ms(),
            "compiled play script"
        );
        Ok(Self { ctx, timing, offense, defense, template })
    }

    pub fn context(&self) -> &PlayContext {
        &self.ctx
    }

    pub fn timing(&self) -> &PhaseTimingTable {
        &self.timing
    }

    pub fn total_ms(&self) -> u64 {
        self.timing.total_ms()
    }

    /// Phase and progress at an elapsed time.
    pub fn phase_at(&self, elapsed_ms: u64) -> (PlayPhase, f32) {
        self.timing.phase_at(elapsed_ms)
    }

    fn ball_spot(&self) -> FieldPos {
        (self.ctx.los_pct, 50.0)
    }

    /// Frame at an arbitrary elapsed time. Same input, same frame.
    pub fn frame_at(&self, elapsed_ms: u64) -> ChoreographyFrame {
        let (phase, progress) = self.timing.phase_at(elapsed_ms);
        debug!(?phase, progress, "frame query");
        match phase {
            PlayPhase::Huddle => self.huddle_frame(progress),
            PlayPhase::Break => self.break_frame(progress),
            PlayPhase::Set => self.set_frame(progress),
            PlayPhase::Motion => self.motion_frame(progress),
            PlayPhase::Snap => self.snap_frame(progress),
            PlayPhase::Development => {
                self.template.development(progress, &self.ctx, &self.offense, &self.defense)
            }
            PlayPhase::Result => self.result_frame(progress),
            PlayPhase::Whistle => self.whistle_frame(),
            PlayPhase::Reset => self.reset_frame(progress),
            PlayPhase::Idle => self.idle_end_frame(),
        }
    }

    /// Both squads ease from the idle lines the previous play left them
    /// in toward the huddle oval and the relaxed defensive spread.
    fn huddle_frame(&self, progress: f32) -> ChoreographyFrame {
        let ball = self.ball_spot();
        let eased = ease_in_out_quad(window(progress, 0.0, 0.6));
        let gather = |squad: &[EntityState], side: SquadSide, to: &[FieldPos]| -> Vec<EntityState> {
            squad
                .iter()
                .zip(idle_line(ball, self.ctx.dir, side).iter())
                .zip(to.iter())
                .map(|((e, &from), &dest)| {
                    let mut moved = e.at(lerp_pos(from, dest, eased));
                    moved.anim =
                        if (0.02..0.6).contains(&progress) { AnimState::Running } else { AnimState::Idle };
                    moved
                })
                .collect()
        };
        let off = gather(&self.offense, SquadSide::Offense, &huddle_oval(ball, self.ctx.dir));
        let def = gather(&self.defense, SquadSide::Defense, &relaxed_spread(ball, self.ctx.dir));
        ChoreographyFrame::new(
            off,
            def,
            BallState::resting(ball),
            CameraHint::focused(CameraPreset::Broadcast, ball),
        )
        .clamped()
    }

    /// Both squads jog from their huddle spots to their formation spots.
    fn break_frame(&self, progress: f32) -> ChoreographyFrame {
        let ball = self.ball_spot();
        let eased = ease_in_out_quad(progress);
        let from_off = huddle_oval(ball, self.ctx.dir);
        let from_def = relaxed_spread(ball, self.ctx.dir);

        let walk = |squad: &[EntityState], from: &[FieldPos]| -> Vec<EntityState> {
            squad
                .iter()
                .zip(from.iter())
                .map(|(e, &start)| {
                    let mut moved = e.at(lerp_pos(start, e.pos, eased));
                    moved.anim =
                        if progress < 0.95 { AnimState::Running } else { AnimState::Idle };
                    moved
                })
                .collect()
        };
        ChoreographyFrame::new(
            walk(&self.offense, &from_off),
            walk(&self.defense, &from_def),
            BallState::resting(ball),
            CameraHint::focused(CameraPreset::Broadcast, ball),
        )
        .clamped()
    }

    /// Set and hold: a faint sinusoidal weight shift keeps the line
    /// alive, and the snapper has hands on the ball.
    fn set_frame(&self, progress: f32) -> ChoreographyFrame {
        let sway = |squad: &[EntityState]| -> Vec<EntityState> {
            squad
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let phase = progress * 4.0 * std::f32::consts::PI + i as f32;
                    e.at(clamp_pos((e.pos.0, e.pos.1 + phase.sin() * 0.06)))
                })
                .collect()
        };
        let off = sway(&self.offense);
        let def = sway(&self.defense);
        let ball = BallState::from_owner(self.pre_snap_owner(), &off, &def);
        ChoreographyFrame::new(
            off,
            def,
            ball,
            CameraHint::focused(CameraPreset::LineOfScrimmage, self.ball_spot()),
        )
        .clamped()
    }

    /// Ball state once the offense is set: on the snapper when the
    /// formation has one, on the tee otherwise.
    fn pre_snap_owner(&self) -> BallOwner {
        let snapper = find_role(&self.offense, Role::Center);
        if self.offense.get(snapper).map(|e| e.role) == Some(Role::Center) {
            BallOwner::Held { side: SquadSide::Offense, index: snapper }
        } else {
            BallOwner::Ground { at: self.ball_spot() }
        }
    }

    /// One receiver jogs across the formation and settles back down.
    fn motion_frame(&self, progress: f32) -> ChoreographyFrame {
        let mover = self
            .offense
            .iter()
            .rposition(|e| e.role == Role::WideReceiver)
            .unwrap_or(self.offense.len() - 1);
        let swing = (progress * std::f32::consts::PI).sin();

        let off: Vec<EntityState> = self
            .offense
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if i != mover {
                    return e.clone();
                }
                let across = lerp_pos(e.pos, (e.pos.0, 50.0), swing * 0.6);
                let mut m = e.at(clamp_pos(across));
                m.anim = if swing > 0.05 { AnimState::Running } else { AnimState::Idle };
                m
            })
            .collect();
        let ball = BallState::from_owner(self.pre_snap_owner(), &off, &self.defense);
        ChoreographyFrame::new(
            off,
            self.defense.clone(),
            ball,
            CameraHint::focused(CameraPreset::LineOfScrimmage, self.ball_spot()),
        )
        .clamped()
    }

    /// The exchange that arms the development phase: ball travels from
    /// the line to the first backfield handler.
    fn snap_frame(&self, progress: f32) -> ChoreographyFrame {
        let snapper = find_role(&self.offense, Role::Center);
        let receiver = find_role(&self.offense, Role::Quarterback);

        // Kick-game exchanges (long snap, hold, tee) are choreographed by
        // their templates; the snap phase leaves the ball pre-snap there.
        let owner = if self.ctx.outcome.play_type.is_special() || snapper == receiver {
            self.pre_snap_owner()
        } else if progress < 0.5 {
            // The exchange is airborne for the first half of the phase
            // and in the handler's hands from the midpoint on.
            BallOwner::Flight {
                from: self.offense[snapper].pos,
                to: self.offense[receiver].pos,
                progress: ease_out_cubic(progress / 0.5),
            }
        } else {
            BallOwner::Held { side: SquadSide::Offense, index: receiver }
        };
        let ball = BallState::from_owner(owner, &self.offense, &self.defense);
        ChoreographyFrame::new(
            self.offense.clone(),
            self.defense.clone(),
            ball,
            CameraHint::focused(CameraPreset::LineOfScrimmage, self.ball_spot()),
        )
        .clamped()
    }

    /// Hold the development end state while the outcome registers:
    /// scorers celebrate, everyone else winds down.
    fn result_frame(&self, progress: f32) -> ChoreographyFrame {
        let mut frame = self.template.development(1.0, &self.ctx, &self.offense, &self.defense);
        let scored = self.ctx.outcome.scored();

        let carrier = match frame.ball.owner {
            BallOwner::Held { side, index } => Some((side, index)),
            _ => None,
        };
        // Settle: a small drift back toward the lateral center while the
        // outcome registers.
        let settle = ease_in_out_quad(progress) * 0.12;
        for e in frame.offense.iter_mut().chain(frame.defense.iter_mut()) {
            e.anim = AnimState::Idle;
            e.pos = lerp_pos(e.pos, (e.pos.0, 50.0), settle);
        }
        if let Some((side, index)) = carrier {
            let squad = match side {
                SquadSide::Offense => &mut frame.offense,
                SquadSide::Defense => &mut frame.defense,
            };
            if let Some(c) = squad.get_mut(index) {
                c.anim = if scored { AnimState::Celebrating } else { AnimState::Idle };
            }
        }

        frame.camera = if scored {
            let shake = (0.6 * (1.0 - progress)).max(0.0);
            CameraHint::focused(CameraPreset::Celebration, frame.ball.pos).with_shake(shake)
        } else {
            CameraHint::focused(CameraPreset::FollowBall, frame.ball.pos)
        };
        frame
    }

    fn whistle_frame(&self) -> ChoreographyFrame {
        let mut frame = self.template.development(1.0, &self.ctx, &self.offense, &self.defense);
        for e in frame.offense.iter_mut().chain(frame.defense.iter_mut()) {
            e.anim = AnimState::Idle;
        }
        // The ball settles to the ground exactly where development left
        // it; the new spot is marked there, not re-derived.
        frame.ball = BallState::resting(frame.ball.pos);
        frame.camera = CameraHint::new(CameraPreset::Broadcast);
        frame
    }

    /// Everyone walks off the end state toward loose pre-play lines
    /// around the new spot.
    fn reset_frame(&self, progress: f32) -> ChoreographyFrame {
        let end = self.whistle_frame();
        let next_spot = (self.ctx.destination_pct, 50.0);
        let eased = ease_in_out_quad(progress);

        let walk_off = |squad: &[EntityState], spots: &[FieldPos]| -> Vec<EntityState> {
            squad
                .iter()
                .zip(spots.iter())
                .map(|(e, &spot)| {
                    let mut moved = e.at(lerp_pos(e.pos, spot, eased));
                    moved.anim =
                        if progress < 0.9 { AnimState::Running } else { AnimState::Idle };
                    moved
                })
                .collect()
        };
        let off = walk_off(
            &end.offense,
            &idle_line(next_spot, self.ctx.dir, SquadSide::Offense),
        );
        let def = walk_off(
            &end.defense,
            &idle_line(next_spot, self.ctx.dir, SquadSide::Defense),
        );
        ChoreographyFrame::new(
            off,
            def,
            BallState::resting(next_spot),
            CameraHint::new(CameraPreset::Broadcast),
        )
        .clamped()
    }

    /// Fully wound down: both squads in their idle lines at the new spot.
    fn idle_end_frame(&self) -> ChoreographyFrame {
        idle_frame((self.ctx.destination_pct, 50.0), self.ctx.dir, &self.offense, &self.defense)
    }
}

/// Scene shown when no play is active: both squads lined up loosely
/// around the spot, dead ball on the ground.
pub fn idle_frame(
    spot: FieldPos,
    dir: f32,
    offense: &[EntityState],
    defense: &[EntityState],
) -> ChoreographyFrame {
    let place = |squad: &[EntityState], side: SquadSide| -> Vec<EntityState> {
        squad
            .iter()
            .zip(idle_line(spot, dir, side).iter())
            .map(|(e, &pos)| {
                let mut idle = e.at(pos);
                idle.anim = AnimState::Idle;
                idle
            })
            .collect()
    };
    ChoreographyFrame::new(
        place(offense, SquadSide::Offense),
        place(defense, SquadSide::Defense),
        BallState::resting(spot),
        CameraHint::new(CameraPreset::Broadcast),
    )
    .clamped()
}

/// Mutable playback driver over compiled scripts.
///
/// Feeds wall-clock deltas into the active script, hands out frames, and
/// retires plays once their timeline runs out. The spot carries forward
/// from play to play.
pub struct Choreographer {
    active: Option<(PlayScript, u64)>,
    rest_spot: FieldPos,
    rest_dir: f32,
    roster_offense: Vec<EntityState>,
    roster_defense: Vec<EntityState>,
}

impl Default for Choreographer {
    fn default() -> Self {
        Self::new()
    }
}

impl Choreographer {
    pub fn new() -> Self {
        let spot = (50.0, 50.0);
        let dir = 1.0;
        Self {
            active: None,
            rest_spot: spot,
            rest_dir: dir,
            roster_offense: formation_entities(
                offense_slots("shotgun"),
                spot.0,
                dir,
                SquadSide::Offense,
            ),
            roster_defense: formation_entities(
                defense_slots("4-3"),
                spot.0,
                dir,
                SquadSide::Defense,
            ),
        }
    }

    /// Start animating a new play. Any play still in flight is replaced.
    pub fn begin_play(
        &mut self,
        outcome: PlayOutcome,
        ball_on_yard: f32,
        possession: Possession,
    ) -> Result<()> {
        let script = PlayScript::compile(outcome, ball_on_yard, possession)?;
        self.rest_dir = script.ctx.dir;
        self.active = Some((script, 0));
        Ok(())
    }

    /// Advance playback. Returns the phase after the step.
    pub fn advance(&mut self, dt_ms: u64) -> PlayPhase {
        if let Some((script, elapsed)) = self.active.as_mut() {
            *elapsed = elapsed.saturating_add(dt_ms);
            if *elapsed >= script.total_ms() {
                self.rest_spot = (script.ctx.destination_pct, 50.0);
                self.roster_offense = script.offense.clone();
                self.roster_defense = script.defense.clone();
                debug!("play wound down, returning to idle");
                self.active = None;
                return PlayPhase::Idle;
            }
            return script.phase_at(*elapsed).0;
        }
        PlayPhase::Idle
    }

    pub fn phase(&self) -> PlayPhase {
        match &self.active {
            Some((script, elapsed)) => script.phase_at(*elapsed).0,
            None => PlayPhase::Idle,
        }
    }

    pub fn script(&self) -> Option<&PlayScript> {
        self.active.as_ref().map(|(script, _)| script)
    }

    /// Current frame: the active script's, or the idle scene.
    pub fn frame(&self) -> ChoreographyFrame {
        match &self.active {
            Some((script, elapsed)) => script.frame_at(*elapsed),
            None => idle_frame(
                self.rest_spot,
                self.rest_dir,
                &self.roster_offense,
                &self.roster_defense,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::outcome::{PlayOutcome, PlayType, ScoreKind};

    fn run_script(yards: i32) -> PlayScript {
        let mut outcome = PlayOutcome::of_type(PlayType::Run);
        outcome.yards_gained = yards;
        PlayScript::compile(outcome, 35.0, Possession::Home).unwrap()
    }

    #[test]
    fn test_script_walks_every_phase_for_a_run() {
        let script = run_script(8);
        let mut seen = Vec::new();
        for elapsed in (0..script.total_ms()).step_by(100) {
            let (phase, _) = script.phase_at(elapsed);
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
        }
        assert_eq!(
            seen,
            vec![
                PlayPhase::Huddle,
                PlayPhase::Break,
                PlayPhase::Set,
                PlayPhase::Motion,
                PlayPhase::Snap,
                PlayPhase::Development,
                PlayPhase::Result,
                PlayPhase::Whistle,
                PlayPhase::Reset,
            ]
        );
    }

    #[test]
    fn test_frames_are_idempotent_at_any_seek() {
        let script = run_script(8);
        for elapsed in [0, 1700, 4200, 6900, script.total_ms() - 1, script.total_ms() + 500] {
            let a = script.frame_at(elapsed);
            let b = script.frame_at(elapsed);
            assert_eq!(a, b, "elapsed {elapsed}");
        }
    }

    #[test]
    fn test_every_frame_stays_on_the_field() {
        let script = run_script(12);
        for elapsed in (0..script.total_ms() + 1000).step_by(137) {
            let frame = script.frame_at(elapsed);
            assert_eq!(frame.offense.len(), 11);
            assert_eq!(frame.defense.len(), 11);
            for e in frame.offense.iter().chain(frame.defense.iter()) {
                assert!((0.0..=100.0).contains(&e.pos.0), "elapsed {elapsed}");
                assert!((0.0..=100.0).contains(&e.pos.1), "elapsed {elapsed}");
            }
            assert!(frame.ball.height >= 0.0);
        }
    }

    #[test]
    fn test_huddle_ball_rests_at_the_spot() {
        let script = run_script(8);
        let frame = script.frame_at(0);
        let los = script.context().los_pct;
        assert_eq!(frame.ball.owner, BallOwner::Ground { at: (los, 50.0) });
        assert_eq!(frame.ball.height, 0.0);
    }

    #[test]
    fn test_snap_hands_the_ball_to_the_quarterback() {
        let script = run_script(8);
        let timing = script.timing();
        let snap_start =
            timing.huddle_ms + timing.break_ms + timing.set_ms + timing.motion_ms;
        let late_snap = snap_start + timing.snap_ms - 1;
        let frame = script.frame_at(late_snap);
        let qb = find_role(&script.offense, Role::Quarterback);
        assert_eq!(
            frame.ball.owner,
            BallOwner::Held { side: SquadSide::Offense, index: qb }
        );
    }

    #[test]
    fn test_touchdown_result_celebrates() {
        let mut outcome = PlayOutcome::of_type(PlayType::Run);
        outcome.yards_gained = 25;
        outcome.touchdown = true;
        outcome.scoring = Some(ScoreKind::Touchdown);
        let script = PlayScript::compile(outcome, 75.0, Possession::Away).unwrap();
        let timing = script.timing();
        let result_at = timing.total_ms() - timing.reset_ms - timing.whistle_ms
            - timing.result_ms / 2;
        let frame = script.frame_at(result_at);
        assert_eq!(frame.camera.preset, CameraPreset::Celebration);
        assert!(frame
            .offense
            .iter()
            .any(|e| e.anim == AnimState::Celebrating));
    }

    #[test]
    fn test_reset_ends_near_idle_lines_at_new_spot() {
        let script = run_script(8);
        let total = script.total_ms();
        let end = script.frame_at(total - 1);
        let idle = script.frame_at(total + 1);
        for (a, b) in end.offense.iter().zip(idle.offense.iter()) {
            let dx = a.pos.0 - b.pos.0;
            let dy = a.pos.1 - b.pos.1;
            assert!((dx * dx + dy * dy).sqrt() < 1.5);
        }
    }

    #[test]
    fn test_whistle_holds_the_development_end_spot_for_a_punt() {
        let mut outcome = PlayOutcome::of_type(PlayType::Punt);
        outcome.yards_gained = 6;
        outcome.formation = "punt".into();
        outcome.defense_personnel = "punt-return".into();
        let script = PlayScript::compile(outcome, 30.0, Possession::Home).unwrap();
        let timing = script.timing();

        let dev_end = timing.total_ms()
            - timing.reset_ms
            - timing.whistle_ms
            - timing.result_ms
            - 1;
        let whistle_at = timing.total_ms() - timing.reset_ms - timing.whistle_ms / 2;
        let dev = script.frame_at(dev_end);
        let whistle = script.frame_at(whistle_at);

        let dx = whistle.ball.pos.0 - dev.ball.pos.0;
        let dy = whistle.ball.pos.1 - dev.ball.pos.1;
        assert!(
            (dx * dx + dy * dy).sqrt() < 1.5,
            "ball must stay where the return ended, not jump to a new spot"
        );
        assert!((whistle.ball.pos.0 - script.context().destination_pct).abs() < 1.5);
    }

    #[test]
    fn test_driver_carries_the_spot_forward() {
        let mut choreo = Choreographer::new();
        let mut outcome = PlayOutcome::of_type(PlayType::Run);
        outcome.yards_gained = 8;
        choreo.begin_play(outcome, 35.0, Possession::Away).unwrap();
        let destination = choreo.script().unwrap().context().destination_pct;

        while choreo.phase() != PlayPhase::Idle {
            choreo.advance(250);
        }
        let frame = choreo.frame();
        assert_eq!(frame.ball.owner, BallOwner::Ground { at: (destination, 50.0) });
    }

    #[test]
    fn test_special_teams_snap_has_no_quarterback_exchange() {
        let mut outcome = PlayOutcome::of_type(PlayType::Kickoff);
        outcome.yards_gained = 20;
        outcome.formation = "kickoff".into();
        outcome.defense_personnel = "kickoff-return".into();
        let script = PlayScript::compile(outcome, 35.0, Possession::Away).unwrap();
        let timing = script.timing();
        // Specials skip huddle and motion, so snap follows break and set.
        let snap_at = timing.break_ms + timing.set_ms + timing.snap_ms / 2;
        let frame = script.frame_at(snap_at);
        assert!(matches!(frame.ball.owner, BallOwner::Ground { .. }));
    }
}
