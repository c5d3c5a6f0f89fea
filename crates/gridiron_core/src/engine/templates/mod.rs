//! Play templates
//!
//! One strategy per play-type family. A template answers two questions:
//! how long the development phase runs for this outcome, and where all 22
//! participants and the ball are at a given development progress.
//!
//! Dispatch: a present turnover descriptor always selects the turnover
//! template regardless of the play-type tag; otherwise dispatch is an
//! exhaustive match on the tag, with the `Unknown` boundary tag (and any
//! future unmapped family) landing on the run template so a best-effort
//! picture is always produced.

pub mod common;
pub mod dead_ball;
pub mod field_goal;
pub mod kickoff;
pub mod pass;
pub mod punt;
pub mod run;
pub mod turnover;

use tracing::debug;

use crate::engine::context::PlayContext;
use crate::models::entity::EntityState;
use crate::models::frame::ChoreographyFrame;
use crate::models::outcome::{PlayOutcome, PlayType};

pub use dead_ball::DeadBallTemplate;
pub use field_goal::FieldGoalTemplate;
pub use kickoff::KickoffTemplate;
pub use pass::PassTemplate;
pub use punt::PuntTemplate;
pub use run::RunTemplate;
pub use turnover::TurnoverTemplate;

/// Development-phase strategy for one play-type family.
///
/// Implementations are pure over their arguments: same inputs, same frame.
pub trait PlayTemplate: Sync {
    /// Stable identifier used in logs and tests.
    fn name(&self) -> &'static str;

    /// Development-phase duration for this outcome.
    fn development_ms(&self, ctx: &PlayContext) -> u64;

    /// Full frame at `progress` in [0,1] through the development phase.
    /// `offense` and `defense` are the formation-assigned snapshot taken
    /// at the moment of the snap.
    fn development(
        &self,
        progress: f32,
        ctx: &PlayContext,
        offense: &[EntityState],
        defense: &[EntityState],
    ) -> ChoreographyFrame;
}

static RUN: RunTemplate = RunTemplate;
static PASS: PassTemplate = PassTemplate;
static KICKOFF: KickoffTemplate = KickoffTemplate;
static PUNT: PuntTemplate = PuntTemplate;
static FIELD_GOAL: FieldGoalTemplate = FieldGoalTemplate;
static TURNOVER: TurnoverTemplate = TurnoverTemplate;
static DEAD_BALL: DeadBallTemplate = DeadBallTemplate;

/// Select the template for an outcome. Turnovers take priority over the
/// play-type tag.
pub fn template_for(outcome: &PlayOutcome) -> &'static dyn PlayTemplate {
    let template: &'static dyn PlayTemplate = if outcome.turnover.is_some() {
        &TURNOVER
    } else {
        template_for_type(outcome.play_type)
    };
    debug!(play_type = ?outcome.play_type, template = template.name(), "template dispatch");
    template
}

/// Type-tag dispatch, ignoring any turnover descriptor. The turnover
/// template uses this to choreograph the pre-turnover portion of a play.
pub(crate) fn template_for_type(play_type: PlayType) -> &'static dyn PlayTemplate {
    match play_type {
        PlayType::Run | PlayType::Scramble => &RUN,
        PlayType::PassComplete | PlayType::PassIncomplete | PlayType::Sack | PlayType::TwoPoint => {
            &PASS
        }
        PlayType::Kickoff => &KICKOFF,
        PlayType::Punt => &PUNT,
        PlayType::FieldGoal | PlayType::ExtraPoint => &FIELD_GOAL,
        PlayType::Kneel
        | PlayType::Spike
        | PlayType::Touchback
        | PlayType::Pregame
        | PlayType::CoinToss => &DEAD_BALL,
        PlayType::Unknown => &RUN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::outcome::{TurnoverInfo, TurnoverKind};

    #[test]
    fn test_turnover_takes_precedence_over_tag() {
        let mut outcome = PlayOutcome::of_type(PlayType::Run);
        outcome.turnover = Some(TurnoverInfo { kind: TurnoverKind::Fumble, return_yards: 3 });
        assert_eq!(template_for(&outcome).name(), "turnover");
    }

    #[test]
    fn test_tag_dispatch() {
        let cases = [
            (PlayType::Run, "run"),
            (PlayType::Scramble, "run"),
            (PlayType::PassComplete, "pass"),
            (PlayType::PassIncomplete, "pass"),
            (PlayType::Sack, "pass"),
            (PlayType::TwoPoint, "pass"),
            (PlayType::Kickoff, "kickoff"),
            (PlayType::Punt, "punt"),
            (PlayType::FieldGoal, "field-goal"),
            (PlayType::ExtraPoint, "field-goal"),
            (PlayType::Kneel, "dead-ball"),
            (PlayType::Spike, "dead-ball"),
            (PlayType::Touchback, "dead-ball"),
            (PlayType::Pregame, "dead-ball"),
            (PlayType::CoinToss, "dead-ball"),
            (PlayType::Unknown, "run"),
        ];
        for (play_type, expected) in cases {
            let outcome = PlayOutcome::of_type(play_type);
            assert_eq!(template_for(&outcome).name(), expected, "{play_type:?}");
        }
    }
}
