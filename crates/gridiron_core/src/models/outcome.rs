//! Play outcome records
//!
//! One discrete play result produced by the upstream simulator. The engine
//! treats an outcome as opaque and immutable; every field here is input
//! data, never mutated during choreography.

use serde::{Deserialize, Serialize};

/// Closed set of play-type tags.
///
/// Unrecognized tags arriving over the wire land on `Unknown`, which the
/// template registry routes to the run template so a best-effort animation
/// is always produced instead of a dropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayType {
    Run,
    Scramble,
    TwoPoint,
    PassComplete,
    PassIncomplete,
    Sack,
    Kickoff,
    Punt,
    FieldGoal,
    ExtraPoint,
    Kneel,
    Spike,
    Touchback,
    Pregame,
    CoinToss,
    #[serde(other)]
    Unknown,
}

impl PlayType {
    /// All recognized tags, in declaration order. Handy for exhaustive
    /// sweeps in tests and tooling.
    pub const ALL: [PlayType; 15] = [
        PlayType::Run,
        PlayType::Scramble,
        PlayType::TwoPoint,
        PlayType::PassComplete,
        PlayType::PassIncomplete,
        PlayType::Sack,
        PlayType::Kickoff,
        PlayType::Punt,
        PlayType::FieldGoal,
        PlayType::ExtraPoint,
        PlayType::Kneel,
        PlayType::Spike,
        PlayType::Touchback,
        PlayType::Pregame,
        PlayType::CoinToss,
    ];

    /// Kicking-game and ceremony plays skip the huddle and motion phases.
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            PlayType::Kickoff
                | PlayType::Punt
                | PlayType::FieldGoal
                | PlayType::ExtraPoint
                | PlayType::Touchback
                | PlayType::Pregame
                | PlayType::CoinToss
        )
    }
}

/// How a play scored, when it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreKind {
    Touchdown,
    FieldGoal,
    ExtraPoint,
    TwoPoint,
    Safety,
}

/// Kind of possession change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnoverKind {
    Interception,
    Fumble,
}

/// Possession-change descriptor attached to an outcome.
///
/// Presence of this descriptor overrides type-based template dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnoverInfo {
    pub kind: TurnoverKind,
    /// Yards the recovering team advances the ball after the takeaway.
    pub return_yards: i32,
}

/// Kick metadata for kickoffs, punts and placekicks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickInfo {
    /// Gross kick distance in yards.
    pub distance_yards: f32,
    /// Possession-relative yard line where the ball comes down, when the
    /// upstream simulator resolved one.
    pub catch_spot_yard: Option<f32>,
}

/// One discrete play result from the upstream simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub play_type: PlayType,
    #[serde(default)]
    pub yards_gained: i32,
    #[serde(default)]
    pub touchdown: bool,
    #[serde(default)]
    pub safety: bool,
    #[serde(default)]
    pub scoring: Option<ScoreKind>,
    #[serde(default)]
    pub turnover: Option<TurnoverInfo>,
    #[serde(default)]
    pub kick: Option<KickInfo>,
    /// Offensive formation tag; unknown tags fall back to the default
    /// formation at lookup time.
    #[serde(default)]
    pub formation: String,
    /// Defensive personnel tag, same fallback policy.
    #[serde(default)]
    pub defense_personnel: String,
}

impl PlayOutcome {
    /// Minimal outcome for a given play type; the rest of the record takes
    /// neutral defaults.
    pub fn of_type(play_type: PlayType) -> Self {
        Self {
            play_type,
            yards_gained: 0,
            touchdown: false,
            safety: false,
            scoring: None,
            turnover: None,
            kick: None,
            formation: String::new(),
            defense_personnel: String::new(),
        }
    }

    /// True when the play put points on the board.
    pub fn scored(&self) -> bool {
        self.touchdown || self.scoring.is_some()
    }
}
