//! Per-play derived context
//!
//! Computed once when a new outcome record arrives and immutable for that
//! play's lifetime. Every template and phase handler reads from this; no
//! other per-play state exists inside the engine.

use std::hash::Hasher;

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::coordinates::{offense_dir, yard_line_to_pct, yards};
use crate::error::{ChoreoError, Result};
use crate::models::entity::Possession;
use crate::models::outcome::{PlayOutcome, PlayType};

/// Immutable per-play derivation of an outcome record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayContext {
    pub outcome: PlayOutcome,
    pub possession: Possession,
    /// Line of scrimmage in absolute field percent.
    pub los_pct: f32,
    /// Where the ball ends the play, absolute field percent.
    pub destination_pct: f32,
    /// Offensive direction sign on the downfield axis.
    pub dir: f32,
    /// Seed for cosmetic jitter, derived from the outcome record so a
    /// replay of the same play is bit-identical.
    pub seed: u64,
}

impl PlayContext {
    /// Derive a context from an outcome, the current possession-relative
    /// yard line, and the possessing side.
    pub fn new(outcome: PlayOutcome, ball_on_yard: f32, possession: Possession) -> Result<Self> {
        if !(0.0..=100.0).contains(&ball_on_yard) || !ball_on_yard.is_finite() {
            return Err(ChoreoError::InvalidYardLine(ball_on_yard));
        }

        let dir = offense_dir(possession);
        let los_pct = yard_line_to_pct(ball_on_yard, possession);
        let seed = outcome_seed(&outcome, ball_on_yard, possession);

        let mut ctx = Self { outcome, possession, los_pct, destination_pct: los_pct, dir, seed };
        ctx.destination_pct = ctx.end_spot_pct();

        debug!(
            play_type = ?ctx.outcome.play_type,
            los_pct,
            destination_pct = ctx.destination_pct,
            "derived play context"
        );

        Ok(ctx)
    }

    /// Where the ball comes to rest, in absolute percent. Scrimmage plays
    /// measure from the line of scrimmage; kick changes of possession
    /// measure the return back from the catch spot.
    fn end_spot_pct(&self) -> f32 {
        let end = match self.outcome.play_type {
            PlayType::Kickoff | PlayType::Punt => {
                let back = self.outcome.yards_gained.max(0) as f32;
                self.kick_catch_pct() - self.dir * yards(back)
            }
            _ => self.los_pct + self.dir * yards(net_yards(&self.outcome) as f32),
        };
        end.clamp(0.0, 100.0)
    }

    /// Catch spot for kicked balls, in absolute percent. Falls back to a
    /// family-typical distance when the outcome carries no kick metadata.
    pub fn kick_catch_pct(&self) -> f32 {
        let default_distance = match self.outcome.play_type {
            PlayType::Kickoff => 62.0,
            PlayType::Punt => 45.0,
            _ => 30.0,
        };
        let distance = match self.outcome.kick {
            Some(kick) => {
                if let Some(spot) = kick.catch_spot_yard {
                    return yard_line_to_pct(spot, self.possession);
                }
                kick.distance_yards
            }
            None => default_distance,
        };
        (self.los_pct + self.dir * yards(distance)).clamp(0.0, 100.0)
    }
}

/// Yards the ball actually travels along the offensive direction over the
/// whole play. Turnover returns run the other way.
fn net_yards(outcome: &PlayOutcome) -> i32 {
    match outcome.turnover {
        Some(t) => outcome.yards_gained - t.return_yards,
        None => outcome.yards_gained,
    }
}

fn outcome_seed(outcome: &PlayOutcome, ball_on_yard: f32, possession: Possession) -> u64 {
    let mut hasher = FxHasher64::default();
    // Serialized form covers every field, including future additions.
    if let Ok(bytes) = serde_json::to_vec(outcome) {
        hasher.write(&bytes);
    }
    hasher.write_u32(ball_on_yard.to_bits());
    hasher.write_u8(match possession {
        Possession::Home => 0,
        Possession::Away => 1,
    });
    hasher.finish()
}
