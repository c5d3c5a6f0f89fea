//! Participant state
//!
//! One `EntityState` per participant, 11 offense + 11 defense. The arrays
//! are ordered by formation slot, not by persistent player identity: slot 0
//! is conventionally the reference lineman (the snapper), and anything else
//! of interest (quarterback, kicker, returner) is located by role lookup.

use serde::{Deserialize, Serialize};

/// Position in field percent (0-100 on both axes).
/// - .0 = downfield axis (end line to end line)
/// - .1 = lateral axis (sideline to sideline)
pub type FieldPos = (f32, f32);

/// Which bench a participant belongs to this play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SquadSide {
    Offense,
    Defense,
}

/// Which team currently possesses the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Possession {
    Home,
    Away,
}

/// Formation-slot role label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Center,
    Guard,
    Tackle,
    TightEnd,
    Quarterback,
    RunningBack,
    Fullback,
    WideReceiver,
    Kicker,
    Punter,
    Holder,
    Gunner,
    DefensiveLine,
    Linebacker,
    Cornerback,
    Safety,
    Returner,
}

/// Animation-state tag consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimState {
    #[default]
    Idle,
    Running,
    Blocking,
    Throwing,
    Catching,
    Tackling,
    Juking,
    Kicking,
    Returning,
    Celebrating,
}

/// Per-participant frame state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub pos: FieldPos,
    /// Off-ground height in yards; nonzero only while leaping.
    pub height: f32,
    pub role: Role,
    /// Facing angle in radians, 0 pointing toward increasing field percent.
    pub facing: f32,
    pub anim: AnimState,
}

impl EntityState {
    pub fn new(role: Role, pos: FieldPos) -> Self {
        Self { pos, height: 0.0, role, facing: 0.0, anim: AnimState::Idle }
    }

    /// Copy with a different position, keeping role and facing.
    pub fn at(&self, pos: FieldPos) -> Self {
        Self { pos, ..self.clone() }
    }
}

/// First slot matching `role`, falling back to slot 0 when the current
/// formation does not carry one. Never fails on a non-empty array.
pub fn find_role(entities: &[EntityState], role: Role) -> usize {
    entities.iter().position(|e| e.role == role).unwrap_or(0)
}
