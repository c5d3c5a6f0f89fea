//! Data model: outcome records, participant states, ball state, frames.

pub mod ball;
pub mod entity;
pub mod frame;
pub mod outcome;

pub use ball::{BallOwner, BallState};
pub use entity::{find_role, AnimState, EntityState, FieldPos, Possession, Role, SquadSide};
pub use frame::{CameraHint, CameraPreset, ChoreographyFrame};
pub use outcome::{KickInfo, PlayOutcome, PlayType, ScoreKind, TurnoverInfo, TurnoverKind};
