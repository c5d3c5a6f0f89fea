//! # gridiron_core - Deterministic Play Choreography Engine
//!
//! Turns resolved American-football play outcomes into broadcast-style
//! animation: 22 participants and the ball, phase by phase from huddle
//! to reset, on a normalized 0-100 field-percent coordinate system.
//!
//! ## Features
//! - Fully deterministic: the same outcome record always renders the
//!   same frames, at any seek position
//! - Per-family play templates (run, pass, kicks, turnovers, dead balls)
//! - Formation library with graceful fallback on unknown tags
//! - JSON API for easy integration with host game engines

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{choreograph_play, choreograph_play_json, PlayRequest, PlayResponse, TimedFrame};
pub use engine::{idle_frame, Choreographer, PhaseTimingTable, PlayContext, PlayPhase, PlayScript};
pub use error::{ChoreoError, Result};
pub use models::ball::{BallOwner, BallState};
pub use models::entity::{AnimState, EntityState, FieldPos, Possession, Role, SquadSide};
pub use models::frame::{CameraHint, CameraPreset, ChoreographyFrame};
pub use models::outcome::{
    KickInfo, PlayOutcome, PlayType, ScoreKind, TurnoverInfo, TurnoverKind,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
