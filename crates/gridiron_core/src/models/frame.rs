//! Choreography frame, the engine's sole output type.
//!
//! A frame is fully recomputed on every query, never diffed or mutated
//! incrementally, which makes the engine trivially replayable and seekable
//! to any timestamp.

use serde::{Deserialize, Serialize};

use super::ball::BallState;
use super::entity::{EntityState, FieldPos};

/// Named camera framings the presentation layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPreset {
    /// Wide sideline framing.
    #[default]
    Broadcast,
    /// Tight on the line of scrimmage.
    LineOfScrimmage,
    /// Track the ball wherever it goes.
    FollowBall,
    /// High angle holding the full kick trajectory.
    KickArc,
    /// Cut in on the scoring players.
    Celebration,
}

/// Presentation hint attached to every frame. The core never draws
/// anything; this is advice, not an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraHint {
    pub preset: CameraPreset,
    pub focus: Option<FieldPos>,
    /// 0.0 = steady, 1.0 = maximum impact shake.
    pub shake: f32,
}

impl CameraHint {
    pub fn new(preset: CameraPreset) -> Self {
        Self { preset, focus: None, shake: 0.0 }
    }

    pub fn focused(preset: CameraPreset, focus: FieldPos) -> Self {
        Self { preset, focus: Some(focus), shake: 0.0 }
    }

    pub fn with_shake(mut self, shake: f32) -> Self {
        self.shake = shake.clamp(0.0, 1.0);
        self
    }
}

impl Default for CameraHint {
    fn default() -> Self {
        Self::new(CameraPreset::Broadcast)
    }
}

/// Complete per-tick output: 22 participant states, the ball, and a
/// camera hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreographyFrame {
    pub offense: Vec<EntityState>,
    pub defense: Vec<EntityState>,
    pub ball: BallState,
    pub camera: CameraHint,
}

impl ChoreographyFrame {
    pub fn new(
        offense: Vec<EntityState>,
        defense: Vec<EntityState>,
        ball: BallState,
        camera: CameraHint,
    ) -> Self {
        Self { offense, defense, ball, camera }
    }

    /// Clamp every coordinate to the valid field-percent range and the
    /// ball height to non-negative. Applied before a frame leaves the
    /// core; presentation code may rely on it.
    pub fn clamped(mut self) -> Self {
        for e in self.offense.iter_mut().chain(self.defense.iter_mut()) {
            e.pos.0 = e.pos.0.clamp(0.0, 100.0);
            e.pos.1 = e.pos.1.clamp(0.0, 100.0);
        }
        self.ball.pos.0 = self.ball.pos.0.clamp(0.0, 100.0);
        self.ball.pos.1 = self.ball.pos.1.clamp(0.0, 100.0);
        self.ball.height = self.ball.height.max(0.0);
        self
    }
}
