//! JSON entry points
//!
//! Host-engine integration goes through strings: one outcome record in,
//! one sampled frame timeline out. Keeps the embedding surface down to
//! two functions and serde.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::choreographer::PlayScript;
use crate::engine::coordinates::pct_to_yard_line;
use crate::engine::timing::PlayPhase;
use crate::error::{ChoreoError, Result};
use crate::models::entity::Possession;
use crate::models::frame::ChoreographyFrame;
use crate::models::outcome::PlayOutcome;
use crate::SCHEMA_VERSION;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

fn default_frame_interval_ms() -> u64 {
    50
}

/// One play to choreograph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub outcome: PlayOutcome,
    /// Possession-relative yard line the play starts from.
    pub ball_on_yard: f32,
    pub possession: Possession,
    /// Timeline sampling step.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

/// One sampled instant of the play timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedFrame {
    pub elapsed_ms: u64,
    pub phase: PlayPhase,
    pub progress: f32,
    pub frame: ChoreographyFrame,
}

/// Full sampled timeline for one play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayResponse {
    pub schema_version: u8,
    pub total_ms: u64,
    /// Possession-relative yard line the ball ends on.
    pub final_yard_line: f32,
    pub frames: Vec<TimedFrame>,
}

/// Compile a play and sample its full timeline at a fixed interval. The
/// last frame always lands exactly on the timeline end.
pub fn choreograph_play(request: &PlayRequest) -> Result<PlayResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(ChoreoError::Deserialization(format!(
            "unsupported schema version: {}",
            request.schema_version
        )));
    }
    let interval = request.frame_interval_ms.max(1);
    let script =
        PlayScript::compile(request.outcome.clone(), request.ball_on_yard, request.possession)?;
    let total_ms = script.total_ms();

    let mut frames = Vec::with_capacity((total_ms / interval + 2) as usize);
    let mut elapsed = 0;
    loop {
        let at = elapsed.min(total_ms);
        let (phase, progress) = script.phase_at(at);
        frames.push(TimedFrame { elapsed_ms: at, phase, progress, frame: script.frame_at(at) });
        if at >= total_ms {
            break;
        }
        elapsed += interval;
    }

    info!(
        play_type = ?request.outcome.play_type,
        total_ms,
        frames = frames.len(),
        "choreographed play"
    );
    Ok(PlayResponse {
        schema_version: SCHEMA_VERSION,
        total_ms,
        final_yard_line: pct_to_yard_line(
            script.context().destination_pct,
            request.possession,
        ),
        frames,
    })
}

/// String-in, string-out wrapper around [`choreograph_play`].
pub fn choreograph_play_json(request_json: &str) -> Result<String> {
    let request: PlayRequest = serde_json::from_str(request_json)
        .map_err(|e| ChoreoError::Deserialization(e.to_string()))?;
    let response = choreograph_play(&request)?;
    serde_json::to_string(&response).map_err(|e| ChoreoError::Serialization(e.to_string()))
}
