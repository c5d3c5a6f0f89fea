use thiserror::Error;

/// Errors surfaced at the edges of the engine.
///
/// Frame computation itself is total and never returns an error; these
/// variants cover outcome decoding and play-context derivation, the two
/// seams where caller input can be genuinely unusable.
#[derive(Error, Debug)]
pub enum ChoreoError {
    #[error("Yard line out of range: {0} (expected 0-100)")]
    InvalidYardLine(f32),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for ChoreoError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            ChoreoError::Deserialization(err.to_string())
        } else {
            ChoreoError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ChoreoError>;
