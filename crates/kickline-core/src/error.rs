// Contract violations rejected at the engine boundary.

use thiserror::Error;

/// Malformed input that violates the engine's type contract.
///
/// Missing or zero data is never an error: an absent stat line, roster slot
/// or tip resolves to a zero contribution instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown position label `{0}`")]
    UnknownPosition(String),

    #[error("unknown roster slot label `{0}`")]
    UnknownSlot(String),

    #[error("round {round} is outside the season (1..={last})")]
    RoundOutOfRange { round: u32, last: u32 },

    #[error("player `{player}` is assigned to both {first} and {second}")]
    DuplicatePlayer {
        player: String,
        first: String,
        second: String,
    },

    #[error("slot {slot} requires a backup position")]
    MissingBackup { slot: String },

    #[error("slot {0} is assigned more than once")]
    DuplicateSlot(String),
}

/// A lookup or cache failure raised by the caller's data store.
#[derive(Debug, Error)]
#[error("season data unavailable: {source}")]
pub struct SourceError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl SourceError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SourceError {
            source: source.into(),
        }
    }
}

/// Failure of a season-level operation that gathers its own inputs.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Invalid(#[from] EngineError),
}
