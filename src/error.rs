//! Error taxonomy surfaced to the UI as rejected commands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The transcript payload is not a well-formed sequence of segments.
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// No segment with the given id exists in the current collection.
    #[error("Unknown segment: {0}")]
    UnknownSegment(String),

    /// The engine executable could not be started.
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine ran but exited with a failure status.
    #[error("Engine failed: {0}")]
    EngineError(String),

    /// The engine's output could not be parsed into the expected contract.
    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),

    /// A generate request was issued with nothing selected.
    #[error("Export selection is empty")]
    EmptySelection,
}

pub type Result<T> = std::result::Result<T, Error>;
