use thiserror::Error;

/// Errors raised by the parsing helpers and the snapshot contract.
/// Turn entry points never return these; they fold them into narrative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid clock value {0:?}, expected HH:MM")]
    InvalidClock(String),

    #[error("malformed dilemma resolution command {0:?}")]
    InvalidResolveCommand(String),

    #[error("save slot {slot} out of range (max {max})")]
    SlotOutOfRange { slot: u32, max: u32 },

    #[error("content could not be parsed: {0}")]
    InvalidContent(String),
}
