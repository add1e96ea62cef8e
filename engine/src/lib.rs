pub mod types;
pub mod clock;
pub mod error;
pub mod patch;
pub mod content;
mod tables;
pub mod setup;
pub mod interpreter;
pub mod tutorial;
pub mod morale;
pub mod logistics;
pub mod siege;
pub mod combat;
pub mod dispatch;
pub mod scoring;
pub mod snapshot;
pub mod engine;

pub use types::*;
pub use clock::GameClock;
pub use error::EngineError;
pub use patch::StatePatch;
pub use content::Content;
pub use setup::create_initial_state;
pub use snapshot::{LogEntry, Sender, SlotId, Snapshot, MAX_SLOTS};
pub use engine::{execute_tactical_card, play_turn, resolve_dilemma};

#[cfg(test)]
mod tests;
