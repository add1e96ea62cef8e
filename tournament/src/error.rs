use thiserror::Error;

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("campaign {seed} did not finish within {turns} turns (day {day})")]
    TurnLimit { seed: u64, turns: u32, day: u32 },
}
