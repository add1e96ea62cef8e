pub mod error;
pub mod runner;
pub mod database;

pub use error::TournamentError;
pub use runner::{run_batch, run_campaign, summarize, BatchSummary, CampaignResult};
pub use database::{ResultStore, Standing};
