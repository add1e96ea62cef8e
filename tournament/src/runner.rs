// ═══════════════════════════════════════════════════════════════════════
// Campaign Runner — plays a complete headless campaign with a commander
// ═══════════════════════════════════════════════════════════════════════

use crate::error::TournamentError;
use lone_army_agents::{Commander, CommanderKind};
use lone_army_engine::snapshot::history_summary;
use lone_army_engine::{
    create_initial_state, execute_tactical_card, play_turn, scoring, CampaignState, Content,
    GameResult, LogEntry,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Log lines kept for the history summary.
const LOG_WINDOW: usize = 32;

/// Outcome of one finished campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignResult {
    pub seed: u64,
    pub commander: String,
    pub result: GameResult,
    pub rank: Option<String>,
    pub score: u32,
    pub days: u32,
    pub turns: u32,
    pub soldiers: u32,
    pub enemies_killed: u32,
}

impl CampaignResult {
    fn from_state(state: &CampaignState, seed: u64, commander: &str) -> Self {
        CampaignResult {
            seed,
            commander: commander.to_string(),
            result: state.game_result,
            rank: state.final_rank.clone(),
            score: scoring::score(state),
            days: state.day,
            turns: state.turn_count,
            soldiers: state.soldiers,
            enemies_killed: state.enemies_killed,
        }
    }
}

/// Run one campaign from the start command until it ends.
/// `max_turns` is a safety limit on commander decisions.
pub fn run_campaign(
    commander: &mut dyn Commander,
    content: &Content,
    seed: u64,
    max_turns: u32,
) -> Result<CampaignResult, TournamentError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = create_initial_state();
    let mut logs: Vec<LogEntry> = Vec::new();

    let opening = play_turn(&state, "开始", "", content, &mut rng);
    state.merge(&opening.patch);
    logs.push(LogEntry::system("0", opening.narrative));

    for turn in 1..=max_turns {
        if state.is_game_over {
            info!(seed, commander = commander.name(), result = ?state.game_result, "campaign finished");
            return Ok(CampaignResult::from_state(&state, seed, commander.name()));
        }

        let decision = commander.decide(&state, content);
        let response = match decision.command_text() {
            Some(cmd) => {
                let history = history_summary(&logs);
                logs.push(LogEntry::user(format!("u{turn}"), cmd.clone()));
                play_turn(&state, &cmd, &history, content, &mut rng)
            }
            None => execute_tactical_card(&state, content, &mut rng),
        };
        debug!(seed, turn, ?decision, event = ?response.event, "turn played");

        state.merge(&response.patch);
        logs.push(LogEntry::system(format!("s{turn}"), response.narrative));
        if logs.len() > LOG_WINDOW {
            logs.drain(..logs.len() - LOG_WINDOW);
        }
    }

    if state.is_game_over {
        return Ok(CampaignResult::from_state(&state, seed, commander.name()));
    }
    warn!(seed, max_turns, day = state.day, "campaign hit turn limit");
    Err(TournamentError::TurnLimit { seed, turns: max_turns, day: state.day })
}

/// Run one campaign per seed in parallel, each with a fresh commander of
/// `kind` seeded from the campaign seed. Results keep the order of `seeds`.
pub fn run_batch(
    kind: CommanderKind,
    content: &Content,
    seeds: &[u64],
    max_turns: u32,
) -> Vec<Result<CampaignResult, TournamentError>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let mut commander = kind.build(seed);
            run_campaign(commander.as_mut(), content, seed, max_turns)
        })
        .collect()
}

/// Aggregate figures over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchSummary {
    pub campaigns: u32,
    pub victories: u32,
    pub errors: u32,
    pub mean_score: f64,
}

pub fn summarize(results: &[Result<CampaignResult, TournamentError>]) -> BatchSummary {
    let finished: Vec<&CampaignResult> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let victories = finished.iter().filter(|r| r.result == GameResult::Victory).count() as u32;
    let total: u64 = finished.iter().map(|r| u64::from(r.score)).sum();
    BatchSummary {
        campaigns: results.len() as u32,
        victories,
        errors: (results.len() - finished.len()) as u32,
        mean_score: if finished.is_empty() { 0.0 } else { total as f64 / finished.len() as f64 },
    }
}
