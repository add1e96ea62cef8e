// ═══════════════════════════════════════════════════════════════════════
// Commander Trait — interface every scripted player implements
//
// A commander sees the same campaign state the player would see and
// answers in the player's own terms: free-text orders, a dilemma option
// index, or playing the pending tactical card. The engine never learns
// which commander produced a command.
// ═══════════════════════════════════════════════════════════════════════

use lone_army_engine::{CampaignState, Content, Dilemma, TacticalCard};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What the commander wants to do this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Free-text order for `play_turn`.
    Command(String),
    /// Answer the pending dilemma.
    Resolve { dilemma_id: String, option: usize },
    /// Execute the active tactical card.
    PlayCard,
}

impl Decision {
    /// The command string that carries this decision through `play_turn`.
    /// Card play has no textual form.
    pub fn command_text(&self) -> Option<String> {
        match self {
            Decision::Command(cmd) => Some(cmd.clone()),
            Decision::Resolve { dilemma_id, option } => {
                Some(format!("EVT_RESOLVE:{dilemma_id}:{option}"))
            }
            Decision::PlayCard => None,
        }
    }
}

pub trait Commander: Send + Sync {
    fn name(&self) -> &str;

    /// Universal entry point. A pending dilemma must be answered first;
    /// an active card is offered to `use_card` before a free order.
    fn decide(&mut self, state: &CampaignState, content: &Content) -> Decision {
        if let Some(dilemma) = state.pending_dilemma.as_deref().and_then(|id| content.dilemma(id)) {
            let option = self
                .choose_option(state, dilemma)
                .min(dilemma.options.len().saturating_sub(1));
            return Decision::Resolve { dilemma_id: dilemma.id.clone(), option };
        }
        if let Some(card) = state.active_tactical_card.as_ref() {
            if self.use_card(state, card) {
                return Decision::PlayCard;
            }
        }
        Decision::Command(self.next_command(state))
    }

    // ── Individual decisions ───────────────────────────────────────────

    /// Free-text order for an ordinary turn.
    fn next_command(&mut self, state: &CampaignState) -> String;

    /// Index into `dilemma.options`.
    fn choose_option(&mut self, state: &CampaignState, dilemma: &Dilemma) -> usize;

    /// Whether to play the active tactical card now.
    fn use_card(&mut self, state: &CampaignState, card: &TacticalCard) -> bool;
}

// ── Commander Kinds ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommanderKind {
    Random,
    Heuristic,
}

impl CommanderKind {
    pub const ALL: [CommanderKind; 2] = [CommanderKind::Random, CommanderKind::Heuristic];

    pub fn name(self) -> &'static str {
        match self {
            CommanderKind::Random => "Random",
            CommanderKind::Heuristic => "Heuristic",
        }
    }

    pub fn build(self, seed: u64) -> Box<dyn Commander> {
        match self {
            CommanderKind::Random => Box::new(crate::RandomCommander::new(seed)),
            CommanderKind::Heuristic => Box::new(crate::HeuristicCommander::new(seed)),
        }
    }
}

impl fmt::Display for CommanderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown commander '{0}' (expected random or heuristic)")]
pub struct UnknownCommander(pub String);

impl FromStr for CommanderKind {
    type Err = UnknownCommander;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(CommanderKind::Random),
            "heuristic" => Ok(CommanderKind::Heuristic),
            other => Err(UnknownCommander(other.to_string())),
        }
    }
}
