// ═══════════════════════════════════════════════════════════════════════
// Content registry — named text pools, dilemmas, tactical cards, intel
//
// The engine never reaches for global text tables. Every entry point takes
// a `&Content`, and every line it emits is drawn from a pool addressed by
// a stable identifier. `Content::standard()` is the built-in campaign;
// a JSON document with the same shape replaces it wholesale.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::EngineError;
use crate::types::{Dilemma, TacticalCard};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable pool identifiers.
pub mod pool {
    // Fixed lines
    pub const PROLOGUE: &str = "prologue";
    pub const PROLOGUE_INTEL: &str = "prologue_intel";
    pub const TUTORIAL_FORTIFIED: &str = "tutorial_fortified";
    pub const TUTORIAL_FORTIFY_PROMPT: &str = "tutorial_fortify_prompt";
    pub const TUTORIAL_DAWN: &str = "tutorial_dawn";
    pub const TUTORIAL_DAWN_INTEL: &str = "tutorial_dawn_intel";
    pub const TUTORIAL_SUPPLY_PROMPT: &str = "tutorial_supply_prompt";
    pub const DILEMMA_PROMPT: &str = "dilemma_prompt";
    pub const DILEMMA_UNKNOWN: &str = "dilemma_unknown";
    pub const CAMPAIGN_OVER: &str = "campaign_over";
    pub const CARD_NONE: &str = "card_none";
    pub const RAID_BLOCKED: &str = "raid_blocked";
    pub const SUPPLY_BLOCKED: &str = "supply_blocked";
    pub const FLAG_OFF_ROOF: &str = "flag_off_roof";
    pub const FLAG_ALREADY: &str = "flag_already";
    pub const HMG_LOST: &str = "hmg_lost";

    // Flavor pools
    pub const RAID_SUCCESS: &str = "raid_success";
    pub const RAID_FAIL: &str = "raid_fail";
    pub const BAYONET_FIGHT: &str = "bayonet_fight";
    pub const ATTACK_BOMBING: &str = "attack_bombing";
    pub const ATTACK_ARTILLERY: &str = "attack_artillery";
    pub const ATTACK_INFANTRY: &str = "attack_infantry";
    pub const WOUNDED_DEATH: &str = "wounded_death";
    pub const DEATH_FLAVOR: &str = "death_flavor";
    pub const SOLDIER_NAMES: &str = "soldier_names";
    pub const SOLDIER_ORIGINS: &str = "soldier_origins";
    pub const FORT_DAMAGE: &str = "fort_damage";
    pub const MUTINY: &str = "mutiny";
    pub const MOVE: &str = "move";
    pub const BUILD: &str = "build";
    pub const BUILD_MAX: &str = "build_max";
    pub const BUILD_NO_SANDBAGS: &str = "build_no_sandbags";
    pub const REST: &str = "rest";
    pub const HEAL: &str = "heal";
    pub const HEAL_FAIL: &str = "heal_fail";
    pub const FLAG_WARN: &str = "flag_warn";
    pub const FLAG_SUCCESS: &str = "flag_success";
    pub const SPEECH: &str = "speech";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub pools: BTreeMap<String, Vec<String>>,
    pub dilemmas: Vec<Dilemma>,
    pub tactical_cards: Vec<TacticalCard>,
    /// Intel line per day; days past the end reuse the last entry.
    pub intel_by_day: Vec<String>,
}

impl Content {
    /// The built-in campaign content.
    pub fn standard() -> Content {
        crate::tables::standard()
    }

    pub fn from_json(json: &str) -> Result<Content, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidContent(e.to_string()))
    }

    /// Uniform draw from a pool. Missing or empty pools yield "".
    pub fn pick<R: Rng + ?Sized>(&self, pool: &str, rng: &mut R) -> String {
        self.pools
            .get(pool)
            .and_then(|lines| lines.choose(rng))
            .cloned()
            .unwrap_or_default()
    }

    /// First line of a pool, for fixed lines that are not randomized.
    pub fn line(&self, pool: &str) -> String {
        self.pools
            .get(pool)
            .and_then(|lines| lines.first())
            .cloned()
            .unwrap_or_default()
    }

    pub fn dilemma(&self, id: &str) -> Option<&Dilemma> {
        self.dilemmas.iter().find(|d| d.id == id)
    }

    pub fn card(&self, id: &str) -> Option<&TacticalCard> {
        self.tactical_cards.iter().find(|c| c.id == id)
    }

    pub fn intel_for_day(&self, day: u32) -> Option<String> {
        let last = self.intel_by_day.len().checked_sub(1)?;
        self.intel_by_day.get((day as usize).min(last)).cloned()
    }
}
