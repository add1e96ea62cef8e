// ═══════════════════════════════════════════════════════════════════════
// Event Dispatcher — one-shot dilemmas and tactical cards
//
// `triggeredEvents` and `usedTacticalCards` are the only record of what has
// been delivered. Offers are drawn from whatever the content registry
// holds minus those sets, so substitute content obeys the same exclusion.
// ═══════════════════════════════════════════════════════════════════════

use crate::content::Content;
use crate::error::EngineError;
use crate::logistics;
use crate::morale;
use crate::siege;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::str::FromStr;

pub const DILEMMA_CHANCE: f64 = 0.2;
pub const CARD_CHANCE: f64 = 0.1;

const RESOLVE_PREFIX: &str = "evt_resolve:";

// ── Offers ─────────────────────────────────────────────────────────────

/// Roll for a new tactical card. Only one may be pending at a time.
pub fn offer_card<R: Rng + ?Sized>(
    state: &mut CampaignState,
    content: &Content,
    rng: &mut R,
) -> Option<TacticalCard> {
    if state.active_tactical_card.is_some() || !rng.gen_bool(CARD_CHANCE) {
        return None;
    }
    let available: Vec<&TacticalCard> = content
        .tactical_cards
        .iter()
        .filter(|c| !state.used_tactical_cards.contains(&c.id))
        .collect();
    let card = (*available.choose(rng)?).clone();
    state.used_tactical_cards.push(card.id.clone());
    state.active_tactical_card = Some(card.clone());
    Some(card)
}

/// Roll for a new dilemma. An offered dilemma becomes pending until resolved.
pub fn offer_dilemma<R: Rng + ?Sized>(
    state: &mut CampaignState,
    content: &Content,
    rng: &mut R,
) -> Option<Dilemma> {
    if !rng.gen_bool(DILEMMA_CHANCE) {
        return None;
    }
    let available: Vec<&Dilemma> = content
        .dilemmas
        .iter()
        .filter(|d| !state.triggered_events.contains(&d.id))
        .collect();
    let dilemma = (*available.choose(rng)?).clone();
    state.pending_dilemma = Some(dilemma.id.clone());
    Some(dilemma)
}

// ── Resolution ─────────────────────────────────────────────────────────

/// Parsed `EVT_RESOLVE:<id>:<option>` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCommand {
    pub id: String,
    pub option: usize,
}

impl ResolveCommand {
    pub fn is_resolve(cmd: &str) -> bool {
        cmd.trim().to_lowercase().starts_with(RESOLVE_PREFIX)
    }
}

impl FromStr for ResolveCommand {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EngineError::InvalidResolveCommand(s.to_string());
        // Only the prefix is case-insensitive; ids match content exactly.
        let trimmed = s.trim();
        let rest = trimmed
            .get(..RESOLVE_PREFIX.len())
            .filter(|head| head.eq_ignore_ascii_case(RESOLVE_PREFIX))
            .and_then(|_| trimmed.get(RESOLVE_PREFIX.len()..))
            .ok_or_else(bad)?;
        let (id, option) = rest.rsplit_once(':').ok_or_else(bad)?;
        if id.is_empty() {
            return Err(bad());
        }
        let option = option.trim().parse().map_err(|_| bad())?;
        Ok(ResolveCommand { id: id.to_string(), option })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub narrative: String,
    pub notes: Vec<String>,
    pub heavy: bool,
}

/// Apply one branch of a dilemma and consume it. A branch with a trap
/// rolls the trap first; a sprung trap replaces the branch outcome.
pub fn resolve<R: Rng + ?Sized>(
    state: &mut CampaignState,
    dilemma: &Dilemma,
    option: &DilemmaOption,
    rng: &mut R,
) -> Resolution {
    let (narrative, note, effects) = match &option.trap {
        Some(trap) if rng.gen_bool(trap.chance.clamp(0.0, 1.0)) => {
            (&trap.narrative, &trap.note, &trap.effects)
        }
        _ => (&option.narrative, &option.note, &option.effects),
    };

    let mut resolution = Resolution { narrative: narrative.clone(), ..Default::default() };
    if !note.is_empty() {
        resolution.notes.push(note.clone());
    }
    for effect in effects {
        apply_effect(state, effect, &mut resolution, rng);
    }

    state.mark_event(&dilemma.id);
    if state.pending_dilemma.as_deref() == Some(dilemma.id.as_str()) {
        state.pending_dilemma = None;
    }
    resolution
}

fn apply_effect<R: Rng + ?Sized>(
    state: &mut CampaignState,
    effect: &Effect,
    resolution: &mut Resolution,
    rng: &mut R,
) {
    match *effect {
        Effect::Morale { amount } => {
            morale::apply_delta(state, amount);
            resolution.notes.push(format!("士气{amount:+}"));
        }
        Effect::Gain { resource, amount } => state.add_resource(resource, amount),
        Effect::Casualties { min, max } => {
            let dead = rng.gen_range(min.min(max)..=max);
            state.soldiers = state.soldiers.saturating_sub(dead);
            if dead > 0 {
                resolution.notes.push(format!("阵亡{dead}人"));
                resolution.heavy = true;
            }
        }
        Effect::FortDamage { location } => {
            if logistics::damage_fortification(state, location) {
                resolution.heavy = true;
            }
        }
        Effect::Siege { amount } => siege::escalate(state, amount),
        Effect::HeavyDamage => resolution.heavy = true,
    }
}

// ── Tactical Cards ─────────────────────────────────────────────────────

pub fn apply_card_bonus(state: &mut CampaignState, bonus: CardBonus) {
    match bonus {
        CardBonus::Morale { amount } => morale::raise(state, amount),
        CardBonus::Gain { resource, amount } => state.add_resource(resource, amount),
    }
}
