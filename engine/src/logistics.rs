// ═══════════════════════════════════════════════════════════════════════
// Resource & Squad Lifecycle — fortification, triage, ammunition, squads
// ═══════════════════════════════════════════════════════════════════════

use crate::morale;
use crate::setup::level_for_count;
use crate::types::*;
use rand::Rng;

pub const MAX_FORT_LEVEL: u32 = 3;
pub const SANDBAG_COST: u32 = 200;
pub const FATIGUE_CHANCE: f64 = 0.3;

/// Wounded left untreated this long start dying.
pub const WOUNDED_CRITICAL_MINUTES: u32 = 720;
/// Timer value after a passive death, so the next one comes an hour later.
pub const WOUNDED_TIMER_AFTER_DEATH: u32 = 660;
pub const TRIAGE_MINUTES_PER_HEALED: u32 = 90;

// ── Fortification ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built { location: Location, level: u32, fatigue: u32 },
    AtMax,
    NoSandbags,
}

/// One build action at `loc`. At max level or without sandbags nothing
/// changes.
pub fn build_fortification<R: Rng + ?Sized>(
    state: &mut CampaignState,
    loc: Location,
    rng: &mut R,
) -> BuildOutcome {
    if state.fort_level(loc) >= MAX_FORT_LEVEL {
        return BuildOutcome::AtMax;
    }
    if state.sandbags < SANDBAG_COST {
        return BuildOutcome::NoSandbags;
    }

    state.sandbags -= SANDBAG_COST;
    let count = state.build_count(loc) + 1;
    let level = level_for_count(count);
    state.fortification_build_counts.insert(loc, count);
    state.fortification_level.insert(loc, level);

    let mut fatigue = 0;
    if rng.gen_bool(FATIGUE_CHANCE) {
        fatigue = rng.gen_range(0..=5);
        morale::lower(state, fatigue);
    }

    BuildOutcome::Built { location: loc, level, fatigue }
}

/// Knock `loc` down one level; the build counter follows the new level.
/// Returns false when there was nothing left to damage.
pub fn damage_fortification(state: &mut CampaignState, loc: Location) -> bool {
    let level = state.fort_level(loc);
    if level == 0 {
        return false;
    }
    state.fortification_level.insert(loc, level - 1);
    state.fortification_build_counts.insert(loc, (level - 1) * 2);
    true
}

// ── Triage ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Healed {
    pub count: u32,
    pub morale: u32,
}

/// Treat 2–5 wounded, bounded by medkits and the wounded pool.
pub fn heal<R: Rng + ?Sized>(state: &mut CampaignState, rng: &mut R) -> Option<Healed> {
    if state.wounded == 0 || state.medkits == 0 {
        return None;
    }
    let count = rng.gen_range(2..=5u32).min(state.wounded).min(state.medkits);

    state.medkits -= count;
    state.wounded -= count;
    state.soldiers += count;
    state.wounded_timer = state
        .wounded_timer
        .saturating_sub(count * TRIAGE_MINUTES_PER_HEALED);

    let boost = count * 2;
    morale::raise(state, boost);
    Some(Healed { count, morale: boost })
}

/// Advance the untreated-wounded timer by the turn's time cost. Returns the
/// number of wounded who died.
pub fn wounded_attrition<R: Rng + ?Sized>(
    state: &mut CampaignState,
    minutes: u32,
    rng: &mut R,
) -> Option<u32> {
    if state.wounded == 0 {
        state.wounded_timer = 0;
        return None;
    }
    state.wounded_timer += minutes;
    if state.wounded_timer < WOUNDED_CRITICAL_MINUTES {
        return None;
    }

    let deaths = rng.gen_range(1..=5u32).min(state.wounded);
    state.wounded -= deaths;
    morale::lower(state, deaths);
    state.wounded_timer = WOUNDED_TIMER_AFTER_DEATH;
    Some(deaths)
}

// ── Heavy Machine Guns ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disbanded {
    pub squads: usize,
    pub men: u32,
}

/// With the machine-gun pool dry, every active squad folds into the
/// riflemen for good.
pub fn disband_squads(state: &mut CampaignState) -> Option<Disbanded> {
    if state.machine_gun_ammo > 0 {
        return None;
    }
    let mut squads = 0;
    let mut men = 0;
    for squad in state.hmg_squads.iter_mut().filter(|s| s.is_active()) {
        squad.status = SquadStatus::Disbanded;
        squads += 1;
        men += squad.count;
    }
    if squads == 0 {
        return None;
    }
    state.soldiers += men;
    Some(Disbanded { squads, men })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadLoss {
    pub name: String,
    pub casualties: u32,
    pub wiped_out: bool,
}

/// 1–3 incidental casualties on the first active squad.
pub fn squad_casualties<R: Rng + ?Sized>(
    state: &mut CampaignState,
    rng: &mut R,
) -> Option<SquadLoss> {
    let squad = state.hmg_squads.iter_mut().find(|s| s.is_active())?;
    let casualties = rng.gen_range(1..=3u32).min(squad.count);
    squad.count -= casualties;
    let wiped_out = squad.count == 0;
    if wiped_out {
        squad.status = SquadStatus::Destroyed;
    }
    Some(SquadLoss { name: squad.name.clone(), casualties, wiped_out })
}
