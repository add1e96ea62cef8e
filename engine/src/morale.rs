// ═══════════════════════════════════════════════════════════════════════
// Morale & Mutiny
// ═══════════════════════════════════════════════════════════════════════

use crate::types::CampaignState;
use rand::Rng;

pub const MORALE_MAX: u32 = 100;
/// Below this, every turn risks desertion.
pub const MUTINY_THRESHOLD: u32 = 30;
pub const MUTINY_CHANCE: f64 = 0.4;

/// Raise morale, capped at 100.
pub fn raise(state: &mut CampaignState, amount: u32) {
    state.morale = state.morale.saturating_add(amount).min(MORALE_MAX);
}

/// Lower morale, floored at the current minimum.
pub fn lower(state: &mut CampaignState, amount: u32) {
    state.morale = state.morale.saturating_sub(amount).max(state.min_morale);
}

pub fn apply_delta(state: &mut CampaignState, delta: i32) {
    if delta >= 0 {
        raise(state, delta.unsigned_abs());
    } else {
        lower(state, delta.unsigned_abs());
    }
}

/// Permanently lift the floor. Never lowers it.
pub fn raise_floor(state: &mut CampaignState, floor: u32) {
    state.min_morale = state.min_morale.max(floor);
    state.morale = state.morale.max(state.min_morale);
}

/// End-of-turn desertion roll. Returns the number of soldiers lost.
/// Morale itself is left untouched.
pub fn check_mutiny<R: Rng + ?Sized>(state: &mut CampaignState, rng: &mut R) -> Option<u32> {
    if state.morale >= MUTINY_THRESHOLD || !rng.gen_bool(MUTINY_CHANCE) {
        return None;
    }
    let lost = rng.gen_range(5..=14);
    state.soldiers = state.soldiers.saturating_sub(lost);
    Some(lost)
}
