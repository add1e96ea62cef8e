// ═══════════════════════════════════════════════════════════════════════
// Siege Clock & Attack Trigger
//
// The meter is the per-turn assault probability in percent. Every active
// turn pushes it up by the action's increment; a triggered assault vents
// 50 points. Air raids are rolled separately on turns with no assault.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::CampaignState;
use rand::Rng;
use std::ops::RangeInclusive;

pub const SIEGE_MAX: u32 = 100;
/// No assault is rolled while the meter sits at or below this.
pub const ATTACK_FLOOR: u32 = 10;
pub const ATTACK_RELEASE: u32 = 50;

// Per-action increments
pub const SIEGE_BASE: u32 = 5;
pub const SIEGE_FORTIFY: u32 = 15;
pub const SIEGE_HEAL: u32 = 10;
pub const SIEGE_SPEECH: u32 = 10;
pub const SIEGE_REST: u32 = 35;
pub const SIEGE_FLAG: u32 = 50;

/// Daylight hours in which the enemy may bring up guns.
const ARTILLERY_HOURS: RangeInclusive<u32> = 8..=18;
const ARTILLERY_CHANCE: f64 = 0.6;

const BOMBING_HOURS: RangeInclusive<u32> = 8..=16;
const BOMBING_HOURS_FLAG: RangeInclusive<u32> = 6..=17;
const BOMBING_CHANCE: f64 = 0.25;
const BOMBING_CHANCE_FLAG: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Bombing,
    Artillery,
    Infantry,
}

impl AttackKind {
    pub fn is_ground(self) -> bool {
        !matches!(self, AttackKind::Bombing)
    }
}

pub fn escalate(state: &mut CampaignState, increment: u32) {
    state.siege_meter = (state.siege_meter + increment).min(SIEGE_MAX);
}

/// Roll for a ground assault against the current meter. `hour` is the
/// clock after the action's time cost.
pub fn roll_assault<R: Rng + ?Sized>(
    state: &mut CampaignState,
    hour: u32,
    rng: &mut R,
) -> Option<AttackKind> {
    if state.siege_meter <= ATTACK_FLOOR {
        return None;
    }
    let roll = rng.gen_range(0.0..100.0);
    if roll >= f64::from(state.siege_meter) {
        return None;
    }
    state.siege_meter = state.siege_meter.saturating_sub(ATTACK_RELEASE);

    if ARTILLERY_HOURS.contains(&hour) && rng.gen_bool(ARTILLERY_CHANCE) {
        Some(AttackKind::Artillery)
    } else {
        Some(AttackKind::Infantry)
    }
}

/// Independent air-raid check. A raised flag widens the window and the odds.
pub fn roll_bombing<R: Rng + ?Sized>(flag_raised: bool, hour: u32, rng: &mut R) -> bool {
    let (hours, chance) = if flag_raised {
        (BOMBING_HOURS_FLAG, BOMBING_CHANCE_FLAG)
    } else {
        (BOMBING_HOURS, BOMBING_CHANCE)
    };
    hours.contains(&hour) && rng.gen_bool(chance)
}
