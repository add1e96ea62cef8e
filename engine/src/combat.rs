// ═══════════════════════════════════════════════════════════════════════
// Combat Resolution — assaults, air raids, last stands, night raids
//
// Sequence inside one attack:
//   1. machine-gun pool dry → active squads disband into the riflemen
//   2. both pools dry → last stand (no bullets spent, flat ranges)
//   3. category damage, consumption, squad upkeep and losses
//   4. kills and kill morale
//   5. personnel damage × defense modifier → casualty allocation
//   6. fortification damage roll on the struck position
// Each step reads what the previous one wrote.
// ═══════════════════════════════════════════════════════════════════════

use crate::logistics::{self, Disbanded, SquadLoss};
use crate::morale;
use crate::siege::AttackKind;
use crate::types::*;
use rand::Rng;

const DAMAGE_SCALE: f64 = 1.5;
/// Infantry damage ceiling by floored average ground-floor level.
const INFANTRY_MAX_DAMAGE: [f64; 4] = [15.0, 10.0, 5.0, 2.0];
const LAST_STAND_KILL_FACTOR: f64 = 1.2;
const SQUAD_WIPE_MORALE: u32 = 10;
const MORALE_PER_DEATH: u32 = 2;
const INJURY_HEALTH_COST: u32 = 5;

// ── Pure Helpers ───────────────────────────────────────────────────────

/// Personnel damage multiplier from the state of the machine-gun line.
pub fn defense_modifier(squads: &[HmgSquad]) -> f64 {
    let destroyed = squads
        .iter()
        .filter(|s| s.status == SquadStatus::Destroyed)
        .count();
    let mut modifier = 1.0 + 0.2 * destroyed as f64;
    if !squads.iter().any(|s| s.is_active()) {
        modifier += 0.4;
    }
    modifier
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Casualties {
    pub wounded_deaths: u32,
    pub healthy_deaths: u32,
    pub healthy_injuries: u32,
}

impl Casualties {
    pub fn deaths(&self) -> u32 {
        self.wounded_deaths + self.healthy_deaths
    }
}

/// Split `total` personnel damage: 80% (rounded up) falls on the wounded
/// as deaths, the rest kills 40% and injures 60% of the healthy.
pub fn allocate_casualties(total: u32, wounded: u32, healthy: u32) -> Casualties {
    if total == 0 {
        return Casualties::default();
    }
    let wounded_target = (total * 4).div_ceil(5);
    let wounded_deaths = wounded.min(wounded_target);
    let remaining = total - wounded_deaths;
    let deaths = remaining * 2 / 5;
    let injuries = remaining - deaths;
    let healthy_deaths = healthy.min(deaths);
    let healthy_injuries = (healthy - healthy_deaths).min(injuries);
    Casualties { wounded_deaths, healthy_deaths, healthy_injuries }
}

// ── Attack ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CombatReport {
    pub kind: AttackKind,
    pub target: Location,
    pub last_stand: bool,
    pub disbanded: Option<Disbanded>,
    pub squad_loss: Option<SquadLoss>,
    pub ammo_used: u32,
    pub mg_ammo_used: u32,
    pub grenades_used: u32,
    pub kills: u32,
    pub kill_morale: u32,
    pub casualties: Casualties,
    pub death_morale: u32,
    pub fort_damaged: bool,
    /// Damage heavy enough to escalate the screen effect.
    pub heavy: bool,
}

/// Resolve one attack of `kind` against the working state.
pub fn resolve_attack<R: Rng + ?Sized>(
    state: &mut CampaignState,
    kind: AttackKind,
    rng: &mut R,
) -> CombatReport {
    let disbanded = logistics::disband_squads(state);
    let last_stand = state.ammo == 0 && state.machine_gun_ammo == 0;
    let mut heavy = disbanded.is_some();

    let entrance = state.fort_level(Location::Entrance);
    let second = state.fort_level(Location::SecondFloor);
    let roof = state.fort_level(Location::Rooftop);
    let avg_def = f64::from(entrance + second) / 2.0;
    let def_index = (avg_def.floor() as usize).min(INFANTRY_MAX_DAMAGE.len() - 1);

    let mut squad_loss = None;
    let mut mg_ammo_used = 0;
    let mut kill_base: u32 = 0;

    let (base_damage, target, fort_chance, mut ammo_used, mut grenades_used): (u32, Location, f64, u32, u32) = match kind {
        AttackKind::Bombing => {
            let base = match roof {
                r if r >= 3 => 2.0,
                2 => 5.0,
                _ => 10.0,
            };
            let multiplier = if state.has_flag_raised { 2.0 + rng.gen::<f64>() } else { 1.0 };
            let damage = (base * multiplier * DAMAGE_SCALE).floor() as u32;
            heavy |= damage > 8;
            let (target, chance) = if roof == 0 {
                (Location::SecondFloor, 0.5)
            } else if state.has_flag_raised {
                (Location::Rooftop, 0.3)
            } else {
                (Location::Rooftop, 0.2)
            };
            (damage, target, chance, rng.gen_range(0..200), 0)
        }
        AttackKind::Artillery | AttackKind::Infantry => {
            let target = if rng.gen_bool(0.5) { Location::Entrance } else { Location::SecondFloor };
            let chance = if last_stand { 0.6 } else { 0.3 };

            let (damage, ammo, grenades) = if kind == AttackKind::Artillery {
                let small = (4.0 - avg_def.floor()) * 3.0;
                let multiplier = 3.0 + rng.gen::<f64>() * 2.0;
                let damage = (small * multiplier * DAMAGE_SCALE).floor() as u32;
                heavy |= damage > 15;
                kill_base = rng.gen_range(5..=14);
                (damage, 500 + kill_base * 50 + rng.gen_range(0..1000), rng.gen_range(5..=14))
            } else {
                let damage =
                    (rng.gen::<f64>() * INFANTRY_MAX_DAMAGE[def_index] * DAMAGE_SCALE).floor() as u32;
                kill_base = rng.gen_range(10..=39);
                (damage, kill_base * 50 + rng.gen_range(0..1000), rng.gen_range(40..=79))
            };

            let active = state.active_squads() as u32;
            let mut ammo = ammo;
            if active == 0 && !last_stand {
                ammo *= 3;
            }
            if !last_stand && active > 0 {
                mg_ammo_used = rng.gen_range(600..1200u32) * active;
                squad_loss = logistics::squad_casualties(state, rng);
                if squad_loss.as_ref().is_some_and(|l| l.wiped_out) {
                    morale::lower(state, SQUAD_WIPE_MORALE);
                    heavy = true;
                }
            }
            (damage, target, chance, ammo, grenades)
        }
    };

    // Consumption
    if last_stand {
        ammo_used = 0;
        mg_ammo_used = 0;
        grenades_used *= 2;
    } else {
        state.ammo = state.ammo.saturating_sub(ammo_used);
        state.machine_gun_ammo = state.machine_gun_ammo.saturating_sub(mg_ammo_used);
    }
    state.grenades = state.grenades.saturating_sub(grenades_used);

    // Kills
    let mut kills = 0;
    let mut kill_morale = 0;
    if kill_base > 0 {
        let factor = if last_stand {
            LAST_STAND_KILL_FACTOR
        } else {
            1.0 + avg_def * 0.2 + state.active_squads() as f64 * 0.5
        };
        kills = (f64::from(kill_base) * factor).floor() as u32;
        state.enemies_killed += kills;
        kill_morale = (rng.gen_range(1..=10u32) + kills / 5).min(20);
        morale::raise(state, kill_morale);
    }

    // Casualties
    let total = if last_stand {
        if kind == AttackKind::Artillery {
            rng.gen_range(10..=40)
        } else {
            rng.gen_range(1..=20)
        }
    } else {
        (f64::from(base_damage) * defense_modifier(&state.hmg_squads)).floor() as u32
    };
    let casualties = allocate_casualties(total, state.wounded, state.soldiers);
    state.wounded = state.wounded - casualties.wounded_deaths + casualties.healthy_injuries;
    state.soldiers -= casualties.healthy_deaths + casualties.healthy_injuries;
    if casualties.healthy_injuries > 0 {
        state.health = state.health.saturating_sub(INJURY_HEALTH_COST);
    }
    let death_morale = casualties.deaths() * MORALE_PER_DEATH;
    if death_morale > 0 {
        morale::lower(state, death_morale);
    }

    let fort_damaged = rng.gen_bool(fort_chance) && logistics::damage_fortification(state, target);

    CombatReport {
        kind,
        target,
        last_stand,
        disbanded,
        squad_loss,
        ammo_used,
        mg_ammo_used,
        grenades_used,
        kills,
        kill_morale,
        casualties,
        death_morale,
        fort_damaged,
        heavy,
    }
}

// ── Night Raid ─────────────────────────────────────────────────────────

const RAID_SUCCESS_CHANCE: f64 = 0.4;
const RAID_SUCCESS_MORALE: u32 = 10;
const RAID_FAIL_MORALE: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaidOutcome {
    pub success: bool,
    pub dead: u32,
    pub ammo_captured: u32,
    pub medkits_captured: u32,
}

pub fn night_raid<R: Rng + ?Sized>(state: &mut CampaignState, rng: &mut R) -> RaidOutcome {
    if rng.gen_bool(RAID_SUCCESS_CHANCE) {
        let dead = rng.gen_range(0..=5);
        let ammo_captured = if rng.gen_bool(0.7) { rng.gen_range(0..600) } else { 0 };
        let medkits_captured = if rng.gen_bool(0.5) { rng.gen_range(0..30) } else { 0 };
        state.soldiers = state.soldiers.saturating_sub(dead);
        state.ammo += ammo_captured;
        state.medkits += medkits_captured;
        morale::raise(state, RAID_SUCCESS_MORALE);
        RaidOutcome { success: true, dead, ammo_captured, medkits_captured }
    } else {
        let dead = rng.gen_range(10..=20);
        state.soldiers = state.soldiers.saturating_sub(dead);
        morale::lower(state, RAID_FAIL_MORALE);
        RaidOutcome { success: false, dead, ammo_captured: 0, medkits_captured: 0 }
    }
}
