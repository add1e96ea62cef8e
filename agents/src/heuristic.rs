// ═══════════════════════════════════════════════════════════════════════
// Heuristic Commander — plays the siege with simple priorities.
// Considerably longer-lived than RandomCommander.
//
// Priority order each turn:
//   tutorial → night raid when short of ammunition → triage → rest on
//   low morale → fortify the weakest ground position → flag → speech
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Commander;
use lone_army_engine::interpreter::RAID_WINDOW;
use lone_army_engine::logistics::{MAX_FORT_LEVEL, SANDBAG_COST};
use lone_army_engine::tutorial::{STEP_AWAIT_FORTIFY, STEP_AWAIT_SUPPLIES};
use lone_army_engine::types::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Raid only when rifle ammunition is below this.
const RAID_AMMO_THRESHOLD: u32 = 10_000;
/// Never raid with fewer men than this.
const RAID_MIN_SOLDIERS: u32 = 120;
const REST_MORALE: u32 = 40;
const FLAG_MORALE: u32 = 60;
const SPEECH_MORALE: u32 = 75;

/// Fortification priority: ground attacks hit these two.
const FORTIFY_ORDER: [(Location, &str); 3] = [
    (Location::Entrance, "加固一楼"),
    (Location::SecondFloor, "加固二楼"),
    (Location::Rooftop, "加固屋顶"),
];

pub struct HeuristicCommander {
    rng: ChaCha8Rng,
}

impl HeuristicCommander {
    pub fn new(seed: u64) -> Self {
        HeuristicCommander { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Weakest unfinished position, entrance first on ties.
    fn fortify_order(&self, state: &CampaignState) -> Option<&'static str> {
        if state.sandbags < SANDBAG_COST {
            return None;
        }
        FORTIFY_ORDER
            .iter()
            .filter(|(loc, _)| state.fort_level(*loc) < MAX_FORT_LEVEL)
            .min_by_key(|(loc, _)| state.fort_level(*loc))
            .map(|(_, cmd)| *cmd)
    }

    fn wants_raid(&self, state: &CampaignState) -> bool {
        let night = (RAID_WINDOW.0..RAID_WINDOW.1).contains(&state.hour());
        night && state.ammo < RAID_AMMO_THRESHOLD && state.soldiers >= RAID_MIN_SOLDIERS
    }

    /// Rough worth of one outcome to the garrison.
    fn effects_value(effects: &[Effect]) -> f64 {
        effects
            .iter()
            .map(|e| match *e {
                Effect::Morale { amount } => f64::from(amount) * 2.0,
                Effect::Gain { resource, amount } => {
                    let per_unit = match resource {
                        Resource::Ammo | Resource::MachineGunAmmo => 0.01,
                        Resource::Grenades => 0.2,
                        Resource::Sandbags => 0.02,
                        Resource::Medkits => 1.0,
                        Resource::Soldiers => 3.0,
                    };
                    f64::from(amount) * per_unit
                }
                Effect::Casualties { min, max } => -f64::from(min + max) / 2.0 * 3.0,
                Effect::FortDamage { .. } => -20.0,
                Effect::Siege { amount } => -f64::from(amount),
                Effect::HeavyDamage => 0.0,
            })
            .sum()
    }

    fn option_value(option: &DilemmaOption) -> f64 {
        let base = Self::effects_value(&option.effects);
        match &option.trap {
            Some(trap) => {
                let p = trap.chance.clamp(0.0, 1.0);
                base * (1.0 - p) + Self::effects_value(&trap.effects) * p
            }
            None => base,
        }
    }
}

impl Commander for HeuristicCommander {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn next_command(&mut self, state: &CampaignState) -> String {
        match state.tutorial_step {
            STEP_AWAIT_FORTIFY => return "加固一楼".to_string(),
            STEP_AWAIT_SUPPLIES => return "整理物资".to_string(),
            _ => {}
        }

        if self.wants_raid(state) {
            return "夜袭".to_string();
        }
        if state.wounded > 0 && state.medkits > 0 {
            return "治疗伤员".to_string();
        }
        if state.morale < REST_MORALE {
            return "休息".to_string();
        }
        if let Some(cmd) = self.fortify_order(state) {
            return cmd.to_string();
        }
        if !state.has_flag_raised && state.morale >= FLAG_MORALE {
            return if state.location == Location::Rooftop {
                "升旗".to_string()
            } else {
                "去屋顶".to_string()
            };
        }
        if state.morale < SPEECH_MORALE || self.rng.gen_bool(0.5) {
            "给弟兄们训话".to_string()
        } else {
            "休息".to_string()
        }
    }

    fn choose_option(&mut self, _state: &CampaignState, dilemma: &Dilemma) -> usize {
        dilemma
            .options
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| Self::option_value(a).total_cmp(&Self::option_value(b)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn use_card(&mut self, state: &CampaignState, card: &TacticalCard) -> bool {
        // A morale card is wasted at the cap.
        match card.bonus {
            CardBonus::Morale { amount } => state.morale + amount <= 100 || state.morale < SPEECH_MORALE,
            CardBonus::Gain { .. } => true,
        }
    }
}
