// ═══════════════════════════════════════════════════════════════════════
// Core types — campaign state, squads, events, and the turn response
// ═══════════════════════════════════════════════════════════════════════

use crate::clock::GameClock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Enums ──────────────────────────────────────────────────────────────

/// The four defensible positions inside the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "地下室")]
    Basement,
    #[serde(rename = "一楼入口")]
    Entrance,
    #[serde(rename = "二楼阵地")]
    SecondFloor,
    #[serde(rename = "屋顶")]
    Rooftop,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Basement,
        Location::Entrance,
        Location::SecondFloor,
        Location::Rooftop,
    ];

    /// In-fiction name, also used as the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Location::Basement => "地下室",
            Location::Entrance => "一楼入口",
            Location::SecondFloor => "二楼阵地",
            Location::Rooftop => "屋顶",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquadStatus {
    Active,
    /// Headcount reached zero in combat. Terminal.
    Destroyed,
    /// Machine-gun ammunition ran out; crew folded into the infantry. Terminal.
    Disbanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    #[default]
    Ongoing,
    Victory,
    Defeat,
}

/// Event-kind tag attached to every turn response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnEvent {
    #[default]
    None,
    Attack,
    NewDay,
    GameOver,
    Victory,
}

/// Screen effect requested by a turn. Ordered so that `max` escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VisualEffect {
    #[default]
    None,
    Shake,
    HeavyDamage,
}

/// Stockpiles that dilemma and card effects can add to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Ammo,
    MachineGunAmmo,
    Grenades,
    Sandbags,
    Medkits,
    Soldiers,
}

// ── HMG Squad ──────────────────────────────────────────────────────────

/// Maximum headcount of a heavy-machine-gun squad.
pub const SQUAD_MAX_COUNT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmgSquad {
    pub name: String,
    pub location: Location,
    pub count: u32,
    pub status: SquadStatus,
}

impl HmgSquad {
    pub fn is_active(&self) -> bool {
        self.status == SquadStatus::Active
    }
}

// ── Dilemmas & Tactical Cards ──────────────────────────────────────────

/// One atomic consequence of a dilemma branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Effect {
    /// Signed morale change; decreases respect the morale floor.
    Morale { amount: i32 },
    Gain { resource: Resource, amount: u32 },
    /// Healthy soldiers killed, drawn uniformly from `min..=max`.
    Casualties { min: u32, max: u32 },
    /// Fortification at the location drops one level.
    FortDamage { location: Location },
    /// Raises the siege meter.
    Siege { amount: u32 },
    /// Forces the heavy-damage visual whatever the other effects did.
    HeavyDamage,
}

/// A branch outcome that may turn out to be an ambush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub chance: f64,
    pub narrative: String,
    pub note: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilemmaOption {
    pub label: String,
    #[serde(default)]
    pub risk_text: String,
    pub narrative: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub trap: Option<Trap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dilemma {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<DilemmaOption>,
}

impl Dilemma {
    /// The command string that resolves this dilemma with `option`.
    pub fn action_command(&self, option: usize) -> String {
        format!("EVT_RESOLVE:{}:{}", self.id, option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CardBonus {
    Morale { amount: u32 },
    Gain { resource: Resource, amount: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effect_text: String,
    /// Fixed command run as an ordinary turn when the card is executed.
    pub action_cmd: String,
    pub bonus: CardBonus,
    pub color: String,
}

// ── Campaign State ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignState {
    pub location: Location,
    pub soldiers: u32,
    pub wounded: u32,
    /// Minutes since the wounded were last triaged.
    pub wounded_timer: u32,

    pub hmg_squads: Vec<HmgSquad>,

    pub morale: u32,
    /// Morale floor. Only ever raised.
    pub min_morale: u32,
    pub health: u32,
    pub day: u32,
    pub current_time: GameClock,
    pub turn_count: u32,
    pub last_rest_turn: u32,

    /// 0 = not started, 1 = awaiting fortify, 2 = awaiting supplies, 3 = done.
    pub tutorial_step: u8,
    pub siege_meter: u32,
    #[serde(default)]
    pub active_tactical_card: Option<TacticalCard>,
    /// Dilemma offered but not yet resolved; suspends ordinary turns.
    #[serde(default)]
    pub pending_dilemma: Option<String>,

    pub ammo: u32,
    pub machine_gun_ammo: u32,
    pub grenades: u32,
    pub sandbags: u32,
    pub medkits: u32,

    pub has_flag_raised: bool,
    pub flag_warned: bool,
    pub enemies_killed: u32,
    pub triggered_events: Vec<String>,
    pub used_tactical_cards: Vec<String>,

    pub soldier_distribution: BTreeMap<Location, u32>,
    pub fortification_level: BTreeMap<Location, u32>,
    pub fortification_build_counts: BTreeMap<Location, u32>,

    pub is_game_over: bool,
    pub game_result: GameResult,
    #[serde(default)]
    pub final_rank: Option<String>,
}

impl CampaignState {
    pub fn fort_level(&self, loc: Location) -> u32 {
        self.fortification_level.get(&loc).copied().unwrap_or(0)
    }

    pub fn build_count(&self, loc: Location) -> u32 {
        self.fortification_build_counts.get(&loc).copied().unwrap_or(0)
    }

    pub fn active_squads(&self) -> usize {
        self.hmg_squads.iter().filter(|s| s.is_active()).count()
    }

    /// Current hour of day (0–23).
    pub fn hour(&self) -> u32 {
        self.current_time.hour()
    }

    pub fn add_resource(&mut self, resource: Resource, amount: u32) {
        let slot = match resource {
            Resource::Ammo => &mut self.ammo,
            Resource::MachineGunAmmo => &mut self.machine_gun_ammo,
            Resource::Grenades => &mut self.grenades,
            Resource::Sandbags => &mut self.sandbags,
            Resource::Medkits => &mut self.medkits,
            Resource::Soldiers => &mut self.soldiers,
        };
        *slot = slot.saturating_add(amount);
    }

    /// Appends to the triggered-event set unless already present.
    pub fn mark_event(&mut self, id: &str) {
        if !self.triggered_events.iter().any(|e| e == id) {
            self.triggered_events.push(id.to_string());
        }
    }
}

// ── Turn Response ──────────────────────────────────────────────────────

/// Everything one call into the engine hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub narrative: String,
    pub patch: crate::patch::StatePatch,
    pub event: TurnEvent,
    pub visual: VisualEffect,
    pub attack_location: Option<Location>,
    pub dilemma: Option<Dilemma>,
    pub enemy_intel: Option<String>,
}
