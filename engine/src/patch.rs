// ═══════════════════════════════════════════════════════════════════════
// State patch — the sparse delta a turn hands back to the caller
//
// Merge semantics:
//   • scalar and list fields overwrite
//   • map fields (soldier distribution, fortification level and build
//     counts) merge key-by-key
//   • nullable fields use a double Option: absent = untouched,
//     Some(None) = cleared
// The engine derives a patch by diffing the working state against the
// state it was given, so a field that no stage touched never appears.
// ═══════════════════════════════════════════════════════════════════════

use crate::clock::GameClock;
use crate::types::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soldiers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wounded: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wounded_timer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmg_squads: Option<Vec<HmgSquad>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_morale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<GameClock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rest_turn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_step: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siege_meter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub active_tactical_card: Option<Option<TacticalCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub pending_dilemma: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_gun_ammo: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grenades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medkits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_flag_raised: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_warned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies_killed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_tactical_cards: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soldier_distribution: Option<BTreeMap<Location, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fortification_level: Option<BTreeMap<Location, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fortification_build_counts: Option<BTreeMap<Location, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_game_over: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_result: Option<GameResult>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub final_rank: Option<Option<String>>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

// Fields compared and merged wholesale.
macro_rules! whole_fields {
    ($mac:ident) => {
        $mac!(
            location, soldiers, wounded, wounded_timer, hmg_squads, morale, min_morale,
            health, day, current_time, turn_count, last_rest_turn, tutorial_step,
            siege_meter, active_tactical_card, pending_dilemma, ammo, machine_gun_ammo,
            grenades, sandbags, medkits, has_flag_raised, flag_warned, enemies_killed,
            triggered_events, used_tactical_cards, is_game_over, game_result, final_rank
        )
    };
}

// Fields merged key-by-key.
macro_rules! map_fields {
    ($mac:ident) => {
        $mac!(soldier_distribution, fortification_level, fortification_build_counts)
    };
}

impl StatePatch {
    /// Sparse delta turning `base` into `next`.
    pub fn diff(base: &CampaignState, next: &CampaignState) -> StatePatch {
        let mut patch = StatePatch::default();

        macro_rules! diff_whole {
            ($($f:ident),*) => {$(
                if base.$f != next.$f {
                    patch.$f = Some(next.$f.clone());
                }
            )*};
        }
        macro_rules! diff_map {
            ($($f:ident),*) => {$(
                let changed: BTreeMap<Location, u32> = next.$f.iter()
                    .filter(|(k, v)| base.$f.get(*k) != Some(*v))
                    .map(|(k, v)| (*k, *v))
                    .collect();
                if !changed.is_empty() {
                    patch.$f = Some(changed);
                }
            )*};
        }

        whole_fields!(diff_whole);
        map_fields!(diff_map);
        patch
    }

    /// A patch that overwrites every field of the target with `state`.
    pub fn full(state: &CampaignState) -> StatePatch {
        let mut patch = StatePatch::default();
        macro_rules! set_whole {
            ($($f:ident),*) => {$( patch.$f = Some(state.$f.clone()); )*};
        }
        macro_rules! set_map {
            ($($f:ident),*) => {$( patch.$f = Some(state.$f.clone()); )*};
        }
        whole_fields!(set_whole);
        map_fields!(set_map);
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == StatePatch::default()
    }
}

impl CampaignState {
    /// Caller-side merge of a turn patch. Every merged response counts as
    /// one turn.
    pub fn merge(&mut self, patch: &StatePatch) {
        macro_rules! merge_whole {
            ($($f:ident),*) => {$(
                if let Some(v) = &patch.$f {
                    self.$f = v.clone();
                }
            )*};
        }
        macro_rules! merge_map {
            ($($f:ident),*) => {$(
                if let Some(m) = &patch.$f {
                    for (k, v) in m {
                        self.$f.insert(*k, *v);
                    }
                }
            )*};
        }
        whole_fields!(merge_whole);
        map_fields!(merge_map);
        self.turn_count += 1;
    }
}
