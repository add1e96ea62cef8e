// ═══════════════════════════════════════════════════════════════════════
// Campaign setup — the fixed opening snapshot and prologue values
// ═══════════════════════════════════════════════════════════════════════

use crate::clock::GameClock;
use crate::types::*;
use std::collections::BTreeMap;

/// Hour the prologue opens at (19:00, day 0).
pub const PROLOGUE_HOUR: u32 = 19;

/// Starting configuration for one position.
struct PositionSetup {
    location: Location,
    riflemen: u32,
    build_count: u32,
}

fn position_setups() -> [PositionSetup; 4] {
    [
        PositionSetup { location: Location::Entrance,    riflemen: 140, build_count: 2 },
        PositionSetup { location: Location::SecondFloor, riflemen: 180, build_count: 2 },
        PositionSetup { location: Location::Rooftop,     riflemen: 10,  build_count: 0 },
        PositionSetup { location: Location::Basement,    riflemen: 24,  build_count: 6 },
    ]
}

/// Fortification level reached after `count` build actions.
pub fn level_for_count(count: u32) -> u32 {
    (count / 2).min(3)
}

/// Create the state a new campaign starts from.
/// 414 men: 354 riflemen plus two 30-man machine-gun squads.
pub fn create_initial_state() -> CampaignState {
    let setups = position_setups();

    let soldier_distribution: BTreeMap<Location, u32> =
        setups.iter().map(|s| (s.location, s.riflemen)).collect();
    let fortification_build_counts: BTreeMap<Location, u32> =
        setups.iter().map(|s| (s.location, s.build_count)).collect();
    let fortification_level: BTreeMap<Location, u32> = setups
        .iter()
        .map(|s| (s.location, level_for_count(s.build_count)))
        .collect();

    CampaignState {
        location: Location::Entrance,
        soldiers: soldier_distribution.values().sum(),
        wounded: 0,
        wounded_timer: 0,
        hmg_squads: vec![
            HmgSquad {
                name: "机枪一连".to_string(),
                location: Location::Entrance,
                count: SQUAD_MAX_COUNT,
                status: SquadStatus::Active,
            },
            HmgSquad {
                name: "机枪二连".to_string(),
                location: Location::SecondFloor,
                count: SQUAD_MAX_COUNT,
                status: SquadStatus::Active,
            },
        ],
        morale: 80,
        min_morale: 0,
        health: 100,
        day: 0,
        current_time: GameClock::new(PROLOGUE_HOUR, 0),
        turn_count: 0,
        last_rest_turn: 0,
        tutorial_step: 0,
        siege_meter: 10,
        active_tactical_card: None,
        pending_dilemma: None,
        ammo: 45_000,
        machine_gun_ammo: 18_000,
        grenades: 1_000,
        sandbags: 4_500,
        medkits: 40,
        has_flag_raised: false,
        flag_warned: false,
        enemies_killed: 0,
        triggered_events: Vec::new(),
        used_tactical_cards: Vec::new(),
        soldier_distribution,
        fortification_level,
        fortification_build_counts,
        is_game_over: false,
        game_result: GameResult::Ongoing,
        final_rank: None,
    }
}
