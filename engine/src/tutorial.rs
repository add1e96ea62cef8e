// ═══════════════════════════════════════════════════════════════════════
// Tutorial gate — scripted opening turns
//
//   0 ──start──▶ 1 ──fortify──▶ 2 ──organize──▶ 3 (general simulation)
//
// While the step is 1 or 2, only the expected command moves the campaign;
// anything else gets a prompt and an empty patch.
// ═══════════════════════════════════════════════════════════════════════

use crate::clock::GameClock;
use crate::content::{pool, Content};
use crate::interpreter::{mentions_fortify, mentions_organize};
use crate::patch::StatePatch;
use crate::setup::create_initial_state;
use crate::types::*;

pub const STEP_AWAIT_FORTIFY: u8 = 1;
pub const STEP_AWAIT_SUPPLIES: u8 = 2;
pub const STEP_DONE: u8 = 3;

/// Entry fortification is forced to this level by the first lesson.
const LESSON_FORT_LEVEL: u32 = 2;
const LESSON_FORT_MINUTES: u32 = 120;
const DAWN_HOUR: u32 = 8;
const DAWN_SIEGE: u32 = 20;

pub fn in_progress(state: &CampaignState) -> bool {
    (STEP_AWAIT_FORTIFY..STEP_DONE).contains(&state.tutorial_step)
}

/// Fresh campaign at the prologue. The patch overwrites every field, so it
/// also discards a finished campaign.
pub fn start_campaign(content: &Content) -> TurnResponse {
    let mut fresh = create_initial_state();
    fresh.tutorial_step = STEP_AWAIT_FORTIFY;

    TurnResponse {
        narrative: content.line(pool::PROLOGUE),
        patch: StatePatch::full(&fresh),
        enemy_intel: Some(content.line(pool::PROLOGUE_INTEL)),
        ..Default::default()
    }
}

/// One turn while the tutorial is running.
pub fn gate(state: &CampaignState, cmd: &str, content: &Content) -> TurnResponse {
    match state.tutorial_step {
        STEP_AWAIT_FORTIFY if mentions_fortify(cmd) => {
            let mut next = state.clone();
            next.tutorial_step = STEP_AWAIT_SUPPLIES;
            next.fortification_level.insert(Location::Entrance, LESSON_FORT_LEVEL);
            next.fortification_build_counts
                .insert(Location::Entrance, LESSON_FORT_LEVEL * 2);
            next.current_time = next.current_time.advance(LESSON_FORT_MINUTES).0;

            TurnResponse {
                narrative: content.line(pool::TUTORIAL_FORTIFIED),
                patch: StatePatch::diff(state, &next),
                visual: VisualEffect::Shake,
                ..Default::default()
            }
        }
        STEP_AWAIT_FORTIFY => prompt(content, pool::TUTORIAL_FORTIFY_PROMPT),

        STEP_AWAIT_SUPPLIES if mentions_organize(cmd) => {
            let mut next = state.clone();
            next.tutorial_step = STEP_DONE;
            next.day = 1;
            next.current_time = GameClock::new(DAWN_HOUR, 0);
            next.siege_meter = DAWN_SIEGE;

            TurnResponse {
                narrative: content.line(pool::TUTORIAL_DAWN),
                patch: StatePatch::diff(state, &next),
                event: TurnEvent::NewDay,
                enemy_intel: Some(content.line(pool::TUTORIAL_DAWN_INTEL)),
                ..Default::default()
            }
        }
        _ => prompt(content, pool::TUTORIAL_SUPPLY_PROMPT),
    }
}

fn prompt(content: &Content, id: &str) -> TurnResponse {
    TurnResponse { narrative: content.line(id), ..Default::default() }
}
