// ═══════════════════════════════════════════════════════════════════════
// Endgame — defeat / victory checks and the final rank
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;

/// Fewer healthy soldiers than this and the warehouse falls.
pub const DEFEAT_SOLDIERS: u32 = 20;
/// Surviving past this day wins the campaign.
pub const VICTORY_DAY: u32 = 5;

/// Score thresholds with the closing verdict for each rank, best first.
/// `{kills}` in a verdict is replaced by the kill count.
const RANKS: [(u32, &str, &str); 3] = [
    (4000, "在此封神", "奇迹！绝大多数弟兄都活了下来。击毙日军{kills}人。你的指挥艺术将被写进教科书！"),
    (3000, "民族脊梁", "你保全了主力部队，打出了国军的威风。击毙日军{kills}人。"),
    (2000, "血战到底", "虽然伤亡过半，但那面旗帜始终飘扬。击毙日军{kills}人。"),
];
const FALLBACK_RANK: &str = "尽忠职守";
const FALLBACK_VERDICT: &str = "你完成了基本的守备任务，但在惨烈的战斗中损失惨重。";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    pub result: GameResult,
    pub score: u32,
    pub rank: &'static str,
}

impl FinalReport {
    /// Closing block appended to the last turn's narrative.
    pub fn narrative(&self, state: &CampaignState) -> String {
        let header = match self.result {
            GameResult::Victory => "【战役胜利】",
            _ => "【战役结束】",
        };
        let verdict = verdict_for(self.rank).replace("{kills}", &state.enemies_killed.to_string());
        format!(
            "{header}\n最终军衔评价：{}\n{verdict}\n坚守至第{}天，幸存弟兄{}人，击毙日军{}人，总评分{}。",
            self.rank, state.day, state.soldiers, state.enemies_killed, self.score
        )
    }
}

pub fn score(state: &CampaignState) -> u32 {
    state.soldiers * 10
        + state.fort_level(Location::Entrance) * 50
        + state.day * 100
        + state.enemies_killed * 2
}

pub fn rank_for(score: u32) -> &'static str {
    RANKS
        .iter()
        .find(|(min, _, _)| score >= *min)
        .map(|(_, rank, _)| *rank)
        .unwrap_or(FALLBACK_RANK)
}

/// Closing verdict template for a rank name.
pub fn verdict_for(rank: &str) -> &'static str {
    RANKS
        .iter()
        .find(|(_, name, _)| *name == rank)
        .map(|(_, _, verdict)| *verdict)
        .unwrap_or(FALLBACK_VERDICT)
}

pub fn is_defeated(state: &CampaignState) -> bool {
    state.soldiers < DEFEAT_SOLDIERS || state.health == 0
}

/// Evaluate the end conditions once. Terminal: a finished campaign is
/// never re-evaluated.
pub fn conclude(state: &mut CampaignState) -> Option<FinalReport> {
    if state.is_game_over {
        return None;
    }
    let result = if is_defeated(state) {
        GameResult::Defeat
    } else if state.day > VICTORY_DAY {
        GameResult::Victory
    } else {
        return None;
    };

    let score = score(state);
    let rank = rank_for(score);
    state.is_game_over = true;
    state.game_result = result;
    state.final_rank = Some(rank.to_string());
    Some(FinalReport { result, score, rank })
}
