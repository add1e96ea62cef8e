// ═══════════════════════════════════════════════════════════════════════
// Random Commander — draws every order from a fixed vocabulary.
// Serves as baseline and for shaking out engine stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Commander;
use lone_army_engine::{CampaignState, Dilemma, TacticalCard};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Orders a player might type, covering every action rule plus chatter.
pub const VOCABULARY: [&str; 20] = [
    "加固一楼",
    "加固二楼",
    "加固屋顶",
    "休息",
    "治疗伤员",
    "去屋顶",
    "去一楼",
    "去二楼",
    "前往地下室",
    "升旗",
    "给弟兄们训话",
    "夜袭",
    "请求补给",
    "整理物资",
    "你是谁",
    "鬼子来了多少",
    "我饿了",
    "师部有电报吗",
    "外面怎么样",
    "你好",
];

pub struct RandomCommander {
    rng: ChaCha8Rng,
}

impl RandomCommander {
    pub fn new(seed: u64) -> Self {
        RandomCommander { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl Commander for RandomCommander {
    fn name(&self) -> &str {
        "Random"
    }

    fn next_command(&mut self, _state: &CampaignState) -> String {
        VOCABULARY.choose(&mut self.rng).copied().unwrap_or("休息").to_string()
    }

    fn choose_option(&mut self, _state: &CampaignState, dilemma: &Dilemma) -> usize {
        if dilemma.options.is_empty() {
            0
        } else {
            self.rng.gen_range(0..dilemma.options.len())
        }
    }

    fn use_card(&mut self, _state: &CampaignState, _card: &TacticalCard) -> bool {
        self.rng.gen_bool(0.5)
    }
}
