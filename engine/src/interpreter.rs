// ═══════════════════════════════════════════════════════════════════════
// Command Interpreter — free text to one action intent
//
// Classification is plain substring matching over the lower-cased command.
// The action rules live in one ordered table; the first rule whose
// predicate matches wins, so earlier rules shadow later ones. Anything the
// table does not claim falls through to the conversational classifier.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{CampaignState, Location};

/// Night raids are only possible in this hour window, [start, end).
pub const RAID_WINDOW: (u32, u32) = (0, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Raid,
    /// Raid keywords outside the night window.
    RaidBlocked,
    SupplyBlocked,
    /// Destination is None when the command names no known position.
    Move(Option<Location>),
    Fortify(Location),
    Rest,
    Heal,
    RaiseFlag,
    Speech,
    Chatter(ChatterTopic),
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Raid => "raid",
            Intent::RaidBlocked => "raid_blocked",
            Intent::SupplyBlocked => "supply_blocked",
            Intent::Move(_) => "move",
            Intent::Fortify(_) => "fortify",
            Intent::Rest => "rest",
            Intent::Heal => "heal",
            Intent::RaiseFlag => "flag",
            Intent::Speech => "speech",
            Intent::Chatter(_) => "chatter",
        }
    }
}

// ── Action Rules ───────────────────────────────────────────────────────

fn any_of(cmd: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| cmd.contains(k))
}

struct Rule {
    matches: fn(&str) -> bool,
    intent: fn(&str, &CampaignState) -> Intent,
}

const RULES: &[Rule] = &[
    Rule {
        matches: |c| any_of(c, &["突袭", "夜袭", "偷袭"]),
        intent: |_, s| {
            if (RAID_WINDOW.0..RAID_WINDOW.1).contains(&s.hour()) {
                Intent::Raid
            } else {
                Intent::RaidBlocked
            }
        },
    },
    Rule {
        // `&&` binds tighter: 补给 alone always matches, 物资 only without 整理.
        matches: |c| c.contains("补给") || (c.contains("物资") && !c.contains("整理")),
        intent: |_, _| Intent::SupplyBlocked,
    },
    Rule {
        matches: |c| any_of(c, &["去", "前往", "撤"]),
        intent: |c, _| Intent::Move(move_destination(c)),
    },
    Rule {
        matches: |c| any_of(c, &["加固", "修", "工事"]),
        intent: |c, s| Intent::Fortify(fortify_target(c).unwrap_or(s.location)),
    },
    Rule {
        matches: |c| any_of(c, &["休息", "睡", "整顿"]),
        intent: |_, _| Intent::Rest,
    },
    Rule {
        matches: |c| any_of(c, &["治疗", "抢救", "救", "医"]),
        intent: |_, _| Intent::Heal,
    },
    Rule {
        matches: |c| c.contains("升旗"),
        intent: |_, _| Intent::RaiseFlag,
    },
    Rule {
        matches: |c| any_of(c, &["演讲", "训话", "鼓舞", "动员", "坚持", "顶住", "拼了", "万岁"]),
        intent: |_, _| Intent::Speech,
    },
];

/// Destination keywords for movement. "顶" alone is enough for the roof.
fn move_destination(cmd: &str) -> Option<Location> {
    if cmd.contains("顶") {
        Some(Location::Rooftop)
    } else if cmd.contains("二楼") {
        Some(Location::SecondFloor)
    } else if cmd.contains("一楼") {
        Some(Location::Entrance)
    } else if cmd.contains("地下") {
        Some(Location::Basement)
    } else {
        None
    }
}

fn fortify_target(cmd: &str) -> Option<Location> {
    if cmd.contains("一楼") {
        Some(Location::Entrance)
    } else if cmd.contains("二楼") {
        Some(Location::SecondFloor)
    } else if cmd.contains("屋顶") {
        Some(Location::Rooftop)
    } else if cmd.contains("地下") {
        Some(Location::Basement)
    } else {
        None
    }
}

/// Classify an already lower-cased command against the current state.
pub fn classify(cmd: &str, state: &CampaignState) -> Intent {
    RULES
        .iter()
        .find(|r| (r.matches)(cmd))
        .map(|r| (r.intent)(cmd, state))
        .unwrap_or_else(|| Intent::Chatter(classify_chatter(cmd)))
}

// ── Conversation ───────────────────────────────────────────────────────

/// Canned conversational categories, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatterTopic {
    Identity,
    Desertion,
    Radio,
    Aggression,
    Urgency,
    Difficulty,
    Adjutant,
    Machinegun,
    Soldiers,
    Environment,
    Hunger,
    Enemy,
    Greeting,
    Confused,
}

impl ChatterTopic {
    pub const ALL: [ChatterTopic; 14] = [
        ChatterTopic::Identity,
        ChatterTopic::Desertion,
        ChatterTopic::Radio,
        ChatterTopic::Aggression,
        ChatterTopic::Urgency,
        ChatterTopic::Difficulty,
        ChatterTopic::Adjutant,
        ChatterTopic::Machinegun,
        ChatterTopic::Soldiers,
        ChatterTopic::Environment,
        ChatterTopic::Hunger,
        ChatterTopic::Enemy,
        ChatterTopic::Greeting,
        ChatterTopic::Confused,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ChatterTopic::Identity => &["你是谁", "我是谁", "介绍", "名字", "身份", "穿越", "系统"],
            ChatterTopic::Desertion => &[
                "跑", "逃", "撤退", "活下去", "会死吗", "怕死", "输", "投降", "回家", "不想死", "能走吗",
            ],
            ChatterTopic::Radio => &[
                "电报", "师部", "命令", "消息", "孙元良", "顾祝同", "蒋", "上级", "无线电", "信号",
            ],
            ChatterTopic::Aggression => &[
                "杀", "拼", "干", "弄死", "击退", "冲锋", "进攻", "灭", "宰", "打死", "反击", "血",
            ],
            ChatterTopic::Urgency => &["快", "慢", "加速", "没时间", "速度", "抓紧", "磨蹭", "来不及", "迅速"],
            ChatterTopic::Difficulty => &[
                "太难", "猛", "守不住", "变态", "强", "怎么打", "太多", "受不了", "绝望", "不行",
            ],
            ChatterTopic::Adjutant => &["副官", "参谋", "报告", "长官"],
            ChatterTopic::Machinegun => &["机枪", "连长", "重火力", "弹药", "马克沁", "扫射"],
            ChatterTopic::Soldiers => &["大家", "弟兄", "士兵", "战士", "人", "咱们", "队伍", "一营"],
            ChatterTopic::Environment => &["看", "观察", "环境", "周围", "河", "租界", "桥", "灯", "外面"],
            ChatterTopic::Hunger => &["饿", "吃", "水", "渴", "饭", "粮"],
            ChatterTopic::Enemy => &["鬼子", "日军", "日本", "敌人", "仇"],
            ChatterTopic::Greeting => &["你好", "在吗", "喂", "嗨", "收到", "好"],
            ChatterTopic::Confused => &[],
        }
    }

    /// Content pool the reply is drawn from.
    pub fn pool_id(self) -> &'static str {
        match self {
            ChatterTopic::Identity => "chatter_identity",
            ChatterTopic::Desertion => "chatter_desertion",
            ChatterTopic::Radio => "chatter_radio",
            ChatterTopic::Aggression => "chatter_aggression",
            ChatterTopic::Urgency => "chatter_urgency",
            ChatterTopic::Difficulty => "chatter_difficulty",
            ChatterTopic::Adjutant => "chatter_adjutant",
            ChatterTopic::Machinegun => "chatter_machinegun",
            ChatterTopic::Soldiers => "chatter_soldiers",
            ChatterTopic::Environment => "chatter_environment",
            ChatterTopic::Hunger => "chatter_hunger",
            ChatterTopic::Enemy => "chatter_enemy",
            ChatterTopic::Greeting => "chatter_greeting",
            ChatterTopic::Confused => "chatter_confused",
        }
    }
}

pub fn classify_chatter(cmd: &str) -> ChatterTopic {
    ChatterTopic::ALL
        .into_iter()
        .find(|t| any_of(cmd, t.keywords()))
        .unwrap_or(ChatterTopic::Confused)
}

// ── Tutorial & Control Commands ────────────────────────────────────────

/// Exact-match campaign start.
pub fn is_start_command(cmd: &str) -> bool {
    matches!(cmd.trim(), "start_game" | "开始")
}

pub fn mentions_fortify(cmd: &str) -> bool {
    any_of(cmd, &["加固", "修"])
}

/// Loose "organize supplies" match used only by the tutorial.
pub fn mentions_organize(cmd: &str) -> bool {
    any_of(cmd, &["补给", "物资", "整", "理"])
}
