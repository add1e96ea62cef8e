// ═══════════════════════════════════════════════════════════════════════
// Built-in campaign content — text pools, dilemmas, tactical cards, intel
// ═══════════════════════════════════════════════════════════════════════

use crate::content::{pool, Content};
use crate::interpreter::ChatterTopic;
use crate::types::*;
use std::collections::BTreeMap;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn standard() -> Content {
    Content {
        pools: text_pools(),
        dilemmas: dilemmas(),
        tactical_cards: tactical_cards(),
        intel_by_day: lines(&[
            "日军动向不明，似乎正在集结。",
            "日军第六师团先头部队已到达，正在试探我军火力。",
            "日军增兵了，看来他们准备发动全面进攻。",
            "敌军调来了装甲车和平射炮，形势严峻。",
            "日军已将我军完全包围，并在苏州河对岸架设了机枪。",
            "日军似乎失去了耐心，可能会动用重武器进行毁灭性打击。",
            "日军已成强弩之末，但我们也到了极限。",
        ]),
    }
}

// ── Text Pools ─────────────────────────────────────────────────────────

fn text_pools() -> BTreeMap<String, Vec<String>> {
    let mut pools = BTreeMap::new();
    let mut add = |id: &str, items: &[&str]| {
        pools.insert(id.to_string(), lines(items));
    };

    // Fixed lines
    add(pool::PROLOGUE, &[
        "1937年10月26日，19:00。上海闸北，四行仓库。\n\n冷雨凄迷，苏州河水在黑暗中静静流淌。你刚刚接管防务，脚下的混凝土都在随着远处日军的炮火颤抖。\n\n“团附！团附！”副官满头大汗地冲过来，一把抓住你的袖子，“一楼大门的工事还没修好！沙袋不够厚，鬼子的坦克一炮就能轰开！如果现在不【加固一楼】，我们今晚都得死！”\n\n（新手引导：日军攻势迫在眉睫，请立即下令加固工事。）",
    ]);
    add(pool::PROLOGUE_INTEL, &["侦察兵报告：日军正在集结步兵，似乎准备进行试探性进攻。"]);
    add(pool::TUTORIAL_FORTIFIED, &[
        "你立刻组织人手搬运沙袋。人多力量大，大门很快被堵得严严实实。\n\n砰！砰！几发冷枪打在刚修好的沙袋上，溅起一片尘土。\n\n“好险...”副官擦了擦汗，“团附，还有个事。弟兄们刚撤下来，物资混乱。得赶紧【整理补给】！”",
    ]);
    add(pool::TUTORIAL_FORTIFY_PROMPT, &["副官急得直跺脚：“团附！大门要紧啊！鬼子马上就到了！快下令【加固一楼】吧！”"]);
    add(pool::TUTORIAL_DAWN, &[
        "你下令清点物资。经过一夜的整理，成箱的手榴弹和子弹被整齐地码放在各个射击位旁。\n\n不知不觉，天亮了。\n\n10月27日，第一天。\n晨雾散去，日军的膏药旗在废墟中若隐若现。真正的恶战，开始了。",
    ]);
    add(pool::TUTORIAL_DAWN_INTEL, &["侦察兵报告：日军步兵已展开，主要威胁为冷枪和轻型迫击炮。"]);
    add(pool::TUTORIAL_SUPPLY_PROMPT, &["“团附，请下令【整理补给】！”"]);
    add(pool::DILEMMA_PROMPT, &["副官压低声音：“团附，外面的事还等着您拿主意，弟兄们都看着呢。”"]);
    add(pool::DILEMMA_UNKNOWN, &["副官愣了一下：“团附，这件事已经处理过了。”"]);
    add(pool::CAMPAIGN_OVER, &["战役已经结束。如需再战，请重新开始。"]);
    add(pool::CARD_NONE, &["眼下没有可以利用的战机。"]);
    add(pool::RAID_BLOCKED, &[
        "副官拦住了你：“团附！现在天还亮着，外面全是鬼子的狙击手和观察哨。现在出去就是送死！请等到深夜（00:00-05:00）再行动。”",
    ]);
    add(pool::SUPPLY_BLOCKED, &[
        "通讯兵无奈地摇摇头：“团附，租界那边被封锁了，上面也没有空投计划。我们现在只能靠自己，或者等待突发的机会。”",
    ]);
    add(pool::FLAG_OFF_ROOF, &["副官：“长官，升旗必须去【屋顶】！”"]);
    add(pool::FLAG_ALREADY, &["青天白日满地红已经在楼顶飘扬了。"]);
    add(pool::HMG_LOST, &[
        "【重火力丧失】机枪弹已耗尽！机枪连的弟兄们红着眼拆下滚烫的枪管，拿起步枪加入了步兵防线！防御力大幅下降！",
    ]);

    // Combat flavor
    add(pool::RAID_SUCCESS, &[
        "【夜袭得手】突击队摸黑越过废墟，手榴弹在日军哨位里炸开了花。弟兄们扛着缴获的弹药箱撤了回来。",
        "【夜袭得手】借着雨声掩护，突击队端掉了一个日军机枪巢，带回了不少物资。",
    ]);
    add(pool::RAID_FAIL, &[
        "【夜袭失利】照明弹突然升空，突击队暴露在开阔地上。日军的机枪像镰刀一样扫了过来……",
        "【夜袭失利】日军早有防备，突击队刚出后门就踩进了埋伏圈。",
    ]);
    add(pool::BAYONET_FIGHT, &[
        "【白刃战】子弹打光了！弟兄们上好刺刀，咆哮着迎向冲进来的日军。走廊里只剩下金属碰撞和惨叫声。",
        "【白刃战】最后一发子弹也打完了。“上刺刀！”你拔出佩刀，带头冲向楼梯口。",
    ]);
    add(pool::ATTACK_BOMBING, &[
        "【空袭】刺耳的俯冲声划破天空，日军轰炸机扔下的炸弹在楼顶炸开，碎石和钢筋四处飞溅。",
        "【空袭】三架日机低空掠过，炸弹接二连三地砸在仓库上，整栋楼都在摇晃。",
    ]);
    add(pool::ATTACK_ARTILLERY, &[
        "【炮击】日军的平射炮开始轰击，墙体被打出一个个大洞，烟尘弥漫。",
        "【炮击】炮弹呼啸而至，外墙在连续的爆炸中不断剥落。",
    ]);
    add(pool::ATTACK_INFANTRY, &[
        "【步兵冲锋】日军步兵在坦克掩护下发起冲锋，枪声、喊杀声响成一片。",
        "【步兵冲锋】一队日军借着烟幕摸到了墙根，手榴弹在窗口外不断爆炸。",
    ]);
    add(pool::WOUNDED_DEATH, &[
        "临时救护所里，一名重伤员没能熬过去。卫生兵默默地为他盖上了军毯。",
        "伤员们的呻吟声渐渐低了下去。又有几个弟兄永远地闭上了眼睛。",
    ]);
    add(pool::DEATH_FLAVOR, &[
        "来自{origin}的{name}倒在了射击孔旁，手里还紧握着步枪。",
        "{name}，{origin}人，为了掩护战友被弹片击中，再也没有起来。",
    ]);
    add(pool::SOLDIER_NAMES, &["陈树生", "王文川", "杨瑞符", "雷雄", "上官志标", "张青林"]);
    add(pool::SOLDIER_ORIGINS, &["湖北", "广东", "湖南", "四川", "广西", "河南"]);
    add(pool::FORT_DAMAGE, &[
        "轰隆一声，一段工事被炸塌了，沙袋散落一地。",
        "爆炸掀翻了掩体，刚修好的工事又被打出了缺口。",
    ]);
    add(pool::MUTINY, &[
        "【哗变风险】绝望的情绪在蔓延。几个士兵扔下了武器，试图从后门逃跑，被督战队当场制服。",
        "【士气崩溃】“守不住了！都要死在这里！”一名精神崩溃的士兵大喊大叫，引发了一阵骚乱。",
        "【逃兵】趁着夜色，几名士兵试图游过苏州河，却被日军巡逻艇发现射杀。",
    ]);

    // Command responses
    add(pool::MOVE, &["你穿过堆满沙袋的走廊，来到了{dest}。", "你猫着腰快步转移到{dest}，弟兄们纷纷向你敬礼。"]);
    add(pool::BUILD, &[
        "弟兄们扛着沙袋来回奔跑，工事一点点加高加厚。",
        "你亲自督工，砖石和沙袋被垒成了坚固的射击掩体。",
    ]);
    add(pool::BUILD_MAX, &["工兵班长拍了拍厚实的沙袋墙：“团附，这里已经修到头了，再堆就要塌了。”"]);
    add(pool::BUILD_NO_SANDBAGS, &["军需官摊开双手：“团附，沙袋已经用光了。”"]);
    add(pool::REST, &["你下令轮班休息。疲惫的士兵们靠着墙角沉沉睡去，鼾声此起彼伏。"]);
    add(pool::HEAL, &[
        "军医和卫生兵忙碌了一个小时，几名伤员终于脱离了危险，重新拿起了枪。",
        "简陋的救护所里，酒精和血腥味混在一起。又有几个弟兄被从鬼门关拉了回来。",
    ]);
    add(pool::HEAL_FAIL, &["军医摇摇头：“团附，没有伤员需要处理，或者药品已经用完了。”"]);
    add(pool::FLAG_WARN, &[
        "副官拉住了你：“团附，升旗会把鬼子的飞机全引过来！您真的要升吗？”（再次下令即可升旗）",
    ]);
    add(pool::FLAG_SUCCESS, &[
        "在枪林弹雨中，一面青天白日满地红旗在仓库楼顶冉冉升起！苏州河对岸的租界里爆发出震天的欢呼声！",
    ]);
    add(pool::SPEECH, &[
        "你站在弹药箱上，声音沙哑却坚定：“我们身后就是租界，全中国都在看着我们！”弟兄们齐声高呼。",
        "“八百壮士，寸土不让！”你的话音刚落，整栋仓库都回荡着士兵们的吼声。",
    ]);

    // Conversational fallback
    for topic in ChatterTopic::ALL {
        add(topic.pool_id(), chatter_lines(topic));
    }

    pools
}

fn chatter_lines(topic: ChatterTopic) -> &'static [&'static str] {
    match topic {
        ChatterTopic::Identity => &["副官疑惑地看着你：“您是谢团附啊，八十八师五二四团，咱们一营的主心骨。”"],
        ChatterTopic::Desertion => &["一名老兵低声说：“团附，弟兄们没一个想走的。死也要死在这仓库里。”"],
        ChatterTopic::Radio => &["通讯兵摇摇头：“师部暂时没有新的命令，只让我们坚守待命。”"],
        ChatterTopic::Aggression => &["弟兄们摩拳擦掌：“团附，等鬼子再上来，一定让他们有来无回！”"],
        ChatterTopic::Urgency => &["副官点点头：“明白，大伙儿都在加紧准备。”"],
        ChatterTopic::Difficulty => &["副官咬了咬牙：“是难打，可咱们身后就是四万万同胞。”"],
        ChatterTopic::Adjutant => &["副官立正敬礼：“报告团附，各阵地一切正常，请指示！”"],
        ChatterTopic::Machinegun => &["机枪连长拍了拍马克沁：“这家伙只要还有子弹，鬼子就别想靠近大门。”"],
        ChatterTopic::Soldiers => &["弟兄们围了过来，眼神里满是信任：“团附说怎么打，咱们就怎么打！”"],
        ChatterTopic::Environment => &["你透过射击孔向外望去，苏州河对岸的租界灯火通明，这边却是一片废墟。"],
        ChatterTopic::Hunger => &["炊事兵端来一碗冷饭：“团附，凑合吃点吧，水还够喝几天。”"],
        ChatterTopic::Enemy => &["哨兵报告：“鬼子在对面的楼里架了机枪，时不时打几个冷枪。”"],
        ChatterTopic::Greeting => &["副官应声道：“在！团附请吩咐。”"],
        ChatterTopic::Confused => &["副官没听明白：“团附，您是说……？请下达具体命令。”"],
    }
}

// ── Dilemmas ───────────────────────────────────────────────────────────

fn dilemmas() -> Vec<Dilemma> {
    vec![
        Dilemma {
            id: "student_run".to_string(),
            title: "学生冲桥".to_string(),
            description: "【高风险补给】一群爱国学生和童子军扛着巨大的包裹，正试图冲过新垃圾桥！日军的机枪已经调转枪口。如果【接应】，必须用火力压制日军，这会暴露我们的位置并遭到反击。如果不接应，他们必死无疑。".to_string(),
            options: vec![
                DilemmaOption {
                    label: "火力接应".to_string(),
                    risk_text: "获得医疗包x10 | 阵亡 0-15 人".to_string(),
                    narrative: "【惨烈接应】你下令机枪全线开火压制！在弹雨中，学生们把药品扔进了窗口。但日军的掷弹筒也砸了过来……我们付出了代价，换来了这批救命药。".to_string(),
                    note: "获得急救包+10".to_string(),
                    effects: vec![
                        Effect::Gain { resource: Resource::Medkits, amount: 10 },
                        Effect::Casualties { min: 0, max: 15 },
                        Effect::HeavyDamage,
                    ],
                    trap: None,
                },
                DilemmaOption {
                    label: "含泪拒止".to_string(),
                    risk_text: "士气 -3".to_string(),
                    narrative: "你痛苦地闭上了眼睛，没有下令开火。眼睁睁看着那几个年轻的身影倒在桥头。仓库里一片死寂，弟兄们都在流泪。".to_string(),
                    note: String::new(),
                    effects: vec![Effect::Morale { amount: -3 }],
                    trap: None,
                },
            ],
        },
        Dilemma {
            id: "smuggler_boat".to_string(),
            title: "私枭闯关".to_string(),
            description: "【极高风险补给】几个江湖气息浓重的人划着小船靠近，声称只要给“金条”，就送上一批子弹。这可能是日军的陷阱，也可能是唯一的补给机会。".to_string(),
            options: vec![
                DilemmaOption {
                    label: "冒险交易".to_string(),
                    risk_text: "获得弹药x3000 | 可能遭遇伏击(阵亡10+)".to_string(),
                    narrative: "【惊险交易】对方收了“金条”，把几个沉重的木箱推上了岸。里面是崭新的子弹！这帮亡命徒虽然贪婪，但这批货真不错。".to_string(),
                    note: "获得弹药+3000".to_string(),
                    effects: vec![Effect::Gain { resource: Resource::Ammo, amount: 3000 }],
                    trap: Some(Trap {
                        chance: 0.5,
                        narrative: "【中计！】船刚靠岸，帆布揭开，露出的不是弹药，而是黑洞洞的机枪口！这是一次卑鄙的伏击！我们在河岸边丢下了十几具尸体才撤回来。".to_string(),
                        note: "交易陷阱！".to_string(),
                        effects: vec![Effect::Casualties { min: 10, max: 19 }],
                    }),
                },
                DilemmaOption {
                    label: "开枪驱离".to_string(),
                    risk_text: "无影响".to_string(),
                    narrative: "“滚！”你朝天鸣枪。小船迅速消失在迷雾中。".to_string(),
                    note: String::new(),
                    effects: Vec::new(),
                    trap: None,
                },
            ],
        },
        Dilemma {
            id: "puppet_defector".to_string(),
            title: "伪军投诚".to_string(),
            description: "【中风险补给】几名穿着伪军制服的人举着白旗靠近，背着沉重的箱子。“别开枪！是中国人！”他们声称是来送手榴弹的。如果是诈降，我们会被炸上天。".to_string(),
            options: vec![
                DilemmaOption {
                    label: "放行进入".to_string(),
                    risk_text: "获得手榴弹x50 | 或 仓库被炸(防御降级)".to_string(),
                    narrative: "他们是真的投诚。这几名伪军哭着跪在地上，把带来的手榴弹交给了我们。“中国人不打中国人！”".to_string(),
                    note: "获得手榴弹+50".to_string(),
                    effects: vec![Effect::Gain { resource: Resource::Grenades, amount: 50 }],
                    trap: Some(Trap {
                        chance: 0.3,
                        narrative: "【自杀袭击】那几个伪军突然拉响了身上的炸药包！巨大的爆炸震塌了仓库的一角。该死，他们是死士！".to_string(),
                        note: "工事受损！".to_string(),
                        effects: vec![
                            Effect::FortDamage { location: Location::Entrance },
                            Effect::HeavyDamage,
                        ],
                    }),
                },
                DilemmaOption {
                    label: "射杀勿论".to_string(),
                    risk_text: "士气 -2".to_string(),
                    narrative: "为了安全起见，你下令射击。几具尸体倒在门外。或许他们是真的想回家，但战争容不下仁慈。".to_string(),
                    note: String::new(),
                    effects: vec![Effect::Morale { amount: -2 }],
                    trap: None,
                },
            ],
        },
        Dilemma {
            id: "brit_ceasefire".to_string(),
            title: "英军通牒".to_string(),
            description: "公共租界英军指挥官派人传来口信：“贵军的流弹多次落入租界，引起了外籍人士的恐慌。请立即停止向苏州河方向射击，否则我们将采取强制措施。”".to_string(),
            options: vec![
                DilemmaOption {
                    label: "答应要求".to_string(),
                    risk_text: "士气-5 | 获得急救包x5".to_string(),
                    narrative: "【妥协】你咬着牙下令：“朝南面打的枪，都给我停了！”英军对此表示赞赏，悄悄送来了一些急救药品。弟兄们有些憋屈。".to_string(),
                    note: "获得急救包+5".to_string(),
                    effects: vec![
                        Effect::Morale { amount: -5 },
                        Effect::Gain { resource: Resource::Medkits, amount: 5 },
                    ],
                    trap: None,
                },
                DilemmaOption {
                    label: "严词拒绝".to_string(),
                    risk_text: "士气+5 | 侧翼受袭概率增加".to_string(),
                    narrative: "【强硬】“这也是中国领土！”你拒绝了英军的要求。弟兄们听了很解气，但租界方向的探照灯开始频繁照射我们，侧翼暴露的风险增加了。".to_string(),
                    note: "侧翼威胁增加".to_string(),
                    effects: vec![Effect::Morale { amount: 5 }, Effect::Siege { amount: 15 }],
                    trap: None,
                },
            ],
        },
    ]
}

// ── Tactical Cards ─────────────────────────────────────────────────────

fn tactical_cards() -> Vec<TacticalCard> {
    vec![
        TacticalCard {
            id: "morale_boost".to_string(),
            title: "家书抵万金".to_string(),
            description: "一名邮差冒死送来了几封家书。战士们读着信，泪流满面，士气大振。".to_string(),
            effect_text: "士气+15".to_string(),
            action_cmd: "演讲".to_string(),
            bonus: CardBonus::Morale { amount: 15 },
            color: "gold".to_string(),
        },
        TacticalCard {
            id: "reinforce".to_string(),
            title: "孤胆英雄".to_string(),
            description: "几名散兵游勇冲破封锁线加入了我们。虽然人少，但都是老兵。".to_string(),
            effect_text: "士兵+5".to_string(),
            action_cmd: "加固一楼".to_string(),
            bonus: CardBonus::Gain { resource: Resource::Soldiers, amount: 5 },
            color: "blue".to_string(),
        },
        TacticalCard {
            id: "supplies".to_string(),
            title: "意外物资".to_string(),
            description: "我们在清理废墟时发现了一个被遗忘的军火箱。".to_string(),
            effect_text: "弹药+500".to_string(),
            action_cmd: "整理补给".to_string(),
            bonus: CardBonus::Gain { resource: Resource::Ammo, amount: 500 },
            color: "gold".to_string(),
        },
    ]
}
