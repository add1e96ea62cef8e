// ═══════════════════════════════════════════════════════════════════════
// Turn Orchestrator — one command in, one response out
//
// Architecture:
//   The engine is a pure function of (state, command, content, rng). It
//   never mutates the caller's state. Each entry point clones the state
//   into a working copy, threads it through fixed stages, and returns the
//   diff against the input state as a patch.
//
// Gates, checked in order:
//   1. start command     → fresh campaign at the prologue
//   2. campaign over     → rejected
//   3. tutorial running  → scripted step or prompt
//   4. resolve command   → dilemma resolution (no time passes)
//   5. pending dilemma   → prompt, dilemma re-sent
//   6. general simulation
//
// Simulation stages:
//   action → clock → siege + attack roll → air raid roll → wounded
//   attrition → combat → mutiny → day rollover → endgame → offers → intel
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::{self, CombatReport};
use crate::content::{pool, Content};
use crate::dispatch::{self, ResolveCommand};
use crate::interpreter::{self, ChatterTopic, Intent};
use crate::logistics::{self, BuildOutcome};
use crate::morale;
use crate::patch::StatePatch;
use crate::scoring;
use crate::siege::{self, AttackKind};
use crate::tutorial;
use crate::types::*;
use rand::Rng;
use tracing::{debug, info, trace};

const MOVE_MINUTES: u32 = 15;
const BUILD_MINUTES: u32 = 120;
const REST_MINUTES: u32 = 120;
const HOUR: u32 = 60;
const FLAG_MINUTES: u32 = 30;
/// Cost of an action that was refused in-fiction but still took a moment.
const MINIMAL_MINUTES: u32 = 5;

const REST_MORALE: u32 = 10;
const REST_HEALTH: u32 = 5;
const SPEECH_MORALE: u32 = 3;
const FLAG_MORALE: u32 = 30;
const FLAG_MORALE_FLOOR: u32 = 30;

// ── Action Cost ────────────────────────────────────────────────────────

/// How far an action reaches into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// Conversation or a blocked request: nothing moves at all.
    Idle,
    /// Refused action with a small time cost: the clock and its
    /// consequences run, the siege does not.
    Minimal,
    Active { siege: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Cost {
    minutes: u32,
    tier: Tier,
}

impl Cost {
    const IDLE: Cost = Cost { minutes: 0, tier: Tier::Idle };
    const MINIMAL: Cost = Cost { minutes: MINIMAL_MINUTES, tier: Tier::Minimal };

    fn active(minutes: u32, siege: u32) -> Cost {
        Cost { minutes, tier: Tier::Active { siege } }
    }
}

// ── Turn Context ───────────────────────────────────────────────────────

/// Working state plus everything a turn accumulates for its response.
struct Turn<'a, R: Rng + ?Sized> {
    state: CampaignState,
    content: &'a Content,
    rng: &'a mut R,
    lead: String,
    inserts: Vec<String>,
    notes: Vec<String>,
    event: TurnEvent,
    visual: VisualEffect,
    attack_location: Option<Location>,
    dilemma: Option<Dilemma>,
    intel: Option<String>,
    attacked: bool,
}

impl<'a, R: Rng + ?Sized> Turn<'a, R> {
    fn new(state: CampaignState, content: &'a Content, rng: &'a mut R) -> Self {
        Turn {
            state,
            content,
            rng,
            lead: String::new(),
            inserts: Vec::new(),
            notes: Vec::new(),
            event: TurnEvent::None,
            visual: VisualEffect::None,
            attack_location: None,
            dilemma: None,
            intel: None,
            attacked: false,
        }
    }

    fn pick(&mut self, pool: &str) -> String {
        self.content.pick(pool, self.rng)
    }

    fn insert(&mut self, pool: &str) {
        let line = self.pick(pool);
        if !line.is_empty() {
            self.inserts.push(line);
        }
    }

    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    fn escalate(&mut self, visual: VisualEffect) {
        self.visual = self.visual.max(visual);
    }

    /// Lead line, then inline insertions, then the battle report.
    fn finish(self, base: &CampaignState) -> TurnResponse {
        let mut parts: Vec<String> = Vec::new();
        if !self.lead.is_empty() {
            parts.push(self.lead);
        }
        parts.extend(self.inserts);
        if !self.notes.is_empty() {
            parts.push(format!("【战报】{}", self.notes.join("；")));
        }

        TurnResponse {
            narrative: parts.join("\n\n"),
            patch: StatePatch::diff(base, &self.state),
            event: self.event,
            visual: self.visual,
            attack_location: self.attack_location,
            dilemma: self.dilemma,
            enemy_intel: self.intel,
        }
    }
}

// ── Entry Points ───────────────────────────────────────────────────────

/// Resolve one free-text command. Every input produces a response; the
/// worst case is a conversational reply with an empty patch.
///
/// `history` is the caller's recent-log summary. Resolution does not
/// depend on it.
pub fn play_turn<R: Rng + ?Sized>(
    state: &CampaignState,
    command: &str,
    history: &str,
    content: &Content,
    rng: &mut R,
) -> TurnResponse {
    let cmd = command.trim().to_lowercase();
    trace!(history_chars = history.chars().count(), "history summary ignored");

    if interpreter::is_start_command(&cmd) {
        info!("new campaign started");
        return tutorial::start_campaign(content);
    }
    if state.is_game_over {
        return campaign_over(content);
    }
    if tutorial::in_progress(state) {
        return tutorial::gate(state, &cmd, content);
    }
    if ResolveCommand::is_resolve(&cmd) {
        return match command.parse::<ResolveCommand>() {
            Ok(resolve) => resolve_dilemma(state, &resolve.id, resolve.option, content, rng),
            Err(err) => {
                debug!(%err, "unparseable resolve command");
                narrative_only(content.line(pool::DILEMMA_UNKNOWN))
            }
        };
    }
    if let Some(response) = pending_prompt(state, content) {
        return response;
    }

    simulate(Turn::new(state.clone(), content, rng), &cmd).finish(state)
}

/// Apply the chosen branch of the pending dilemma. No time passes.
/// Dilemmas that are not pending and out-of-range options change nothing.
pub fn resolve_dilemma<R: Rng + ?Sized>(
    state: &CampaignState,
    dilemma_id: &str,
    option: usize,
    content: &Content,
    rng: &mut R,
) -> TurnResponse {
    if state.is_game_over {
        return campaign_over(content);
    }
    let consumed = state.triggered_events.iter().any(|e| e == dilemma_id);
    let offered = state.pending_dilemma.as_deref() == Some(dilemma_id);
    let Some((dilemma, chosen)) = content
        .dilemma(dilemma_id)
        .filter(|_| offered && !consumed)
        .and_then(|d| d.options.get(option).map(|o| (d, o)))
    else {
        debug!(dilemma_id, option, offered, consumed, "dilemma resolution ignored");
        return narrative_only(content.line(pool::DILEMMA_UNKNOWN));
    };

    let mut next = state.clone();
    let resolution = dispatch::resolve(&mut next, dilemma, chosen, rng);
    debug!(dilemma_id, option, "dilemma resolved");

    let mut turn = Turn::new(next, content, rng);
    turn.lead = resolution.narrative;
    turn.notes = resolution.notes;
    if resolution.heavy {
        turn.escalate(VisualEffect::HeavyDamage);
    }
    conclude(&mut turn);
    turn.finish(state)
}

/// Play the pending tactical card: clear it, grant its bonus, then run its
/// fixed command as an ordinary turn.
pub fn execute_tactical_card<R: Rng + ?Sized>(
    state: &CampaignState,
    content: &Content,
    rng: &mut R,
) -> TurnResponse {
    if state.is_game_over {
        return campaign_over(content);
    }
    if let Some(response) = pending_prompt(state, content) {
        return response;
    }
    let Some(card) = state.active_tactical_card.clone() else {
        return narrative_only(content.line(pool::CARD_NONE));
    };

    let mut next = state.clone();
    next.active_tactical_card = None;
    dispatch::apply_card_bonus(&mut next, card.bonus);
    debug!(card = %card.id, command = %card.action_cmd, "tactical card played");

    let cmd = card.action_cmd.trim().to_lowercase();
    let mut turn = simulate(Turn::new(next, content, rng), &cmd);
    turn.notes.insert(0, format!("【战机】{}：{}", card.title, card.effect_text));
    turn.finish(state)
}

fn narrative_only(narrative: String) -> TurnResponse {
    TurnResponse { narrative, ..Default::default() }
}

fn campaign_over(content: &Content) -> TurnResponse {
    TurnResponse {
        narrative: content.line(pool::CAMPAIGN_OVER),
        event: TurnEvent::GameOver,
        ..Default::default()
    }
}

fn pending_prompt(state: &CampaignState, content: &Content) -> Option<TurnResponse> {
    let id = state.pending_dilemma.as_deref()?;
    Some(TurnResponse {
        narrative: content.line(pool::DILEMMA_PROMPT),
        dilemma: content.dilemma(id).cloned(),
        ..Default::default()
    })
}

// ── Simulation ─────────────────────────────────────────────────────────

fn simulate<'a, R: Rng + ?Sized>(mut turn: Turn<'a, R>, cmd: &str) -> Turn<'a, R> {
    let intent = interpreter::classify(cmd, &turn.state);
    let cost = perform(&mut turn, intent);

    debug!(
        intent = intent.label(),
        minutes = cost.minutes,
        siege = turn.state.siege_meter,
        "action resolved"
    );
    if cost.tier == Tier::Idle {
        return turn;
    }

    // Clock
    let (clock, crossed_midnight) = turn.state.current_time.advance(cost.minutes);
    turn.state.current_time = clock;

    // Siege and attack triggers
    let mut attack = None;
    if let Tier::Active { siege: increment } = cost.tier {
        siege::escalate(&mut turn.state, increment);
        attack = siege::roll_assault(&mut turn.state, clock.hour(), turn.rng);
        if attack.is_none() && siege::roll_bombing(turn.state.has_flag_raised, clock.hour(), turn.rng) {
            attack = Some(AttackKind::Bombing);
        }
    }

    // Untreated wounded
    if let Some(deaths) = logistics::wounded_attrition(&mut turn.state, cost.minutes, turn.rng) {
        turn.insert(pool::WOUNDED_DEATH);
        turn.note(format!("伤重不治: {deaths}人 (士气 -{deaths})"));
    }

    if let Some(kind) = attack {
        let report = combat::resolve_attack(&mut turn.state, kind, turn.rng);
        report_combat(&mut turn, &report);
    }

    // A falling garrison does not also mutiny.
    if !scoring::is_defeated(&turn.state) {
        if let Some(lost) = morale::check_mutiny(&mut turn.state, turn.rng) {
            turn.insert(pool::MUTINY);
            turn.note(format!("因士气崩溃损失兵力: {lost}人"));
            turn.escalate(VisualEffect::HeavyDamage);
        }
    }

    if crossed_midnight {
        turn.state.day += 1;
        turn.event = TurnEvent::NewDay;
        let day = turn.state.day;
        turn.note(format!("进入第 {day} 天"));
    }

    conclude(&mut turn);

    if !turn.state.is_game_over {
        if let Some(card) = dispatch::offer_card(&mut turn.state, turn.content, turn.rng) {
            turn.note(format!("【战机】触发特殊事件：{}", card.title));
        }
        if !turn.attacked {
            turn.dilemma = dispatch::offer_dilemma(&mut turn.state, turn.content, turn.rng);
        }
    }

    turn.intel = turn.content.intel_for_day(turn.state.day);
    turn
}

/// Apply the classified action to the working state.
fn perform<R: Rng + ?Sized>(turn: &mut Turn<'_, R>, intent: Intent) -> Cost {
    match intent {
        Intent::Raid => {
            let outcome = combat::night_raid(&mut turn.state, turn.rng);
            if outcome.success {
                turn.lead = turn.pick(pool::RAID_SUCCESS);
                turn.note(format!("阵亡{}人", outcome.dead));
                if outcome.ammo_captured > 0 {
                    turn.note(format!("缴获弹药+{}", outcome.ammo_captured));
                }
                if outcome.medkits_captured > 0 {
                    turn.note(format!("缴获药品+{}", outcome.medkits_captured));
                }
                turn.note("士气+10");
            } else {
                turn.lead = turn.pick(pool::RAID_FAIL);
                turn.note(format!("行动失败！阵亡{}人 | 士气大幅下降", outcome.dead));
                turn.escalate(VisualEffect::HeavyDamage);
            }
            Cost::active(HOUR, siege::SIEGE_BASE)
        }
        Intent::RaidBlocked => {
            turn.lead = turn.content.line(pool::RAID_BLOCKED);
            Cost::IDLE
        }
        Intent::SupplyBlocked => {
            turn.lead = turn.content.line(pool::SUPPLY_BLOCKED);
            Cost::IDLE
        }
        Intent::Move(destination) => {
            if let Some(dest) = destination {
                turn.state.location = dest;
            }
            let dest = turn.state.location.name();
            turn.lead = turn.pick(pool::MOVE).replace("{dest}", dest);
            Cost::active(MOVE_MINUTES, siege::SIEGE_BASE)
        }
        Intent::Fortify(loc) => match logistics::build_fortification(&mut turn.state, loc, turn.rng) {
            BuildOutcome::Built { location, fatigue, .. } => {
                turn.lead = turn.pick(pool::BUILD);
                if fatigue > 0 {
                    turn.note(format!("劳累过度，士气 -{fatigue}"));
                }
                turn.note(format!("{location}工事进度+1"));
                Cost::active(BUILD_MINUTES, siege::SIEGE_FORTIFY)
            }
            BuildOutcome::AtMax => {
                turn.lead = turn.pick(pool::BUILD_MAX);
                Cost::MINIMAL
            }
            BuildOutcome::NoSandbags => {
                turn.lead = turn.pick(pool::BUILD_NO_SANDBAGS);
                turn.note("沙袋不足！");
                Cost::MINIMAL
            }
        },
        Intent::Rest => {
            morale::raise(&mut turn.state, REST_MORALE);
            turn.state.health = (turn.state.health + REST_HEALTH).min(100);
            turn.state.last_rest_turn = turn.state.turn_count + 1;
            turn.lead = turn.pick(pool::REST);
            turn.note("士气+10，阵地状态+5 (日军仇恨大幅上升!)");
            Cost::active(REST_MINUTES, siege::SIEGE_REST)
        }
        Intent::Heal => match logistics::heal(&mut turn.state, turn.rng) {
            Some(healed) => {
                turn.lead = turn.pick(pool::HEAL);
                turn.note(format!("耗时1小时，救回{}人，士气 +{}", healed.count, healed.morale));
                Cost::active(HOUR, siege::SIEGE_HEAL)
            }
            None => {
                turn.lead = turn.pick(pool::HEAL_FAIL);
                Cost::MINIMAL
            }
        },
        Intent::RaiseFlag => raise_flag(turn),
        Intent::Speech => {
            morale::raise(&mut turn.state, SPEECH_MORALE);
            turn.lead = turn.pick(pool::SPEECH);
            turn.note("士气 +3");
            Cost::active(HOUR, siege::SIEGE_SPEECH)
        }
        Intent::Chatter(topic) => {
            turn.lead = chatter_line(turn, topic);
            Cost::IDLE
        }
    }
}

/// Two-step flag raising: the first order on the roof only warns.
fn raise_flag<R: Rng + ?Sized>(turn: &mut Turn<'_, R>) -> Cost {
    if turn.state.has_flag_raised {
        turn.lead = turn.content.line(pool::FLAG_ALREADY);
        return Cost::IDLE;
    }
    if turn.state.location != Location::Rooftop {
        turn.lead = turn.content.line(pool::FLAG_OFF_ROOF);
        return Cost::IDLE;
    }
    if !turn.state.flag_warned {
        turn.state.flag_warned = true;
        turn.lead = turn.pick(pool::FLAG_WARN);
        return Cost::active(MINIMAL_MINUTES, siege::SIEGE_BASE);
    }

    turn.state.has_flag_raised = true;
    morale::raise(&mut turn.state, FLAG_MORALE);
    morale::raise_floor(&mut turn.state, FLAG_MORALE_FLOOR);
    turn.lead = turn.pick(pool::FLAG_SUCCESS);
    turn.note("士气大幅提升 (+30)！士气下限提升至30！轰炸风险激增！");
    Cost::active(FLAG_MINUTES, siege::SIEGE_FLAG)
}

/// Conversational reply; falls back to the confused pool when the topic's
/// pool is missing from the content.
fn chatter_line<R: Rng + ?Sized>(turn: &mut Turn<'_, R>, topic: ChatterTopic) -> String {
    let line = turn.pick(topic.pool_id());
    if line.is_empty() {
        turn.pick(ChatterTopic::Confused.pool_id())
    } else {
        line
    }
}

fn report_combat<R: Rng + ?Sized>(turn: &mut Turn<'_, R>, report: &CombatReport) {
    turn.attacked = true;
    turn.event = TurnEvent::Attack;
    turn.attack_location = Some(report.target);
    turn.escalate(VisualEffect::Shake);
    if report.heavy {
        turn.escalate(VisualEffect::HeavyDamage);
    }

    if let Some(d) = report.disbanded {
        turn.insert(pool::HMG_LOST);
        turn.note(format!("机枪连转为步兵 (+{}人) | 防御力下降40%", d.men));
    }
    if report.last_stand {
        turn.insert(pool::BAYONET_FIGHT);
    }
    match report.kind {
        AttackKind::Bombing => turn.insert(pool::ATTACK_BOMBING),
        AttackKind::Artillery => turn.insert(pool::ATTACK_ARTILLERY),
        AttackKind::Infantry if !report.last_stand => turn.insert(pool::ATTACK_INFANTRY),
        AttackKind::Infantry => {}
    }

    if let Some(loss) = report.squad_loss.as_ref().filter(|l| l.wiped_out) {
        turn.note(format!("【噩耗】{}全员阵亡！士气 -10，防御下降20%", loss.name));
    }
    if report.ammo_used > 0 {
        turn.note(format!("消耗弹药 {}发", report.ammo_used));
    }
    if report.mg_ammo_used > 0 {
        turn.note(format!("消耗机枪弹 {}发", report.mg_ammo_used));
    }
    if report.grenades_used > 0 {
        turn.note(format!("消耗手榴弹 {}枚", report.grenades_used));
    }
    if report.kills > 0 {
        turn.note(format!("击毙日军 {}人", report.kills));
        turn.note(format!("士气 +{} (杀敌)", report.kill_morale));
    }

    let c = report.casualties;
    if c.wounded_deaths > 0 {
        turn.insert(pool::WOUNDED_DEATH);
        turn.note(format!("重伤员阵亡: {}人", c.wounded_deaths));
    }
    if c.healthy_deaths > 0 {
        let name = turn.pick(pool::SOLDIER_NAMES);
        let origin = turn.pick(pool::SOLDIER_ORIGINS);
        let flavor = turn
            .pick(pool::DEATH_FLAVOR)
            .replace("{name}", &name)
            .replace("{origin}", &origin);
        turn.inserts.push(format!("【阵亡名单】{flavor}"));
        turn.note(format!("战斗兵员: 阵亡{} 伤{}", c.healthy_deaths, c.healthy_injuries));
    } else if c.healthy_injuries > 0 {
        turn.note(format!("战斗兵员: 伤{}", c.healthy_injuries));
    }
    if report.death_morale > 0 {
        turn.note(format!("士气 -{} (阵亡)", report.death_morale));
    }

    if report.fort_damaged {
        turn.insert(pool::FORT_DAMAGE);
        turn.note(format!("{}工事降级", report.target));
    }
}

/// Endgame check. Overrides the event tag and appends the closing report.
fn conclude<R: Rng + ?Sized>(turn: &mut Turn<'_, R>) {
    let Some(report) = scoring::conclude(&mut turn.state) else {
        return;
    };
    info!(
        result = ?report.result,
        rank = report.rank,
        score = report.score,
        day = turn.state.day,
        soldiers = turn.state.soldiers,
        "campaign over"
    );
    match report.result {
        GameResult::Victory => turn.event = TurnEvent::Victory,
        _ => {
            turn.event = TurnEvent::GameOver;
            turn.escalate(VisualEffect::HeavyDamage);
        }
    }
    turn.inserts.push(report.narrative(&turn.state));
}
