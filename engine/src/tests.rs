// ═══════════════════════════════════════════════════════════════════════
// Test suite for the siege turn-resolution engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::clock::GameClock;
    use crate::combat::{self, allocate_casualties, defense_modifier, Casualties};
    use crate::content::{pool, Content};
    use crate::dispatch::{self, ResolveCommand};
    use crate::engine::{execute_tactical_card, play_turn, resolve_dilemma};
    use crate::interpreter::{classify, classify_chatter, is_start_command, ChatterTopic, Intent};
    use crate::logistics::{self, BuildOutcome, Disbanded};
    use crate::morale;
    use crate::patch::StatePatch;
    use crate::scoring;
    use crate::setup::create_initial_state;
    use crate::siege::{self, AttackKind};
    use crate::snapshot::{history_summary, LogEntry, SlotId, Snapshot, MAX_SLOTS};
    use crate::tutorial;
    use crate::types::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ── Helpers ──────────────────────────────────────────────────────────

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// State right after the tutorial: day 1, 08:00.
    fn ready_state() -> CampaignState {
        let mut s = create_initial_state();
        s.tutorial_step = tutorial::STEP_DONE;
        s.day = 1;
        s.current_time = GameClock::new(8, 0);
        s.siege_meter = 20;
        s.fortification_level.insert(Location::Entrance, 2);
        s.fortification_build_counts.insert(Location::Entrance, 4);
        s
    }

    fn squad(name: &str, count: u32, status: SquadStatus) -> HmgSquad {
        HmgSquad { name: name.to_string(), location: Location::Entrance, count, status }
    }

    fn merged(state: &CampaignState, response: &TurnResponse) -> CampaignState {
        let mut next = state.clone();
        next.merge(&response.patch);
        next
    }

    // ═════════════════════════════════════════════════════════════════════
    // SETUP TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_initial_state() {
        let s = create_initial_state();
        assert_eq!(s.soldiers, 354);
        assert_eq!(s.hmg_squads.len(), 2);
        assert!(s.hmg_squads.iter().all(|q| q.is_active() && q.count == SQUAD_MAX_COUNT));
        assert_eq!(s.morale, 80);
        assert_eq!(s.min_morale, 0);
        assert_eq!(s.day, 0);
        assert_eq!(s.current_time.to_string(), "19:00");
        assert_eq!(s.tutorial_step, 0);
        assert_eq!(s.siege_meter, 10);
        assert_eq!(s.location, Location::Entrance);
        assert!(!s.is_game_over);
        assert_eq!(s.game_result, GameResult::Ongoing);
    }

    #[test]
    fn test_initial_fortifications() {
        let s = create_initial_state();
        assert_eq!(s.fort_level(Location::Entrance), 1);
        assert_eq!(s.fort_level(Location::SecondFloor), 1);
        assert_eq!(s.fort_level(Location::Rooftop), 0);
        assert_eq!(s.fort_level(Location::Basement), 3);
        for loc in Location::ALL {
            assert_eq!(s.fort_level(loc), (s.build_count(loc) / 2).min(3));
        }
    }

    #[test]
    fn test_state_wire_names() {
        let json = serde_json::to_value(create_initial_state()).unwrap();
        assert_eq!(json["machineGunAmmo"], 18_000);
        assert_eq!(json["location"], "一楼入口");
        assert_eq!(json["currentTime"], "19:00");
        assert_eq!(json["gameResult"], "ongoing");
        assert_eq!(json["fortificationLevel"]["地下室"], 3);
        assert_eq!(json["hmgSquads"][0]["status"], "active");
    }

    // ═════════════════════════════════════════════════════════════════════
    // CLOCK TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_clock_parse_and_display() {
        let c: GameClock = "08:05".parse().unwrap();
        assert_eq!(c.hour(), 8);
        assert_eq!(c.minute(), 5);
        assert_eq!(c.to_string(), "08:05");
        assert!("25:00".parse::<GameClock>().is_err());
        assert!("12:60".parse::<GameClock>().is_err());
        assert!("noon".parse::<GameClock>().is_err());
    }

    #[test]
    fn test_clock_advance_wraps_midnight() {
        let (c, crossed) = GameClock::new(23, 50).advance(15);
        assert_eq!(c, GameClock::new(0, 5));
        assert!(crossed);

        let (c, crossed) = GameClock::new(10, 0).advance(120);
        assert_eq!(c, GameClock::new(12, 0));
        assert!(!crossed);
    }

    #[test]
    fn test_clock_rejects_bad_json() {
        assert!(serde_json::from_str::<GameClock>("\"7pm\"").is_err());
        let c: GameClock = serde_json::from_str("\"23:30\"").unwrap();
        assert_eq!(c, GameClock::new(23, 30));
    }

    // ═════════════════════════════════════════════════════════════════════
    // PATCH TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_diff_of_identical_states_is_empty() {
        let s = create_initial_state();
        let patch = StatePatch::diff(&s, &s);
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }

    #[test]
    fn test_diff_maps_carry_only_changed_keys() {
        let base = create_initial_state();
        let mut next = base.clone();
        next.fortification_level.insert(Location::Rooftop, 1);
        next.ammo = 100;

        let patch = StatePatch::diff(&base, &next);
        let forts = patch.fortification_level.clone().unwrap();
        assert_eq!(forts.len(), 1);
        assert_eq!(forts[&Location::Rooftop], 1);
        assert_eq!(patch.ammo, Some(100));
        assert!(patch.soldiers.is_none());
        assert!(patch.soldier_distribution.is_none());
    }

    #[test]
    fn test_merge_applies_patch_and_counts_turn() {
        let base = create_initial_state();
        let mut next = base.clone();
        next.fortification_level.insert(Location::Rooftop, 2);
        next.morale = 55;
        let patch = StatePatch::diff(&base, &next);

        let mut target = base.clone();
        target.merge(&patch);
        assert_eq!(target.morale, 55);
        assert_eq!(target.fort_level(Location::Rooftop), 2);
        assert_eq!(target.fort_level(Location::Basement), 3);
        assert_eq!(target.turn_count, base.turn_count + 1);
    }

    #[test]
    fn test_patch_clears_nullable_field() {
        let mut s = create_initial_state();
        s.pending_dilemma = Some("student_run".to_string());

        let patch: StatePatch = serde_json::from_str(r#"{"pendingDilemma":null}"#).unwrap();
        assert_eq!(patch.pending_dilemma, Some(None));
        s.merge(&patch);
        assert!(s.pending_dilemma.is_none());

        let untouched: StatePatch = serde_json::from_str("{}").unwrap();
        assert!(untouched.pending_dilemma.is_none());
    }

    #[test]
    fn test_full_patch_overwrites_everything() {
        let fresh = create_initial_state();
        let mut s = ready_state();
        s.triggered_events.push("student_run".to_string());
        s.is_game_over = true;
        s.merge(&StatePatch::full(&fresh));
        assert!(s.triggered_events.is_empty());
        assert!(!s.is_game_over);
        assert_eq!(s.day, 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // INTERPRETER TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_raid_gated_by_hour() {
        let mut s = ready_state();
        s.current_time = GameClock::new(2, 0);
        assert_eq!(classify("夜袭", &s), Intent::Raid);
        s.current_time = GameClock::new(5, 0);
        assert_eq!(classify("夜袭", &s), Intent::RaidBlocked);
        s.current_time = GameClock::new(12, 0);
        assert_eq!(classify("偷袭鬼子", &s), Intent::RaidBlocked);
    }

    #[test]
    fn test_supply_precedence_is_literal() {
        let s = ready_state();
        assert_eq!(classify("请求补给", &s), Intent::SupplyBlocked);
        assert_eq!(classify("要物资", &s), Intent::SupplyBlocked);
        // 补给 wins even next to 整理
        assert_eq!(classify("整理补给", &s), Intent::SupplyBlocked);
        assert_ne!(classify("整理物资", &s), Intent::SupplyBlocked);
    }

    #[test]
    fn test_move_destinations() {
        let s = ready_state();
        assert_eq!(classify("去屋顶", &s), Intent::Move(Some(Location::Rooftop)));
        assert_eq!(classify("撤到二楼", &s), Intent::Move(Some(Location::SecondFloor)));
        assert_eq!(classify("前往地下室", &s), Intent::Move(Some(Location::Basement)));
        assert_eq!(classify("去", &s), Intent::Move(None));
    }

    #[test]
    fn test_fortify_target_defaults_to_current_location() {
        let mut s = ready_state();
        s.location = Location::SecondFloor;
        assert_eq!(classify("加固", &s), Intent::Fortify(Location::SecondFloor));
        assert_eq!(classify("加固一楼", &s), Intent::Fortify(Location::Entrance));
        assert_eq!(classify("修屋顶", &s), Intent::Fortify(Location::Rooftop));
    }

    #[test]
    fn test_remaining_action_rules() {
        let s = ready_state();
        assert_eq!(classify("休息", &s), Intent::Rest);
        assert_eq!(classify("治疗伤员", &s), Intent::Heal);
        assert_eq!(classify("升旗", &s), Intent::RaiseFlag);
        assert_eq!(classify("给大家演讲", &s), Intent::Speech);
    }

    #[test]
    fn test_first_match_wins() {
        let mut s = ready_state();
        s.current_time = GameClock::new(12, 0);
        // Raid keywords shadow movement
        assert_eq!(classify("夜袭后去屋顶", &s), Intent::RaidBlocked);
        // Movement shadows fortification
        assert_eq!(classify("去一楼加固", &s), Intent::Move(Some(Location::Entrance)));
    }

    #[test]
    fn test_chatter_classifier() {
        assert_eq!(classify_chatter("你是谁"), ChatterTopic::Identity);
        assert_eq!(classify_chatter("我饿了"), ChatterTopic::Hunger);
        assert_eq!(classify_chatter("你好"), ChatterTopic::Greeting);
        assert_eq!(classify_chatter("xyz"), ChatterTopic::Confused);
        let s = ready_state();
        assert_eq!(classify("xyz", &s), Intent::Chatter(ChatterTopic::Confused));
    }

    #[test]
    fn test_start_command_is_exact() {
        assert!(is_start_command("开始"));
        assert!(is_start_command("start_game"));
        assert!(!is_start_command("开始战斗"));
    }

    // ═════════════════════════════════════════════════════════════════════
    // TUTORIAL TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_start_command_opens_prologue() {
        let content = Content::standard();
        let s = create_initial_state();
        let r = play_turn(&s, "开始", "", &content, &mut rng(1));
        assert_eq!(r.narrative, content.line(pool::PROLOGUE));
        assert_eq!(r.event, TurnEvent::None);
        assert!(r.enemy_intel.is_some());

        let next = merged(&s, &r);
        assert_eq!(next.tutorial_step, 1);
        assert_eq!(next.day, 0);
        assert_eq!(next.location, Location::Entrance);
        assert_eq!(next.current_time, GameClock::new(19, 0));
        assert_eq!(next.siege_meter, s.siege_meter);
        assert_eq!(next.ammo, s.ammo);
        assert_eq!(next.soldiers, s.soldiers);
    }

    #[test]
    fn test_start_command_discards_finished_campaign() {
        let content = Content::standard();
        let mut s = ready_state();
        s.is_game_over = true;
        s.game_result = GameResult::Defeat;
        s.soldiers = 3;
        s.triggered_events.push("student_run".to_string());

        let next = merged(&s, &play_turn(&s, "START_GAME", "", &content, &mut rng(1)));
        assert!(!next.is_game_over);
        assert_eq!(next.game_result, GameResult::Ongoing);
        assert_eq!(next.soldiers, 354);
        assert!(next.triggered_events.is_empty());
        assert_eq!(next.tutorial_step, 1);
    }

    #[test]
    fn test_tutorial_step_one_prompts_on_other_commands() {
        let content = Content::standard();
        let mut s = create_initial_state();
        s.tutorial_step = 1;
        for cmd in ["休息", "去屋顶", "你好", "EVT_RESOLVE:student_run:0"] {
            let r = play_turn(&s, cmd, "", &content, &mut rng(7));
            assert!(r.patch.is_empty(), "{cmd} should not change state");
            assert_eq!(r.narrative, content.line(pool::TUTORIAL_FORTIFY_PROMPT));
        }
    }

    #[test]
    fn test_tutorial_fortify_forces_entry_level() {
        let content = Content::standard();
        let mut s = create_initial_state();
        s.tutorial_step = 1;
        s.sandbags = 0;

        let r = play_turn(&s, "加固一楼", "", &content, &mut rng(3));
        assert_eq!(r.visual, VisualEffect::Shake);
        let next = merged(&s, &r);
        assert_eq!(next.tutorial_step, 2);
        assert_eq!(next.fort_level(Location::Entrance), 2);
        assert_eq!(next.build_count(Location::Entrance), 4);
        assert_eq!(next.current_time, GameClock::new(21, 0));
        assert_eq!(next.sandbags, 0);
        assert_eq!(next.siege_meter, s.siege_meter);
    }

    #[test]
    fn test_tutorial_organize_starts_day_one() {
        let content = Content::standard();
        let mut s = create_initial_state();
        s.tutorial_step = 2;

        let r = play_turn(&s, "整理补给", "", &content, &mut rng(3));
        assert_eq!(r.event, TurnEvent::NewDay);
        let next = merged(&s, &r);
        assert_eq!(next.tutorial_step, 3);
        assert_eq!(next.day, 1);
        assert_eq!(next.current_time, GameClock::new(8, 0));
        assert_eq!(next.siege_meter, 20);

        let r = play_turn(&s, "休息", "", &content, &mut rng(3));
        assert!(r.patch.is_empty());
        assert_eq!(r.narrative, content.line(pool::TUTORIAL_SUPPLY_PROMPT));
    }

    // ═════════════════════════════════════════════════════════════════════
    // IDLE & BLOCKED TURN TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_conversation_costs_nothing() {
        let content = Content::standard();
        let s = ready_state();
        for seed in 0..20 {
            let r = play_turn(&s, "你好", "[CMD] 你好...", &content, &mut rng(seed));
            assert!(r.patch.is_empty());
            assert_eq!(r.event, TurnEvent::None);
            assert_eq!(r.visual, VisualEffect::None);
            assert!(r.dilemma.is_none());
            assert!(!r.narrative.is_empty());
        }
    }

    #[test]
    fn test_blocked_requests_change_nothing() {
        let content = Content::standard();
        let mut s = ready_state();
        s.current_time = GameClock::new(13, 0);
        for (cmd, line) in [
            ("请求补给", pool::SUPPLY_BLOCKED),
            ("夜袭", pool::RAID_BLOCKED),
            ("升旗", pool::FLAG_OFF_ROOF),
        ] {
            let r = play_turn(&s, cmd, "", &content, &mut rng(11));
            assert!(r.patch.is_empty(), "{cmd}");
            assert_eq!(r.narrative, content.line(line));
        }
    }

    #[test]
    fn test_substitute_content_drives_replies() {
        let mut content = Content::standard();
        content
            .pools
            .insert(ChatterTopic::Greeting.pool_id().to_string(), vec!["收到！".to_string()]);
        let r = play_turn(&ready_state(), "你好", "", &content, &mut rng(0));
        assert_eq!(r.narrative, "收到！");
    }

    #[test]
    fn test_missing_pools_yield_empty_lines() {
        let content = Content {
            pools: Default::default(),
            dilemmas: Vec::new(),
            tactical_cards: Vec::new(),
            intel_by_day: Vec::new(),
        };
        let r = play_turn(&ready_state(), "你好", "", &content, &mut rng(0));
        assert_eq!(r.narrative, "");
        assert!(r.patch.is_empty());
    }

    // ═════════════════════════════════════════════════════════════════════
    // ACTION TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_fortify_at_max_is_idempotent() {
        let content = Content::standard();
        let mut s = ready_state();
        s.fortification_level.insert(Location::Entrance, 3);
        s.fortification_build_counts.insert(Location::Entrance, 6);

        for seed in 0..30 {
            let r = play_turn(&s, "加固一楼", "", &content, &mut rng(seed));
            let p = &r.patch;
            assert!(p.fortification_level.is_none());
            assert!(p.fortification_build_counts.is_none());
            assert!(p.sandbags.is_none());
            assert!(p.ammo.is_none());
            assert!(p.machine_gun_ammo.is_none());
            assert!(p.grenades.is_none());
            assert!(p.medkits.is_none());
            assert!(p.siege_meter.is_none());
            assert_eq!(p.current_time, Some(GameClock::new(8, 5)));
            assert_eq!(r.event, TurnEvent::None);
        }
    }

    #[test]
    fn test_fortify_without_sandbags_fails() {
        let content = Content::standard();
        let mut s = ready_state();
        s.sandbags = 150;
        let r = play_turn(&s, "加固二楼", "", &content, &mut rng(5));
        assert!(r.narrative.contains("沙袋不足"));
        assert!(r.patch.sandbags.is_none());
        assert!(r.patch.fortification_build_counts.is_none());
    }

    #[test]
    fn test_fortify_spends_sandbags_and_time() {
        let content = Content::standard();
        let s = ready_state();
        for seed in 0..20 {
            let next = merged(&s, &play_turn(&s, "加固屋顶", "", &content, &mut rng(seed)));
            assert_eq!(next.sandbags, s.sandbags - logistics::SANDBAG_COST);
            assert_eq!(next.build_count(Location::Rooftop), 1);
            assert_eq!(next.fort_level(Location::Rooftop), 0);
            assert_eq!(next.current_time, GameClock::new(10, 0));
        }
    }

    #[test]
    fn test_move_changes_location() {
        let content = Content::standard();
        let s = ready_state();
        let r = play_turn(&s, "去屋顶", "", &content, &mut rng(2));
        assert!(r.narrative.contains("屋顶"));
        let next = merged(&s, &r);
        assert_eq!(next.location, Location::Rooftop);
        assert_eq!(next.current_time, GameClock::new(8, 15));
    }

    #[test]
    fn test_flag_needs_warning_then_raises_floor() {
        let content = Content::standard();
        let mut s = ready_state();
        s.location = Location::Rooftop;

        for seed in 0..10 {
            let mut r = rng(seed);
            let mut state = s.clone();

            let first = play_turn(&state, "升旗", "", &content, &mut r);
            state.merge(&first.patch);
            assert!(state.flag_warned);
            assert!(!state.has_flag_raised);
            state.pending_dilemma = None;

            let second = play_turn(&state, "升旗", "", &content, &mut r);
            state.merge(&second.patch);
            assert!(state.has_flag_raised);
            assert_eq!(state.min_morale, 30);
            assert!(state.morale >= 30);
            state.pending_dilemma = None;

            let third = play_turn(&state, "升旗", "", &content, &mut r);
            assert!(third.patch.is_empty());
            assert_eq!(third.narrative, content.line(pool::FLAG_ALREADY));
        }
    }

    #[test]
    fn test_rest_records_turn() {
        let content = Content::standard();
        let mut s = ready_state();
        s.turn_count = 9;
        let next = merged(&s, &play_turn(&s, "休息", "", &content, &mut rng(4)));
        assert_eq!(next.last_rest_turn, 10);
        assert_eq!(next.current_time, GameClock::new(10, 0));
    }

    #[test]
    fn test_day_rollover_at_midnight() {
        let content = Content::standard();
        let mut s = ready_state();
        s.current_time = GameClock::new(23, 50);
        for seed in 0..10 {
            let r = play_turn(&s, "去屋顶", "", &content, &mut rng(seed));
            assert_eq!(r.patch.day, Some(2));
            assert_eq!(r.event, TurnEvent::NewDay);
            assert_eq!(r.enemy_intel, content.intel_for_day(2));
        }
    }

    #[test]
    fn test_intel_on_simulated_turns() {
        let content = Content::standard();
        let mut s = ready_state();
        s.day = 9;
        s.current_time = GameClock::new(8, 0);
        let r = play_turn(&s, "去二楼", "", &content, &mut rng(8));
        assert_eq!(r.enemy_intel, content.intel_by_day.last().cloned());
    }

    // ═════════════════════════════════════════════════════════════════════
    // LOGISTICS TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_two_builds_raise_one_level() {
        let mut s = ready_state();
        let mut r = rng(0);
        assert!(matches!(
            logistics::build_fortification(&mut s, Location::Rooftop, &mut r),
            BuildOutcome::Built { level: 0, .. }
        ));
        assert!(matches!(
            logistics::build_fortification(&mut s, Location::Rooftop, &mut r),
            BuildOutcome::Built { level: 1, .. }
        ));
        assert_eq!(s.build_count(Location::Rooftop), 2);
        assert_eq!(
            logistics::build_fortification(&mut s, Location::Basement, &mut r),
            BuildOutcome::AtMax
        );
    }

    #[test]
    fn test_fortification_damage_halves_counter() {
        let mut s = ready_state();
        s.fortification_level.insert(Location::SecondFloor, 3);
        s.fortification_build_counts.insert(Location::SecondFloor, 7);
        assert!(logistics::damage_fortification(&mut s, Location::SecondFloor));
        assert_eq!(s.fort_level(Location::SecondFloor), 2);
        assert_eq!(s.build_count(Location::SecondFloor), 4);
        assert!(!logistics::damage_fortification(&mut s, Location::Rooftop));
    }

    #[test]
    fn test_heal_moves_wounded_back() {
        for seed in 0..20 {
            let mut s = ready_state();
            s.wounded = 10;
            s.wounded_timer = 500;
            s.morale = 50;
            let healed = logistics::heal(&mut s, &mut rng(seed)).unwrap();
            assert!((2..=5).contains(&healed.count));
            assert_eq!(s.wounded, 10 - healed.count);
            assert_eq!(s.soldiers, 354 + healed.count);
            assert_eq!(s.medkits, 40 - healed.count);
            assert_eq!(s.morale, 50 + healed.count * 2);
            assert_eq!(s.wounded_timer, 500 - healed.count * 90);
        }
    }

    #[test]
    fn test_heal_bounded_by_medkits() {
        let mut s = ready_state();
        s.wounded = 10;
        s.medkits = 1;
        let healed = logistics::heal(&mut s, &mut rng(0)).unwrap();
        assert_eq!(healed.count, 1);
        assert_eq!(s.medkits, 0);
        assert!(logistics::heal(&mut s, &mut rng(0)).is_none());
    }

    #[test]
    fn test_wounded_attrition_timer() {
        let mut s = ready_state();
        s.wounded = 3;
        s.wounded_timer = 700;
        let deaths = logistics::wounded_attrition(&mut s, 30, &mut rng(1)).unwrap();
        assert!((1..=3).contains(&deaths));
        assert_eq!(s.wounded, 3 - deaths);
        assert_eq!(s.wounded_timer, logistics::WOUNDED_TIMER_AFTER_DEATH);

        let mut s = ready_state();
        s.wounded = 2;
        s.wounded_timer = 100;
        assert!(logistics::wounded_attrition(&mut s, 60, &mut rng(1)).is_none());
        assert_eq!(s.wounded_timer, 160);

        let mut s = ready_state();
        s.wounded_timer = 400;
        assert!(logistics::wounded_attrition(&mut s, 60, &mut rng(1)).is_none());
        assert_eq!(s.wounded_timer, 0);
    }

    #[test]
    fn test_disband_requires_empty_mg_pool() {
        let mut s = ready_state();
        assert!(logistics::disband_squads(&mut s).is_none());
        s.machine_gun_ammo = 0;
        assert_eq!(
            logistics::disband_squads(&mut s),
            Some(Disbanded { squads: 2, men: 60 })
        );
        assert_eq!(s.soldiers, 414);
        assert!(s.hmg_squads.iter().all(|q| q.status == SquadStatus::Disbanded));
        // Terminal: nothing left to disband
        assert!(logistics::disband_squads(&mut s).is_none());
    }

    #[test]
    fn test_squad_casualties_hit_first_active() {
        let mut s = ready_state();
        s.hmg_squads = vec![
            squad("一连", 0, SquadStatus::Destroyed),
            squad("二连", 2, SquadStatus::Active),
            squad("三连", 30, SquadStatus::Active),
        ];
        let loss = logistics::squad_casualties(&mut s, &mut rng(0)).unwrap();
        assert_eq!(loss.name, "二连");
        assert_eq!(s.hmg_squads[2].count, 30);
        if loss.wiped_out {
            assert_eq!(s.hmg_squads[1].status, SquadStatus::Destroyed);
            assert_eq!(s.hmg_squads[1].count, 0);
        } else {
            assert_eq!(s.hmg_squads[1].count, 1);
        }
    }

    // ═════════════════════════════════════════════════════════════════════
    // COMBAT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_defense_modifier() {
        let eps = 1e-9;
        let two_active = [squad("a", 30, SquadStatus::Active), squad("b", 30, SquadStatus::Active)];
        assert!((defense_modifier(&two_active) - 1.0).abs() < eps);

        let one_lost = [squad("a", 0, SquadStatus::Destroyed), squad("b", 30, SquadStatus::Active)];
        assert!((defense_modifier(&one_lost) - 1.2).abs() < eps);

        let disbanded = [squad("a", 0, SquadStatus::Destroyed), squad("b", 30, SquadStatus::Disbanded)];
        assert!((defense_modifier(&disbanded) - 1.6).abs() < eps);

        let wiped = [squad("a", 0, SquadStatus::Destroyed), squad("b", 0, SquadStatus::Destroyed)];
        assert!((defense_modifier(&wiped) - 1.8).abs() < eps);
    }

    #[test]
    fn test_casualty_allocation() {
        assert_eq!(allocate_casualties(0, 10, 10), Casualties::default());
        assert_eq!(
            allocate_casualties(10, 0, 100),
            Casualties { wounded_deaths: 0, healthy_deaths: 4, healthy_injuries: 6 }
        );
        assert_eq!(
            allocate_casualties(10, 5, 100),
            Casualties { wounded_deaths: 5, healthy_deaths: 2, healthy_injuries: 3 }
        );
        assert_eq!(
            allocate_casualties(10, 20, 100),
            Casualties { wounded_deaths: 8, healthy_deaths: 0, healthy_injuries: 2 }
        );
        assert_eq!(
            allocate_casualties(10, 0, 3),
            Casualties { wounded_deaths: 0, healthy_deaths: 3, healthy_injuries: 0 }
        );
    }

    #[test]
    fn test_mg_exhaustion_disbands_before_combat() {
        for seed in 0..20 {
            let mut s = ready_state();
            s.machine_gun_ammo = 0;
            s.hmg_squads = vec![
                squad("机枪一连", 30, SquadStatus::Active),
                squad("机枪二连", 0, SquadStatus::Destroyed),
            ];
            let report = combat::resolve_attack(&mut s, AttackKind::Infantry, &mut rng(seed));

            assert_eq!(report.disbanded, Some(Disbanded { squads: 1, men: 30 }));
            assert!(!report.last_stand);
            assert!(report.heavy);
            assert_eq!(report.mg_ammo_used, 0);
            assert!(report.squad_loss.is_none());
            assert_eq!(s.hmg_squads[0].status, SquadStatus::Disbanded);
            assert!((defense_modifier(&s.hmg_squads) - 1.6).abs() < 1e-9);
            let c = report.casualties;
            assert_eq!(s.soldiers, 384 - c.healthy_deaths - c.healthy_injuries);
        }
    }

    #[test]
    fn test_last_stand_spends_no_bullets() {
        for seed in 0..20 {
            let mut s = ready_state();
            s.ammo = 0;
            s.machine_gun_ammo = 0;
            let report = combat::resolve_attack(&mut s, AttackKind::Infantry, &mut rng(seed));
            assert!(report.last_stand);
            assert_eq!(report.ammo_used, 0);
            assert_eq!(report.mg_ammo_used, 0);
            assert_eq!(report.grenades_used % 2, 0);
            assert!((80..=158).contains(&report.grenades_used));
            assert!((12..=46).contains(&report.kills));
            assert!((1..=20).contains(&(report.casualties.deaths() + report.casualties.healthy_injuries)));
            assert_eq!(s.ammo, 0);
        }
    }

    #[test]
    fn test_attack_keeps_stocks_consistent() {
        for seed in 0..50 {
            for kind in [AttackKind::Bombing, AttackKind::Artillery, AttackKind::Infantry] {
                let mut s = ready_state();
                s.wounded = 5;
                let before = s.clone();
                let report = combat::resolve_attack(&mut s, kind, &mut rng(seed));
                let c = report.casualties;

                assert_eq!(s.ammo, before.ammo - report.ammo_used);
                assert_eq!(s.machine_gun_ammo, before.machine_gun_ammo - report.mg_ammo_used);
                assert_eq!(s.grenades, before.grenades - report.grenades_used);
                assert_eq!(s.wounded, before.wounded - c.wounded_deaths + c.healthy_injuries);
                assert_eq!(s.enemies_killed, report.kills);
                assert!(s.morale >= s.min_morale && s.morale <= 100);
                if kind == AttackKind::Bombing {
                    assert_eq!(report.kills, 0);
                    assert_eq!(report.mg_ammo_used, 0);
                } else {
                    assert!(matches!(report.target, Location::Entrance | Location::SecondFloor));
                }
            }
        }
    }

    #[test]
    fn test_night_raid_outcomes() {
        for seed in 0..30 {
            let mut s = ready_state();
            let outcome = combat::night_raid(&mut s, &mut rng(seed));
            assert_eq!(s.soldiers, 354 - outcome.dead);
            if outcome.success {
                assert!(outcome.dead <= 5);
                assert_eq!(s.morale, 90);
                assert_eq!(s.ammo, 45_000 + outcome.ammo_captured);
            } else {
                assert!((10..=20).contains(&outcome.dead));
                assert_eq!(s.morale, 65);
            }
        }
    }

    // ═════════════════════════════════════════════════════════════════════
    // SIEGE TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_siege_escalation_caps() {
        let mut s = ready_state();
        s.siege_meter = 90;
        siege::escalate(&mut s, siege::SIEGE_REST);
        assert_eq!(s.siege_meter, 100);
    }

    #[test]
    fn test_no_assault_at_or_below_floor() {
        let mut s = ready_state();
        for seed in 0..50 {
            s.siege_meter = siege::ATTACK_FLOOR;
            assert!(siege::roll_assault(&mut s, 12, &mut rng(seed)).is_none());
            assert_eq!(s.siege_meter, siege::ATTACK_FLOOR);
        }
    }

    #[test]
    fn test_full_meter_always_attacks_and_vents() {
        for seed in 0..50 {
            let mut s = ready_state();
            s.siege_meter = 100;
            let kind = siege::roll_assault(&mut s, 2, &mut rng(seed));
            assert_eq!(kind, Some(AttackKind::Infantry));
            assert_eq!(s.siege_meter, 50);
        }
    }

    #[test]
    fn test_bombing_windows() {
        for seed in 0..50 {
            assert!(!siege::roll_bombing(false, 7, &mut rng(seed)));
            assert!(!siege::roll_bombing(true, 2, &mut rng(seed)));
            assert!(!siege::roll_bombing(true, 18, &mut rng(seed)));
        }
        let hits = (0..200).filter(|s| siege::roll_bombing(true, 7, &mut rng(*s))).count();
        assert!(hits > 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // MORALE TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_morale_bounds() {
        let mut s = ready_state();
        morale::raise(&mut s, 500);
        assert_eq!(s.morale, 100);
        s.min_morale = 30;
        morale::lower(&mut s, 500);
        assert_eq!(s.morale, 30);
        morale::apply_delta(&mut s, -5);
        assert_eq!(s.morale, 30);
        morale::apply_delta(&mut s, 5);
        assert_eq!(s.morale, 35);
    }

    #[test]
    fn test_morale_floor_only_rises() {
        let mut s = ready_state();
        s.morale = 10;
        morale::raise_floor(&mut s, 30);
        assert_eq!(s.min_morale, 30);
        assert_eq!(s.morale, 30);
        morale::raise_floor(&mut s, 10);
        assert_eq!(s.min_morale, 30);
    }

    #[test]
    fn test_mutiny_only_below_threshold() {
        let mut s = ready_state();
        s.morale = 30;
        for seed in 0..50 {
            assert!(morale::check_mutiny(&mut s, &mut rng(seed)).is_none());
        }

        let mut fired = 0;
        for seed in 0..50 {
            let mut s = ready_state();
            s.morale = 10;
            if let Some(lost) = morale::check_mutiny(&mut s, &mut rng(seed)) {
                fired += 1;
                assert!((5..=14).contains(&lost));
                assert_eq!(s.soldiers, 354 - lost);
                assert_eq!(s.morale, 10);
            }
        }
        assert!(fired > 0);
    }

    // ═════════════════════════════════════════════════════════════════════
    // DILEMMA & CARD TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_resolve_command_parsing() {
        let cmd: ResolveCommand = "EVT_RESOLVE:student_run:1".parse().unwrap();
        assert_eq!(cmd, ResolveCommand { id: "student_run".to_string(), option: 1 });
        assert!("evt_resolve:student_run".parse::<ResolveCommand>().is_err());
        assert!("evt_resolve::1".parse::<ResolveCommand>().is_err());
        assert!("evt_resolve:student_run:x".parse::<ResolveCommand>().is_err());
        assert!("休息".parse::<ResolveCommand>().is_err());
    }

    #[test]
    fn test_resolution_consumes_dilemma() {
        let content = Content::standard();
        let mut s = ready_state();
        s.pending_dilemma = Some("student_run".to_string());

        let r = play_turn(&s, "EVT_RESOLVE:student_run:1", "", &content, &mut rng(0));
        assert_eq!(r.patch.pending_dilemma, Some(None));
        assert!(r.patch.current_time.is_none());
        let next = merged(&s, &r);
        assert_eq!(next.morale, 77);
        assert!(next.pending_dilemma.is_none());
        assert_eq!(next.triggered_events, vec!["student_run".to_string()]);

        let again = play_turn(&next, "EVT_RESOLVE:student_run:0", "", &content, &mut rng(0));
        assert!(again.patch.is_empty());
        assert_eq!(again.narrative, content.line(pool::DILEMMA_UNKNOWN));
    }

    #[test]
    fn test_bad_resolutions_change_nothing() {
        let content = Content::standard();
        let s = ready_state();
        for cmd in ["EVT_RESOLVE:no_such_event:0", "EVT_RESOLVE:student_run:5", "evt_resolve:oops"] {
            let r = play_turn(&s, cmd, "", &content, &mut rng(0));
            assert!(r.patch.is_empty(), "{cmd}");
            assert_eq!(r.narrative, content.line(pool::DILEMMA_UNKNOWN));
        }
    }

    #[test]
    fn test_resolution_requires_offered_dilemma() {
        let content = Content::standard();
        let s = ready_state();
        let r = play_turn(&s, "EVT_RESOLVE:brit_ceasefire:0", "", &content, &mut rng(0));
        assert!(r.patch.is_empty());
        assert_eq!(r.narrative, content.line(pool::DILEMMA_UNKNOWN));

        // A different dilemma is pending
        let mut s = ready_state();
        s.pending_dilemma = Some("puppet_defector".to_string());
        let r = play_turn(&s, "EVT_RESOLVE:brit_ceasefire:0", "", &content, &mut rng(0));
        assert!(r.patch.is_empty());
        assert!(merged(&s, &r).triggered_events.is_empty());
    }

    #[test]
    fn test_resolve_keeps_id_case() {
        let cmd: ResolveCommand = "Evt_Resolve:Student_Run:0".parse().unwrap();
        assert_eq!(cmd.id, "Student_Run");
        assert_eq!(cmd.option, 0);
        assert!("evt_resolv:Student_Run:0".parse::<ResolveCommand>().is_err());
    }

    #[test]
    fn test_mixed_case_dilemma_id_resolves() {
        let mut content = Content::standard();
        content.dilemmas[0].id = "Student_Run".to_string();
        let mut s = ready_state();
        s.pending_dilemma = Some("Student_Run".to_string());

        let r = play_turn(&s, "EVT_RESOLVE:Student_Run:1", "", &content, &mut rng(0));
        let next = merged(&s, &r);
        assert!(next.pending_dilemma.is_none());
        assert_eq!(next.triggered_events, vec!["Student_Run".to_string()]);

        let after = play_turn(&next, "休息", "", &content, &mut rng(0));
        assert!(!after.patch.is_empty());
    }

    #[test]
    fn test_covering_fire_always_heavy() {
        let content = Content::standard();
        let mut s = ready_state();
        s.pending_dilemma = Some("student_run".to_string());
        for seed in 0..20 {
            let r = resolve_dilemma(&s, "student_run", 0, &content, &mut rng(seed));
            assert_eq!(r.visual, VisualEffect::HeavyDamage);
            assert_eq!(merged(&s, &r).medkits, s.medkits + 10);
        }
    }

    #[test]
    fn test_pending_dilemma_suspends_turns() {
        let content = Content::standard();
        let mut s = ready_state();
        s.pending_dilemma = Some("puppet_defector".to_string());
        let r = play_turn(&s, "休息", "", &content, &mut rng(0));
        assert!(r.patch.is_empty());
        assert_eq!(r.dilemma.map(|d| d.id), Some("puppet_defector".to_string()));
    }

    #[test]
    fn test_smuggler_outcomes_exclusive() {
        let content = Content::standard();
        let mut s = ready_state();
        s.pending_dilemma = Some("smuggler_boat".to_string());
        for seed in 0..30 {
            let next = merged(&s, &resolve_dilemma(&s, "smuggler_boat", 0, &content, &mut rng(seed)));
            let ambushed = next.soldiers < s.soldiers;
            if ambushed {
                assert!((10..=19).contains(&(s.soldiers - next.soldiers)));
                assert_eq!(next.ammo, s.ammo);
            } else {
                assert_eq!(next.ammo, s.ammo + 3000);
                assert_eq!(next.soldiers, s.soldiers);
            }
        }
    }

    #[test]
    fn test_ceasefire_refusal_draws_attention() {
        let content = Content::standard();
        let mut s = ready_state();
        s.pending_dilemma = Some("brit_ceasefire".to_string());
        let next = merged(&s, &resolve_dilemma(&s, "brit_ceasefire", 1, &content, &mut rng(0)));
        assert_eq!(next.morale, 85);
        assert_eq!(next.siege_meter, 35);
    }

    #[test]
    fn test_trap_probability_extremes() {
        let dilemma = Dilemma {
            id: "test".to_string(),
            title: String::new(),
            description: String::new(),
            options: vec![DilemmaOption {
                label: String::new(),
                risk_text: String::new(),
                narrative: "ok".to_string(),
                note: String::new(),
                effects: vec![Effect::Gain { resource: Resource::Grenades, amount: 50 }],
                trap: Some(Trap {
                    chance: 1.0,
                    narrative: "trap".to_string(),
                    note: String::new(),
                    effects: vec![Effect::FortDamage { location: Location::Entrance }],
                }),
            }],
        };
        let mut s = ready_state();
        let res = dispatch::resolve(&mut s, &dilemma, &dilemma.options[0], &mut rng(0));
        assert_eq!(res.narrative, "trap");
        assert!(res.heavy);
        assert_eq!(s.fort_level(Location::Entrance), 1);
        assert_eq!(s.grenades, 1_000);

        let mut safe = dilemma.clone();
        if let Some(trap) = safe.options[0].trap.as_mut() {
            trap.chance = 0.0;
        }
        let mut s = ready_state();
        let res = dispatch::resolve(&mut s, &safe, &safe.options[0], &mut rng(0));
        assert_eq!(res.narrative, "ok");
        assert_eq!(s.grenades, 1_050);
    }

    #[test]
    fn test_offers_exclude_used_ids() {
        let content = Content::standard();
        let mut offered = 0;
        for seed in 0..100 {
            let mut s = ready_state();
            s.triggered_events = vec!["student_run".into(), "smuggler_boat".into(), "brit_ceasefire".into()];
            if let Some(d) = dispatch::offer_dilemma(&mut s, &content, &mut rng(seed)) {
                offered += 1;
                assert_eq!(d.id, "puppet_defector");
                assert_eq!(s.pending_dilemma.as_deref(), Some("puppet_defector"));
            }
        }
        assert!(offered > 0);

        let mut s = ready_state();
        s.triggered_events = content.dilemmas.iter().map(|d| d.id.clone()).collect();
        for seed in 0..50 {
            assert!(dispatch::offer_dilemma(&mut s, &content, &mut rng(seed)).is_none());
        }
    }

    #[test]
    fn test_card_offer_only_when_none_pending() {
        let content = Content::standard();
        let card = content.card("supplies").cloned();
        for seed in 0..50 {
            let mut s = ready_state();
            s.active_tactical_card = card.clone();
            assert!(dispatch::offer_card(&mut s, &content, &mut rng(seed)).is_none());

            let mut s = ready_state();
            if let Some(c) = dispatch::offer_card(&mut s, &content, &mut rng(seed)) {
                assert_eq!(s.used_tactical_cards, vec![c.id.clone()]);
                assert_eq!(s.active_tactical_card, Some(c));
            }
        }
    }

    #[test]
    fn test_execute_card_clears_and_runs_command() {
        let content = Content::standard();
        let mut s = ready_state();
        s.active_tactical_card = content.card("morale_boost").cloned();
        s.used_tactical_cards = vec!["morale_boost".to_string()];

        for seed in 0..10 {
            let r = execute_tactical_card(&s, &content, &mut rng(seed));
            assert_eq!(r.patch.active_tactical_card, Some(None));
            assert!(r.narrative.contains("【战机】家书抵万金"));
            let next = merged(&s, &r);
            // Speech takes an hour
            assert_eq!(next.current_time, GameClock::new(9, 0));
            assert!(next.used_tactical_cards.contains(&"morale_boost".to_string()));
        }
    }

    #[test]
    fn test_execute_without_card() {
        let content = Content::standard();
        let r = execute_tactical_card(&ready_state(), &content, &mut rng(0));
        assert!(r.patch.is_empty());
        assert_eq!(r.narrative, content.line(pool::CARD_NONE));
    }

    // ═════════════════════════════════════════════════════════════════════
    // ENDGAME TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_score_and_ranks() {
        let s = ready_state();
        // soldiers, entrance level, day
        assert_eq!(scoring::score(&s), 3540 + 100 + 100);
        assert_eq!(scoring::rank_for(4000), "在此封神");
        assert_eq!(scoring::rank_for(3999), "民族脊梁");
        assert_eq!(scoring::rank_for(2000), "血战到底");
        assert_eq!(scoring::rank_for(1999), "尽忠职守");
    }

    #[test]
    fn test_conclude_conditions() {
        let mut s = ready_state();
        assert!(scoring::conclude(&mut s).is_none());

        let mut s = ready_state();
        s.health = 0;
        assert_eq!(scoring::conclude(&mut s).map(|r| r.result), Some(GameResult::Defeat));

        let mut s = ready_state();
        s.day = 6;
        let report = scoring::conclude(&mut s).unwrap();
        assert_eq!(report.result, GameResult::Victory);
        assert_eq!(s.final_rank.as_deref(), Some(report.rank));
        // Terminal
        assert!(scoring::conclude(&mut s).is_none());
    }

    #[test]
    fn test_final_narrative_carries_verdict() {
        let mut s = ready_state();
        s.day = 6;
        s.enemies_killed = 100;
        let report = scoring::conclude(&mut s).unwrap();
        assert_eq!(report.rank, "在此封神");
        let text = report.narrative(&s);
        assert!(text.contains("击毙日军100人。你的指挥艺术将被写进教科书！"));
        assert!(!text.contains("{kills}"));

        assert_eq!(scoring::verdict_for("尽忠职守"), "你完成了基本的守备任务，但在惨烈的战斗中损失惨重。");
    }

    #[test]
    fn test_defeat_below_twenty_soldiers() {
        let content = Content::standard();
        let mut s = ready_state();
        s.soldiers = 15;
        for seed in 0..20 {
            let r = play_turn(&s, "休息", "", &content, &mut rng(seed));
            assert_eq!(r.event, TurnEvent::GameOver);
            assert_eq!(r.visual, VisualEffect::HeavyDamage);
            assert!(r.narrative.contains("【战役结束】"));
            assert!(r.dilemma.is_none());
            let next = merged(&s, &r);
            assert!(next.is_game_over);
            assert_eq!(next.game_result, GameResult::Defeat);
            assert!(next.final_rank.is_some());
            assert!(next.soldiers <= 15);
            assert!(next.active_tactical_card.is_none());
        }
    }

    #[test]
    fn test_victory_after_day_five() {
        let content = Content::standard();
        let mut s = ready_state();
        s.day = 5;
        s.current_time = GameClock::new(23, 0);
        for seed in 0..20 {
            let r = play_turn(&s, "休息", "", &content, &mut rng(seed));
            assert_eq!(r.event, TurnEvent::Victory);
            assert!(r.narrative.contains("【战役胜利】"));
            let next = merged(&s, &r);
            assert_eq!(next.day, 6);
            assert_eq!(next.game_result, GameResult::Victory);
        }
    }

    #[test]
    fn test_finished_campaign_is_terminal() {
        let content = Content::standard();
        let mut s = ready_state();
        s.is_game_over = true;
        s.game_result = GameResult::Victory;
        s.active_tactical_card = content.card("reinforce").cloned();
        for cmd in ["休息", "加固一楼", "EVT_RESOLVE:student_run:0"] {
            let r = play_turn(&s, cmd, "", &content, &mut rng(0));
            assert!(r.patch.is_empty());
            assert_eq!(r.event, TurnEvent::GameOver);
        }
        assert!(execute_tactical_card(&s, &content, &mut rng(0)).patch.is_empty());
    }

    // ═════════════════════════════════════════════════════════════════════
    // CONTENT & SNAPSHOT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_standard_content_complete() {
        let content = Content::standard();
        let ids = [
            pool::PROLOGUE, pool::PROLOGUE_INTEL, pool::TUTORIAL_FORTIFIED,
            pool::TUTORIAL_FORTIFY_PROMPT, pool::TUTORIAL_DAWN, pool::TUTORIAL_DAWN_INTEL,
            pool::TUTORIAL_SUPPLY_PROMPT, pool::DILEMMA_PROMPT, pool::DILEMMA_UNKNOWN,
            pool::CAMPAIGN_OVER, pool::CARD_NONE, pool::RAID_BLOCKED, pool::SUPPLY_BLOCKED,
            pool::FLAG_OFF_ROOF, pool::FLAG_ALREADY, pool::HMG_LOST, pool::RAID_SUCCESS,
            pool::RAID_FAIL, pool::BAYONET_FIGHT, pool::ATTACK_BOMBING, pool::ATTACK_ARTILLERY,
            pool::ATTACK_INFANTRY, pool::WOUNDED_DEATH, pool::DEATH_FLAVOR, pool::SOLDIER_NAMES,
            pool::SOLDIER_ORIGINS, pool::FORT_DAMAGE, pool::MUTINY, pool::MOVE, pool::BUILD,
            pool::BUILD_MAX, pool::BUILD_NO_SANDBAGS, pool::REST, pool::HEAL, pool::HEAL_FAIL,
            pool::FLAG_WARN, pool::FLAG_SUCCESS, pool::SPEECH,
        ];
        for id in ids {
            assert!(!content.line(id).is_empty(), "pool {id} missing");
        }
        for topic in ChatterTopic::ALL {
            assert!(!content.line(topic.pool_id()).is_empty(), "{topic:?} missing");
        }
        assert_eq!(content.dilemmas.len(), 4);
        assert!(content.dilemmas.iter().all(|d| d.options.len() == 2));
        assert_eq!(content.tactical_cards.len(), 3);
        assert_eq!(content.intel_by_day.len(), 7);
    }

    #[test]
    fn test_content_loads_from_json() {
        let content = Content::standard();
        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(Content::from_json(&json).unwrap(), content);
        assert!(Content::from_json("{\"pools\": 3}").is_err());
    }

    #[test]
    fn test_slot_bounds() {
        assert!(SlotId::new(0).is_ok());
        assert!(SlotId::new(MAX_SLOTS - 1).is_ok());
        assert!(SlotId::new(MAX_SLOTS).is_err());
        assert_eq!(SlotId::all().count(), MAX_SLOTS as usize);
        assert!(serde_json::from_str::<SlotId>("99").is_err());
    }

    #[test]
    fn test_snapshot_restore_clears_typing() {
        let mut typing = LogEntry::system("2", "日军来了");
        typing.is_typing = true;
        let snap = Snapshot::new(ready_state(), vec![LogEntry::user("1", "> 休息"), typing], 1_700_000_000_000);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["savedAt"], 1_700_000_000_000i64);
        assert_eq!(json["logs"][1]["isTyping"], true);

        let (stats, logs) = snap.clone().restore();
        assert_eq!(stats, snap.stats);
        assert!(logs.iter().all(|l| !l.is_typing));
        assert_eq!(logs[1].text, "日军来了");
    }

    #[test]
    fn test_history_summary_keeps_recent_lines() {
        let logs: Vec<LogEntry> = (0..20)
            .map(|i| LogEntry::system(i.to_string(), format!("第{i}条")))
            .chain(std::iter::once(LogEntry::user("x", "")))
            .collect();
        let summary = history_summary(&logs);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "[LOG] 第5条...");
        assert_eq!(lines[14], "[LOG] 第19条...");
    }

    // ═════════════════════════════════════════════════════════════════════
    // DETERMINISM & PROPERTY TESTS
    // ═════════════════════════════════════════════════════════════════════

    const VOCAB: [&str; 16] = [
        "加固一楼", "加固二楼", "加固屋顶", "休息", "治疗", "去屋顶", "去一楼", "升旗",
        "演讲", "夜袭", "请求补给", "你好", "随便说说", "去二楼", "动员", ":card",
    ];

    /// Plays a scripted campaign from the start command, merging every
    /// response. Pending dilemmas are answered with the pick's parity.
    fn play_script(seed: u64, picks: &[usize]) -> Vec<(TurnResponse, CampaignState)> {
        let content = Content::standard();
        let mut rng = rng(seed);
        let mut state = create_initial_state();
        let mut trail = Vec::new();
        for cmd in ["开始", "加固一楼", "整理补给"] {
            let r = play_turn(&state, cmd, "", &content, &mut rng);
            state.merge(&r.patch);
        }
        for &p in picks {
            let r = if let Some(id) = state.pending_dilemma.clone() {
                play_turn(&state, &format!("EVT_RESOLVE:{id}:{}", p % 2), "", &content, &mut rng)
            } else if VOCAB[p] == ":card" {
                execute_tactical_card(&state, &content, &mut rng)
            } else {
                play_turn(&state, VOCAB[p], "", &content, &mut rng)
            };
            state.merge(&r.patch);
            trail.push((r, state.clone()));
        }
        trail
    }

    #[test]
    fn test_same_seed_same_campaign() {
        let picks: Vec<usize> = (0..200).map(|i| (i * 7 + 3) % VOCAB.len()).collect();
        assert_eq!(play_script(42, &picks), play_script(42, &picks));
    }

    #[test]
    fn test_long_campaign_reaches_an_end() {
        let picks: Vec<usize> = (0..2000).map(|i| (i * 5 + 1) % VOCAB.len()).collect();
        let trail = play_script(7, &picks);
        assert!(trail.last().is_some_and(|(_, s)| s.is_game_over));
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_invariants_hold_across_turns(
            seed in any::<u64>(),
            picks in proptest::collection::vec(0..VOCAB.len(), 1..150)
        ) {
            let trail = play_script(seed, &picks);
            let mut prev: Option<&CampaignState> = None;
            for (response, s) in &trail {
                prop_assert!(s.morale >= s.min_morale && s.morale <= 100);
                prop_assert!(s.health <= 100);
                prop_assert!(s.siege_meter <= 100);
                prop_assert!(s.tutorial_step <= 3);
                prop_assert!(Location::ALL.iter().all(|l| s.fort_level(*l) <= 3));
                prop_assert!(s.hmg_squads.iter().all(|q| q.count <= SQUAD_MAX_COUNT));

                let mut events = s.triggered_events.clone();
                events.sort();
                events.dedup();
                prop_assert_eq!(events.len(), s.triggered_events.len());
                let mut cards = s.used_tactical_cards.clone();
                cards.sort();
                cards.dedup();
                prop_assert_eq!(cards.len(), s.used_tactical_cards.len());

                if let Some(p) = prev {
                    prop_assert!(s.enemies_killed >= p.enemies_killed);
                    prop_assert!(s.day >= p.day);
                    prop_assert!(s.min_morale >= p.min_morale);
                    prop_assert!(s.triggered_events.len() >= p.triggered_events.len());
                    prop_assert!(s.used_tactical_cards.len() >= p.used_tactical_cards.len());
                    if p.is_game_over {
                        prop_assert!(response.patch.is_empty());
                        prop_assert!(s.is_game_over);
                        prop_assert_eq!(s.game_result, p.game_result);
                    }
                }
                prev = Some(s);
            }
        }

        #[test]
        fn prop_allocation_never_exceeds_pools(
            total in 0u32..200,
            wounded in 0u32..100,
            healthy in 0u32..500
        ) {
            let c = allocate_casualties(total, wounded, healthy);
            prop_assert!(c.wounded_deaths <= wounded);
            prop_assert!(c.healthy_deaths + c.healthy_injuries <= healthy);
            prop_assert!(c.wounded_deaths + c.healthy_deaths + c.healthy_injuries <= total);
        }
    }
}
