// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing and simulating campaigns
// ═══════════════════════════════════════════════════════════════════════

mod saves;

use clap::{Parser, Subcommand};
use lone_army_agents::CommanderKind;
use lone_army_engine::{
    create_initial_state, execute_tactical_card, play_turn, snapshot::history_summary,
    CampaignState, Content, EngineError, LogEntry, Sender, SlotId, Snapshot, TurnResponse,
};
use lone_army_tournament::{run_batch, run_campaign, summarize, ResultStore, TournamentError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use saves::{saved_at_label, SaveDir};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error("slot {0} is empty")]
    EmptySlot(SlotId),
    #[error("'{0}' is not a slot number")]
    BadSlot(String),
}

#[derive(Parser)]
#[command(name = "lone-army", about = "孤军：四行1937 siege defense")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively over stdin
    Play {
        #[arg(short, long, default_value_t = 1937)]
        seed: u64,
        /// JSON file replacing the built-in content
        #[arg(short, long)]
        content: Option<PathBuf>,
        /// Directory holding save slots
        #[arg(long, default_value = "saves")]
        saves: PathBuf,
    },
    /// Let a scripted commander play one campaign
    Auto {
        #[arg(short, long, default_value_t = 1937)]
        seed: u64,
        /// Commander: "random" or "heuristic"
        #[arg(long, default_value = "heuristic")]
        commander: CommanderKind,
        #[arg(short, long, default_value_t = 5_000)]
        turns: u32,
        #[arg(short, long)]
        content: Option<PathBuf>,
    },
    /// Run N campaigns in parallel and store the results
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 1937)]
        seed: u64,
        #[arg(long, default_value = "heuristic")]
        commander: CommanderKind,
        #[arg(short, long, default_value_t = 5_000)]
        turns: u32,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        #[arg(short, long)]
        content: Option<PathBuf>,
    },
    /// Show leaderboard from database
    Leaderboard {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Play { seed, content, saves } => cmd_play(seed, content, saves),
        Commands::Auto { seed, commander, turns, content } => cmd_auto(seed, commander, turns, content),
        Commands::Batch { games, seed, commander, turns, db, content } => {
            cmd_batch(games, seed, commander, turns, &db, content)
        }
        Commands::Leaderboard { db } => cmd_leaderboard(&db),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "runner failed");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so narrative output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_content(path: Option<PathBuf>) -> Result<Content, RunnerError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading content");
            Ok(Content::from_json(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(Content::standard()),
    }
}

// ── Interactive Play ───────────────────────────────────────────────────

struct Session {
    state: CampaignState,
    logs: Vec<LogEntry>,
    next_id: u64,
}

impl Session {
    fn log(&mut self, sender: Sender, text: String) {
        self.next_id += 1;
        self.logs.push(LogEntry { id: self.next_id.to_string(), sender, text, is_typing: false });
    }

    fn apply(&mut self, response: &TurnResponse) {
        self.state.merge(&response.patch);
        self.log(Sender::System, response.narrative.clone());
    }

    fn resume(&mut self, snapshot: Snapshot) {
        let (state, logs) = snapshot.restore();
        self.next_id = logs.iter().filter_map(|l| l.id.parse().ok()).max().unwrap_or(0);
        self.state = state;
        self.logs = logs;
    }
}

fn print_slots(saves: &SaveDir) {
    for meta in saves.list() {
        println!(
            "  存档 {:>2}: 第{}天 {}人 {} ({})",
            meta.id,
            meta.day,
            meta.soldiers,
            meta.location,
            saved_at_label(meta.saved_at)
        );
    }
}

fn cmd_play(seed: u64, content: Option<PathBuf>, saves: PathBuf) -> Result<(), RunnerError> {
    let content = load_content(content)?;
    let saves = SaveDir::new(saves);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = Session { state: create_initial_state(), logs: Vec::new(), next_id: 0 };

    println!("=== 孤军：四行1937 ===");
    println!("输入「开始」进入战役。指令: :save N  :load N  :slots  :card  :status  :quit\n");
    print_slots(&saves);

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            prompt()?;
            continue;
        }

        match input.split_once(' ').unwrap_or((input, "")) {
            (":quit", _) => break,
            (":status", _) => print_status(&session.state),
            (":slots", _) => print_slots(&saves),
            (":save", arg) => match parse_slot(arg).and_then(|slot| {
                saves.save(slot, &session.state, &session.logs).map(|()| slot)
            }) {
                Ok(slot) => println!("已保存到存档 {slot}"),
                Err(err) => println!("保存失败: {err}"),
            },
            (":load", arg) => match parse_slot(arg).and_then(|slot| {
                saves.load(slot)?.ok_or(RunnerError::EmptySlot(slot))
            }) {
                Ok(snapshot) => {
                    session.resume(snapshot);
                    println!("读档成功。");
                    print_status(&session.state);
                }
                Err(err) => println!("读档失败: {err}"),
            },
            (":card", _) => {
                let response = execute_tactical_card(&session.state, &content, &mut rng);
                print_response(&response);
                session.apply(&response);
            }
            _ => {
                let command = match (input.parse::<usize>(), session.state.pending_dilemma.as_deref()) {
                    (Ok(n), Some(id)) => content
                        .dilemma(id)
                        .map(|d| d.action_command(n.saturating_sub(1)))
                        .unwrap_or_else(|| input.to_string()),
                    _ => input.to_string(),
                };
                let history = history_summary(&session.logs);
                session.log(Sender::User, format!("> {input}"));
                let response = play_turn(&session.state, &command, &history, &content, &mut rng);
                print_response(&response);
                session.apply(&response);
            }
        }
        prompt()?;
    }
    Ok(())
}

fn parse_slot(arg: &str) -> Result<SlotId, RunnerError> {
    let n: u32 = arg.trim().parse().map_err(|_| RunnerError::BadSlot(arg.to_string()))?;
    Ok(SlotId::new(n)?)
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn print_response(response: &TurnResponse) {
    println!("\n{}", response.narrative);
    if let Some(intel) = &response.enemy_intel {
        println!("【敌情】{intel}");
    }
    if let Some(dilemma) = &response.dilemma {
        println!("\n【抉择】{}\n{}", dilemma.title, dilemma.description);
        for (i, option) in dilemma.options.iter().enumerate() {
            println!("  {}. {} {}", i + 1, option.label, option.risk_text);
        }
    }
    println!();
}

fn print_status(s: &CampaignState) {
    println!(
        "第{}天 {} | 位置: {} | 兵力 {} (伤员 {}) | 士气 {} | 阵地 {} | 围攻 {}%",
        s.day, s.current_time, s.location, s.soldiers, s.wounded, s.morale, s.health, s.siege_meter
    );
    println!(
        "弹药 {} | 机枪弹 {} | 手榴弹 {} | 沙袋 {} | 药品 {} | 击毙 {}",
        s.ammo, s.machine_gun_ammo, s.grenades, s.sandbags, s.medkits, s.enemies_killed
    );
    if let Some(card) = &s.active_tactical_card {
        println!("【战机】{}：{} (输入 :card 执行)", card.title, card.effect_text);
    }
}

// ── Headless ───────────────────────────────────────────────────────────

fn cmd_auto(seed: u64, kind: CommanderKind, turns: u32, content: Option<PathBuf>) -> Result<(), RunnerError> {
    let content = load_content(content)?;
    let mut commander = kind.build(seed);
    let result = run_campaign(commander.as_mut(), &content, seed, turns)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_batch(
    games: u32,
    seed: u64,
    kind: CommanderKind,
    turns: u32,
    db_path: &str,
    content: Option<PathBuf>,
) -> Result<(), RunnerError> {
    let content = load_content(content)?;
    let store = ResultStore::open(db_path)?;
    println!("=== Batch: {games} campaigns, commander={kind} ===\n");

    let seeds: Vec<u64> = (0..u64::from(games)).map(|g| seed.wrapping_add(g * 1000)).collect();
    let results = run_batch(kind, &content, &seeds, turns);
    for r in &results {
        match r {
            Ok(result) => {
                store.store_campaign(result)?;
            }
            Err(err) => error!(%err, "campaign failed"),
        }
    }

    let summary = summarize(&results);
    let pct = if summary.campaigns > 0 {
        f64::from(summary.victories) / f64::from(summary.campaigns) * 100.0
    } else {
        0.0
    };
    println!("Victories: {} / {} ({pct:.1}%)", summary.victories, summary.campaigns);
    println!("Errors:    {}", summary.errors);
    println!("Mean score: {:.1}", summary.mean_score);
    println!("\nResults saved to: {db_path}");
    println!("Total campaigns in DB: {}", store.campaign_count()?);
    Ok(())
}

fn cmd_leaderboard(db_path: &str) -> Result<(), RunnerError> {
    let store = ResultStore::open(db_path)?;
    let board = store.leaderboard()?;
    if board.is_empty() {
        println!("No commanders found. Run some batches first.");
        return Ok(());
    }
    println!("=== Leaderboard ===\n");
    println!("{:<12} {:>9} {:>9} {:>9} {:>10}", "Commander", "Played", "Wins", "Best", "Mean");
    println!("{}", "-".repeat(53));
    for s in &board {
        println!(
            "{:<12} {:>9} {:>9} {:>9} {:>10.1}",
            s.commander, s.campaigns, s.victories, s.best_score, s.mean_score
        );
    }
    Ok(())
}
