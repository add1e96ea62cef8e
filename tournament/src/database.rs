// ═══════════════════════════════════════════════════════════════════════
// Result Store — SQLite storage for finished campaigns per commander
// ═══════════════════════════════════════════════════════════════════════

use crate::error::TournamentError;
use crate::runner::CampaignResult;
use lone_army_engine::GameResult;
use rusqlite::{params, Connection};

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub commander: String,
    pub campaigns: u32,
    pub victories: u32,
    pub best_score: u32,
    pub mean_score: f64,
}

pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &str) -> Result<Self, TournamentError> {
        let store = ResultStore { conn: Connection::open(path)? };
        store.create_schema()?;
        Ok(store)
    }

    /// In-memory store (useful for tests).
    pub fn in_memory() -> Result<Self, TournamentError> {
        let store = ResultStore { conn: Connection::open_in_memory()? };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<(), TournamentError> {
        self.conn.execute_batch("
            CREATE TABLE IF NOT EXISTS commanders (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                campaigns   INTEGER NOT NULL DEFAULT 0,
                victories   INTEGER NOT NULL DEFAULT 0,
                best_score  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS campaigns (
                id              INTEGER PRIMARY KEY,
                commander_id    INTEGER NOT NULL REFERENCES commanders(id),
                seed            INTEGER NOT NULL,
                result          TEXT NOT NULL,
                rank            TEXT,
                score           INTEGER NOT NULL,
                days            INTEGER NOT NULL,
                turns           INTEGER NOT NULL,
                soldiers        INTEGER NOT NULL,
                enemies_killed  INTEGER NOT NULL,
                played_at       TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ")?;
        Ok(())
    }

    /// Register a commander (or return the existing id).
    pub fn register_commander(&self, name: &str) -> Result<i64, TournamentError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO commanders (name) VALUES (?1)",
            params![name],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM commanders WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Store one finished campaign and fold it into the commander's totals.
    pub fn store_campaign(&self, result: &CampaignResult) -> Result<i64, TournamentError> {
        let commander_id = self.register_commander(&result.commander)?;
        let outcome = match result.result {
            GameResult::Victory => "victory",
            GameResult::Defeat => "defeat",
            GameResult::Ongoing => "ongoing",
        };

        // SQLite integers are signed; seeds keep their bit pattern.
        self.conn.execute(
            "INSERT INTO campaigns (commander_id, seed, result, rank, score, days, turns, soldiers, enemies_killed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                commander_id,
                result.seed as i64,
                outcome,
                result.rank,
                result.score,
                result.days,
                result.turns,
                result.soldiers,
                result.enemies_killed,
            ],
        )?;
        let campaign_id = self.conn.last_insert_rowid();

        let won = i64::from(result.result == GameResult::Victory);
        self.conn.execute(
            "UPDATE commanders
             SET campaigns = campaigns + 1,
                 victories = victories + ?1,
                 best_score = MAX(best_score, ?2)
             WHERE id = ?3",
            params![won, result.score, commander_id],
        )?;

        Ok(campaign_id)
    }

    /// Commanders ordered by victories, then mean score.
    pub fn leaderboard(&self) -> Result<Vec<Standing>, TournamentError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, c.campaigns, c.victories, c.best_score, COALESCE(AVG(g.score), 0.0) AS mean
             FROM commanders c
             LEFT JOIN campaigns g ON g.commander_id = c.id
             GROUP BY c.id
             ORDER BY c.victories DESC, mean DESC"
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Standing {
                commander: row.get(0)?,
                campaigns: row.get(1)?,
                victories: row.get(2)?,
                best_score: row.get(3)?,
                mean_score: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Total number of campaigns stored.
    pub fn campaign_count(&self) -> Result<u32, TournamentError> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM campaigns", [], |row| row.get(0))?)
    }
}
