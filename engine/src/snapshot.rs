// ═══════════════════════════════════════════════════════════════════════
// Snapshot contract — what a save slot holds
//
// The engine does not store anything. These types fix the shape a
// persistence layer writes and reads back: the full state, the ordered
// narrative log, and when it was saved.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::EngineError;
use crate::types::{CampaignState, Location};
use serde::{Deserialize, Serialize};

/// Number of addressable save slots.
pub const MAX_SLOTS: u32 = 50;

/// How many recent log lines feed the history summary, and how many
/// characters of each.
pub const HISTORY_LINES: usize = 15;
pub const HISTORY_LINE_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotId(u32);

impl SlotId {
    pub fn new(slot: u32) -> Result<SlotId, EngineError> {
        if slot < MAX_SLOTS {
            Ok(SlotId(slot))
        } else {
            Err(EngineError::SlotOutOfRange { slot, max: MAX_SLOTS })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..MAX_SLOTS).map(SlotId)
    }
}

impl TryFrom<u32> for SlotId {
    type Error = EngineError;

    fn try_from(slot: u32) -> Result<Self, Self::Error> {
        SlotId::new(slot)
    }
}

impl From<SlotId> for u32 {
    fn from(slot: SlotId) -> u32 {
        slot.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    /// Presentation-only: the line is still being typed out.
    #[serde(default)]
    pub is_typing: bool,
}

impl LogEntry {
    pub fn system(id: impl Into<String>, text: impl Into<String>) -> LogEntry {
        LogEntry { id: id.into(), sender: Sender::System, text: text.into(), is_typing: false }
    }

    pub fn user(id: impl Into<String>, text: impl Into<String>) -> LogEntry {
        LogEntry { id: id.into(), sender: Sender::User, text: text.into(), is_typing: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub stats: CampaignState,
    pub logs: Vec<LogEntry>,
    /// Milliseconds since the Unix epoch.
    pub saved_at: i64,
}

impl Snapshot {
    pub fn new(stats: CampaignState, logs: Vec<LogEntry>, saved_at: i64) -> Snapshot {
        Snapshot { stats, logs, saved_at }
    }

    /// State and log for a resumed session. Simulation fields come back
    /// verbatim; transient typing flags are cleared.
    pub fn restore(self) -> (CampaignState, Vec<LogEntry>) {
        let logs = self
            .logs
            .into_iter()
            .map(|l| LogEntry { is_typing: false, ..l })
            .collect();
        (self.stats, logs)
    }

    pub fn meta(&self, slot: SlotId) -> SlotMeta {
        SlotMeta {
            id: slot,
            saved_at: self.saved_at,
            day: self.stats.day,
            soldiers: self.stats.soldiers,
            location: self.stats.location,
        }
    }
}

/// Listing entry for an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotMeta {
    pub id: SlotId,
    pub saved_at: i64,
    pub day: u32,
    pub soldiers: u32,
    pub location: Location,
}

/// Condensed recent history handed to the turn entry point.
pub fn history_summary(logs: &[LogEntry]) -> String {
    let kept: Vec<&LogEntry> = logs.iter().filter(|l| !l.text.is_empty()).collect();
    let start = kept.len().saturating_sub(HISTORY_LINES);
    kept[start..]
        .iter()
        .map(|l| {
            let tag = match l.sender {
                Sender::User => "CMD",
                Sender::System => "LOG",
            };
            let text: String = l.text.chars().take(HISTORY_LINE_CHARS).collect();
            format!("[{tag}] {text}...")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
