// ═══════════════════════════════════════════════════════════════════════
// Save Slots — one JSON snapshot file per slot in a directory
// ═══════════════════════════════════════════════════════════════════════

use crate::RunnerError;
use chrono::{DateTime, Utc};
use lone_army_engine::snapshot::SlotMeta;
use lone_army_engine::{CampaignState, LogEntry, SlotId, Snapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub struct SaveDir {
    dir: PathBuf,
}

impl SaveDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SaveDir { dir: dir.into() }
    }

    fn path(&self, slot: SlotId) -> PathBuf {
        self.dir.join(format!("slot_{:02}.json", slot.get()))
    }

    pub fn save(&self, slot: SlotId, state: &CampaignState, logs: &[LogEntry]) -> Result<(), RunnerError> {
        fs::create_dir_all(&self.dir)?;
        let snapshot = Snapshot::new(state.clone(), logs.to_vec(), Utc::now().timestamp_millis());
        let path = self.path(slot);
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        debug!(slot = slot.get(), path = %path.display(), "snapshot written");
        Ok(())
    }

    /// `None` for an empty slot.
    pub fn load(&self, slot: SlotId) -> Result<Option<Snapshot>, RunnerError> {
        match fs::read_to_string(self.path(slot)) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Occupied slots in slot order. Unreadable files are skipped.
    pub fn list(&self) -> Vec<SlotMeta> {
        SlotId::all()
            .filter_map(|slot| match self.load(slot) {
                Ok(snapshot) => snapshot.map(|s| s.meta(slot)),
                Err(err) => {
                    debug!(slot = slot.get(), %err, "skipping unreadable slot");
                    None
                }
            })
            .collect()
    }
}

/// Wall-clock label for a save timestamp in milliseconds.
pub fn saved_at_label(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string())
}
