// ═══════════════════════════════════════════════════════════════════════
// In-game clock — "HH:MM" wall time that wraps at midnight
// ═══════════════════════════════════════════════════════════════════════

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day in minutes since midnight. Serialized as "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameClock(u32);

impl GameClock {
    pub fn new(hour: u32, minute: u32) -> Self {
        GameClock((hour * 60 + minute) % MINUTES_PER_DAY)
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Advance by `minutes`. The flag is true when midnight was crossed.
    pub fn advance(self, minutes: u32) -> (GameClock, bool) {
        let total = self.0 + minutes;
        (GameClock(total % MINUTES_PER_DAY), total >= MINUTES_PER_DAY)
    }
}

impl std::fmt::Display for GameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for GameClock {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EngineError::InvalidClock(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        let hour: u32 = h.parse().map_err(|_| bad())?;
        let minute: u32 = m.parse().map_err(|_| bad())?;
        if hour >= 24 || minute >= 60 {
            return Err(bad());
        }
        Ok(GameClock::new(hour, minute))
    }
}

impl TryFrom<String> for GameClock {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameClock> for String {
    fn from(clock: GameClock) -> Self {
        clock.to_string()
    }
}
