// Raw per-player, per-round statistic records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One player's raw match statistics for one round.
///
/// Missing fields deserialize to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub kicks: u32,
    pub handballs: u32,
    pub marks: u32,
    pub tackles: u32,
    pub hitouts: u32,
    pub goals: u32,
    pub behinds: u32,
}

impl StatLine {
    pub fn disposals(&self) -> u32 {
        self.kicks.saturating_add(self.handballs)
    }

    /// A player played if any counted statistic is non-zero.
    pub fn played(&self) -> bool {
        self.kicks > 0
            || self.handballs > 0
            || self.marks > 0
            || self.tackles > 0
            || self.hitouts > 0
            || self.goals > 0
            || self.behinds > 0
    }
}

/// All stat lines for a round, keyed by player name.
pub type StatLines = HashMap<String, StatLine>;

/// Whether the named player has a stat line showing they played.
pub fn player_played(stat_lines: &StatLines, player: &str) -> bool {
    stat_lines.get(player).is_some_and(|s| s.played())
}
