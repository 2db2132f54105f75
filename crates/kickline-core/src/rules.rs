// League-wide constants shared by the tip scorer, ladder and finals.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of finals rounds played after the regular season.
pub const FINALS_ROUNDS: u32 = 3;

/// Tunable league rules. `Default` reproduces the standard competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRules {
    /// Rounds that count toward the competition-points ladder.
    pub regular_season_rounds: u32,
    /// Points added for a correct dead-cert tip.
    pub dead_cert_bonus: i32,
    /// Points subtracted for an incorrect dead-cert tip (stored positive).
    pub dead_cert_penalty: i32,
    /// Ladder points for a win.
    pub win_points: u32,
    /// Ladder points for each side of a drawn fixture.
    pub draw_points: u32,
    /// How long a cached ladder stays fresh.
    pub cache_freshness_minutes: i64,
}

impl Default for LeagueRules {
    fn default() -> Self {
        LeagueRules {
            regular_season_rounds: 21,
            dead_cert_bonus: 6,
            dead_cert_penalty: 12,
            win_points: 4,
            draw_points: 2,
            cache_freshness_minutes: 15,
        }
    }
}

impl LeagueRules {
    /// Last round of the season, finals included.
    pub fn last_round(&self) -> u32 {
        self.regular_season_rounds + FINALS_ROUNDS
    }

    /// First finals round (22 in the standard competition).
    pub fn first_finals_round(&self) -> u32 {
        self.regular_season_rounds + 1
    }

    /// Whether `round` is a finals round.
    pub fn is_finals_round(&self, round: u32) -> bool {
        round > self.regular_season_rounds && round <= self.last_round()
    }

    /// Reject rounds outside `1..=last_round()`.
    pub fn check_round(&self, round: u32) -> Result<u32, EngineError> {
        let last = self.last_round();
        if round == 0 || round > last {
            return Err(EngineError::RoundOutOfRange { round, last });
        }
        Ok(round)
    }

    /// Cache freshness window as a chrono duration.
    pub fn cache_freshness(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_freshness_minutes)
    }
}
