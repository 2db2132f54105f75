// Match tips: default resolution and the dead-cert scorer.
//
// Tips are resolved against the round's real-world matches before scoring.
// A match the manager did not tip gets an explicit default (home side, no
// dead cert) so the scorer only ever sees complete records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rules::LeagueRules;

/// Which side of a match a tip backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// Final result of a concluded match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Winner(Side),
    Draw,
}

/// Whether a match has a result yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Pending,
    Concluded(MatchResult),
}

impl MatchState {
    pub fn is_concluded(&self) -> bool {
        matches!(self, MatchState::Concluded(_))
    }
}

/// A real-world match that managers tip on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipFixture {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub state: MatchState,
}

impl TipFixture {
    /// Side a tip falls back to when the manager did not submit one.
    pub fn default_side(&self) -> Side {
        Side::Home
    }
}

/// A tip as submitted by a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTip {
    pub fixture_id: String,
    pub side: Side,
    #[serde(default)]
    pub dead_cert: bool,
}

/// Whether a tip record came from the manager or the default rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipOrigin {
    Submitted,
    Defaulted,
}

/// A resolved tip on one match, tagged with that match's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    pub fixture_id: String,
    pub side: Side,
    pub dead_cert: bool,
    pub origin: TipOrigin,
    pub state: MatchState,
}

impl TipRecord {
    /// `None` until the match concludes. A drawn match makes every tip wrong.
    pub fn correct(&self) -> Option<bool> {
        match self.state {
            MatchState::Pending => None,
            MatchState::Concluded(MatchResult::Winner(side)) => Some(side == self.side),
            MatchState::Concluded(MatchResult::Draw) => Some(false),
        }
    }
}

/// Resolve submitted tips against the round's matches.
///
/// Returns one record per match in fixture order. Missing tips default to
/// the home side with no dead cert; tips on unknown matches are dropped; for
/// repeated tips on one match the last submission wins.
pub fn resolve_tips(fixtures: &[TipFixture], submitted: &[SubmittedTip]) -> Vec<TipRecord> {
    let mut by_fixture: HashMap<&str, &SubmittedTip> = HashMap::new();
    for tip in submitted {
        if fixtures.iter().any(|f| f.id == tip.fixture_id) {
            by_fixture.insert(tip.fixture_id.as_str(), tip);
        } else {
            warn!(fixture_id = %tip.fixture_id, "dropping tip for unknown fixture");
        }
    }

    fixtures
        .iter()
        .map(|fixture| match by_fixture.get(fixture.id.as_str()) {
            Some(tip) => TipRecord {
                fixture_id: fixture.id.clone(),
                side: tip.side,
                dead_cert: tip.dead_cert,
                origin: TipOrigin::Submitted,
                state: fixture.state,
            },
            None => TipRecord {
                fixture_id: fixture.id.clone(),
                side: fixture.default_side(),
                dead_cert: false,
                origin: TipOrigin::Defaulted,
                state: fixture.state,
            },
        })
        .collect()
}

/// A round is concluded once it has matches and all of them have results.
pub fn round_concluded(fixtures: &[TipFixture]) -> bool {
    !fixtures.is_empty() && fixtures.iter().all(|f| f.state.is_concluded())
}

/// Dead-cert bonus for one manager's round, plus display counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadCertScore {
    /// Signed bonus added to the round total.
    pub bonus: i32,
    /// Correct tips on concluded matches. Display only, never scored.
    pub correct_tips: u32,
    pub concluded: u32,
    pub pending: u32,
    pub defaulted: u32,
}

/// Score a manager's tips. Only concluded matches contribute.
pub fn score_dead_certs(tips: &[TipRecord], rules: &LeagueRules) -> DeadCertScore {
    let mut result = DeadCertScore::default();
    for tip in tips {
        if tip.origin == TipOrigin::Defaulted {
            result.defaulted += 1;
        }
        let Some(correct) = tip.correct() else {
            result.pending += 1;
            continue;
        };
        result.concluded += 1;
        if correct {
            result.correct_tips += 1;
        }
        if tip.dead_cert {
            result.bonus += if correct {
                rules.dead_cert_bonus
            } else {
                -rules.dead_cert_penalty
            };
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
