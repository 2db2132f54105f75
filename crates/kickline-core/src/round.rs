// A manager's round total: team score plus dead-cert bonus.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::roster::{resolve_substitutions, team_score, RoundRosterSnapshot, SubstitutionOutcome};
use crate::rules::LeagueRules;
use crate::scoring::StatLines;
use crate::tips::{score_dead_certs, TipRecord};

/// Result of scoring one manager's round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub round: u32,
    pub manager_id: String,
    /// Sum of effective slot scores.
    pub team_score: u32,
    /// Signed dead-cert bonus.
    pub dead_cert_score: i32,
    /// `team_score + dead_cert_score`.
    pub total: i32,
    /// Correct tips, for display only.
    pub correct_tips: u32,
    /// One outcome per main slot, in canonical order.
    pub per_slot_outcomes: Vec<SubstitutionOutcome>,
}

/// Score one manager's round.
///
/// `roster` may be absent (six unselected slots) and `tips` may be empty
/// (no bonus); neither is an error.
pub fn compute_round_score(
    round: u32,
    manager_id: &str,
    roster: Option<&RoundRosterSnapshot>,
    stat_lines: &StatLines,
    tips: &[TipRecord],
    round_concluded: bool,
    rules: &LeagueRules,
) -> RoundScore {
    let per_slot_outcomes = resolve_substitutions(roster, stat_lines, round_concluded);
    let team = team_score(&per_slot_outcomes);
    let dead_certs = score_dead_certs(tips, rules);
    let total = i32::try_from(team)
        .unwrap_or(i32::MAX)
        .saturating_add(dead_certs.bonus);

    debug!(
        round,
        manager_id,
        team_score = team,
        dead_cert_score = dead_certs.bonus,
        total,
        "round scored"
    );

    RoundScore {
        round,
        manager_id: manager_id.to_string(),
        team_score: team,
        dead_cert_score: dead_certs.bonus,
        total,
        correct_tips: dead_certs.correct_tips,
        per_slot_outcomes,
    }
}
