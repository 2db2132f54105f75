// Subcommand implementations. Each returns the text to print so the binary
// stays a thin dispatcher.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use kickline_core::season::{score_manager, score_round, season_finals, season_ladder};
use kickline_core::LeagueRules;
use kickline_store::Database;

use crate::report;

/// Score one manager's round without persisting anything.
pub fn score(db: &Database, rules: &LeagueRules, round: u32, manager_id: &str) -> Result<String> {
    let score = score_manager(db, round, manager_id, rules)
        .with_context(|| format!("failed to score round {round} for {manager_id}"))?;
    Ok(report::round_score(&score))
}

/// Score every scheduled manager in `round` and persist their totals.
pub fn results(db: &Database, rules: &LeagueRules, round: u32) -> Result<String> {
    let scores =
        score_round(db, round, rules).with_context(|| format!("failed to score round {round}"))?;
    db.record_round_scores(&scores)
        .context("failed to record round results")?;
    info!(round, managers = scores.len(), "round results recorded");
    Ok(report::round_results(round, &scores))
}

pub fn ladder(db: &Database, rules: &LeagueRules, round: u32, now: DateTime<Utc>) -> Result<String> {
    let lookup = season_ladder(db, db, round, now, rules)
        .with_context(|| format!("failed to build ladder for round {round}"))?;
    Ok(report::ladder(round, &lookup.entries, lookup.from_cache))
}

pub fn finals(db: &Database, rules: &LeagueRules) -> Result<String> {
    let bracket = season_finals(db, rules).context("failed to resolve finals")?;
    Ok(report::finals(&bracket))
}
