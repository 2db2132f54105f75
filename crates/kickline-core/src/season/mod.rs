// Season-level operations: gather inputs through a `SeasonSource`, then run
// the pure engine over them.

pub mod source;

pub use source::{MemorySource, SeasonSource};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::SeasonError;
use crate::ladder::{
    cached_ladder, compute_ladder, resolve_finals_bracket, round_complete, FinalsBracket, Fixture,
    LadderCache, LadderLookup, RoundResults,
};
use crate::round::{compute_round_score, RoundScore};
use crate::rules::LeagueRules;
use crate::scoring::StatLines;
use crate::tips::{resolve_tips, round_concluded, TipFixture, TipRecord};

/// Resolve one manager's tips for a round, defaulting untipped matches.
pub fn tip_records<S: SeasonSource + ?Sized>(
    source: &S,
    round: u32,
    manager_id: &str,
    fixtures: &[TipFixture],
) -> Result<Vec<TipRecord>, SeasonError> {
    let submitted = source.submitted_tips(round, manager_id)?;
    Ok(resolve_tips(fixtures, &submitted))
}

/// Score a single manager's round.
pub fn score_manager<S: SeasonSource + ?Sized>(
    source: &S,
    round: u32,
    manager_id: &str,
    rules: &LeagueRules,
) -> Result<RoundScore, SeasonError> {
    rules.check_round(round)?;
    let stat_lines = source.stat_lines(round)?;
    let tip_fixtures = source.tip_fixtures(round)?;
    score_with(source, round, manager_id, &stat_lines, &tip_fixtures, rules)
}

/// Manager fixtures for `round`. Finals pairings come from the bracket as
/// resolved by the results recorded so far.
pub fn round_fixtures<S: SeasonSource + ?Sized>(
    source: &S,
    round: u32,
    rules: &LeagueRules,
) -> Result<Vec<Fixture>, SeasonError> {
    if rules.is_finals_round(round) {
        Ok(season_finals(source, rules)?.fixtures(round))
    } else {
        Ok(source.fixtures(round)?)
    }
}

/// Score every manager scheduled in `round`, home and away, in schedule
/// order without duplicates.
pub fn score_round<S: SeasonSource + ?Sized>(
    source: &S,
    round: u32,
    rules: &LeagueRules,
) -> Result<Vec<RoundScore>, SeasonError> {
    rules.check_round(round)?;
    let fixtures = round_fixtures(source, round, rules)?;
    let stat_lines = source.stat_lines(round)?;
    let tip_fixtures = source.tip_fixtures(round)?;

    let mut managers: Vec<&str> = Vec::new();
    for f in &fixtures {
        for m in [f.home.as_str(), f.away.as_str()] {
            if !managers.contains(&m) {
                managers.push(m);
            }
        }
    }

    let scores = managers
        .into_iter()
        .map(|m| score_with(source, round, m, &stat_lines, &tip_fixtures, rules))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        round,
        managers = scores.len(),
        concluded = round_concluded(&tip_fixtures),
        "round scored for all managers"
    );
    Ok(scores)
}

fn score_with<S: SeasonSource + ?Sized>(
    source: &S,
    round: u32,
    manager_id: &str,
    stat_lines: &StatLines,
    tip_fixtures: &[TipFixture],
    rules: &LeagueRules,
) -> Result<RoundScore, SeasonError> {
    let roster = source.roster_snapshot(round, manager_id)?;
    if let Some(snapshot) = &roster {
        snapshot.validate()?;
    }
    let tips = tip_records(source, round, manager_id, tip_fixtures)?;
    Ok(compute_round_score(
        round,
        manager_id,
        roster.as_ref(),
        stat_lines,
        &tips,
        round_concluded(tip_fixtures),
        rules,
    ))
}

/// Ladder as of `upto_round`, served from `cache` while fresh.
pub fn season_ladder<S, C>(
    source: &S,
    cache: &C,
    upto_round: u32,
    now: DateTime<Utc>,
    rules: &LeagueRules,
) -> Result<LadderLookup, SeasonError>
where
    S: SeasonSource + ?Sized,
    C: LadderCache + ?Sized,
{
    rules.check_round(upto_round)?;
    cached_ladder(cache, upto_round, now, rules.cache_freshness(), || {
        let results = source.round_results(upto_round)?;
        let schedule = source.fixture_schedule(upto_round.min(rules.regular_season_rounds))?;
        Ok::<_, SeasonError>(compute_ladder(&results, &schedule, upto_round, rules))
    })
}

/// Finals bracket, seeded only once the regular season is complete.
pub fn season_finals<S: SeasonSource + ?Sized>(
    source: &S,
    rules: &LeagueRules,
) -> Result<FinalsBracket, SeasonError> {
    let regular = rules.regular_season_rounds;
    let results = source.round_results(rules.last_round())?;
    let schedule = source.fixture_schedule(regular)?;

    let ladder = if round_complete(&results, &schedule, regular) {
        compute_ladder(&results, &schedule, regular, rules)
    } else {
        Vec::new()
    };
    let finals_results: RoundResults = results
        .into_iter()
        .filter(|(round, _)| rules.is_finals_round(*round))
        .collect();

    Ok(resolve_finals_bracket(&ladder, &finals_results, rules))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
