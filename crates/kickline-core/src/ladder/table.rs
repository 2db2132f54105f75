// Competition-points ladder derived from round totals and the schedule.
//
// The table is always rebuilt from the full history it covers; entries are
// never updated incrementally.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rules::LeagueRules;

/// One head-to-head pairing of managers in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub display_name: String,
}

impl Fixture {
    pub fn new(home: &str, away: &str) -> Self {
        Fixture {
            home: home.to_string(),
            away: away.to_string(),
            display_name: format!("{home} v {away}"),
        }
    }
}

/// Manager fixtures keyed by round.
pub type FixtureSchedule = BTreeMap<u32, Vec<Fixture>>;

/// Recorded round totals keyed by round, then manager id.
pub type RoundResults = BTreeMap<u32, HashMap<String, i32>>;

/// One manager's standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderEntry {
    /// 1-based rank after sorting.
    pub position: u32,
    pub manager_id: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: i64,
    pub points_against: i64,
    pub percentage: f64,
    pub ladder_points: u32,
}

impl LadderEntry {
    fn new(manager_id: &str) -> Self {
        LadderEntry {
            position: 0,
            manager_id: manager_id.to_string(),
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            points_for: 0,
            points_against: 0,
            percentage: 0.0,
            ladder_points: 0,
        }
    }
}

/// `points_for / points_against * 100` rounded to two places, or
/// `points_for * 100` when nothing has been conceded. Dead-cert penalties
/// can push `points_against` below zero; that also counts as nothing
/// conceded, so a negative divisor never flips the sign.
pub fn percentage(points_for: i64, points_against: i64) -> f64 {
    let raw = if points_against <= 0 {
        points_for as f64 * 100.0
    } else {
        points_for as f64 / points_against as f64 * 100.0
    };
    (raw * 100.0).round() / 100.0
}

/// Whether every fixture of `round` has both scores recorded.
pub fn round_complete(results: &RoundResults, schedule: &FixtureSchedule, round: u32) -> bool {
    let (Some(fixtures), Some(scores)) = (schedule.get(&round), results.get(&round)) else {
        return false;
    };
    !fixtures.is_empty()
        && fixtures
            .iter()
            .all(|f| scores.contains_key(&f.home) && scores.contains_key(&f.away))
}

/// Build the ladder as of `upto_round`.
///
/// Only regular-season rounds count. A fixture contributes only when both
/// managers have a recorded total. Every manager appearing in a counted
/// round's schedule or results is listed, games or not. Ordering: ladder
/// points, then percentage, both descending, then manager id ascending.
pub fn compute_ladder(
    results: &RoundResults,
    schedule: &FixtureSchedule,
    upto_round: u32,
    rules: &LeagueRules,
) -> Vec<LadderEntry> {
    let last = upto_round.min(rules.regular_season_rounds);
    if last == 0 {
        return Vec::new();
    }

    let mut managers: BTreeSet<&str> = BTreeSet::new();
    for (_, fixtures) in schedule.range(1..=last) {
        for f in fixtures {
            managers.insert(f.home.as_str());
            managers.insert(f.away.as_str());
        }
    }
    for (_, scores) in results.range(1..=last) {
        managers.extend(scores.keys().map(String::as_str));
    }

    let mut table: BTreeMap<&str, LadderEntry> = managers
        .iter()
        .map(|&m| (m, LadderEntry::new(m)))
        .collect();

    let mut counted = 0usize;
    for (round, fixtures) in schedule.range(1..=last) {
        let Some(scores) = results.get(round) else {
            continue;
        };
        for f in fixtures {
            let (Some(&home), Some(&away)) = (scores.get(&f.home), scores.get(&f.away)) else {
                continue;
            };
            apply_result(&mut table, &f.home, home, away, rules);
            apply_result(&mut table, &f.away, away, home, rules);
            counted += 1;
        }
    }

    let mut ladder: Vec<LadderEntry> = table
        .into_values()
        .map(|mut e| {
            e.percentage = percentage(e.points_for, e.points_against);
            e
        })
        .collect();

    ladder.sort_by(|a, b| {
        b.ladder_points
            .cmp(&a.ladder_points)
            .then_with(|| {
                b.percentage
                    .partial_cmp(&a.percentage)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.manager_id.cmp(&b.manager_id))
    });
    for (idx, entry) in ladder.iter_mut().enumerate() {
        entry.position = idx as u32 + 1;
    }

    info!(
        upto_round,
        counted_rounds = last,
        fixtures = counted,
        managers = ladder.len(),
        "ladder computed"
    );
    ladder
}

fn apply_result(
    table: &mut BTreeMap<&str, LadderEntry>,
    manager: &str,
    scored: i32,
    conceded: i32,
    rules: &LeagueRules,
) {
    let Some(entry) = table.get_mut(manager) else {
        return;
    };
    entry.played += 1;
    entry.points_for += i64::from(scored);
    entry.points_against += i64::from(conceded);
    match scored.cmp(&conceded) {
        Ordering::Greater => {
            entry.wins += 1;
            entry.ladder_points += rules.win_points;
        }
        Ordering::Equal => {
            entry.draws += 1;
            entry.ladder_points += rules.draw_points;
        }
        Ordering::Less => entry.losses += 1,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
