// End-to-end season flow through the public API: score rounds from roster
// sheets, record the totals, build the ladder, then play out the finals.

use chrono::{DateTime, Utc};

use kickline_core::ladder::{BracketSlot, FinalsMatchKind, Fixture, MemoryLadderCache};
use kickline_core::roster::{RosterRow, RoundRosterSnapshot, SubstituteSource, SubstitutionKind};
use kickline_core::scoring::{StatLine, StatLines};
use kickline_core::tips::{MatchResult, MatchState, Side, SubmittedTip, TipFixture};
use kickline_core::{score_round, season_finals, season_ladder, LeagueRules, MemorySource};

const MANAGERS: [&str; 4] = ["ava", "ben", "cal", "dee"];

// ===========================================================================
// Test helpers
// ===========================================================================

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_000_000, 0).unwrap()
}

/// Every manager plays every other once per three rounds.
fn fixtures_for(round: u32) -> Vec<Fixture> {
    let [a, b, c, d] = MANAGERS;
    match round % 3 {
        1 => vec![Fixture::new(a, b), Fixture::new(c, d)],
        2 => vec![Fixture::new(a, c), Fixture::new(b, d)],
        _ => vec![Fixture::new(a, d), Fixture::new(b, c)],
    }
}

/// Regular season where ava > ben > cal > dee every round.
fn regular_season(rules: &LeagueRules) -> MemorySource {
    let mut source = MemorySource::new();
    for round in 1..=rules.regular_season_rounds {
        source = source.with_fixtures(round, fixtures_for(round));
        for (i, m) in MANAGERS.iter().enumerate() {
            source.record_result(round, m, 100 - 10 * i as i32);
        }
    }
    source
}

fn goals(n: u32) -> StatLine {
    StatLine {
        goals: n,
        ..Default::default()
    }
}

fn concluded(id: &str, result: MatchResult) -> TipFixture {
    TipFixture {
        id: id.into(),
        home_team: format!("{id} home"),
        away_team: format!("{id} away"),
        state: MatchState::Concluded(result),
    }
}

// ===========================================================================
// Round scoring
// ===========================================================================

#[test]
fn concluded_round_backfills_from_reserve_and_scores_dead_certs() {
    let rules = LeagueRules::default();
    let ava = RoundRosterSnapshot::from_rows(
        1,
        "ava",
        &[
            RosterRow::new("FF", "No Show"),
            RosterRow::new("TF", "Tall Tim"),
            RosterRow::new("RES_A", "Res Ray"),
        ],
    )
    .unwrap();
    let ben = RoundRosterSnapshot::from_rows(1, "ben", &[RosterRow::new("FF", "Sharp Sam")]).unwrap();

    let mut lines = StatLines::new();
    lines.insert("Tall Tim".into(), StatLine { goals: 1, marks: 2, ..Default::default() });
    lines.insert("Res Ray".into(), goals(2));
    lines.insert("Sharp Sam".into(), goals(4));

    let source = MemorySource::new()
        .with_roster(ava)
        .with_roster(ben)
        .with_stat_lines(1, lines)
        .with_fixtures(1, vec![Fixture::new("ava", "ben")])
        .with_tip_fixtures(
            1,
            vec![
                concluded("m1", MatchResult::Winner(Side::Home)),
                concluded("m2", MatchResult::Draw),
            ],
        )
        .with_tips(
            1,
            "ben",
            vec![SubmittedTip {
                fixture_id: "m2".into(),
                side: Side::Away,
                dead_cert: true,
            }],
        );

    let scores = score_round(&source, 1, &rules).unwrap();
    assert_eq!(scores.len(), 2);

    let ava = &scores[0];
    let ff = &ava.per_slot_outcomes[0];
    assert!(ff.substituted);
    assert_eq!(ff.source, Some(SubstituteSource::ReserveA));
    assert_eq!(ff.kind, Some(SubstitutionKind::DidNotPlay));
    assert_eq!(ff.effective_score, 18);
    assert_eq!(ava.dead_cert_score, 0);
    assert_eq!(ava.correct_tips, 1);

    // A drawn dead cert is a miss.
    let ben = &scores[1];
    assert_eq!(ben.team_score, 36);
    assert_eq!(ben.dead_cert_score, -rules.dead_cert_penalty);
    assert_eq!(ben.total, 36 - rules.dead_cert_penalty);
}

#[test]
fn pending_round_skips_did_not_play_backfill() {
    let rules = LeagueRules::default();
    let ava = RoundRosterSnapshot::from_rows(
        2,
        "ava",
        &[
            RosterRow::new("FF", "No Show"),
            RosterRow::with_backup("BENCH", "Bench Bo", "FF"),
        ],
    )
    .unwrap();
    let mut lines = StatLines::new();
    lines.insert("Bench Bo".into(), goals(2));

    let mut pending = concluded("m1", MatchResult::Draw);
    pending.state = MatchState::Pending;

    let source = MemorySource::new()
        .with_roster(ava)
        .with_stat_lines(2, lines)
        .with_fixtures(2, vec![Fixture::new("ava", "ben")])
        .with_tip_fixtures(2, vec![pending]);

    let scores = score_round(&source, 2, &rules).unwrap();
    // The bench still outscores a zero, so it comes in as an upgrade.
    let ff = &scores[0].per_slot_outcomes[0];
    assert_eq!(ff.kind, Some(SubstitutionKind::Upgrade));
    // Ben has no roster at all.
    assert_eq!(scores[1].team_score, 0);
    assert!(scores[1].per_slot_outcomes.iter().all(|o| o.is_unselected()));
}

// ===========================================================================
// Ladder and finals
// ===========================================================================

#[test]
fn ladder_orders_by_points_then_percentage() {
    let rules = LeagueRules::default();
    let source = regular_season(&rules);
    let cache = MemoryLadderCache::new();

    let lookup = season_ladder(&source, &cache, rules.regular_season_rounds, now(), &rules).unwrap();
    let ids: Vec<&str> = lookup.entries.iter().map(|e| e.manager_id.as_str()).collect();
    assert_eq!(ids, MANAGERS);

    let top = &lookup.entries[0];
    assert_eq!(top.played, 21);
    assert_eq!(top.wins, 21);
    assert_eq!(top.ladder_points, 84);
    let pf: i64 = lookup.entries.iter().map(|e| e.points_for).sum();
    let pa: i64 = lookup.entries.iter().map(|e| e.points_against).sum();
    assert_eq!(pf, pa);

    let again = season_ladder(&source, &cache, rules.regular_season_rounds, now(), &rules).unwrap();
    assert!(again.from_cache);
}

#[test]
fn finals_play_out_to_a_premier() {
    let rules = LeagueRules::default();
    let mut source = regular_season(&rules);

    let bracket = season_finals(&source, &rules).unwrap();
    let q1 = bracket.get(FinalsMatchKind::QualifyingOne).unwrap();
    assert_eq!(q1.home, BracketSlot::Manager("ava".into()));
    assert_eq!(q1.away, BracketSlot::Manager("dee".into()));
    assert_eq!(bracket.fixtures(22).len(), 2);
    assert!(bracket.fixtures(23).is_empty());

    // Q1: dee upsets ava. Q2: ben beats cal.
    for (m, total) in [("ava", 50), ("dee", 60), ("ben", 70), ("cal", 40)] {
        source.record_result(22, m, total);
    }
    // Preliminary: ava and ben level, higher seed goes through.
    for (m, total) in [("ava", 80), ("ben", 80)] {
        source.record_result(23, m, total);
    }
    // Grand Final: dee v ava.
    for (m, total) in [("dee", 90), ("ava", 85)] {
        source.record_result(24, m, total);
    }

    let bracket = season_finals(&source, &rules).unwrap();
    let prelim = bracket.get(FinalsMatchKind::Preliminary).unwrap();
    assert_eq!(prelim.winner.as_deref(), Some("ava"));
    let grand = bracket.get(FinalsMatchKind::GrandFinal).unwrap();
    assert_eq!(grand.home, BracketSlot::Manager("dee".into()));
    assert_eq!(grand.away, BracketSlot::Manager("ava".into()));
    assert_eq!(bracket.premier(), Some("dee"));
}

#[test]
fn finals_rounds_are_scored_from_the_bracket() {
    let rules = LeagueRules::default();
    let mut source = regular_season(&rules);

    let mut lines = StatLines::new();
    for (m, n) in [("ava", 2), ("ben", 4), ("cal", 1), ("dee", 5)] {
        let player = format!("{m} forward");
        let roster =
            RoundRosterSnapshot::from_rows(22, m, &[RosterRow::new("FF", &player)]).unwrap();
        source = source.with_roster(roster);
        lines.insert(player, goals(n));
    }
    source = source.with_stat_lines(22, lines);

    let scores = score_round(&source, 22, &rules).unwrap();
    let ids: Vec<&str> = scores.iter().map(|s| s.manager_id.as_str()).collect();
    assert_eq!(ids, ["ava", "dee", "ben", "cal"]);
    for s in &scores {
        source.record_result(22, &s.manager_id, s.total);
    }

    let bracket = season_finals(&source, &rules).unwrap();
    let q1 = bracket.get(FinalsMatchKind::QualifyingOne).unwrap();
    assert_eq!(q1.winner.as_deref(), Some("dee"));
    let q2 = bracket.get(FinalsMatchKind::QualifyingTwo).unwrap();
    assert_eq!(q2.winner.as_deref(), Some("ben"));

    // The Preliminary is now scheduled: Q1 loser v Q2 winner.
    let prelim = score_round(&source, 23, &rules).unwrap();
    let ids: Vec<&str> = prelim.iter().map(|s| s.manager_id.as_str()).collect();
    assert_eq!(ids, ["ava", "ben"]);
}

#[test]
fn finals_wait_for_the_last_regular_round() {
    let rules = LeagueRules::default();
    let mut source = regular_season(&rules);
    source.results.remove(&rules.regular_season_rounds);

    let bracket = season_finals(&source, &rules).unwrap();
    let q1 = bracket.get(FinalsMatchKind::QualifyingOne).unwrap();
    assert_eq!(q1.home, BracketSlot::Pending("1st".into()));
    assert_eq!(q1.away, BracketSlot::Pending("4th".into()));
    assert!(bracket.premier().is_none());
}
