// Plain-text rendering of scores, ladders and the finals bracket.

use std::fmt::Write;

use kickline_core::ladder::{FinalsBracket, LadderEntry};
use kickline_core::roster::SubstitutionOutcome;
use kickline_core::RoundScore;

/// Per-slot breakdown of one manager's round.
pub fn round_score(score: &RoundScore) -> String {
    let mut out = format!("Round {} - {}\n", score.round, score.manager_id);
    for outcome in &score.per_slot_outcomes {
        let _ = writeln!(
            out,
            "  {:<5} {:<24} {:>4}{}",
            outcome.position.label(),
            outcome.effective_player.as_deref().unwrap_or("-"),
            outcome.effective_score,
            substitution_note(outcome),
        );
    }
    let _ = writeln!(out, "  Team score:      {:>4}", score.team_score);
    let _ = writeln!(
        out,
        "  Dead certs:      {:>+4}  ({} correct tips)",
        score.dead_cert_score, score.correct_tips
    );
    let _ = writeln!(out, "  Total:           {:>4}", score.total);
    out
}

fn substitution_note(outcome: &SubstitutionOutcome) -> String {
    if !outcome.substituted {
        return String::new();
    }
    let source = outcome.source.map(|s| s.label()).unwrap_or("?");
    let replaced = outcome.original_player.as_deref().unwrap_or("empty slot");
    let kind = match outcome.kind {
        Some(kind) => format!("{kind:?}"),
        None => String::new(),
    };
    format!("  [{source} for {replaced}, {kind}]")
}

/// One line per manager, in the order given.
pub fn round_results(round: u32, scores: &[RoundScore]) -> String {
    let mut out = format!("Round {round} results\n");
    for s in scores {
        let _ = writeln!(
            out,
            "  {:<16} team {:>4}  dead certs {:>+4}  total {:>4}",
            s.manager_id, s.team_score, s.dead_cert_score, s.total
        );
    }
    out
}

pub fn ladder(round: u32, entries: &[LadderEntry], from_cache: bool) -> String {
    let source = if from_cache { " (cached)" } else { "" };
    let mut out = format!("Ladder after round {round}{source}\n");
    let _ = writeln!(
        out,
        "  {:>3}  {:<16} {:>2} {:>2} {:>2} {:>2} {:>6} {:>6} {:>8} {:>4}",
        "#", "Manager", "P", "W", "L", "D", "For", "Agst", "%", "Pts"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "  {:>3}  {:<16} {:>2} {:>2} {:>2} {:>2} {:>6} {:>6} {:>8.2} {:>4}",
            e.position,
            e.manager_id,
            e.played,
            e.wins,
            e.losses,
            e.draws,
            e.points_for,
            e.points_against,
            e.percentage,
            e.ladder_points
        );
    }
    out
}

pub fn finals(bracket: &FinalsBracket) -> String {
    let mut out = String::from("Finals\n");
    for m in &bracket.matches {
        let score = match (m.home_score, m.away_score) {
            (Some(h), Some(a)) => format!("  {h}-{a}"),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "  Round {} {:<12} {} v {}{score}",
            m.round,
            m.kind.label(),
            m.home.label(),
            m.away.label(),
        );
    }
    if let Some(premier) = bracket.premier() {
        let _ = writeln!(out, "  Premier: {premier}");
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================
