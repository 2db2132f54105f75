// Finals bracket for the four top-ranked managers.
//
// Round 22: Q1 (1st v 4th) and Q2 (2nd v 3rd).
// Round 23: Preliminary (Q1 loser v Q2 winner).
// Round 24: Grand Final (Q1 winner v Preliminary winner).
//
// Slots stay symbolic until the match that decides them has both scores.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::table::{Fixture, LadderEntry, RoundResults};
use crate::rules::LeagueRules;

/// Number of managers that qualify for the finals.
pub const FINALS_QUALIFIERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalsMatchKind {
    QualifyingOne,
    QualifyingTwo,
    Preliminary,
    GrandFinal,
}

impl FinalsMatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            FinalsMatchKind::QualifyingOne => "Q1",
            FinalsMatchKind::QualifyingTwo => "Q2",
            FinalsMatchKind::Preliminary => "Preliminary",
            FinalsMatchKind::GrandFinal => "Grand Final",
        }
    }

    /// Rounds after the end of the regular season.
    fn round_offset(&self) -> u32 {
        match self {
            FinalsMatchKind::QualifyingOne | FinalsMatchKind::QualifyingTwo => 1,
            FinalsMatchKind::Preliminary => 2,
            FinalsMatchKind::GrandFinal => 3,
        }
    }
}

/// One side of a finals match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSlot {
    Manager(String),
    /// Not yet determined, e.g. `"Q1 winner"`.
    Pending(String),
}

impl BracketSlot {
    pub fn manager(&self) -> Option<&str> {
        match self {
            BracketSlot::Manager(m) => Some(m.as_str()),
            BracketSlot::Pending(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BracketSlot::Manager(m) => m.as_str(),
            BracketSlot::Pending(label) => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalsMatch {
    pub kind: FinalsMatchKind,
    pub round: u32,
    pub home: BracketSlot,
    pub away: BracketSlot,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub winner: Option<String>,
    pub loser: Option<String>,
}

impl FinalsMatch {
    /// Slot for this match's winner, symbolic until decided.
    fn winner_slot(&self) -> BracketSlot {
        match &self.winner {
            Some(w) => BracketSlot::Manager(w.clone()),
            None => BracketSlot::Pending(format!("{} winner", self.kind.label())),
        }
    }

    fn loser_slot(&self) -> BracketSlot {
        match &self.loser {
            Some(l) => BracketSlot::Manager(l.clone()),
            None => BracketSlot::Pending(format!("{} loser", self.kind.label())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalsBracket {
    /// Q1, Q2, Preliminary, Grand Final, in that order.
    pub matches: Vec<FinalsMatch>,
}

impl FinalsBracket {
    pub fn get(&self, kind: FinalsMatchKind) -> Option<&FinalsMatch> {
        self.matches.iter().find(|m| m.kind == kind)
    }

    /// Matches played in `round`.
    pub fn round(&self, round: u32) -> Vec<&FinalsMatch> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    /// Grand Final winner, once decided.
    pub fn premier(&self) -> Option<&str> {
        self.get(FinalsMatchKind::GrandFinal)?.winner.as_deref()
    }

    /// Manager fixtures for `round` whose participants are both known.
    pub fn fixtures(&self, round: u32) -> Vec<Fixture> {
        self.round(round)
            .into_iter()
            .filter_map(|m| {
                let (home, away) = (m.home.manager()?, m.away.manager()?);
                Some(Fixture {
                    home: home.to_string(),
                    away: away.to_string(),
                    display_name: format!("{}: {home} v {away}", m.kind.label()),
                })
            })
            .collect()
    }
}

/// Resolve the finals bracket from the final regular-season ladder and any
/// finals round totals recorded so far.
///
/// `ladder` must be ranked. With fewer than four entries every seed stays
/// symbolic. A finals match is decided by the higher round total; an exact
/// tie goes to the higher ladder seed.
pub fn resolve_finals_bracket(
    ladder: &[LadderEntry],
    finals_results: &RoundResults,
    rules: &LeagueRules,
) -> FinalsBracket {
    let seeded = ladder.len() >= FINALS_QUALIFIERS;
    let seed = |rank: usize| -> BracketSlot {
        if seeded {
            BracketSlot::Manager(ladder[rank].manager_id.clone())
        } else {
            BracketSlot::Pending(ordinal(rank + 1))
        }
    };
    let seed_rank = |manager: &str| -> usize {
        ladder
            .iter()
            .position(|e| e.manager_id == manager)
            .unwrap_or(usize::MAX)
    };
    let play = |kind: FinalsMatchKind, home: BracketSlot, away: BracketSlot| -> FinalsMatch {
        decide(kind, home, away, finals_results, rules, &seed_rank)
    };

    let q1 = play(FinalsMatchKind::QualifyingOne, seed(0), seed(3));
    let q2 = play(FinalsMatchKind::QualifyingTwo, seed(1), seed(2));
    let prelim = play(FinalsMatchKind::Preliminary, q1.loser_slot(), q2.winner_slot());
    let grand = play(FinalsMatchKind::GrandFinal, q1.winner_slot(), prelim.winner_slot());

    let bracket = FinalsBracket {
        matches: vec![q1, q2, prelim, grand],
    };
    info!(
        seeded,
        decided = bracket.matches.iter().filter(|m| m.winner.is_some()).count(),
        premier = ?bracket.premier(),
        "finals bracket resolved"
    );
    bracket
}

fn decide(
    kind: FinalsMatchKind,
    home: BracketSlot,
    away: BracketSlot,
    finals_results: &RoundResults,
    rules: &LeagueRules,
    seed_rank: &dyn Fn(&str) -> usize,
) -> FinalsMatch {
    let round = rules.regular_season_rounds + kind.round_offset();
    let scores = finals_results.get(&round);
    let score_of = |slot: &BracketSlot| -> Option<i32> {
        let manager = slot.manager()?;
        scores?.get(manager).copied()
    };
    let home_score = score_of(&home);
    let away_score = score_of(&away);

    let (winner, loser) = match (home.manager(), away.manager(), home_score, away_score) {
        (Some(h), Some(a), Some(hs), Some(as_)) => {
            let home_wins = hs > as_ || (hs == as_ && seed_rank(h) < seed_rank(a));
            if home_wins {
                (Some(h.to_string()), Some(a.to_string()))
            } else {
                (Some(a.to_string()), Some(h.to_string()))
            }
        }
        _ => (None, None),
    };

    FinalsMatch {
        kind,
        round,
        home,
        away,
        home_score,
        away_score,
        winner,
        loser,
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
