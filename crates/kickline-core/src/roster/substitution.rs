// Bench/reserve substitution resolver.
//
// Decides, per main slot, whose score counts for the round. Two passes run
// in a fixed order over the canonical position order:
//
// 1. Upgrade (always): the bench player replaces the occupant of their
//    declared backup slot if they outscore them in that slot.
// 2. Did-not-play backfill (concluded rounds only): a slot whose occupant
//    did not play takes the unused bench player if the bench backs up that
//    slot, otherwise the best unused eligible reserve.
//
// Each substitute fills at most one slot. The resolver is pure: identical
// inputs always give identical outcomes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::snapshot::RoundRosterSnapshot;
use crate::scoring::formula::score_player;
use crate::scoring::stats::player_played;
use crate::scoring::{Position, ReserveSlot, StatLines};

/// Where a substitute came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstituteSource {
    Bench,
    ReserveA,
    ReserveB,
}

impl SubstituteSource {
    pub fn label(&self) -> &'static str {
        match self {
            SubstituteSource::Bench => "Bench",
            SubstituteSource::ReserveA => "ReserveA",
            SubstituteSource::ReserveB => "ReserveB",
        }
    }

    fn from_reserve(slot: ReserveSlot) -> Self {
        match slot {
            ReserveSlot::A => SubstituteSource::ReserveA,
            ReserveSlot::B => SubstituteSource::ReserveB,
        }
    }
}

/// Why a substitution happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionKind {
    /// The bench player outscored the occupant.
    Upgrade,
    /// The occupant did not play (or the slot was not selected).
    DidNotPlay,
}

/// Resolution result for one main slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionOutcome {
    pub position: Position,
    /// The manager's selection for the slot, `None` if not selected.
    pub original_player: Option<String>,
    pub original_score: u32,
    /// Whether the original selection played.
    pub played: bool,
    /// Player whose score counts.
    pub effective_player: Option<String>,
    pub effective_score: u32,
    pub substituted: bool,
    pub source: Option<SubstituteSource>,
    pub kind: Option<SubstitutionKind>,
    /// Scoring breakdown for the effective player.
    pub breakdown: Vec<String>,
}

impl SubstitutionOutcome {
    fn unselected(position: Position) -> Self {
        SubstitutionOutcome {
            position,
            original_player: None,
            original_score: 0,
            played: false,
            effective_player: None,
            effective_score: 0,
            substituted: false,
            source: None,
            kind: None,
            breakdown: vec!["not selected".to_string()],
        }
    }

    fn substitute(
        &mut self,
        player: &str,
        stat_lines: &StatLines,
        source: SubstituteSource,
        kind: SubstitutionKind,
    ) {
        let scored = score_player(self.position, stat_lines, player);
        debug!(
            position = %self.position,
            original = ?self.original_player,
            substitute = player,
            source = source.label(),
            ?kind,
            score = scored.total,
            "substitution applied"
        );
        self.effective_player = Some(player.to_string());
        self.effective_score = scored.total;
        self.breakdown = scored.breakdown;
        self.substituted = true;
        self.source = Some(source);
        self.kind = Some(kind);
    }

    /// Whether the slot ended up with nobody in it.
    pub fn is_unselected(&self) -> bool {
        self.effective_player.is_none()
    }
}

/// A reserve candidate's ranking for one slot: explicit backup beats group
/// membership, then the higher score wins.
#[derive(Debug, Clone, Copy)]
struct ReserveRank {
    slot: ReserveSlot,
    priority: u8,
    score: u32,
}

/// Resolve substitutions for every main slot.
///
/// An absent snapshot resolves to six unselected slots. Always returns one
/// outcome per main position, in canonical order.
pub fn resolve_substitutions(
    snapshot: Option<&RoundRosterSnapshot>,
    stat_lines: &StatLines,
    round_concluded: bool,
) -> Vec<SubstitutionOutcome> {
    let Some(snapshot) = snapshot else {
        return Position::ALL
            .iter()
            .map(|&pos| SubstitutionOutcome::unselected(pos))
            .collect();
    };

    let mut outcomes: Vec<SubstitutionOutcome> = Position::ALL
        .iter()
        .map(|&pos| match snapshot.occupant(pos) {
            Some(player) => {
                let scored = score_player(pos, stat_lines, player);
                SubstitutionOutcome {
                    position: pos,
                    original_player: Some(player.to_string()),
                    original_score: scored.total,
                    played: player_played(stat_lines, player),
                    effective_player: Some(player.to_string()),
                    effective_score: scored.total,
                    substituted: false,
                    source: None,
                    kind: None,
                    breakdown: scored.breakdown,
                }
            }
            None => SubstitutionOutcome::unselected(pos),
        })
        .collect();

    let mut bench_used = false;
    let mut reserves_used = [false; 2];

    // 1. Upgrade pass.
    if let Some(bench) = &snapshot.bench {
        for outcome in outcomes.iter_mut() {
            if bench_used || bench.backup != outcome.position {
                continue;
            }
            let bench_score = score_player(outcome.position, stat_lines, &bench.player).total;
            if bench_score > outcome.original_score {
                outcome.substitute(
                    &bench.player,
                    stat_lines,
                    SubstituteSource::Bench,
                    SubstitutionKind::Upgrade,
                );
                bench_used = true;
            }
        }
    }

    if !round_concluded {
        return outcomes;
    }

    // 2. Did-not-play backfill.
    for outcome in outcomes.iter_mut() {
        if outcome.substituted || outcome.played {
            continue;
        }
        let pos = outcome.position;

        // a. Bench backing up this slot.
        if let Some(bench) = &snapshot.bench {
            if !bench_used && bench.backup == pos {
                outcome.substitute(
                    &bench.player,
                    stat_lines,
                    SubstituteSource::Bench,
                    SubstitutionKind::DidNotPlay,
                );
                bench_used = true;
                continue;
            }
        }

        // b. Best eligible unused reserve.
        let best = ReserveSlot::ALL
            .iter()
            .enumerate()
            .filter(|(idx, _)| !reserves_used[*idx])
            .filter_map(|(_, &slot)| {
                let reserve = snapshot.reserve(slot)?;
                let priority = if reserve.backup == Some(pos) {
                    2
                } else if slot.allows(pos) {
                    1
                } else {
                    return None;
                };
                Some(ReserveRank {
                    slot,
                    priority,
                    score: score_player(pos, stat_lines, &reserve.player).total,
                })
            })
            // Earlier reserve wins an exact tie.
            .fold(None::<ReserveRank>, |best, cand| match best {
                Some(b) if (b.priority, b.score) >= (cand.priority, cand.score) => Some(b),
                _ => Some(cand),
            });

        if let Some(rank) = best {
            if let Some(reserve) = snapshot.reserve(rank.slot) {
                outcome.substitute(
                    &reserve.player,
                    stat_lines,
                    SubstituteSource::from_reserve(rank.slot),
                    SubstitutionKind::DidNotPlay,
                );
                let idx = match rank.slot {
                    ReserveSlot::A => 0,
                    ReserveSlot::B => 1,
                };
                reserves_used[idx] = true;
            }
        }
    }

    outcomes
}

/// Round team score: the sum of effective scores.
pub fn team_score(outcomes: &[SubstitutionOutcome]) -> u32 {
    outcomes
        .iter()
        .fold(0u32, |acc, o| acc.saturating_add(o.effective_score))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::snapshot::{BenchAssignment, ReserveAssignment};
    use crate::scoring::StatLine;

    fn goals(n: u32) -> StatLine {
        StatLine { goals: n, ..Default::default() }
    }

    /// A full roster where every main player kicks one goal.
    fn fixture() -> (RoundRosterSnapshot, StatLines) {
        let mut snap = RoundRosterSnapshot::new(5, "mgr");
        let mut stats = StatLines::new();
        for pos in Position::ALL {
            let name = format!("{} starter", pos.label());
            snap.main.insert(pos, name.clone());
            stats.insert(name, goals(1));
        }
        (snap, stats)
    }

    fn outcome(outcomes: &[SubstitutionOutcome], pos: Position) -> &SubstitutionOutcome {
        outcomes.iter().find(|o| o.position == pos).unwrap()
    }

    #[test]
    fn absent_snapshot_gives_six_unselected_slots() {
        let outcomes = resolve_substitutions(None, &StatLines::new(), true);
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(|o| o.is_unselected() && o.effective_score == 0));
        assert_eq!(outcomes[0].breakdown, vec!["not selected".to_string()]);
    }

    #[test]
    fn no_bench_or_reserves_keeps_originals() {
        let (snap, stats) = fixture();
        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        assert!(outcomes.iter().all(|o| !o.substituted));
        assert_eq!(outcome(&outcomes, Position::FullForward).effective_score, 9);
        // FF 9, MID 0, OFF 7, TF 6, TACK 0, RUCK 0.
        assert_eq!(team_score(&outcomes), 22);
    }

    #[test]
    fn bench_upgrades_when_strictly_better() {
        let (mut snap, mut stats) = fixture();
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::FullForward,
        });
        stats.insert("Bench".into(), goals(2));

        let outcomes = resolve_substitutions(Some(&snap), &stats, false);
        let ff = outcome(&outcomes, Position::FullForward);
        assert!(ff.substituted);
        assert_eq!(ff.effective_player.as_deref(), Some("Bench"));
        assert_eq!(ff.effective_score, 18);
        assert_eq!(ff.source, Some(SubstituteSource::Bench));
        assert_eq!(ff.kind, Some(SubstitutionKind::Upgrade));
        assert_eq!(ff.original_score, 9);
    }

    #[test]
    fn bench_does_not_upgrade_on_equal_score() {
        let (mut snap, mut stats) = fixture();
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::FullForward,
        });
        stats.insert("Bench".into(), goals(1));

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        assert!(!outcome(&outcomes, Position::FullForward).substituted);
    }

    #[test]
    fn did_not_play_waits_for_round_to_conclude() {
        let (mut snap, mut stats) = fixture();
        stats.remove("RUCK starter");
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: None,
        });
        stats.insert("Res A".into(), StatLine { hitouts: 9, ..Default::default() });

        let live = resolve_substitutions(Some(&snap), &stats, false);
        assert!(!outcome(&live, Position::Ruck).substituted);

        let done = resolve_substitutions(Some(&snap), &stats, true);
        let ruck = outcome(&done, Position::Ruck);
        assert!(ruck.substituted);
        assert_eq!(ruck.source, Some(SubstituteSource::ReserveA));
        assert_eq!(ruck.effective_score, 9);
        assert_eq!(ruck.kind, Some(SubstitutionKind::DidNotPlay));
    }

    #[test]
    fn bench_backfills_before_reserves() {
        let (mut snap, mut stats) = fixture();
        stats.remove("TF starter");
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::TallForward,
        });
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: Some(Position::TallForward),
        });
        stats.insert("Bench".into(), StatLine { marks: 1, ..Default::default() });
        stats.insert("Res A".into(), goals(5));

        // Bench (2) already beats the absent starter (0) in the upgrade pass.
        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        let tf = outcome(&outcomes, Position::TallForward);
        assert_eq!(tf.source, Some(SubstituteSource::Bench));
        assert_eq!(tf.kind, Some(SubstitutionKind::Upgrade));
        assert_eq!(tf.effective_score, 2);
    }

    #[test]
    fn bench_with_zero_score_backfills_non_player() {
        let (mut snap, mut stats) = fixture();
        stats.remove("MID starter");
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::Midfielder,
        });

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        let mid = outcome(&outcomes, Position::Midfielder);
        assert_eq!(mid.source, Some(SubstituteSource::Bench));
        assert_eq!(mid.kind, Some(SubstitutionKind::DidNotPlay));
        assert_eq!(mid.effective_score, 0);
    }

    #[test]
    fn direct_backup_outranks_group_membership() {
        let (mut snap, mut stats) = fixture();
        stats.remove("OFF starter");
        // Reserve A declares Offensive directly even though B's group covers it.
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: Some(Position::Offensive),
        });
        snap.reserve_b = Some(ReserveAssignment {
            player: "Res B".into(),
            backup: None,
        });
        stats.insert("Res A".into(), StatLine { kicks: 2, ..Default::default() });
        stats.insert("Res B".into(), goals(3));

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        let off = outcome(&outcomes, Position::Offensive);
        assert_eq!(off.source, Some(SubstituteSource::ReserveA));
        assert_eq!(off.effective_score, 2);
    }

    #[test]
    fn higher_score_wins_within_priority() {
        let (mut snap, mut stats) = fixture();
        stats.remove("TACK starter");
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: Some(Position::Tackler),
        });
        snap.reserve_b = Some(ReserveAssignment {
            player: "Res B".into(),
            backup: Some(Position::Tackler),
        });
        stats.insert("Res A".into(), StatLine { tackles: 2, ..Default::default() });
        stats.insert("Res B".into(), StatLine { tackles: 5, ..Default::default() });

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        let tack = outcome(&outcomes, Position::Tackler);
        assert_eq!(tack.source, Some(SubstituteSource::ReserveB));
        assert_eq!(tack.effective_score, 20);
    }

    #[test]
    fn reserve_group_does_not_cover_other_group() {
        let (mut snap, mut stats) = fixture();
        stats.remove("MID starter");
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: None,
        });
        stats.insert("Res A".into(), StatLine { kicks: 20, ..Default::default() });

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        assert!(!outcome(&outcomes, Position::Midfielder).substituted);
    }

    #[test]
    fn each_reserve_fills_one_slot() {
        let (mut snap, mut stats) = fixture();
        stats.remove("FF starter");
        stats.remove("TF starter");
        stats.remove("RUCK starter");
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: None,
        });
        stats.insert("Res A".into(), goals(2));

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        let used: Vec<_> = outcomes.iter().filter(|o| o.substituted).collect();
        assert_eq!(used.len(), 1);
        // Canonical order reaches FullForward first.
        assert_eq!(used[0].position, Position::FullForward);
        assert_eq!(used[0].effective_score, 18);
    }

    #[test]
    fn unselected_slot_is_backfilled_when_concluded() {
        let (mut snap, mut stats) = fixture();
        snap.main.remove(&Position::Ruck);
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: None,
        });
        stats.insert("Res A".into(), StatLine { hitouts: 4, ..Default::default() });

        let live = resolve_substitutions(Some(&snap), &stats, false);
        assert!(outcome(&live, Position::Ruck).is_unselected());

        let done = resolve_substitutions(Some(&snap), &stats, true);
        assert_eq!(outcome(&done, Position::Ruck).effective_player.as_deref(), Some("Res A"));
    }

    #[test]
    fn used_bench_is_not_reused_for_backfill() {
        let (mut snap, mut stats) = fixture();
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::FullForward,
        });
        stats.insert("Bench".into(), goals(4));
        stats.remove("MID starter");

        let outcomes = resolve_substitutions(Some(&snap), &stats, true);
        assert_eq!(
            outcomes.iter().filter(|o| o.source == Some(SubstituteSource::Bench)).count(),
            1
        );
        assert!(!outcome(&outcomes, Position::Midfielder).substituted);
    }

    #[test]
    fn resolution_is_idempotent() {
        let (mut snap, mut stats) = fixture();
        stats.remove("FF starter");
        stats.remove("OFF starter");
        snap.bench = Some(BenchAssignment {
            player: "Bench".into(),
            backup: Position::Offensive,
        });
        snap.reserve_a = Some(ReserveAssignment {
            player: "Res A".into(),
            backup: None,
        });
        snap.reserve_b = Some(ReserveAssignment {
            player: "Res B".into(),
            backup: Some(Position::FullForward),
        });
        stats.insert("Bench".into(), StatLine { kicks: 4, ..Default::default() });
        stats.insert("Res A".into(), goals(1));
        stats.insert("Res B".into(), goals(2));

        let first = resolve_substitutions(Some(&snap), &stats, true);
        let second = resolve_substitutions(Some(&snap), &stats, true);
        assert_eq!(first, second);
        // Res B's direct FF declaration beats Res A's group membership.
        assert_eq!(outcome(&first, Position::FullForward).source, Some(SubstituteSource::ReserveB));
        assert_eq!(outcome(&first, Position::Offensive).source, Some(SubstituteSource::Bench));
    }
}
