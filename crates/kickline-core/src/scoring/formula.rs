// Position scoring formulas.
//
// Each position turns a stat line into a non-negative point total plus a
// human-readable breakdown. All arithmetic is on unsigned integers and
// saturates at `u32::MAX` for out-of-range stat values.

use serde::{Deserialize, Serialize};

use super::position::Position;
use super::stats::{StatLine, StatLines};

/// Disposals counted at face value for a midfielder.
pub const MIDFIELD_DISPOSAL_THRESHOLD: u32 = 30;

/// Combined hitouts + marks counted at face value for a ruck.
pub const RUCK_REGULAR_THRESHOLD: u32 = 18;

/// A position's point total for one stat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionScore {
    pub total: u32,
    pub breakdown: Vec<String>,
}

impl PositionScore {
    fn no_stats() -> Self {
        PositionScore {
            total: 0,
            breakdown: vec!["no stats".to_string()],
        }
    }
}

/// Score a stat line in the given position. An absent line scores 0.
pub fn score(position: Position, stats: Option<&StatLine>) -> PositionScore {
    let Some(s) = stats else {
        return PositionScore::no_stats();
    };

    match position {
        Position::FullForward => {
            let goals = s.goals.saturating_mul(9);
            PositionScore {
                total: goals.saturating_add(s.behinds),
                breakdown: vec![
                    format!("{} goals x 9 = {}", s.goals, goals),
                    format!("{} behinds = {}", s.behinds, s.behinds),
                ],
            }
        }
        Position::Midfielder => {
            let d = s.disposals();
            let regular = d.min(MIDFIELD_DISPOSAL_THRESHOLD);
            let extra = d.saturating_sub(MIDFIELD_DISPOSAL_THRESHOLD);
            let extra_points = extra.saturating_mul(3);
            let mut breakdown = vec![format!("{d} disposals")];
            breakdown.push(format!("{regular} regular = {regular}"));
            if extra > 0 {
                breakdown.push(format!("{} over {} x 3 = {}", extra, MIDFIELD_DISPOSAL_THRESHOLD, extra_points));
            }
            PositionScore {
                total: regular.saturating_add(extra_points),
                breakdown,
            }
        }
        Position::Offensive => {
            let goals = s.goals.saturating_mul(7);
            PositionScore {
                total: goals.saturating_add(s.kicks),
                breakdown: vec![
                    format!("{} goals x 7 = {}", s.goals, goals),
                    format!("{} kicks = {}", s.kicks, s.kicks),
                ],
            }
        }
        Position::TallForward => {
            let goals = s.goals.saturating_mul(6);
            let marks = s.marks.saturating_mul(2);
            PositionScore {
                total: goals.saturating_add(marks),
                breakdown: vec![
                    format!("{} goals x 6 = {}", s.goals, goals),
                    format!("{} marks x 2 = {}", s.marks, marks),
                ],
            }
        }
        Position::Tackler => {
            let tackles = s.tackles.saturating_mul(4);
            PositionScore {
                total: tackles.saturating_add(s.handballs),
                breakdown: vec![
                    format!("{} tackles x 4 = {}", s.tackles, tackles),
                    format!("{} handballs = {}", s.handballs, s.handballs),
                ],
            }
        }
        Position::Ruck => score_ruck(s),
    }
}

/// Ruck: hitouts + marks at face value up to 18; past that, the marks that
/// are not needed to reach 18 score triple.
fn score_ruck(s: &StatLine) -> PositionScore {
    let t = s.hitouts.saturating_add(s.marks);
    if t <= RUCK_REGULAR_THRESHOLD {
        return PositionScore {
            total: t,
            breakdown: vec![
                format!("{} hitouts = {}", s.hitouts, s.hitouts),
                format!("{} marks = {}", s.marks, s.marks),
            ],
        };
    }

    let reg = RUCK_REGULAR_THRESHOLD.saturating_sub(s.hitouts);
    let bonus_marks = s.marks.saturating_sub(reg);
    let bonus = bonus_marks.saturating_mul(3);
    PositionScore {
        total: s.hitouts.saturating_add(reg).saturating_add(bonus),
        breakdown: vec![
            format!("{} hitouts = {}", s.hitouts, s.hitouts),
            format!("{reg} regular marks = {reg}"),
            format!("{} marks x 3 = {}", bonus_marks, bonus),
        ],
    }
}

/// Score a named player in a position using the round's stat lines.
pub fn score_player(position: Position, stat_lines: &StatLines, player: &str) -> PositionScore {
    score(position, stat_lines.get(player))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
