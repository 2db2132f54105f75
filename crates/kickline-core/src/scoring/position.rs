// Roster positions and slots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// The six main scoring positions of a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "FF")]
    FullForward,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "OFF")]
    Offensive,
    #[serde(rename = "TF")]
    TallForward,
    #[serde(rename = "TACK")]
    Tackler,
    #[serde(rename = "RUCK")]
    Ruck,
}

impl Position {
    /// Canonical resolution order for substitutions and display.
    pub const ALL: [Position; 6] = [
        Position::FullForward,
        Position::Midfielder,
        Position::Offensive,
        Position::TallForward,
        Position::Tackler,
        Position::Ruck,
    ];

    /// Parse a position label.
    ///
    /// Accepts the short labels (`FF`, `MID`, `OFF`, `TF`, `TACK`, `RUCK`)
    /// and the long names (`Full Forward`, `TallForward`, ...), case-insensitive.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "FF" | "FULLFORWARD" => Some(Position::FullForward),
            "MID" | "MIDFIELDER" => Some(Position::Midfielder),
            "OFF" | "OFFENSIVE" => Some(Position::Offensive),
            "TF" | "TALLFORWARD" => Some(Position::TallForward),
            "TACK" | "TACKLER" => Some(Position::Tackler),
            "RUCK" => Some(Position::Ruck),
            _ => None,
        }
    }

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::FullForward => "FF",
            Position::Midfielder => "MID",
            Position::Offensive => "OFF",
            Position::TallForward => "TF",
            Position::Tackler => "TACK",
            Position::Ruck => "RUCK",
        }
    }

    /// Long human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Position::FullForward => "Full Forward",
            Position::Midfielder => "Midfielder",
            Position::Offensive => "Offensive",
            Position::TallForward => "Tall Forward",
            Position::Tackler => "Tackler",
            Position::Ruck => "Ruck",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_str_pos(s).ok_or_else(|| EngineError::UnknownPosition(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Reserve slots
// ---------------------------------------------------------------------------

/// The two reserve slots. Each covers a fixed group of main positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReserveSlot {
    #[serde(rename = "RES_A")]
    A,
    #[serde(rename = "RES_B")]
    B,
}

impl ReserveSlot {
    pub const ALL: [ReserveSlot; 2] = [ReserveSlot::A, ReserveSlot::B];

    /// Main positions this reserve may cover by group membership.
    pub fn allowed_positions(&self) -> &'static [Position] {
        match self {
            ReserveSlot::A => &[
                Position::FullForward,
                Position::TallForward,
                Position::Ruck,
            ],
            ReserveSlot::B => &[
                Position::Offensive,
                Position::Midfielder,
                Position::Tackler,
            ],
        }
    }

    pub fn allows(&self, pos: Position) -> bool {
        self.allowed_positions().contains(&pos)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReserveSlot::A => "RES_A",
            ReserveSlot::B => "RES_B",
        }
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Any roster slot: a main position, the bench, or a reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Main(Position),
    Bench,
    Reserve(ReserveSlot),
}

impl Slot {
    /// Parse a slot label: any position label, `BENCH`/`BE`, `RES_A`/`RESERVE_A`,
    /// `RES_B`/`RESERVE_B`.
    pub fn from_str_slot(s: &str) -> Option<Self> {
        if let Some(pos) = Position::from_str_pos(s) {
            return Some(Slot::Main(pos));
        }
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "BENCH" | "BE" => Some(Slot::Bench),
            "RESA" | "RESERVEA" => Some(Slot::Reserve(ReserveSlot::A)),
            "RESB" | "RESERVEB" => Some(Slot::Reserve(ReserveSlot::B)),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Main(pos) => pos.label(),
            Slot::Bench => "BENCH",
            Slot::Reserve(r) => r.label(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Slot {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::from_str_slot(s).ok_or_else(|| EngineError::UnknownSlot(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
