// One manager's roster for one round.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scoring::{Position, ReserveSlot, Slot};

/// The bench player and the main position they back up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchAssignment {
    pub player: String,
    pub backup: Position,
}

/// A reserve player. The reserve covers its slot's allowed positions; an
/// explicit `backup` declaration takes precedence over group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveAssignment {
    pub player: String,
    #[serde(default)]
    pub backup: Option<Position>,
}

/// A single labelled assignment as submitted by a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub slot: String,
    pub player: String,
    #[serde(default)]
    pub backup: Option<String>,
}

impl RosterRow {
    pub fn new(slot: &str, player: &str) -> Self {
        RosterRow {
            slot: slot.to_string(),
            player: player.to_string(),
            backup: None,
        }
    }

    pub fn with_backup(slot: &str, player: &str, backup: &str) -> Self {
        RosterRow {
            slot: slot.to_string(),
            player: player.to_string(),
            backup: Some(backup.to_string()),
        }
    }
}

/// A manager's full set of slot assignments for one round.
///
/// Historical snapshots are never modified by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRosterSnapshot {
    pub round: u32,
    pub manager_id: String,
    /// Main-slot occupants. A missing key means the slot was not selected.
    #[serde(default)]
    pub main: BTreeMap<Position, String>,
    #[serde(default)]
    pub bench: Option<BenchAssignment>,
    #[serde(default)]
    pub reserve_a: Option<ReserveAssignment>,
    #[serde(default)]
    pub reserve_b: Option<ReserveAssignment>,
}

impl RoundRosterSnapshot {
    /// An empty roster: every slot unselected.
    pub fn new(round: u32, manager_id: &str) -> Self {
        RoundRosterSnapshot {
            round,
            manager_id: manager_id.to_string(),
            main: BTreeMap::new(),
            bench: None,
            reserve_a: None,
            reserve_b: None,
        }
    }

    /// Build a snapshot from labelled rows, rejecting contract violations.
    ///
    /// Rows with an empty player name leave their slot unselected.
    pub fn from_rows(round: u32, manager_id: &str, rows: &[RosterRow]) -> Result<Self, EngineError> {
        let mut snapshot = RoundRosterSnapshot::new(round, manager_id);
        let mut seen_slots: Vec<Slot> = Vec::new();

        for row in rows {
            let slot: Slot = row.slot.parse()?;
            if seen_slots.contains(&slot) {
                return Err(EngineError::DuplicateSlot(slot.label().to_string()));
            }
            seen_slots.push(slot);

            let player = row.player.trim();
            if player.is_empty() {
                continue;
            }
            let backup = row
                .backup
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::parse::<Position>)
                .transpose()?;

            match slot {
                Slot::Main(pos) => {
                    snapshot.main.insert(pos, player.to_string());
                }
                Slot::Bench => {
                    let backup = backup.ok_or_else(|| EngineError::MissingBackup {
                        slot: slot.label().to_string(),
                    })?;
                    snapshot.bench = Some(BenchAssignment {
                        player: player.to_string(),
                        backup,
                    });
                }
                Slot::Reserve(r) => {
                    *snapshot.reserve_mut(r) = Some(ReserveAssignment {
                        player: player.to_string(),
                        backup,
                    });
                }
            }
        }

        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject a snapshot that names the same player in two slots.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut owners: HashMap<&str, Slot> = HashMap::new();
        for (slot, player) in self.assignments() {
            if let Some(first) = owners.insert(player, slot) {
                return Err(EngineError::DuplicatePlayer {
                    player: player.to_string(),
                    first: first.label().to_string(),
                    second: slot.label().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every occupied slot with its player, main slots first in canonical order.
    pub fn assignments(&self) -> Vec<(Slot, &str)> {
        let mut out: Vec<(Slot, &str)> = Position::ALL
            .iter()
            .filter_map(|pos| self.main.get(pos).map(|p| (Slot::Main(*pos), p.as_str())))
            .collect();
        if let Some(bench) = &self.bench {
            out.push((Slot::Bench, bench.player.as_str()));
        }
        for r in ReserveSlot::ALL {
            if let Some(res) = self.reserve(r) {
                out.push((Slot::Reserve(r), res.player.as_str()));
            }
        }
        out
    }

    pub fn occupant(&self, pos: Position) -> Option<&str> {
        self.main.get(&pos).map(String::as_str)
    }

    pub fn reserve(&self, slot: ReserveSlot) -> Option<&ReserveAssignment> {
        match slot {
            ReserveSlot::A => self.reserve_a.as_ref(),
            ReserveSlot::B => self.reserve_b.as_ref(),
        }
    }

    fn reserve_mut(&mut self, slot: ReserveSlot) -> &mut Option<ReserveAssignment> {
        match slot {
            ReserveSlot::A => &mut self.reserve_a,
            ReserveSlot::B => &mut self.reserve_b,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
