// SQLite persistence layer for season data.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use kickline_core::ladder::{CachedLadder, Fixture, RoundResults};
use kickline_core::roster::RoundRosterSnapshot;
use kickline_core::round::RoundScore;
use kickline_core::scoring::{StatLine, StatLines};
use kickline_core::tips::{Side, SubmittedTip, TipFixture};

/// SQLite-backed store for rosters, stats, schedules, tips, round results
/// and cached ladders.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS rosters (
                round      INTEGER NOT NULL,
                manager_id TEXT NOT NULL,
                document   TEXT NOT NULL,
                PRIMARY KEY (round, manager_id)
            );

            CREATE TABLE IF NOT EXISTS stat_lines (
                round     INTEGER NOT NULL,
                player    TEXT NOT NULL,
                kicks     INTEGER NOT NULL DEFAULT 0,
                handballs INTEGER NOT NULL DEFAULT 0,
                marks     INTEGER NOT NULL DEFAULT 0,
                tackles   INTEGER NOT NULL DEFAULT 0,
                hitouts   INTEGER NOT NULL DEFAULT 0,
                goals     INTEGER NOT NULL DEFAULT 0,
                behinds   INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (round, player)
            );

            CREATE TABLE IF NOT EXISTS fixtures (
                round INTEGER NOT NULL,
                idx   INTEGER NOT NULL,
                home  TEXT NOT NULL,
                away  TEXT NOT NULL,
                PRIMARY KEY (round, idx)
            );

            CREATE TABLE IF NOT EXISTS tip_fixtures (
                round     INTEGER NOT NULL,
                id        TEXT NOT NULL,
                idx       INTEGER NOT NULL,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                state     TEXT NOT NULL,
                PRIMARY KEY (round, id)
            );

            CREATE TABLE IF NOT EXISTS tips (
                round      INTEGER NOT NULL,
                manager_id TEXT NOT NULL,
                fixture_id TEXT NOT NULL,
                side       TEXT NOT NULL,
                dead_cert  INTEGER NOT NULL,
                PRIMARY KEY (round, manager_id, fixture_id)
            );

            CREATE TABLE IF NOT EXISTS round_results (
                round      INTEGER NOT NULL,
                manager_id TEXT NOT NULL,
                total      INTEGER NOT NULL,
                PRIMARY KEY (round, manager_id)
            );

            CREATE TABLE IF NOT EXISTS ladder_cache (
                round       INTEGER PRIMARY KEY,
                entries     TEXT NOT NULL,
                computed_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Rosters
    // ------------------------------------------------------------------

    /// Store a manager's roster for its round, replacing any earlier one.
    /// Cached ladders from that round on are dropped in the same transaction.
    pub fn save_roster(&self, snapshot: &RoundRosterSnapshot) -> Result<()> {
        let document = to_json(snapshot).context("failed to serialize roster")?;
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute(
            "INSERT OR REPLACE INTO rosters (round, manager_id, document) VALUES (?1, ?2, ?3)",
            params![snapshot.round, snapshot.manager_id, document],
        )
        .context("failed to save roster")?;
        invalidate_ladders(&tx, snapshot.round)?;
        tx.commit().context("failed to commit save_roster")?;
        Ok(())
    }

    /// Load a manager's roster. Returns `None` if none was saved.
    pub fn load_roster(&self, round: u32, manager_id: &str) -> Result<Option<RoundRosterSnapshot>> {
        let conn = self.conn();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM rosters WHERE round = ?1 AND manager_id = ?2",
                params![round, manager_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query roster")?;
        document
            .map(|doc| from_json(&doc).context("failed to deserialize roster"))
            .transpose()
    }

    // ------------------------------------------------------------------
    // Stat lines
    // ------------------------------------------------------------------

    /// Insert or replace stat lines for a round in a single transaction.
    pub fn import_stat_lines(&self, round: u32, lines: &StatLines) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;
        for (player, s) in lines {
            tx.execute(
                "INSERT OR REPLACE INTO stat_lines
                    (round, player, kicks, handballs, marks, tackles, hitouts, goals, behinds)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    round,
                    player,
                    s.kicks,
                    s.handballs,
                    s.marks,
                    s.tackles,
                    s.hitouts,
                    s.goals,
                    s.behinds,
                ],
            )
            .context("failed to insert stat line in batch")?;
        }
        tx.commit().context("failed to commit stat line import")?;
        debug!(round, players = lines.len(), "stat lines imported");
        Ok(())
    }

    pub fn load_stat_lines(&self, round: u32) -> Result<StatLines> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player, kicks, handballs, marks, tackles, hitouts, goals, behinds
                 FROM stat_lines WHERE round = ?1",
            )
            .context("failed to prepare load_stat_lines query")?;

        let lines = stmt
            .query_map(params![round], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    StatLine {
                        kicks: row.get(1)?,
                        handballs: row.get(2)?,
                        marks: row.get(3)?,
                        tackles: row.get(4)?,
                        hitouts: row.get(5)?,
                        goals: row.get(6)?,
                        behinds: row.get(7)?,
                    },
                ))
            })
            .context("failed to query stat lines")?
            .collect::<std::result::Result<StatLines, _>>()
            .context("failed to map stat line rows")?;

        Ok(lines)
    }

    // ------------------------------------------------------------------
    // Schedules
    // ------------------------------------------------------------------

    /// Replace the manager fixtures for a round. Schedule order is preserved.
    pub fn set_fixtures(&self, round: u32, fixtures: &[Fixture]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM fixtures WHERE round = ?1", params![round])
            .context("failed to clear fixtures")?;
        for (idx, f) in fixtures.iter().enumerate() {
            tx.execute(
                "INSERT INTO fixtures (round, idx, home, away) VALUES (?1, ?2, ?3, ?4)",
                params![round, idx as i64, f.home, f.away],
            )
            .context("failed to insert fixture")?;
        }
        invalidate_ladders(&tx, round)?;
        tx.commit().context("failed to commit set_fixtures")?;
        Ok(())
    }

    pub fn load_fixtures(&self, round: u32) -> Result<Vec<Fixture>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT home, away FROM fixtures WHERE round = ?1 ORDER BY idx")
            .context("failed to prepare load_fixtures query")?;
        let fixtures = stmt
            .query_map(params![round], |row| {
                let home: String = row.get(0)?;
                let away: String = row.get(1)?;
                Ok(Fixture::new(&home, &away))
            })
            .context("failed to query fixtures")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map fixture rows")?;
        Ok(fixtures)
    }

    /// Insert or update one real-world match. New matches are appended to the
    /// round's order; updating a match's state keeps its position.
    pub fn save_tip_fixture(&self, round: u32, fixture: &TipFixture) -> Result<()> {
        let state = to_json(&fixture.state).context("failed to serialize match state")?;
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute(
            "INSERT INTO tip_fixtures (round, id, idx, home_team, away_team, state)
             VALUES (?1, ?2,
                     (SELECT COALESCE(MAX(idx) + 1, 0) FROM tip_fixtures WHERE round = ?1),
                     ?3, ?4, ?5)
             ON CONFLICT(round, id) DO UPDATE SET
                home_team = excluded.home_team,
                away_team = excluded.away_team,
                state     = excluded.state",
            params![round, fixture.id, fixture.home_team, fixture.away_team, state],
        )
        .context("failed to save tip fixture")?;
        invalidate_ladders(&tx, round)?;
        tx.commit().context("failed to commit save_tip_fixture")?;
        Ok(())
    }

    pub fn load_tip_fixtures(&self, round: u32) -> Result<Vec<TipFixture>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, home_team, away_team, state FROM tip_fixtures
                 WHERE round = ?1 ORDER BY idx",
            )
            .context("failed to prepare load_tip_fixtures query")?;
        let rows = stmt
            .query_map(params![round], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .context("failed to query tip fixtures")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map tip fixture rows")?;

        rows.into_iter()
            .map(|(id, home_team, away_team, state)| {
                let state = from_json(&state)
                    .with_context(|| format!("invalid match state for fixture {id}"))?;
                Ok(TipFixture {
                    id,
                    home_team,
                    away_team,
                    state,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Tips
    // ------------------------------------------------------------------

    /// Store a manager's tip, replacing an earlier tip on the same match.
    /// Cached ladders from that round on are dropped in the same transaction.
    pub fn save_tip(&self, round: u32, manager_id: &str, tip: &SubmittedTip) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute(
            "INSERT OR REPLACE INTO tips (round, manager_id, fixture_id, side, dead_cert)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                round,
                manager_id,
                tip.fixture_id,
                side_label(tip.side),
                tip.dead_cert
            ],
        )
        .context("failed to save tip")?;
        invalidate_ladders(&tx, round)?;
        tx.commit().context("failed to commit save_tip")?;
        Ok(())
    }

    pub fn load_tips(&self, round: u32, manager_id: &str) -> Result<Vec<SubmittedTip>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT fixture_id, side, dead_cert FROM tips
                 WHERE round = ?1 AND manager_id = ?2 ORDER BY fixture_id",
            )
            .context("failed to prepare load_tips query")?;
        let rows = stmt
            .query_map(params![round, manager_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            })
            .context("failed to query tips")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map tip rows")?;

        rows.into_iter()
            .map(|(fixture_id, side, dead_cert)| {
                let side = parse_side(&side)
                    .with_context(|| format!("invalid side `{side}` on tip for {fixture_id}"))?;
                Ok(SubmittedTip {
                    fixture_id,
                    side,
                    dead_cert,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Round results
    // ------------------------------------------------------------------

    /// Record a single manager's round total.
    pub fn record_round_result(&self, round: u32, manager_id: &str, total: i32) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute(
            "INSERT OR REPLACE INTO round_results (round, manager_id, total) VALUES (?1, ?2, ?3)",
            params![round, manager_id, total],
        )
        .context("failed to record round result")?;
        invalidate_ladders(&tx, round)?;
        tx.commit().context("failed to commit record_round_result")?;
        Ok(())
    }

    /// Record every score's total in one transaction.
    pub fn record_round_scores(&self, scores: &[RoundScore]) -> Result<()> {
        let Some(first_round) = scores.iter().map(|s| s.round).min() else {
            return Ok(());
        };
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        for s in scores {
            tx.execute(
                "INSERT OR REPLACE INTO round_results (round, manager_id, total)
                 VALUES (?1, ?2, ?3)",
                params![s.round, s.manager_id, s.total],
            )
            .context("failed to record round result in batch")?;
        }
        invalidate_ladders(&tx, first_round)?;
        tx.commit().context("failed to commit round results")?;
        debug!(round = first_round, managers = scores.len(), "round results recorded");
        Ok(())
    }

    /// Round totals for rounds `1..=upto_round`.
    pub fn load_round_results(&self, upto_round: u32) -> Result<RoundResults> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT round, manager_id, total FROM round_results WHERE round <= ?1")
            .context("failed to prepare load_round_results query")?;
        let rows = stmt
            .query_map(params![upto_round], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i32>(2)?,
                ))
            })
            .context("failed to query round results")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map round result rows")?;

        let mut results = RoundResults::new();
        for (round, manager_id, total) in rows {
            results.entry(round).or_default().insert(manager_id, total);
        }
        Ok(results)
    }

    // ------------------------------------------------------------------
    // Ladder cache
    // ------------------------------------------------------------------

    pub fn load_cached_ladder(&self, round: u32) -> Result<Option<CachedLadder>> {
        let conn = self.conn();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT entries, computed_at FROM ladder_cache WHERE round = ?1",
                params![round],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to query ladder cache")?;

        let Some((entries, computed_at)) = row else {
            return Ok(None);
        };
        let entries = from_json(&entries).context("failed to deserialize cached ladder")?;
        let computed_at = DateTime::parse_from_rfc3339(&computed_at)
            .with_context(|| format!("invalid cache timestamp `{computed_at}`"))?
            .with_timezone(&Utc);
        Ok(Some(CachedLadder {
            round,
            entries,
            computed_at,
        }))
    }

    pub fn store_cached_ladder(&self, ladder: &CachedLadder) -> Result<()> {
        let entries = to_json(&ladder.entries).context("failed to serialize ladder")?;
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO ladder_cache (round, entries, computed_at) VALUES (?1, ?2, ?3)",
            params![ladder.round, entries, ladder.computed_at.to_rfc3339()],
        )
        .context("failed to store cached ladder")?;
        Ok(())
    }

    /// Drop cached ladders for every round `>= round`.
    pub fn invalidate_ladders_from(&self, round: u32) -> Result<()> {
        let conn = self.conn();
        invalidate_ladders(&conn, round)?;
        Ok(())
    }

    /// Number of cached ladders currently stored.
    pub fn cached_ladder_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ladder_cache", [], |row| row.get(0))
            .context("failed to count cached ladders")?;
        Ok(count as usize)
    }
}

fn invalidate_ladders(conn: &Connection, round: u32) -> Result<()> {
    let dropped = conn
        .execute("DELETE FROM ladder_cache WHERE round >= ?1", params![round])
        .context("failed to invalidate cached ladders")?;
    if dropped > 0 {
        debug!(round, dropped, "cached ladders invalidated");
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

fn from_json<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    serde_json::from_str(json)
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Home => "home",
        Side::Away => "away",
    }
}

fn parse_side(label: &str) -> Option<Side> {
    match label {
        "home" => Some(Side::Home),
        "away" => Some(Side::Away),
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
