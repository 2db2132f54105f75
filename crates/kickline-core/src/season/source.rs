// Lookup seam to the external document store.
//
// The engine performs no I/O. Callers implement `SeasonSource` over their
// store and the season functions fetch everything they need through it.

use std::collections::HashMap;

use crate::error::SourceError;
use crate::ladder::{Fixture, FixtureSchedule, RoundResults};
use crate::roster::RoundRosterSnapshot;
use crate::scoring::StatLines;
use crate::tips::{SubmittedTip, TipFixture};

/// Typed read access to rosters, stats, schedules, tips and results.
pub trait SeasonSource {
    fn roster_snapshot(
        &self,
        round: u32,
        manager_id: &str,
    ) -> Result<Option<RoundRosterSnapshot>, SourceError>;

    /// All stat lines for a round in one call.
    fn stat_lines(&self, round: u32) -> Result<StatLines, SourceError>;

    /// Manager fixtures for a round, in schedule order.
    fn fixtures(&self, round: u32) -> Result<Vec<Fixture>, SourceError>;

    /// Real-world matches for a round, with their current state.
    fn tip_fixtures(&self, round: u32) -> Result<Vec<TipFixture>, SourceError>;

    fn submitted_tips(&self, round: u32, manager_id: &str)
        -> Result<Vec<SubmittedTip>, SourceError>;

    /// Recorded round totals for rounds `1..=upto_round`.
    fn round_results(&self, upto_round: u32) -> Result<RoundResults, SourceError>;

    /// Fixture schedule for rounds `1..=upto_round`. Rounds without fixtures
    /// are omitted.
    fn fixture_schedule(&self, upto_round: u32) -> Result<FixtureSchedule, SourceError> {
        let mut schedule = FixtureSchedule::new();
        for round in 1..=upto_round {
            let fixtures = self.fixtures(round)?;
            if !fixtures.is_empty() {
                schedule.insert(round, fixtures);
            }
        }
        Ok(schedule)
    }
}

/// In-memory season data.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub rosters: HashMap<(u32, String), RoundRosterSnapshot>,
    pub stat_lines: HashMap<u32, StatLines>,
    pub schedule: FixtureSchedule,
    pub tip_fixtures: HashMap<u32, Vec<TipFixture>>,
    pub tips: HashMap<(u32, String), Vec<SubmittedTip>>,
    pub results: RoundResults,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(mut self, snapshot: RoundRosterSnapshot) -> Self {
        self.rosters
            .insert((snapshot.round, snapshot.manager_id.clone()), snapshot);
        self
    }

    pub fn with_stat_lines(mut self, round: u32, lines: StatLines) -> Self {
        self.stat_lines.insert(round, lines);
        self
    }

    pub fn with_fixtures(mut self, round: u32, fixtures: Vec<Fixture>) -> Self {
        self.schedule.insert(round, fixtures);
        self
    }

    pub fn with_tip_fixtures(mut self, round: u32, fixtures: Vec<TipFixture>) -> Self {
        self.tip_fixtures.insert(round, fixtures);
        self
    }

    pub fn with_tips(mut self, round: u32, manager_id: &str, tips: Vec<SubmittedTip>) -> Self {
        self.tips.insert((round, manager_id.to_string()), tips);
        self
    }

    pub fn record_result(&mut self, round: u32, manager_id: &str, total: i32) {
        self.results
            .entry(round)
            .or_default()
            .insert(manager_id.to_string(), total);
    }
}

impl SeasonSource for MemorySource {
    fn roster_snapshot(
        &self,
        round: u32,
        manager_id: &str,
    ) -> Result<Option<RoundRosterSnapshot>, SourceError> {
        Ok(self.rosters.get(&(round, manager_id.to_string())).cloned())
    }

    fn stat_lines(&self, round: u32) -> Result<StatLines, SourceError> {
        Ok(self.stat_lines.get(&round).cloned().unwrap_or_default())
    }

    fn fixtures(&self, round: u32) -> Result<Vec<Fixture>, SourceError> {
        Ok(self.schedule.get(&round).cloned().unwrap_or_default())
    }

    fn tip_fixtures(&self, round: u32) -> Result<Vec<TipFixture>, SourceError> {
        Ok(self.tip_fixtures.get(&round).cloned().unwrap_or_default())
    }

    fn submitted_tips(
        &self,
        round: u32,
        manager_id: &str,
    ) -> Result<Vec<SubmittedTip>, SourceError> {
        Ok(self
            .tips
            .get(&(round, manager_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn round_results(&self, upto_round: u32) -> Result<RoundResults, SourceError> {
        Ok(self
            .results
            .range(..=upto_round)
            .map(|(round, scores)| (*round, scores.clone()))
            .collect())
    }
}
