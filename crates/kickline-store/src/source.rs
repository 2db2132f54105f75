// Engine lookup and cache seams backed by the SQLite store.

use kickline_core::error::SourceError;
use kickline_core::ladder::{CachedLadder, Fixture, LadderCache, RoundResults};
use kickline_core::roster::RoundRosterSnapshot;
use kickline_core::scoring::StatLines;
use kickline_core::season::SeasonSource;
use kickline_core::tips::{SubmittedTip, TipFixture};

use crate::db::Database;

impl SeasonSource for Database {
    fn roster_snapshot(
        &self,
        round: u32,
        manager_id: &str,
    ) -> Result<Option<RoundRosterSnapshot>, SourceError> {
        self.load_roster(round, manager_id).map_err(SourceError::new)
    }

    fn stat_lines(&self, round: u32) -> Result<StatLines, SourceError> {
        self.load_stat_lines(round).map_err(SourceError::new)
    }

    fn fixtures(&self, round: u32) -> Result<Vec<Fixture>, SourceError> {
        self.load_fixtures(round).map_err(SourceError::new)
    }

    fn tip_fixtures(&self, round: u32) -> Result<Vec<TipFixture>, SourceError> {
        self.load_tip_fixtures(round).map_err(SourceError::new)
    }

    fn submitted_tips(
        &self,
        round: u32,
        manager_id: &str,
    ) -> Result<Vec<SubmittedTip>, SourceError> {
        self.load_tips(round, manager_id).map_err(SourceError::new)
    }

    fn round_results(&self, upto_round: u32) -> Result<RoundResults, SourceError> {
        self.load_round_results(upto_round).map_err(SourceError::new)
    }
}

impl LadderCache for Database {
    fn get(&self, round: u32) -> Result<Option<CachedLadder>, SourceError> {
        self.load_cached_ladder(round).map_err(SourceError::new)
    }

    fn put(&self, entry: &CachedLadder) -> Result<(), SourceError> {
        self.store_cached_ladder(entry).map_err(SourceError::new)
    }

    fn invalidate_from(&self, round: u32) -> Result<(), SourceError> {
        self.invalidate_ladders_from(round).map_err(SourceError::new)
    }
}
