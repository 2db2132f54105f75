// Ladder aggregation: standings table, finals bracket, and the cache seam.

pub mod cache;
pub mod finals;
pub mod table;

pub use cache::{cached_ladder, CachedLadder, LadderCache, LadderLookup, MemoryLadderCache};
pub use finals::{resolve_finals_bracket, BracketSlot, FinalsBracket, FinalsMatch, FinalsMatchKind};
pub use table::{
    compute_ladder, percentage, round_complete, Fixture, FixtureSchedule, LadderEntry,
    RoundResults,
};
