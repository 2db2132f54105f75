// Library root: the fantasy scoring and ladder engine.
//
// Every computation here is a pure function of its explicit inputs. Data
// lookups go through the `season::SeasonSource` trait and are performed by
// the caller; the ladder cache is owned by the caller too.

pub mod error;
pub mod ladder;
pub mod roster;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod season;
pub mod tips;

pub use error::EngineError;
pub use ladder::{compute_ladder, resolve_finals_bracket, FinalsBracket, LadderEntry};
pub use round::{compute_round_score, RoundScore};
pub use rules::LeagueRules;
pub use scoring::{Position, StatLine};
pub use season::{score_round, season_finals, season_ladder, MemorySource, SeasonSource};
