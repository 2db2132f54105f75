// Round roster snapshots and the bench/reserve substitution resolver.

pub mod snapshot;
pub mod substitution;

pub use snapshot::{BenchAssignment, ReserveAssignment, RosterRow, RoundRosterSnapshot};
pub use substitution::{
    resolve_substitutions, team_score, SubstituteSource, SubstitutionKind, SubstitutionOutcome,
};
