// Position-based point computation from raw per-player match statistics.

pub mod formula;
pub mod position;
pub mod stats;

pub use formula::{score, PositionScore};
pub use position::{Position, ReserveSlot, Slot};
pub use stats::{StatLine, StatLines};
