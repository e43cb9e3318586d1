//! Search and evaluation for archon.

pub mod book;
pub mod error;
pub mod eval;
pub mod search;
pub mod time;

pub use book::{BookMove, BookPosition, Coord, OpeningBook};
pub use error::BookError;
pub use eval::evaluate;
pub use eval::personality::Personality;
pub use search::control::SearchControl;
pub use search::difficulty::Difficulty;
pub use search::see::see;
pub use search::tt::{DEFAULT_TT_CAPACITY, TtConfig};
pub use search::{MoveSource, Progress, SearchOutcome, Searcher};
pub use time::{ClockState, SearchLimits};
