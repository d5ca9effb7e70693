//! Search engine: alpha-beta minimax with iterative deepening

pub mod params;
pub mod search;
pub mod stats;

pub use self::params::{SearchParams, TimeManagement};
pub use self::search::{Search, SearchResult, INFINITE, MATE, MATE_THRESHOLD};
pub use self::stats::{IterationInfo, SearchStats};
pub use crate::board::Move;
