//! Search parameters and configuration
//!
//! Controls depth and time limits for the search and the clock-derived
//! budget handed to it by the UCI loop.

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Deepest iteration of iterative deepening, in plies
    pub max_depth: u8,

    /// Default wall-clock budget per move in milliseconds
    pub time_limit_ms: u64,

    /// Score positions without legal moves as mate (by distance) or stalemate (0)
    /// instead of falling back to the static evaluation
    pub mate_scoring: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            time_limit_ms: 5000,
            mate_scoring: true,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set time limit in milliseconds
    pub fn time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn mate_scoring(mut self, enable: bool) -> Self {
        self.mate_scoring = enable;
        self
    }
}

/// Clock settings used when `go` carries no usable time fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeManagement {
    /// Moves assumed to remain when `movestogo` is absent
    pub moves_to_go: u64,
    /// Budget used when neither `movetime` nor the side's clock is given
    pub msec_per_move: u64,
    /// Share of the increment (in percent) added to the per-move slice
    pub inc_percent: u64,
    /// Lower bound on a clock-derived slice
    pub min_slice_ms: u64,
}

impl Default for TimeManagement {
    fn default() -> Self {
        Self {
            moves_to_go: 40,
            msec_per_move: 5000,
            inc_percent: 80,
            min_slice_ms: 10,
        }
    }
}

impl TimeManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_msec_per_move(mut self, ms: u64) -> Self {
        self.msec_per_move = ms;
        self
    }
}
