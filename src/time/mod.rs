//! Time management helper: turns `go` clock fields into a per-move budget

use crate::search::params::TimeManagement as TM;

pub struct TimeManager;

impl TimeManager {
    /// Compute milliseconds to allocate given TimeManagement and go parameters
    ///
    /// `movetime` wins outright. Otherwise the side's clock is split over
    /// `movestogo` moves (default from `TimeManagement`, at least 2) and part
    /// of the increment is added. With no clock at all the configured
    /// per-move default is used.
    #[allow(clippy::too_many_arguments)]
    pub fn allocate_time(
        time_mgmt: &TM,
        wtime: Option<u64>,
        btime: Option<u64>,
        winc: Option<u64>,
        binc: Option<u64>,
        movetime: Option<u64>,
        movestogo: Option<u64>,
        side_is_white: bool,
    ) -> u64 {
        if let Some(mt) = movetime {
            return mt;
        }

        let moves_to_go = movestogo.unwrap_or(time_mgmt.moves_to_go).max(2);
        let (clock, inc) = if side_is_white {
            (wtime, winc)
        } else {
            (btime, binc)
        };

        match clock {
            Some(left) => {
                let base_time = (left / moves_to_go).max(time_mgmt.min_slice_ms);
                let increment_bonus = inc
                    .map(|i| i.saturating_mul(time_mgmt.inc_percent) / 100)
                    .unwrap_or(0);
                // never plan to spend more than is on the clock
                base_time
                    .saturating_add(increment_bonus)
                    .min(left.max(time_mgmt.min_slice_ms))
            }
            None => time_mgmt.msec_per_move,
        }
    }
}
