//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs, timing and one record per completed
//! iterative-deepening depth.

use crate::board::Move;
use std::time::{Duration, Instant};

/// Outcome of one fully completed depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationInfo {
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
    /// Cumulative node count when the depth finished
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched
    pub nodes: u64,

    /// Root moves examined
    pub root_nodes: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Depths started but abandoned at the deadline
    pub abandoned_depths: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,

    /// Completed depths, shallowest first
    pub iterations: Vec<IterationInfo>,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Milliseconds since `start_timing`
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Update elapsed time and calculate NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_root_node(&mut self) {
        self.root_nodes += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn inc_abandoned(&mut self) {
        self.abandoned_depths += 1;
    }

    pub fn record_iteration(&mut self, depth: u8, score: i32, best_move: Option<Move>) {
        let elapsed_ms = self.elapsed_ms();
        self.iterations.push(IterationInfo {
            depth,
            score,
            best_move,
            nodes: self.nodes,
            elapsed_ms,
        });
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
