//! Main search engine implementation
//!
//! Minimax with alpha-beta pruning over the legal move tree, driven either
//! at one fixed depth or by iterative deepening against a wall-clock
//! deadline. Scores are white-positive: white maximises, black minimises.
//!
//! The deadline is only looked at between root moves. Once a root move's
//! subtree is entered it is searched to the end; a depth whose root scan is
//! interrupted is thrown away as a whole.

use super::params::SearchParams;
use super::stats::SearchStats;
use crate::board::{Board, Color, Move};
use crate::eval::evaluate;
use crate::rules::{is_in_check, legal_moves};
use std::time::{Duration, Instant};

pub const INFINITE: i32 = 1_000_000;
pub const MATE: i32 = 100_000;
/// Scores at least this far from zero are forced mates
pub const MATE_THRESHOLD: i32 = MATE - 1000;

/// Result of a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest fully completed depth
    pub depth: u8,
}

/// Main search engine
pub struct Search {
    /// Position searched; always restored after each move tried
    board: Board,

    params: SearchParams,

    stats: SearchStats,
}

impl Search {
    pub fn new(board: Board, params: SearchParams) -> Self {
        Self {
            board,
            params,
            stats: SearchStats::new(),
        }
    }

    /// Create search with default parameters
    pub fn with_board(board: Board) -> Self {
        Self::new(board, SearchParams::default())
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// One alpha-beta pass at exactly `depth` plies, no deadline.
    pub fn search_depth(&mut self, depth: u8) -> SearchResult {
        let depth = depth.max(1);
        self.stats.reset();
        self.stats.start_timing();

        let (best_move, score) = match self.search_root(depth, None) {
            Some(found) => found,
            // Without a deadline the root scan always completes
            None => (None, 0),
        };
        self.stats.record_iteration(depth, score, best_move);
        self.stats.update_timing();

        SearchResult {
            best_move,
            score,
            depth,
        }
    }

    /// Iterative deepening up to `max_depth`, bounded by `budget_ms`.
    ///
    /// Depth 1 always completes, so a legal move is returned whenever one
    /// exists, however small the budget.
    pub fn search_timed(&mut self, budget_ms: u64) -> SearchResult {
        self.stats.reset();
        self.stats.start_timing();
        // An unrepresentable deadline means no deadline at all
        let deadline = Instant::now().checked_add(Duration::from_millis(budget_ms));

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
        };

        for depth in 1..=self.params.max_depth.max(1) {
            let limit = if depth == 1 { None } else { deadline };
            if limit.is_some_and(|d| Instant::now() >= d) {
                break;
            }

            match self.search_root(depth, limit) {
                Some((best_move, score)) => {
                    self.stats.record_iteration(depth, score, best_move);
                    result = SearchResult {
                        best_move,
                        score,
                        depth,
                    };
                    // Nothing to choose between, or a forced mate already found
                    if best_move.is_none() || score.abs() >= MATE_THRESHOLD {
                        break;
                    }
                }
                None => {
                    self.stats.inc_abandoned();
                    break;
                }
            }
        }

        self.stats.update_timing();
        result
    }

    /// Best move within `budget_ms`, or `None` if there is no legal move.
    pub fn select_best_move(&mut self, budget_ms: u64) -> Option<Move> {
        self.search_timed(budget_ms).best_move
    }

    /// Root scan at `depth`. Returns `None` if the deadline passed before
    /// every root move was searched.
    fn search_root(&mut self, depth: u8, deadline: Option<Instant>) -> Option<(Option<Move>, i32)> {
        let mut board = self.board.clone();
        let moves = legal_moves(&board);
        if moves.is_empty() {
            return Some((None, self.terminal_score(&board, 0)));
        }

        let maximizing = self.board.side == Color::White;
        let mut best_move = None;
        let mut best_score = if maximizing { -INFINITE } else { INFINITE };
        let mut alpha = -INFINITE;
        let mut beta = INFINITE;

        for mv in moves {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            self.stats.inc_root_node();

            let undo = board.apply_move(mv);
            let score = self.minimax(&mut board, depth - 1, alpha, beta, !maximizing, 1);
            board.undo_move(undo);

            // Strict improvement only: the first of equal moves is kept
            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better || best_move.is_none() {
                best_score = score;
                best_move = Some(mv);
            }
            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
        }

        Some((best_move, best_score))
    }

    /// Alpha-beta minimax. `board` is left exactly as it was passed in.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: u32,
    ) -> i32 {
        self.stats.inc_node();

        if depth == 0 {
            return evaluate(board);
        }

        let moves = legal_moves(board);
        if moves.is_empty() {
            return self.terminal_score(board, ply);
        }

        let mut best = if maximizing { -INFINITE } else { INFINITE };
        for mv in moves {
            let undo = board.apply_move(mv);
            let score = self.minimax(board, depth - 1, alpha, beta, !maximizing, ply + 1);
            board.undo_move(undo);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                self.stats.inc_cutoff();
                break;
            }
        }
        best
    }

    /// Plain minimax without pruning. Same leaves, same terminal scores as
    /// [`Search::minimax`]; only useful as a reference.
    pub fn minimax_plain(&mut self, board: &mut Board, depth: u8, maximizing: bool, ply: u32) -> i32 {
        self.stats.inc_node();

        if depth == 0 {
            return evaluate(board);
        }

        let moves = legal_moves(board);
        if moves.is_empty() {
            return self.terminal_score(board, ply);
        }

        let mut best = if maximizing { -INFINITE } else { INFINITE };
        for mv in moves {
            let undo = board.apply_move(mv);
            let score = self.minimax_plain(board, depth - 1, !maximizing, ply + 1);
            board.undo_move(undo);
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }

    // Score of a node whose side to move has no legal move.
    fn terminal_score(&self, board: &Board, ply: u32) -> i32 {
        if !self.params.mate_scoring {
            return evaluate(board);
        }
        if is_in_check(board, board.side) {
            let mated = MATE - ply as i32;
            match board.side {
                Color::White => -mated,
                Color::Black => mated,
            }
        } else {
            0
        }
    }
}
