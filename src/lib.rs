//! Tavola: chess rules, evaluation and alpha-beta search on an
//! array-of-squares board, with a UCI front end.

pub mod board;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod perft;
pub mod rules;
pub mod search;
pub mod time;
pub mod uci;

pub use board::{Board, Color, Move, Piece, PieceKind};
pub use error::{ChessError, Result};
pub use rules::GameState;
