//! Error type shared by the board loader, move parser and UCI options.

/// Recoverable errors surfaced to callers of the library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidMove(String),

    #[error("illegal move in this position: {0}")]
    IllegalMove(String),

    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ChessError>;
