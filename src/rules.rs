//! Move legality, move application and check detection.

use crate::board::{col_of, offset, row_of, square, square_to_uci, Board, Color, Move, Piece, PieceKind, Undo};
use crate::movegen::{self, castling_side, is_ep_capture};

/// Outcome of a position from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate,
    Stalemate,
}

impl Board {
    /// Play `mv` for the piece on its source square and return what is
    /// needed to take it back.
    ///
    /// The move is trusted: callers pass moves from the generator or moves
    /// already accepted by [`is_legal`].
    ///
    /// # Panics
    ///
    /// Panics if `mv.from` is empty.
    pub fn apply_move(&mut self, mv: Move) -> Undo {
        let Some(moved) = self.piece_on(mv.from) else {
            panic!("apply_move: no piece on {} in {}", square_to_uci(mv.from), self.to_fen());
        };
        let color = moved.color;

        let mut undo = Undo {
            mv,
            moved,
            captured: None,
            rook_move: None,
            prev_castling: self.castling,
            prev_ep: self.ep,
            prev_side: self.side,
            prev_halfmove: self.halfmove,
            prev_fullmove: self.fullmove,
        };

        let en_passant = moved.kind == PieceKind::Pawn
            && col_of(mv.from) != col_of(mv.to)
            && self.ep == Some(mv.to)
            && self.is_empty(mv.to);

        undo.captured = if en_passant {
            let victim = square(row_of(mv.from), col_of(mv.to));
            self.remove_piece(victim).map(|p| (victim, p))
        } else {
            self.remove_piece(mv.to).map(|p| (mv.to, p))
        };

        self.remove_piece(mv.from);
        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, color),
            None => moved,
        };
        self.set_piece(mv.to, placed);

        if mv.castling && moved.kind == PieceKind::King {
            if let Some(side) = castling_side(color, mv.from, mv.to) {
                if let Some(rook) = self.remove_piece(side.rook_from) {
                    self.set_piece(side.rook_to, rook);
                    undo.rook_move = Some((side.rook_from, side.rook_to));
                }
            }
        }

        // Rights
        if moved.kind == PieceKind::King {
            self.castling.clear(color);
        }
        self.castling.clear_rook_square(mv.from);
        self.castling.clear_rook_square(mv.to);

        self.ep = None;
        if moved.kind == PieceKind::Pawn && row_of(mv.from).abs_diff(row_of(mv.to)) == 2 {
            self.ep = Some(square((row_of(mv.from) + row_of(mv.to)) / 2, col_of(mv.from)));
        }

        if moved.kind == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove = self.halfmove.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }
        self.side = color.opposite();

        undo
    }

    /// Restore the position exactly as it was before the matching `apply_move`.
    pub fn undo_move(&mut self, undo: Undo) {
        let mv = undo.mv;
        self.remove_piece(mv.to);
        self.set_piece(mv.from, undo.moved);

        if let Some((sq, piece)) = undo.captured {
            self.set_piece(sq, piece);
        }
        if let Some((rook_from, rook_to)) = undo.rook_move {
            if let Some(rook) = self.remove_piece(rook_to) {
                self.set_piece(rook_from, rook);
            }
        }

        self.castling = undo.prev_castling;
        self.ep = undo.prev_ep;
        self.side = undo.prev_side;
        self.halfmove = undo.prev_halfmove;
        self.fullmove = undo.prev_fullmove;
    }
}

/// Square holding `color`'s king, if there is one.
pub fn king_square(board: &Board, color: Color) -> Option<usize> {
    board
        .pieces_of(color)
        .find(|(_, p)| p.kind == PieceKind::King)
        .map(|(sq, _)| sq)
}

/// True when any piece of `by` attacks `sq`.
pub fn is_square_attacked(board: &Board, sq: usize, by: Color) -> bool {
    let mut targets = Vec::with_capacity(32);
    for (from, piece) in board.pieces_of(by) {
        targets.clear();
        movegen::piece_attacks(board, from, piece, &mut targets);
        if targets.contains(&sq) {
            return true;
        }
    }
    false
}

/// True when `color`'s king is attacked.
///
/// # Panics
///
/// A position without a king of `color` is corrupt; this panics with its FEN.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match king_square(board, color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => panic!("no {:?} king on the board: {}", color, board.to_fen()),
    }
}

/// Decide whether `color` may play `mv` here. Never modifies `board`.
pub fn is_legal(board: &Board, mv: Move, color: Color) -> bool {
    if mv.from >= 64 || mv.to >= 64 || mv.from == mv.to {
        return false;
    }
    let Some(piece) = board.piece_on(mv.from) else {
        return false;
    };
    if piece.color != color {
        return false;
    }
    if board.piece_on(mv.to).is_some_and(|p| p.color == color) {
        return false;
    }
    if !follows_movement_rules(board, mv, piece) {
        return false;
    }

    let mut scratch = board.clone();
    scratch.apply_move(mv);
    !is_in_check(&scratch, color)
}

/// Legal moves for the side to move, in generator order.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let color = board.side;
    movegen::generate_all(board, color)
        .into_iter()
        .filter(|&mv| is_legal(board, mv, color))
        .collect()
}

pub fn game_state(board: &Board) -> GameState {
    if !legal_moves(board).is_empty() {
        GameState::Ongoing
    } else if is_in_check(board, board.side) {
        GameState::Checkmate
    } else {
        GameState::Stalemate
    }
}

fn follows_movement_rules(board: &Board, mv: Move, piece: Piece) -> bool {
    if mv.castling && piece.kind != PieceKind::King {
        return false;
    }
    if mv.promotion.is_some() && piece.kind != PieceKind::Pawn {
        return false;
    }

    let d_row = row_of(mv.to) as isize - row_of(mv.from) as isize;
    let d_col = col_of(mv.to) as isize - col_of(mv.from) as isize;

    match piece.kind {
        PieceKind::Pawn => pawn_move_valid(board, mv, piece.color, d_row, d_col),
        PieceKind::Knight => {
            let (r, c) = (d_row.abs(), d_col.abs());
            (r == 1 && c == 2) || (r == 2 && c == 1)
        }
        PieceKind::Bishop => d_row.abs() == d_col.abs() && path_clear(board, mv.from, d_row, d_col),
        PieceKind::Rook => (d_row == 0 || d_col == 0) && path_clear(board, mv.from, d_row, d_col),
        PieceKind::Queen => {
            (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs())
                && path_clear(board, mv.from, d_row, d_col)
        }
        PieceKind::King => {
            if mv.castling {
                castling_valid(board, mv, piece.color)
            } else {
                d_row.abs() <= 1 && d_col.abs() <= 1
            }
        }
    }
}

fn pawn_move_valid(board: &Board, mv: Move, color: Color, d_row: isize, d_col: isize) -> bool {
    let fwd = color.forward();
    let promotes = row_of(mv.to) == color.promotion_row();
    let promotion_ok = match mv.promotion {
        Some(kind) => promotes && kind.is_promotion_choice(),
        None => !promotes,
    };
    if !promotion_ok {
        return false;
    }

    match (d_row, d_col.abs()) {
        (r, 0) if r == fwd => board.is_empty(mv.to),
        (r, 0) if r == 2 * fwd => {
            row_of(mv.from) == color.pawn_start_row()
                && offset(mv.from, fwd, 0).is_some_and(|mid| board.is_empty(mid))
                && board.is_empty(mv.to)
        }
        (r, 1) if r == fwd => match board.piece_on(mv.to) {
            Some(target) => target.color != color,
            None => board.ep == Some(mv.to) && is_ep_capture(board, mv.from, mv.to, color),
        },
        _ => false,
    }
}

/// Every square strictly between `from` and `from + (d_row, d_col)` is empty.
fn path_clear(board: &Board, from: usize, d_row: isize, d_col: isize) -> bool {
    let steps = d_row.abs().max(d_col.abs());
    let (step_row, step_col) = (d_row.signum(), d_col.signum());
    (1..steps).all(|i| {
        offset(from, step_row * i, step_col * i).is_some_and(|sq| board.is_empty(sq))
    })
}

// The king may not castle out of, through, or into check.
fn castling_valid(board: &Board, mv: Move, color: Color) -> bool {
    let Some(side) = castling_side(color, mv.from, mv.to) else {
        return false;
    };
    let right = if side.king_to > side.king_from {
        board.castling.king_side(color)
    } else {
        board.castling.queen_side(color)
    };
    right
        && movegen::castling_path_open(board, mv.from, color, side)
        && side
            .king_path
            .iter()
            .all(|&sq| !is_square_attacked(board, sq, color.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{uci_to_square, START_FEN};

    fn sq(name: &str) -> usize {
        uci_to_square(name).unwrap()
    }

    #[test]
    fn startpos_has_twenty_legal_moves() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(legal_moves(&board).len(), 20);
        assert_eq!(game_state(&board), GameState::Ongoing);
    }

    #[test]
    fn double_push_sets_ep_and_undo_restores() {
        let mut board = Board::startpos();
        let before = board.clone();
        let undo = board.apply_move(Move::new(sq("e2"), sq("e4")));
        assert_eq!(board.ep, Some(sq("e3")));
        assert_eq!(board.side, Color::Black);
        board.undo_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_through_attack_is_illegal() {
        // black rook on f8 covers f1
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!is_legal(&board, Move::castle(sq("e1"), sq("g1")), Color::White));
        assert!(is_legal(&board, Move::castle(sq("e1"), sq("c1")), Color::White));
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves(&board);
        assert!(!moves.iter().any(|m| m.castling));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(!is_legal(&board, Move::new(sq("e2"), sq("d3")), Color::White));
    }

    #[test]
    fn is_legal_rejects_wrong_colour_and_bad_patterns() {
        let board = Board::startpos();
        assert!(!is_legal(&board, Move::new(sq("e7"), sq("e5")), Color::White));
        assert!(!is_legal(&board, Move::new(sq("g1"), sq("g3")), Color::White));
        assert!(!is_legal(&board, Move::new(sq("a1"), sq("a3")), Color::White));
        assert!(!is_legal(&board, Move::new(sq("e2"), sq("e5")), Color::White));
        assert!(!is_legal(&board, Move::promote(sq("e2"), sq("e3"), PieceKind::Queen), Color::White));
        assert!(is_legal(&board, Move::new(sq("g1"), sq("f3")), Color::White));
    }

    #[test]
    fn promotion_without_piece_is_illegal() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!is_legal(&board, Move::new(sq("a7"), sq("a8")), Color::White));
        assert!(!is_legal(&board, Move::promote(sq("a7"), sq("a8"), PieceKind::King), Color::White));
        assert!(is_legal(&board, Move::promote(sq("a7"), sq("a8"), PieceKind::Rook), Color::White));
    }

    #[test]
    #[should_panic(expected = "no White king")]
    fn missing_king_panics() {
        let mut board = Board::startpos();
        board.remove_piece(sq("e1"));
        is_in_check(&board, Color::White);
    }
}
