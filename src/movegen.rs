//! Pseudo-legal move generation and attack sets.
//!
//! Nothing here checks whether the mover's king is left in check; that is
//! the job of [`crate::rules`]. Moves come out in board-scan order (a8 to h1)
//! and, within one piece, in a fixed direction order, so callers iterating
//! the list always see the same sequence for the same position.

use crate::board::{
    col_of, offset, row_of, square, Board, Color, Move, Piece, PieceKind, A1, A8, C1, C8, E1,
    E8, G1, G8, H1, H8,
};

pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-1, -2),
    (-2, 1),
    (-1, 2),
    (1, -2),
    (2, -1),
    (1, 2),
    (2, 1),
];

pub const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
pub const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Static description of one castling option.
pub struct CastlingSide {
    pub king_from: usize,
    pub king_to: usize,
    pub rook_from: usize,
    pub rook_to: usize,
    /// Squares that must be empty between king and rook
    pub empty: &'static [usize],
    /// Squares the king stands on, crosses, and lands on
    pub king_path: [usize; 3],
}

const WHITE_KING_SIDE: CastlingSide = CastlingSide {
    king_from: E1,
    king_to: G1,
    rook_from: H1,
    rook_to: G1 - 1,
    empty: &[E1 + 1, G1],
    king_path: [E1, E1 + 1, G1],
};

const WHITE_QUEEN_SIDE: CastlingSide = CastlingSide {
    king_from: E1,
    king_to: C1,
    rook_from: A1,
    rook_to: C1 + 1,
    empty: &[A1 + 1, C1, C1 + 1],
    king_path: [E1, E1 - 1, C1],
};

const BLACK_KING_SIDE: CastlingSide = CastlingSide {
    king_from: E8,
    king_to: G8,
    rook_from: H8,
    rook_to: G8 - 1,
    empty: &[E8 + 1, G8],
    king_path: [E8, E8 + 1, G8],
};

const BLACK_QUEEN_SIDE: CastlingSide = CastlingSide {
    king_from: E8,
    king_to: C8,
    rook_from: A8,
    rook_to: C8 + 1,
    empty: &[A8 + 1, C8, C8 + 1],
    king_path: [E8, E8 - 1, C8],
};

/// Castling description for a king hop from `from` to `to`, if it is one.
pub fn castling_side(color: Color, from: usize, to: usize) -> Option<&'static CastlingSide> {
    let candidates: [&'static CastlingSide; 2] = match color {
        Color::White => [&WHITE_KING_SIDE, &WHITE_QUEEN_SIDE],
        Color::Black => [&BLACK_KING_SIDE, &BLACK_QUEEN_SIDE],
    };
    candidates
        .into_iter()
        .find(|side| side.king_from == from && side.king_to == to)
}

/// All pseudo-legal moves for `color`, castling candidates included.
pub fn generate_all(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (sq, piece) in board.pieces_of(color) {
        generate_piece_moves(board, sq, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal moves of the single piece standing on `from`.
pub fn generate_piece_moves(board: &Board, from: usize, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.color, moves),
        PieceKind::King => {
            piece_targets(board, from, piece, |to| moves.push(Move::new(from, to)));
            generate_castling_moves(board, from, piece.color, moves);
        }
        _ => piece_targets(board, from, piece, |to| moves.push(Move::new(from, to))),
    }
}

/// Every square attacked by `color`. Duplicates are kept.
///
/// Pawns attack only their two forward diagonals, whatever stands there;
/// other pieces attack exactly their non-castling move destinations.
pub fn generate_attacks(board: &Board, color: Color) -> Vec<usize> {
    let mut targets = Vec::with_capacity(64);
    for (sq, piece) in board.pieces_of(color) {
        piece_attacks(board, sq, piece, &mut targets);
    }
    targets
}

/// Squares attacked by the single piece on `from`, appended to `targets`.
pub fn piece_attacks(board: &Board, from: usize, piece: Piece, targets: &mut Vec<usize>) {
    match piece.kind {
        PieceKind::Pawn => {
            let fwd = piece.color.forward();
            for d_col in [-1, 1] {
                if let Some(to) = offset(from, fwd, d_col) {
                    targets.push(to);
                }
            }
        }
        _ => piece_targets(board, from, piece, |to| targets.push(to)),
    }
}

// Destinations of a knight, bishop, rook, queen or king (castling aside):
// empty squares and enemy-occupied squares along its movement pattern.
fn piece_targets(board: &Board, from: usize, piece: Piece, mut visit: impl FnMut(usize)) {
    let color = piece.color;
    match piece.kind {
        PieceKind::Knight => walk_steps(board, from, color, &KNIGHT_OFFSETS, &mut visit),
        PieceKind::King => walk_steps(board, from, color, &KING_OFFSETS, &mut visit),
        PieceKind::Bishop => walk_rays(board, from, color, &BISHOP_DIRS, &mut visit),
        PieceKind::Rook => walk_rays(board, from, color, &ROOK_DIRS, &mut visit),
        PieceKind::Queen => {
            walk_rays(board, from, color, &ROOK_DIRS, &mut visit);
            walk_rays(board, from, color, &BISHOP_DIRS, &mut visit);
        }
        PieceKind::Pawn => {}
    }
}

fn walk_steps(
    board: &Board,
    from: usize,
    color: Color,
    offsets: &[(isize, isize)],
    visit: &mut impl FnMut(usize),
) {
    for &(d_row, d_col) in offsets {
        if let Some(to) = offset(from, d_row, d_col) {
            if board.piece_on(to).map_or(true, |p| p.color != color) {
                visit(to);
            }
        }
    }
}

fn walk_rays(
    board: &Board,
    from: usize,
    color: Color,
    dirs: &[(isize, isize)],
    visit: &mut impl FnMut(usize),
) {
    for &(d_row, d_col) in dirs {
        let mut cur = from;
        while let Some(to) = offset(cur, d_row, d_col) {
            match board.piece_on(to) {
                None => visit(to),
                Some(p) => {
                    if p.color != color {
                        visit(to);
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

/// Number of pseudo-legal moves `color` has. Used as the mobility term.
pub fn count_moves(board: &Board, color: Color) -> usize {
    generate_all(board, color).len()
}

fn generate_pawn_moves(board: &Board, from: usize, color: Color, moves: &mut Vec<Move>) {
    let fwd = color.forward();

    if let Some(one) = offset(from, fwd, 0) {
        if board.is_empty(one) {
            push_pawn_move(from, one, color, moves);

            if row_of(from) == color.pawn_start_row() {
                if let Some(two) = offset(from, 2 * fwd, 0) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(to) = offset(from, fwd, d_col) else {
            continue;
        };
        match board.piece_on(to) {
            Some(target) if target.color != color => push_pawn_move(from, to, color, moves),
            Some(_) => {}
            None => {
                if board.ep == Some(to) && is_ep_capture(board, from, to, color) {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }
}

/// An en-passant capture onto `to` needs the enemy pawn beside `from`.
pub(crate) fn is_ep_capture(board: &Board, from: usize, to: usize, color: Color) -> bool {
    // white pawns capture en passant from rank 5, black from rank 4
    let ep_row = match color {
        Color::White => 3,
        Color::Black => 4,
    };
    if row_of(from) != ep_row {
        return false;
    }
    let victim = square(row_of(from), col_of(to));
    board.piece_on(victim) == Some(Piece::new(PieceKind::Pawn, color.opposite()))
}

fn push_pawn_move(from: usize, to: usize, color: Color, moves: &mut Vec<Move>) {
    if row_of(to) == color.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promote(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

// Castling candidates are gated on the rights flag, the king on its home
// square, the rook on its corner and empty squares between them. Attacked
// squares are checked by the validator.
fn generate_castling_moves(board: &Board, from: usize, color: Color, moves: &mut Vec<Move>) {
    let (king_side, queen_side) = match color {
        Color::White => (&WHITE_KING_SIDE, &WHITE_QUEEN_SIDE),
        Color::Black => (&BLACK_KING_SIDE, &BLACK_QUEEN_SIDE),
    };
    if board.castling.king_side(color) && castling_path_open(board, from, color, king_side) {
        moves.push(Move::castle(from, king_side.king_to));
    }
    if board.castling.queen_side(color) && castling_path_open(board, from, color, queen_side) {
        moves.push(Move::castle(from, queen_side.king_to));
    }
}

pub(crate) fn castling_path_open(
    board: &Board,
    from: usize,
    color: Color,
    side: &CastlingSide,
) -> bool {
    from == side.king_from
        && board.piece_on(side.rook_from) == Some(Piece::new(PieceKind::Rook, color))
        && side.empty.iter().all(|&sq| board.is_empty(sq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{uci_to_square, START_FEN};

    fn sq(name: &str) -> usize {
        uci_to_square(name).unwrap()
    }

    #[test]
    fn startpos_has_twenty_pseudo_moves_each() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(generate_all(&board, Color::White).len(), 20);
        assert_eq!(generate_all(&board, Color::Black).len(), 20);
    }

    #[test]
    fn promotions_come_in_queen_rook_bishop_knight_order() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promos: Vec<_> = generate_all(&board, Color::White)
            .into_iter()
            .filter(|m| m.from == sq("a7"))
            .map(|m| m.promotion)
            .collect();
        assert_eq!(
            promos,
            vec![
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight)
            ]
        );
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let attacks = generate_attacks(&board, Color::White);
        assert!(attacks.contains(&sq("d3")));
        assert!(attacks.contains(&sq("f3")));
        assert!(!attacks.contains(&sq("e3")));
        assert!(!attacks.contains(&sq("e4")));
    }

    #[test]
    fn castling_destination_is_not_an_attack() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_all(&board, Color::White);
        assert!(moves.iter().any(|m| m.castling && m.to == G1));
        assert!(moves.iter().any(|m| m.castling && m.to == C1));
        let mut king_targets = Vec::new();
        piece_attacks(&board, E1, Piece::new(PieceKind::King, Color::White), &mut king_targets);
        assert!(!king_targets.contains(&G1));
        assert!(!king_targets.contains(&C1));
        assert!(king_targets.contains(&(E1 + 1)));
    }

    #[test]
    fn piece_moves_and_attacks_share_targets() {
        let board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        for (from, piece) in board.pieces().filter(|(_, p)| p.kind != PieceKind::Pawn) {
            let mut moves = Vec::new();
            generate_piece_moves(&board, from, piece, &mut moves);
            let destinations: Vec<usize> = moves.iter().filter(|m| !m.castling).map(|m| m.to).collect();

            let mut targets = Vec::new();
            piece_attacks(&board, from, piece, &mut targets);
            assert_eq!(destinations, targets, "{piece:?} on {from}");
        }
    }

    #[test]
    fn castling_needs_rook_and_empty_path() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        let moves = generate_all(&board, Color::White);
        assert!(!moves.iter().any(|m| m.castling));

        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1").unwrap();
        assert!(!generate_all(&board, Color::White).iter().any(|m| m.castling));
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = generate_all(&board, Color::White);
        assert!(moves.contains(&Move::new(sq("e5"), sq("d6"))));
    }
}
