//! Static evaluation.
//!
//! The score is always from white's point of view: positive favours white,
//! negative favours black. It is the sum of four terms: material,
//! piece-square bonuses, mobility and king safety.

use crate::board::{col_of, offset, row_of, square, Board, Color, PieceKind};
use crate::movegen;
use crate::rules::king_square;

// ============================================================================
// MATERIAL VALUES (centipawns)
// ============================================================================
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20000;

pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

// ============================================================================
// PIECE-SQUARE TABLES (white's point of view)
// ============================================================================
// Laid out like the board: first row is rank 8, first column is file a.
// Black reads the same tables with the rows mirrored.

#[rustfmt::skip]
const PAWN_PSQT: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PSQT: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PSQT: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PSQT: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PSQT: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

/// King table while there is still material to attack it.
#[rustfmt::skip]
const KING_MIDDLEGAME_PSQT: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

/// King table once the board has thinned out: centralise.
#[rustfmt::skip]
const KING_ENDGAME_PSQT: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

// ============================================================================
// KING SAFETY
// ============================================================================
const SHIELD_PAWN_BONUS: i32 = 20;
const OPEN_FILE_PENALTY: i32 = 30;

/// Piece-square bonus for a piece of `color` standing on `sq`.
pub fn psqt_value(kind: PieceKind, color: Color, sq: usize, endgame: bool) -> i32 {
    let idx = match color {
        Color::White => sq,
        Color::Black => square(7 - row_of(sq), col_of(sq)),
    };
    let table = match kind {
        PieceKind::Pawn => &PAWN_PSQT,
        PieceKind::Knight => &KNIGHT_PSQT,
        PieceKind::Bishop => &BISHOP_PSQT,
        PieceKind::Rook => &ROOK_PSQT,
        PieceKind::Queen => &QUEEN_PSQT,
        PieceKind::King if endgame => &KING_ENDGAME_PSQT,
        PieceKind::King => &KING_MIDDLEGAME_PSQT,
    };
    table[idx]
}

/// Endgame: no queens and at most two minor pieces, or queens but no rooks
/// and at most two minor pieces. Counts cover both colours.
pub fn is_endgame(board: &Board) -> bool {
    let (mut queens, mut rooks, mut minors) = (0, 0, 0);
    for (_, piece) in board.pieces() {
        match piece.kind {
            PieceKind::Queen => queens += 1,
            PieceKind::Rook => rooks += 1,
            PieceKind::Knight | PieceKind::Bishop => minors += 1,
            _ => {}
        }
    }
    if queens == 0 {
        minors <= 2
    } else {
        rooks == 0 && minors <= 2
    }
}

fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

pub fn material(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, p)| sign(p.color) * piece_value(p.kind))
        .sum()
}

pub fn piece_square_score(board: &Board) -> i32 {
    let endgame = is_endgame(board);
    board
        .pieces()
        .map(|(sq, p)| sign(p.color) * psqt_value(p.kind, p.color, sq, endgame))
        .sum()
}

/// Pseudo-legal move count of white minus that of black.
pub fn mobility(board: &Board) -> i32 {
    movegen::count_moves(board, Color::White) as i32 - movegen::count_moves(board, Color::Black) as i32
}

/// Safety of `color`'s king, positive is good for `color`.
///
/// Returns 0 when `color` has no king.
pub fn king_safety(board: &Board, color: Color) -> i32 {
    let Some(king) = king_square(board, color) else {
        return 0;
    };
    pawn_shield(board, king, color) + open_file(board, king) + enemy_proximity(board, king, color)
}

// Own pawns on the three squares directly in front of the king.
fn pawn_shield(board: &Board, king: usize, color: Color) -> i32 {
    let mut score = 0;
    for d_col in -1..=1 {
        if let Some(sq) = offset(king, color.forward(), d_col) {
            if board
                .piece_on(sq)
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.color == color)
            {
                score += SHIELD_PAWN_BONUS;
            }
        }
    }
    score
}

fn open_file(board: &Board, king: usize) -> i32 {
    let col = col_of(king);
    let blocked = (0..8).any(|row| {
        board
            .piece_on(square(row, col))
            .is_some_and(|p| p.kind != PieceKind::King)
    });
    if blocked {
        0
    } else {
        -OPEN_FILE_PENALTY
    }
}

// Every enemy piece in the 5x5 box around the king costs a tenth of its value.
fn enemy_proximity(board: &Board, king: usize, color: Color) -> i32 {
    let enemy = color.opposite();
    let mut score = 0;
    for d_row in -2..=2 {
        for d_col in -2..=2 {
            if let Some(sq) = offset(king, d_row, d_col) {
                if let Some(p) = board.piece_on(sq) {
                    if p.color == enemy {
                        score -= piece_value(p.kind) / 10;
                    }
                }
            }
        }
    }
    score
}

/// Full evaluation, white-positive.
pub fn evaluate(board: &Board) -> i32 {
    material(board)
        + piece_square_score(board)
        + mobility(board)
        + king_safety(board, Color::White)
        - king_safety(board, Color::Black)
}
