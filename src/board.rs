// Square mapping: index = row * 8 + col, row 0 = rank 8, col 0 = file a.
// a8 = 0, h8 = 7, a1 = 56, h1 = 63. Every module uses this mapping.

use crate::error::{ChessError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step for this colour (white moves towards row 0).
    pub fn forward(self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which this colour's pawns start.
    pub fn pawn_start_row(self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row on which this colour's pawns promote.
    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Back rank holding this colour's king and rooks at the start.
    pub fn home_row(self) -> usize {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices, in the order the generator emits them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Case-insensitive piece letter as used by FEN and UCI.
    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase letter for this kind.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

/// Contents of an occupied square. Empty squares are `None` on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        let ch = self.kind.to_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Piece> {
        let kind = PieceKind::from_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

// Square helpers ---------------------------------------------------------

pub const fn square(row: usize, col: usize) -> usize {
    row * 8 + col
}

pub const fn row_of(sq: usize) -> usize {
    sq / 8
}

pub const fn col_of(sq: usize) -> usize {
    sq % 8
}

/// Square reached from `sq` by a (row, col) delta, if it stays on the board.
pub fn offset(sq: usize, d_row: isize, d_col: isize) -> Option<usize> {
    let row = row_of(sq) as isize + d_row;
    let col = col_of(sq) as isize + d_col;
    if (0..8).contains(&row) && (0..8).contains(&col) {
        Some(square(row as usize, col as usize))
    } else {
        None
    }
}

pub const A8: usize = 0;
pub const C8: usize = 2;
pub const E8: usize = 4;
pub const G8: usize = 6;
pub const H8: usize = 7;
pub const A1: usize = 56;
pub const C1: usize = 58;
pub const E1: usize = 60;
pub const G1: usize = 62;
pub const H1: usize = 63;

/// Convert a square index to UCI notation (0 -> "a8", 63 -> "h1")
pub fn square_to_uci(sq: usize) -> String {
    let file = (b'a' + col_of(sq) as u8) as char;
    let rank = (b'8' - row_of(sq) as u8) as char;
    format!("{}{}", file, rank)
}

/// Convert UCI notation to a square index ("e2" -> 52)
pub fn uci_to_square(text: &str) -> Result<usize> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(text.to_string()));
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(text.to_string()));
    }
    Ok(square((b'8' - rank) as usize, (file - b'a') as usize))
}

// Castling rights --------------------------------------------------------

/// The four independent castling flags. They only ever go from set to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    pub fn king_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_side,
            Color::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen_side,
            Color::Black => self.black_queen_side,
        }
    }

    pub fn any(&self, color: Color) -> bool {
        self.king_side(color) || self.queen_side(color)
    }

    pub fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Color::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }

    /// Clear the flag tied to a rook home square, if `sq` is one.
    pub fn clear_rook_square(&mut self, sq: usize) {
        match sq {
            H1 => self.white_king_side = false,
            A1 => self.white_queen_side = false,
            H8 => self.black_king_side = false,
            A8 => self.black_queen_side = false,
            _ => {}
        }
    }

    fn to_fen(self) -> String {
        let mut s = String::new();
        if self.white_king_side {
            s.push('K');
        }
        if self.white_queen_side {
            s.push('Q');
        }
        if self.black_king_side {
            s.push('k');
        }
        if self.black_queen_side {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

// Moves ------------------------------------------------------------------

/// A move as produced by the generator and consumed by the validator.
///
/// `castling` marks a king's two-square hop that relocates a rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub promotion: Option<PieceKind>,
    pub castling: bool,
}

impl Move {
    pub const fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            promotion: None,
            castling: false,
        }
    }

    pub const fn promote(from: usize, to: usize, kind: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(kind),
            castling: false,
        }
    }

    pub const fn castle(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            promotion: None,
            castling: true,
        }
    }

    /// UCI text, e.g. "e2e4" or "e7e8q". Castling is the king's own hop.
    pub fn to_uci(&self) -> String {
        let mut uci = format!("{}{}", square_to_uci(self.from), square_to_uci(self.to));
        if let Some(kind) = self.promotion {
            uci.push(kind.to_char());
        }
        uci
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// UCI text for an optional move; "0000" when there is none.
pub fn move_to_uci(mv: Option<Move>) -> String {
    match mv {
        Some(m) => m.to_uci(),
        None => "0000".to_string(),
    }
}

/// Parse UCI move text and resolve it against the legal moves of `board`.
pub fn parse_uci_move(board: &Board, uci: &str) -> Result<Move> {
    if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
        return Err(ChessError::InvalidMove(uci.to_string()));
    }
    let from = uci_to_square(&uci[0..2])?;
    let to = uci_to_square(&uci[2..4])?;
    let promotion = match uci[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_char(ch) {
            Some(kind) if kind.is_promotion_choice() && ch.is_ascii_lowercase() => Some(kind),
            _ => return Err(ChessError::InvalidMove(uci.to_string())),
        },
    };

    crate::rules::legal_moves(board)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| ChessError::IllegalMove(uci.to_string()))
}

/// Everything `apply_move` changes, so `undo_move` can put it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    /// The piece that left `mv.from` (a pawn, for promotions)
    pub moved: Piece,
    /// Captured piece and the square it stood on (differs from `mv.to` for en passant)
    pub captured: Option<(usize, Piece)>,
    /// Rook relocation (from, to) performed by a castling move
    pub rook_move: Option<(usize, usize)>,
    pub prev_castling: CastlingRights,
    pub prev_ep: Option<usize>,
    pub prev_side: Color,
    pub prev_halfmove: u16,
    pub prev_fullmove: u16,
}

// Board ------------------------------------------------------------------

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
    pub side: Color,
    pub castling: CastlingRights,
    /// Square a pawn would land on to capture en passant, for one move only
    pub ep: Option<usize>,
    pub halfmove: u16,
    pub fullmove: u16,
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    /// Empty board, white to move, no rights. Populate with `set_piece`.
    pub fn new() -> Self {
        Self {
            squares: [None; 64],
            side: Color::White,
            castling: CastlingRights::NONE,
            ep: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    pub fn startpos() -> Self {
        let mut board = Self::new();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, &kind) in back.iter().enumerate() {
            board.set_piece(square(0, col), Piece::new(kind, Color::Black));
            board.set_piece(square(1, col), Piece::new(PieceKind::Pawn, Color::Black));
            board.set_piece(square(6, col), Piece::new(PieceKind::Pawn, Color::White));
            board.set_piece(square(7, col), Piece::new(kind, Color::White));
        }
        board.castling = CastlingRights::ALL;
        board
    }

    #[inline]
    pub fn piece_on(&self, sq: usize) -> Option<Piece> {
        self.squares[sq]
    }

    #[inline]
    pub fn is_empty(&self, sq: usize) -> bool {
        self.squares[sq].is_none()
    }

    pub fn set_piece(&mut self, sq: usize, piece: Piece) {
        self.squares[sq] = Some(piece);
    }

    pub fn remove_piece(&mut self, sq: usize) -> Option<Piece> {
        self.squares[sq].take()
    }

    /// Occupied squares in board-scan order (a8, b8, ..., h1).
    pub fn pieces(&self) -> impl Iterator<Item = (usize, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(sq, p)| p.map(|piece| (sq, piece)))
    }

    /// Occupied squares of one colour in board-scan order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (usize, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.kind == kind).count()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let bad = |what: &str| ChessError::InvalidFen(format!("{what} in '{}'", fen.trim()));

        let mut parts = fen.split_whitespace();
        let piece_part = parts.next().ok_or_else(|| bad("missing pieces"))?;
        let side_part = parts.next().ok_or_else(|| bad("missing side to move"))?;
        let castle_part = parts.next().unwrap_or("-");
        let ep_part = parts.next().unwrap_or("-");
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let mut board = Self::new();

        let ranks: Vec<&str> = piece_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(bad("expected 8 ranks"));
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for ch in rank.chars() {
                if let Some(run) = ch.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(bad("bad empty-square count"));
                    }
                    col += run as usize;
                } else {
                    let piece = Piece::from_fen_char(ch).ok_or_else(|| bad("invalid piece char"))?;
                    if col >= 8 {
                        return Err(bad("rank overflows 8 files"));
                    }
                    if piece.kind == PieceKind::Pawn && (row == 0 || row == 7) {
                        return Err(bad("pawn on a back rank"));
                    }
                    board.set_piece(square(row, col), piece);
                    col += 1;
                }
                if col > 8 {
                    return Err(bad("rank overflows 8 files"));
                }
            }
            if col != 8 {
                return Err(bad("rank does not cover 8 files"));
            }
        }

        for color in [Color::White, Color::Black] {
            if board.count(PieceKind::King, color) != 1 {
                return Err(bad("each side needs exactly one king"));
            }
        }

        board.side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(bad("invalid side to move")),
        };

        board.castling = CastlingRights::NONE;
        if castle_part != "-" {
            for ch in castle_part.chars() {
                match ch {
                    'K' => board.castling.white_king_side = true,
                    'Q' => board.castling.white_queen_side = true,
                    'k' => board.castling.black_king_side = true,
                    'q' => board.castling.black_queen_side = true,
                    _ => return Err(bad("invalid castling char")),
                }
            }
        }

        board.ep = match ep_part {
            "-" => None,
            s => {
                let sq = uci_to_square(s).map_err(|_| bad("invalid en-passant square"))?;
                // rank 6 or rank 3
                if row_of(sq) != 2 && row_of(sq) != 5 {
                    return Err(bad("en-passant square must be on rank 3 or 6"));
                }
                Some(sq)
            }
        };

        board.halfmove = halfmove_part.parse().map_err(|_| bad("invalid halfmove clock"))?;
        board.fullmove = fullmove_part.parse().map_err(|_| bad("invalid fullmove number"))?;

        // the king of the side that just moved cannot be left en prise
        if crate::rules::is_in_check(&board, board.side.opposite()) {
            return Err(bad("side not to move is in check"));
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.piece_on(square(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row < 7 {
                placement.push('/');
            }
        }
        let side = match self.side {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self.ep.map(square_to_uci).unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            placement,
            side,
            self.castling.to_fen(),
            ep,
            self.halfmove,
            self.fullmove
        )
    }
}

// Diagram with file letters and rank numbers, white at the bottom
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   a b c d e f g h")?;
        writeln!(f)?;
        for row in 0..8 {
            write!(f, "{}  ", 8 - row)?;
            for col in 0..8 {
                match self.piece_on(square(row, col)) {
                    Some(piece) => write!(f, "{} ", piece.to_fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, " {}", 8 - row)?;
        }
        writeln!(f)?;
        writeln!(f, "   a b c d e f g h")
    }
}
