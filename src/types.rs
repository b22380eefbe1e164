use std::fmt;
use std::str::FromStr;

use itertools::iproduct;

use crate::error::{ParseMoveError, ParseSquareError};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn from_case(c: char) -> Option<Color> {
        if c.is_uppercase() {
            Some(Color::White)
        } else if c.is_lowercase() {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Rank the pieces of this color start on
    pub fn back_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Starting rank for pawns of given color
    pub fn pawn_starting_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Direction of pawn movement, in ranks
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The rank on which a pawn of this color promotes
    pub fn promotion_rank(&self) -> u8 {
        self.other_color().back_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn can_promote_to(&self) -> bool {
        PIECES_CAN_PROMOTE_TO.contains(self)
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A square on the board. Both coordinates start at 0: rank 0 is white's back rank
/// and file 0 is the a-file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub const fn new(rank: u8, file: u8) -> Square {
        Square { rank, file }
    }

    /// Square at signed coordinates, if those land on the board
    pub fn try_new(rank: i8, file: i8) -> Option<Square> {
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::new(rank as u8, file as u8))
        } else {
            None
        }
    }

    pub fn offset(&self, rank_delta: i8, file_delta: i8) -> Option<Square> {
        Square::try_new(self.rank as i8 + rank_delta, self.file as i8 + file_delta)
    }

    pub fn is_on_board(&self) -> bool {
        self.rank < 8 && self.file < 8
    }

    /// All 64 squares, a1, b1, ... h8
    pub fn all() -> impl Iterator<Item = Square> {
        iproduct!(0..8u8, 0..8u8).map(|(rank, file)| Square { rank, file })
    }

    pub(crate) fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn from_algebraic(s: &str) -> Result<Square, ParseSquareError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseSquareError(s.to_string()));
        }
        match (bytes[0], bytes[1]) {
            (file @ b'a'..=b'h', rank @ b'1'..=b'8') => Ok(Square::new(rank - b'1', file - b'a')),
            _ => Err(ParseSquareError(s.to_string())),
        }
    }

    pub fn to_algebraic(&self) -> String {
        if !self.is_on_board() {
            return format!("({}, {})", self.rank, self.file);
        }
        format!("{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    pub position: Square,
    /// Where the piece stood before its last move. Equal to `position` until it moves.
    pub previous_position: Square,
    /// Only tracked for rooks and kings, where it gates castling.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, piece_type: PieceType, position: Square) -> Piece {
        Piece {
            color,
            piece_type,
            position,
            previous_position: position,
            has_moved: false,
        }
    }

    /// Build a piece from its letter, uppercase for white
    pub fn from_char(c: char, position: Square) -> Option<Piece> {
        Some(Piece::new(Color::from_case(c)?, PieceType::from_char(c)?, position))
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::Pawn) => "♙",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::King) => "♔",
            (Color::Black, PieceType::Pawn) => "♟︎",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::King) => "♚",
        }
    }

    pub(crate) fn move_to(&mut self, target: Square) {
        self.previous_position = self.position;
        self.position = target;
    }
}

/// A move request: a piece on `from` goes to `to`, promoting if the move
/// lands a pawn on the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Coordinate form, `e2e4` or `e7e8q`
    pub fn to_algebraic(&self) -> String {
        match self.promotion {
            Some(pt) => format!("{}{}{}", self.from, self.to, pt.to_char().to_ascii_lowercase()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseMoveError::Malformed(s.to_string()));
        }
        let from = s[0..2].parse()?;
        let to = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(PieceType::from_char(c).ok_or(ParseMoveError::UnknownPiece(c))?),
            None => None,
        };
        Ok(Move { from, to, promotion })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFlag {
    Regular,
    CastleKingside,
    CastleQueenside,
    /// Pawn promotion. Contains the piece promoted to
    Promotion(PieceType),
    /// Pawn advanced two ranks from its starting rank
    DoublePawnPush,
    EnPassantCapture,
}

impl MoveFlag {
    pub fn is_castle(&self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// What a committed move did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEffects {
    /// The moved piece as it stands after the move (the new piece after a promotion)
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// Captured piece, with the square it was taken on as its position
    pub captured: Option<Piece>,
    pub move_flag: MoveFlag,
    /// Every square whose occupant changed, for redrawing
    pub changed_squares: Vec<Square>,
}

impl MoveEffects {
    pub fn to_human(&self) -> String {
        let color = self.piece.color.to_human();
        if self.move_flag.is_castle() {
            let side = if self.to.file > self.from.file {
                "kingside"
            } else {
                "queenside"
            };
            return format!("{} castles {}", color, side);
        }
        let maybe_capture_str = match self.captured {
            Some(p) => format!(
                " capturing {} {} at {}",
                p.color.to_human(),
                p.piece_type.to_human(),
                p.position
            ),
            None => "".to_string(),
        };
        let (moved_type, maybe_promotion_str) = match self.move_flag {
            MoveFlag::Promotion(promoted_to) => {
                (PieceType::Pawn, format!(" promoting to {}", promoted_to.to_human()))
            }
            MoveFlag::EnPassantCapture => (self.piece.piece_type, " en passant".to_string()),
            _ => (self.piece.piece_type, "".to_string()),
        };
        format!(
            "{} moves {} from {} to {}{}{}",
            color,
            moved_type.to_human(),
            self.from,
            self.to,
            maybe_capture_str,
            maybe_promotion_str,
        )
    }
}
