use thiserror::Error;

use crate::types::{Color, PieceType, Square};

/// Why a move request was turned down. The board is untouched whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square {0} is off the board")]
    OutOfBounds(Square),

    #[error("there is no piece on {0}")]
    NoPiece(Square),

    #[error("the piece on {square} belongs to {color}, who is not to move")]
    WrongTurn { square: Square, color: Color },

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("cannot promote to a {0}")]
    InvalidPromotion(PieceType),

    #[error("moving to {0} promotes, a piece to promote to is required")]
    PromotionRequired(Square),

    #[error("promotion to {0} requested for a move that does not promote")]
    UnexpectedPromotion(PieceType),

    #[error("the game is over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square `{0}`, expected a file a-h followed by a rank 1-8")]
pub struct ParseSquareError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("invalid move `{0}`, expected coordinates like e2e4 or e7e8q")]
    Malformed(String),

    #[error(transparent)]
    Square(#[from] ParseSquareError),

    #[error("unknown promotion piece `{0}`")]
    UnknownPiece(char),
}
