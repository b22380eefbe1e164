pub mod types;
pub mod error;
pub mod state;
pub mod movegen;
pub mod board;
pub mod game;
pub mod perft;

pub use board::Board;
pub use error::{MoveError, ParseMoveError, ParseSquareError};
pub use game::{Game, Status};
pub use state::GameState;
pub use types::{Color, Move, MoveEffects, MoveFlag, Piece, PieceType, Square};
