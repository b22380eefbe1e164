use std::fmt;

use log::{debug, info};

use crate::board::Board;
use crate::error::MoveError;
use crate::state::GameState;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    /// The side to move is in check
    Check(Color),
    /// Contains the winner
    Checkmate(Color),
    Stalemate,
}

impl Status {
    pub fn is_over(&self) -> bool {
        matches!(self, Status::Checkmate(_) | Status::Stalemate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "game in progress"),
            Status::Check(color) => write!(f, "{} is in check", color),
            Status::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            Status::Stalemate => write!(f, "stalemate, the game is drawn"),
        }
    }
}

/// Drives a game: validates moves through the board, commits them, and keeps the
/// turn, castling and en passant state up to date.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    state: GameState,
    history: Vec<MoveEffects>,
    status: Status,
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Board::new(), GameState::new())
    }

    /// Start from an arbitrary position. The board must hold one king per side.
    pub fn from_position(board: Board, state: GameState) -> Self {
        let status = Self::compute_status(&board, &state);
        Self {
            board,
            state,
            history: Vec::new(),
            status,
        }
    }

    fn compute_status(board: &Board, state: &GameState) -> Status {
        let color = state.active_color;
        if board.is_check(color) {
            if board.is_checkmate(color, state) {
                Status::Checkmate(color.other_color())
            } else {
                Status::Check(color)
            }
        } else if board.is_stalemate(color, state) {
            Status::Stalemate
        } else {
            Status::Ongoing
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Committed moves, oldest first
    pub fn history(&self) -> &[MoveEffects] {
        &self.history
    }

    pub fn active_color(&self) -> Color {
        self.state.active_color
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// The piece on `square`, if it belongs to the side to move
    pub fn select(&self, square: Square) -> Option<&Piece> {
        self.board
            .piece_at(square)
            .filter(|p| p.color == self.state.active_color)
    }

    /// Where the piece on `from` can go; empty unless it belongs to the side to move.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        if self.is_over() {
            return vec![];
        }
        match self.select(from) {
            Some(piece) => self.board.legal_targets(piece, &self.state),
            None => vec![],
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return vec![];
        }
        self.board.legal_moves(self.state.active_color, &self.state)
    }

    pub fn play_move(&mut self, mv: Move) -> Result<MoveEffects, MoveError> {
        self.play(mv.from, mv.to, mv.promotion)
    }

    /// Validate and commit a move for the side to move, then hand the turn over.
    ///
    /// On any error nothing changes.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<MoveEffects, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        for square in [from, to] {
            if !square.is_on_board() {
                return Err(MoveError::OutOfBounds(square));
            }
        }
        let piece = *self.board.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        if piece.color != self.state.active_color {
            return Err(MoveError::WrongTurn {
                square: from,
                color: piece.color,
            });
        }
        if !self.board.is_legal_move(&piece, to, &self.state) {
            debug!("rejected {} {} from {} to {}", piece.color, piece.piece_type, from, to);
            return Err(MoveError::IllegalMove { from, to });
        }

        let effects = self.board.apply_move(from, to, promotion, &self.state)?;
        debug!("{}", effects.to_human());

        self.state.record_move(&effects);
        self.status = Self::compute_status(&self.board, &self.state);
        match self.status {
            Status::Ongoing => {}
            Status::Check(_) | Status::Stalemate => info!("{}", self.status),
            Status::Checkmate(_) => info!("{} after {} plies", self.status, self.history.len() + 1),
        }

        self.history.push(effects.clone());
        Ok(effects)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
