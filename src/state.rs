use crate::types::{Color, MoveEffects, PieceType, Square};

/// Turn and castling/en passant bookkeeping that lives outside the board. The
/// board reads it in every query that depends on it, but never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    /// whose move it is
    pub active_color: Color,
    king_moved: [bool; 2],
    /// Square of the pawn that just advanced two ranks, capturable en passant for one ply
    pub en_passant: Option<Square>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_active_color(Color::White)
    }

    pub fn with_active_color(active_color: Color) -> Self {
        Self {
            active_color,
            king_moved: [false; 2],
            en_passant: None,
        }
    }

    /// Once a king has moved its side can never castle again, even if it walks back.
    pub fn king_moved(&self, color: Color) -> bool {
        self.king_moved[color.index()]
    }

    pub fn mark_king_moved(&mut self, color: Color) {
        self.king_moved[color.index()] = true;
    }

    /// Update the state after `effects` were committed: refresh the en passant marker,
    /// record king moves, and hand the move to the other side.
    pub fn record_move(&mut self, effects: &MoveEffects) {
        let piece = &effects.piece;

        // the marker never outlives a single ply, whatever moved
        self.en_passant = None;
        if piece.piece_type == PieceType::Pawn
            && piece.position.rank.abs_diff(piece.previous_position.rank) == 2
        {
            self.en_passant = Some(piece.position);
        }

        if piece.piece_type == PieceType::King {
            self.mark_king_moved(piece.color);
        }

        self.active_color = self.active_color.other_color();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveFlag, Piece};

    fn effects_for(piece: Piece, from: Square) -> MoveEffects {
        MoveEffects {
            piece,
            from,
            to: piece.position,
            captured: None,
            move_flag: MoveFlag::Regular,
            changed_squares: vec![from, piece.position],
        }
    }

    fn moved(color: Color, piece_type: PieceType, from: Square, to: Square) -> Piece {
        let mut piece = Piece::new(color, piece_type, from);
        piece.move_to(to);
        piece
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let mut state = GameState::new();
        let pawn = moved(Color::White, PieceType::Pawn, Square::new(1, 4), Square::new(3, 4));
        state.record_move(&effects_for(pawn, Square::new(1, 4)));
        assert_eq!(state.en_passant, Some(Square::new(3, 4)));
        assert_eq!(state.active_color, Color::Black);
    }

    #[test]
    fn test_en_passant_cleared_by_any_move() {
        let mut state = GameState::new();
        state.en_passant = Some(Square::new(3, 4));
        let knight = moved(Color::Black, PieceType::Knight, Square::new(7, 1), Square::new(5, 2));
        state.record_move(&effects_for(knight, Square::new(7, 1)));
        assert_eq!(state.en_passant, None);
    }

    #[test]
    fn test_single_push_does_not_set_en_passant() {
        let mut state = GameState::new();
        let pawn = moved(Color::White, PieceType::Pawn, Square::new(1, 4), Square::new(2, 4));
        state.record_move(&effects_for(pawn, Square::new(1, 4)));
        assert_eq!(state.en_passant, None);
    }

    #[test]
    fn test_king_move_is_permanent() {
        let mut state = GameState::new();
        let king = moved(Color::White, PieceType::King, Square::new(0, 4), Square::new(1, 4));
        state.record_move(&effects_for(king, Square::new(0, 4)));
        assert!(state.king_moved(Color::White));
        assert!(!state.king_moved(Color::Black));

        let back = moved(Color::White, PieceType::King, Square::new(1, 4), Square::new(0, 4));
        state.record_move(&effects_for(back, Square::new(1, 4)));
        assert!(state.king_moved(Color::White));
    }
}
