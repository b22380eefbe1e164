use crate::error::MoveError;
use crate::movegen;
use crate::state::GameState;
use crate::types::*;

const BACK_RANK_ORDER: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The 8x8 grid. Each occupant's `position` always equals the square it is stored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Board set up in the starting position
    pub fn new() -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            for (file, piece_type) in BACK_RANK_ORDER.into_iter().enumerate() {
                let square = Square::new(color.back_rank(), file as u8);
                board.put(Piece::new(color, piece_type, square));
            }
            for file in 0..8 {
                let square = Square::new(color.pawn_starting_rank(), file);
                board.put(Piece::new(color, PieceType::Pawn, square));
            }
        }
        board
    }

    /// A board with no pieces. Callers setting up a position must put exactly one
    /// king of each color on it before asking about check.
    pub fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
        }
    }

    /// Place `piece` on its own `position`, replacing whatever stood there.
    pub fn put(&mut self, piece: Piece) {
        assert!(piece.position.is_on_board(), "cannot put a piece on {:?}", piece.position);
        self.grid[piece.position.rank as usize][piece.position.file as usize] = Some(piece);
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        self.grid[square.rank as usize][square.file as usize].take()
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.grid[square.rank as usize][square.file as usize].as_ref()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.grid.iter().flatten().flatten()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> &Piece {
        self.pieces_of(color)
            .find(|p| p.piece_type == PieceType::King)
            // king should always be on the board
            .unwrap_or_else(|| panic!("no {} king on the board", color.to_human()))
    }

    pub fn is_pattern_legal(&self, piece: &Piece, target: Square, state: &GameState) -> bool {
        movegen::is_pattern_legal(self, piece, target, state)
    }

    pub fn candidate_targets(&self, piece: &Piece, state: &GameState) -> Vec<Square> {
        movegen::candidate_targets(self, piece, state)
    }

    /// Can `piece` legally move to `target`?
    ///
    /// The move must fit the piece's pattern and must not leave its own king
    /// attacked. Castling additionally may not start from, pass through or land on
    /// an attacked square. The move is tried out on a copy, so `self` is never touched.
    pub fn is_legal_move(&self, piece: &Piece, target: Square, state: &GameState) -> bool {
        if !target.is_on_board() || self.piece_at(piece.position) != Some(piece) {
            return false;
        }
        // kings are never captured, the game ends one move earlier
        if self
            .piece_at(target)
            .is_some_and(|p| p.color == piece.color || p.piece_type == PieceType::King)
        {
            return false;
        }
        if !self.is_pattern_legal(piece, target, state) {
            return false;
        }

        let opponent = piece.color.other_color();
        if movegen::castling_rook(self, piece, target, state).is_some() {
            let step = if target.file > piece.position.file { 1 } else { -1 };
            let passes_attacked = piece
                .position
                .offset(0, step)
                .is_some_and(|transit| self.is_square_attacked(transit, opponent));
            if passes_attacked || self.is_square_attacked(piece.position, opponent) {
                return false;
            }
        }

        let mut scratch = self.clone();
        scratch.make_move(piece.position, target, state);
        !scratch.is_check(piece.color)
    }

    /// Squares `piece` can legally move to; what a front-end should highlight.
    pub fn legal_targets(&self, piece: &Piece, state: &GameState) -> Vec<Square> {
        self.candidate_targets(piece, state)
            .into_iter()
            .filter(|target| self.is_legal_move(piece, *target, state))
            .collect()
    }

    /// All legal moves for `color`, with one move per promotion choice.
    pub fn legal_moves(&self, color: Color, state: &GameState) -> Vec<Move> {
        let mut moves = vec![];
        for piece in self.pieces_of(color) {
            for to in self.legal_targets(piece, state) {
                if piece.piece_type == PieceType::Pawn && to.rank == color.promotion_rank() {
                    moves.extend(
                        PIECES_CAN_PROMOTE_TO
                            .iter()
                            .map(|pt| Move::with_promotion(piece.position, to, *pt)),
                    );
                } else {
                    moves.push(Move::new(piece.position, to));
                }
            }
        }
        moves
    }

    fn has_legal_move(&self, color: Color, state: &GameState) -> bool {
        self.pieces_of(color).any(|piece| {
            self.candidate_targets(piece, state)
                .into_iter()
                .any(|target| self.is_legal_move(piece, target, state))
        })
    }

    /// Is `square` attacked by any piece of `by_color`? Only movement geometry is
    /// considered: an attacker pinned to its own king still attacks.
    pub fn is_square_attacked(&self, square: Square, by_color: Color) -> bool {
        self.pieces_of(by_color)
            .any(|p| movegen::attacks(self, p, square))
    }

    pub fn is_check(&self, color: Color) -> bool {
        let king = self.find_king(color);
        self.is_square_attacked(king.position, color.other_color())
    }

    /// In check with no legal move. `state` must describe the position with
    /// `color` to move, since en passant may be the only way out.
    pub fn is_checkmate(&self, color: Color, state: &GameState) -> bool {
        self.is_check(color) && !self.has_legal_move(color, state)
    }

    /// Not in check, but no legal move either.
    pub fn is_stalemate(&self, color: Color, state: &GameState) -> bool {
        !self.is_check(color) && !self.has_legal_move(color, state)
    }

    /// Commit a move the caller has already checked with [`Board::is_legal_move`].
    ///
    /// Moves the rook along when castling, removes the pawn taken en passant from its
    /// own square, and replaces a pawn reaching the last rank with a piece of the
    /// `promotion` kind. A bad promotion choice is rejected before anything changes.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
        state: &GameState,
    ) -> Result<MoveEffects, MoveError> {
        let piece = *self.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        let promotes = piece.piece_type == PieceType::Pawn && to.rank == piece.color.promotion_rank();
        match (promotes, promotion) {
            (true, None) => return Err(MoveError::PromotionRequired(to)),
            (true, Some(pt)) if !pt.can_promote_to() => return Err(MoveError::InvalidPromotion(pt)),
            (false, Some(pt)) => return Err(MoveError::UnexpectedPromotion(pt)),
            _ => {}
        }

        let mut effects = self.make_move(from, to, state);
        if let Some(piece_type) = promotion {
            let mut promoted = Piece::new(piece.color, piece_type, to);
            promoted.previous_position = from;
            // promoted rooks never grant castling rights
            promoted.has_moved = true;
            self.put(promoted);
            effects.piece = promoted;
            effects.move_flag = MoveFlag::Promotion(piece_type);
        }
        Ok(effects)
    }

    /// Move the piece on `from` to `to` with the castling and en passant side effects.
    /// Shared by committed moves and the copy used to test legality.
    fn make_move(&mut self, from: Square, to: Square, state: &GameState) -> MoveEffects {
        let mut piece = self
            .take(from)
            .unwrap_or_else(|| panic!("no piece on {} to move", from));
        let mut captured = self.take(to);
        let mut changed_squares = vec![from, to];
        let mut move_flag = MoveFlag::Regular;

        if piece.piece_type == PieceType::King && from.file.abs_diff(to.file) == 2 {
            let kingside = to.file > from.file;
            let (rook_from, rook_to) = if kingside {
                (Square::new(from.rank, 7), Square::new(from.rank, 5))
            } else {
                (Square::new(from.rank, 0), Square::new(from.rank, 3))
            };
            if let Some(mut rook) = self.take(rook_from) {
                rook.move_to(rook_to);
                rook.has_moved = true;
                self.put(rook);
                changed_squares.extend([rook_from, rook_to]);
            }
            move_flag = if kingside {
                MoveFlag::CastleKingside
            } else {
                MoveFlag::CastleQueenside
            };
        }

        if piece.piece_type == PieceType::Pawn && captured.is_none() && from.file != to.file {
            let victim = Square::new(from.rank, to.file);
            if state.en_passant == Some(victim) {
                captured = self.take(victim);
                changed_squares.push(victim);
                move_flag = MoveFlag::EnPassantCapture;
            }
        }

        if piece.piece_type == PieceType::Pawn && from.rank.abs_diff(to.rank) == 2 {
            move_flag = MoveFlag::DoublePawnPush;
        }

        assert!(
            !captured.is_some_and(|p| p.piece_type == PieceType::King),
            "King cannot be captured, something is amiss"
        );

        piece.move_to(to);
        if matches!(piece.piece_type, PieceType::Rook | PieceType::King) {
            piece.has_moved = true;
        }
        self.put(piece);

        MoveEffects {
            piece,
            from,
            to,
            captured,
            move_flag,
            changed_squares,
        }
    }

    fn render(&self, glyph: impl Fn(&Piece) -> String) -> String {
        let mut string = String::new();
        for rank in (0..8).rev() {
            string.push((b'1' + rank) as char);
            for file in 0..8 {
                let cell = match self.piece_at(Square::new(rank, file)) {
                    Some(p) => glyph(p),
                    None => ".".to_string(),
                };
                string.push(' ');
                string.push_str(&cell);
            }
            string.push('\n');
        }
        string.push_str("  a b c d e f g h\n");
        string
    }

    pub fn draw_board(&self) -> String {
        self.render(|p| p.to_symbol().to_string())
    }

    pub fn draw_board_ascii(&self) -> String {
        self.render(|p| p.to_char().to_string())
    }

    /// Board from an 8 line diagram, rank 8 first, `.` for empty squares and
    /// piece letters (uppercase white) elsewhere. Whitespace inside lines is ignored.
    #[cfg(test)]
    pub(crate) fn from_diagram(diagram: &str) -> Board {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        assert_eq!(rows.len(), 8, "diagram must have 8 ranks");

        let mut board = Board::empty();
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 8, "rank {} must have 8 squares", 8 - i);
            for (file, c) in row.iter().enumerate() {
                let square = Square::new(7 - i as u8, file as u8);
                if let Some(piece) = Piece::from_char(*c, square) {
                    board.put(piece);
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
