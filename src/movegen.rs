//! Move patterns for each piece kind.
//!
//! Everything here is pure geometry plus occupancy: whether a move would leave the
//! mover's own king attacked is decided by [`Board::is_legal_move`].

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::state::GameState;
use crate::types::{Piece, PieceType, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Squares reachable from a square in each sliding direction, nearest first
struct RaysFromSquare {
    orthogonal: [Vec<Square>; 4],
    diagonal: [Vec<Square>; 4],
}

impl RaysFromSquare {
    fn new(square: Square) -> Self {
        Self {
            orthogonal: ORTHOGONAL.map(|dir| ray(square, dir)),
            diagonal: DIAGONAL.map(|dir| ray(square, dir)),
        }
    }
}

fn ray(from: Square, (rank_step, file_step): (i8, i8)) -> Vec<Square> {
    std::iter::successors(from.offset(rank_step, file_step), |sq| {
        sq.offset(rank_step, file_step)
    })
    .collect()
}

/// Indexed by `Square::index`
static RAYS: Lazy<Vec<RaysFromSquare>> =
    Lazy::new(|| Square::all().map(RaysFromSquare::new).collect());

fn deltas(piece: &Piece, target: Square) -> (i8, i8) {
    (
        target.rank as i8 - piece.position.rank as i8,
        target.file as i8 - piece.position.file as i8,
    )
}

fn is_friendly(board: &Board, piece: &Piece, target: Square) -> bool {
    board.piece_at(target).is_some_and(|p| p.color == piece.color)
}

/// Every square strictly between `from` and `to` is empty. Callers make sure
/// the two squares share a rank, file or diagonal.
fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    let rank_step = (to.rank as i8 - from.rank as i8).signum();
    let file_step = (to.file as i8 - from.file as i8).signum();
    std::iter::successors(from.offset(rank_step, file_step), |sq| {
        sq.offset(rank_step, file_step)
    })
    .take_while(|sq| *sq != to)
    .all(|sq| board.is_empty(sq))
}

fn slides_orthogonally(board: &Board, piece: &Piece, target: Square) -> bool {
    let (rank_delta, file_delta) = deltas(piece, target);
    (rank_delta == 0) != (file_delta == 0) && path_is_clear(board, piece.position, target)
}

fn slides_diagonally(board: &Board, piece: &Piece, target: Square) -> bool {
    let (rank_delta, file_delta) = deltas(piece, target);
    rank_delta != 0
        && rank_delta.abs() == file_delta.abs()
        && path_is_clear(board, piece.position, target)
}

fn is_knight_jump(piece: &Piece, target: Square) -> bool {
    let (rank_delta, file_delta) = deltas(piece, target);
    matches!((rank_delta.abs(), file_delta.abs()), (1, 2) | (2, 1))
}

fn is_king_step(piece: &Piece, target: Square) -> bool {
    let (rank_delta, file_delta) = deltas(piece, target);
    (rank_delta, file_delta) != (0, 0) && rank_delta.abs() <= 1 && file_delta.abs() <= 1
}

/// Does `piece`'s movement rule allow it to go to `target` on this board?
///
/// Blocking pieces and the colour of whatever stands on `target` are taken into
/// account, but not whether the move leaves the mover in check.
pub fn is_pattern_legal(board: &Board, piece: &Piece, target: Square, state: &GameState) -> bool {
    if !target.is_on_board() || target == piece.position || is_friendly(board, piece, target) {
        return false;
    }
    match piece.piece_type {
        PieceType::Pawn => is_pawn_pattern_legal(board, piece, target, state),
        PieceType::Rook => slides_orthogonally(board, piece, target),
        PieceType::Knight => is_knight_jump(piece, target),
        PieceType::Bishop => slides_diagonally(board, piece, target),
        PieceType::Queen => {
            slides_orthogonally(board, piece, target) || slides_diagonally(board, piece, target)
        }
        PieceType::King => {
            is_king_step(piece, target) || castling_rook(board, piece, target, state).is_some()
        }
    }
}

fn is_pawn_pattern_legal(board: &Board, piece: &Piece, target: Square, state: &GameState) -> bool {
    let direction = piece.color.pawn_direction();
    let (rank_delta, file_delta) = deltas(piece, target);

    if file_delta == 0 {
        if rank_delta == direction {
            return board.is_empty(target);
        }
        // both squares in front must be free for the double step
        return rank_delta == 2 * direction
            && piece.position.rank == piece.color.pawn_starting_rank()
            && piece
                .position
                .offset(direction, 0)
                .is_some_and(|between| board.is_empty(between))
            && board.is_empty(target);
    }

    if file_delta.abs() == 1 && rank_delta == direction {
        return match board.piece_at(target) {
            Some(other) => other.color != piece.color,
            None => en_passant_victim(board, piece, target, state).is_some(),
        };
    }
    false
}

/// If `pawn` moving to `target` is an en passant capture, the square of the pawn it takes.
///
/// The victim stands beside the capturing pawn on the target file, not on `target`.
pub fn en_passant_victim(
    board: &Board,
    pawn: &Piece,
    target: Square,
    state: &GameState,
) -> Option<Square> {
    if pawn.piece_type != PieceType::Pawn
        || target.file == pawn.position.file
        || !board.is_empty(target)
    {
        return None;
    }
    let beside = Square::new(pawn.position.rank, target.file);
    if state.en_passant != Some(beside) {
        return None;
    }
    board
        .piece_at(beside)
        .filter(|p| p.piece_type == PieceType::Pawn && p.color != pawn.color)
        .map(|p| p.position)
}

/// If `king` moving to `target` is a castle, the square of the rook that goes with it.
///
/// Castling needs an unmoved king on its home square, an unmoved rook of the same
/// colour in the corner on that side, and nothing in between. Whether the king
/// passes through check is left to [`Board::is_legal_move`].
pub fn castling_rook(
    board: &Board,
    king: &Piece,
    target: Square,
    state: &GameState,
) -> Option<Square> {
    let home = Square::new(king.color.back_rank(), 4);
    if king.piece_type != PieceType::King
        || king.has_moved
        || state.king_moved(king.color)
        || king.position != home
        || target.rank != home.rank
        || target.file.abs_diff(home.file) != 2
    {
        return None;
    }
    let rook_square = Square::new(home.rank, if target.file > home.file { 7 } else { 0 });
    let rook = board.piece_at(rook_square)?;
    if rook.piece_type != PieceType::Rook || rook.color != king.color || rook.has_moved {
        return None;
    }
    path_is_clear(board, home, rook_square).then_some(rook_square)
}

/// Could `piece` capture on `target`, whatever stands there now?
///
/// Differs from [`is_pattern_legal`] for pawns, which only attack diagonally, and
/// for kings, whose castling move never attacks. Never looks at check.
pub fn attacks(board: &Board, piece: &Piece, target: Square) -> bool {
    if !target.is_on_board() || target == piece.position {
        return false;
    }
    match piece.piece_type {
        PieceType::Pawn => {
            let (rank_delta, file_delta) = deltas(piece, target);
            rank_delta == piece.color.pawn_direction() && file_delta.abs() == 1
        }
        PieceType::Rook => slides_orthogonally(board, piece, target),
        PieceType::Knight => is_knight_jump(piece, target),
        PieceType::Bishop => slides_diagonally(board, piece, target),
        PieceType::Queen => {
            slides_orthogonally(board, piece, target) || slides_diagonally(board, piece, target)
        }
        PieceType::King => is_king_step(piece, target),
    }
}

/// Squares `piece` may go to by its movement rule, check not considered.
pub fn candidate_targets(board: &Board, piece: &Piece, state: &GameState) -> Vec<Square> {
    let rays = &RAYS[piece.position.index()];
    match piece.piece_type {
        PieceType::Pawn => {
            let direction = piece.color.pawn_direction();
            [(direction, 0), (2 * direction, 0), (direction, -1), (direction, 1)]
                .into_iter()
                .filter_map(|(rank_delta, file_delta)| piece.position.offset(rank_delta, file_delta))
                .filter(|target| is_pawn_pattern_legal(board, piece, *target, state))
                .collect()
        }
        PieceType::Rook => slide(board, piece, &rays.orthogonal),
        PieceType::Bishop => slide(board, piece, &rays.diagonal),
        PieceType::Queen => {
            let mut targets = slide(board, piece, &rays.orthogonal);
            targets.extend(slide(board, piece, &rays.diagonal));
            targets
        }
        PieceType::Knight => jump(board, piece, &KNIGHT_OFFSETS),
        PieceType::King => {
            let mut targets = jump(board, piece, &KING_OFFSETS);
            for file_delta in [2, -2] {
                if let Some(target) = piece.position.offset(0, file_delta) {
                    if castling_rook(board, piece, target, state).is_some() {
                        targets.push(target);
                    }
                }
            }
            targets
        }
    }
}

/// Walk each ray until blocked, keeping the blocker's square if it can be captured
fn slide(board: &Board, piece: &Piece, rays: &[Vec<Square>; 4]) -> Vec<Square> {
    let mut targets = vec![];
    for ray in rays {
        for &square in ray {
            match board.piece_at(square) {
                None => targets.push(square),
                Some(other) => {
                    if other.color != piece.color {
                        targets.push(square);
                    }
                    break;
                }
            }
        }
    }
    targets
}

fn jump(board: &Board, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(rank_delta, file_delta)| piece.position.offset(rank_delta, file_delta))
        .filter(|target| !is_friendly(board, piece, *target))
        .collect()
}
