//! Integration tests for the rules engine, driven through the public `Game` API.
//!
//! Run with: cargo test --test rules_tests

use chess_rules::{
    Board, Color, Game, GameState, Move, MoveError, MoveFlag, Piece, PieceType, Square, Status,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

/// Board with the given pieces, as (letter, square) pairs, uppercase for white
fn board_with(pieces: &[(char, &str)]) -> Board {
    let mut board = Board::empty();
    for (c, square) in pieces {
        board.put(Piece::from_char(*c, sq(square)).unwrap());
    }
    board
}

fn play_all(game: &mut Game, moves: &[&str]) {
    for m in moves {
        let mv: Move = m.parse().unwrap();
        game.play_move(mv).unwrap_or_else(|e| panic!("{} failed: {}", m, e));
    }
}

/// Every piece sits on the square it thinks it is on, and each side has one king
fn assert_board_invariants(board: &Board) {
    for square in Square::all() {
        if let Some(piece) = board.piece_at(square) {
            assert_eq!(piece.position, square);
        }
    }
    for color in Color::ALL {
        let kings = board
            .pieces_of(color)
            .filter(|p| p.piece_type == PieceType::King)
            .count();
        assert_eq!(kings, 1, "{} should have exactly one king", color);
    }
}

#[test]
fn starting_position_has_twenty_moves() {
    let game = Game::new();
    assert_eq!(game.legal_moves().len(), 20);
    let pawn_moves = game
        .legal_moves()
        .iter()
        .filter(|m| game.board().piece_at(m.from).unwrap().piece_type == PieceType::Pawn)
        .count();
    assert_eq!(pawn_moves, 16);
}

#[test]
fn en_passant_removes_the_pawn_beside() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);

    let effects = game.play(sq("e5"), sq("d6"), None).unwrap();
    assert_eq!(effects.move_flag, MoveFlag::EnPassantCapture);

    let captured = effects.captured.unwrap();
    assert_eq!(captured.piece_type, PieceType::Pawn);
    assert_eq!(captured.color, Color::Black);
    assert_eq!(captured.position, sq("d5"));

    let board = game.board();
    assert!(board.piece_at(sq("d5")).is_none());
    assert!(board.piece_at(sq("e5")).is_none());
    assert_eq!(board.piece_at(sq("d6")).unwrap().color, Color::White);
    let mut changed = effects.changed_squares.clone();
    changed.sort_by_key(|s| (s.rank, s.file));
    assert_eq!(changed, vec![sq("d5"), sq("e5"), sq("d6")]);
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "b1c3", "a6a5"]);
    assert!(matches!(
        game.play(sq("e5"), sq("d6"), None),
        Err(MoveError::IllegalMove { .. })
    ));
}

#[test]
fn kingside_castle_moves_the_rook() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"]);
    assert!(game.legal_targets(sq("e1")).contains(&sq("g1")));

    let effects = game.play(sq("e1"), sq("g1"), None).unwrap();
    assert_eq!(effects.move_flag, MoveFlag::CastleKingside);
    assert_eq!(effects.to_human(), "white castles kingside");

    let board = game.board();
    assert_eq!(board.piece_at(sq("g1")).unwrap().piece_type, PieceType::King);
    assert_eq!(board.piece_at(sq("f1")).unwrap().piece_type, PieceType::Rook);
    assert!(board.piece_at(sq("h1")).is_none());
    assert!(board.piece_at(sq("e1")).is_none());
    assert!(game.state().king_moved(Color::White));
}

#[test]
fn queenside_castle_for_black() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &["e2e4", "d7d5", "g1f3", "d8d6", "f1e2", "c8d7", "a2a3", "b8c6", "h2h3"],
    );
    let effects = game.play(sq("e8"), sq("c8"), None).unwrap();
    assert_eq!(effects.move_flag, MoveFlag::CastleQueenside);
    assert_eq!(effects.to_human(), "black castles queenside");
    assert_eq!(game.board().piece_at(sq("d8")).unwrap().piece_type, PieceType::Rook);
    assert!(game.board().piece_at(sq("a8")).is_none());
}

#[test]
fn moved_rook_forfeits_its_side() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &["g2g3", "a7a6", "g1f3", "a6a5", "f1g2", "a5a4", "h1g1", "b7b6", "g1h1", "b6b5"],
    );
    assert!(!game.legal_targets(sq("e1")).contains(&sq("g1")));
}

#[test]
fn castling_out_of_through_and_into_check_is_illegal() {
    for attacker in ["e8", "f8", "g8"] {
        let board = board_with(&[('K', "e1"), ('R', "h1"), ('k', "a8"), ('r', attacker)]);
        let game = Game::from_position(board, GameState::new());
        assert!(
            !game.legal_targets(sq("e1")).contains(&sq("g1")),
            "castled with a rook on {}",
            attacker
        );
    }
    // the rook only covers h1, which the king never crosses
    let board = board_with(&[('K', "e1"), ('R', "h1"), ('k', "a8"), ('r', "h8")]);
    let game = Game::from_position(board, GameState::new());
    assert!(game.legal_targets(sq("e1")).contains(&sq("g1")));
}

#[test]
fn back_rank_mate() {
    let board = board_with(&[
        ('k', "g8"),
        ('p', "f7"),
        ('p', "g7"),
        ('p', "h7"),
        ('R', "a1"),
        ('K', "g1"),
    ]);
    let mut game = Game::from_position(board, GameState::new());
    play_all(&mut game, &["a1a8"]);
    assert_eq!(game.status(), Status::Checkmate(Color::White));
    assert!(game.board().is_checkmate(Color::Black, game.state()));
}

#[test]
fn back_rank_with_an_open_flight_square() {
    let board = board_with(&[
        ('k', "g8"),
        ('p', "f7"),
        ('p', "g7"),
        ('R', "a1"),
        ('K', "g1"),
    ]);
    let mut game = Game::from_position(board, GameState::new());
    play_all(&mut game, &["a1a8"]);
    assert_eq!(game.status(), Status::Check(Color::Black));
    assert_eq!(game.legal_targets(sq("g8")), vec![sq("h7")]);
}

#[test]
fn pinned_bishop_cannot_move() {
    let board = board_with(&[('K', "e1"), ('B', "e2"), ('r', "e8"), ('k', "a8")]);
    let state = GameState::new();
    let bishop = *board.piece_at(sq("e2")).unwrap();

    let pattern_targets = board.candidate_targets(&bishop, &state);
    assert!(!pattern_targets.is_empty());
    for target in pattern_targets {
        assert!(!board.is_legal_move(&bishop, target, &state));
    }

    let mut game = Game::from_position(board, state);
    assert!(game.legal_targets(sq("e2")).is_empty());
    assert_eq!(
        game.play(sq("e2"), sq("d3"), None),
        Err(MoveError::IllegalMove {
            from: sq("e2"),
            to: sq("d3")
        })
    );
}

#[test]
fn promotion_choices() {
    let setup = || {
        let board = board_with(&[('K', "e1"), ('P', "a7"), ('k', "h5"), ('n', "b8")]);
        Game::from_position(board, GameState::new())
    };

    // straight ahead and by capturing the knight
    let game = setup();
    let promotions = game
        .legal_moves()
        .into_iter()
        .filter(|m| m.promotion.is_some())
        .count();
    assert_eq!(promotions, 8);

    let mut game = setup();
    assert_eq!(
        game.play(sq("a7"), sq("a8"), None),
        Err(MoveError::PromotionRequired(sq("a8")))
    );
    assert_eq!(
        game.play(sq("a7"), sq("a8"), Some(PieceType::King)),
        Err(MoveError::InvalidPromotion(PieceType::King))
    );
    assert!(game.history().is_empty());

    let effects = game.play(sq("a7"), sq("b8"), Some(PieceType::Rook)).unwrap();
    assert_eq!(effects.move_flag, MoveFlag::Promotion(PieceType::Rook));
    assert_eq!(effects.captured.unwrap().piece_type, PieceType::Knight);
    let rook = game.board().piece_at(sq("b8")).unwrap();
    assert_eq!(rook.piece_type, PieceType::Rook);
    assert_eq!(rook.color, Color::White);
    assert_eq!(game.active_color(), Color::Black);
}

#[test]
fn legality_queries_do_not_mutate() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "d7d5", "e4e5", "f7f5"]);
    let before = game.board().clone();
    let state = *game.state();
    for piece in before.pieces_of(Color::White) {
        for target in Square::all() {
            let _ = game.board().is_legal_move(piece, target, &state);
        }
    }
    assert_eq!(game.board(), &before);
}

#[test]
fn random_playouts_keep_invariants() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new();
        for _ in 0..120 {
            let moves = game.legal_moves();
            let Some(mv) = moves.choose(&mut rng).copied() else {
                break;
            };
            let board_before = game.board().clone();
            let effects = game.play_move(mv).unwrap();
            assert_ne!(game.board(), &board_before);
            assert_eq!(effects.from, mv.from);
            assert_board_invariants(game.board());

            // whoever just moved can never be left in check
            assert!(!game.board().is_check(game.active_color().other_color()));
        }
        match game.status() {
            Status::Checkmate(_) | Status::Stalemate => assert!(game.legal_moves().is_empty()),
            _ => assert!(!game.legal_moves().is_empty()),
        }
    }
}
