use crate::error::MoveError;
use crate::game::Game;

/// Count the leaf nodes of the legal move tree `depth` plies deep.
pub fn run_perft_test(game: &Game, depth: u8) -> Result<u64, MoveError> {
    if depth == 0 {
        return Ok(1);
    }

    let mut nodes = 0;
    for m in game.legal_moves() {
        let mut next = game.clone();
        next.play_move(m)?;
        nodes += run_perft_test(&next, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes       | Captures | E.p. | Castles | Checks | Checkmates |
/// | ----- | ----------- | -------- | ---- | ------- | ------ | ---------- |
/// | 0     | 1           | 0        | 0    | 0       | 0      | 0          |
/// | 1     | 20          | 0        | 0    | 0       | 0      | 0          |
/// | 2     | 400         | 0        | 0    | 0       | 0      | 0          |
/// | 3     | 8,902       | 34       | 0    | 0       | 12     | 0          |
/// | 4     | 197,281     | 1576     | 0    | 0       | 469    | 8          |
/// | 5     | 4,865,609   | 82,719   | 258  | 0       | 27,351 | 347        |
pub fn expected_start_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        _ => None,
    }
}
