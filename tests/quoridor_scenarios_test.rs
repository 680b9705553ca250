//! End-to-end rule scenarios: jumps, wall conflicts, sealed paths,
//! victory.

use quoridor_server::{GameError, GameState, GameStatus, Orientation, Position, Wall};

/// Builds a mid-game state by editing a fresh snapshot and restoring it.
fn custom_state(
    p1: (u8, u8),
    p2: (u8, u8),
    walls: &[(u8, u8, Orientation)],
    current_turn: u8,
) -> GameState {
    let mut snapshot = GameState::new("Alice", "AI").to_serializable();
    snapshot.players.player1.position = Position {
        row: p1.0,
        col: p1.1,
    };
    snapshot.players.player2.position = Position {
        row: p2.0,
        col: p2.1,
    };
    snapshot.players.player1.walls_remaining = 10 - walls.len() as u8;
    snapshot.walls = walls
        .iter()
        .map(|&(row, col, orientation)| Wall::new(row, col, orientation))
        .collect();
    snapshot.current_turn = current_turn;
    snapshot.turn_count = 6;
    GameState::from_serializable(snapshot).expect("constructed state is valid")
}

#[test]
fn scenario_a_straight_jump_over_facing_opponent() {
    let mut game = GameState::new("Alice", "AI");

    // March the pawns toward each other up and down column 4.
    game.move_pawn(7, 4).unwrap();
    game.move_pawn(1, 4).unwrap();
    game.move_pawn(6, 4).unwrap();
    game.move_pawn(2, 4).unwrap();
    game.move_pawn(5, 4).unwrap();
    game.move_pawn(3, 4).unwrap();
    // Player 1 burns a turn on a distant wall so player 2 can close the
    // gap to (4,4).
    game.place_wall(0, 0, Orientation::Horizontal).unwrap();
    game.move_pawn(4, 4).unwrap();

    assert_eq!(game.player1().position(), Position { row: 5, col: 4 });
    assert_eq!(game.player2().position(), Position { row: 4, col: 4 });
    assert_eq!(game.current_turn(), 1);

    let moves = game.valid_pawn_moves();
    assert!(
        moves.contains(&Position { row: 3, col: 4 }),
        "straight jump over the opponent must be legal, got {:?}",
        moves
    );
    assert!(!moves.contains(&Position { row: 4, col: 4 }));

    game.move_pawn(3, 4).expect("straight jump applies");
    assert_eq!(game.player1().position(), Position { row: 3, col: 4 });
}

#[test]
fn scenario_b_diagonal_jumps_when_wall_blocks_behind() {
    // Player 1 at (4,4) faces player 2 at (3,4); the horizontal wall at
    // (2,3) seals the cell behind the opponent.
    let game = custom_state((4, 4), (3, 4), &[(2, 3, Orientation::Horizontal)], 1);

    let moves = game.valid_pawn_moves();
    assert!(moves.contains(&Position { row: 3, col: 3 }));
    assert!(moves.contains(&Position { row: 3, col: 5 }));
    assert!(
        !moves.contains(&Position { row: 2, col: 4 }),
        "straight jump must be blocked by the wall behind the opponent"
    );
}

#[test]
fn scenario_c_overlapping_wall_is_rejected() {
    let mut game = GameState::new("Alice", "AI");
    game.place_wall(3, 3, Orientation::Horizontal).unwrap();

    // Player 2 tries the collinear neighbor sharing the (3,4)↔(4,4) edge.
    assert_eq!(
        game.place_wall(3, 4, Orientation::Horizontal),
        Err(GameError::InvalidWallPosition)
    );
    assert_eq!(game.walls().len(), 1);
}

#[test]
fn scenario_d_crossing_wall_is_rejected() {
    let mut game = GameState::new("Alice", "AI");
    game.place_wall(3, 3, Orientation::Horizontal).unwrap();

    assert_eq!(
        game.place_wall(3, 3, Orientation::Vertical),
        Err(GameError::InvalidWallPosition)
    );
    assert_eq!(game.walls().len(), 1);
}

#[test]
fn scenario_e_sealing_wall_is_rejected_and_state_unchanged() {
    // Player 1 sits in the bottom-right pocket whose left side V(7,6)
    // already fences; H(7,7) would close the roof and cut player 1 off
    // from row 0.
    let mut game = custom_state((8, 8), (0, 4), &[(7, 6, Orientation::Vertical)], 1);
    let before = game.clone();

    assert_eq!(
        game.place_wall(7, 7, Orientation::Horizontal),
        Err(GameError::PathBlocked)
    );
    assert_eq!(game, before, "rejected wall must leave the state unchanged");
    assert_eq!(game.player1().walls_remaining(), 9);
}

#[test]
fn scenario_f_reaching_goal_row_wins() {
    let mut game = custom_state((1, 4), (7, 4), &[], 1);
    let turn_count = game.turn_count();

    game.move_pawn(0, 4).expect("winning move applies");
    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.winner(), Some(1));
    assert_eq!(game.turn_count(), turn_count + 1);
    assert_eq!(game.current_turn(), 1, "turn must not toggle after a win");

    assert_eq!(game.move_pawn(6, 4), Err(GameError::GameFinished));
    assert_eq!(
        game.place_wall(4, 4, Orientation::Vertical),
        Err(GameError::GameFinished)
    );
}
