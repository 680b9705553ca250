//! Legality of pawn moves (including jumps) and wall placements.
//!
//! Pawn-move legality is computed as a full destination set so that the
//! valid-action listing and individual move checks can never disagree.
//! Wall legality runs the path-connectivity check under a speculative
//! insertion that is rolled back on every reject path.

use super::board::{Position, DIRECTIONS, WALL_POSITIONS};
use super::error::GameError;
use super::pathfinder::{self, row_goal};
use super::player::Player;
use super::wall::{Orientation, Wall, WallIndex};

/// All legal pawn destinations for `player`, in deterministic order.
///
/// For each unblocked orthogonal neighbor: the neighbor itself when it is
/// free, or the jump destinations when the opponent stands there. A
/// straight jump over the opponent takes precedence; only when the cell
/// behind the opponent is off-board or walled off do the two diagonal
/// cells beside the opponent become legal.
pub fn valid_pawn_moves(player: &Player, opponent: &Player, walls: &WallIndex) -> Vec<Position> {
    let mut moves = Vec::new();
    let current = player.position();
    let opponent_pos = opponent.position();

    for (dr, dc) in DIRECTIONS {
        let Some(next) = current.offset(dr, dc) else {
            continue;
        };
        if walls.is_blocked(current, next) {
            continue;
        }
        if next == opponent_pos {
            moves.extend(jump_moves(opponent_pos, dr, dc, walls));
        } else {
            moves.push(next);
        }
    }

    moves
}

/// Jump destinations when the opponent is adjacent in direction `(dr, dc)`.
fn jump_moves(opponent_pos: Position, dr: i8, dc: i8, walls: &WallIndex) -> Vec<Position> {
    // Straight jump: land directly behind the opponent.
    if let Some(behind) = opponent_pos.offset(dr, dc) {
        if !walls.is_blocked(opponent_pos, behind) {
            return vec![behind];
        }
    }

    // Behind is off-board or walled off: the cells beside the opponent,
    // perpendicular to the movement axis, become the jump targets.
    let diagonals: [(i8, i8); 2] = if dr != 0 { [(0, 1), (0, -1)] } else { [(-1, 0), (1, 0)] };

    diagonals
        .into_iter()
        .filter_map(|(ddr, ddc)| opponent_pos.offset(ddr, ddc))
        .filter(|&diag| !walls.is_blocked(opponent_pos, diag))
        .collect()
}

/// Whether `target` is a legal pawn destination for `player`.
pub fn is_valid_pawn_move(
    player: &Player,
    opponent: &Player,
    target: Position,
    walls: &WallIndex,
) -> bool {
    valid_pawn_moves(player, opponent, walls).contains(&target)
}

/// Checks a wall placement without mutating the index.
///
/// Runs the full procedure: wall stock, anchor range, overlap, crossing,
/// then the path-connectivity check under a speculative insertion.
///
/// # Errors
///
/// [`GameError::NoWallsRemaining`], [`GameError::InvalidWallPosition`] or
/// [`GameError::PathBlocked`], in that precedence order.
pub fn check_wall_placement(
    wall: Wall,
    player: &Player,
    opponent: &Player,
    walls: &mut WallIndex,
) -> Result<(), GameError> {
    if !player.has_walls() {
        return Err(GameError::NoWallsRemaining);
    }
    if !wall.in_bounds() || walls.would_overlap(wall) || walls.would_cross(wall) {
        return Err(GameError::InvalidWallPosition);
    }

    let speculative = walls.speculate(wall);
    let both_connected = pathfinder::reachable(
        player.position(),
        row_goal(player.goal_row()),
        speculative.index(),
    ) && pathfinder::reachable(
        opponent.position(),
        row_goal(opponent.goal_row()),
        speculative.index(),
    );
    // The guard drops here, removing the speculative wall.
    drop(speculative);

    if both_connected {
        Ok(())
    } else {
        Err(GameError::PathBlocked)
    }
}

/// All legal wall placements for `player`, in (row, col, orientation)
/// order.
///
/// Every candidate anchor and orientation runs the same speculative
/// path-connectivity check as an individual placement attempt, so this
/// set agrees exactly with [`check_wall_placement`].
pub fn valid_wall_placements(
    player: &Player,
    opponent: &Player,
    walls: &mut WallIndex,
) -> Vec<Wall> {
    if !player.has_walls() {
        return Vec::new();
    }

    let mut placements = Vec::new();
    for row in 0..WALL_POSITIONS {
        for col in 0..WALL_POSITIONS {
            for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                let wall = Wall::new(row, col, orientation);
                if check_wall_placement(wall, player, opponent, walls).is_ok() {
                    placements.push(wall);
                }
            }
        }
    }
    placements
}
