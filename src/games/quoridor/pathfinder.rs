//! Breadth-first search over the wall-constrained board graph.
//!
//! The graph has at most 81 nodes, so searches are cheap and nothing is
//! cached; callers run them as often as they need. Expansion follows the
//! fixed neighbor order from the board module, keeping results
//! deterministic for identical states.

use std::collections::VecDeque;

use super::board::{self, Position, BOARD_SIZE};
use super::wall::WallIndex;

/// Whether any cell satisfying `goal` can be reached from `start`.
pub fn reachable<F>(start: Position, goal: F, walls: &WallIndex) -> bool
where
    F: Fn(Position) -> bool,
{
    shortest_distance(start, goal, walls).is_some()
}

/// Length of the shortest path from `start` to any cell satisfying
/// `goal`, or `None` when no such cell is reachable.
pub fn shortest_distance<F>(start: Position, goal: F, walls: &WallIndex) -> Option<u32>
where
    F: Fn(Position) -> bool,
{
    if goal(start) {
        return Some(0);
    }

    let mut visited = [[false; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    visited[start.row as usize][start.col as usize] = true;

    let mut queue = VecDeque::new();
    queue.push_back((start, 0u32));

    while let Some((current, dist)) = queue.pop_front() {
        for next in board::neighbors(current, walls) {
            let seen = &mut visited[next.row as usize][next.col as usize];
            if *seen {
                continue;
            }
            *seen = true;

            if goal(next) {
                return Some(dist + 1);
            }
            queue.push_back((next, dist + 1));
        }
    }

    None
}

/// Convenience predicate for the usual "reach this row" goal.
pub fn row_goal(goal_row: u8) -> impl Fn(Position) -> bool {
    move |pos| pos.row == goal_row
}
