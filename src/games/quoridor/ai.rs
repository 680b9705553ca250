//! Built-in opponent: heuristic action selection at three difficulty
//! tiers.
//!
//! All tiers enumerate candidates through the validator, so a selected
//! action is always legal; the registry still routes it through the
//! normal apply path. Hard-tier search stays bounded by restricting wall
//! candidates to anchors near either pawn.

use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::board::{Position, WALL_POSITIONS};
use super::game::{Action, GameState};
use super::pathfinder::{self, row_goal};
use super::validator;
use super::wall::{Orientation, Wall};

/// Weight of the wall-stock difference in the evaluation.
const WALL_WEIGHT: f64 = 0.1;

/// Sentinel standing in for an unreachable opponent distance.
const UNREACHABLE_DISTANCE: f64 = 255.0;

/// Wall candidates are restricted to anchors within this Chebyshev
/// distance of either pawn.
const WALL_SEARCH_RADIUS: u8 = 2;

/// Opponent difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random pawn moves.
    Easy,
    /// Greedy shortest-path pawn moves, never places walls.
    #[default]
    Normal,
    /// One-ply search over pawn moves and nearby wall placements.
    Hard,
}

impl Difficulty {
    /// Stable identifier used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Parses the stable identifier back into a tier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action selector for the built-in opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicOpponent {
    difficulty: Difficulty,
}

impl HeuristicOpponent {
    /// Creates an opponent at the given tier.
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// The configured tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Picks an action for the current-turn player.
    ///
    /// Takes `&mut GameState` because hard-tier scoring applies each
    /// candidate speculatively and undoes it; the state is unchanged on
    /// return. Returns `None` only when no legal pawn move exists.
    #[instrument(skip(self, game), fields(game_id = %game.game_id(), difficulty = %self.difficulty))]
    pub fn select_action(&self, game: &mut GameState) -> Option<Action> {
        let moves = game.valid_pawn_moves();
        let chosen = match self.difficulty {
            Difficulty::Easy => Self::random_move(&moves),
            Difficulty::Normal => Self::greedy_move(game, &moves),
            Difficulty::Hard => Self::best_scoring_action(game, &moves),
        };

        let action = chosen.or_else(|| moves.first().map(Self::move_action));
        debug!(?action, "opponent selected action");
        action
    }

    fn move_action(target: &Position) -> Action {
        Action::Move {
            row: target.row,
            col: target.col,
        }
    }

    /// Easy tier: a uniformly random legal pawn move.
    fn random_move(moves: &[Position]) -> Option<Action> {
        moves.choose(&mut rand::rng()).map(Self::move_action)
    }

    /// Normal tier: the pawn move minimizing the remaining shortest
    /// distance, ties broken by the fixed neighbor order.
    fn greedy_move(game: &GameState, moves: &[Position]) -> Option<Action> {
        let goal_row = game.current_player().goal_row();
        let mut best: Option<(&Position, u32)> = None;
        for target in moves {
            let distance = pathfinder::shortest_distance(*target, row_goal(goal_row), game.walls())
                .unwrap_or(u32::MAX);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((target, distance));
            }
        }
        best.map(|(target, _)| Self::move_action(target))
    }

    /// Hard tier: score every pawn move and every nearby legal wall
    /// speculatively and return the maximum.
    ///
    /// Candidates are visited in tie-break priority order (pawn moves in
    /// neighbor order, then walls in (row, col, orientation) order), so
    /// keeping the first strict maximum implements the tie-break.
    fn best_scoring_action(game: &mut GameState, moves: &[Position]) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;
        let consider = |action: Action, score: f64, best: &mut Option<(Action, f64)>| {
            if best.map_or(true, |(_, s)| score > s) {
                *best = Some((action, score));
            }
        };

        for target in moves {
            if let Some(score) = Self::score_after_move(game, *target) {
                consider(Self::move_action(target), score, &mut best);
            }
        }
        for wall in Self::nearby_wall_candidates(game) {
            if let Some(score) = Self::score_after_wall(game, wall) {
                let action = Action::Wall {
                    row: wall.row,
                    col: wall.col,
                    orientation: wall.orientation,
                };
                consider(action, score, &mut best);
            }
        }

        best.map(|(action, _)| action)
    }

    /// Evaluation for the acting player: opponent distance minus own
    /// distance, plus a small bonus per wall in hand over the opponent.
    ///
    /// Returns `None` when the acting player has no path, discarding the
    /// candidate that produced the position.
    fn evaluate(game: &GameState) -> Option<f64> {
        let me = game.current_player();
        let opponent = game.opponent_player();

        let my_distance =
            pathfinder::shortest_distance(me.position(), row_goal(me.goal_row()), game.walls())?;
        let opponent_distance = pathfinder::shortest_distance(
            opponent.position(),
            row_goal(opponent.goal_row()),
            game.walls(),
        )
        .map_or(UNREACHABLE_DISTANCE, f64::from);

        let wall_edge =
            f64::from(me.walls_remaining()) - f64::from(opponent.walls_remaining());
        Some(opponent_distance - f64::from(my_distance) + WALL_WEIGHT * wall_edge)
    }

    fn score_after_move(game: &mut GameState, target: Position) -> Option<f64> {
        let (me, _) = game.players_mut();
        let saved = me.position();
        me.move_to(target);

        let score = Self::evaluate(game);

        let (me, _) = game.players_mut();
        me.move_to(saved);
        score
    }

    fn score_after_wall(game: &mut GameState, wall: Wall) -> Option<f64> {
        game.walls.insert(wall);
        let (me, _) = game.players_mut();
        me.use_wall();

        let score = Self::evaluate(game);

        let (me, _) = game.players_mut();
        me.return_wall();
        game.walls.remove(wall);
        score
    }

    /// Legal wall placements with anchors within [`WALL_SEARCH_RADIUS`]
    /// of either pawn, in (row, col, orientation) order.
    fn nearby_wall_candidates(game: &mut GameState) -> Vec<Wall> {
        let pawns = [game.player1().position(), game.player2().position()];
        let near = |row: u8, col: u8| {
            pawns.iter().any(|p| {
                let dr = (i16::from(row) - i16::from(p.row)).unsigned_abs();
                let dc = (i16::from(col) - i16::from(p.col)).unsigned_abs();
                dr.max(dc) <= u16::from(WALL_SEARCH_RADIUS)
            })
        };

        let (player, opponent) = match game.current_turn() {
            1 => (game.player1.clone(), game.player2.clone()),
            _ => (game.player2.clone(), game.player1.clone()),
        };

        let mut candidates = Vec::new();
        for row in 0..WALL_POSITIONS {
            for col in 0..WALL_POSITIONS {
                if !near(row, col) {
                    continue;
                }
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    let wall = Wall::new(row, col, orientation);
                    if validator::check_wall_placement(wall, &player, &opponent, &mut game.walls)
                        .is_ok()
                    {
                        candidates.push(wall);
                    }
                }
            }
        }
        candidates
    }
}
