//! # Solver
//!
//! Breadth-first search for the shortest move sequence that wins a level.
//!
//! Search nodes are whole [`Game`] clones; two nodes are the same state when
//! their grids and play states match, since the rules follow from the grid.
//! The search is bounded both in depth and in the number of expanded states.

use crate::config;
use crate::game::{Direction, Game, PlayState};
use log::{debug, info};
use pathfinding::prelude::bfs;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Search limits for [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Longest move sequence considered
    pub max_moves: usize,
    /// Number of states expanded before giving up
    pub max_states: usize,
}

impl SolverConfig {
    /// Creates a configuration with the default state budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::SolverConfig;
    ///
    /// let config = SolverConfig::new(20);
    /// assert_eq!(config.max_moves, 20);
    /// assert!(config.max_states > 0);
    /// ```
    pub fn new(max_moves: usize) -> Self {
        Self {
            max_moves,
            max_states: config::DEFAULT_SOLVER_STATE_LIMIT,
        }
    }

    /// Creates a configuration for testing with small budgets.
    pub fn for_testing() -> Self {
        Self {
            max_moves: 24,
            max_states: 20_000,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(config::DEFAULT_SOLVER_MAX_MOVES)
    }
}

#[derive(Clone)]
struct SearchNode {
    game: Game,
    via: Option<Direction>,
    depth: usize,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.game.play_state() == other.game.play_state() && self.game.grid() == other.game.grid()
    }
}

impl Eq for SearchNode {}

impl Hash for SearchNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.game.play_state().hash(state);
        self.game.grid().hash(state);
    }
}

/// Finds the shortest sequence of moves that takes `game` to [`PlayState::Won`].
///
/// Returns `None` when no win is found within the limits of `config`. A game
/// that is already won yields an empty sequence.
///
/// # Examples
///
/// ```
/// use baba_engine::{parse_map, solve, Direction, Game, SolverConfig};
///
/// let grid = parse_map("5 3\ntext_baba is you . .\ntext_flag is win . .\nbaba . flag . .\n").unwrap();
/// let game = Game::new(grid);
/// let moves = solve(&game, &SolverConfig::for_testing()).unwrap();
/// assert_eq!(moves, vec![Direction::Right, Direction::Right]);
/// ```
pub fn solve(game: &Game, config: &SolverConfig) -> Option<Vec<Direction>> {
    let start = SearchNode {
        game: game.clone(),
        via: None,
        depth: 0,
    };
    let mut expanded = 0usize;

    let path = bfs(
        &start,
        |node| {
            if node.game.is_finished() || node.depth >= config.max_moves {
                return Vec::new();
            }
            if expanded >= config.max_states {
                return Vec::new();
            }
            expanded += 1;
            if expanded == config.max_states {
                debug!("Solver state budget of {} exhausted", config.max_states);
            }

            Direction::all()
                .into_iter()
                .filter_map(|direction| {
                    let mut next = node.game.clone();
                    next.move_player(direction);
                    (next.play_state() != PlayState::Lost).then(|| SearchNode {
                        game: next,
                        via: Some(direction),
                        depth: node.depth + 1,
                    })
                })
                .collect::<Vec<_>>()
        },
        |node| node.game.play_state() == PlayState::Won,
    );

    info!(
        "Solver expanded {} states, {}",
        expanded,
        if path.is_some() { "solved" } else { "no solution" }
    );
    path.map(|nodes| nodes.into_iter().filter_map(|node| node.via).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::parse_map;

    fn game(source: &str) -> Game {
        Game::new(parse_map(source).unwrap())
    }

    #[test]
    fn test_solves_straight_walk() {
        let game = game(
            "5 3\n\
             text_baba is you . .\n\
             text_flag is win . .\n\
             baba . flag . .\n",
        );
        let moves = solve(&game, &SolverConfig::for_testing()).unwrap();
        assert_eq!(moves, vec![Direction::Right, Direction::Right]);
    }

    #[test]
    fn test_already_won_needs_no_moves() {
        let mut game = game(
            "4 3\n\
             text_baba is you .\n\
             text_flag is win .\n\
             baba flag . .\n",
        );
        game.move_player(Direction::Right);
        assert_eq!(game.play_state(), PlayState::Won);
        assert_eq!(solve(&game, &SolverConfig::for_testing()), Some(Vec::new()));
    }

    #[test]
    fn test_unwinnable_level() {
        // No WIN rule anywhere.
        let game = game(
            "3 2\n\
             text_baba is you\n\
             baba . .\n",
        );
        assert_eq!(solve(&game, &SolverConfig::for_testing()), None);
    }

    #[test]
    fn test_state_budget_stops_search() {
        let game = game(
            "6 3\n\
             text_baba is you . . .\n\
             text_flag is win . . .\n\
             baba . . . . flag\n",
        );
        let tight = SolverConfig {
            max_moves: 24,
            max_states: 1,
        };
        assert_eq!(solve(&game, &tight), None);
        assert_eq!(solve(&game, &SolverConfig::default()).map(|m| m.len()), Some(5));
    }

    #[test]
    fn test_solution_replays_to_win() {
        let source = "5 4\n\
                      text_baba is you . .\n\
                      text_flag is win . .\n\
                      . . . . flag\n\
                      baba . . . .\n";
        let start = game(source);
        let moves = solve(&start, &SolverConfig::for_testing()).unwrap();
        assert_eq!(moves.len(), 5);

        let mut replay = start.clone();
        replay.play(&moves);
        assert_eq!(replay.play_state(), PlayState::Won);
    }
}
