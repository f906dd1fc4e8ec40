//! # Game State Module
//!
//! One simulation session: the grid, the rules read from it, the play state and
//! the player icon.
//!
//! A [`Game`] owns everything it touches, so independent simulations (a solver
//! exploring move sequences, say) simply clone it.

use crate::game::{
    Direction, Grid, MovementResolver, ObjectType, PlayState, RuleExtractor, RuleManager,
    TurnEvent, TurnReport,
};
use crate::{config, EngineError, EngineResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Central game state for one level.
///
/// Every move is resolved to completion before control returns; callers never
/// observe a half-applied turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// The grid as it was loaded, restored by `reset`
    initial_grid: Grid,
    /// The current grid
    grid: Grid,
    /// Rules read from the current grid
    rule_manager: RuleManager,
    /// Current play state
    play_state: PlayState,
    /// The icon kind currently bound to YOU
    player_icon: Option<ObjectType>,
    /// Number of accepted moves since construction or reset
    turn_number: u64,
    /// Seed the game started from, restored by `reset`
    seed: u64,
    /// Seed for the next turn's random choices
    rng_state: u64,
}

impl Game {
    /// Creates a game from a fully loaded grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::{parse_map, Game, ObjectType, PlayState};
    ///
    /// let grid = parse_map("3 2\ntext_baba is you\nbaba . .\n").unwrap();
    /// let game = Game::new(grid);
    /// assert_eq!(game.play_state(), PlayState::Playing);
    /// assert_eq!(game.player_icon(), Some(ObjectType::Baba));
    /// assert_eq!(game.rule_manager().rule_count(), 1);
    /// ```
    pub fn new(grid: Grid) -> Self {
        Self::with_seed(grid, config::DEFAULT_SEED)
    }

    /// Creates a game whose random choices (the first facing of a MOVE object)
    /// follow `seed`. Equal seeds replay identically.
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        let mut game = Self {
            initial_grid: grid.clone(),
            grid,
            rule_manager: RuleManager::new(),
            play_state: PlayState::Playing,
            player_icon: None,
            turn_number: 0,
            seed,
            rng_state: seed,
        };
        game.refresh_rules();
        info!(
            "Game created: {}x{} grid, {} rules, player icon {:?}",
            game.grid.width(),
            game.grid.height(),
            game.rule_manager.rule_count(),
            game.player_icon
        );
        game
    }

    /// Restores the loaded layout and starts over.
    pub fn reset(&mut self) {
        self.grid = self.initial_grid.clone();
        self.rule_manager.clear();
        self.refresh_rules();
        self.play_state = PlayState::Playing;
        self.turn_number = 0;
        self.rng_state = self.seed;
        info!("Game reset");
    }

    /// Moves every YOU object one cell in `direction` and settles the turn.
    ///
    /// When the game is already won or lost the move is ignored and the report
    /// carries a single [`TurnEvent::MoveRejected`].
    pub fn move_player(&mut self, direction: Direction) -> TurnReport {
        if self.play_state.is_terminal() {
            debug!("Ignoring {:?}: game is {:?}", direction, self.play_state);
            return TurnReport::rejected(direction, self.play_state);
        }

        self.turn_number += 1;
        let mut rng = StdRng::seed_from_u64(self.rng_state);
        let mut report = MovementResolver::new().resolve(
            &mut self.grid,
            &mut self.rule_manager,
            direction,
            &mut rng,
        );
        self.rng_state = rng.gen();
        self.player_icon = self.rule_manager.player_icon();

        if report.play_state != self.play_state {
            info!(
                "Turn {}: {:?} -> {:?}",
                self.turn_number, self.play_state, report.play_state
            );
            report.events.push(TurnEvent::StateChanged {
                from: self.play_state,
                to: report.play_state,
            });
            self.play_state = report.play_state;
        }
        report
    }

    /// Parses a direction token (`u`, `down`, ...) and moves.
    pub fn move_player_str(&mut self, direction: &str) -> EngineResult<TurnReport> {
        let direction = direction.parse::<Direction>()?;
        Ok(self.move_player(direction))
    }

    /// Moves by raw command code (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn move_player_code(&mut self, code: u8) -> EngineResult<TurnReport> {
        Ok(self.move_player(Direction::from_u8(code)?))
    }

    /// Plays a sequence of moves, stopping early once the game ends.
    pub fn play(&mut self, moves: &[Direction]) -> Vec<TurnReport> {
        let mut reports = Vec::new();
        for direction in moves {
            if self.play_state.is_terminal() {
                break;
            }
            reports.push(self.move_player(*direction));
        }
        reports
    }

    fn refresh_rules(&mut self) {
        self.rule_manager
            .replace(RuleExtractor::new().extract(&self.grid));
        self.player_icon = self.rule_manager.player_icon();
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid as loaded.
    pub fn initial_grid(&self) -> &Grid {
        &self.initial_grid
    }

    /// Rules in force.
    pub fn rule_manager(&self) -> &RuleManager {
        &self.rule_manager
    }

    /// Current play state.
    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// The icon kind currently bound to YOU, if any.
    pub fn player_icon(&self) -> Option<ObjectType> {
        self.player_icon
    }

    /// Number of accepted moves since construction or the last reset.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    /// The seed this game started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Checks if the game has ended.
    pub fn is_finished(&self) -> bool {
        self.play_state.is_terminal()
    }

    /// Saves the game state to JSON.
    pub fn save_to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(EngineError::from)
    }

    /// Loads game state from JSON.
    ///
    /// Both grids are checked on the way in, and the current grid must have the
    /// dimensions of the loaded one.
    pub fn load_from_json(json: &str) -> EngineResult<Self> {
        let game: Self = serde_json::from_str(json)?;
        let (initial, current) = (&game.initial_grid, &game.grid);
        if initial.width() != current.width() || initial.height() != current.height() {
            return Err(EngineError::InvalidGrid(format!(
                "snapshot grid is {}x{} but the level is {}x{}",
                current.width(),
                current.height(),
                initial.width(),
                initial.height()
            )));
        }
        Ok(game)
    }
}
