//! # Game Module
//!
//! Core simulation: the object catalog, the grid, rule extraction and the turn
//! resolver, coordinated by [`Game`].
//!
//! This module contains the fundamental building blocks of the engine:
//! - Object kinds and properties
//! - Grid representation and cell queries
//! - Rule extraction and the rule manager
//! - Movement, push chains and end-of-turn effects

pub mod extractor;
pub mod grid;
pub mod movement;
pub mod objects;
pub mod rules;
pub mod state;

pub use extractor::*;
pub use grid::*;
pub use movement::*;
pub use objects::*;
pub use rules::*;
pub use state::*;

use crate::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (row, column) coordinate on the grid.
///
/// Row 0 is the top row. Coordinates are signed so that a step off the edge is
/// representable and can be rejected by the grid instead of wrapping.
///
/// # Examples
///
/// ```
/// use baba_engine::{Direction, Position};
///
/// let pos = Position::new(4, 1);
/// assert_eq!(pos.step(Direction::Up), Position::new(3, 1));
/// assert_eq!(pos.step(Direction::Right), Position::new(4, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the position one cell away in `direction`.
    ///
    /// Saturates at the `i32` limits; such positions are never on a grid.
    pub fn step(self, direction: Direction) -> Self {
        let delta = direction.to_delta();
        Self::new(
            self.row.saturating_add(delta.row),
            self.col.saturating_add(delta.col),
        )
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.row - other.row).abs() + (self.col - other.col).abs()) as u32
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.row + other.row, self.col + other.col)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.row - other.row, self.col - other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four cardinal move commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::{Direction, Position};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Position::new(-1, 0));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(-1, 0),
            Direction::Down => Position::new(1, 0),
            Direction::Left => Position::new(0, -1),
            Direction::Right => Position::new(0, 1),
        }
    }

    /// Converts a raw command code (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn from_u8(value: u8) -> EngineResult<Direction> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        }
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Accepts full names and the single letters `u`, `d`, `l`, `r`.
    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

/// Session-level outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Moves are accepted
    Playing,
    /// A YOU object reached a WIN object
    Won,
    /// Nothing is controllable any more
    Lost,
}

impl PlayState {
    /// Terminal states reject moves until reset.
    pub fn is_terminal(self) -> bool {
        self != PlayState::Playing
    }
}
