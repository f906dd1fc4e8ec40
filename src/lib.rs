//! # Baba Engine
//!
//! A grid puzzle engine where the rules of play are written on the map itself.
//!
//! ## Architecture Overview
//!
//! Word tiles sit on the grid next to ordinary game pieces. Every turn the engine
//! reads the grid for `NOUN IS PROPERTY` and `NOUN IS NOUN` sentences and the
//! resulting rule set decides which pieces the player controls, which ones block,
//! which ones can be pushed and what wins or loses the level.
//!
//! - **Object Catalog**: the closed set of icon kinds and word tiles
//! - **Grid**: a flat row-major array of cells, each holding a set of kinds
//! - **Rule Extractor / Rule Manager**: re-derives the rule set from the grid
//! - **Movement Resolver**: push chains, collisions, win/lose effects
//! - **Game**: one simulation session with move, query and reset
//!
//! Map loading, text rendering and a breadth-first solver live in their own
//! modules on top of the core and are never required by it.

pub mod game;
pub mod loading;
pub mod rendering;
pub mod solver;

// Core module re-exports
pub use game::*;
pub use loading::*;
pub use rendering::*;
pub use solver::*;

/// Core error type for the engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A position query fell outside the loaded grid
    #[error("Position ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        width: usize,
        height: usize,
    },

    /// A move command was not one of the four cardinal directions
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    /// Grid dimensions or cell data are inconsistent
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// An object name did not match any catalog entry
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// Map text could not be parsed
    #[error("Map parse error on line {line}: {message}")]
    MapParse { line: usize, message: String },
}

/// Result type used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Largest width or height accepted for a grid
    pub const MAX_GRID_DIMENSION: usize = 256;

    /// Default number of states the solver may expand
    pub const DEFAULT_SOLVER_STATE_LIMIT: usize = 200_000;

    /// Default number of moves in a solver answer
    pub const DEFAULT_SOLVER_MAX_MOVES: usize = 64;

    /// Seed for the facing of MOVE objects when none is given
    pub const DEFAULT_SEED: u64 = 12345;
}
