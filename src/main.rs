//! # Baba Engine Main Entry Point
//!
//! Loads a map, plays a move sequence (or a seeded random walk), optionally
//! searches for a solution, and prints the resulting grid and state.

use baba_engine::{load_map, render_game, solve, Direction, EngineResult, Game, SolverConfig};
use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Command line arguments for the engine.
#[derive(Parser, Debug)]
#[command(name = "baba-engine")]
#[command(about = "A grid puzzle engine where the rules are written on the map")]
#[command(version)]
struct Args {
    /// Map file to load
    map: PathBuf,

    /// Moves to play, one letter each (u, d, l, r)
    #[arg(short, long)]
    moves: Option<String>,

    /// Search for the shortest winning sequence from the starting position
    #[arg(long)]
    solve: bool,

    /// Longest sequence the solver considers
    #[arg(long, default_value_t = baba_engine::config::DEFAULT_SOLVER_MAX_MOVES)]
    max_moves: usize,

    /// Random seed for MOVE facings and the random walk
    #[arg(short, long, default_value_t = baba_engine::config::DEFAULT_SEED)]
    seed: u64,

    /// Number of random moves to play after the scripted ones
    #[arg(long, default_value_t = 0)]
    random_steps: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> EngineResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level);

    info!("Starting Baba Engine v{}", baba_engine::VERSION);

    let grid = load_map(&args.map)?;
    let mut game = Game::with_seed(grid, args.seed);
    println!("{}\n", render_game(&game));

    if args.solve {
        run_solver(&game, args.max_moves);
    }

    if let Some(moves) = &args.moves {
        let moves = parse_moves(moves)?;
        info!("Playing {} scripted moves", moves.len());
        game.play(&moves);
    }

    if args.random_steps > 0 {
        info!(
            "Random walk of {} steps with seed {}",
            args.random_steps, args.seed
        );
        random_walk(&mut game, args.seed, args.random_steps)?;
    }

    println!("{}", render_game(&game));
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn parse_moves(moves: &str) -> EngineResult<Vec<Direction>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_string().parse::<Direction>())
        .collect()
}

fn random_walk(game: &mut Game, seed: u64, steps: usize) -> EngineResult<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..steps {
        if game.is_finished() {
            break;
        }
        game.move_player_code(rng.gen_range(0..4))?;
    }
    Ok(())
}

fn run_solver(game: &Game, max_moves: usize) {
    match solve(game, &SolverConfig::new(max_moves)) {
        Some(moves) => {
            let letters: String = moves
                .iter()
                .map(|direction| match direction {
                    Direction::Up => 'u',
                    Direction::Down => 'd',
                    Direction::Left => 'l',
                    Direction::Right => 'r',
                })
                .collect();
            println!("Solution ({} moves): {}\n", moves.len(), letters);
        }
        None => {
            warn!("Solver found no solution within {} moves", max_moves);
            println!("No solution found\n");
        }
    }
}
