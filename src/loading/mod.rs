//! # Map Loading
//!
//! Reads levels from a small text format:
//!
//! ```text
//! # comment lines start with '#'
//! 5 3
//! text_baba is you . .
//! . . . . .
//! baba . . rock+tile skull:l
//! ```
//!
//! The first line gives `<width> <height>`; each following line is one grid row
//! of `width` whitespace-separated tokens. A token is `.` for an empty cell or
//! one or more object names joined by `+`. Names are matched case-insensitively.
//! A name may end in `:u`, `:d`, `:l` or `:r` to give the object a facing.

use crate::game::{Cell, Direction, Grid, ObjectType};
use crate::{EngineError, EngineResult};
use log::debug;
use std::fs;
use std::path::Path;

/// Parses a map from text.
///
/// # Examples
///
/// ```
/// use baba_engine::{parse_map, ObjectType, Position};
///
/// let grid = parse_map("2 1\nbaba rock+tile\n").unwrap();
/// assert!(grid.cell_has_type(Position::new(0, 1), ObjectType::Tile).unwrap());
/// ```
pub fn parse_map(source: &str) -> EngineResult<Grid> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (header_line, header) = lines.next().ok_or_else(|| EngineError::MapParse {
        line: 1,
        message: "missing '<width> <height>' header".to_string(),
    })?;
    let (width, height) = parse_header(header_line, header)?;

    let mut cells = Vec::with_capacity(width * height);
    let mut rows = 0;
    let mut last_line = header_line;
    for (line_number, line) in lines {
        if rows == height {
            return Err(parse_error(
                line_number,
                format!("expected {} rows, found more", height),
            ));
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != width {
            return Err(parse_error(
                line_number,
                format!("expected {} cells, found {}", width, tokens.len()),
            ));
        }
        for token in tokens {
            cells.push(parse_cell(line_number, token)?);
        }
        rows += 1;
        last_line = line_number;
    }
    if rows < height {
        return Err(parse_error(
            last_line + 1,
            format!("expected {} rows, found {}", height, rows),
        ));
    }

    debug!("Parsed {}x{} map", width, height);
    Grid::from_cells(width, height, cells)
}

/// Reads and parses a map file.
pub fn load_map(path: impl AsRef<Path>) -> EngineResult<Grid> {
    let path = path.as_ref();
    debug!("Loading map from {}", path.display());
    let source = fs::read_to_string(path)?;
    parse_map(&source)
}

fn parse_header(line: usize, header: &str) -> EngineResult<(usize, usize)> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    let [width, height] = parts.as_slice() else {
        return Err(parse_error(line, "header must be '<width> <height>'"));
    };
    let parse_dimension = |value: &str| {
        value
            .parse::<usize>()
            .map_err(|_| parse_error(line, format!("invalid dimension '{}'", value)))
    };
    let (width, height) = (parse_dimension(*width)?, parse_dimension(*height)?);
    if width == 0 || height == 0 || width.max(height) > crate::config::MAX_GRID_DIMENSION {
        return Err(parse_error(
            line,
            format!("unsupported grid size {}x{}", width, height),
        ));
    }
    Ok((width, height))
}

fn parse_cell(line: usize, token: &str) -> EngineResult<Cell> {
    if token == "." {
        return Ok(Cell::new());
    }
    let mut cell = Cell::new();
    for piece in token.split('+') {
        let (name, facing) = match piece.split_once(':') {
            Some((name, facing)) => {
                let facing = facing
                    .parse::<Direction>()
                    .map_err(|_| parse_error(line, format!("invalid facing '{}'", facing)))?;
                (name, Some(facing))
            }
            None => (piece, None),
        };
        let kind = name
            .parse::<ObjectType>()
            .map_err(|_| parse_error(line, format!("unknown object '{}'", name)))?;
        cell.add_facing(kind, facing);
    }
    Ok(cell)
}

fn parse_error(line: usize, message: impl Into<String>) -> EngineError {
    EngineError::MapParse {
        line,
        message: message.into(),
    }
}
