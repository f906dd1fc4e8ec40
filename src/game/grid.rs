//! # Grid Module
//!
//! The board: a fixed-size, row-major array of cells. Each cell holds a set of
//! object kinds. The grid knows nothing about rules; whether two kinds may share
//! a cell is decided by the turn resolver.
//!
//! Each object also carries an optional facing. Objects get one when they move
//! and MOVE objects walk along it.

use crate::game::{Direction, ObjectType, Position};
use crate::{config, EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The contents of one grid position.
///
/// `Empty` and `Text` are never stored. A cell with no objects reports that it
/// holds `Empty`, a cell with a word tile reports that it holds `Text`, and
/// placing either does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Piece>", into = "Vec<Piece>")]
pub struct Cell {
    objects: BTreeMap<ObjectType, Option<Direction>>,
}

/// Serialized form of one object on a cell.
#[derive(Serialize, Deserialize)]
struct Piece {
    kind: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facing: Option<Direction>,
}

impl From<Vec<Piece>> for Cell {
    fn from(pieces: Vec<Piece>) -> Self {
        let mut cell = Cell::new();
        for piece in pieces {
            cell.add_facing(piece.kind, piece.facing);
        }
        cell
    }
}

impl From<Cell> for Vec<Piece> {
    fn from(cell: Cell) -> Self {
        cell.objects
            .into_iter()
            .map(|(kind, facing)| Piece { kind, facing })
            .collect()
    }
}

impl Cell {
    /// Creates an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell holding the given kinds.
    pub fn with_objects(kinds: impl IntoIterator<Item = ObjectType>) -> Self {
        let mut cell = Self::new();
        for kind in kinds {
            cell.add(kind);
        }
        cell
    }

    /// Checks whether the cell holds `kind`.
    pub fn has(&self, kind: ObjectType) -> bool {
        match kind {
            ObjectType::Empty => self.objects.is_empty(),
            ObjectType::Text => self.objects.keys().any(|kind| kind.is_text()),
            _ => self.objects.contains_key(&kind),
        }
    }

    /// Checks whether the cell holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the kinds on this cell in catalog order.
    pub fn objects(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.objects.keys().copied()
    }

    /// The way `kind` faces, if it is here and has ever been given a facing.
    pub fn facing(&self, kind: ObjectType) -> Option<Direction> {
        self.objects.get(&kind).copied().flatten()
    }

    /// Returns the word tiles on this cell in catalog order.
    pub fn text_objects(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.objects().filter(|kind| kind.is_text())
    }

    /// Number of kinds on this cell.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn add(&mut self, kind: ObjectType) {
        self.add_facing(kind, None);
    }

    /// Adds `kind`. A known facing replaces the one already stored.
    pub(crate) fn add_facing(&mut self, kind: ObjectType, facing: Option<Direction>) {
        if !kind.is_placeable() {
            return;
        }
        let slot = self.objects.entry(kind).or_insert(None);
        if facing.is_some() {
            *slot = facing;
        }
    }

    pub(crate) fn remove(&mut self, kind: ObjectType) -> bool {
        self.objects.remove(&kind).is_some()
    }

    pub(crate) fn turn(&mut self, kind: ObjectType, facing: Direction) {
        if let Some(slot) = self.objects.get_mut(&kind) {
            *slot = Some(facing);
        }
    }
}

/// A rectangular grid of cells with fixed dimensions.
///
/// Deserialization goes through [`Grid::from_cells`], so a snapshot whose cell
/// count does not match its dimensions is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = EngineError;

    fn try_from(raw: RawGrid) -> EngineResult<Self> {
        Grid::from_cells(raw.width, raw.height, raw.cells)
    }
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::{Grid, ObjectType, Position};
    ///
    /// let mut grid = Grid::new(3, 2).unwrap();
    /// grid.place_object(Position::new(1, 2), ObjectType::Rock).unwrap();
    /// assert!(grid.cell_has_type(Position::new(1, 2), ObjectType::Rock).unwrap());
    /// assert!(grid.at(Position::new(2, 0)).is_err());
    /// ```
    pub fn new(width: usize, height: usize) -> EngineResult<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::new(); width * height],
        })
    }

    /// Creates a grid from row-major cells.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> EngineResult<Self> {
        Self::check_dimensions(width, height)?;
        if cells.len() != width * height {
            return Err(EngineError::InvalidGrid(format!(
                "expected {} cells for a {}x{} grid, got {}",
                width * height,
                width,
                height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn check_dimensions(width: usize, height: usize) -> EngineResult<()> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidGrid(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if width > config::MAX_GRID_DIMENSION || height > config::MAX_GRID_DIMENSION {
            return Err(EngineError::InvalidGrid(format!(
                "dimensions {}x{} exceed the maximum of {}",
                width,
                height,
                config::MAX_GRID_DIMENSION
            )));
        }
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.height
            && (pos.col as usize) < self.width
    }

    fn index(&self, pos: Position) -> EngineResult<usize> {
        if !self.contains(pos) {
            return Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.row as usize * self.width + pos.col as usize)
    }

    /// Returns the cell at `pos`.
    pub fn at(&self, pos: Position) -> EngineResult<&Cell> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    /// Checks whether the cell at `pos` holds `kind`.
    pub fn cell_has_type(&self, pos: Position, kind: ObjectType) -> EngineResult<bool> {
        Ok(self.at(pos)?.has(kind))
    }

    /// Returns every position holding `kind`, in row-major order.
    pub fn positions_of(&self, kind: ObjectType) -> Vec<Position> {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, cell)| cell.has(kind))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Places `kind` on the cell at `pos`.
    pub fn place_object(&mut self, pos: Position, kind: ObjectType) -> EngineResult<()> {
        let index = self.index(pos)?;
        self.cells[index].add(kind);
        Ok(())
    }

    /// Places `kind` on the cell at `pos`, facing `facing`.
    pub fn place_object_facing(
        &mut self,
        pos: Position,
        kind: ObjectType,
        facing: Direction,
    ) -> EngineResult<()> {
        let index = self.index(pos)?;
        self.cells[index].add_facing(kind, Some(facing));
        Ok(())
    }

    /// Removes `kind` from the cell at `pos`. Removing an absent kind is a no-op.
    pub fn remove_object(&mut self, pos: Position, kind: ObjectType) -> EngineResult<()> {
        let index = self.index(pos)?;
        self.cells[index].remove(kind);
        Ok(())
    }

    /// The facing of `kind` at `pos`, if it has one.
    pub fn facing(&self, pos: Position, kind: ObjectType) -> EngineResult<Option<Direction>> {
        Ok(self.at(pos)?.facing(kind))
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let index = self.index(pos).ok()?;
        self.cells.get_mut(index)
    }

    /// Takes `kind` off the cell at `pos`. Returns whether it was there.
    pub(crate) fn take(&mut self, pos: Position, kind: ObjectType) -> bool {
        self.cell_mut(pos).is_some_and(|cell| cell.remove(kind))
    }

    /// Puts `kind` on the cell at `pos`. Returns false when `pos` is off the grid.
    pub(crate) fn put(
        &mut self,
        pos: Position,
        kind: ObjectType,
        facing: Option<Direction>,
    ) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.add_facing(kind, facing);
                true
            }
            None => false,
        }
    }

    /// Points `kind` at `pos` in `facing`. Absent objects are left alone.
    pub(crate) fn turn(&mut self, pos: Position, kind: ObjectType, facing: Direction) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.turn(kind, facing);
        }
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        (0..(self.width * self.height) as i32).map(move |i| Position::new(i / width, i % width))
    }

    /// Iterates over every `(position, kind)` pair in row-major order.
    pub fn objects(&self) -> impl Iterator<Item = (Position, ObjectType)> + '_ {
        self.positions()
            .zip(self.cells.iter())
            .flat_map(|(pos, cell)| cell.objects().map(move |kind| (pos, kind)))
    }

    /// Checks whether any cell holds `kind`.
    pub fn has_any(&self, kind: ObjectType) -> bool {
        self.cells.iter().any(|cell| cell.has(kind))
    }
}
