//! # Rule Extraction
//!
//! Reads sentences off the grid. Every row is scanned left to right and every
//! column top to bottom in windows of three cells; a window whose cells hold a
//! noun, `IS`, and a noun or property forms a rule. Both scans contribute and a
//! word tile may take part in a horizontal and a vertical sentence at once.

use crate::game::{Direction, Grid, ObjectType, Position, Rule, RuleSet};
use log::trace;

/// Scans a grid for `NOUN IS PROPERTY` and `NOUN IS NOUN` sentences.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleExtractor;

impl RuleExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Returns every rule spelled on `grid`.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::{Grid, ObjectType, Position, Property, Rule, RuleExtractor};
    ///
    /// let mut grid = Grid::new(3, 1).unwrap();
    /// grid.place_object(Position::new(0, 0), ObjectType::TextBaba).unwrap();
    /// grid.place_object(Position::new(0, 1), ObjectType::TextIs).unwrap();
    /// grid.place_object(Position::new(0, 2), ObjectType::TextYou).unwrap();
    ///
    /// let rules = RuleExtractor::new().extract(&grid);
    /// assert!(rules.contains(&Rule::property(ObjectType::Baba, Property::You)));
    /// ```
    pub fn extract(&self, grid: &Grid) -> RuleSet {
        let mut rules = RuleSet::new();
        for start in grid.positions() {
            for direction in [Direction::Right, Direction::Down] {
                self.extract_window(grid, start, direction, &mut rules);
            }
        }
        rules
    }

    fn extract_window(
        &self,
        grid: &Grid,
        start: Position,
        direction: Direction,
        rules: &mut RuleSet,
    ) {
        let middle = start.step(direction);
        let end = middle.step(direction);
        let (Ok(first), Ok(second), Ok(third)) = (grid.at(start), grid.at(middle), grid.at(end))
        else {
            return;
        };
        if !second.has(ObjectType::TextIs) {
            return;
        }

        for subject in first.text_objects().filter(|kind| kind.is_noun()) {
            for object in third.text_objects() {
                if let Some(rule) = Rule::from_words(subject, ObjectType::TextIs, object) {
                    trace!("Found rule {} starting at {} ({:?})", rule, start, direction);
                    rules.insert(rule);
                }
            }
        }
    }
}

/// Convenience wrapper for [`RuleExtractor::extract`].
pub fn extract_rules(grid: &Grid) -> RuleSet {
    RuleExtractor::new().extract(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Property;

    fn place_line(grid: &mut Grid, start: Position, direction: Direction, words: &[ObjectType]) {
        let mut pos = start;
        for word in words {
            grid.place_object(pos, *word).unwrap();
            pos = pos.step(direction);
        }
    }

    #[test]
    fn test_horizontal_and_vertical_sentences() {
        let mut grid = Grid::new(5, 5).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::TextBaba, ObjectType::TextIs, ObjectType::TextYou],
        );
        place_line(
            &mut grid,
            Position::new(2, 4),
            Direction::Down,
            &[ObjectType::TextFlag, ObjectType::TextIs, ObjectType::TextWin],
        );

        let rules = extract_rules(&grid);
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&Rule::property(ObjectType::Baba, Property::You)));
        assert!(rules.contains(&Rule::property(ObjectType::Flag, Property::Win)));
    }

    #[test]
    fn test_reversed_sentences_do_not_count() {
        let mut grid = Grid::new(3, 3).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::TextYou, ObjectType::TextIs, ObjectType::TextBaba],
        );
        place_line(
            &mut grid,
            Position::new(2, 0),
            Direction::Right,
            &[ObjectType::TextBaba, ObjectType::TextIs, ObjectType::TextYou],
        );
        // Column 0 reads YOU / empty / BABA, nothing vertical.
        let rules = extract_rules(&grid);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_shared_word_in_both_directions() {
        // BABA IS YOU across, BABA IS WIN down, sharing the BABA tile.
        let mut grid = Grid::new(3, 3).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::TextBaba, ObjectType::TextIs, ObjectType::TextYou],
        );
        place_line(
            &mut grid,
            Position::new(1, 0),
            Direction::Down,
            &[ObjectType::TextIs, ObjectType::TextWin],
        );

        let rules = extract_rules(&grid);
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&Rule::property(ObjectType::Baba, Property::Win)));
    }

    #[test]
    fn test_noun_is_noun() {
        let mut grid = Grid::new(3, 1).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::TextRock, ObjectType::TextIs, ObjectType::TextFlag],
        );
        let rules = extract_rules(&grid);
        assert_eq!(
            rules.into_iter().collect::<Vec<_>>(),
            vec![Rule::becomes(ObjectType::Rock, ObjectType::Flag)]
        );
    }

    #[test]
    fn test_only_three_word_windows() {
        // BABA IS ROCK IS PUSH yields two overlapping windows, nothing chained.
        let mut grid = Grid::new(5, 1).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[
                ObjectType::TextBaba,
                ObjectType::TextIs,
                ObjectType::TextRock,
                ObjectType::TextIs,
                ObjectType::TextPush,
            ],
        );
        let rules = extract_rules(&grid);
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&Rule::becomes(ObjectType::Baba, ObjectType::Rock)));
        assert!(rules.contains(&Rule::property(ObjectType::Rock, Property::Push)));
        assert!(!rules.contains(&Rule::property(ObjectType::Baba, Property::Push)));
    }

    #[test]
    fn test_duplicate_sentences_collapse() {
        let mut grid = Grid::new(3, 2).unwrap();
        for row in 0..2 {
            place_line(
                &mut grid,
                Position::new(row, 0),
                Direction::Right,
                &[ObjectType::TextWall, ObjectType::TextIs, ObjectType::TextStop],
            );
        }
        assert_eq!(extract_rules(&grid).len(), 1);
    }

    #[test]
    fn test_stacked_words_all_combine() {
        let mut grid = Grid::new(3, 1).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::TextBaba, ObjectType::TextIs, ObjectType::TextYou],
        );
        grid.place_object(Position::new(0, 0), ObjectType::TextRock).unwrap();
        grid.place_object(Position::new(0, 2), ObjectType::TextPush).unwrap();
        assert_eq!(extract_rules(&grid).len(), 4);
    }

    #[test]
    fn test_icons_do_not_form_sentences() {
        let mut grid = Grid::new(3, 1).unwrap();
        place_line(
            &mut grid,
            Position::new(0, 0),
            Direction::Right,
            &[ObjectType::Baba, ObjectType::TextIs, ObjectType::TextYou],
        );
        assert!(extract_rules(&grid).is_empty());
    }
}
