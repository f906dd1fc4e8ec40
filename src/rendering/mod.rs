//! # Rendering Module
//!
//! Plain-text rendering of grids and game sessions for the terminal.
//!
//! Each cell is drawn as one character. When several objects share a cell the
//! one with the highest display priority is shown: word tiles first, then
//! icons controlled by the player, then everything else.

use crate::game::{Game, Grid, ObjectType, Property, RuleManager};
use std::cmp::Reverse;

/// Glyph for a cell with no objects.
pub const EMPTY_GLYPH: char = '.';

/// Gets the display character for an object kind.
pub fn glyph(kind: ObjectType) -> char {
    match kind {
        ObjectType::Empty => EMPTY_GLYPH,
        ObjectType::Baba => 'B',
        ObjectType::Wall => '#',
        ObjectType::Rock => 'O',
        ObjectType::Tile => '_',
        ObjectType::Flag => 'F',
        ObjectType::Water => '~',
        ObjectType::Lava => '^',
        ObjectType::Skull => 'X',
        ObjectType::Grass => '"',
        ObjectType::Text => 'T',
        ObjectType::TextEmpty => 'e',
        ObjectType::TextBaba => 'b',
        ObjectType::TextWall => 'w',
        ObjectType::TextRock => 'r',
        ObjectType::TextTile => 't',
        ObjectType::TextFlag => 'f',
        ObjectType::TextWater => 'a',
        ObjectType::TextLava => 'l',
        ObjectType::TextSkull => 's',
        ObjectType::TextGrass => 'g',
        ObjectType::TextText => 'x',
        ObjectType::TextIs => '=',
        ObjectType::TextYou => '@',
        ObjectType::TextWin => '!',
        ObjectType::TextStop => '|',
        ObjectType::TextPush => '>',
        ObjectType::TextDefeat => '*',
        ObjectType::TextSink => '0',
        ObjectType::TextHot => '&',
        ObjectType::TextMelt => '$',
        ObjectType::TextMove => '%',
    }
}

fn display_priority(kind: ObjectType, rules: Option<&RuleManager>) -> u8 {
    if kind.is_text() {
        2
    } else if rules.is_some_and(|rules| rules.has_property(kind, Property::You)) {
        1
    } else {
        0
    }
}

fn render(grid: &Grid, rules: Option<&RuleManager>) -> String {
    let mut output = String::with_capacity((grid.width() + 1) * grid.height());
    for (index, pos) in grid.positions().enumerate() {
        if index > 0 && index % grid.width() == 0 {
            output.push('\n');
        }
        let top = grid.at(pos).ok().and_then(|cell| {
            cell.objects()
                .min_by_key(|kind| (Reverse(display_priority(*kind, rules)), *kind))
        });
        output.push(top.map_or(EMPTY_GLYPH, glyph));
    }
    output
}

/// Renders a grid, one line per row.
///
/// # Examples
///
/// ```
/// use baba_engine::{parse_map, render_grid};
///
/// let grid = parse_map("3 2\ntext_baba is you\nbaba . rock+tile\n").unwrap();
/// assert_eq!(render_grid(&grid), "b=@\nB.O");
/// ```
pub fn render_grid(grid: &Grid) -> String {
    render(grid, None)
}

/// Renders the current grid followed by a status line and the active rules.
pub fn render_game(game: &Game) -> String {
    let rules = game.rule_manager();
    let mut output = render(game.grid(), Some(rules));
    output.push_str(&format!(
        "\nTurn {} | {:?} | player: {}",
        game.turn_number(),
        game.play_state(),
        game.player_icon()
            .map_or_else(|| "none".to_string(), |icon| icon.to_string())
    ));
    for rule in rules.rules() {
        output.push_str(&format!("\n  {}", rule));
    }
    output
}
