//! # Object Catalog
//!
//! Every kind of object that can sit on the grid.
//!
//! There are two families. Icon kinds are the concrete pieces (walls, rocks, the
//! avatar). Text kinds are the word tiles: one naming word per icon kind, the
//! linking word `IS`, and the property words. Property words have no icon.
//!
//! Two icon kinds are never stored on a cell. `Empty` stands for a cell with no
//! objects, and `Text` stands for every word tile at once, so `TEXT IS WIN`
//! applies to all words on the grid.

use crate::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An object kind. Presence on a cell is boolean per kind.
///
/// The declaration order is the catalog order used for deterministic iteration
/// and for picking the player icon when several kinds are YOU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    // Icons
    Empty,
    Baba,
    Wall,
    Rock,
    Tile,
    Flag,
    Water,
    Lava,
    Skull,
    Grass,
    Text,

    // Nouns
    TextEmpty,
    TextBaba,
    TextWall,
    TextRock,
    TextTile,
    TextFlag,
    TextWater,
    TextLava,
    TextSkull,
    TextGrass,
    TextText,

    // Operators
    TextIs,

    // Properties
    TextYou,
    TextWin,
    TextStop,
    TextPush,
    TextDefeat,
    TextSink,
    TextHot,
    TextMelt,
    TextMove,
}

/// A behaviour flag that a property word grants to an icon kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Property {
    You,
    Win,
    Stop,
    Push,
    Defeat,
    Sink,
    Hot,
    Melt,
    Move,
}

impl Property {
    /// Returns every property in catalog order.
    pub fn all() -> [Property; 9] {
        [
            Property::You,
            Property::Win,
            Property::Stop,
            Property::Push,
            Property::Defeat,
            Property::Sink,
            Property::Hot,
            Property::Melt,
            Property::Move,
        ]
    }

    /// The word tile that spells this property.
    pub fn word(self) -> ObjectType {
        match self {
            Property::You => ObjectType::TextYou,
            Property::Win => ObjectType::TextWin,
            Property::Stop => ObjectType::TextStop,
            Property::Push => ObjectType::TextPush,
            Property::Defeat => ObjectType::TextDefeat,
            Property::Sink => ObjectType::TextSink,
            Property::Hot => ObjectType::TextHot,
            Property::Melt => ObjectType::TextMelt,
            Property::Move => ObjectType::TextMove,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word().name().to_uppercase())
    }
}

/// Icon kinds paired with their naming words, in catalog order.
const NOUN_TABLE: [(ObjectType, ObjectType); 11] = [
    (ObjectType::Empty, ObjectType::TextEmpty),
    (ObjectType::Baba, ObjectType::TextBaba),
    (ObjectType::Wall, ObjectType::TextWall),
    (ObjectType::Rock, ObjectType::TextRock),
    (ObjectType::Tile, ObjectType::TextTile),
    (ObjectType::Flag, ObjectType::TextFlag),
    (ObjectType::Water, ObjectType::TextWater),
    (ObjectType::Lava, ObjectType::TextLava),
    (ObjectType::Skull, ObjectType::TextSkull),
    (ObjectType::Grass, ObjectType::TextGrass),
    (ObjectType::Text, ObjectType::TextText),
];

impl ObjectType {
    /// Returns every object kind in catalog order.
    pub fn all() -> Vec<ObjectType> {
        let mut kinds: Vec<ObjectType> = NOUN_TABLE.iter().map(|(icon, _)| *icon).collect();
        kinds.extend(NOUN_TABLE.iter().map(|(_, text)| *text));
        kinds.push(ObjectType::TextIs);
        kinds.extend(Property::all().iter().map(|p| p.word()));
        kinds
    }

    /// Returns every icon kind in catalog order.
    pub fn icons() -> Vec<ObjectType> {
        NOUN_TABLE.iter().map(|(icon, _)| *icon).collect()
    }

    /// Checks whether this is a concrete game piece.
    pub fn is_icon(self) -> bool {
        NOUN_TABLE.iter().any(|(icon, _)| *icon == self)
    }

    /// Checks whether objects of this kind can sit on a cell.
    pub fn is_placeable(self) -> bool {
        !matches!(self, ObjectType::Empty | ObjectType::Text)
    }

    /// Checks whether this is a word tile of any kind.
    pub fn is_text(self) -> bool {
        !self.is_icon()
    }

    /// Checks whether this word names an icon kind.
    pub fn is_noun(self) -> bool {
        NOUN_TABLE.iter().any(|(_, text)| *text == self)
    }

    /// Checks whether this is the linking word `IS`.
    pub fn is_operator(self) -> bool {
        self == ObjectType::TextIs
    }

    /// Checks whether this word is a property word.
    pub fn is_property(self) -> bool {
        self.as_property().is_some()
    }

    /// Returns the property spelled by this word, if it is a property word.
    pub fn as_property(self) -> Option<Property> {
        match self {
            ObjectType::TextYou => Some(Property::You),
            ObjectType::TextWin => Some(Property::Win),
            ObjectType::TextStop => Some(Property::Stop),
            ObjectType::TextPush => Some(Property::Push),
            ObjectType::TextDefeat => Some(Property::Defeat),
            ObjectType::TextSink => Some(Property::Sink),
            ObjectType::TextHot => Some(Property::Hot),
            ObjectType::TextMelt => Some(Property::Melt),
            ObjectType::TextMove => Some(Property::Move),
            _ => None,
        }
    }

    /// Converts an icon kind to the word that names it.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::ObjectType;
    ///
    /// assert_eq!(ObjectType::Baba.icon_to_text(), Some(ObjectType::TextBaba));
    /// assert_eq!(ObjectType::TextYou.icon_to_text(), None);
    /// ```
    pub fn icon_to_text(self) -> Option<ObjectType> {
        NOUN_TABLE
            .iter()
            .find(|(icon, _)| *icon == self)
            .map(|(_, text)| *text)
    }

    /// Converts a naming word to the icon kind it names.
    pub fn text_to_icon(self) -> Option<ObjectType> {
        NOUN_TABLE
            .iter()
            .find(|(_, text)| *text == self)
            .map(|(icon, _)| *icon)
    }

    /// Lowercase name used by the map format.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Empty => "empty",
            ObjectType::Baba => "baba",
            ObjectType::Wall => "wall",
            ObjectType::Rock => "rock",
            ObjectType::Tile => "tile",
            ObjectType::Flag => "flag",
            ObjectType::Water => "water",
            ObjectType::Lava => "lava",
            ObjectType::Skull => "skull",
            ObjectType::Grass => "grass",
            ObjectType::Text => "text",
            ObjectType::TextEmpty => "text_empty",
            ObjectType::TextBaba => "text_baba",
            ObjectType::TextWall => "text_wall",
            ObjectType::TextRock => "text_rock",
            ObjectType::TextTile => "text_tile",
            ObjectType::TextFlag => "text_flag",
            ObjectType::TextWater => "text_water",
            ObjectType::TextLava => "text_lava",
            ObjectType::TextSkull => "text_skull",
            ObjectType::TextGrass => "text_grass",
            ObjectType::TextText => "text_text",
            ObjectType::TextIs => "is",
            ObjectType::TextYou => "you",
            ObjectType::TextWin => "win",
            ObjectType::TextStop => "stop",
            ObjectType::TextPush => "push",
            ObjectType::TextDefeat => "defeat",
            ObjectType::TextSink => "sink",
            ObjectType::TextHot => "hot",
            ObjectType::TextMelt => "melt",
            ObjectType::TextMove => "move",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ObjectType::all()
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| EngineError::UnknownObject(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_icon_has_exactly_one_noun() {
        for icon in ObjectType::icons() {
            let text = icon.icon_to_text().unwrap();
            assert!(text.is_noun());
            assert_eq!(text.text_to_icon(), Some(icon));
        }
    }

    #[test]
    fn test_property_words_have_no_icon() {
        for property in Property::all() {
            let word = property.word();
            assert!(word.is_text());
            assert!(!word.is_noun());
            assert_eq!(word.text_to_icon(), None);
            assert_eq!(word.as_property(), Some(property));
        }
    }

    #[test]
    fn test_families_are_disjoint() {
        for kind in ObjectType::all() {
            let families = [
                kind.is_icon(),
                kind.is_noun(),
                kind.is_operator(),
                kind.is_property(),
            ];
            assert_eq!(families.iter().filter(|f| **f).count(), 1, "{kind:?}");
        }
    }

    #[test]
    fn test_name_round_trip() {
        for kind in ObjectType::all() {
            assert_eq!(kind.name().parse::<ObjectType>().unwrap(), kind);
        }
        assert_eq!("TEXT_BABA".parse::<ObjectType>().unwrap(), ObjectType::TextBaba);
        assert!(matches!(
            "keke".parse::<ObjectType>(),
            Err(EngineError::UnknownObject(_))
        ));
    }

    #[test]
    fn test_only_real_pieces_are_placeable() {
        assert!(!ObjectType::Empty.is_placeable());
        assert!(!ObjectType::Text.is_placeable());
        assert!(ObjectType::TextText.is_placeable());
        assert!(ObjectType::TextMove.is_placeable());
        assert_eq!(ObjectType::TextText.text_to_icon(), Some(ObjectType::Text));
        assert_eq!("move".parse::<ObjectType>().unwrap().as_property(), Some(Property::Move));
    }

    #[test]
    fn test_property_display() {
        assert_eq!(Property::Defeat.to_string(), "DEFEAT");
    }
}
