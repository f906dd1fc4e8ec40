//! # Rules Module
//!
//! Rules in force for the current turn and the manager that answers behaviour
//! queries against them. Rules are plain values keyed by object kind; the
//! manager never points into the grid.

use crate::game::{ObjectType, Property};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// What a rule says about its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Predicate {
    /// `NOUN IS PROPERTY`
    Property(Property),
    /// `NOUN IS NOUN`: every subject object turns into this icon kind.
    /// `BABA IS TEXT` turns each baba into the word BABA.
    Becomes(ObjectType),
}

/// A single `subject IS predicate` sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// The icon kind the rule applies to
    pub subject: ObjectType,
    /// The granted property or transformation target
    pub predicate: Predicate,
}

impl Rule {
    /// Creates a property rule.
    pub fn property(subject: ObjectType, property: Property) -> Self {
        Self {
            subject,
            predicate: Predicate::Property(property),
        }
    }

    /// Creates a transformation rule.
    pub fn becomes(subject: ObjectType, target: ObjectType) -> Self {
        Self {
            subject,
            predicate: Predicate::Becomes(target),
        }
    }

    /// Builds a rule from three word tiles, if they form a sentence.
    ///
    /// # Examples
    ///
    /// ```
    /// use baba_engine::{ObjectType, Property, Rule};
    ///
    /// let rule = Rule::from_words(ObjectType::TextBaba, ObjectType::TextIs, ObjectType::TextYou);
    /// assert_eq!(rule, Some(Rule::property(ObjectType::Baba, Property::You)));
    /// assert_eq!(Rule::from_words(ObjectType::TextIs, ObjectType::TextIs, ObjectType::TextYou), None);
    /// ```
    pub fn from_words(subject: ObjectType, operator: ObjectType, object: ObjectType) -> Option<Self> {
        if !operator.is_operator() {
            return None;
        }
        let subject = subject.text_to_icon()?;
        if let Some(property) = object.as_property() {
            return Some(Self::property(subject, property));
        }
        object.text_to_icon().map(|target| Self::becomes(subject, target))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self.subject.name().to_uppercase();
        match self.predicate {
            Predicate::Property(property) => write!(f, "{} IS {}", subject, property),
            Predicate::Becomes(target) => {
                write!(f, "{} IS {}", subject, target.name().to_uppercase())
            }
        }
    }
}

/// The full collection of rules active in one turn.
pub type RuleSet = BTreeSet<Rule>;

/// Holds the rule set from the latest extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleManager {
    rules: RuleSet,
}

impl RuleManager {
    /// Creates a manager with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager holding `rules`.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Swaps in a freshly extracted rule set.
    pub fn replace(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    /// Drops every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Number of active rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// All active rules in order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Checks whether `rule` is active.
    pub fn contains(&self, rule: &Rule) -> bool {
        self.rules.contains(rule)
    }

    /// Checks whether an explicit rule grants `property` to `icon`.
    pub fn has_property(&self, icon: ObjectType, property: Property) -> bool {
        self.rules.contains(&Rule::property(icon, property))
    }

    /// Checks whether an object of `kind` behaves as having `property`.
    ///
    /// Word tiles answer to `TEXT` rules and are always PUSH on top of them.
    pub fn object_has_property(&self, kind: ObjectType, property: Property) -> bool {
        if kind.is_text() {
            return property == Property::Push || self.has_property(ObjectType::Text, property);
        }
        self.has_property(kind, property)
    }

    /// Every icon kind granted `property`, in catalog order.
    pub fn subjects_with_property(&self, property: Property) -> BTreeSet<ObjectType> {
        self.rules
            .iter()
            .filter(|rule| rule.predicate == Predicate::Property(property))
            .map(|rule| rule.subject)
            .collect()
    }

    /// Active `NOUN IS NOUN` rules as `(from, to)` pairs, identity rules included.
    pub fn transformations(&self) -> Vec<(ObjectType, ObjectType)> {
        self.rules
            .iter()
            .filter_map(|rule| match rule.predicate {
                Predicate::Becomes(target) => Some((rule.subject, target)),
                Predicate::Property(_) => None,
            })
            .collect()
    }

    /// The icon kind treated as the avatar: the first YOU subject in catalog order.
    /// `EMPTY IS YOU` never names an avatar.
    pub fn player_icon(&self) -> Option<ObjectType> {
        self.subjects_with_property(Property::You)
            .into_iter()
            .find(|icon| *icon != ObjectType::Empty)
    }
}
