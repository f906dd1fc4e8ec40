//! # Movement Module
//!
//! Resolves one directional move and everything that follows from it.
//!
//! A turn runs in a fixed order:
//! 1. every YOU object turns to face the move and tries to step, pushing chains
//!    of PUSH objects ahead of it
//! 2. every MOVE object steps along its facing, turning around when blocked
//! 3. rules are re-read from the settled grid
//! 4. `NOUN IS NOUN` transformations
//! 5. WIN, then DEFEAT, then SINK, then HOT/MELT
//! 6. rules are read again and the play state is decided
//!
//! An object standing on both a WIN and a DEFEAT object therefore wins.

use crate::game::{
    Direction, Grid, ObjectType, PlayState, Position, Property, Rule, RuleExtractor, RuleManager,
};
use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// An object stepped or was pushed one cell
    ObjectMoved {
        kind: ObjectType,
        from: Position,
        to: Position,
    },
    /// A transformation rule replaced an object
    ObjectTransformed {
        at: Position,
        from: ObjectType,
        to: ObjectType,
    },
    /// An object was removed from the grid by a property effect
    ObjectDestroyed {
        at: Position,
        kind: ObjectType,
        cause: Property,
    },
    /// The rule set differs from the one in force before the move
    RulesChanged { added: Vec<Rule>, removed: Vec<Rule> },
    /// The play state changed
    StateChanged { from: PlayState, to: PlayState },
    /// The move was ignored because the game is over
    MoveRejected { state: PlayState },
}

/// Outcome of one move command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The requested direction
    pub direction: Direction,
    /// Everything that happened, in resolution order
    pub events: Vec<TurnEvent>,
    /// Play state after the turn
    pub play_state: PlayState,
}

impl TurnReport {
    /// Report for a move refused because the game already ended.
    pub fn rejected(direction: Direction, state: PlayState) -> Self {
        Self {
            direction,
            events: vec![TurnEvent::MoveRejected { state }],
            play_state: state,
        }
    }

    /// Number of objects that changed cell.
    pub fn moved_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TurnEvent::ObjectMoved { .. }))
            .count()
    }

    /// Checks whether any object changed cell, changed kind or was removed.
    /// Turning in place does not count.
    pub fn grid_changed(&self) -> bool {
        self.events.iter().any(|event| {
            matches!(
                event,
                TurnEvent::ObjectMoved { .. }
                    | TurnEvent::ObjectTransformed { .. }
                    | TurnEvent::ObjectDestroyed { .. }
            )
        })
    }
}

/// Objects scheduled to step this phase, with the direction each one takes.
type MovePlan = BTreeMap<(Position, ObjectType), Direction>;

/// Applies move commands to a grid under a rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementResolver {
    extractor: RuleExtractor,
}

impl MovementResolver {
    /// Creates a new resolver.
    pub fn new() -> Self {
        Self {
            extractor: RuleExtractor::new(),
        }
    }

    /// Resolves one full turn. `rules` is left holding the post-move rule set.
    ///
    /// `rng` picks a facing for MOVE objects that have never had one.
    pub fn resolve<R: Rng>(
        &self,
        grid: &mut Grid,
        rules: &mut RuleManager,
        direction: Direction,
        rng: &mut R,
    ) -> TurnReport {
        let rules_before = rules.rules().clone();
        let mut events = Vec::new();

        self.move_you(grid, rules, direction, &mut events);
        self.move_movers(grid, rules, rng, &mut events);
        rules.replace(self.extractor.extract(grid));

        self.apply_transformations(grid, rules, &mut events);
        let won = self.touches_win(grid, rules);
        self.destroy_defeated(grid, rules, &mut events);
        self.destroy_sunk(grid, rules, &mut events);
        self.destroy_melted(grid, rules, &mut events);

        rules.replace(self.extractor.extract(grid));
        let added: Vec<Rule> = rules.rules().difference(&rules_before).copied().collect();
        let removed: Vec<Rule> = rules_before.difference(rules.rules()).copied().collect();
        if !added.is_empty() || !removed.is_empty() {
            debug!(
                "Rules changed: +{} -{} (now {})",
                added.len(),
                removed.len(),
                rules.rule_count()
            );
            events.push(TurnEvent::RulesChanged { added, removed });
        }

        let play_state = if won {
            PlayState::Won
        } else if !self.has_controllable(grid, rules) {
            PlayState::Lost
        } else {
            PlayState::Playing
        };

        TurnReport {
            direction,
            events,
            play_state,
        }
    }

    /// Checks whether an object at `from` could step in `direction`.
    ///
    /// Leaving the grid is blocked. A PUSH object in the way must itself be able
    /// to step; a STOP object that is not PUSH blocks outright. The walk visits
    /// each cell ahead at most once.
    pub fn can_move(
        &self,
        grid: &Grid,
        rules: &RuleManager,
        from: Position,
        direction: Direction,
    ) -> bool {
        let mut cursor = from;
        loop {
            cursor = cursor.step(direction);
            let Ok(cell) = grid.at(cursor) else {
                return false;
            };

            let mut pushes = false;
            for kind in cell.objects() {
                if rules.object_has_property(kind, Property::Push) {
                    pushes = true;
                } else if rules.object_has_property(kind, Property::Stop) {
                    return false;
                }
            }
            if !pushes {
                return true;
            }
        }
    }

    /// Every YOU object faces `direction` and steps if it can.
    fn move_you(
        &self,
        grid: &mut Grid,
        rules: &RuleManager,
        direction: Direction,
        events: &mut Vec<TurnEvent>,
    ) {
        let you: Vec<(Position, ObjectType)> = grid
            .objects()
            .filter(|(_, kind)| rules.object_has_property(*kind, Property::You))
            .collect();

        let mut movers = Vec::new();
        for (pos, kind) in you {
            grid.turn(pos, kind, direction);
            if self.can_move(grid, rules, pos, direction) {
                movers.push((pos, kind, direction));
            } else {
                trace!("{} at {} is blocked", kind, pos);
            }
        }

        let plan = self.plan_pushes(grid, rules, movers);
        debug!("{:?}: {} objects move", direction, plan.len());
        self.apply_moves(grid, &plan, events);
    }

    /// Every MOVE object steps along its facing. A blocked mover turns around and
    /// steps back if it can; otherwise it only turns.
    fn move_movers<R: Rng>(
        &self,
        grid: &mut Grid,
        rules: &RuleManager,
        rng: &mut R,
        events: &mut Vec<TurnEvent>,
    ) {
        let walkers: Vec<(Position, ObjectType)> = grid
            .objects()
            .filter(|(_, kind)| rules.object_has_property(*kind, Property::Move))
            .collect();
        if walkers.is_empty() {
            return;
        }

        let mut movers = Vec::new();
        for (pos, kind) in walkers {
            let facing = match grid.facing(pos, kind) {
                Ok(Some(facing)) => facing,
                _ => {
                    let facing = Direction::all()[rng.gen_range(0..4)];
                    trace!("{} at {} starts facing {:?}", kind, pos, facing);
                    grid.turn(pos, kind, facing);
                    facing
                }
            };

            if self.can_move(grid, rules, pos, facing) {
                movers.push((pos, kind, facing));
                continue;
            }
            let back = facing.reverse();
            grid.turn(pos, kind, back);
            if self.can_move(grid, rules, pos, back) {
                movers.push((pos, kind, back));
            } else {
                trace!("{} at {} is boxed in", kind, pos);
            }
        }

        let plan = self.plan_pushes(grid, rules, movers);
        debug!("MOVE: {} objects move", plan.len());
        self.apply_moves(grid, &plan, events);
    }

    /// The movers plus the PUSH chains in front of them. An object already in the
    /// plan keeps the first direction it was given.
    fn plan_pushes(
        &self,
        grid: &Grid,
        rules: &RuleManager,
        movers: Vec<(Position, ObjectType, Direction)>,
    ) -> MovePlan {
        let mut plan: MovePlan = movers
            .iter()
            .map(|(pos, kind, direction)| ((*pos, *kind), *direction))
            .collect();

        for (pos, _, direction) in movers {
            let mut cursor = pos.step(direction);
            loop {
                let Ok(cell) = grid.at(cursor) else {
                    break;
                };
                let pushed: Vec<ObjectType> = cell
                    .objects()
                    .filter(|kind| rules.object_has_property(*kind, Property::Push))
                    .filter(|kind| !plan.contains_key(&(cursor, *kind)))
                    .collect();
                if pushed.is_empty() {
                    break;
                }
                for kind in pushed {
                    plan.insert((cursor, kind), direction);
                }
                cursor = cursor.step(direction);
            }
        }
        plan
    }

    /// Moves every planned object in lock-step: all removals, then all
    /// placements. Each moved object ends up facing the way it went.
    fn apply_moves(&self, grid: &mut Grid, plan: &MovePlan, events: &mut Vec<TurnEvent>) {
        for (from, kind) in plan.keys() {
            let lifted = grid.take(*from, *kind);
            debug_assert!(lifted, "planned {} missing at {}", kind, from);
        }
        for ((from, kind), direction) in plan {
            let to = from.step(*direction);
            // Planned moves always land on the grid.
            if grid.put(to, *kind, Some(*direction)) {
                trace!("{} moved {} -> {}", kind, from, to);
                events.push(TurnEvent::ObjectMoved {
                    kind: *kind,
                    from: *from,
                    to,
                });
            }
        }
    }

    /// `X IS Y` turns every X into Y unless `X IS X` is also active.
    ///
    /// `X IS TEXT` turns X into its own word. `TEXT IS Y` and `EMPTY IS Y` change
    /// nothing. A transformed object keeps its facing.
    fn apply_transformations(
        &self,
        grid: &mut Grid,
        rules: &RuleManager,
        events: &mut Vec<TurnEvent>,
    ) {
        let transformations = rules.transformations();
        let protected: BTreeSet<ObjectType> = transformations
            .iter()
            .filter(|(from, to)| from == to)
            .map(|(from, _)| *from)
            .collect();

        let mut changes = Vec::new();
        for (from, to) in transformations {
            if from == to || !from.is_placeable() || protected.contains(&from) {
                continue;
            }
            let to = match to {
                ObjectType::Text => from.icon_to_text().unwrap_or(ObjectType::Empty),
                other => other,
            };
            for pos in grid.positions_of(from) {
                let facing = grid.facing(pos, from).ok().flatten();
                changes.push((pos, from, to, facing));
            }
        }
        if changes.is_empty() {
            return;
        }

        // `X IS Y` and `X IS Z` together turn each X into both.
        let sources: BTreeSet<(Position, ObjectType)> =
            changes.iter().map(|(pos, from, _, _)| (*pos, *from)).collect();
        for (pos, from) in sources {
            let lifted = grid.take(pos, from);
            debug_assert!(lifted, "transforming {} missing at {}", from, pos);
        }
        for (pos, from, to, facing) in changes {
            grid.put(pos, to, facing);
            debug!("{} at {} became {}", from, pos, to);
            events.push(TurnEvent::ObjectTransformed { at: pos, from, to });
        }
    }

    /// Checks whether a YOU object shares a cell with a WIN object.
    fn touches_win(&self, grid: &Grid, rules: &RuleManager) -> bool {
        grid.objects()
            .filter(|(_, kind)| rules.object_has_property(*kind, Property::You))
            .any(|(pos, _)| self.cell_has_property(grid, rules, pos, Property::Win))
    }

    /// Removes every YOU object standing on a DEFEAT object.
    fn destroy_defeated(&self, grid: &mut Grid, rules: &RuleManager, events: &mut Vec<TurnEvent>) {
        let doomed: Vec<(Position, ObjectType)> = grid
            .objects()
            .filter(|(_, kind)| rules.object_has_property(*kind, Property::You))
            .filter(|(pos, _)| self.cell_has_property(grid, rules, *pos, Property::Defeat))
            .collect();
        self.destroy(grid, doomed, Property::Defeat, events);
    }

    /// A SINK object sharing its cell with anything takes the whole cell with it.
    fn destroy_sunk(&self, grid: &mut Grid, rules: &RuleManager, events: &mut Vec<TurnEvent>) {
        let mut doomed = Vec::new();
        for pos in grid.positions() {
            let Ok(cell) = grid.at(pos) else {
                continue;
            };
            if cell.len() > 1 && self.cell_has_property(grid, rules, pos, Property::Sink) {
                doomed.extend(cell.objects().map(|kind| (pos, kind)));
            }
        }
        self.destroy(grid, doomed, Property::Sink, events);
    }

    /// MELT objects on a cell with a HOT object are removed.
    fn destroy_melted(&self, grid: &mut Grid, rules: &RuleManager, events: &mut Vec<TurnEvent>) {
        let doomed: Vec<(Position, ObjectType)> = grid
            .objects()
            .filter(|(_, kind)| rules.object_has_property(*kind, Property::Melt))
            .filter(|(pos, _)| self.cell_has_property(grid, rules, *pos, Property::Hot))
            .collect();
        self.destroy(grid, doomed, Property::Hot, events);
    }

    fn destroy(
        &self,
        grid: &mut Grid,
        doomed: Vec<(Position, ObjectType)>,
        cause: Property,
        events: &mut Vec<TurnEvent>,
    ) {
        for (pos, kind) in doomed {
            if grid.take(pos, kind) {
                info!("{} at {} destroyed ({})", kind, pos, cause);
                events.push(TurnEvent::ObjectDestroyed {
                    at: pos,
                    kind,
                    cause,
                });
            }
        }
    }

    fn cell_has_property(
        &self,
        grid: &Grid,
        rules: &RuleManager,
        pos: Position,
        property: Property,
    ) -> bool {
        grid.at(pos)
            .map(|cell| {
                cell.objects()
                    .any(|kind| rules.object_has_property(kind, property))
            })
            .unwrap_or(false)
    }

    /// Checks whether any object on the grid is currently YOU.
    pub fn has_controllable(&self, grid: &Grid, rules: &RuleManager) -> bool {
        grid.objects()
            .any(|(_, kind)| rules.object_has_property(kind, Property::You))
    }
}
