//! Property tests for the turn laws that hold on every grid.

use baba_engine::{
    extract_rules, Cell, Direction, Game, Grid, ObjectType, PlayState, Position, TurnEvent,
};
use proptest::prelude::*;

const SIDE: usize = 5;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

/// A 5x5 grid with BABA IS YOU on the top row and arbitrary objects below.
fn arbitrary_level() -> impl Strategy<Value = Grid> {
    let kinds = ObjectType::all();
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(kinds), 0..3),
        SIDE * (SIDE - 1),
    )
    .prop_map(|cells| {
        let mut all = vec![
            Cell::with_objects([ObjectType::TextBaba]),
            Cell::with_objects([ObjectType::TextIs]),
            Cell::with_objects([ObjectType::TextYou]),
            Cell::new(),
            Cell::with_objects([ObjectType::Baba]),
        ];
        all.extend(cells.into_iter().map(Cell::with_objects));
        Grid::from_cells(SIDE, SIDE, all).expect("valid dimensions")
    })
}

/// Baba plus rule-less filler, with only BABA IS YOU in force.
fn plain_level() -> impl Strategy<Value = (Grid, Position)> {
    let filler = prop::sample::select(vec![
        ObjectType::Rock,
        ObjectType::Tile,
        ObjectType::Flag,
        ObjectType::Water,
        ObjectType::Grass,
        ObjectType::Skull,
    ]);
    (
        prop::collection::vec(prop::option::of(filler), SIDE * (SIDE - 2)),
        2..SIDE as i32,
        0..SIDE as i32,
    )
        .prop_map(|(cells, row, col)| {
            let mut grid = Grid::new(SIDE, SIDE).expect("valid dimensions");
            for (pos, word) in [
                (Position::new(0, 0), ObjectType::TextBaba),
                (Position::new(0, 1), ObjectType::TextIs),
                (Position::new(0, 2), ObjectType::TextYou),
            ] {
                grid.place_object(pos, word).expect("in bounds");
            }
            for (index, kind) in cells.into_iter().enumerate() {
                if let Some(kind) = kind {
                    let pos = Position::new(2 + (index / SIDE) as i32, (index % SIDE) as i32);
                    grid.place_object(pos, kind).expect("in bounds");
                }
            }
            let start = Position::new(row, col);
            grid.place_object(start, ObjectType::Baba).expect("in bounds");
            (grid, start)
        })
}

proptest! {
    #[test]
    fn rules_always_match_the_grid(
        grid in arbitrary_level(),
        moves in prop::collection::vec(direction(), 0..20),
    ) {
        let mut game = Game::new(grid);
        prop_assert_eq!(game.rule_manager().rules(), &extract_rules(game.grid()));
        for direction in moves {
            game.move_player(direction);
            prop_assert_eq!(game.rule_manager().rules(), &extract_rules(game.grid()));
            prop_assert_eq!(game.player_icon(), game.rule_manager().player_icon());
        }
    }

    #[test]
    fn reset_restores_the_fresh_game(
        grid in arbitrary_level(),
        moves in prop::collection::vec(direction(), 0..20),
    ) {
        let fresh = Game::new(grid);
        let mut game = fresh.clone();
        game.play(&moves);
        game.reset();
        prop_assert_eq!(game, fresh);
    }

    #[test]
    fn terminal_states_are_sticky(
        grid in arbitrary_level(),
        moves in prop::collection::vec(direction(), 0..30),
        extra in direction(),
    ) {
        let mut game = Game::new(grid);
        game.play(&moves);
        if game.is_finished() {
            let state = game.play_state();
            let before = game.grid().clone();
            let report = game.move_player(extra);
            prop_assert_eq!(report.events, vec![TurnEvent::MoveRejected { state }]);
            prop_assert_eq!(game.grid(), &before);
            prop_assert_eq!(game.play_state(), state);
        }
    }

    #[test]
    fn lost_means_nothing_is_controllable(
        grid in arbitrary_level(),
        moves in prop::collection::vec(direction(), 0..30),
    ) {
        let mut game = Game::new(grid);
        game.play(&moves);
        if game.play_state() == PlayState::Lost {
            let you_kinds = game
                .rule_manager()
                .subjects_with_property(baba_engine::Property::You);
            prop_assert!(game.grid().objects().all(|(_, kind)| !you_kinds.contains(&kind)));
        }
    }

    #[test]
    fn plain_objects_never_block((grid, start) in plain_level(), direction in direction()) {
        let mut game = Game::new(grid);
        let target = start.step(direction);
        prop_assume!(game.grid().contains(target) && target.row >= 1);

        game.move_player(direction);
        prop_assert!(game.grid().cell_has_type(target, ObjectType::Baba).unwrap());
        prop_assert!(!game.grid().cell_has_type(start, ObjectType::Baba).unwrap());
        prop_assert_eq!(game.play_state(), PlayState::Playing);
    }
}
