//! Whole-session scenarios driven through the public API.
use std::sync::Arc;
use std::time::Duration;
use tetrs_engine::srs::standard_kicks;
use tetrs_engine::{
    Action, Board, Cell, Game, GameConfig, GameState, PieceCatalog, PieceDefinition, PieceType,
    RoundingPolicy,
};

fn started(seed: u64) -> Game {
    let mut game = Game::new(GameConfig::default().with_seed(seed)).unwrap();
    game.process_action(Action::Start);
    game
}

/// A 4-wide board where every type is a horizontal bar, so each hard drop
/// clears exactly one row.
fn bar_config() -> GameConfig {
    let bar = [(-1, 1), (0, 1), (1, 1), (2, 1)];
    let defs = PieceType::all().map(|piece| {
        PieceDefinition::new(
            piece,
            &bar,
            RoundingPolicy::CenteredHalfCell,
            standard_kicks(PieceType::I),
        )
        .unwrap()
    });
    GameConfig {
        width: 4,
        catalog: Arc::new(PieceCatalog::from_definitions(defs).unwrap()),
        ..GameConfig::default().with_seed(5)
    }
}

#[test]
fn stacking_in_one_column_ends_the_game() {
    let mut game = started(11);
    let mut drops = 0;
    while !game.is_game_over() && drops < 200 {
        game.process_action(Action::HardDrop);
        drops += 1;
    }

    assert!(game.is_game_over());
    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.active_piece().is_none());
    // Pieces never cover more than half the width, so nothing cleared
    assert_eq!(game.score().points, 0);
    assert_eq!(game.high_scores(6), vec![5000, 4000, 3000, 2000, 1000, 0]);

    let frozen = game.snapshot();
    game.tick(
        Duration::from_secs(5),
        [Action::MoveLeft, Action::RotateCW, Action::HardDrop, Action::Hold],
    );
    assert_eq!(game.snapshot(), frozen);

    game.process_action(Action::Start);
    assert_eq!(game.state(), GameState::Running);
    assert_eq!(game.high_scores(6).len(), 6);
    let blocks = game.board().rows().flatten().filter(|c| c.is_filled()).count();
    assert_eq!(blocks, 4);
}

#[test]
fn hold_swaps_once_per_spawn() {
    let mut game = started(12);
    let first = game.active_piece().unwrap().piece_type();
    let upcoming = game.next_piece().unwrap();

    game.process_action(Action::Hold);
    assert_eq!(game.hold_piece(), Some(first));
    assert_eq!(game.active_piece().unwrap().piece_type(), upcoming);
    assert!(!game.can_hold());

    // Second hold before a lock is ignored
    game.process_action(Action::Hold);
    assert_eq!(game.hold_piece(), Some(first));
    assert_eq!(game.active_piece().unwrap().piece_type(), upcoming);

    game.process_action(Action::HardDrop);
    assert!(game.can_hold());
    let third = game.active_piece().unwrap().piece_type();

    game.process_action(Action::Hold);
    let restored = game.active_piece().unwrap();
    assert_eq!(restored.piece_type(), first);
    assert_eq!(restored.position(), game.config().spawn);
    assert_eq!(restored.rotation(), 0);
    assert_eq!(game.hold_piece(), Some(third));
}

#[test]
fn pause_freezes_gravity_and_input() {
    let mut game = started(13);
    let before = game.active_piece().unwrap().position();

    game.process_action(Action::Pause);
    assert!(game.is_paused());
    game.tick(Duration::from_secs(10), [Action::MoveLeft, Action::SoftDrop]);
    assert_eq!(game.active_piece().unwrap().position(), before);

    game.process_action(Action::Pause);
    assert_eq!(game.state(), GameState::Running);
    game.update(Duration::from_secs(1));
    assert_eq!(game.active_piece().unwrap().position(), (before.0, before.1 - 1));
}

#[test]
fn single_clears_score_and_level_up() {
    let mut game = Game::new(bar_config()).unwrap();
    game.start();

    for _ in 0..10 {
        game.process_action(Action::HardDrop);
    }
    assert_eq!(game.score().lines, 10);
    // All ten scored at level 1: 50 * (1 + 1)
    assert_eq!(game.score().points, 1000);
    assert_eq!(game.level(), 2);
    assert_eq!(game.step_delay(), Duration::from_millis(900));

    for _ in 0..10 {
        game.process_action(Action::HardDrop);
    }
    assert_eq!(game.score().points, 1000 + 10 * 150);
    assert_eq!(game.level(), 3);
    assert_eq!(game.step_delay(), Duration::from_millis(810));

    // Only the live piece is left on the board
    let snap = game.snapshot();
    let filled = snap.rows.iter().flatten().filter(|c| c.is_some()).count();
    assert_eq!(filled, 4);
    assert!(!snap.is_game_over);
}

#[test]
fn quit_returns_to_idle_and_start_resets() {
    let mut game = Game::new(bar_config()).unwrap();
    game.start();
    game.process_action(Action::HardDrop);
    assert!(game.score().points > 0);

    game.process_action(Action::Quit);
    assert_eq!(game.state(), GameState::Idle);
    assert!(game.active_piece().is_none());
    assert!(game.next_piece().is_none());
    assert!(game.board().is_empty());

    game.process_action(Action::Start);
    assert_eq!(game.score().points, 0);
    assert_eq!(game.level(), 1);
    assert_eq!(game.step_delay(), Duration::from_secs(1));
}

#[test]
fn fast_fall_pressed_while_paused_does_not_advance_gravity() {
    let mut game = started(14);
    let y0 = game.active_piece().unwrap().position().1;
    game.update(Duration::from_millis(500));

    game.process_action(Action::Pause);
    game.process_action(Action::FastFall(true));
    game.process_action(Action::FastFall(false));
    game.process_action(Action::Pause);
    assert_eq!(game.state(), GameState::Running);

    // The drop is still due at 1000ms of running time
    game.update(Duration::from_millis(100));
    assert_eq!(game.active_piece().unwrap().position().1, y0);
    game.update(Duration::from_millis(400));
    assert_eq!(game.active_piece().unwrap().position().1, y0 - 1);
}

#[test]
fn fast_fall_held_through_pause_applies_after_resume() {
    let mut game = started(15);
    let y0 = game.active_piece().unwrap().position().1;

    game.process_action(Action::Pause);
    game.process_action(Action::FastFall(true));
    game.update(Duration::from_secs(1));
    game.process_action(Action::Pause);
    assert_eq!(game.active_piece().unwrap().position().1, y0);

    // The pending level-speed drop fires first, then the fast interval takes over
    game.update(Duration::from_secs(1));
    assert_eq!(game.active_piece().unwrap().position().1, y0 - 1);
    game.update(Duration::from_millis(100));
    assert_eq!(game.active_piece().unwrap().position().1, y0 - 2);
}

#[test]
fn cleared_row_shifts_every_row_above_down_by_one() {
    let mut board = Board::new(10, 20);
    let bounds = board.bounds();
    let full_row = -5;

    // Row n (from 1) fills the columns of the set bits of n: distinct, never full
    for y in bounds.y_min..bounds.y_max {
        let pattern = (y - bounds.y_min + 1) as u32;
        for x in bounds.x_min..bounds.x_max {
            let column = (x - bounds.x_min) as u32;
            let piece = PieceType::all()[column as usize % 7];
            if y == full_row || (column < 5 && pattern & (1 << column) != 0) {
                board.set(x, y, Cell::Filled(piece));
            }
        }
    }
    let before: Vec<Vec<Cell>> = board.rows().map(<[Cell]>::to_vec).collect();

    assert_eq!(board.clear_full_rows(), 1);

    let cleared = (full_row - bounds.y_min) as usize;
    let mut expected = before.clone();
    expected.remove(cleared);
    expected.push(vec![Cell::Empty; bounds.width() as usize]);
    let after: Vec<Vec<Cell>> = board.rows().map(<[Cell]>::to_vec).collect();
    assert_eq!(after, expected);
}

#[test]
fn separate_full_rows_all_clear() {
    let mut board = Board::new(10, 20);
    let bounds = board.bounds();
    for x in bounds.x_min..bounds.x_max {
        assert!(board.set(x, -10, Cell::Filled(PieceType::I)));
        assert!(board.set(x, -8, Cell::Filled(PieceType::O)));
    }
    board.set(0, -9, Cell::Filled(PieceType::T));
    board.set(3, -7, Cell::Filled(PieceType::S));

    assert_eq!(board.clear_full_rows(), 2);

    assert_eq!(board.get(0, -10), Some(Cell::Filled(PieceType::T)));
    assert_eq!(board.get(3, -9), Some(Cell::Filled(PieceType::S)));
    let remaining = board.rows().flatten().filter(|c| c.is_filled()).count();
    assert_eq!(remaining, 2);
}
