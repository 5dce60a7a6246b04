//! Core game state and logic
//!
//! The session owns the board and the only active piece. The board always
//! shows the live piece on top of the locked stack, so every mutation of the
//! active piece lifts it off the board, moves it, and draws it back.

use crate::bag::{MAX_CONSECUTIVE, PieceGenerator};
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Bounds, MAX_CELLS, cell_count};
use crate::error::ConfigError;
use crate::piece::{ActivePiece, Gravity, Timing};
use crate::score::{LINES_PER_LEVEL, Score, ScoreHistory, ScoringTable, next_step_delay};
use crate::snapshot::Snapshot;
use crate::tetromino::{Offset, PieceCatalog, PieceDefinition, PieceType, RotationDirection};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Where new pieces appear on a centered 10x20 board
pub const SPAWN_POSITION: Offset = (-1, 8);

/// Gravity interval while fast fall is held
pub const FAST_FALL_DELAY: Duration = Duration::from_millis(100);

/// Everything a session is built from; immutable once the session starts
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub spawn: Offset,
    pub timing: Timing,
    pub fast_fall_delay: Duration,
    pub lines_per_level: u32,
    pub max_consecutive: usize,
    pub scoring: ScoringTable,
    pub catalog: Arc<PieceCatalog>,
    /// Fixed generator seed, random when `None`
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            spawn: SPAWN_POSITION,
            timing: Timing::default(),
            fast_fall_delay: FAST_FALL_DELAY,
            lines_per_level: LINES_PER_LEVEL,
            max_consecutive: MAX_CONSECUTIVE,
            scoring: ScoringTable::default(),
            catalog: Arc::new(PieceCatalog::standard()),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.height < 1 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if cell_count(self.width, self.height).is_none() {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_CELLS,
            });
        }
        if self.timing.step_delay.is_zero() || self.fast_fall_delay.is_zero() {
            return Err(ConfigError::StepDelay);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::LinesPerLevel);
        }
        if self.max_consecutive == 0 {
            return Err(ConfigError::MaxConsecutive);
        }

        let bounds = Bounds::centered(self.width, self.height);
        let (sx, sy) = self.spawn;
        for def in self.catalog.iter() {
            def.validate()?;
            if !def
                .cells
                .iter()
                .all(|&(dx, dy)| bounds.contains(sx + dx, sy + dy))
            {
                return Err(ConfigError::SpawnOutOfBounds {
                    piece: def.piece_type,
                    x: sx,
                    y: sy,
                });
            }
        }
        Ok(())
    }
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    /// Created or quit, waiting for a start
    Idle,
    Running,
    Paused,
    /// A spawn collided; only start/reset/quit leave this state
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Hold,
    /// Toggle between running and paused
    Pause,
    /// Hold or release the fast-fall key
    FastFall(bool),
    Start,
    Reset,
    Quit,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Current falling piece
    active: Option<ActivePiece>,
    /// Upcoming piece shown in the preview
    next: Option<PieceType>,
    /// Held piece (can swap once per piece)
    hold: Option<PieceType>,
    /// Whether hold has been used since the last spawn
    hold_used: bool,
    generator: PieceGenerator,
    score: Score,
    /// Level gravity interval
    step_delay: Duration,
    fast_fall: bool,
    state: GameState,
    history: ScoreHistory,
}

impl Game {
    /// Create an idle session; call [`Game::start`] to begin
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = match config.seed {
            Some(seed) => PieceGenerator::with_seed(config.max_consecutive, seed),
            None => PieceGenerator::new(config.max_consecutive),
        };

        Ok(Self {
            board: Board::new(config.width, config.height),
            active: None,
            next: None,
            hold: None,
            hold_used: false,
            generator,
            score: Score::new(),
            step_delay: config.timing.step_delay,
            fast_fall: false,
            state: GameState::Idle,
            history: ScoreHistory::default(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_piece(&self) -> Option<PieceType> {
        self.next
    }

    pub fn hold_piece(&self) -> Option<PieceType> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    /// Level gravity interval, ignoring fast fall
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Best final scores, highest first
    pub fn high_scores(&self, count: usize) -> Vec<u64> {
        self.history.top(count)
    }

    pub fn definition(&self, piece_type: PieceType) -> &PieceDefinition {
        self.config.catalog.get(piece_type)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Reset everything but the score history and begin a new game
    pub fn start(&mut self) {
        self.board = Board::new(self.config.width, self.config.height);
        self.active = None;
        self.hold = None;
        self.hold_used = false;
        self.score = Score::new();
        self.step_delay = self.config.timing.step_delay;
        self.fast_fall = false;
        self.generator.reset();
        self.state = GameState::Running;

        info!("game started");
        self.next = Some(self.generator.next());
        self.spawn(None);
    }

    /// Throw the current game away and start over
    pub fn reset(&mut self) {
        self.start();
    }

    /// Abandon the game and return to idle
    pub fn quit(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = None;
        self.hold = None;
        self.hold_used = false;
        self.score = Score::new();
        self.step_delay = self.config.timing.step_delay;
        self.state = GameState::Idle;
        info!("game quit");
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            self.state = GameState::Paused;
            debug!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Running;
            debug!("resumed");
        }
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        if let Action::FastFall(held) = action {
            // Key state is tracked in every state so a release is never lost
            self.set_fast_fall(held);
            return;
        }

        match self.state {
            GameState::Idle => {
                if matches!(action, Action::Start | Action::Reset) {
                    self.start();
                }
            }
            GameState::Paused => match action {
                Action::Pause => self.resume(),
                Action::Quit => self.quit(),
                Action::Start | Action::Reset => self.start(),
                _ => {}
            },
            GameState::GameOver => match action {
                Action::Quit => self.quit(),
                Action::Start | Action::Reset => self.start(),
                _ => {}
            },
            GameState::Running => match action {
                Action::MoveLeft => {
                    self.shift(-1, 0);
                }
                Action::MoveRight => {
                    self.shift(1, 0);
                }
                Action::SoftDrop => {
                    self.shift(0, -1);
                }
                Action::HardDrop => self.hard_drop(),
                Action::RotateCW => {
                    self.rotate(RotationDirection::Clockwise);
                }
                Action::RotateCCW => {
                    self.rotate(RotationDirection::CounterClockwise);
                }
                Action::Hold => self.hold(),
                Action::Pause => self.pause(),
                Action::Quit => self.quit(),
                Action::Start | Action::Reset => self.start(),
                Action::FastFall(_) => {}
            },
        }
    }

    /// Advance gravity and lock timers by `dt`
    pub fn update(&mut self, dt: Duration) {
        if self.state != GameState::Running {
            return;
        }

        let timing = self.timing();
        let gravity = self.with_active(|piece, _, board| piece.step_gravity(dt, timing, board));
        if gravity == Some(Gravity::Lock) {
            self.lock_active_piece();
        }
    }

    /// One frame: actions in arrival order, then timers
    pub fn tick(&mut self, dt: Duration, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.process_action(action);
        }
        self.update(dt);
    }

    /// Translate the active piece, returns true if it moved
    pub fn shift(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        self.with_active(|piece, _, board| piece.try_move(dx, dy, board))
            .unwrap_or(false)
    }

    /// Rotate the active piece with wall kicks, returns true if it rotated
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        self.with_active(|piece, def, board| piece.rotate(direction, def, board))
            .unwrap_or(false)
    }

    /// Drop the active piece to the floor and lock it
    pub fn hard_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        if let Some(distance) = self.with_active(|piece, _, board| piece.hard_drop(board)) {
            debug!(distance, "hard drop");
            self.lock_active_piece();
        }
    }

    /// Stash the active piece, or swap it with the held one, once per spawn
    pub fn hold(&mut self) {
        if self.hold_used || self.state != GameState::Running {
            return;
        }
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board.erase(&piece.block_positions());
        let previous = self.hold.replace(piece.piece_type());
        debug!(held = ?piece.piece_type(), restored = ?previous, "hold");

        self.spawn(previous);
        self.hold_used = true;
    }

    /// Commit the active piece to the stack, clear rows, score, spawn the next
    pub fn lock_active_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board
            .stamp(&piece.block_positions(), piece.piece_type());

        let lines = self.board.clear_full_rows();
        let outcome =
            self.score
                .add_clear(lines, &self.config.scoring, self.config.lines_per_level);
        debug!(
            piece = ?piece.piece_type(),
            lines,
            points = outcome.points,
            score = self.score.points,
            "locked"
        );

        if outcome.leveled_up {
            self.step_delay = next_step_delay(self.step_delay);
            debug!(
                level = self.score.level,
                step_delay_ms = self.step_delay.as_millis() as u64,
                "level up"
            );
        }

        self.spawn(None);
    }

    /// Place a new active piece at the spawn position.
    ///
    /// `explicit` bypasses the preview (used when restoring from hold);
    /// otherwise the pending next piece is consumed and a new one drawn. A
    /// spawn that collides ends the game and leaves the board untouched. A
    /// previous active piece, if any, stays on the board as locked blocks.
    pub fn spawn(&mut self, explicit: Option<PieceType>) {
        if self.state == GameState::GameOver {
            return;
        }
        let Some(piece_type) = explicit.or(self.next) else {
            return;
        };

        let piece = ActivePiece::spawn(
            self.config.catalog.get(piece_type),
            self.config.spawn,
            self.timing().step_delay,
        );
        if !piece.fits(&self.board) {
            self.game_over();
            return;
        }

        self.board.stamp(&piece.block_positions(), piece_type);
        self.active = Some(piece);
        if explicit.is_none() {
            self.next = Some(self.generator.next());
        }
        self.hold_used = false;
        debug!(piece = ?piece_type, next = ?self.next, "spawned");
    }

    fn game_over(&mut self) {
        self.active = None;
        self.state = GameState::GameOver;
        self.history.record(self.score.points);
        info!(
            score = self.score.points,
            level = self.score.level,
            lines = self.score.lines,
            "game over"
        );
    }

    fn set_fast_fall(&mut self, held: bool) {
        self.fast_fall = held;
        // Paused and finished games keep their timers frozen
        if held && self.state == GameState::Running {
            let delay = self.timing().step_delay;
            if let Some(piece) = self.active.as_mut() {
                piece.shorten_drop(delay);
            }
        }
    }

    /// Timing in effect right now, with fast fall applied
    fn timing(&self) -> Timing {
        let step_delay = if self.fast_fall {
            self.step_delay.min(self.config.fast_fall_delay)
        } else {
            self.step_delay
        };
        Timing {
            step_delay,
            lock_delay: self.config.timing.lock_delay,
        }
    }

    /// Lift the active piece off the board, run `f`, and draw it back
    fn with_active<R>(
        &mut self,
        f: impl FnOnce(&mut ActivePiece, &PieceDefinition, &Board) -> R,
    ) -> Option<R> {
        let piece = self.active.as_mut()?;
        self.board.erase(&piece.block_positions());
        let def = self.config.catalog.get(piece.piece_type());
        let result = f(piece, def, &self.board);
        self.board
            .stamp(&piece.block_positions(), piece.piece_type());
        Some(result)
    }
}
