//! TETRS engine
//!
//! Falling-block puzzle rules without a screen: a bounded grid, rotating
//! pieces with wall kicks, line clears, scoring, hold and a piece generator
//! that limits repeats. A frontend feeds [`Action`]s and elapsed time into a
//! [`Game`] and draws the [`Snapshot`] it hands back.

pub mod bag;
pub mod board;
pub mod error;
pub mod game;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod srs;
pub mod tetromino;

pub use bag::{PieceGenerator, SpawnHistory};
pub use board::{Board, Bounds, Cell};
pub use error::{ConfigError, SettingsError};
pub use game::{Action, Game, GameConfig, GameState};
pub use piece::{ActivePiece, Gravity, Timing};
pub use score::{Score, ScoreHistory, ScoringTable};
pub use settings::Settings;
pub use snapshot::{PieceView, Snapshot};
pub use tetromino::{
    Offset, PieceCatalog, PieceDefinition, PieceType, RotationDirection, RoundingPolicy,
};
