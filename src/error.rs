//! Construction-time errors
//!
//! Gameplay never fails: rejected moves just return `false`. Only building a
//! session from a bad configuration, or reading one from disk, can error.

use crate::tetromino::PieceType;
use std::path::PathBuf;
use thiserror::Error;

/// A configuration that cannot back a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{piece:?} has {found} cells, expected 4")]
    CellCount { piece: PieceType, found: usize },
    #[error("{piece:?} lists cell {cell:?} more than once")]
    DuplicateCell { piece: PieceType, cell: (i32, i32) },
    #[error("{piece:?} has {found} wall kick buckets, expected 8")]
    BucketCount { piece: PieceType, found: usize },
    #[error("{piece:?} wall kick bucket {bucket} is empty")]
    EmptyBucket { piece: PieceType, bucket: usize },
    #[error("{0:?} is defined more than once")]
    DuplicatePiece(PieceType),
    #[error("{0:?} has no definition")]
    MissingPiece(PieceType),
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: i32, height: i32 },
    #[error("board of {width}x{height} exceeds {max} cells")]
    BoardTooLarge { width: i32, height: i32, max: usize },
    #[error("{piece:?} does not fit inside the board at spawn ({x}, {y})")]
    SpawnOutOfBounds { piece: PieceType, x: i32, y: i32 },
    #[error("step delay must be positive")]
    StepDelay,
    #[error("lines per level must be at least 1")]
    LinesPerLevel,
    #[error("max consecutive repeats must be at least 1")]
    MaxConsecutive,
}

/// Failure reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
