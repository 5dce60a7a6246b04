//! Tetromino definitions and shapes
//!
//! The seven piece types, how each one rounds while rotating, and the
//! immutable catalog the session reads shapes and kick buckets from.

use crate::error::ConfigError;
use crate::srs;
use serde::{Deserialize, Serialize};

/// A cell offset or translation `(x, y)`, y grows upward
pub type Offset = (i32, i32);

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    I, // long bar
    J,
    L,
    O, // square
    S,
    T,
    Z,
}

impl PieceType {
    /// All types in catalog order
    pub fn all() -> [PieceType; 7] {
        [
            PieceType::I,
            PieceType::J,
            PieceType::L,
            PieceType::O,
            PieceType::S,
            PieceType::T,
            PieceType::Z,
        ]
    }

    /// Position of this type within [`PieceType::all`]
    pub fn index(self) -> usize {
        match self {
            PieceType::I => 0,
            PieceType::J => 1,
            PieceType::L => 2,
            PieceType::O => 3,
            PieceType::S => 4,
            PieceType::T => 5,
            PieceType::Z => 6,
        }
    }

    /// Single-letter name, used by text renderers
    pub fn letter(self) -> char {
        match self {
            PieceType::I => 'I',
            PieceType::J => 'J',
            PieceType::L => 'L',
            PieceType::O => 'O',
            PieceType::S => 'S',
            PieceType::T => 'T',
            PieceType::Z => 'Z',
        }
    }
}

/// How rotated coordinates snap back onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Pivot sits on a cell corner: shift by half a cell, rotate, round up (I, O)
    CenteredHalfCell,
    /// Pivot sits on a cell center: rotate, round to nearest
    IntegerCell,
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Shape, rounding and wall kicks for one piece type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDefinition {
    pub piece_type: PieceType,
    /// The 4 cells at rotation 0
    pub cells: [Offset; 4],
    pub rounding: RoundingPolicy,
    /// One bucket per (from rotation, direction), see [`srs::kick_bucket_index`]
    pub wall_kicks: Vec<Vec<Offset>>,
}

impl PieceDefinition {
    /// Build a definition from loosely-typed parts, checking the shape invariants
    pub fn new(
        piece_type: PieceType,
        cells: &[Offset],
        rounding: RoundingPolicy,
        wall_kicks: Vec<Vec<Offset>>,
    ) -> Result<Self, ConfigError> {
        let cells: [Offset; 4] = cells.try_into().map_err(|_| ConfigError::CellCount {
            piece: piece_type,
            found: cells.len(),
        })?;
        let def = Self {
            piece_type,
            cells,
            rounding,
            wall_kicks,
        };
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, &cell) in self.cells.iter().enumerate() {
            if self.cells[..i].contains(&cell) {
                return Err(ConfigError::DuplicateCell {
                    piece: self.piece_type,
                    cell,
                });
            }
        }
        if self.wall_kicks.len() != srs::BUCKET_COUNT {
            return Err(ConfigError::BucketCount {
                piece: self.piece_type,
                found: self.wall_kicks.len(),
            });
        }
        if let Some(bucket) = self.wall_kicks.iter().position(Vec::is_empty) {
            return Err(ConfigError::EmptyBucket {
                piece: self.piece_type,
                bucket,
            });
        }
        Ok(())
    }

    /// Standard shape for a piece type
    pub fn standard(piece_type: PieceType) -> Self {
        let (cells, rounding) = match piece_type {
            PieceType::I => (
                [(-1, 1), (0, 1), (1, 1), (2, 1)],
                RoundingPolicy::CenteredHalfCell,
            ),
            PieceType::J => (
                [(-1, 1), (-1, 0), (0, 0), (1, 0)],
                RoundingPolicy::IntegerCell,
            ),
            PieceType::L => (
                [(1, 1), (-1, 0), (0, 0), (1, 0)],
                RoundingPolicy::IntegerCell,
            ),
            PieceType::O => (
                [(0, 1), (1, 1), (0, 0), (1, 0)],
                RoundingPolicy::CenteredHalfCell,
            ),
            PieceType::S => (
                [(0, 1), (1, 1), (-1, 0), (0, 0)],
                RoundingPolicy::IntegerCell,
            ),
            PieceType::T => (
                [(0, 1), (-1, 0), (0, 0), (1, 0)],
                RoundingPolicy::IntegerCell,
            ),
            PieceType::Z => (
                [(-1, 1), (0, 1), (0, 0), (1, 0)],
                RoundingPolicy::IntegerCell,
            ),
        };
        Self {
            piece_type,
            cells,
            rounding,
            wall_kicks: srs::standard_kicks(piece_type),
        }
    }
}

/// Immutable table of all 7 definitions, indexed by [`PieceType::index`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalog {
    definitions: Vec<PieceDefinition>,
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PieceCatalog {
    pub fn standard() -> Self {
        Self {
            definitions: PieceType::all()
                .into_iter()
                .map(PieceDefinition::standard)
                .collect(),
        }
    }

    /// Build a catalog from exactly one definition per piece type, in any order
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = PieceDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut slots: [Option<PieceDefinition>; 7] = Default::default();
        for def in definitions {
            def.validate()?;
            let slot = &mut slots[def.piece_type.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicatePiece(def.piece_type));
            }
            *slot = Some(def);
        }

        let mut ordered = Vec::with_capacity(7);
        for (piece, slot) in PieceType::all().into_iter().zip(slots) {
            ordered.push(slot.ok_or(ConfigError::MissingPiece(piece))?);
        }
        Ok(Self {
            definitions: ordered,
        })
    }

    pub fn get(&self, piece_type: PieceType) -> &PieceDefinition {
        &self.definitions[piece_type.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceDefinition> {
        self.definitions.iter()
    }
}
