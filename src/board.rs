//! Game board representation and collision detection
//!
//! The board is centered on the origin: a 10x20 board spans columns
//! `-5..5` and rows `-10..10`, with row numbers increasing upward.

use crate::tetromino::{Offset, PieceType};
use serde::{Deserialize, Serialize};

/// Standard Tetris board dimensions
pub const BOARD_WIDTH: i32 = 10;
pub const BOARD_HEIGHT: i32 = 20;

/// Largest board a session will allocate
pub const MAX_CELLS: usize = 1 << 16;

/// Number of cells in a `width` x `height` board, `None` if negative or over [`MAX_CELLS`]
pub fn cell_count(width: i32, height: i32) -> Option<usize> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    width.checked_mul(height).filter(|&cells| cells <= MAX_CELLS)
}

/// A cell on the board - either empty or filled by a piece type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn piece_type(&self) -> Option<PieceType> {
        match self {
            Cell::Empty => None,
            Cell::Filled(piece) => Some(*piece),
        }
    }
}

/// Half-open rectangle `[x_min, x_max) × [y_min, y_max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Bounds {
    /// Rectangle of the given size centered on the origin
    pub fn centered(width: i32, height: i32) -> Self {
        let x_min = -(width / 2);
        let y_min = -(height / 2);
        Self {
            x_min,
            y_min,
            x_max: x_min + width,
            y_max: y_min + height,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x_min..self.x_max).contains(&x) && (self.y_min..self.y_max).contains(&y)
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    bounds: Bounds,
    /// Row-major from the bottom row up
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board; dimensions are validated by the caller
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Bounds::centered(width, height);
        let len = (bounds.width().max(0) as usize).saturating_mul(bounds.height().max(0) as usize);
        Self {
            bounds,
            cells: vec![Cell::Empty; len],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let col = (x - self.bounds.x_min) as usize;
        let row = (y - self.bounds.y_min) as usize;
        Some(row * self.bounds.width() as usize + col)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.bounds.contains(x, y)
    }

    /// Whether a cell holds a block; out-of-bounds cells are not occupied
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// Get the cell at a position, `None` if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a position is within bounds and empty
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.is_occupied(x, y)
    }

    /// Check if a set of block positions are all valid
    pub fn are_positions_valid(&self, positions: &[Offset]) -> bool {
        positions
            .iter()
            .all(|&(x, y)| self.is_valid_position(x, y))
    }

    /// Draw a piece's blocks onto the board
    pub fn stamp(&mut self, positions: &[Offset], piece_type: PieceType) {
        for &(x, y) in positions {
            self.set(x, y, Cell::Filled(piece_type));
        }
    }

    /// Remove a piece's blocks from the board
    pub fn erase(&mut self, positions: &[Offset]) {
        for &(x, y) in positions {
            self.set(x, y, Cell::Empty);
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i32) -> bool {
        (self.bounds.x_min..self.bounds.x_max).all(|x| self.is_occupied(x, y))
    }

    /// Empty a row and shift everything above it down by one
    pub fn clear_row(&mut self, y: i32) {
        for x in self.bounds.x_min..self.bounds.x_max {
            self.set(x, y, Cell::Empty);
        }

        // Sources above the top row read as empty, so the top row ends up clear
        for row in y..self.bounds.y_max {
            for x in self.bounds.x_min..self.bounds.x_max {
                let above = self.get(x, row + 1).unwrap_or_default();
                self.set(x, row, above);
            }
        }
    }

    /// Clear completed rows bottom to top and return the number cleared
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = self.bounds.y_min;

        while row < self.bounds.y_max {
            if self.is_row_full(row) {
                // Content shifted into this row gets tested again
                self.clear_row(row);
                cleared += 1;
            } else {
                row += 1;
            }
        }

        cleared
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Remove every block
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Rows from bottom to top
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.bounds.width().max(1) as usize)
    }
}
