//! Read-only view of a session for renderers
//!
//! A snapshot is an owned copy taken once per tick, so a render thread can
//! hold it while the session keeps running.

use crate::board::{Board, Bounds};
use crate::game::{Game, GameState};
use crate::tetromino::{Offset, PieceType};
use serde::Serialize;

/// A piece type and four cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub piece_type: PieceType,
    /// Absolute for the active piece, rotation-0 offsets for the preview
    pub cells: [Offset; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    pub bounds: Bounds,
    /// Occupancy from the bottom row up, live piece included
    pub rows: Vec<Vec<Option<PieceType>>>,
    pub active: Option<PieceView>,
    pub ghost: Option<[Offset; 4]>,
    pub next: Option<PieceView>,
    pub hold: Option<PieceType>,
    pub can_hold: bool,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let rows = board
            .rows()
            .map(|row| row.iter().map(|cell| cell.piece_type()).collect())
            .collect();

        let active = game.active_piece().map(|piece| PieceView {
            piece_type: piece.piece_type(),
            cells: piece.block_positions(),
        });
        let ghost = game.active_piece().map(|piece| {
            let (gx, gy) = piece.ghost_position(&without_active(game));
            piece.cells().map(|(dx, dy)| (gx + dx, gy + dy))
        });
        let next = game.next_piece().map(|piece_type| PieceView {
            piece_type,
            cells: game.definition(piece_type).cells,
        });

        Self {
            state: game.state(),
            bounds: board.bounds(),
            rows,
            active,
            ghost,
            next,
            hold: game.hold_piece(),
            can_hold: game.can_hold(),
            score: game.score().points,
            level: game.score().level,
            lines: game.score().lines,
            is_game_over: game.is_game_over(),
            is_paused: game.is_paused(),
        }
    }

    /// Cell content at board coordinates, `None` if empty or out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<PieceType> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let row = (y - self.bounds.y_min) as usize;
        let col = (x - self.bounds.x_min) as usize;
        self.rows[row][col]
    }
}

/// The locked stack alone, so the ghost does not collide with its own piece
fn without_active(game: &Game) -> Board {
    let mut board = game.board().clone();
    if let Some(piece) = game.active_piece() {
        board.erase(&piece.block_positions());
    }
    board
}
