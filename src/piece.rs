//! Active falling piece logic

use crate::board::Board;
use crate::srs::kick_bucket_index;
use crate::tetromino::{Offset, PieceDefinition, PieceType, RotationDirection, RoundingPolicy};
use std::time::Duration;

/// Gravity and lock timing for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Interval between automatic drops
    pub step_delay: Duration,
    /// How long a piece may rest before a failed drop locks it
    pub lock_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_secs(1),
            lock_delay: Duration::from_millis(500),
        }
    }
}

/// Result of advancing gravity by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    /// Nothing scheduled happened this tick
    Waiting,
    /// The scheduled drop moved the piece down a row
    Dropped,
    /// The scheduled drop failed and the piece rested long enough
    Lock,
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    piece_type: PieceType,
    /// Anchor the cell offsets are relative to
    position: Offset,
    /// Rotation index in `0..4`
    rotation: u8,
    /// Current offsets, recomputed on every rotation
    cells: [Offset; 4],
    /// Time left until the next automatic drop
    drop_in: Duration,
    /// Time rested without a successful move
    lock_time: Duration,
}

impl ActivePiece {
    /// Create a new piece at rotation 0
    pub fn spawn(def: &PieceDefinition, anchor: Offset, step_delay: Duration) -> Self {
        Self {
            piece_type: def.piece_type,
            position: anchor,
            rotation: 0,
            cells: def.cells,
            drop_in: step_delay,
            lock_time: Duration::ZERO,
        }
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Offsets relative to the anchor
    pub fn cells(&self) -> [Offset; 4] {
        self.cells
    }

    pub fn lock_time(&self) -> Duration {
        self.lock_time
    }

    /// Get the absolute positions of all 4 blocks
    pub fn block_positions(&self) -> [Offset; 4] {
        self.positions_at(self.position)
    }

    fn positions_at(&self, (x, y): Offset) -> [Offset; 4] {
        self.cells.map(|(dx, dy)| (x + dx, y + dy))
    }

    /// Whether the piece can occupy its current position
    pub fn fits(&self, board: &Board) -> bool {
        board.are_positions_valid(&self.block_positions())
    }

    /// Translate if the target cells are free, returns true if successful
    pub fn try_move(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        let target = (self.position.0 + dx, self.position.1 + dy);
        if !board.are_positions_valid(&self.positions_at(target)) {
            return false;
        }
        self.position = target;
        self.lock_time = Duration::ZERO;
        true
    }

    /// Rotate, trying each wall kick of the matching bucket in order.
    /// The piece is left untouched when no kick fits.
    pub fn rotate(
        &mut self,
        direction: RotationDirection,
        def: &PieceDefinition,
        board: &Board,
    ) -> bool {
        let original_rotation = self.rotation;
        self.rotation = (i32::from(self.rotation) + direction.sign()).rem_euclid(4) as u8;
        self.apply_rotation_matrix(direction, def.rounding);

        let bucket = kick_bucket_index(original_rotation, direction, def.wall_kicks.len());
        for (kick_idx, &(kx, ky)) in def.wall_kicks[bucket].iter().enumerate() {
            if self.try_move(kx, ky, board) {
                tracing::trace!(
                    piece = ?self.piece_type,
                    from = original_rotation,
                    to = self.rotation,
                    bucket,
                    kick_idx,
                    "rotated"
                );
                return true;
            }
        }

        self.rotation = original_rotation;
        self.apply_rotation_matrix(direction.inverse(), def.rounding);
        false
    }

    fn apply_rotation_matrix(&mut self, direction: RotationDirection, rounding: RoundingPolicy) {
        self.cells = self.cells.map(|cell| rotate_offset(cell, direction, rounding));
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.try_move(0, -1, board) {
            distance += 1;
        }
        distance
    }

    /// Advance the rest and drop timers by `dt`.
    ///
    /// When the drop timer runs out the piece tries to move down one row; if
    /// that fails while the rest timer exceeds the lock delay, it must lock.
    pub fn step_gravity(&mut self, dt: Duration, timing: Timing, board: &Board) -> Gravity {
        self.lock_time += dt;

        if dt < self.drop_in {
            self.drop_in -= dt;
            return Gravity::Waiting;
        }
        self.drop_in = timing.step_delay;

        if self.try_move(0, -1, board) {
            Gravity::Dropped
        } else if self.lock_time > timing.lock_delay {
            Gravity::Lock
        } else {
            Gravity::Waiting
        }
    }

    /// Clamp the pending drop to a (possibly shorter) interval
    pub fn shorten_drop(&mut self, step_delay: Duration) {
        self.drop_in = self.drop_in.min(step_delay);
    }

    /// Anchor the piece would land on after a hard drop
    pub fn ghost_position(&self, board: &Board) -> Offset {
        let mut ghost = self.clone();
        ghost.hard_drop(board);
        ghost.position
    }
}

/// Rotate one offset a quarter turn around the piece pivot
pub fn rotate_offset((x, y): Offset, direction: RotationDirection, rounding: RoundingPolicy) -> Offset {
    let d = direction.sign() as f32;
    match rounding {
        RoundingPolicy::CenteredHalfCell => {
            let (cx, cy) = (x as f32 - 0.5, y as f32 - 0.5);
            ((cy * d).ceil() as i32, (-cx * d).ceil() as i32)
        }
        RoundingPolicy::IntegerCell => {
            let (fx, fy) = (x as f32, y as f32);
            ((fy * d).round() as i32, (-fx * d).round() as i32)
        }
    }
}
