//! Super Rotation System (SRS) wall kick data
//!
//! If a rotation would cause collision, the translations of one bucket are
//! tried in order. Buckets are laid out as
//! `0→R, R→0, R→2, 2→R, 2→L, L→2, L→0, 0→L`, so clockwise from rotation `r`
//! uses bucket `2r` and counter-clockwise uses `2r - 1` (wrapped).

use crate::tetromino::{Offset, PieceType, RotationDirection};

/// Number of buckets in a full table: 4 rotation states × 2 directions
pub const BUCKET_COUNT: usize = 8;

/// Kicks for J, L, O, S, T, Z as `(x, y)` with y up
const JLOSTZ_KICKS: [[Offset; 5]; BUCKET_COUNT] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// Wall kicks for I piece (different from other pieces)
const I_KICKS: [[Offset; 5]; BUCKET_COUNT] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Owned copy of the standard table for a piece type
pub fn standard_kicks(piece_type: PieceType) -> Vec<Vec<Offset>> {
    let table = match piece_type {
        PieceType::I => &I_KICKS,
        _ => &JLOSTZ_KICKS,
    };
    table.iter().map(|bucket| bucket.to_vec()).collect()
}

/// Bucket for a rotation starting at `from` (the index before rotating)
pub fn kick_bucket_index(from: u8, direction: RotationDirection, bucket_count: usize) -> usize {
    let mut index = i32::from(from) * 2;
    if direction == RotationDirection::CounterClockwise {
        index -= 1;
    }
    index.rem_euclid(bucket_count as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_kick_is_identity() {
        // First kick attempt should always be (0, 0) - no offset
        for piece in PieceType::all() {
            for bucket in standard_kicks(piece) {
                assert_eq!(bucket.len(), 5);
                assert_eq!(bucket[0], (0, 0));
            }
        }
    }

    #[test]
    fn test_bucket_index_follows_transition_layout() {
        use RotationDirection::*;
        // 0→R, 0→L
        assert_eq!(kick_bucket_index(0, Clockwise, BUCKET_COUNT), 0);
        assert_eq!(kick_bucket_index(0, CounterClockwise, BUCKET_COUNT), 7);
        // R→2, R→0
        assert_eq!(kick_bucket_index(1, Clockwise, BUCKET_COUNT), 2);
        assert_eq!(kick_bucket_index(1, CounterClockwise, BUCKET_COUNT), 1);
        // 2→L, 2→R
        assert_eq!(kick_bucket_index(2, Clockwise, BUCKET_COUNT), 4);
        assert_eq!(kick_bucket_index(2, CounterClockwise, BUCKET_COUNT), 3);
        // L→0, L→2
        assert_eq!(kick_bucket_index(3, Clockwise, BUCKET_COUNT), 6);
        assert_eq!(kick_bucket_index(3, CounterClockwise, BUCKET_COUNT), 5);
    }

    #[test]
    fn test_opposite_transitions_mirror() {
        // R→0 undoes 0→R, so its kicks are the negation
        for table in [&JLOSTZ_KICKS, &I_KICKS] {
            for (a, b) in [(0, 1), (2, 3), (4, 5), (6, 7)] {
                for (ka, kb) in table[a].iter().zip(table[b].iter()) {
                    assert_eq!((ka.0, ka.1), (-kb.0, -kb.1));
                }
            }
        }
    }
}
