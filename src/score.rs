//! Scoring and level progression

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Levels advance every this many scoring locks by default
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity never gets faster than this
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(100);

/// Base points per number of lines cleared by a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringTable {
    /// Points for 1, 2, 3 and 4 lines
    pub line_points: [u64; 4],
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            line_points: [50, 100, 300, 1200],
        }
    }
}

impl ScoringTable {
    pub fn base_points(&self, lines: usize) -> u64 {
        match lines {
            1..=4 => self.line_points[lines - 1],
            _ => 0,
        }
    }
}

/// What one lock contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub lines: usize,
    pub points: u64,
    pub leveled_up: bool,
}

/// Scoring calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Locks that cleared at least one row
    pub clear_events: u32,
    /// Total rows cleared, for display only
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            clear_events: 0,
            lines: 0,
        }
    }

    /// Apply the rows cleared by one lock.
    ///
    /// Points are `base * (level + 1)`. The level counter advances once per
    /// lock that cleared anything, regardless of how many rows it cleared.
    pub fn add_clear(
        &mut self,
        lines: usize,
        table: &ScoringTable,
        lines_per_level: u32,
    ) -> ClearOutcome {
        if lines == 0 {
            return ClearOutcome::default();
        }

        let points = table.base_points(lines) * (u64::from(self.level) + 1);
        self.points += points;
        self.lines += lines as u32;
        self.clear_events += 1;

        let leveled_up = self.clear_events >= self.level * lines_per_level;
        if leveled_up {
            self.level += 1;
        }

        ClearOutcome {
            lines,
            points,
            leveled_up,
        }
    }
}

/// Gravity interval after a level-up: 10% faster, never below the floor
pub fn next_step_delay(step_delay: Duration) -> Duration {
    (step_delay * 9 / 10).max(MIN_STEP_DELAY)
}

/// Best final scores seen in this process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreHistory {
    scores: Vec<u64>,
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self {
            scores: vec![5000, 4000, 3000, 2000, 1000],
        }
    }
}

impl ScoreHistory {
    pub fn record(&mut self, score: u64) {
        self.scores.push(score);
    }

    /// The `count` best scores, highest first
    pub fn top(&self, count: usize) -> Vec<u64> {
        let mut sorted = self.scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.truncate(count);
        sorted
    }
}
