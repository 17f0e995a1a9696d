//! Solver configuration and results.

use std::ops::Range;
use std::time::Duration;

use crate::state::State;

/// Search configuration (depth is passed separately to `solve`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveCfg {
    /// Number of independent first-level partitions, searched in parallel.
    pub num_chunks: usize,
    /// Total test budget, split evenly across chunks up front.
    pub max_tests: u64,
    /// Skip positions already reached through another transfer order.
    pub dedup_visited: bool,
}

impl Default for SolveCfg {
    fn default() -> Self {
        Self {
            num_chunks: 1,
            max_tests: 10_000_000_000,
            dedup_visited: false,
        }
    }
}

/// Diagnostics for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkStats {
    /// Targets this chunk may open its first transfer on.
    pub targets: Range<usize>,
    pub num_tests: u64,
    /// Scalar objective of the chunk's best state (`+∞` if it found nothing).
    pub best_objective: f64,
}

/// Best state of one chunk plus its stats.
#[derive(Clone, Debug)]
pub struct ChunkOutcome {
    pub best: State,
    pub stats: ChunkStats,
}

/// Result of a full solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Lowest scalar objective over all chunks; the initial state if no
    /// transfer was ever admissible.
    pub best: State,
    /// Tests summed over all chunks.
    pub num_tests: u64,
    pub elapsed: Duration,
    pub chunks: Vec<ChunkStats>,
}

impl Solution {
    /// False when no admissible transfer existed (objective still `+∞`).
    #[inline]
    pub fn found_any(&self) -> bool {
        self.best.objective_value().is_finite()
    }
}
