//! Branch-and-bound search for the best transfer sequence.
//!
//! Purpose
//! - Enumerate admissible donor→target transfers depth-first up to a depth
//!   budget, keep the state with the lowest scalar objective, and prune
//!   branches that `State::is_worse_than` the incumbent.
//! - Optionally split the first level into contiguous target chunks that are
//!   searched independently (in parallel with the `parallel` feature) and
//!   reduced to a single best state afterwards.
//!
//! Notes
//! - Each chunk owns a copy of the initial state, its incumbent and its test
//!   counter; nothing is shared while chunks run.
//! - The test budget is split evenly up front. Chunks do not rebalance.
//! - Ties between chunks with equal objectives go to the lower chunk index.
//! - Results are deterministic for a fixed chunk count.
//!
//! Layout
//! - `types.rs` (config/results), `chunks.rs` (partition), `bnb.rs` (recursion).

mod bnb;
mod chunks;
mod types;

pub use chunks::partition_targets;
pub use types::{ChunkOutcome, ChunkStats, SolveCfg, Solution};

use std::ops::Range;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::error::SolveError;
use crate::state::State;
use bnb::BnbRunner;

/// Search up to `depth_left` transfers deep and return the best state found.
///
/// Errors only if `cfg.num_chunks == 0`. Exhausting the depth or test budget
/// is a normal stop; check [`Solution::found_any`] for the degenerate case
/// where no transfer was admissible at all.
#[instrument(skip_all, name = "solve", fields(depth = depth_left, chunks = cfg.num_chunks))]
pub fn solve(initial: &State, depth_left: usize, cfg: SolveCfg) -> Result<Solution, SolveError> {
    if cfg.num_chunks == 0 {
        return Err(SolveError::NoChunks);
    }
    let t0 = Instant::now();
    let per_chunk = SolveCfg {
        max_tests: cfg.max_tests / cfg.num_chunks as u64,
        ..cfg
    };
    let ranges = partition_targets(initial.num_targets(), cfg.num_chunks);

    #[cfg(feature = "parallel")]
    let outcomes: Vec<ChunkOutcome> = ranges
        .into_par_iter()
        .map(|r| solve_chunk(initial, depth_left, r, per_chunk))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<ChunkOutcome> = ranges
        .into_iter()
        .map(|r| solve_chunk(initial, depth_left, r, per_chunk))
        .collect();

    let num_tests = outcomes.iter().map(|o| o.stats.num_tests).sum();
    let chunks = outcomes.iter().map(|o| o.stats.clone()).collect();
    let mut best: Option<State> = None;
    for o in outcomes {
        let better = best
            .as_ref()
            .map_or(true, |b| o.best.objective_value() < b.objective_value());
        if better {
            best = Some(o.best);
        }
    }
    let best = best.unwrap_or_else(|| initial.clone());
    let elapsed = t0.elapsed();
    info!(
        num_tests,
        elapsed_ms = elapsed.as_millis() as u64,
        best_objective = best.objective_value(),
        transfers = best.events().len(),
        "solution found"
    );
    Ok(Solution {
        best,
        num_tests,
        elapsed,
        chunks,
    })
}

/// Convenience: single chunk, default budget; returns only the best state.
pub fn solve_with_defaults(initial: &State, depth_left: usize) -> State {
    match solve(initial, depth_left, SolveCfg::default()) {
        Ok(solution) => solution.best,
        Err(e) => unreachable!("default solve config is valid: {e}"),
    }
}

/// Serial search whose first transfer must go to a target in `first_targets`.
///
/// Uses `cfg.max_tests` as this chunk's whole budget; `cfg.num_chunks` is ignored.
/// Panics if `first_targets` reaches past the last target.
pub fn solve_chunk(
    initial: &State,
    depth_left: usize,
    first_targets: Range<usize>,
    cfg: SolveCfg,
) -> ChunkOutcome {
    assert!(
        first_targets.end <= initial.num_targets(),
        "target range {first_targets:?} out of bounds for {} targets",
        initial.num_targets()
    );
    let runner = BnbRunner::new(initial, cfg.max_tests, cfg.dedup_visited);
    let (best, num_tests) = runner.run(initial, depth_left, first_targets.clone());
    debug!(
        begin = first_targets.start,
        end = first_targets.end,
        num_tests,
        best_objective = best.objective_value(),
        "chunk finished"
    );
    ChunkOutcome {
        stats: ChunkStats {
            targets: first_targets,
            num_tests,
            best_objective: best.objective_value(),
        },
        best,
    }
}

#[cfg(test)]
mod tests;
