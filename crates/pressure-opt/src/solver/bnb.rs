//! Depth-bounded branch-and-bound over admissible transfers.

use std::collections::HashSet;
use std::ops::Range;

use crate::state::State;

/// Recursion context: incumbent, test counter and optional visited set.
pub(super) struct BnbRunner {
    max_tests: u64,
    num_tests: u64,
    best: State,
    visited: Option<HashSet<u64>>,
}

impl BnbRunner {
    pub(super) fn new(initial: &State, max_tests: u64, dedup_visited: bool) -> Self {
        Self {
            max_tests,
            num_tests: 0,
            best: initial.clone(),
            visited: dedup_visited.then(HashSet::new),
        }
    }

    /// Search from `initial`; only the first transfer is restricted to `first_targets`.
    ///
    /// Returns the incumbent and the number of tests performed.
    pub(super) fn run(
        mut self,
        initial: &State,
        depth_left: usize,
        first_targets: Range<usize>,
    ) -> (State, u64) {
        let mut state = initial.clone();
        self.recur(&mut state, depth_left, first_targets);
        debug_assert_eq!(state.events().len(), initial.events().len());
        (self.best, self.num_tests)
    }

    fn recur(&mut self, state: &mut State, depth_left: usize, targets: Range<usize>) {
        // The budget is checked on entry only: a loop already running finishes
        // its current node before the next check.
        if depth_left == 0
            || self.num_tests >= self.max_tests
            || state.is_worse_than(&self.best)
        {
            return;
        }
        for ti in targets {
            for di in 0..state.num_donors() {
                if !state.is_admissible(di, ti) {
                    continue;
                }
                state.apply(di, ti);
                if let Some(seen) = self.visited.as_mut() {
                    if !seen.insert(state.fingerprint()) {
                        state.unapply_last_event();
                        continue;
                    }
                }
                if state.objective_value() < self.best.objective_value() {
                    self.best = state.clone();
                }
                self.num_tests += 1;
                let all_targets = 0..state.num_targets();
                self.recur(state, depth_left - 1, all_targets);
                state.unapply_last_event();
            }
        }
    }
}
