use super::*;
use crate::instances::{five_targets, FIVE_TARGETS, REFERENCE_DONORS};
use crate::state::StateCfg;

fn cfg(num_chunks: usize) -> SolveCfg {
    SolveCfg {
        num_chunks,
        ..SolveCfg::default()
    }
}

#[test]
fn partition_gives_remainder_to_last_chunk() {
    assert_eq!(partition_targets(5, 1), vec![0..5]);
    assert_eq!(partition_targets(5, 2), vec![0..2, 2..5]);
    assert_eq!(partition_targets(5, 3), vec![0..1, 1..2, 2..5]);
    assert_eq!(partition_targets(6, 3), vec![0..2, 2..4, 4..6]);
    assert_eq!(partition_targets(2, 3), vec![0..0, 0..0, 0..2]);
    assert_eq!(partition_targets(0, 2), vec![0..0, 0..0]);
}

#[test]
fn partition_covers_every_target_once() {
    for n in 0..12 {
        for k in 1..8 {
            let ranges = partition_targets(n, k);
            assert_eq!(ranges.len(), k);
            let flat: Vec<usize> = ranges.into_iter().flatten().collect();
            assert_eq!(flat, (0..n).collect::<Vec<_>>(), "n={n} k={k}");
        }
    }
}

#[test]
fn zero_chunks_is_rejected() {
    let err = solve(&five_targets(), 3, cfg(0)).unwrap_err();
    assert_eq!(err, SolveError::NoChunks);
}

#[test]
fn shallow_depths_match_recorded_results() {
    // (depth, tests, worst deficit)
    let recorded = [
        (1, 10, 200.0),
        (2, 92, 152.0),
        (3, 614, 120.0),
        (4, 3_597, 102.222_222_222_222_23),
        (5, 18_878, 100.0),
        (6, 90_832, 93.92),
    ];
    let initial = five_targets();
    for (depth, tests, worst) in recorded {
        let sol = solve(&initial, depth, SolveCfg::default()).unwrap();
        assert_eq!(sol.num_tests, tests, "depth {depth}");
        let o = sol.best.objective().unwrap();
        assert_eq!(o.overall_deficit_flag, 1.0);
        assert!((o.worst_deficit - worst).abs() < 1e-9, "depth {depth}: {o:?}");
        assert_eq!(o.num_transfers, depth as f64);
        assert_eq!(sol.best.events().len(), depth);
    }
}

#[test]
fn deeper_search_never_loses_quality() {
    let initial = five_targets();
    let mut last = f64::INFINITY;
    for depth in 1..=5 {
        let best = solve_with_defaults(&initial, depth).objective_value();
        assert!(best < last, "depth {depth}");
        last = best;
    }
}

#[test]
fn best_state_is_a_replayable_path() {
    let initial = five_targets();
    let best = solve_with_defaults(&initial, 4);
    let mut replay = initial.clone();
    for e in best.events() {
        assert!(replay.is_admissible(e.donor_index, e.target_index));
        replay.apply(e.donor_index, e.target_index);
    }
    assert_eq!(replay, best);
    assert_eq!(replay.objective_value(), best.objective_value());
}

#[test]
fn budget_is_checked_on_entry_only() {
    // With a budget of one test the first level still finishes its loop.
    let initial = five_targets();
    let budget = SolveCfg {
        max_tests: 1,
        ..SolveCfg::default()
    };
    let sol = solve(&initial, 8, budget).unwrap();
    assert_eq!(sol.num_tests, 10);
    let one_level = solve(&initial, 1, SolveCfg::default()).unwrap();
    assert_eq!(sol.best.events(), one_level.best.events());

    let none = SolveCfg {
        max_tests: 0,
        ..SolveCfg::default()
    };
    let sol = solve(&initial, 8, none).unwrap();
    assert_eq!(sol.num_tests, 0);
    assert!(!sol.found_any());
}

#[test]
fn zero_depth_returns_initial_state() {
    let initial = five_targets();
    let sol = solve(&initial, 0, SolveCfg::default()).unwrap();
    assert_eq!(sol.num_tests, 0);
    assert!(sol.best.events().is_empty());
    assert_eq!(sol.best, initial);
}

#[test]
fn no_admissible_transfer_is_not_an_error() {
    // Target already full; any donor would overpressurize it.
    let initial = State::new(&[(10.0, 200.0, 200.0)], &[(10.0, 300.0)]).unwrap();
    let sol = solve(&initial, 5, cfg(2)).unwrap();
    assert!(!sol.found_any());
    assert_eq!(sol.num_tests, 0);
    assert_eq!(sol.best.objective_value(), f64::INFINITY);
    assert_eq!(sol.best, initial);
}

#[test]
fn single_chunk_matches_serial_search() {
    let initial = five_targets();
    let sol = solve(&initial, 5, cfg(1)).unwrap();
    let serial = solve_chunk(&initial, 5, 0..5, SolveCfg::default());
    assert_eq!(sol.best.events(), serial.best.events());
    assert_eq!(sol.best.objective_value(), serial.best.objective_value());
    assert_eq!(sol.num_tests, serial.stats.num_tests);
    assert_eq!(sol.chunks, vec![serial.stats]);
}

#[test]
fn chunked_result_is_minimum_of_restricted_searches() {
    let initial = five_targets();
    let depth = 5;
    for k in [2, 3, 5, 7] {
        let sol = solve(&initial, depth, cfg(k)).unwrap();
        let budget = SolveCfg {
            max_tests: SolveCfg::default().max_tests / k as u64,
            ..SolveCfg::default()
        };
        let partial: Vec<ChunkOutcome> = partition_targets(initial.num_targets(), k)
            .into_iter()
            .map(|r| solve_chunk(&initial, depth, r, budget))
            .collect();
        for p in &partial {
            assert!(sol.best.objective_value() <= p.best.objective_value());
        }
        let min = partial
            .iter()
            .map(|p| p.best.objective_value())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(sol.best.objective_value(), min, "k={k}");
        let total: u64 = partial.iter().map(|p| p.stats.num_tests).sum();
        assert_eq!(sol.num_tests, total);
        assert_eq!(sol.chunks.len(), k);
    }
}

#[test]
fn chunked_runs_are_deterministic() {
    let initial = five_targets();
    let a = solve(&initial, 5, cfg(3)).unwrap();
    let b = solve(&initial, 5, cfg(3)).unwrap();
    assert_eq!(a.best.events(), b.best.events());
    assert_eq!(a.chunks, b.chunks);
}

#[test]
fn restricted_first_level_only_opens_on_its_targets() {
    let initial = five_targets();
    let out = solve_chunk(&initial, 3, 2..3, SolveCfg::default());
    assert_eq!(out.best.events()[0].target_index, 2);
    // Deeper levels may use any target.
    let empty = solve_chunk(&initial, 3, 3..3, SolveCfg::default());
    assert_eq!(empty.stats.num_tests, 0);
    assert!(empty.best.events().is_empty());
}

#[test]
#[should_panic(expected = "out of bounds")]
fn restricted_range_past_last_target_panics() {
    solve_chunk(&five_targets(), 2, 3..9, SolveCfg::default());
}

#[test]
fn visited_set_only_removes_work() {
    let initial = five_targets();
    let plain = solve(&initial, 5, SolveCfg::default()).unwrap();
    let dedup = solve(
        &initial,
        5,
        SolveCfg {
            dedup_visited: true,
            ..SolveCfg::default()
        },
    )
    .unwrap();
    assert!(dedup.num_tests <= plain.num_tests);
    assert!(dedup.found_any());
}

#[test]
fn early_stopping_search_respects_caps() {
    let cfg = StateCfg {
        allow_early_stopping: true,
        ..StateCfg::default()
    };
    let initial = State::with_cfg(&FIVE_TARGETS, &REFERENCE_DONORS, cfg).unwrap();
    let sol = solve(&initial, 4, SolveCfg::default()).unwrap();
    assert!(sol.found_any());
    for t in sol.best.targets() {
        assert!(t.pressure <= t.max_pressure + cfg.upper_pressure_tolerance + 1e-9);
    }
    let total = |s: &State| -> f64 {
        s.targets()
            .iter()
            .chain(s.donors())
            .map(|t| t.quantity())
            .sum()
    };
    assert!((total(&sol.best) - total(&initial)).abs() < 1e-6);
}
