//! Depth/runtime probe for the two reference layouts.
//!
//! Prints the best state and timing per depth, one block per instance.
//! Usage: `cargo run --release --example reference_timing -- [max_depth] [chunks]`.

use pressure_opt::api::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let max_depth: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);
    let num_chunks: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let cfg = SolveCfg {
        num_chunks,
        ..SolveCfg::default()
    };

    for (name, initial) in [("five-targets", five_targets()), ("six-targets", six_targets())] {
        println!("== {name}");
        println!("Initial state:\n{initial}");
        for depth in 1..=max_depth {
            let sol = solve(&initial, depth, cfg).expect("chunk count is positive");
            let worst = sol.best.objective().map_or(f64::NAN, |o| o.worst_deficit);
            println!(
                "depth={depth} worst_deficit={worst:.3} tests={} time_ms={:.1}",
                sol.num_tests,
                sol.elapsed.as_secs_f64() * 1e3
            );
            if depth == max_depth {
                println!("Solution found:\n{}", sol.best);
            }
        }
    }
}
