//! JSON export of a solve result.

use pressure_opt::api::{Solution, Tube};
use serde_json::{json, Value};

fn tubes(list: &[Tube]) -> Value {
    list.iter()
        .map(|t| {
            json!({
                "volume": t.volume,
                "pressure": t.pressure,
                "max_pressure": t.max_pressure,
                "num_of_connections": t.num_of_connections
            })
        })
        .collect()
}

/// Objective, final cylinders, transfer path (1-based indices) and diagnostics.
pub fn solution_json(sol: &Solution) -> Value {
    let best = &sol.best;
    let objective = best.objective().map(|o| {
        json!({
            "overall_deficit_flag": o.overall_deficit_flag,
            "worst_deficit": o.worst_deficit,
            "num_transfers": o.num_transfers,
            "total_deficit": o.total_deficit,
            "scalar": o.scalar()
        })
    });
    let path: Vec<Value> = best
        .events()
        .iter()
        .map(|e| {
            json!({
                "donor": e.donor_index + 1,
                "target": e.target_index + 1,
                "donor_pressure": [e.donor_pressure_before, e.donor_pressure_after],
                "target_pressure": [e.target_pressure_before, e.target_pressure_after]
            })
        })
        .collect();
    let chunks: Vec<Value> = sol
        .chunks
        .iter()
        .map(|c| {
            json!({
                "targets": [c.targets.start, c.targets.end],
                "num_tests": c.num_tests,
                // serde_json writes non-finite floats as null
                "best_objective": c.best_objective
            })
        })
        .collect();
    json!({
        "objective": objective,
        "targets": tubes(best.targets()),
        "donors": tubes(best.donors()),
        "path": path,
        "num_tests": sol.num_tests,
        "elapsed_ms": sol.elapsed.as_secs_f64() * 1e3,
        "chunks": chunks
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressure_opt::api::{five_targets, solve, SolveCfg, State};

    #[test]
    fn exports_path_one_based() {
        let sol = solve(&five_targets(), 2, SolveCfg::default()).unwrap();
        let v = solution_json(&sol);
        assert_eq!(v["path"].as_array().unwrap().len(), 2);
        assert!(v["path"][0]["donor"].as_u64().unwrap() >= 1);
        assert_eq!(v["objective"]["num_transfers"], 2.0);
        assert_eq!(v["targets"].as_array().unwrap().len(), 5);
        assert_eq!(v["num_tests"], sol.num_tests);
    }

    #[test]
    fn empty_solution_has_null_objective() {
        let initial = State::new(&[(10.0, 200.0, 200.0)], &[(10.0, 300.0)]).unwrap();
        let sol = solve(&initial, 3, SolveCfg::default()).unwrap();
        let v = solution_json(&sol);
        assert!(v["objective"].is_null());
        assert!(v["chunks"][0]["best_objective"].is_null());
    }
}
