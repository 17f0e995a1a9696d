//! `<stem>.provenance.json` sidecars for solve results.

use anyhow::{Context, Result};
use pressure_opt::api::Solution;
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced a result file: instance source, solver parameters and a
/// summary of the run itself.
pub struct Payload {
    pub instance: String,
    pub params: Value,
    pub run: Value,
}

impl Payload {
    pub fn new(instance: impl Into<String>, params: Value) -> Self {
        Self {
            instance: instance.into(),
            params,
            run: Value::Null,
        }
    }

    /// Attach test counts, wall time and per-chunk work of a finished solve.
    pub fn with_run(mut self, sol: &Solution) -> Self {
        let per_chunk: Vec<u64> = sol.chunks.iter().map(|c| c.num_tests).collect();
        self.run = json!({
            "found_any": sol.found_any(),
            "num_tests": sol.num_tests,
            "elapsed_ms": sol.elapsed.as_millis() as u64,
            "chunk_tests": per_chunk
        });
        self
    }
}

/// Write the sidecar next to `result` and return its path.
#[track_caller]
pub fn write_sidecar(result: &Path, payload: Payload) -> Result<PathBuf> {
    let sidecar = provenance_path(result);
    let caller = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "lib_version": pressure_opt::VERSION,
        "callsite": format!("{}:{}", caller.file(), caller.line()),
        "instance": payload.instance,
        "params": payload.params,
        "run": payload.run,
        "result": result.to_string_lossy()
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn provenance_path(result: &Path) -> PathBuf {
    let stem = result
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    result.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit hash from `GIT_COMMIT` (build time, then run time) or `git rev-parse`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    match Command::new("git").args(["rev-parse", "HEAD"]).output() {
        Ok(out) if out.status.success() => {
            String::from_utf8_lossy(&out.stdout).trim().to_string()
        }
        _ => "unknown".to_string(),
    }
}
