//! Curated surface for orchestration code (CLI, benches, examples).
//!
//! Not a stability promise; re-exports follow the modules as they change.

// Model
pub use crate::error::{ModelError, Role, SolveError};
pub use crate::state::{
    DonationEvent, Objective, State, StateBuilder, StateCfg, OBJECTIVE_WEIGHTS,
};
pub use crate::tube::{equalized_pressure, Tube};
// Search
pub use crate::solver::{
    partition_targets, solve, solve_chunk, solve_with_defaults, ChunkOutcome, ChunkStats, SolveCfg,
    Solution,
};
// Instances
pub use crate::instances::{
    by_name as preset_by_name, draw_random, five_targets, six_targets, RandomCfg, ReplayToken,
    PRESET_NAMES,
};
