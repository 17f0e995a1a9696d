//! Pressure-equalization transfer planning.
//!
//! Given donor cylinders and target cylinders, find a short sequence of
//! pairwise donor→target connections that brings every target as close as
//! possible to its rated pressure without exceeding it.
//!
//! - `tube`: the cylinder type and the equalization formula.
//! - `state`: transition model (admissibility, apply/unapply, objective).
//! - `solver`: depth-bounded branch-and-bound with optional chunked parallelism.
//! - `instances`: reference layouts and a seeded random generator.
//!
//! The search is exhaustive only up to the configured depth, test budget and
//! connection caps; it is not a proof of global optimality.

pub mod api;
pub mod error;
pub mod instances;
pub mod solver;
pub mod state;
pub mod tube;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{ModelError, SolveError};
pub use solver::{solve, solve_with_defaults, SolveCfg, Solution};
pub use state::{DonationEvent, Objective, State, StateBuilder, StateCfg};
pub use tube::Tube;

/// Common exports for callers.
pub mod prelude {
    pub use crate::instances::{five_targets, six_targets};
    pub use crate::solver::{solve, solve_with_defaults, SolveCfg, Solution};
    pub use crate::state::{Objective, State, StateBuilder, StateCfg};
    pub use crate::tube::Tube;
}
