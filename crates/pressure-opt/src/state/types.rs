//! Configuration, event records and the lexicographic objective.
//!
//! - `StateCfg`: tolerances, progress threshold and fan-out caps, fixed per `State`.
//! - `DonationEvent`: one applied donor→target transfer plus the objective right after it.
//! - `Objective`: the 4-component lexicographic score and its scalarization.

use crate::error::ModelError;

/// Transition-model configuration.
///
/// Read once at `State` construction and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateCfg {
    /// Cut a transfer short once the target reaches its cap instead of
    /// requiring full equalization to stay below the cap.
    pub allow_early_stopping: bool,
    /// Fraction of the current deficit a transfer must close to be worth trying.
    pub minimum_improvement_fraction: f64,
    /// Allowed overshoot above a target's max pressure.
    pub upper_pressure_tolerance: f64,
    /// Worst deficit at or below which all targets count as acceptably full.
    pub lower_pressure_tolerance: f64,
    pub max_num_of_donor_connections: usize,
    pub max_num_of_target_connections: usize,
}

impl Default for StateCfg {
    fn default() -> Self {
        Self {
            allow_early_stopping: false,
            minimum_improvement_fraction: 0.2,
            upper_pressure_tolerance: 1e-6,
            lower_pressure_tolerance: 20.0,
            max_num_of_donor_connections: 2,
            max_num_of_target_connections: 3,
        }
    }
}

impl StateCfg {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.minimum_improvement_fraction) {
            return Err(ModelError::config(format!(
                "minimum_improvement_fraction must lie in [0, 1], got {}",
                self.minimum_improvement_fraction
            )));
        }
        if !(self.upper_pressure_tolerance >= 0.0 && self.upper_pressure_tolerance.is_finite()) {
            return Err(ModelError::config(format!(
                "upper_pressure_tolerance must be finite and non-negative, got {}",
                self.upper_pressure_tolerance
            )));
        }
        if !(self.lower_pressure_tolerance >= 0.0 && self.lower_pressure_tolerance.is_finite()) {
            return Err(ModelError::config(format!(
                "lower_pressure_tolerance must be finite and non-negative, got {}",
                self.lower_pressure_tolerance
            )));
        }
        if self.max_num_of_donor_connections == 0 || self.max_num_of_target_connections == 0 {
            return Err(ModelError::config("connection caps must be at least 1"));
        }
        Ok(())
    }
}

/// Weights of the scalarized objective, most significant first.
pub const OBJECTIVE_WEIGHTS: [f64; 4] = [1e8, 1e4, 1e2, 1.0];

/// Lexicographic objective, smaller is better in every component.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Objective {
    /// `0` if every target is within `upper_pressure_tolerance` of its cap, else `1`.
    pub overall_deficit_flag: f64,
    /// `0` if the worst deficit is within `lower_pressure_tolerance`, else that deficit.
    pub worst_deficit: f64,
    /// Transfers applied so far.
    pub num_transfers: f64,
    /// Sum of all target deficits.
    pub total_deficit: f64,
}

impl Objective {
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.overall_deficit_flag,
            self.worst_deficit,
            self.num_transfers,
            self.total_deficit,
        )
    }

    /// Weighted sum; dominance of earlier components holds only while the later
    /// ones stay within their usual magnitude bands.
    #[inline]
    pub fn scalar(&self) -> f64 {
        let [w1, w2, w3, w4] = OBJECTIVE_WEIGHTS;
        w1 * self.overall_deficit_flag
            + w2 * self.worst_deficit
            + w3 * self.num_transfers
            + w4 * self.total_deficit
    }
}

/// Immutable record of one applied transfer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DonationEvent {
    pub donor_index: usize,
    pub target_index: usize,
    pub donor_pressure_before: f64,
    pub donor_pressure_after: f64,
    pub target_pressure_before: f64,
    pub target_pressure_after: f64,
    pub lexicographic_objective: Objective,
    pub objective_value: f64,
}
