//! Search state: target and donor cylinders plus the transfer history.
//!
//! Purpose
//! - Own every physical invariant of the transfer model: connection counts,
//!   pressure bookkeeping and the undo log of applied transfers.
//! - Expose only the transition primitives (`is_admissible`, `apply`,
//!   `unapply_last_event`) and an objective for comparing positions.
//!
//! Invariants
//! - Each cylinder's `num_of_connections` equals the number of applied events
//!   that reference it.
//! - Folding `unapply_last_event` over `events` restores the construction
//!   pressures exactly (bit-for-bit; pressures are restored, not recomputed).
//! - Equality, ordering and hashing look at `(targets, donors)` only, never at
//!   the history.
//!
//! Layout
//! - `types.rs` (config, events, objective), `transfer.rs` (admissibility and
//!   apply/unapply), this file (construction, accessors, comparisons, report).

mod transfer;
mod types;

pub use types::{DonationEvent, Objective, StateCfg, OBJECTIVE_WEIGHTS};

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ModelError, Role};
use crate::tube::Tube;

/// Cylinders, history, and the fixed transition configuration.
///
/// Cloning duplicates all vectors, so independent branches never alias.
#[derive(Clone, Debug)]
pub struct State {
    cfg: StateCfg,
    targets: Vec<Tube>,
    donors: Vec<Tube>,
    events: Vec<DonationEvent>,
    /// For donor `i`: lower-indexed donors interchangeable with it at the starting point.
    equivalent_lower_donors: Vec<Vec<usize>>,
}

impl State {
    /// Build from `(volume, pressure, max_pressure)` targets and `(volume, pressure)` donors.
    pub fn new(targets: &[(f64, f64, f64)], donors: &[(f64, f64)]) -> Result<Self, ModelError> {
        Self::with_cfg(targets, donors, StateCfg::default())
    }

    pub fn with_cfg(
        targets: &[(f64, f64, f64)],
        donors: &[(f64, f64)],
        cfg: StateCfg,
    ) -> Result<Self, ModelError> {
        let targets = targets
            .iter()
            .map(|&(v, p, m)| Tube::target(v, p, m))
            .collect();
        let donors = donors.iter().map(|&(v, p)| Tube::donor(v, p)).collect();
        Self::from_tubes(targets, donors, cfg)
    }

    /// Build from ready-made cylinders. Connection counts are reset to zero.
    pub fn from_tubes(
        mut targets: Vec<Tube>,
        mut donors: Vec<Tube>,
        cfg: StateCfg,
    ) -> Result<Self, ModelError> {
        cfg.validate()?;
        for (index, t) in targets.iter_mut().enumerate() {
            check_tube(Role::Target, index, t)?;
            if !(t.max_pressure >= 0.0 && t.max_pressure.is_finite()) {
                return Err(ModelError::InvalidMaxPressure {
                    index,
                    value: t.max_pressure,
                });
            }
            t.num_of_connections = 0;
        }
        for (index, d) in donors.iter_mut().enumerate() {
            check_tube(Role::Donor, index, d)?;
            d.num_of_connections = 0;
        }
        let equivalent_lower_donors = equivalence_classes(&donors);
        Ok(Self {
            cfg,
            targets,
            donors,
            events: Vec::new(),
            equivalent_lower_donors,
        })
    }

    #[inline]
    pub fn cfg(&self) -> &StateCfg {
        &self.cfg
    }
    #[inline]
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }
    #[inline]
    pub fn num_donors(&self) -> usize {
        self.donors.len()
    }
    #[inline]
    pub fn targets(&self) -> &[Tube] {
        &self.targets
    }
    #[inline]
    pub fn donors(&self) -> &[Tube] {
        &self.donors
    }
    /// Applied transfers, oldest first.
    #[inline]
    pub fn events(&self) -> &[DonationEvent] {
        &self.events
    }

    /// Objective recorded by the most recent transfer, if any.
    #[inline]
    pub fn objective(&self) -> Option<Objective> {
        self.events.last().map(|e| e.lexicographic_objective)
    }

    /// Scalar objective of the most recent transfer; `+∞` with an empty history.
    #[inline]
    pub fn objective_value(&self) -> f64 {
        self.events
            .last()
            .map_or(f64::INFINITY, |e| e.objective_value)
    }

    /// Adopt the current pressures as a new starting point.
    ///
    /// Drops the history and resets connection counts so the invariant between
    /// counts and events still holds. Donor interchangeability is re-derived from
    /// the new pressures.
    pub fn clear_events(&mut self) {
        self.events.clear();
        for t in self.targets.iter_mut().chain(self.donors.iter_mut()) {
            t.num_of_connections = 0;
        }
        self.equivalent_lower_donors = equivalence_classes(&self.donors);
    }

    /// 64-bit hash of the cylinder vectors, used as a visited-set key.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.hash(&mut h);
        h.finish()
    }
}

fn check_tube(role: Role, index: usize, t: &Tube) -> Result<(), ModelError> {
    if !(t.volume > 0.0 && t.volume.is_finite()) {
        return Err(ModelError::InvalidVolume {
            role,
            index,
            value: t.volume,
        });
    }
    if !(t.pressure >= 0.0 && t.pressure.is_finite()) {
        return Err(ModelError::InvalidPressure {
            role,
            index,
            value: t.pressure,
        });
    }
    Ok(())
}

fn equivalence_classes(donors: &[Tube]) -> Vec<Vec<usize>> {
    donors
        .iter()
        .enumerate()
        .map(|(i, d)| {
            (0..i)
                .filter(|&j| d.is_approximately_equal_to(&donors[j]))
                .collect()
        })
        .collect()
}

/// Incremental instance assembly.
#[derive(Clone, Debug, Default)]
pub struct StateBuilder {
    cfg: StateCfg,
    targets: Vec<Tube>,
    donors: Vec<Tube>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cfg(mut self, cfg: StateCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn add_target(mut self, volume: f64, pressure: f64, max_pressure: f64) -> Self {
        self.targets.push(Tube::target(volume, pressure, max_pressure));
        self
    }

    pub fn add_donor(mut self, volume: f64, pressure: f64) -> Self {
        self.donors.push(Tube::donor(volume, pressure));
        self
    }

    pub fn build(self) -> Result<State, ModelError> {
        State::from_tubes(self.targets, self.donors, self.cfg)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.targets == other.targets && self.donors == other.donors
    }
}

// Construction rejects NaN and transfers only divide by positive volume sums,
// so `==` on the pressures is reflexive.
impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (&self.targets, &self.donors).partial_cmp(&(&other.targets, &other.donors))
    }
}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 and -0.0 compare equal, so they must hash equal.
        fn bits(x: f64) -> u64 {
            if x == 0.0 {
                0
            } else {
                x.to_bits()
            }
        }
        for tubes in [&self.targets, &self.donors] {
            tubes.len().hash(state);
            for t in tubes.iter() {
                bits(t.volume).hash(state);
                bits(t.pressure).hash(state);
                bits(t.max_pressure).hash(state);
                t.num_of_connections.hash(state);
            }
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (v1, v2, v3, v4) = self.evaluate().as_tuple();
        writeln!(f, "Objective: {v1}, {v2}, {v3}, {v4}")?;
        for (label, tubes) in [("Targets:", &self.targets), ("Donors:", &self.donors)] {
            writeln!(f, "{label}")?;
            for (j, t) in tubes.iter().enumerate() {
                writeln!(f, "{}. {t}", j + 1)?;
            }
        }
        if !self.events.is_empty() {
            writeln!(f)?;
            writeln!(f, "Path:")?;
            for (i, e) in self.events.iter().enumerate() {
                writeln!(
                    f,
                    "{}. D{} to T{} (target pressure: {} -> {}, donor pressure: {} -> {})",
                    i + 1,
                    e.donor_index + 1,
                    e.target_index + 1,
                    e.target_pressure_before,
                    e.target_pressure_after,
                    e.donor_pressure_before,
                    e.donor_pressure_after
                )?;
            }
        }
        Ok(())
    }
}
