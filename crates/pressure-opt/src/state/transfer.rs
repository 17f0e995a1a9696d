//! Transfer semantics: admissibility, apply/unapply, objective and bound pruning.

use super::types::{DonationEvent, Objective};
use super::State;
use crate::tube::{equalized_pressure, Tube};

impl State {
    /// Whether connecting `donor_index` to `target_index` is a legal next move.
    ///
    /// Rejects, in order: out-of-order independent transfers, an unused donor
    /// whose interchangeable lower-indexed twin is also unused, either side at
    /// its fan-out cap, overpressure, and transfers closing too little of the
    /// target's deficit.
    ///
    /// Panics if either index is out of range.
    pub fn is_admissible(&self, donor_index: usize, target_index: usize) -> bool {
        let donor = &self.donors[donor_index];
        let target = &self.targets[target_index];

        // [D1 -> T2, D2 -> T1] and [D2 -> T1, D1 -> T2] reach the same pressures;
        // only the order with non-decreasing target index is explored.
        if let Some(prev) = self.events.last() {
            if donor_index != prev.donor_index && target_index < prev.target_index {
                return false;
            }
        }

        // Interchangeable fresh donors are opened in index order.
        if donor.num_of_connections == 0
            && self.equivalent_lower_donors[donor_index]
                .iter()
                .any(|&j| self.donors[j].num_of_connections == 0)
        {
            return false;
        }

        if target.num_of_connections >= self.cfg.max_num_of_target_connections {
            return false;
        }
        if donor.num_of_connections >= self.cfg.max_num_of_donor_connections {
            return false;
        }

        let cap = target.max_pressure + self.cfg.upper_pressure_tolerance;
        let unbounded = equalized_pressure(donor, target);
        if self.cfg.allow_early_stopping {
            if target.pressure >= cap {
                return false;
            }
        } else if unbounded > cap {
            return false;
        }

        let gap = target.deficit().max(0.0);
        unbounded > target.pressure + self.cfg.minimum_improvement_fraction * gap
    }

    /// Connect donor and target, record the event, and score the new position.
    ///
    /// Does not check admissibility. Panics if either index is out of range.
    pub fn apply(&mut self, donor_index: usize, target_index: usize) {
        let donor_pressure_before = self.donors[donor_index].pressure;
        let target_pressure_before = self.targets[target_index].pressure;
        let (donor_pressure_after, target_pressure_after) =
            self.pressures_after(&self.donors[donor_index], &self.targets[target_index]);

        let donor = &mut self.donors[donor_index];
        donor.pressure = donor_pressure_after;
        donor.num_of_connections += 1;
        let target = &mut self.targets[target_index];
        target.pressure = target_pressure_after;
        target.num_of_connections += 1;

        let objective = self.evaluate_with(self.events.len() + 1);
        self.events.push(DonationEvent {
            donor_index,
            target_index,
            donor_pressure_before,
            donor_pressure_after,
            target_pressure_before,
            target_pressure_after,
            lexicographic_objective: objective,
            objective_value: objective.scalar(),
        });
    }

    /// Undo the most recent transfer.
    ///
    /// Panics on an empty history: unapplying more than was applied means the
    /// caller broke the apply/unapply pairing.
    pub fn unapply_last_event(&mut self) {
        let event = self
            .events
            .pop()
            .expect("unapply_last_event called with an empty event history");
        let donor = &mut self.donors[event.donor_index];
        debug_assert!(donor.num_of_connections > 0);
        donor.pressure = event.donor_pressure_before;
        donor.num_of_connections -= 1;
        let target = &mut self.targets[event.target_index];
        debug_assert!(target.num_of_connections > 0);
        target.pressure = event.target_pressure_before;
        target.num_of_connections -= 1;
    }

    /// Lexicographic objective of the current pressures, counting every applied event.
    pub fn evaluate(&self) -> Objective {
        self.evaluate_with(self.events.len())
    }

    /// Cheap bound check against an incumbent.
    ///
    /// True if some target that can take no more connections still misses its
    /// cap by more than the incumbent's worst deficit. An incumbent without
    /// events never prunes.
    pub fn is_worse_than(&self, other: &State) -> bool {
        let Some(bound) = other.objective().map(|o| o.worst_deficit) else {
            return false;
        };
        let cap = self.cfg.max_num_of_target_connections;
        self.targets
            .iter()
            .any(|t| t.num_of_connections >= cap && t.deficit() > bound)
    }

    /// `(donor_after, target_after)` for a transfer under the configured policy.
    fn pressures_after(&self, donor: &Tube, target: &Tube) -> (f64, f64) {
        let unbounded = equalized_pressure(donor, target);
        let cap = target.max_pressure + self.cfg.upper_pressure_tolerance;
        if self.cfg.allow_early_stopping && unbounded > cap {
            // Stop at the cap; the donor keeps whatever the target did not take.
            let total = unbounded * (target.volume + donor.volume);
            let donor_after = (total - target.volume * cap) / donor.volume;
            (donor_after, cap)
        } else {
            (unbounded, unbounded)
        }
    }

    fn evaluate_with(&self, num_transfers: usize) -> Objective {
        let tol = self.cfg.upper_pressure_tolerance;
        let mut worst = 0.0_f64;
        let mut sum = 0.0;
        let mut all_within = true;
        for t in &self.targets {
            let diff = t.deficit();
            all_within &= diff <= tol;
            worst = worst.max(diff);
            sum += diff;
        }
        Objective {
            overall_deficit_flag: if all_within { 0.0 } else { 1.0 },
            worst_deficit: if worst <= self.cfg.lower_pressure_tolerance {
                0.0
            } else {
                worst
            },
            num_transfers: num_transfers as f64,
            total_deficit: sum,
        }
    }
}
