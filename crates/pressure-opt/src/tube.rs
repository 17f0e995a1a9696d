//! Gas cylinders ("tubes").
//!
//! Targets and donors share one shape. A donor's `max_pressure` is its own
//! starting pressure; it has no separate cap.

use std::fmt;

/// Volume tolerance used when deciding whether two donors are interchangeable.
pub const APPROX_VOLUME_TOL: f64 = 0.1;
/// Pressure tolerance used when deciding whether two donors are interchangeable.
pub const APPROX_PRESSURE_TOL: f64 = 1.0;

/// A single cylinder with its current pressure and live connection count.
///
/// Field order matters: derived `PartialOrd` compares volume, pressure,
/// max pressure and connection count in that order.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Tube {
    pub volume: f64,
    pub pressure: f64,
    pub max_pressure: f64,
    pub num_of_connections: usize,
}

impl Tube {
    /// Target cylinder that should be filled up to `max_pressure`.
    #[inline]
    pub fn target(volume: f64, pressure: f64, max_pressure: f64) -> Self {
        Self {
            volume,
            pressure,
            max_pressure,
            num_of_connections: 0,
        }
    }

    /// Donor cylinder; its ceiling is its own initial pressure.
    #[inline]
    pub fn donor(volume: f64, pressure: f64) -> Self {
        Self::target(volume, pressure, pressure)
    }

    /// Remaining pressure deficit `max_pressure - pressure` (negative when overfilled).
    #[inline]
    pub fn deficit(&self) -> f64 {
        self.max_pressure - self.pressure
    }

    /// Gas quantity in volume-pressure units; conserved by every transfer.
    #[inline]
    pub fn quantity(&self) -> f64 {
        self.volume * self.pressure
    }

    /// Volume within [`APPROX_VOLUME_TOL`] and pressure within [`APPROX_PRESSURE_TOL`].
    pub fn is_approximately_equal_to(&self, other: &Tube) -> bool {
        self.is_approximately_equal_eps(other, APPROX_VOLUME_TOL, APPROX_PRESSURE_TOL)
    }

    pub fn is_approximately_equal_eps(
        &self,
        other: &Tube,
        volume_tol: f64,
        pressure_tol: f64,
    ) -> bool {
        (self.volume - other.volume).abs() < volume_tol
            && (self.pressure - other.pressure).abs() < pressure_tol
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(volume, pressure, max pressure): {}, {}, {}",
            self.volume, self.pressure, self.max_pressure
        )
    }
}

/// Pressure both cylinders settle at when connected until fully equalized.
///
/// Isothermal, volume-linear model: the volume-weighted mean of the two pressures.
#[inline]
pub fn equalized_pressure(donor: &Tube, target: &Tube) -> f64 {
    (target.quantity() + donor.quantity()) / (target.volume + donor.volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equalized_pressure_is_volume_weighted_mean() {
        let d = Tube::donor(12.0, 232.0);
        let t = Tube::target(12.0, 100.0, 200.0);
        assert!((equalized_pressure(&d, &t) - 166.0).abs() < 1e-12);
        let d = Tube::donor(10.0, 300.0);
        let t = Tube::target(8.0, 70.0, 300.0);
        let p = equalized_pressure(&d, &t);
        assert!((p - (8.0 * 70.0 + 10.0 * 300.0) / 18.0).abs() < 1e-12);
        // Symmetric in its arguments' roles for the value itself.
        assert_eq!(p, equalized_pressure(&t, &d));
    }

    #[test]
    fn approximate_equality_uses_strict_tolerances() {
        let a = Tube::donor(12.0, 232.0);
        // Offsets are binary fractions so the differences are exact.
        assert!(a.is_approximately_equal_to(&Tube::donor(12.0625, 232.875)));
        assert!(!a.is_approximately_equal_to(&Tube::donor(12.125, 232.0)));
        assert!(!a.is_approximately_equal_to(&Tube::donor(11.875, 232.0)));
        assert!(a.is_approximately_equal_to(&Tube::donor(12.0, 231.125)));
        assert!(!a.is_approximately_equal_to(&Tube::donor(12.0, 233.0)));
        // Max pressure and connection count are ignored.
        let mut b = Tube::target(12.0, 232.0, 300.0);
        b.num_of_connections = 2;
        assert!(a.is_approximately_equal_to(&b));
    }

    #[test]
    fn donor_ceiling_is_own_pressure() {
        let d = Tube::donor(10.0, 300.0);
        assert_eq!(d.max_pressure, 300.0);
        assert_eq!(d.deficit(), 0.0);
        assert_eq!(d.num_of_connections, 0);
    }
}
