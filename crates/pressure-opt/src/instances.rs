//! Reference problem instances and a reproducible random generator.
//!
//! The named instances are the two filling-station layouts used to calibrate
//! search depth against runtime. Recorded best worst-deficit (single chunk):
//!
//! | instance       | depth | worst deficit | tests     |
//! |----------------|-------|---------------|-----------|
//! | `five_targets` | 6     | 93.92         | 90_832    |
//! | `five_targets` | 7     | 87.29         | 390_352   |
//! | `five_targets` | 8     | 67.32         | 1_431_995 |
//!
//! Random instances follow the seeded-sampler pattern: a `(seed, index)` token
//! is mixed into one `StdRng`, so a draw can be replayed from its token alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModelError;
use crate::state::{State, StateCfg};

/// Bank shared by both reference instances: four 12 L at 232 bar, two 10 L at 300 bar.
pub const REFERENCE_DONORS: [(f64, f64); 6] = [
    (12.0, 232.0),
    (12.0, 232.0),
    (12.0, 232.0),
    (12.0, 232.0),
    (10.0, 300.0),
    (10.0, 300.0),
];

pub const FIVE_TARGETS: [(f64, f64, f64); 5] = [
    (12.0, 100.0, 200.0),
    (12.0, 80.0, 200.0),
    (8.0, 70.0, 300.0),
    (8.0, 100.0, 300.0),
    (24.0, 80.0, 232.0),
];

pub const SIX_TARGETS: [(f64, f64, f64); 6] = [
    (12.0, 100.0, 200.0),
    (12.0, 80.0, 200.0),
    (8.0, 70.0, 300.0),
    (8.0, 100.0, 300.0),
    (12.0, 80.0, 232.0),
    (12.0, 70.0, 232.0),
];

/// Names accepted by [`by_name`].
pub const PRESET_NAMES: [&str; 2] = ["five-targets", "six-targets"];

pub fn five_targets() -> State {
    reference(&FIVE_TARGETS, StateCfg::default())
}

pub fn six_targets() -> State {
    reference(&SIX_TARGETS, StateCfg::default())
}

/// Look up a reference instance by name, built with `cfg`.
pub fn by_name(name: &str, cfg: StateCfg) -> Option<Result<State, ModelError>> {
    let targets: &[(f64, f64, f64)] = match name {
        "five-targets" => &FIVE_TARGETS,
        "six-targets" => &SIX_TARGETS,
        _ => return None,
    };
    Some(State::with_cfg(targets, &REFERENCE_DONORS, cfg))
}

fn reference(targets: &[(f64, f64, f64)], cfg: StateCfg) -> State {
    State::with_cfg(targets, &REFERENCE_DONORS, cfg)
        .unwrap_or_else(|e| unreachable!("reference instance is valid: {e}"))
}

/// Random instance shape. Ranges are inclusive of the lower and exclusive of the upper bound.
#[derive(Clone, Copy, Debug)]
pub struct RandomCfg {
    pub num_targets: usize,
    pub num_donors: usize,
    pub volume: (f64, f64),
    /// Target cap range.
    pub max_pressure: (f64, f64),
    /// Target starting fill as a fraction of its cap.
    pub fill_fraction: (f64, f64),
    pub donor_pressure: (f64, f64),
    /// Round volumes and pressures to whole numbers so interchangeable donors occur.
    pub round: bool,
}

impl Default for RandomCfg {
    fn default() -> Self {
        Self {
            num_targets: 4,
            num_donors: 5,
            volume: (6.0, 25.0),
            max_pressure: (200.0, 300.0),
            fill_fraction: (0.2, 0.6),
            donor_pressure: (200.0, 300.0),
            round: true,
        }
    }
}

/// Replay token: the same token always yields the same instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random instance. Every target starts strictly below its cap.
pub fn draw_random(
    cfg: RandomCfg,
    tok: ReplayToken,
    state_cfg: StateCfg,
) -> Result<State, ModelError> {
    let mut rng = tok.to_std_rng();
    let round = |x: f64| if cfg.round { x.round() } else { x };
    let mut uniform = |(lo, hi): (f64, f64)| {
        if hi > lo {
            rng.gen_range(lo..hi)
        } else {
            lo
        }
    };
    let mut targets = Vec::with_capacity(cfg.num_targets);
    for _ in 0..cfg.num_targets {
        let volume = round(uniform(cfg.volume)).max(1.0);
        let max_pressure = round(uniform(cfg.max_pressure));
        let pressure = round(max_pressure * uniform(cfg.fill_fraction)).min(max_pressure - 1.0);
        targets.push((volume, pressure.max(0.0), max_pressure));
    }
    let mut donors = Vec::with_capacity(cfg.num_donors);
    for _ in 0..cfg.num_donors {
        let volume = round(uniform(cfg.volume)).max(1.0);
        donors.push((volume, round(uniform(cfg.donor_pressure))));
    }
    State::with_cfg(&targets, &donors, state_cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        for name in PRESET_NAMES {
            let s = by_name(name, StateCfg::default()).unwrap().unwrap();
            assert_eq!(s.num_donors(), 6);
        }
        assert_eq!(five_targets().num_targets(), 5);
        assert_eq!(six_targets().num_targets(), 6);
        assert!(by_name("nope", StateCfg::default()).is_none());
    }

    #[test]
    fn random_draws_replay() {
        let tok = ReplayToken { seed: 7, index: 3 };
        let a = draw_random(RandomCfg::default(), tok, StateCfg::default()).unwrap();
        let b = draw_random(RandomCfg::default(), tok, StateCfg::default()).unwrap();
        assert_eq!(a, b);
        let c = draw_random(
            RandomCfg::default(),
            ReplayToken { seed: 7, index: 4 },
            StateCfg::default(),
        )
        .unwrap();
        assert_ne!(a, c);
        assert!(a.targets().iter().all(|t| t.pressure < t.max_pressure));
    }
}
