//! Cartesian-product expansion of the three parameter domains.

use tt_types::{Combination, SweepSpec};

/// Number of combinations the grid expands to. This is the expected job
/// count for a sweep and is computed once, at submit time.
pub fn count(accel: &[f64], tau: &[f64], startup_delay: &[f64]) -> usize {
    accel.len() * tau.len() * startup_delay.len()
}

/// Every combination in lexicographic order: `accel` varies slowest,
/// `startup_delay` fastest. Duplicate input values produce duplicate jobs.
pub fn generate(accel: &[f64], tau: &[f64], startup_delay: &[f64]) -> Vec<Combination> {
    let mut combos = Vec::with_capacity(count(accel, tau, startup_delay));
    for &a in accel {
        for &t in tau {
            for &s in startup_delay {
                combos.push(Combination::new(a, t, s));
            }
        }
    }
    combos
}

/// The grid of a submitted sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    accel: Vec<f64>,
    tau: Vec<f64>,
    startup_delay: Vec<f64>,
}

impl ParameterGrid {
    pub fn from_spec(spec: &SweepSpec) -> Self {
        Self {
            accel: spec.accel_values.clone(),
            tau: spec.tau_values.clone(),
            startup_delay: spec.startup_delay_values.clone(),
        }
    }

    pub fn size(&self) -> usize {
        count(&self.accel, &self.tau, &self.startup_delay)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn combinations(&self) -> Vec<Combination> {
        generate(&self.accel, &self.tau, &self.startup_delay)
    }
}
