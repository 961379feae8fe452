use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use crate::types::ValueVector;

use super::{ModulationSource, clamp_unit};

/// Phase-staggered sine modulation across the active parameters.
///
/// Parameter `i` (by ordinal position among the active indices) runs a
/// quarter turn ahead of parameter `i - 1`, so two parameters trace a
/// circle. Deterministic given `(elapsed, frequency)`.
#[derive(Debug, Clone)]
pub struct Sine {
    indices: Vec<usize>,
    frequency: f64,
}

impl Sine {
    pub fn new(indices: Vec<usize>, frequency: f64) -> Self {
        Self { indices, frequency }
    }
}

impl ModulationSource for Sine {
    fn produce_next(&mut self, elapsed: Duration) -> ValueVector {
        let t = elapsed.as_secs_f64();
        self.indices
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                let phase = TAU * self.frequency * t + i as f64 * FRAC_PI_2;
                (index, clamp_unit(0.5 + 0.5 * phase.sin()))
            })
            .collect()
    }
}
