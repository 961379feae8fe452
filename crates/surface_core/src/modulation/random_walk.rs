use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::ValueVector;

use super::{CENTER, ModulationSource, clamp_unit};

/// Bounded random walk: each tick nudges every parameter by uniform noise
/// in `[-step, step]` and clamps the result. Stateful; a fixed seed
/// reproduces the walk exactly.
pub struct RandomWalk {
    values: Vec<(usize, f64)>,
    step: f64,
    rng: StdRng,
}

impl RandomWalk {
    pub const DEFAULT_STEP: f64 = 0.1;

    pub fn new(indices: Vec<usize>, step: f64) -> Self {
        Self::with_seed(indices, step, rand::random())
    }

    /// Same seed, same walk. Good for reproducing a run.
    pub fn with_seed(indices: Vec<usize>, step: f64, seed: u64) -> Self {
        let values = indices.into_iter().map(|index| (index, CENTER)).collect();
        Self {
            values,
            step,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ModulationSource for RandomWalk {
    fn produce_next(&mut self, _elapsed: Duration) -> ValueVector {
        for (_, value) in &mut self.values {
            let delta = self.rng.gen_range(-self.step..=self.step);
            *value = clamp_unit(*value + delta);
        }
        self.values.clone()
    }
}
