use std::time::Duration;

use crate::types::ValueVector;

use super::{CENTER, ModulationSource};

/// Constant vector mapping every active parameter to center.
#[derive(Debug, Clone)]
pub struct Reset {
    indices: Vec<usize>,
}

impl Reset {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl ModulationSource for Reset {
    fn produce_next(&mut self, _elapsed: Duration) -> ValueVector {
        self.indices.iter().map(|&index| (index, CENTER)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_index_to_center() {
        let mut reset = Reset::new(vec![0, 4, 7]);
        assert_eq!(
            reset.produce_next(Duration::ZERO),
            vec![(0, 0.5), (4, 0.5), (7, 0.5)]
        );
    }
}
