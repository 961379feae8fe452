use std::time::Duration;

use crate::types::ValueVector;

use super::{ModulationSource, clamp_unit};

/// One-shot operator set of a single parameter. Not used inside the
/// periodic loop; the session dispatches its vector once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectSet {
    index: usize,
    value: f64,
}

impl DirectSet {
    pub fn new(index: usize, value: f64) -> Self {
        Self {
            index,
            value: clamp_unit(value),
        }
    }

    pub fn vector(&self) -> ValueVector {
        vec![(self.index, self.value)]
    }
}

impl ModulationSource for DirectSet {
    fn produce_next(&mut self, _elapsed: Duration) -> ValueVector {
        self.vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_on_construction() {
        assert_eq!(DirectSet::new(3, 1.5).vector(), vec![(3, 1.0)]);
        assert_eq!(DirectSet::new(3, -0.5).vector(), vec![(3, 0.0)]);
    }

    #[test]
    fn passes_in_range_values_through() {
        assert_eq!(DirectSet::new(0, 0.25).vector(), vec![(0, 0.25)]);
    }
}
