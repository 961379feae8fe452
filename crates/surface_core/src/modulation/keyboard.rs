use std::time::Duration;

use crate::types::ValueVector;

use super::{CENTER, ModulationSource, clamp_unit};

/// A discrete control action decoded from one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Lower the slot's value by one step.
    Decrement(usize),
    /// Raise the slot's value by one step.
    Increment(usize),
    /// Snap every slot back to center.
    ResetAll,
    /// Leave keyboard mode.
    Exit,
}

/// Keyboard-stepped values, one slot per active parameter. Commands arrive
/// from the key-capture queue; the scheduler applies at most one per tick.
#[derive(Debug, Clone)]
pub struct Keyboard {
    values: Vec<(usize, f64)>,
    step: f64,
}

impl Keyboard {
    pub const DEFAULT_STEP: f64 = 0.05;

    pub fn new(indices: Vec<usize>) -> Self {
        Self::with_step(indices, Self::DEFAULT_STEP)
    }

    pub fn with_step(indices: Vec<usize>, step: f64) -> Self {
        let values = indices.into_iter().map(|index| (index, CENTER)).collect();
        Self { values, step }
    }

    /// Apply one command to the slot state. Returns `false` when the
    /// command ends keyboard mode. Slots beyond the active set are ignored.
    pub fn apply(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Decrement(slot) => self.nudge(slot, -self.step),
            KeyCommand::Increment(slot) => self.nudge(slot, self.step),
            KeyCommand::ResetAll => {
                for (_, value) in &mut self.values {
                    *value = CENTER;
                }
            }
            KeyCommand::Exit => return false,
        }
        true
    }

    fn nudge(&mut self, slot: usize, delta: f64) {
        if let Some((_, value)) = self.values.get_mut(slot) {
            *value = clamp_unit(*value + delta);
        }
    }
}

impl ModulationSource for Keyboard {
    fn produce_next(&mut self, _elapsed: Duration) -> ValueVector {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_and_decrements_by_step() {
        let mut keys = Keyboard::new(vec![3, 8]);
        keys.apply(KeyCommand::Increment(0));
        keys.apply(KeyCommand::Decrement(1));
        assert_eq!(
            keys.produce_next(Duration::ZERO),
            vec![(3, 0.55), (8, 0.45)]
        );
    }

    #[test]
    fn clamps_at_the_rails() {
        let mut keys = Keyboard::with_step(vec![0], 0.3);
        for _ in 0..10 {
            keys.apply(KeyCommand::Increment(0));
        }
        assert_eq!(keys.produce_next(Duration::ZERO), vec![(0, 1.0)]);
        for _ in 0..10 {
            keys.apply(KeyCommand::Decrement(0));
        }
        assert_eq!(keys.produce_next(Duration::ZERO), vec![(0, 0.0)]);
    }

    #[test]
    fn reset_all_recenters_every_slot() {
        let mut keys = Keyboard::new(vec![0, 1]);
        keys.apply(KeyCommand::Increment(0));
        keys.apply(KeyCommand::Decrement(1));
        keys.apply(KeyCommand::ResetAll);
        assert_eq!(
            keys.produce_next(Duration::ZERO),
            vec![(0, CENTER), (1, CENTER)]
        );
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut keys = Keyboard::new(vec![0]);
        keys.apply(KeyCommand::Increment(5));
        assert_eq!(keys.produce_next(Duration::ZERO), vec![(0, CENTER)]);
    }

    #[test]
    fn exit_reports_mode_end() {
        let mut keys = Keyboard::new(vec![0]);
        assert!(keys.apply(KeyCommand::Increment(0)));
        assert!(!keys.apply(KeyCommand::Exit));
    }
}
