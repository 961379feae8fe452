//! Range invariant across all modulation sources: no matter the source
//! state, step size, or elapsed time, every produced value is in [0, 1].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use surface_core::modulation::{
    DirectSet, Keyboard, KeyCommand, ModulationSource, RandomWalk, Reset, Sine,
};

fn assert_unit_range(source: &mut dyn ModulationSource, elapsed: Duration) {
    for (index, value) in source.produce_next(elapsed) {
        assert!(
            (0.0..=1.0).contains(&value),
            "index {index} produced out-of-range value {value}"
        );
    }
}

#[test]
fn every_source_stays_in_unit_range_over_randomized_states() {
    let mut rng = StdRng::seed_from_u64(0xA11CE);

    for case in 0..200 {
        let count = rng.gen_range(1..6);
        let indices: Vec<usize> = (0..count).map(|_| rng.gen_range(0..128)).collect();
        let elapsed = Duration::from_millis(rng.gen_range(0..120_000));

        let mut reset = Reset::new(indices.clone());
        assert_unit_range(&mut reset, elapsed);

        let frequency = rng.gen_range(0.01..50.0);
        let mut sine = Sine::new(indices.clone(), frequency);
        assert_unit_range(&mut sine, elapsed);

        let step = rng.gen_range(0.0..2.0);
        let mut walk = RandomWalk::with_seed(indices.clone(), step, case);
        for _ in 0..50 {
            assert_unit_range(&mut walk, elapsed);
        }

        let key_step = rng.gen_range(0.0..1.5);
        let mut keys = Keyboard::with_step(indices.clone(), key_step);
        for _ in 0..20 {
            let slot = rng.gen_range(0..count);
            let command = if rng.gen_range(0..2) == 0 {
                KeyCommand::Increment(slot)
            } else {
                KeyCommand::Decrement(slot)
            };
            keys.apply(command);
            assert_unit_range(&mut keys, elapsed);
        }

        let mut direct = DirectSet::new(indices[0], rng.gen_range(-3.0..3.0));
        assert_unit_range(&mut direct, elapsed);
    }
}
