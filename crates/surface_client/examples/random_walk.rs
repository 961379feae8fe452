//! Random-walk the first three parameters of track 0 / device 0 for ten
//! seconds with a fixed seed, so two runs trace the same path.
//!
//! Run with: cargo run --example random_walk

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use surface_client::ClientConfig;
use surface_client::command::CommandChannel;
use surface_client::scheduler::{RANDOM_WALK_PERIOD, Scheduler};
use surface_client::session::ControlSession;
use surface_core::modulation::RandomWalk;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::default();
    let channel = CommandChannel::new(config.command_addr.clone(), config.read_timeout);
    let mut session = ControlSession::establish(&config, &channel, 0, 0, &[0, 1, 2])?;

    let mut source = RandomWalk::with_seed(
        session.active_indices().to_vec(),
        RandomWalk::DEFAULT_STEP,
        0xDECAF,
    );
    let stop = Arc::new(AtomicBool::new(false));
    let scheduler = Scheduler::new(RANDOM_WALK_PERIOD, Some(Duration::from_secs(10)), stop);
    scheduler.run(&mut session, &mut source)?;

    for (index, value) in session.last_values() {
        println!("[{index:2}] settled at {value:.3}");
    }
    Ok(())
}
