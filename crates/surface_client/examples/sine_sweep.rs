//! Drive the first two parameters of track 0 / device 0 with a phase-
//! staggered sine for five seconds. Expects a host listening on the
//! default endpoints.
//!
//! Run with: cargo run --example sine_sweep

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use surface_client::ClientConfig;
use surface_client::command::CommandChannel;
use surface_client::scheduler::{SINE_PERIOD, Scheduler};
use surface_client::session::ControlSession;
use surface_core::modulation::Sine;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::default();
    let channel = CommandChannel::new(config.command_addr.clone(), config.read_timeout);
    let mut session = ControlSession::establish(&config, &channel, 0, 0, &[0, 1])?;

    println!(
        "Sweeping {} on {}",
        session.device().name,
        session.device().track_name
    );

    let mut source = Sine::new(session.active_indices().to_vec(), 0.5);
    let stop = Arc::new(AtomicBool::new(false));
    let scheduler = Scheduler::new(SINE_PERIOD, Some(Duration::from_secs(5)), stop);
    scheduler.run(&mut session, &mut source)?;

    println!("Sent {} datagrams", session.datagrams_sent());
    Ok(())
}
