use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use surface_core::error::ControlError;
use surface_core::modulation::{KeyCommand, Keyboard, ModulationSource};

use crate::session::ControlSession;

/// Tick period for sine demos (50 Hz).
pub const SINE_PERIOD: Duration = Duration::from_millis(20);
/// Tick period for random-walk demos (20 Hz).
pub const RANDOM_WALK_PERIOD: Duration = Duration::from_millis(50);
/// How long a keyboard tick waits on the event queue before re-checking
/// the stop flag and duration.
const KEY_POLL: Duration = Duration::from_millis(10);

/// Why a scheduler run ended. Always at a tick boundary, never mid-send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DurationElapsed,
    Interrupted,
    ExitRequested,
}

/// Fixed-cadence driver for one modulation source.
///
/// Deadlines accumulate from the loop start (`deadline += period`) instead
/// of re-arming off each tick's end, so per-tick processing cost never
/// drifts the cadence.
pub struct Scheduler {
    period: Duration,
    duration: Option<Duration>,
    stop: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(period: Duration, duration: Option<Duration>, stop: Arc<AtomicBool>) -> Self {
        Self {
            period,
            duration,
            stop,
        }
    }

    /// Run `source` against the session until the duration elapses or the
    /// stop flag is raised. Update-channel losses never surface here; the
    /// only dispatch error left is a validation bug, which does.
    pub fn run(
        &self,
        session: &mut ControlSession,
        source: &mut dyn ModulationSource,
    ) -> Result<StopReason, ControlError> {
        let start = Instant::now();
        let mut deadline = start;
        loop {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(StopReason::Interrupted);
            }
            let elapsed = start.elapsed();
            if let Some(duration) = self.duration {
                if elapsed >= duration {
                    return Ok(StopReason::DurationElapsed);
                }
            }

            let vector = source.produce_next(elapsed);
            session.dispatch(&vector)?;

            deadline += self.period;
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    }

    /// Drive a keyboard source from the key-event queue. Event-driven
    /// rather than fixed-period: at most one queued event is drained per
    /// iteration, and a vector is dispatched once per applied event, which
    /// keeps every state transition attributable to a single tick.
    pub fn run_keyed(
        &self,
        session: &mut ControlSession,
        source: &mut Keyboard,
        events: &Receiver<KeyCommand>,
    ) -> Result<StopReason, ControlError> {
        let start = Instant::now();
        loop {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(StopReason::Interrupted);
            }
            if let Some(duration) = self.duration {
                if start.elapsed() >= duration {
                    return Ok(StopReason::DurationElapsed);
                }
            }

            match events.recv_timeout(KEY_POLL) {
                Ok(command) => {
                    if !source.apply(command) {
                        return Ok(StopReason::ExitRequested);
                    }
                    let vector = source.produce_next(start.elapsed());
                    session.dispatch(&vector)?;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(StopReason::ExitRequested);
                }
            }
        }
    }
}
