//! Remote-control client for a host parameter surface.
//!
//! Two channels to one host: a blocking TCP command channel for discovery
//! and one-shot commands, and a fire-and-forget UDP update channel for the
//! real-time value stream. A [`session::ControlSession`] binds one device,
//! one validated parameter set, and the update socket; the
//! [`scheduler::Scheduler`] drives a modulation source through it at a
//! fixed cadence.

pub mod command;
pub mod keys;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod update;

use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Command channel endpoint (TCP).
    pub command_addr: String,
    /// Update channel endpoint (UDP).
    pub update_addr: String,
    /// Idle read timeout for one command-channel call.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command_addr: "localhost:9877".to_owned(),
            update_addr: "localhost:9878".to_owned(),
            read_timeout: Duration::from_secs(10),
        }
    }
}
