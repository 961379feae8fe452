//! Core types for the surface remote-control client: the wire protocol
//! shared by both channels, the discovered-parameter data model, the error
//! taxonomy, and the modulation sources that feed the real-time loop.

pub mod error;
pub mod modulation;
pub mod protocol;
pub mod types;

pub use error::ControlError;
