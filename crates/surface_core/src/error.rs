use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while talking to the host or validating
/// operator input. Channel operations return these as values; nothing in the
/// control path panics.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Transport-level failure opening or using the command channel.
    #[error("connection failed: {0}")]
    Connection(#[from] std::io::Error),

    /// The accumulated response bytes never decoded within the timeout window.
    #[error("response did not decode within {0:?}")]
    DeserializationTimeout(Duration),

    /// The response decoded but its status was not `success`; the host's
    /// message is surfaced verbatim.
    #[error("host error: {0}")]
    Remote(String),

    /// A locally detected precondition violation, rejected before any
    /// network I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// None of the requested parameter indices survived the enabled-set
    /// intersection. Session-fatal.
    #[error("no valid parameters to control")]
    NoValidParameters,
}
