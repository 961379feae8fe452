use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ControlError;

/// Commands sent to the host. Both channels share this envelope shape
/// (`{"type": ..., "params": {...}}`); only the command channel ever reads
/// a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Command {
    GetSessionInfo {},
    GetTrackInfo {
        track_index: usize,
    },
    GetDeviceParameters {
        track_index: usize,
        device_index: usize,
    },
    SetDeviceParameter {
        track_index: usize,
        device_index: usize,
        parameter_index: usize,
        value: f64,
    },
    BatchSetDeviceParameters {
        track_index: usize,
        device_index: usize,
        parameter_indices: Vec<usize>,
        values: Vec<f64>,
    },
}

/// Command-channel response envelope. Used by test responders to build
/// replies; the client reads the looser form via [`interpret_envelope`],
/// since any non-`success` status must map to a remote error rather than a
/// decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Success {
        #[serde(default)]
        result: Value,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

/// Interpret a decoded response envelope: a `success` status yields the
/// `result` object, anything else fails with the host's message verbatim.
pub fn interpret_envelope(doc: Value) -> Result<Value, ControlError> {
    match doc.get("status").and_then(Value::as_str) {
        Some("success") => Ok(doc
            .get("result")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()))),
        _ => {
            let message = doc
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned();
            Err(ControlError::Remote(message))
        }
    }
}
