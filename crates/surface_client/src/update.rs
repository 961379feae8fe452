use std::net::UdpSocket;

use surface_core::error::ControlError;
use surface_core::protocol::Command;

/// Fire-and-forget UDP stream of parameter updates.
///
/// Nothing is ever read back: no acknowledgment, no ordering, no delivery
/// guarantee. A lost datagram is corrected by the next tick's fresh vector,
/// so send failures are logged and dropped rather than surfaced to the
/// control loop.
#[derive(Debug)]
pub struct UpdateChannel {
    socket: UdpSocket,
    target: String,
    track_index: usize,
    device_index: usize,
    datagrams_sent: u64,
}

impl UpdateChannel {
    /// Bind an ephemeral local socket aimed at the host's update endpoint.
    pub fn bind(
        target: impl Into<String>,
        track_index: usize,
        device_index: usize,
    ) -> Result<Self, ControlError> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target: target.into(),
            track_index,
            device_index,
            datagrams_sent: 0,
        })
    }

    /// Datagrams handed to the socket so far.
    pub fn datagrams_sent(&self) -> u64 {
        self.datagrams_sent
    }

    /// Send one parameter update. The value must already be normalized;
    /// out-of-range values are rejected before any I/O.
    pub fn send(&mut self, parameter_index: usize, value: f64) -> Result<(), ControlError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ControlError::Validation(format!(
                "value {value} outside [0.0, 1.0]"
            )));
        }
        let command = Command::SetDeviceParameter {
            track_index: self.track_index,
            device_index: self.device_index,
            parameter_index,
            value,
        };
        self.dispatch(&command);
        Ok(())
    }

    /// Send one batch update. `indices` and `values` must be the same
    /// length; a mismatch is rejected before any I/O. Values are assumed
    /// clamped by the producing modulation source.
    pub fn send_batch(&mut self, indices: &[usize], values: &[f64]) -> Result<(), ControlError> {
        if indices.len() != values.len() {
            return Err(ControlError::Validation(format!(
                "batch length mismatch: {} indices against {} values",
                indices.len(),
                values.len()
            )));
        }
        let command = Command::BatchSetDeviceParameters {
            track_index: self.track_index,
            device_index: self.device_index,
            parameter_indices: indices.to_vec(),
            values: values.to_vec(),
        };
        self.dispatch(&command);
        Ok(())
    }

    fn dispatch(&mut self, command: &Command) {
        let payload = match serde_json::to_vec(command) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("skipping unencodable update: {err}");
                return;
            }
        };
        match self.socket.send_to(&payload, self.target.as_str()) {
            Ok(_) => self.datagrams_sent += 1,
            Err(err) => {
                tracing::warn!("update send failed ({err}); next tick will resend");
            }
        }
    }
}
