use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde_json::Value;
use surface_core::error::ControlError;
use surface_core::protocol::{Command, interpret_envelope};
use surface_core::types::{DeviceParametersPayload, SessionOverview, TrackOverview};

/// Bytes read per chunk while waiting for a complete response.
const READ_CHUNK: usize = 8192;

/// Synchronous request/response channel to the host.
///
/// One TCP connection per call, no pooling. The response carries no framing
/// beyond JSON itself: chunks accumulate until the whole buffer decodes as a
/// single value. That only holds together because the host answers exactly
/// one request per connection and sends nothing after the envelope.
#[derive(Debug, Clone)]
pub struct CommandChannel {
    addr: String,
    read_timeout: Duration,
}

impl CommandChannel {
    pub fn new(addr: impl Into<String>, read_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            read_timeout,
        }
    }

    /// Send one command and block until its response decodes, the idle
    /// timeout expires, or the connection fails. Never retries; the caller
    /// decides whether a failed call is worth repeating.
    pub fn request(&self, command: &Command) -> Result<Value, ControlError> {
        let mut stream = TcpStream::connect(self.addr.as_str())?;
        stream.set_read_timeout(Some(self.read_timeout))?;

        let payload = serde_json::to_vec(command)
            .map_err(|err| ControlError::Validation(format!("unencodable command: {err}")))?;
        stream.write_all(&payload)?;

        let mut buf = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    if let Ok(doc) = serde_json::from_slice::<Value>(&buf) {
                        return interpret_envelope(doc);
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Err(ControlError::DeserializationTimeout(self.read_timeout));
                }
                Err(err) => return Err(ControlError::Connection(err)),
            }
        }

        // The host closed the connection; whatever arrived either decodes
        // now or never will.
        match serde_json::from_slice::<Value>(&buf) {
            Ok(doc) => interpret_envelope(doc),
            Err(_) => Err(ControlError::DeserializationTimeout(self.read_timeout)),
        }
    }

    pub fn session_info(&self) -> Result<SessionOverview, ControlError> {
        let result = self.request(&Command::GetSessionInfo {})?;
        serde_json::from_value(result)
            .map_err(|err| ControlError::Remote(format!("malformed session info: {err}")))
    }

    pub fn track_info(&self, track_index: usize) -> Result<TrackOverview, ControlError> {
        let result = self.request(&Command::GetTrackInfo { track_index })?;
        serde_json::from_value(result)
            .map_err(|err| ControlError::Remote(format!("malformed track info: {err}")))
    }

    pub fn device_parameters(
        &self,
        track_index: usize,
        device_index: usize,
    ) -> Result<DeviceParametersPayload, ControlError> {
        let result = self.request(&Command::GetDeviceParameters {
            track_index,
            device_index,
        })?;
        serde_json::from_value(result)
            .map_err(|err| ControlError::Remote(format!("malformed parameter listing: {err}")))
    }
}
