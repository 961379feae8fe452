use std::collections::HashMap;
use std::time::Duration;

use surface_core::error::ControlError;
use surface_core::modulation::{DirectSet, ModulationSource, Reset};
use surface_core::types::{DeviceHandle, ValueVector};

use crate::ClientConfig;
use crate::command::CommandChannel;
use crate::registry;
use crate::update::UpdateChannel;

/// One device, one validated active set, one update socket.
///
/// The session owns the update channel exclusively; no other component
/// touches the socket, and dropping the session releases it on every exit
/// path. The echo map mirrors the last dispatched values for display only
/// and is never read back from the host.
pub struct ControlSession {
    device: DeviceHandle,
    active: Vec<usize>,
    update: UpdateChannel,
    echo: HashMap<usize, f64>,
}

impl ControlSession {
    /// Discover the device, validate the requested indices, and bind the
    /// update socket. Fails with `NoValidParameters` when nothing survives
    /// validation; the control loop never starts in that case.
    pub fn establish(
        config: &ClientConfig,
        channel: &CommandChannel,
        track_index: usize,
        device_index: usize,
        requested: &[usize],
    ) -> Result<Self, ControlError> {
        let device = registry::discover(channel, track_index, device_index)?;
        Self::with_device(config, device, requested)
    }

    /// Build a session from an already-discovered handle.
    pub fn with_device(
        config: &ClientConfig,
        device: DeviceHandle,
        requested: &[usize],
    ) -> Result<Self, ControlError> {
        let active = registry::validate_indices(&device, requested)?;
        let update =
            UpdateChannel::bind(config.update_addr.clone(), device.track_index, device.device_index)?;
        tracing::info!(
            device = %device.name,
            active = ?active,
            "control session established"
        );
        Ok(Self {
            device,
            active,
            update,
            echo: HashMap::new(),
        })
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    /// The frozen active set, in request order.
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    pub fn datagrams_sent(&self) -> u64 {
        self.update.datagrams_sent()
    }

    /// Last dispatched value per active parameter, in active order.
    pub fn last_values(&self) -> ValueVector {
        self.active
            .iter()
            .filter_map(|&index| self.echo.get(&index).map(|&value| (index, value)))
            .collect()
    }

    /// One-shot set of a single slot (ordinal position in the active set).
    /// Operator input is validated, not silently clamped.
    pub fn set_slot(&mut self, slot: usize, value: f64) -> Result<(), ControlError> {
        let &index = self.active.get(slot).ok_or_else(|| {
            ControlError::Validation(format!(
                "slot {slot} out of range (controlling {} parameters)",
                self.active.len()
            ))
        })?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ControlError::Validation(format!(
                "value {value} outside [0.0, 1.0]"
            )));
        }
        self.dispatch(&DirectSet::new(index, value).vector())
    }

    /// Send every active parameter back to center in one batch datagram.
    pub fn reset(&mut self) -> Result<(), ControlError> {
        let vector = Reset::new(self.active.clone()).produce_next(Duration::ZERO);
        self.dispatch(&vector)
    }

    /// Dispatch one value vector through the update channel and mirror it
    /// into the echo state.
    pub fn dispatch(&mut self, vector: &ValueVector) -> Result<(), ControlError> {
        let (indices, values): (Vec<usize>, Vec<f64>) = vector.iter().copied().unzip();
        self.update.send_batch(&indices, &values)?;
        for &(index, value) in vector {
            self.echo.insert(index, value);
        }
        Ok(())
    }
}
