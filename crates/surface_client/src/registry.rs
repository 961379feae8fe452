use std::collections::BTreeSet;

use surface_core::error::ControlError;
use surface_core::types::DeviceHandle;

use crate::command::CommandChannel;

/// Run one discovery call and freeze the result into a handle. The handle
/// never changes afterwards; call again to pick up host-side edits.
pub fn discover(
    channel: &CommandChannel,
    track_index: usize,
    device_index: usize,
) -> Result<DeviceHandle, ControlError> {
    let payload = channel.device_parameters(track_index, device_index)?;
    tracing::debug!(
        device = %payload.device_name,
        parameters = payload.parameters.len(),
        "discovered device"
    );
    Ok(DeviceHandle {
        track_index,
        device_index,
        name: payload.device_name,
        track_name: payload.track_name,
        parameters: payload.parameters,
    })
}

/// Intersect the requested indices with the device's enabled set, keeping
/// request order and dropping duplicates. Indices that don't survive are
/// warned about, not fatal; an empty result is.
pub fn validate_indices(
    device: &DeviceHandle,
    requested: &[usize],
) -> Result<Vec<usize>, ControlError> {
    let enabled: BTreeSet<usize> = device.enabled_indices().collect();
    let mut active = Vec::new();
    for &index in requested {
        if !enabled.contains(&index) {
            tracing::warn!(index, "dropping parameter: not present or disabled");
        } else if !active.contains(&index) {
            active.push(index);
        }
    }
    if active.is_empty() {
        return Err(ControlError::NoValidParameters);
    }
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_core::types::ParameterDescriptor;

    fn descriptor(index: usize, is_enabled: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            index,
            name: format!("Param {index}"),
            min: 0.0,
            max: 1.0,
            value: 0.0,
            normalized_value: 0.5,
            is_enabled,
        }
    }

    fn device(parameters: Vec<ParameterDescriptor>) -> DeviceHandle {
        DeviceHandle {
            track_index: 0,
            device_index: 0,
            name: "EQ Eight".into(),
            track_name: "Bass".into(),
            parameters,
        }
    }

    #[test]
    fn disabled_indices_are_dropped_not_fatal() {
        let device = device(vec![
            descriptor(0, true),
            descriptor(1, true),
            descriptor(2, false),
        ]);
        let active = validate_indices(&device, &[0, 1, 2]).unwrap();
        assert_eq!(active, vec![0, 1]);
    }

    #[test]
    fn unknown_indices_are_dropped() {
        let device = device(vec![descriptor(0, true)]);
        let active = validate_indices(&device, &[0, 9]).unwrap();
        assert_eq!(active, vec![0]);
    }

    #[test]
    fn duplicates_collapse_but_order_is_kept() {
        let device = device(vec![descriptor(0, true), descriptor(1, true)]);
        let active = validate_indices(&device, &[1, 0, 1]).unwrap();
        assert_eq!(active, vec![1, 0]);
    }

    #[test]
    fn empty_intersection_is_session_fatal() {
        let device = device(vec![descriptor(0, false)]);
        assert!(matches!(
            validate_indices(&device, &[0]),
            Err(ControlError::NoValidParameters)
        ));
    }

    #[test]
    fn active_set_is_subset_of_enabled() {
        let device = device(vec![
            descriptor(0, true),
            descriptor(1, false),
            descriptor(2, true),
            descriptor(3, false),
        ]);
        let enabled: Vec<usize> = device.enabled_indices().collect();
        let active = validate_indices(&device, &[3, 2, 1, 0]).unwrap();
        assert!(active.iter().all(|index| enabled.contains(index)));
    }
}
