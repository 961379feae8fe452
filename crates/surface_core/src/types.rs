use serde::{Deserialize, Serialize};

/// One controllable parameter as reported by a single discovery call.
///
/// Field names mirror the host's wire format. Hosts may omit fields for
/// parameters they cannot describe, so everything but `index` defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default)]
    pub value: f64,
    /// Current value rescaled to `[0, 1]`, the unit used on the wire.
    #[serde(default)]
    pub normalized_value: f64,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_max() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

/// Raw payload of a `get_device_parameters` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceParametersPayload {
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// One target device, frozen at discovery time. Re-discover to refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub track_index: usize,
    pub device_index: usize,
    pub name: String,
    pub track_name: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl DeviceHandle {
    /// Indices of the parameters the host will accept updates for.
    pub fn enabled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.parameters
            .iter()
            .filter(|p| p.is_enabled)
            .map(|p| p.index)
    }
}

/// `get_session_info` payload: tempo plus the track list.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionOverview {
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_count: usize,
}

/// `get_track_info` payload: one track's name and devices.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackOverview {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub devices: Vec<DeviceSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSummary {
    #[serde(default)]
    pub name: String,
}

/// One tick's worth of `(parameter index, normalized value)` pairs.
/// Transient; produced by a modulation source, dispatched, then dropped.
pub type ValueVector = Vec<(usize, f64)>;
