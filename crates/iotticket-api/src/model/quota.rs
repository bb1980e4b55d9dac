use serde::{Deserialize, Serialize};

/// Account-wide usage and limits, from `GET quota/all/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    #[serde(default)]
    pub total_devices: Option<u64>,
    #[serde(default)]
    pub max_number_of_devices: Option<u64>,
    #[serde(default)]
    pub max_data_node_per_device: Option<u64>,
    /// Bytes.
    #[serde(default)]
    pub used_storage_size: Option<u64>,
    /// Bytes.
    #[serde(default)]
    pub max_storage_size: Option<u64>,
}

/// Per-device usage, from `GET quota/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceQuota {
    #[serde(default)]
    pub total_request_today: Option<u64>,
    #[serde(default)]
    pub max_read_request_per_day: Option<u64>,
    #[serde(default)]
    pub number_of_data_nodes: Option<u64>,
    #[serde(default)]
    pub storage_size: Option<u64>,
    #[serde(default)]
    pub device_id: Option<String>,
}
