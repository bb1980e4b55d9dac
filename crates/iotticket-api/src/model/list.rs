// Paged list wrappers and the write result
//
// The service wraps every page in `{fullSize, limit, offset, items}`.
// Pagination state lives with the caller; nothing here carries a cursor.

use serde::{Deserialize, Serialize};

use super::datanode::DatanodeInfo;
use super::device::Device;

/// A page of devices, from `GET devices/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesList {
    #[serde(default)]
    pub full_size: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(rename = "items", default)]
    pub devices: Vec<Device>,
}

/// A page of datanodes, from `GET devices/{id}/datanodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatanodeList {
    #[serde(default)]
    pub full_size: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(rename = "items", default)]
    pub datanodes: Vec<DatanodeInfo>,
}

/// Outcome of `POST process/write/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteDatanodesResult {
    #[serde(default)]
    pub total_written: Option<u64>,
    #[serde(default)]
    pub write_results: Vec<WriteResult>,
}

/// Per-datanode write count, with the URL to read the datanode back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub written_count: Option<u64>,
}
