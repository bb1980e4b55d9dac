// iotticket-api: Async Rust client for the IoT-Ticket REST API

pub mod client;
pub mod config;
pub mod constraints;
pub mod error;
pub mod model;
pub mod request;
pub mod response;
pub mod time;
pub mod transport;

pub use client::IoTTicketClient;
pub use config::ClientConfig;
pub use error::{Error, ServerErrorKind};
pub use model::{
    Attribute, DataType, Datanode, DatanodeInfo, DatanodeList, DatanodeRead, DatanodeReadList,
    DatanodeValue, Device, DeviceQuota, DevicesList, Order, Quota, ReadValue,
    WriteDatanodesResult, WriteResult,
};
pub use request::{ApiRequest, ReadQuery, RequestBuilder};
pub use time::date_to_timestamp;
pub use transport::{HttpExecutor, RawResponse, ReqwestExecutor, TlsMode, TransportConfig};
