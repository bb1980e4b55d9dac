//! Domain types exchanged with the IoT-Ticket service.
//!
//! Wire names follow the service's camelCase JSON. A few fields are renamed
//! on the domain side: `description` is `device_description`, `items` is
//! `devices`/`datanodes`, and `{v, ts}` is `{value, timestamp}`.

mod datanode;
mod device;
mod list;
mod quota;

pub use datanode::{
    DataType, Datanode, DatanodeInfo, DatanodeRead, DatanodeReadList, DatanodeValue, Order,
    ReadValue,
};
pub use device::{Attribute, Device};
pub use list::{DatanodeList, DevicesList, WriteDatanodesResult, WriteResult};
pub use quota::{DeviceQuota, Quota};
