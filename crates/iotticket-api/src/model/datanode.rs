// Datanode types
//
// `Datanode` is the write payload; `DatanodeRead` and `DatanodeInfo` are
// what the server reports back. Values are a closed union so that only
// numbers, booleans and text ever reach the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constraints::{MAX_NAME_LENGTH, MAX_UNIT_LENGTH, restrict_path, truncate};
use crate::error::Error;

// ── DataType / Order ─────────────────────────────────────────────────

/// Storage type of a datanode. Inferred by the server from the first value
/// when not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Long,
    Double,
    Boolean,
    String,
    Binary,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of values by timestamp in read queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

// ── DatanodeValue ────────────────────────────────────────────────────

/// A single datanode value: number, boolean or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatanodeValue {
    Number(serde_json::Number),
    Boolean(bool),
    Text(String),
}

impl DatanodeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.parse().ok(),
            Self::Boolean(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(s) => s.parse().ok(),
            Self::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Text(s) => s.parse().ok(),
            Self::Number(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DatanodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! value_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DatanodeValue {
                fn from(n: $ty) -> Self {
                    Self::Number(n.into())
                }
            }
        )*
    };
}

value_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl TryFrom<f64> for DatanodeValue {
    type Error = Error;

    /// Fails for NaN and infinities, which JSON cannot carry.
    fn try_from(n: f64) -> Result<Self, Self::Error> {
        serde_json::Number::from_f64(n)
            .map(Self::Number)
            .ok_or(Error::UnsupportedValue {
                kind: "non-finite number",
            })
    }
}

impl From<bool> for DatanodeValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for DatanodeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for DatanodeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl TryFrom<serde_json::Value> for DatanodeValue {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => Ok(Self::Number(n)),
            serde_json::Value::Bool(b) => Ok(Self::Boolean(b)),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Null => Err(Error::UnsupportedValue { kind: "null" }),
            serde_json::Value::Array(_) => Err(Error::UnsupportedValue { kind: "array" }),
            serde_json::Value::Object(_) => Err(Error::UnsupportedValue { kind: "object" }),
        }
    }
}

// ── Datanode (write payload) ─────────────────────────────────────────

/// A value written to a named, optionally path-scoped slot on a device.
///
/// The datanode (and any intermediate path nodes) is created by the server
/// the first time it is written. A missing timestamp is filled with the
/// current time when the payload is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DatanodeRepr", into = "DatanodeRepr")]
pub struct Datanode {
    name: String,
    path: Option<String>,
    value: DatanodeValue,
    timestamp: Option<u64>,
    unit: Option<String>,
    data_type: Option<DataType>,
    href: Option<String>,
}

impl Datanode {
    pub fn new(name: impl Into<String>, value: impl Into<DatanodeValue>) -> Self {
        Self {
            name: name.into(),
            path: None,
            value: value.into(),
            timestamp: None,
            unit: None,
            data_type: None,
            href: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Timestamp in milliseconds since the Unix epoch.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Name of the datanode. Maximum 100 characters.
    pub fn name(&self) -> &str {
        truncate(&self.name, MAX_NAME_LENGTH)
    }

    /// Slash-separated path. Maximum 10 components and 1000 characters.
    pub fn path(&self) -> Option<String> {
        self.path.as_deref().map(restrict_path)
    }

    pub fn value(&self) -> &DatanodeValue {
        &self.value
    }

    /// Explicit timestamp, if one was set.
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Unit of the value, preferably 1 or 2 characters. Maximum 10.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().map(|u| truncate(u, MAX_UNIT_LENGTH))
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// URL for reading the datanode back; only set on server echoes.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatanodeRepr {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    v: DatanodeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

impl From<DatanodeRepr> for Datanode {
    fn from(repr: DatanodeRepr) -> Self {
        Self {
            name: repr.name,
            path: repr.path,
            value: repr.v,
            timestamp: repr.ts,
            unit: repr.unit,
            data_type: repr.data_type,
            href: repr.href,
        }
    }
}

impl From<Datanode> for DatanodeRepr {
    fn from(node: Datanode) -> Self {
        Self {
            name: node.name().to_owned(),
            path: node.path(),
            ts: Some(node.timestamp.unwrap_or_else(now_millis)),
            unit: node.unit().map(str::to_owned),
            data_type: node.data_type,
            href: node.href,
            v: node.value,
        }
    }
}

// ── Read side ────────────────────────────────────────────────────────

/// One `(value, timestamp)` sample of a datanode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadValue {
    #[serde(rename = "v", default)]
    pub value: Option<DatanodeValue>,
    #[serde(rename = "ts", default)]
    pub timestamp: Option<u64>,
}

/// A datanode with the values returned by a read query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatanodeRead {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub values: Vec<ReadValue>,
}

/// Result of a read query: one block per requested datanode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatanodeReadList {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub datanode_reads: Vec<DatanodeRead>,
}

/// Datanode metadata as listed under a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatanodeInfo {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub href: Option<String>,
}
