// Device and attribute types
//
// Fields are stored as given and restricted when read. The serialized
// form is built from the accessors, so a registration payload never
// exceeds the server's limits.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constraints::{
    MAX_ATTRIBUTE_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_NUMBER_OF_ATTRIBUTES,
    truncate,
};

// ── Attribute ────────────────────────────────────────────────────────

/// A free-form key/value pair stored on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AttributeRepr")]
pub struct Attribute {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct AttributeRepr {
    key: String,
    value: String,
}

impl From<Attribute> for AttributeRepr {
    fn from(attr: Attribute) -> Self {
        Self {
            key: attr.key().to_owned(),
            value: attr.value().to_owned(),
        }
    }
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attribute key. Maximum 255 characters.
    pub fn key(&self) -> &str {
        truncate(&self.key, MAX_ATTRIBUTE_LENGTH)
    }

    /// Attribute value. Maximum 255 characters.
    pub fn value(&self) -> &str {
        truncate(&self.value, MAX_ATTRIBUTE_LENGTH)
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// An IoT device. Once registered it shows up under the user's enterprise.
///
/// `device_id`, `href` and `created_at` are assigned by the server and are
/// only populated on devices decoded from a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DeviceRepr", into = "DeviceRepr")]
pub struct Device {
    name: String,
    manufacturer: String,
    device_type: Option<String>,
    device_description: Option<String>,
    attributes: Option<Vec<Attribute>>,
    device_id: Option<String>,
    href: Option<Url>,
    created_at: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            device_type: None,
            device_description: None,
            attributes: None,
            device_id: None,
            href: None,
            created_at: None,
        }
    }

    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.device_description = Some(description.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Append one attribute, creating the list if needed.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Vec::new)
            .push(Attribute::new(key, value));
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// A short name for the device. Maximum 100 characters.
    pub fn name(&self) -> &str {
        truncate(&self.name, MAX_NAME_LENGTH)
    }

    /// Short name of the device's manufacturer. Maximum 100 characters.
    pub fn manufacturer(&self) -> &str {
        truncate(&self.manufacturer, MAX_NAME_LENGTH)
    }

    /// The main category the device belongs to. Maximum 100 characters.
    pub fn device_type(&self) -> Option<&str> {
        self.device_type
            .as_deref()
            .map(|t| truncate(t, MAX_NAME_LENGTH))
    }

    /// What the device does or where it is located. Maximum 255 characters.
    pub fn device_description(&self) -> Option<&str> {
        self.device_description
            .as_deref()
            .map(|d| truncate(d, MAX_DESCRIPTION_LENGTH))
    }

    /// Additional key/value attributes. At most the first 50 are exposed.
    pub fn attributes(&self) -> Option<&[Attribute]> {
        self.attributes
            .as_deref()
            .map(|attrs| &attrs[..attrs.len().min(MAX_NUMBER_OF_ATTRIBUTES)])
    }

    /// Server-assigned id: 32 alphanumeric characters.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// URL of the device resource.
    pub fn href(&self) -> Option<&Url> {
        self.href.as_ref()
    }

    /// Creation time on the server, ISO 8601.
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    // ── Setters ──────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_manufacturer(&mut self, manufacturer: impl Into<String>) {
        self.manufacturer = manufacturer.into();
    }

    pub fn set_device_type(&mut self, device_type: Option<String>) {
        self.device_type = device_type;
    }

    pub fn set_device_description(&mut self, description: Option<String>) {
        self.device_description = description;
    }

    pub fn set_attributes(&mut self, attributes: Option<Vec<Attribute>>) {
        self.attributes = attributes;
    }
}

// ── Wire representation ──────────────────────────────────────────────

/// Body of `POST devices/`: the client-owned fields only.
#[derive(Serialize)]
pub(crate) struct Registration<'a> {
    name: &'a str,
    manufacturer: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    device_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a [Attribute]>,
}

impl Device {
    pub(crate) fn registration(&self) -> Registration<'_> {
        Registration {
            name: self.name(),
            manufacturer: self.manufacturer(),
            device_type: self.device_type(),
            description: self.device_description(),
            attributes: self.attributes(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceRepr {
    name: String,
    manufacturer: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<Attribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl From<DeviceRepr> for Device {
    fn from(repr: DeviceRepr) -> Self {
        Self {
            name: repr.name,
            manufacturer: repr.manufacturer,
            device_type: repr.device_type,
            device_description: repr.description,
            attributes: repr.attributes,
            device_id: repr.device_id,
            href: repr.href,
            created_at: repr.created_at,
        }
    }
}

impl From<Device> for DeviceRepr {
    fn from(device: Device) -> Self {
        Self {
            name: device.name().to_owned(),
            manufacturer: device.manufacturer().to_owned(),
            device_type: device.device_type().map(str::to_owned),
            description: device.device_description().map(str::to_owned),
            attributes: device.attributes().map(<[Attribute]>::to_vec),
            device_id: device.device_id,
            href: device.href,
            created_at: device.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn accessors_truncate_long_fields() {
        let device = Device::new("n".repeat(150), "m".repeat(101))
            .with_type("t".repeat(100))
            .with_description("d".repeat(300));

        assert_eq!(device.name().chars().count(), 100);
        assert_eq!(device.manufacturer().chars().count(), 100);
        assert_eq!(device.device_type().unwrap().chars().count(), 100);
        assert_eq!(device.device_description().unwrap().chars().count(), 255);
    }

    #[test]
    fn truncation_does_not_touch_stored_value() {
        let mut device = Device::new("x".repeat(120), "acme");
        assert_eq!(device.name().len(), 100);
        device.set_name("short");
        assert_eq!(device.name(), "short");
        assert_eq!(device.clone().name, "short");
    }

    #[test]
    fn attributes_capped_at_fifty_in_order() {
        let attrs: Vec<Attribute> = (0..60)
            .map(|i| Attribute::new(format!("k{i}"), format!("v{i}")))
            .collect();
        let device = Device::new("d", "m").with_attributes(attrs);

        let visible = device.attributes().unwrap();
        assert_eq!(visible.len(), 50);
        assert_eq!(visible[0].key(), "k0");
        assert_eq!(visible[49].key(), "k49");
    }

    #[test]
    fn attribute_values_truncated() {
        let attr = Attribute::new("k".repeat(256), "v".repeat(400));
        assert_eq!(attr.key().len(), 255);
        assert_eq!(attr.value().len(), 255);
    }

    #[test]
    fn serializes_with_wire_names() {
        let device = Device::new("Swift", "Apple")
            .with_type("Wapice")
            .with_description("Testing API")
            .with_attribute("swift", "api");

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Swift",
                "manufacturer": "Apple",
                "type": "Wapice",
                "description": "Testing API",
                "attributes": [{ "key": "swift", "value": "api" }]
            })
        );
    }

    #[test]
    fn serialized_payload_respects_limits() {
        let attrs: Vec<Attribute> = (0..55).map(|i| Attribute::new(i.to_string(), "v")).collect();
        let device = Device::new("n".repeat(140), "m").with_attributes(attrs);

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["name"].as_str().unwrap().len(), 100);
        assert_eq!(value["attributes"].as_array().unwrap().len(), 50);
    }

    #[test]
    fn registration_omits_server_fields() {
        let attrs: Vec<Attribute> = (0..55).map(|i| Attribute::new(i.to_string(), "v")).collect();
        let mut device: Device = serde_json::from_value(json!({
            "name": "n".repeat(140),
            "manufacturer": "m",
            "deviceId": "4e0f17895ae04c57a6d24baaae08b6b3",
            "href": "https://my.iot-ticket.com/api/v1/devices/4e0f17895ae04c57a6d24baaae08b6b3",
            "createdAt": "2017-04-18T10:00:00Z"
        }))
        .unwrap();
        device.set_attributes(Some(attrs));

        let value = serde_json::to_value(device.registration()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(!keys.contains(&"deviceId"));
        assert!(!keys.contains(&"href"));
        assert!(!keys.contains(&"createdAt"));
        assert_eq!(value["name"].as_str().unwrap().len(), 100);
        assert_eq!(value["attributes"].as_array().unwrap().len(), 50);
    }

    #[test]
    fn decodes_server_fields() {
        let device: Device = serde_json::from_value(json!({
            "name": "Swift",
            "manufacturer": "Apple",
            "type": "Wapice",
            "description": "Testing API",
            "attributes": [{ "key": "create", "value": "apps" }],
            "deviceId": "4e0f17895ae04c57a6d24baaae08b6b3",
            "href": "https://my.iot-ticket.com/api/v1/devices/4e0f17895ae04c57a6d24baaae08b6b3",
            "createdAt": "2017-04-18T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(device.device_description(), Some("Testing API"));
        assert_eq!(device.device_id(), Some("4e0f17895ae04c57a6d24baaae08b6b3"));
        assert_eq!(
            device.href().unwrap().path(),
            "/api/v1/devices/4e0f17895ae04c57a6d24baaae08b6b3"
        );
        assert_eq!(device.created_at(), Some("2017-04-18T10:00:00Z"));
        assert_eq!(device.attributes().unwrap()[0].value(), "apps");
    }

    #[test]
    fn missing_optional_fields_decode_to_none() {
        let device: Device =
            serde_json::from_value(json!({ "name": "a", "manufacturer": "b" })).unwrap();
        assert_eq!(device.device_type(), None);
        assert_eq!(device.device_description(), None);
        assert_eq!(device.attributes(), None);
        assert_eq!(device.device_id(), None);
        assert_eq!(device.href(), None);
    }

    #[test]
    fn new_device_has_no_server_fields() {
        let device = Device::new("a", "b");
        let value = serde_json::to_value(&device).unwrap();
        assert!(value.get("deviceId").is_none());
        assert!(value.get("href").is_none());
        assert!(value.get("createdAt").is_none());
    }
}
