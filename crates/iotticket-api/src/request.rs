// Request construction
//
// Turns each typed call into an `ApiRequest`: method, full URL with query,
// headers (Basic auth, JSON content negotiation) and an optional JSON body.
// Nothing here touches the network.

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{trace, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::constraints::{MAX_READ_DATANODES, MAX_READ_LIMIT, is_device_id};
use crate::error::Error;
use crate::model::{Datanode, Device, Order};

const DEVICES: &str = "devices/";
const QUOTA_ALL: &str = "quota/all/";

/// Default number of values per datanode in read queries.
pub const DEFAULT_READ_LIMIT: u32 = 1000;

/// A fully built HTTP request, ready for an executor.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

// ── Read query ───────────────────────────────────────────────────────

/// Parameters of a `process/read` query.
///
/// Without `from_date`/`to_date` the server returns only the latest value of each
/// datanode. `to_date` is only meaningful together with `from_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadQuery {
    datanodes: Vec<String>,
    from: Option<u64>,
    to: Option<u64>,
    limit: u32,
    order: Order,
}

impl ReadQuery {
    /// Read the given datanodes (full path plus name, e.g. `/gps/latitude`).
    /// Only the first 10 are sent.
    pub fn new<I, S>(datanodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            datanodes: datanodes.into_iter().map(Into::into).collect(),
            from: None,
            to: None,
            limit: DEFAULT_READ_LIMIT,
            order: Order::default(),
        }
    }

    /// Start of the range, milliseconds since the Unix epoch.
    pub fn from_date(mut self, millis: u64) -> Self {
        self.from = Some(millis);
        self
    }

    /// End of the range, milliseconds since the Unix epoch.
    pub fn to_date(mut self, millis: u64) -> Self {
        self.to = Some(millis);
        self
    }

    /// Maximum values per datanode; anything above 10000 is sent as 10000.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// The encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let names = self
            .datanodes
            .iter()
            .take(MAX_READ_DATANODES)
            .map(|name| encode_datanode_name(name))
            .collect::<Vec<_>>()
            .join(",");

        let mut query = format!("datanodes={names}");
        if let Some(from) = self.from {
            query.push_str(&format!("&fromdate={from}"));
        }
        if let Some(to) = self.to {
            query.push_str(&format!("&todate={to}"));
        }
        query.push_str(&format!("&limit={}", self.limit.min(MAX_READ_LIMIT)));
        query.push_str(&format!("&order={}", self.order.as_str()));
        query
    }
}

/// Form-encode one query component, with spaces as `%20` rather than `+`.
fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Encode a datanode path plus name; `/` stays literal as in the server's
/// own read hrefs (`datanodes=/Swift/Swift%20API%20Datanode`).
fn encode_datanode_name(value: &str) -> String {
    encode_component(value).replace("%2F", "/")
}

/// Encode a dynamic path segment such as a device id.
fn encode_segment(value: &str) -> String {
    if !is_device_id(value) {
        warn!(id = value, "device id does not look like a 32-char id");
    }
    encode_component(value)
}

// ── Builder ──────────────────────────────────────────────────────────

/// Builds requests against one [`ClientConfig`].
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// `POST devices/`
    pub fn register_device(&self, device: &Device) -> Result<ApiRequest, Error> {
        self.post(DEVICES, &device.registration())
    }

    /// `GET devices/?limit=&offset=`
    pub fn get_devices(&self, limit: u32, offset: u32) -> Result<ApiRequest, Error> {
        let mut url = self.url(DEVICES)?;
        set_paging(&mut url, limit, offset);
        self.get(url)
    }

    /// `GET devices/{id}/`
    pub fn get_device(&self, device_id: &str) -> Result<ApiRequest, Error> {
        let url = self.url(&format!("{DEVICES}{}/", encode_segment(device_id)))?;
        self.get(url)
    }

    /// `GET devices/{id}/datanodes?limit=&offset=`
    pub fn get_datanodes(
        &self,
        device_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ApiRequest, Error> {
        let mut url = self.url(&format!("{DEVICES}{}/datanodes", encode_segment(device_id)))?;
        set_paging(&mut url, limit, offset);
        self.get(url)
    }

    /// `POST process/write/{id}/` with a JSON array of datanodes.
    pub fn write_datanodes(
        &self,
        device_id: &str,
        datanodes: &[Datanode],
    ) -> Result<ApiRequest, Error> {
        self.post(
            &format!("process/write/{}/", encode_segment(device_id)),
            datanodes,
        )
    }

    /// `GET process/read/{id}?datanodes=...`
    pub fn read_datanodes(&self, device_id: &str, query: &ReadQuery) -> Result<ApiRequest, Error> {
        let mut url = self.url(&format!("process/read/{}", encode_segment(device_id)))?;
        url.set_query(Some(&query.to_query_string()));
        self.get(url)
    }

    /// `GET quota/all/`
    pub fn get_all_quota(&self) -> Result<ApiRequest, Error> {
        let url = self.url(QUOTA_ALL)?;
        self.get(url)
    }

    /// `GET quota/{id}/`
    pub fn get_device_quota(&self, device_id: &str) -> Result<ApiRequest, Error> {
        let url = self.url(&format!("quota/{}/", encode_segment(device_id)))?;
        self.get(url)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Join a relative resource onto the base URL.
    fn url(&self, resource: &str) -> Result<Url, Error> {
        Ok(self.config.base_url().join(resource)?)
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.config.authorization()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn get(&self, url: Url) -> Result<ApiRequest, Error> {
        Ok(ApiRequest {
            method: Method::GET,
            url,
            headers: self.headers()?,
            body: None,
        })
    }

    fn post<B: Serialize + ?Sized>(&self, resource: &str, body: &B) -> Result<ApiRequest, Error> {
        let url = self.url(resource)?;
        let body = serde_json::to_vec(body)?;
        trace!(body = %String::from_utf8_lossy(&body), "request body");

        let mut headers = self.headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(ApiRequest {
            method: Method::POST,
            url,
            headers,
            body: Some(body),
        })
    }
}

fn set_paging(url: &mut Url, limit: u32, offset: u32) {
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", &offset.to_string());
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::model::DataType;

    const DEVICE: &str = "4e0f17895ae04c57a6d24baaae08b6b3";

    fn config() -> ClientConfig {
        let password: SecretString = "secret".to_owned().into();
        ClientConfig::new("https://my.iot-ticket.com/api/v1", "user", password).unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("node {i}")).collect()
    }

    #[test]
    fn read_query_limits_datanodes_to_ten() {
        let query = ReadQuery::new(names(12)).to_query_string();
        let datanodes = query
            .strip_prefix("datanodes=")
            .unwrap()
            .split('&')
            .next()
            .unwrap();
        let parts: Vec<&str> = datanodes.split(',').collect();
        assert_eq!(parts.len(), 10);
        assert_eq!(parts[0], "node%200");
        assert_eq!(parts[9], "node%209");
    }

    #[test]
    fn read_query_clamps_limit() {
        assert!(
            ReadQuery::new(["a"])
                .limit(25_000)
                .to_query_string()
                .contains("&limit=10000&")
        );
        assert!(
            ReadQuery::new(["a"])
                .limit(10_000)
                .to_query_string()
                .contains("&limit=10000&")
        );
        assert!(
            ReadQuery::new(["a"])
                .limit(9_999)
                .to_query_string()
                .contains("&limit=9999&")
        );
    }

    #[test]
    fn read_query_full() {
        let query = ReadQuery::new(["latitude", "/Swift/Swift API Datanode"])
            .from_date(1_456_012_800_000)
            .to_date(1_523_404_800_000)
            .order(Order::Descending)
            .to_query_string();
        assert_eq!(
            query,
            "datanodes=latitude,/Swift/Swift%20API%20Datanode\
             &fromdate=1456012800000&todate=1523404800000&limit=1000&order=descending"
        );
    }

    #[test]
    fn read_query_defaults() {
        assert_eq!(
            ReadQuery::new(["a"]).to_query_string(),
            "datanodes=a&limit=1000&order=ascending"
        );
    }

    #[test]
    fn read_request_url() {
        let req = RequestBuilder::new(&config())
            .read_datanodes(DEVICE, &ReadQuery::new(["a b"]))
            .unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.url.as_str(),
            format!(
                "https://my.iot-ticket.com/api/v1/process/read/{DEVICE}\
                 ?datanodes=a%20b&limit=1000&order=ascending"
            )
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn paging_urls() {
        let cfg = config();
        let builder = RequestBuilder::new(&cfg);
        assert_eq!(
            builder.get_devices(10, 0).unwrap().url.as_str(),
            "https://my.iot-ticket.com/api/v1/devices/?limit=10&offset=0"
        );
        assert_eq!(
            builder.get_datanodes(DEVICE, 5, 20).unwrap().url.as_str(),
            format!("https://my.iot-ticket.com/api/v1/devices/{DEVICE}/datanodes?limit=5&offset=20")
        );
    }

    #[test]
    fn resource_urls() {
        let cfg = config();
        let builder = RequestBuilder::new(&cfg);
        assert_eq!(
            builder.get_device(DEVICE).unwrap().url.as_str(),
            format!("https://my.iot-ticket.com/api/v1/devices/{DEVICE}/")
        );
        assert_eq!(
            builder.get_all_quota().unwrap().url.as_str(),
            "https://my.iot-ticket.com/api/v1/quota/all/"
        );
        assert_eq!(
            builder.get_device_quota(DEVICE).unwrap().url.as_str(),
            format!("https://my.iot-ticket.com/api/v1/quota/{DEVICE}/")
        );
    }

    #[test]
    fn dynamic_segments_are_encoded() {
        let req = RequestBuilder::new(&config()).get_device("../quota").unwrap();
        assert_eq!(
            req.url.as_str(),
            "https://my.iot-ticket.com/api/v1/devices/..%2Fquota/"
        );
    }

    #[test]
    fn every_request_carries_basic_auth() {
        let cfg = config();
        let builder = RequestBuilder::new(&cfg);
        for req in [
            builder.get_devices(10, 0).unwrap(),
            builder.get_all_quota().unwrap(),
            builder.register_device(&Device::new("a", "b")).unwrap(),
        ] {
            assert_eq!(
                req.headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
                "Basic dXNlcjpzZWNyZXQ="
            );
        }
    }

    #[test]
    fn write_body_is_json_array() {
        let nodes = [
            Datanode::new("latitude", 60_i32).with_timestamp(1),
            Datanode::new("Swift API Datanode", 7_i32)
                .with_path("/Swift")
                .with_data_type(DataType::Long)
                .with_timestamp(2),
        ];
        let req = RequestBuilder::new(&config())
            .write_datanodes(DEVICE, &nodes)
            .unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.url.as_str(),
            format!("https://my.iot-ticket.com/api/v1/process/write/{DEVICE}/")
        );
        assert_eq!(
            req.headers.get(CONTENT_TYPE).unwrap(),
            &HeaderValue::from_static("application/json")
        );
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!([
                { "name": "latitude", "v": 60, "ts": 1 },
                { "name": "Swift API Datanode", "path": "/Swift", "v": 7, "ts": 2, "dataType": "long" }
            ])
        );
    }

    #[test]
    fn register_posts_to_devices() {
        let req = RequestBuilder::new(&config())
            .register_device(&Device::new("Swift", "Apple").with_description("d"))
            .unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url.path(), "/api/v1/devices/");
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["description"], json!("d"));
    }

    #[test]
    fn datanode_paths_keep_slashes() {
        assert_eq!(
            ReadQuery::new(["/gps/latitude", "a,b"]).to_query_string(),
            "datanodes=/gps/latitude,a%2Cb&limit=1000&order=ascending"
        );
    }

    #[test]
    fn register_sends_only_client_fields() {
        let fetched: Device = serde_json::from_value(json!({
            "name": "a",
            "manufacturer": "b",
            "type": "t",
            "deviceId": DEVICE,
            "href": format!("https://h/api/v1/devices/{DEVICE}"),
            "createdAt": "2017-04-18T10:00:00Z"
        }))
        .unwrap();
        let req = RequestBuilder::new(&config()).register_device(&fetched).unwrap();

        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "name": "a", "manufacturer": "b", "type": "t" })
        );
    }
}
