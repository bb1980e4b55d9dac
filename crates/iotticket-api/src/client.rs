// IoT-Ticket API client
//
// One method per service operation. Each call builds its request from the
// client's immutable config, performs a single round trip on the executor,
// and maps the response. No retries, no caching.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::model::{
    Datanode, DatanodeList, DatanodeReadList, Device, DeviceQuota, DevicesList, Quota,
    WriteDatanodesResult,
};
use crate::request::{ApiRequest, ReadQuery, RequestBuilder};
use crate::response::map_response;
use crate::transport::{HttpExecutor, ReqwestExecutor, TransportConfig};

/// Async client for the IoT-Ticket REST API.
///
/// Generic over the [`HttpExecutor`] so tests and embedders can supply
/// their own transport; defaults to [`ReqwestExecutor`].
#[derive(Debug, Clone)]
pub struct IoTTicketClient<E = ReqwestExecutor> {
    config: ClientConfig,
    executor: E,
}

impl IoTTicketClient<ReqwestExecutor> {
    /// Client with the default transport settings.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Self::with_transport(config, &TransportConfig::default())
    }

    pub fn with_transport(config: ClientConfig, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            config,
            executor: ReqwestExecutor::new(transport)?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(config: ClientConfig, http: reqwest::Client) -> Self {
        Self::with_executor(config, ReqwestExecutor::from_client(http))
    }
}

impl<E: HttpExecutor> IoTTicketClient<E> {
    pub fn with_executor(config: ClientConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// A client for other credentials or another server, sharing the executor.
    pub fn with_config(&self, config: ClientConfig) -> Self
    where
        E: Clone,
    {
        Self {
            config,
            executor: self.executor.clone(),
        }
    }

    fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config)
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        debug!("{} {}", request.method, request.url);
        let response = self.executor.execute(request).await?;
        debug!(status = response.status, "response received");
        map_response(&response)
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Register a device. The returned device carries the server-assigned
    /// id, href and creation time.
    ///
    /// `POST devices/`
    pub async fn register_device(&self, device: &Device) -> Result<Device, Error> {
        let request = self.requests().register_device(device)?;
        self.send(request).await
    }

    /// One page of the account's devices. Both paging values are always
    /// sent, so pass `limit = 10, offset = 0` for the first page.
    ///
    /// `GET devices/?limit=&offset=`
    pub async fn get_devices(&self, limit: u32, offset: u32) -> Result<DevicesList, Error> {
        let request = self.requests().get_devices(limit, offset)?;
        self.send(request).await
    }

    /// `GET devices/{id}/`
    pub async fn get_device(&self, device_id: &str) -> Result<Device, Error> {
        let request = self.requests().get_device(device_id)?;
        self.send(request).await
    }

    // ── Datanodes ────────────────────────────────────────────────────

    /// One page of the datanodes of a device.
    ///
    /// `GET devices/{id}/datanodes?limit=&offset=`
    pub async fn get_datanodes(
        &self,
        device_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<DatanodeList, Error> {
        let request = self.requests().get_datanodes(device_id, limit, offset)?;
        self.send(request).await
    }

    /// Write values to a device's datanodes, creating them on first write.
    ///
    /// `POST process/write/{id}/`
    pub async fn write_datanodes(
        &self,
        device_id: &str,
        datanodes: &[Datanode],
    ) -> Result<WriteDatanodesResult, Error> {
        let request = self.requests().write_datanodes(device_id, datanodes)?;
        self.send(request).await
    }

    /// Read values of up to 10 datanodes.
    ///
    /// `GET process/read/{id}?datanodes=...`
    pub async fn read_datanodes(
        &self,
        device_id: &str,
        query: &ReadQuery,
    ) -> Result<DatanodeReadList, Error> {
        let request = self.requests().read_datanodes(device_id, query)?;
        self.send(request).await
    }

    // ── Quotas ───────────────────────────────────────────────────────

    /// `GET quota/all/`
    pub async fn get_all_quota(&self) -> Result<Quota, Error> {
        let request = self.requests().get_all_quota()?;
        self.send(request).await
    }

    /// `GET quota/{id}/`
    pub async fn get_device_quota(&self, device_id: &str) -> Result<DeviceQuota, Error> {
        let request = self.requests().get_device_quota(device_id)?;
        self.send(request).await
    }
}
