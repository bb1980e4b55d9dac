// HTTP executor seam and the default reqwest-backed implementation.
//
// The client core only builds `ApiRequest`s and maps `RawResponse`s; the
// executor owns the actual round trip (and any connection reuse).

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::request::ApiRequest;

/// Status code and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP request and returns the response, whatever its status.
///
/// Only a missing response (connection refused, DNS failure, timeout) is an
/// `Err`; non-2xx statuses are returned as `Ok` for the caller to translate.
pub trait HttpExecutor: Send + Sync {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send;
}

// ── Transport configuration ──────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-hosted servers with self-signed certs).
    DangerAcceptInvalid,
}

/// Settings for building the default `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("iotticket-api/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("failed to read CA cert {}: {e}", path.display()))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── reqwest executor ─────────────────────────────────────────────────

/// Default executor backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    http: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, Error> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
