use serde::Deserialize;
use thiserror::Error;

/// Error categories defined by the IoT-Ticket server.
///
/// Every non-2xx response maps to exactly one kind. Codes the client does
/// not know, and bodies that are not a `{code, description}` envelope,
/// become [`UncaughtException`](Self::UncaughtException).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    /// `8000`
    InternalServerError,
    /// `8001`
    PermissionNotSufficient,
    /// `8002`
    QuotaViolation,
    /// `8003`
    BadInputParameter,
    /// `8004`
    CaseWriteFailed,
    /// Unknown code or unparsable error body.
    UncaughtException,
}

impl ServerErrorKind {
    /// Map a server error code to its kind.
    pub fn from_code(code: i64) -> Self {
        match code {
            8000 => Self::InternalServerError,
            8001 => Self::PermissionNotSufficient,
            8002 => Self::QuotaViolation,
            8003 => Self::BadInputParameter,
            8004 => Self::CaseWriteFailed,
            _ => Self::UncaughtException,
        }
    }

    /// The server code for this kind, `None` for the fallback.
    pub fn code(self) -> Option<i64> {
        match self {
            Self::InternalServerError => Some(8000),
            Self::PermissionNotSufficient => Some(8001),
            Self::QuotaViolation => Some(8002),
            Self::BadInputParameter => Some(8003),
            Self::CaseWriteFailed => Some(8004),
            Self::UncaughtException => None,
        }
    }
}

impl std::fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InternalServerError => "internal server error",
            Self::PermissionNotSufficient => "permission not sufficient",
            Self::QuotaViolation => "quota violation",
            Self::BadInputParameter => "bad input parameter",
            Self::CaseWriteFailed => "case write failed",
            Self::UncaughtException => "uncaught exception",
        };
        f.write_str(name)
    }
}

/// Top-level error type for the `iotticket-api` crate.
///
/// Keeps the three runtime failure paths apart: no response at all
/// (`Transport`/`Network`), a server-reported error (`Server`), and a
/// success status whose body could not be decoded (`Deserialization`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Credentials or another value cannot be placed in an HTTP header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error from the default executor.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Transport failure reported by a custom executor.
    #[error("Network failure: {0}")]
    Network(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-2xx response, translated from the `{code, description}` envelope.
    #[error("Server error (HTTP {status}): {kind}{}", describe(.description.as_deref()))]
    Server {
        kind: ServerErrorKind,
        status: u16,
        code: Option<i64>,
        description: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A datanode value of a JSON type the service cannot store.
    #[error("Unsupported datanode value type: {kind}")]
    UnsupportedValue { kind: &'static str },
}

impl Error {
    /// The server error kind, if this is a server-reported error.
    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            Self::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` for any non-2xx response.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Network(_) => true,
            Self::Server { kind, .. } => *kind == ServerErrorKind::InternalServerError,
            _ => false,
        }
    }
}

fn describe(description: Option<&str>) -> String {
    description
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

// ── Error envelope ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorEnvelope {
    code: i64,
    description: String,
}

/// Translate a non-2xx response into [`Error::Server`].
///
/// Never fails: a body that is not a `{code: int, description: string}`
/// object yields [`ServerErrorKind::UncaughtException`].
pub fn translate_error(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Server {
            kind: ServerErrorKind::from_code(envelope.code),
            status,
            code: Some(envelope.code),
            description: Some(envelope.description),
        },
        Err(_) => Error::Server {
            kind: ServerErrorKind::UncaughtException,
            status,
            code: None,
            description: None,
        },
    }
}
