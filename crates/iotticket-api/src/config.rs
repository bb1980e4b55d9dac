// ── Client configuration ──
//
// Immutable connection settings handed to the client at construction.
// A call reads them while its request is built; changing credentials
// means building a new client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Base URL and Basic-auth credentials for one IoT-Ticket account.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    username: String,
    password: SecretString,
}

impl ClientConfig {
    /// Validate `base_url` and bundle it with the credentials.
    ///
    /// A trailing slash is appended when missing so resources join under
    /// the full base path (e.g. `https://my.iot-ticket.com/api/v1/`).
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            username: username.into(),
            password,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic base64(username:password)`, marked sensitive.
    pub(crate) fn authorization(&self) -> Result<HeaderValue, Error> {
        let raw = format!("{}:{}", self.username, self.password.expose_secret());
        let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw)))
            .map_err(|e| Error::InvalidHeader(format!("invalid credentials: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
