//! Configuration for IoT-Ticket clients.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `iotticket_api::ClientConfig` / `TransportConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use iotticket_api::{ClientConfig, TlsMode, TransportConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const KEYRING_SERVICE: &str = "iotticket";
const ENV_PREFIX: &str = "IOTTICKET_";

pub const DEFAULT_BASE_URL: &str = "https://my.iot-ticket.com/api/v1/";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    pub user_agent: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named IoT-Ticket account.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// REST API root (e.g., "https://my.iot-ticket.com/api/v1/").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to an extra CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override the User-Agent header.
    pub user_agent: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: None,
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "iotticket", "iotticket").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("iotticket");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
///
/// Environment keys nest on `__`, e.g.
/// `IOTTICKET_PROFILES__DEFAULT__USERNAME`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

/// Resolve the username: profile value, then `IOTTICKET_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(format!("{ENV_PREFIX}USERNAME")).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password: profile's `password_env`, `IOTTICKET_PASSWORD`,
/// the system keyring, then plaintext in config.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env vars
    let named_env = profile.password_env.as_deref();
    let default_env = format!("{ENV_PREFIX}PASSWORD");
    for var in named_env.into_iter().chain(std::iter::once(default_env.as_str())) {
        if let Ok(pw) = std::env::var(var) {
            debug!(profile = profile_name, var, "password from environment");
            return Ok(SecretString::from(pw));
        }
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            debug!(profile = profile_name, "password from keyring");
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Name of the profile to use: `name`, else the configured default.
pub fn profile_name<'a>(config: &'a Config, name: Option<&'a str>) -> &'a str {
    name.or(config.default_profile.as_deref())
        .unwrap_or("default")
}

/// Build client and transport settings for a profile.
pub fn resolve_profile(
    config: &Config,
    name: Option<&str>,
) -> Result<(ClientConfig, TransportConfig), ConfigError> {
    let name = profile_name(config, name);
    let profile = config
        .profiles
        .get(name)
        .ok_or_else(|| ConfigError::UnknownProfile(name.into()))?;

    let username = resolve_username(profile, name)?;
    let password = resolve_password(profile, name)?;
    let client = ClientConfig::new(&profile.base_url, username, password).map_err(|e| {
        ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("{}: {e}", profile.base_url),
        }
    })?;

    Ok((client, transport_config(&config.defaults, profile)))
}

fn transport_config(defaults: &Defaults, profile: &Profile) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        ..TransportConfig::default()
    };
    if let Some(agent) = profile.user_agent.as_ref().or(defaults.user_agent.as_ref()) {
        transport.user_agent.clone_from(agent);
    }
    transport
}
