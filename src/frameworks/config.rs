use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use std::str::FromStr;
use std::{env, fmt, fs, time::Duration};
use url::Url;

// Runtime/server configuration for the QR service.

pub const DEFAULT_HTTP_PORT: u16 = 3004;

pub const DEFAULT_FALLBACK_SERVICES: [&str; 2] = [
    "https://api.qrserver.com/v1/create-qr-code/",
    "https://quickchart.io/qr",
];

const EPHEMERAL_SECRET_BYTES: usize = 32;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, message: String },
    Parse { path: String, message: String },
    InvalidFallbackUrl { url: String, message: String },
    MissingSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "failed to read config file {path}: {message}")
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse config file {path}: {message}")
            }
            ConfigError::InvalidFallbackUrl { url, message } => {
                write!(f, "invalid fallback service url {url}: {message}")
            }
            ConfigError::MissingSecret => write!(
                f,
                "QR_SECRET_KEY is not set; set it, or set QR_ALLOW_EPHEMERAL_SECRET=true to sign with a per-process key"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the service needs at startup.
///
/// Deliberately not `Debug`: it carries the signing secret.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct QrServiceConfig {
    pub http_port: u16,
    pub secret_key: Option<String>,
    // Codes signed with a per-process key stop validating after a restart.
    pub allow_ephemeral_secret: bool,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    pub cache_sweep_secs: u64,
    pub render_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub fallback_services: Vec<String>,
}

impl Default for QrServiceConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            secret_key: None,
            allow_ephemeral_secret: false,
            cache_capacity: 500,
            cache_ttl_secs: 60 * 60,
            cache_sweep_secs: 5 * 60,
            render_timeout_ms: 3000,
            probe_timeout_ms: 2500,
            fallback_services: DEFAULT_FALLBACK_SERVICES
                .iter()
                .map(|url| url.to_string())
                .collect(),
        }
    }
}

// Where the signing secret came from; logged at startup instead of the secret itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretOrigin {
    Configured,
    Ephemeral,
}

impl QrServiceConfig {
    /// Defaults, then the optional `QR_CONFIG_PATH` TOML file, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("QR_CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml(&raw).map_err(|message| ConfigError::Parse {
            path: path.to_string(),
            message,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|err| err.to_string())
    }

    /// Applies `QR_*` overrides from any lookup; unparsable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var(&lookup, "QR_HTTP_PORT") {
            self.http_port = port;
        }
        if let Some(secret) = lookup("QR_SECRET_KEY").filter(|value| !value.is_empty()) {
            self.secret_key = Some(secret);
        }
        if let Some(allow) = lookup("QR_ALLOW_EPHEMERAL_SECRET").and_then(|v| parse_flag(&v)) {
            self.allow_ephemeral_secret = allow;
        }
        override_with(&mut self.cache_capacity, parse_var(&lookup, "QR_CACHE_CAPACITY"));
        override_with(&mut self.cache_ttl_secs, parse_var(&lookup, "QR_CACHE_TTL_SECS"));
        override_with(&mut self.cache_sweep_secs, parse_var(&lookup, "QR_CACHE_SWEEP_SECS"));
        override_with(&mut self.render_timeout_ms, parse_var(&lookup, "QR_RENDER_TIMEOUT_MS"));
        override_with(&mut self.probe_timeout_ms, parse_var(&lookup, "QR_PROBE_TIMEOUT_MS"));
        if let Some(list) = lookup("QR_FALLBACK_SERVICES") {
            self.fallback_services = list
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Resolves the signing secret, refusing to start without one unless
    /// ephemeral keys are explicitly allowed.
    pub fn resolve_secret(&self) -> Result<(Vec<u8>, SecretOrigin), ConfigError> {
        match self.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => {
                Ok((secret.as_bytes().to_vec(), SecretOrigin::Configured))
            }
            _ if self.allow_ephemeral_secret => {
                let mut secret = vec![0u8; EPHEMERAL_SECRET_BYTES];
                OsRng.fill_bytes(&mut secret);
                Ok((secret, SecretOrigin::Ephemeral))
            }
            _ => Err(ConfigError::MissingSecret),
        }
    }

    pub fn fallback_urls(&self) -> Result<Vec<Url>, ConfigError> {
        self.fallback_services
            .iter()
            .map(|raw| {
                Url::parse(raw).map_err(|err| ConfigError::InvalidFallbackUrl {
                    url: raw.clone(),
                    message: err.to_string(),
                })
            })
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs.max(1))
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|value| value.trim().parse().ok())
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
