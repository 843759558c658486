//! Configuration for fabrik consumers.
//!
//! TOML profiles layered with `FABRIK_` environment variables, token
//! resolution (env + keyring + plaintext), and translation into the
//! transport, credential and lifecycle settings the other crates take.

mod logging;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use fabrik_api::{ApiFamily, Credentials, FabricClient, TlsMode, TransportConfig};
use fabrik_core::{LifecycleConfig, OperationTimeouts, PollSettings};

pub use logging::init_tracing;

const ENV_PREFIX: &str = "FABRIK_";
const KEYRING_SERVICE: &str = "fabrik";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("client setup failed: {0}")]
    Client(#[from] fabrik_api::Error),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named endpoint profiles.
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

/// Global defaults. Durations are humantime strings ("30s", "10m").
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Seconds per HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_poll")]
    pub poll_delay: String,

    #[serde(default = "default_poll")]
    pub min_poll_interval: String,

    #[serde(default = "default_poll")]
    pub safety_margin: String,

    #[serde(default = "default_operation_timeout")]
    pub create_timeout: String,

    #[serde(default = "default_operation_timeout")]
    pub read_timeout: String,

    #[serde(default = "default_operation_timeout")]
    pub update_timeout: String,

    #[serde(default = "default_operation_timeout")]
    pub delete_timeout: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            poll_delay: default_poll(),
            min_poll_interval: default_poll(),
            safety_margin: default_poll(),
            create_timeout: default_operation_timeout(),
            read_timeout: default_operation_timeout(),
            update_timeout: default_operation_timeout(),
            delete_timeout: default_operation_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}
fn default_poll() -> String {
    "30s".into()
}
fn default_operation_timeout() -> String {
    "10m".into()
}
fn default_endpoint() -> String {
    "https://api.equinix.com".into()
}
fn default_api() -> String {
    "fabric".into()
}

/// A named endpoint profile. Every duration falls back to [`Defaults`].
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// "fabric" (bearer token) or "metal" (X-Auth-Token).
    #[serde(default = "default_api")]
    pub api: String,

    /// Environment variable holding the token.
    pub token_env: Option<String>,

    /// Token in plaintext; prefer the keyring or `token_env`.
    pub token: Option<String>,

    /// PEM file with a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub request_timeout: Option<u64>,
    pub poll_delay: Option<String>,
    pub min_poll_interval: Option<String>,
    pub safety_margin: Option<String>,
    pub create_timeout: Option<String>,
    pub read_timeout: Option<String>,
    pub update_timeout: Option<String>,
    pub delete_timeout: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config path (`fabrik/config.toml`).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fabrik", "fabrik").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fabrik");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load from the platform config path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if present), then
/// `FABRIK_`-prefixed variables (`__` separates nesting levels).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

impl Config {
    /// Look up `name`, or the default profile when `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let wanted = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(wanted)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: wanted.into(),
            })
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Token chain: `token_env` variable, then the system keyring, then the
/// plaintext `token`.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
    {
        return Ok(SecretString::from(val));
    }

    if let Some(secret) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
        .ok()
        .and_then(|entry| entry.get_password().ok())
    {
        return Ok(SecretString::from(secret));
    }

    if let Some(token) = &profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Everything needed to talk to one endpoint.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: url::Url,
    pub family: ApiFamily,
    pub credentials: Credentials,
    pub transport: TransportConfig,
    pub lifecycle: LifecycleConfig,
}

impl Settings {
    pub fn client(&self) -> Result<FabricClient, ConfigError> {
        Ok(FabricClient::new(
            self.endpoint.as_str(),
            &self.credentials,
            &self.transport,
        )?)
    }
}

/// Resolve a profile against the global defaults.
pub fn profile_to_settings(
    cfg: &Config,
    profile: &Profile,
    profile_name: &str,
) -> Result<Settings, ConfigError> {
    let endpoint: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let family = match profile.api.to_ascii_lowercase().as_str() {
        "fabric" => ApiFamily::Fabric,
        "metal" => ApiFamily::Metal,
        other => {
            return Err(ConfigError::Validation {
                field: "api".into(),
                reason: format!("expected 'fabric' or 'metal', got '{other}'"),
            });
        }
    };

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca_path) = &profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(
            profile
                .request_timeout
                .unwrap_or(cfg.defaults.request_timeout),
        ),
        ..TransportConfig::default()
    };

    let token = resolve_token(profile, profile_name)?;

    Ok(Settings {
        endpoint,
        family,
        credentials: Credentials::for_family(family, token),
        transport,
        lifecycle: lifecycle_config(&cfg.defaults, profile)?,
    })
}

/// Lifecycle timeouts and poll cadence, profile values first.
pub fn lifecycle_config(
    defaults: &Defaults,
    profile: &Profile,
) -> Result<LifecycleConfig, ConfigError> {
    let pick = |field: &str, over: Option<&String>, base: &str| -> Result<Duration, ConfigError> {
        parse_duration(field, over.map_or(base, String::as_str))
    };

    Ok(LifecycleConfig {
        timeouts: OperationTimeouts {
            create: pick(
                "create_timeout",
                profile.create_timeout.as_ref(),
                &defaults.create_timeout,
            )?,
            read: pick(
                "read_timeout",
                profile.read_timeout.as_ref(),
                &defaults.read_timeout,
            )?,
            update: pick(
                "update_timeout",
                profile.update_timeout.as_ref(),
                &defaults.update_timeout,
            )?,
            delete: pick(
                "delete_timeout",
                profile.delete_timeout.as_ref(),
                &defaults.delete_timeout,
            )?,
        },
        polling: PollSettings {
            delay: pick(
                "poll_delay",
                profile.poll_delay.as_ref(),
                &defaults.poll_delay,
            )?,
            min_interval: pick(
                "min_poll_interval",
                profile.min_poll_interval.as_ref(),
                &defaults.min_poll_interval,
            )?,
        },
        safety_margin: pick(
            "safety_margin",
            profile.safety_margin.as_ref(),
            &defaults.safety_margin,
        )?,
    })
}

fn parse_duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a duration: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_duration_names_the_field() {
        let err = parse_duration("poll_delay", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "poll_delay"));
    }

    #[test]
    fn profile_durations_override_defaults() {
        let profile = Profile {
            update_timeout: Some("20m".into()),
            min_poll_interval: Some("5s".into()),
            ..Profile::default()
        };
        let lifecycle = lifecycle_config(&Defaults::default(), &profile).unwrap();

        assert_eq!(lifecycle.timeouts.update, Duration::from_secs(20 * 60));
        assert_eq!(lifecycle.timeouts.create, Duration::from_secs(10 * 60));
        assert_eq!(lifecycle.polling.min_interval, Duration::from_secs(5));
        assert_eq!(lifecycle.safety_margin, Duration::from_secs(30));
    }

    #[test]
    fn defaults_match_lifecycle_defaults() {
        let lifecycle = lifecycle_config(&Defaults::default(), &Profile::default()).unwrap();
        assert_eq!(lifecycle, LifecycleConfig::default());
    }
}
