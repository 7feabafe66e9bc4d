//! Server configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use battlestation_runtime::{Generation, UnknownGeneration};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_ION_CANNONS: &str =
    "1=http://localhost:3001,2=http://localhost:3002,3=http://localhost:3003";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_CANNON_HTTP_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("malformed cannon entry {0:?}, expected generation=url")]
    MalformedCannon(String),

    #[error("cannon entry {entry:?}: {source}")]
    UnknownGeneration {
        entry: String,
        #[source]
        source: UnknownGeneration,
    },

    #[error("no ion cannons configured")]
    NoCannons,
}

/// One configured cannon endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CannonEndpoint {
    pub generation: Generation,
    pub url: String,
}

/// Configuration required to run the battle station.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cannons: Vec<CannonEndpoint>,
    /// Deadline for a whole attack, cannon poll and shot included.
    pub request_timeout: Duration,
    /// Transport timeout for a single call to a cannon endpoint.
    pub cannon_http_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BIND_ADDR` - Listen address (default: `0.0.0.0:3000`)
    /// - `ION_CANNONS` - Comma-separated `generation=url` entries
    /// - `REQUEST_TIMEOUT_MS` - Per-attack deadline (default: 1000)
    /// - `CANNON_HTTP_TIMEOUT_MS` - Per-call cannon timeout (default: 500)
    /// - `LOG_DIR` - Also write logs to `battlestation.log` in this directory
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cannons = lookup("ION_CANNONS").unwrap_or_else(|| DEFAULT_ION_CANNONS.to_string());

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cannons: parse_cannons(&cannons)?,
            request_timeout: read_millis(&lookup, "REQUEST_TIMEOUT_MS")?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            cannon_http_timeout: read_millis(&lookup, "CANNON_HTTP_TIMEOUT_MS")?
                .unwrap_or(DEFAULT_CANNON_HTTP_TIMEOUT),
            log_dir: lookup("LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Parses `1=http://host:3001,2=http://host:3002` into endpoints.
pub fn parse_cannons(value: &str) -> Result<Vec<CannonEndpoint>, ConfigError> {
    let mut endpoints = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (generation, url) = entry
            .split_once('=')
            .map(|(g, u)| (g.trim(), u.trim()))
            .filter(|(_, url)| !url.is_empty())
            .ok_or_else(|| ConfigError::MalformedCannon(entry.to_string()))?;

        let number: u32 = generation
            .parse()
            .map_err(|_| ConfigError::MalformedCannon(entry.to_string()))?;
        let generation =
            Generation::try_from(number).map_err(|source| ConfigError::UnknownGeneration {
                entry: entry.to_string(),
                source,
            })?;

        endpoints.push(CannonEndpoint {
            generation,
            url: url.to_string(),
        });
    }

    if endpoints.is_empty() {
        return Err(ConfigError::NoCannons);
    }
    Ok(endpoints)
}

fn read_millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    read::<u64, F>(lookup, key).map(|millis| millis.map(Duration::from_millis))
}

fn read<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
