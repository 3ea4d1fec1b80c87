//! Environment-driven validator and server configuration.
//!
//! Unparseable threshold values fall back to the defaults, the same way the
//! logging settings do. A range-table path that is set but unreadable is a
//! hard error.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::observability::parse_bool;
use crate::ranges::{MetricRangeTable, RangeTableError};
use crate::validator::ValidatorConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Ranges(#[from] RangeTableError),
    #[error("invalid bind address {raw}: {source}")]
    BindAddr {
        raw: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

pub fn validator_config_from_env() -> ValidatorConfig {
    let mut config = ValidatorConfig::default();

    if let Some(value) = env_parsed::<usize>("BETLAB_MAX_CONDITIONS_HIGH") {
        config.high_count_threshold = value;
    }
    if let Some(value) = env_parsed::<usize>("BETLAB_MAX_CONDITIONS_MEDIUM") {
        config.medium_count_threshold = value;
    }
    if let Some(value) = env_parsed::<u32>("BETLAB_SHORT_LOOKBACK_MAX") {
        config.short_lookback_max = value;
    }
    if let Some(value) = env_parsed::<usize>("BETLAB_SHORT_LOOKBACK_COUNT") {
        config.short_lookback_count = value;
    }
    if let Some(value) = env::var("BETLAB_STRICT_EQUALITY")
        .ok()
        .and_then(|raw| parse_bool(&raw))
    {
        config.check_equality_against_bounds = value;
    }
    if let Some(value) = env::var("BETLAB_GROUP_BY_SUBJECT")
        .ok()
        .and_then(|raw| parse_bool(&raw))
    {
        config.group_by_subject = value;
    }

    // A medium threshold above the high one would never fire.
    if config.medium_count_threshold > config.high_count_threshold {
        config.medium_count_threshold = config.high_count_threshold;
    }

    config
}

/// Range table path from `BETLAB_METRIC_RANGES`, if set and non-blank.
pub fn metric_ranges_path_from_env() -> Option<PathBuf> {
    env::var("BETLAB_METRIC_RANGES")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

pub fn metric_ranges_from_env() -> Result<MetricRangeTable, ConfigError> {
    match metric_ranges_path_from_env() {
        Some(path) => Ok(MetricRangeTable::load_json(&path)?),
        None => Ok(MetricRangeTable::curated()),
    }
}

pub fn bind_addr_from_env() -> Result<SocketAddr, ConfigError> {
    let raw = env::var("BETLAB_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let parsed = raw.trim().parse::<SocketAddr>();
    parsed.map_err(|source| ConfigError::BindAddr { raw, source })
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}
