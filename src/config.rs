use crate::adapters::outbound::DEFAULT_BASE_URL;
use crate::domain::value_objects::Credential;
use anyhow::Context;
use std::time::Duration;

/// Property holding the comma-separated keys in a keys file.
const API_KEY_PROPERTY: &str = "geocoding.apiKey";

#[derive(Debug, Clone)]
pub struct Config {
    /// Provider credentials in rotation order
    pub api_keys: Vec<Credential>,
    /// Replace "no match" with the sentinel coordinates
    pub sentinel_on_not_found: bool,
    /// Client-side bound on each provider call
    pub call_timeout: Duration,
    /// Lookups in flight in the stream pipeline
    pub concurrency: usize,
    /// Geocoding API base URL
    pub base_url: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            sentinel_on_not_found: false,
            call_timeout: Duration::from_secs(10),
            concurrency: 8,
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one geocoding API key is required")]
    EmptyCredentialPool,
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Build the configuration from any variable source.
pub fn load_config_from<F>(var: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let api_keys = match var("GEOFIX_API_KEYS") {
        Some(keys) => parse_credentials(&keys),
        None => match var("GEOFIX_API_KEYS_FILE") {
            Some(path) => read_keys_file(&path)?,
            None => Vec::new(),
        },
    };

    let sentinel_on_not_found = var("GEOFIX_SENTINEL_ON_NOT_FOUND")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    let call_timeout = var("GEOFIX_TIMEOUT_SECS")
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(defaults.call_timeout);

    let concurrency = var("GEOFIX_CONCURRENCY")
        .and_then(|v| v.parse().ok())
        .filter(|n: &usize| *n > 0)
        .unwrap_or(defaults.concurrency);

    let base_url = var("GEOFIX_BASE_URL").unwrap_or(defaults.base_url);

    let debug = var("DEBUG").is_some();

    Ok(Config {
        api_keys,
        sentinel_on_not_found,
        call_timeout,
        concurrency,
        base_url,
        debug,
    })
}

/// Split a comma-separated key list, dropping blanks.
pub fn parse_credentials(keys: &str) -> Vec<Credential> {
    keys.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(Credential::new)
        .collect()
}

/// Read keys from a properties file (`geocoding.apiKey=k1,k2`).
fn read_keys_file(path: &str) -> anyhow::Result<Vec<Credential>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read API keys file {}", path))?;

    let keys = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| line.split_once(|c: char| c == '=' || c == ':'))
        .find(|(name, _)| name.trim() == API_KEY_PROPERTY)
        .map(|(_, value)| parse_credentials(value))
        .unwrap_or_default();

    Ok(keys)
}
